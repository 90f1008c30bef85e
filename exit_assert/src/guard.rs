//! # Exit Guard
//!
//! Scoped interception of [`process::exit`](crate::process::exit) for one check.
//!
//! A guard is acquired at the top of a check and released when it is disposed or
//! dropped, so the override is restored on every exit path: normal return, an
//! unwinding panic, and an async check future that is dropped before completion.
//!
//! ```rust
//! use exit_assert::{process, ExitGuard};
//! use std::panic::{self, AssertUnwindSafe};
//!
//! let mut guard = ExitGuard::install();
//! let _ = panic::catch_unwind(AssertUnwindSafe(|| process::exit_with(3)));
//! assert_eq!(guard.first_call().map(|call| call.code_or_default()), Some(3));
//! guard.dispose();
//! assert!(!guard.is_installed());
//! ```

use crate::error::GuardError;
use crate::process;
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};

/// One recorded invocation of the termination entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationCall {
    code: Option<i32>,
}

impl TerminationCall {
    pub fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// The code exactly as supplied; `None` when the call had no argument.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// The code the process would have exited with. A missing argument means `0`.
    pub fn code_or_default(&self) -> i32 {
        self.code.unwrap_or(0)
    }
}

/// Unwind payload raised by an intercepted exit. Only the resolver catches it.
#[derive(Debug)]
pub(crate) struct ExitSignal;

/// Returns true if a caught panic payload is the intercepted-exit sentinel.
pub(crate) fn is_exit_signal(payload: &(dyn Any + Send)) -> bool {
    payload.is::<ExitSignal>()
}

/// Call log shared between a guard and the override slot.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    calls: Mutex<Vec<TerminationCall>>,
}

impl Recorder {
    pub(crate) fn record(&self, call: TerminationCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn snapshot(&self) -> Vec<TerminationCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn first(&self) -> Option<TerminationCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .copied()
    }
}

/// Owns the termination override for the lifetime of one check.
#[derive(Debug)]
pub struct ExitGuard {
    recorder: Arc<Recorder>,
    installed: bool,
    checked: bool,
}

impl ExitGuard {
    /// Override the termination entry point, blocking until any other active guard
    /// is released.
    ///
    /// # Panics
    ///
    /// Panics with [`GuardError::Reentrant`] when the active guard belongs to this
    /// thread, or when called from inside a running candidate. Either wait would never
    /// end.
    pub fn install() -> Self {
        let recorder = Arc::new(Recorder::default());
        if let Err(error) = process::acquire(Arc::clone(&recorder)) {
            panic!("{error}");
        }
        tracing::debug!("Installed exit guard");
        Self::with_recorder(recorder)
    }

    /// Override the termination entry point, yielding to the executor until any other
    /// active guard is released.
    ///
    /// # Panics
    ///
    /// Panics with [`GuardError::Reentrant`] when awaited from inside a running
    /// candidate.
    pub async fn install_async() -> Self {
        let recorder = Arc::new(Recorder::default());
        if let Err(error) = process::acquire_async(Arc::clone(&recorder)).await {
            panic!("{error}");
        }
        tracing::debug!("Installed exit guard");
        Self::with_recorder(recorder)
    }

    /// Override the termination entry point if no other guard is active.
    pub fn try_install() -> Result<Self, GuardError> {
        let recorder = Arc::new(Recorder::default());
        if !process::try_acquire(Arc::clone(&recorder)) {
            return Err(GuardError::AlreadyActive);
        }
        tracing::debug!("Installed exit guard");
        Ok(Self::with_recorder(recorder))
    }

    fn with_recorder(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            installed: true,
            checked: false,
        }
    }

    /// The first recorded call, if the entry point was invoked at all.
    ///
    /// Marks the guard as checked. Later calls are recorded but never consulted.
    pub fn first_call(&mut self) -> Option<TerminationCall> {
        self.checked = true;
        self.recorder.first()
    }

    /// Every call recorded so far, in invocation order.
    pub fn calls(&self) -> Vec<TerminationCall> {
        self.recorder.snapshot()
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Restore the real termination behavior. Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.installed {
            return;
        }
        self.installed = false;
        let restored = process::release(&self.recorder);
        if self.checked {
            tracing::debug!(restored, "Disposed exit guard");
        } else {
            tracing::trace!(restored, "Disposed exit guard before any check ran");
        }
    }
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}
