//! # Process Termination Entry Point
//!
//! [`exit`] is the single termination primitive this crate knows how to intercept.
//! Production code calls it wherever it would call `std::process::exit`.
//!
//! The override slot below is the only process-wide mutable state in the crate. It is
//! empty outside of a check; an [`ExitGuard`](crate::guard::ExitGuard) fills it on
//! install and empties it on dispose.
//!
//! Installs that find the slot taken wait for it: synchronous installs park the thread
//! on `RELEASED`, asynchronous installs register their waker and yield, so checks
//! joined in a single task take turns instead of blocking the thread that would release
//! them. An install that could only ever wait on itself (the current thread holds the
//! guard, or the install comes from inside a running candidate) fails with
//! [`GuardError::Reentrant`].

use crate::error::GuardError;
use crate::guard::{ExitSignal, Recorder, TerminationCall};
use futures::future;
use std::cell::Cell;
use std::mem;
use std::panic;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Poll, Waker};
use std::thread::{self, ThreadId};

struct Holder {
    recorder: Arc<Recorder>,
    /// Set for synchronous installs, which can only be released from their own thread.
    thread: Option<ThreadId>,
}

struct Slot {
    holder: Option<Holder>,
    waiters: Vec<Waker>,
}

static OVERRIDE: Mutex<Slot> = Mutex::new(Slot {
    holder: None,
    waiters: Vec::new(),
});
static RELEASED: Condvar = Condvar::new();

thread_local! {
    static CANDIDATE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

// A panicking check must not wedge every later check.
fn slot() -> MutexGuard<'static, Slot> {
    OVERRIDE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Terminate the process with `code` (absent means `0`).
///
/// While an [`ExitGuard`](crate::guard::ExitGuard) is active the call is recorded
/// instead and control unwinds back to the check that installed the guard. Control
/// never returns to the caller in either case.
pub fn exit(code: Option<i32>) -> ! {
    let active = slot()
        .holder
        .as_ref()
        .map(|holder| Arc::clone(&holder.recorder));
    match active {
        Some(recorder) => {
            recorder.record(TerminationCall::new(code));
            tracing::debug!(?code, "Intercepted process exit");
            // resume_unwind skips the panic hook, so no "panicked at" noise in test output.
            panic::resume_unwind(Box::new(ExitSignal))
        }
        None => {
            let status = code.unwrap_or(0);
            tracing::debug!(status, "Exiting process");
            std::process::exit(status)
        }
    }
}

/// Terminate the process with an explicit exit code.
pub fn exit_with(code: i32) -> ! {
    exit(Some(code))
}

/// Returns true while a guard has the termination entry point overridden.
pub fn is_intercepted() -> bool {
    slot().holder.is_some()
}

/// Marks the current thread as running a candidate until dropped.
pub(crate) struct CandidateScope(());

impl CandidateScope {
    pub(crate) fn enter() -> Self {
        CANDIDATE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        CandidateScope(())
    }
}

impl Drop for CandidateScope {
    fn drop(&mut self) {
        CANDIDATE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn in_candidate() -> bool {
    CANDIDATE_DEPTH.with(|depth| depth.get() > 0)
}

/// Install `recorder` as the override, blocking until any active override is released.
pub(crate) fn acquire(recorder: Arc<Recorder>) -> Result<(), GuardError> {
    if in_candidate() {
        return Err(GuardError::Reentrant);
    }
    let current = thread::current().id();
    let mut slot = slot();
    loop {
        match slot.holder.as_ref().map(|holder| holder.thread) {
            None => break,
            Some(owner) if owner == Some(current) => return Err(GuardError::Reentrant),
            Some(_) => {}
        }
        tracing::trace!("Waiting for active exit guard to be released");
        slot = RELEASED
            .wait(slot)
            .unwrap_or_else(PoisonError::into_inner);
    }
    slot.holder = Some(Holder {
        recorder,
        thread: Some(current),
    });
    Ok(())
}

/// Install `recorder` as the override, yielding until any active override is released.
pub(crate) async fn acquire_async(recorder: Arc<Recorder>) -> Result<(), GuardError> {
    if in_candidate() {
        return Err(GuardError::Reentrant);
    }
    future::poll_fn(|cx| {
        let mut slot = slot();
        if slot.holder.is_some() {
            if !slot.waiters.iter().any(|waker| waker.will_wake(cx.waker())) {
                tracing::trace!("Waiting for active exit guard to be released");
                slot.waiters.push(cx.waker().clone());
            }
            return Poll::Pending;
        }
        slot.holder = Some(Holder {
            recorder: Arc::clone(&recorder),
            thread: None,
        });
        Poll::Ready(())
    })
    .await;
    Ok(())
}

/// Install `recorder` as the override unless another one is active.
pub(crate) fn try_acquire(recorder: Arc<Recorder>) -> bool {
    let mut slot = slot();
    if slot.holder.is_some() {
        return false;
    }
    slot.holder = Some(Holder {
        recorder,
        thread: Some(thread::current().id()),
    });
    true
}

/// Clear the override if it still belongs to `recorder`. Returns whether anything was restored.
pub(crate) fn release(recorder: &Arc<Recorder>) -> bool {
    let waiters = {
        let mut slot = slot();
        match slot.holder.as_ref() {
            Some(holder) if Arc::ptr_eq(&holder.recorder, recorder) => {
                slot.holder = None;
                RELEASED.notify_all();
                mem::take(&mut slot.waiters)
            }
            _ => return false,
        }
    };
    for waker in waiters {
        waker.wake();
    }
    true
}
