//! # Assertion Resolver
//!
//! Runs a candidate under an [`ExitGuard`], classifies what happened and produces a
//! [`Verdict`].
//!
//! A recorded exit always wins. Only when the candidate never reached the termination
//! entry point does its own failure (a panic, or an `Err` return) matter, and then it
//! is handed back as [`CandidateFailure`] rather than turned into a failed verdict.

use crate::guard::{self, ExitGuard, TerminationCall};
use crate::matcher::{MatcherContext, message};
use crate::process::CandidateScope;
use futures::{FutureExt, future};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// What a candidate may return. `Err` counts as failing before any exit.
pub trait CandidateOutput {
    fn into_result(self) -> anyhow::Result<()>;
}

impl CandidateOutput for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<T, E> CandidateOutput for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map(|_| ()).map_err(Into::into)
    }
}

/// The candidate's own failure, captured before any exit was recorded.
#[derive(Debug, thiserror::Error)]
pub enum CandidateFailure {
    #[error("Candidate panicked before exiting: {}", describe_panic(.0))]
    Panicked(Box<dyn Any + Send>),

    #[error(transparent)]
    Errored(anyhow::Error),
}

impl CandidateFailure {
    /// Hand the original failure back to the caller.
    ///
    /// Panics are resumed with their original payload; errors are returned unchanged.
    pub fn propagate(self) -> anyhow::Error {
        match self {
            CandidateFailure::Panicked(payload) => panic::resume_unwind(payload),
            CandidateFailure::Errored(error) => error,
        }
    }
}

#[allow(clippy::borrowed_box)]
fn describe_panic(payload: &Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// How a check came out, before negation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The termination entry point was never invoked.
    NoExit { expected: Option<i32> },
    /// Exited, and any code was acceptable.
    AnyExit { actual: i32 },
    /// Exited, and the code was compared against an expectation.
    Compared { expected: i32, actual: i32 },
}

impl Outcome {
    pub fn passed(&self) -> bool {
        match self {
            Outcome::NoExit { .. } => false,
            Outcome::AnyExit { .. } => true,
            Outcome::Compared { expected, actual } => expected == actual,
        }
    }

    /// The code the caller asked for, if any.
    pub fn expected(&self) -> Option<i32> {
        match self {
            Outcome::NoExit { expected } => *expected,
            Outcome::AnyExit { .. } => None,
            Outcome::Compared { expected, .. } => Some(*expected),
        }
    }
}

/// Classify the first recorded call against the expected code.
pub fn classify(first_call: Option<TerminationCall>, expected: Option<i32>) -> Outcome {
    match (first_call, expected) {
        (None, expected) => Outcome::NoExit { expected },
        (Some(call), None) => Outcome::AnyExit {
            actual: call.code_or_default(),
        },
        (Some(call), Some(expected)) => Outcome::Compared {
            expected,
            actual: call.code_or_default(),
        },
    }
}

type MessageFn = Box<dyn Fn() -> String + Send + Sync>;

/// Pass/fail result of one check, with a message that is only rendered on demand.
pub struct Verdict {
    outcome: Outcome,
    message: MessageFn,
}

impl Verdict {
    pub fn new(outcome: Outcome, message: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            outcome,
            message: Box::new(message),
        }
    }

    pub fn pass(&self) -> bool {
        self.outcome.passed()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn message(&self) -> String {
        (self.message)()
    }
}

impl fmt::Debug for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verdict")
            .field("pass", &self.pass())
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Run a synchronous candidate and resolve its verdict.
pub fn resolve<F, R>(
    candidate: F,
    expected: Option<i32>,
    ctx: &MatcherContext,
) -> Result<Verdict, CandidateFailure>
where
    F: FnOnce() -> R,
    R: CandidateOutput,
{
    let mut guard = ExitGuard::install();
    let settled = {
        let _scope = CandidateScope::enter();
        panic::catch_unwind(AssertUnwindSafe(candidate))
    };
    let failure = captured_failure(settled);
    let outcome = settle(&mut guard, failure, expected);
    guard.dispose();
    outcome.map(|outcome| verdict(outcome, ctx))
}

/// Run an asynchronous candidate to completion and resolve its verdict.
///
/// Waiting for another check's guard yields to the executor, so checks joined in one
/// task run one after the other. The guard is held across the candidate's await
/// points and released when the candidate settles, or when this future is dropped.
pub async fn resolve_async<F, Fut, R>(
    candidate: F,
    expected: Option<i32>,
    ctx: &MatcherContext,
) -> Result<Verdict, CandidateFailure>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = R>,
    R: CandidateOutput,
{
    let mut guard = ExitGuard::install_async().await;
    // Calling the candidate may itself exit or panic before the first await.
    let mut running =
        Box::pin(AssertUnwindSafe(async move { candidate().await }).catch_unwind());
    let settled = future::poll_fn(|cx| {
        let _scope = CandidateScope::enter();
        running.as_mut().poll(cx)
    })
    .await;
    let failure = captured_failure(settled);
    let outcome = settle(&mut guard, failure, expected);
    guard.dispose();
    outcome.map(|outcome| verdict(outcome, ctx))
}

fn captured_failure<R: CandidateOutput>(
    settled: Result<R, Box<dyn Any + Send>>,
) -> Option<CandidateFailure> {
    match settled {
        Ok(output) => output.into_result().err().map(CandidateFailure::Errored),
        Err(payload) if guard::is_exit_signal(&*payload) => None,
        Err(payload) => Some(CandidateFailure::Panicked(payload)),
    }
}

fn settle(
    guard: &mut ExitGuard,
    failure: Option<CandidateFailure>,
    expected: Option<i32>,
) -> Result<Outcome, CandidateFailure> {
    let first_call = guard.first_call();
    match (first_call, failure) {
        (None, Some(failure)) => {
            tracing::debug!(%failure, "Candidate failed before exiting");
            Err(failure)
        }
        (first_call, _) => {
            let outcome = classify(first_call, expected);
            tracing::debug!(?outcome, pass = outcome.passed(), "Resolved exit check");
            Ok(outcome)
        }
    }
}

fn verdict(outcome: Outcome, ctx: &MatcherContext) -> Verdict {
    let ctx = ctx.clone();
    Verdict::new(outcome, move || message::render_message(&outcome, &ctx))
}
