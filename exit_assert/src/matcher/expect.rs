//! `expect(candidate)` and the `to_exit_process` predicate.
//!
//! Matcher failures panic with the rendered message, the way `assert!` does, so the
//! test harness reports them. A candidate that fails on its own before exiting is not
//! a matcher failure: its panic is resumed unchanged, and its error comes back as the
//! `Err` of the matcher call, whether or not the expectation is negated.

use super::{MatcherContext, MatcherUtils};
use crate::config::MatcherConfig;
use crate::resolver::{self, CandidateFailure, CandidateOutput, Verdict};
use std::future::Future;
use std::sync::Arc;

/// Name the predicate is registered and rendered under.
pub const TO_EXIT_PROCESS: &str = "to_exit_process";

/// Expectation over a synchronous candidate.
#[derive(Debug)]
pub struct Expect<F> {
    candidate: F,
    ctx: MatcherContext,
}

/// Expectation over a candidate that returns a future.
#[derive(Debug)]
pub struct ExpectAsync<F> {
    candidate: F,
    ctx: MatcherContext,
}

/// Start an expectation on a synchronous candidate.
///
/// Formatting follows [`MatcherConfig::from_env`].
pub fn expect<F>(candidate: F) -> Expect<F>
where
    F: FnOnce(),
{
    Expect {
        candidate,
        ctx: ambient_context(),
    }
}

/// Start an expectation on a synchronous candidate that reports failure with `Err`.
pub fn expect_fallible<F, T, E>(candidate: F) -> Expect<F>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    Expect {
        candidate,
        ctx: ambient_context(),
    }
}

/// Start an expectation on an asynchronous candidate.
pub fn expect_async<F, Fut>(candidate: F) -> ExpectAsync<F>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    ExpectAsync {
        candidate,
        ctx: ambient_context(),
    }
}

/// Start an expectation on an asynchronous candidate that reports failure with `Err`.
pub fn expect_async_fallible<F, Fut, T, E>(candidate: F) -> ExpectAsync<F>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    ExpectAsync {
        candidate,
        ctx: ambient_context(),
    }
}

fn ambient_context() -> MatcherContext {
    MatcherContext::new(false, MatcherConfig::from_env().utils())
}

/// Apply negation to a verdict: panic with its message when the assertion fails,
/// propagate the candidate's own failure untouched.
fn enforce(resolved: Result<Verdict, CandidateFailure>, is_not: bool) -> anyhow::Result<()> {
    let verdict = resolved.map_err(CandidateFailure::propagate)?;
    if verdict.pass() == is_not {
        panic!("{}", verdict.message());
    }
    Ok(())
}

impl<F, R> Expect<F>
where
    F: FnOnce() -> R,
    R: CandidateOutput,
{
    /// Negate the expectation.
    pub fn not(mut self) -> Self {
        self.ctx.is_not = !self.ctx.is_not;
        self
    }

    pub fn with_utils(mut self, utils: Arc<dyn MatcherUtils>) -> Self {
        self.ctx.set_utils(utils);
        self
    }

    /// Resolve without asserting, accepting any exit code.
    pub fn check(self) -> Result<Verdict, CandidateFailure> {
        resolver::resolve(self.candidate, None, &self.ctx)
    }

    /// Resolve without asserting, expecting `code`.
    pub fn check_with(self, code: i32) -> Result<Verdict, CandidateFailure> {
        resolver::resolve(self.candidate, Some(code), &self.ctx)
    }
}

impl<F, Fut, R> ExpectAsync<F>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = R>,
    R: CandidateOutput,
{
    /// Negate the expectation.
    pub fn not(mut self) -> Self {
        self.ctx.is_not = !self.ctx.is_not;
        self
    }

    pub fn with_utils(mut self, utils: Arc<dyn MatcherUtils>) -> Self {
        self.ctx.set_utils(utils);
        self
    }

    pub async fn check(self) -> Result<Verdict, CandidateFailure> {
        resolver::resolve_async(self.candidate, None, &self.ctx).await
    }

    pub async fn check_with(self, code: i32) -> Result<Verdict, CandidateFailure> {
        resolver::resolve_async(self.candidate, Some(code), &self.ctx).await
    }
}

/// Registers `to_exit_process` on synchronous expectations.
pub trait ExitProcessMatchers {
    /// Assert that the candidate exits the process with any code.
    fn to_exit_process(self) -> anyhow::Result<()>;

    /// Assert that the candidate exits the process with `code`.
    fn to_exit_process_with(self, code: i32) -> anyhow::Result<()>;
}

impl<F, R> ExitProcessMatchers for Expect<F>
where
    F: FnOnce() -> R,
    R: CandidateOutput,
{
    fn to_exit_process(self) -> anyhow::Result<()> {
        let is_not = self.ctx.is_not;
        enforce(self.check(), is_not)
    }

    fn to_exit_process_with(self, code: i32) -> anyhow::Result<()> {
        let is_not = self.ctx.is_not;
        enforce(self.check_with(code), is_not)
    }
}

/// Registers `to_exit_process` on asynchronous expectations.
#[allow(async_fn_in_trait)]
pub trait AsyncExitProcessMatchers {
    async fn to_exit_process(self) -> anyhow::Result<()>;

    async fn to_exit_process_with(self, code: i32) -> anyhow::Result<()>;
}

impl<F, Fut, R> AsyncExitProcessMatchers for ExpectAsync<F>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = R>,
    R: CandidateOutput,
{
    async fn to_exit_process(self) -> anyhow::Result<()> {
        let is_not = self.ctx.is_not;
        enforce(self.check().await, is_not)
    }

    async fn to_exit_process_with(self, code: i32) -> anyhow::Result<()> {
        let is_not = self.ctx.is_not;
        enforce(self.check_with(code).await, is_not)
    }
}
