//! # Exit Assert
//!
//! Test helpers for asserting that code under test tried to terminate the process,
//! and with which exit code, without the test process actually terminating.
//!
//! ## Core Concepts
//!
//! Code that wants to be testable calls [`process::exit`] instead of
//! `std::process::exit`. Outside of a check this behaves like the real thing. While a
//! check is running, an [`ExitGuard`] owns the termination entry point: every call is
//! recorded and execution of the candidate halts at the call site, exactly as it would
//! for a real exit.
//!
//! The resolver then classifies what happened:
//! - the candidate never exited (assertion failure),
//! - the candidate exited, optionally with a specific code (pass or code mismatch),
//! - the candidate failed on its own before exiting (the original panic or error is
//!   handed back to the caller untouched).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use exit_assert::{expect, process, ExitProcessMatchers};
//!
//! fn shutdown(fatal: bool) {
//!     if fatal {
//!         process::exit_with(2);
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! expect(|| shutdown(true)).to_exit_process_with(2)?;
//! expect(|| shutdown(false)).not().to_exit_process()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **`process`**: The interceptable termination entry point.
//! - **`guard`**: Scoped interception of that entry point for one check.
//! - **`resolver`**: Runs sync and async candidates and computes a [`Verdict`].
//! - **`matcher`**: The `expect(..)` surface, message rendering and color handling.
//! - **`config`**: Matcher configuration from JSON files and the environment.

pub mod config;
pub mod error;
pub mod guard;
pub mod matcher;
pub mod process;
pub mod resolver;
pub mod test_utils;
pub mod utils;

pub use config::{ColorMode, MatcherConfig};
pub use error::{ConfigError, GuardError};
pub use guard::{ExitGuard, TerminationCall};
pub use matcher::{
    AsyncExitProcessMatchers, ColorUtils, ExitProcessMatchers, Expect, ExpectAsync,
    HintOptions, MatcherContext, MatcherUtils, PlainUtils, TO_EXIT_PROCESS, expect,
    expect_async, expect_async_fallible, expect_fallible,
};
pub use resolver::{CandidateFailure, CandidateOutput, Outcome, Verdict, classify};
