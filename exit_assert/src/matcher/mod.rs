//! # Matcher Surface
//!
//! The `expect(..)` entry points, the `to_exit_process` predicate and the formatting
//! capability that failure messages are rendered with.
//!
//! - **`expect`**: [`Expect`]/[`ExpectAsync`] and the matcher traits that register
//!   `to_exit_process` on them.
//! - **`message`**: Pure rendering of an [`Outcome`](crate::resolver::Outcome) into the
//!   diagnostic text shown on failure.
//! - **`utils`**: [`MatcherUtils`] implementations, plain and ANSI-colored.

pub mod expect;
pub mod message;
pub mod utils;

pub use expect::{
    AsyncExitProcessMatchers, ExitProcessMatchers, Expect, ExpectAsync, TO_EXIT_PROCESS, expect,
    expect_async, expect_async_fallible, expect_fallible,
};
pub use utils::{ColorUtils, PlainUtils};

use std::fmt;
use std::sync::Arc;

/// Options that change how a matcher hint is phrased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintOptions {
    pub is_not: bool,
}

/// Formatting capability injected into message rendering.
pub trait MatcherUtils: Send + Sync {
    fn expected_color(&self, text: &str) -> String;

    fn received_color(&self, text: &str) -> String;

    fn dim(&self, text: &str) -> String;

    /// Render the `expect(received).matcher(expected)` header line.
    ///
    /// An empty `received` or `expected` drops that argument; an empty `expected`
    /// still renders the empty call parentheses.
    fn matcher_hint(
        &self,
        matcher_name: &str,
        received: &str,
        expected: &str,
        options: HintOptions,
    ) -> String {
        let mut hint = String::new();
        // Punctuation waiting to be emitted, dimmed, before the next colored token.
        let mut pending = String::from("expect");

        if !received.is_empty() {
            hint.push_str(&self.dim(&format!("{pending}(")));
            hint.push_str(&self.received_color(received));
            pending = String::from(")");
        }

        if options.is_not {
            hint.push_str(&self.dim(&format!("{pending}.")));
            hint.push_str("not");
            pending.clear();
        }

        hint.push_str(&self.dim(&format!("{pending}.")));
        hint.push_str(matcher_name);
        pending.clear();

        if expected.is_empty() {
            pending.push_str("()");
        } else {
            hint.push_str(&self.dim(&format!("{pending}(")));
            hint.push_str(&self.expected_color(expected));
            pending = String::from(")");
        }

        if !pending.is_empty() {
            hint.push_str(&self.dim(&pending));
        }
        hint
    }
}

/// The ambient state a matcher runs with: negation and formatting.
#[derive(Clone)]
pub struct MatcherContext {
    pub is_not: bool,
    utils: Arc<dyn MatcherUtils>,
}

impl MatcherContext {
    pub fn new(is_not: bool, utils: Arc<dyn MatcherUtils>) -> Self {
        Self { is_not, utils }
    }

    /// A context that renders without any color escapes.
    pub fn plain(is_not: bool) -> Self {
        Self::new(is_not, Arc::new(PlainUtils))
    }

    pub fn utils(&self) -> &dyn MatcherUtils {
        self.utils.as_ref()
    }

    pub fn hint_options(&self) -> HintOptions {
        HintOptions {
            is_not: self.is_not,
        }
    }

    pub(crate) fn set_utils(&mut self, utils: Arc<dyn MatcherUtils>) {
        self.utils = utils;
    }
}

impl fmt::Debug for MatcherContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherContext")
            .field("is_not", &self.is_not)
            .finish_non_exhaustive()
    }
}
