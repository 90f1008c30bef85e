//! Shared helpers for the integration tests.
#![allow(dead_code)]

use exit_assert::matcher::message::render_message;
use exit_assert::test_utils::ExitBehavior;
use exit_assert::{MatcherContext, TerminationCall, classify};
use std::any::Any;

/// Every expectation the verdict table distinguishes.
pub const EXPECTATIONS: [Option<i32>; 3] = [None, Some(0), Some(-1)];

/// Text of a panic payload raised by `panic!`.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .unwrap_or_else(|| "<non-string panic payload>".to_string()),
    }
}

/// The call a behavior records, if any.
pub fn recorded_call(behavior: ExitBehavior) -> Option<TerminationCall> {
    match behavior {
        ExitBehavior::DoesNotExit => None,
        ExitBehavior::ExitWithoutCode => Some(TerminationCall::new(None)),
        ExitBehavior::ExitWithCode(code) => Some(TerminationCall::new(Some(code))),
    }
}

/// The plain-text failure message expected for a behavior/expectation pair.
pub fn expected_message(behavior: ExitBehavior, expected: Option<i32>, is_not: bool) -> String {
    render_message(
        &classify(recorded_call(behavior), expected),
        &MatcherContext::plain(is_not),
    )
}
