//! Diagnostic text for `to_exit_process`.
//!
//! The body lines are fixed strings that downstream snapshots compare against, so
//! any change here is a breaking change.

use super::{MatcherContext, TO_EXIT_PROCESS};
use crate::resolver::Outcome;

pub const DID_NOT_EXIT: &str = "Received function did not exit process";

/// Render the full failure message: hint, blank line, body.
pub fn render_message(outcome: &Outcome, ctx: &MatcherContext) -> String {
    let utils = ctx.utils();
    let expected_arg = if outcome.expected().is_some() {
        "expected"
    } else {
        ""
    };
    let hint = utils.matcher_hint(TO_EXIT_PROCESS, "received", expected_arg, ctx.hint_options());

    let mut lines = vec![hint, String::new()];
    lines.extend(body_lines(outcome, ctx));
    lines.join("\n")
}

fn body_lines(outcome: &Outcome, ctx: &MatcherContext) -> Vec<String> {
    let utils = ctx.utils();
    match *outcome {
        Outcome::NoExit { .. } => vec![DID_NOT_EXIT.to_string()],
        Outcome::AnyExit { actual } => {
            vec![format!("Exit code: {}", utils.received_color(&actual.to_string()))]
        }
        Outcome::Compared { expected, actual } => {
            let (not, pad) = if ctx.is_not { (" not", "    ") } else { ("", "") };
            vec![
                format!(
                    "Expected exit code:{not} {}",
                    utils.expected_color(&expected.to_string())
                ),
                format!(
                    "Received exit code:{pad} {}",
                    utils.received_color(&actual.to_string())
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_exit_message() {
        let message = render_message(
            &Outcome::NoExit { expected: None },
            &MatcherContext::plain(false),
        );
        assert_eq!(
            message,
            "expect(received).to_exit_process()\n\nReceived function did not exit process"
        );
    }

    #[test]
    fn test_no_exit_message_keeps_expected_argument_in_hint() {
        let message = render_message(
            &Outcome::NoExit { expected: Some(0) },
            &MatcherContext::plain(false),
        );
        assert!(message.starts_with("expect(received).to_exit_process(expected)\n\n"));
    }

    #[test]
    fn test_any_exit_message() {
        let message = render_message(
            &Outcome::AnyExit { actual: -1 },
            &MatcherContext::plain(true),
        );
        assert_eq!(message, "expect(received).not.to_exit_process()\n\nExit code: -1");
    }

    #[test]
    fn test_compared_message() {
        let outcome = Outcome::Compared {
            expected: -1,
            actual: 0,
        };
        let message = render_message(&outcome, &MatcherContext::plain(false));
        assert_eq!(
            message,
            "expect(received).to_exit_process(expected)\n\n\
             Expected exit code: -1\n\
             Received exit code: 0"
        );
    }

    #[test]
    fn test_negated_compared_message_aligns_values() {
        let outcome = Outcome::Compared {
            expected: 0,
            actual: 0,
        };
        let message = render_message(&outcome, &MatcherContext::plain(true));
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[2], "Expected exit code: not 0");
        assert_eq!(lines[3], "Received exit code:     0");
        assert_eq!(lines[2].len(), lines[3].len());
    }
}
