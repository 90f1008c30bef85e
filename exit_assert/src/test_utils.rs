//! Test helpers for exercising exit checks.
//!
//! These are public so downstream crates can reuse the same fixtures when they test
//! their own termination paths.

use crate::process;

pub use crate::utils::logging::init_test_logging;

/// How a fixture candidate behaves with respect to process termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitBehavior {
    /// Returns normally.
    DoesNotExit,
    /// Calls `exit(None)`.
    ExitWithoutCode,
    /// Calls `exit(Some(code))`.
    ExitWithCode(i32),
}

impl ExitBehavior {
    /// Every behavior the verdict table distinguishes, with `-1` as the non-zero code.
    pub const ALL: [ExitBehavior; 4] = [
        ExitBehavior::DoesNotExit,
        ExitBehavior::ExitWithoutCode,
        ExitBehavior::ExitWithCode(0),
        ExitBehavior::ExitWithCode(-1),
    ];

    /// Perform the behavior. Only returns for [`ExitBehavior::DoesNotExit`].
    pub fn run(self) {
        match self {
            ExitBehavior::DoesNotExit => {}
            ExitBehavior::ExitWithoutCode => process::exit(None),
            ExitBehavior::ExitWithCode(code) => process::exit_with(code),
        }
    }

    /// The code a real process would have exited with, if it exits.
    pub fn exit_code(self) -> Option<i32> {
        match self {
            ExitBehavior::DoesNotExit => None,
            ExitBehavior::ExitWithoutCode => Some(0),
            ExitBehavior::ExitWithCode(code) => Some(code),
        }
    }

    /// Whether `to_exit_process` (un-negated) passes for `expected`.
    pub fn satisfies(self, expected: Option<i32>) -> bool {
        match (self.exit_code(), expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }
}

/// Strip ANSI escape sequences
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            if let Some('[') = chars.peek() {
                chars.next();
                // CSI sequences end at the first byte in 0x40..=0x7E
                for nc in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&nc) {
                        break;
                    }
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_removes_csi_sequences() {
        assert_eq!(strip_ansi("\u{1b}[0m\u{1b}[32m-1\u{1b}[0m"), "-1");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_satisfies_matches_verdict_table() {
        assert!(!ExitBehavior::DoesNotExit.satisfies(None));
        assert!(ExitBehavior::ExitWithoutCode.satisfies(Some(0)));
        assert!(!ExitBehavior::ExitWithoutCode.satisfies(Some(-1)));
        assert!(ExitBehavior::ExitWithCode(-1).satisfies(None));
        assert!(!ExitBehavior::ExitWithCode(-1).satisfies(Some(0)));
    }
}
