//! `to_exit_process` on asynchronous candidates.
mod common;

use common::{EXPECTATIONS, expected_message, panic_message};
use exit_assert::test_utils::{ExitBehavior, init_test_logging};
use exit_assert::{AsyncExitProcessMatchers, PlainUtils, expect, expect_async, process};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

async fn delay() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn exit_later(code: Option<i32>) {
    delay().await;
    process::exit(code)
}

async fn exit_after(millis: u64, code: i32) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    process::exit_with(code)
}

async fn check(
    behavior: ExitBehavior,
    expected: Option<i32>,
    negate: bool,
) -> std::thread::Result<()> {
    AssertUnwindSafe(async move {
        let mut expectation = expect_async(move || async move {
            delay().await;
            behavior.run();
        })
        .with_utils(Arc::new(PlainUtils));
        if negate {
            expectation = expectation.not();
        }
        let result = match expected {
            None => expectation.to_exit_process().await,
            Some(code) => expectation.to_exit_process_with(code).await,
        };
        result.expect("fixture candidates never fail on their own");
    })
    .catch_unwind()
    .await
}

#[tokio::test]
async fn test_async_verdict_table() {
    init_test_logging();
    for behavior in ExitBehavior::ALL {
        for expected in EXPECTATIONS {
            let pass = behavior.satisfies(expected);
            let plain = check(behavior, expected, false).await;
            let negated = check(behavior, expected, true).await;

            let (holds, fails, fails_negated) = if pass {
                (plain, negated, true)
            } else {
                (negated, plain, false)
            };
            assert!(holds.is_ok(), "{behavior:?} with expected {expected:?}");
            let payload = fails.expect_err("the opposite assertion must fail");
            assert_eq!(
                panic_message(payload),
                expected_message(behavior, expected, fails_negated)
            );
        }
    }
}

#[tokio::test]
async fn test_delayed_exit_without_code() -> anyhow::Result<()> {
    expect_async(|| exit_later(None))
        .to_exit_process_with(0)
        .await?;
    expect_async(|| exit_later(Some(0))).to_exit_process().await?;
    expect_async(|| exit_later(Some(-1)))
        .not()
        .to_exit_process_with(0)
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_exit_before_first_await() -> anyhow::Result<()> {
    let code = 9;
    expect_async(move || {
        if code != 0 {
            process::exit_with(code);
        }
        async {}
    })
    .to_exit_process_with(9)
    .await
}

#[tokio::test]
async fn test_sync_and_async_messages_match() {
    for behavior in ExitBehavior::ALL {
        for expected in EXPECTATIONS {
            let sync_verdict = {
                let expectation =
                    expect(move || behavior.run()).with_utils(Arc::new(PlainUtils));
                match expected {
                    None => expectation.check(),
                    Some(code) => expectation.check_with(code),
                }
            }
            .expect("no unrelated failure");

            let async_expectation = expect_async(move || async move {
                delay().await;
                behavior.run();
            })
            .with_utils(Arc::new(PlainUtils));
            let async_verdict = match expected {
                None => async_expectation.check().await,
                Some(code) => async_expectation.check_with(code).await,
            }
            .expect("no unrelated failure");

            assert_eq!(sync_verdict.pass(), async_verdict.pass());
            assert_eq!(sync_verdict.outcome(), async_verdict.outcome());
            assert_eq!(sync_verdict.message(), async_verdict.message());
        }
    }
}

#[tokio::test]
async fn test_async_never_exiting_fails() {
    let payload = AssertUnwindSafe(async {
        expect_async(delay)
            .with_utils(Arc::new(PlainUtils))
            .to_exit_process()
            .await
            .unwrap();
    })
    .catch_unwind()
    .await
    .expect_err("a candidate that resolves must fail the assertion");
    assert_eq!(
        panic_message(payload),
        "expect(received).to_exit_process()\n\nReceived function did not exit process"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_joined_checks_take_turns() {
    init_test_logging();
    let joined = async {
        futures::join!(
            expect_async(|| exit_after(5, 1)).check_with(1),
            expect_async(|| exit_after(0, 2)).check_with(2),
        )
    };
    let (slow, fast) = tokio::time::timeout(Duration::from_secs(5), joined)
        .await
        .expect("joined checks must not wait on each other forever");

    let slow = slow.expect("no unrelated failure");
    let fast = fast.expect("no unrelated failure");
    assert!(slow.pass(), "{}", slow.message());
    assert!(fast.pass(), "{}", fast.message());
}
