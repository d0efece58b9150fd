use std::future::IntoFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_core::Operation;
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

fn delayed<'a, T: Send + 'a>(
    ms: u64,
    result: Result<T, &'static str>,
) -> Operation<'a, T, &'static str> {
    Operation::from_raw_async(
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            result
        },
        |reason| reason,
    )
}

#[tokio::test]
async fn from_raw_async_maps_failure_reason() {
    let op: Operation<'_, u8, String> =
        Operation::from_raw_async(async { Err::<u8, _>(404u16) }, |code| format!("status {code}"));
    assert_eq!(op.await, Err("status 404".to_string()));
}

#[tokio::test]
async fn map_and_bind_apply_after_resolution() {
    let result = Operation::<_, &str>::from_value(2)
        .map(|v| v + 1)
        .bind(|v| if v == 3 { Ok(v * 10) } else { Err("unexpected") })
        .await;
    assert_eq!(result, Ok(30));
}

#[tokio::test]
async fn error_short_circuits_every_later_step() {
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();
    let result = Operation::<i32, _>::from_error("boom")
        .map(|v| v + 1)
        .bind_async(move |v| {
            flag.store(true, Ordering::SeqCst);
            Operation::from_value(v)
        })
        .map_err(|e| format!("wrapped {e}"))
        .await;
    assert_eq!(result, Err("wrapped boom".to_string()));
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn bind_async_starts_only_after_predecessor_resolves() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let first_log = log.clone();
    let second_log = log.clone();

    let first = Operation::<_, &str>::from_raw_async(
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            first_log.lock().unwrap().push("first done");
            Ok::<_, &str>(1)
        },
        |e| e,
    );
    let result = first
        .bind_async(move |v| {
            second_log.lock().unwrap().push("second built");
            Operation::from_value(v + 1)
        })
        .await;

    assert_eq!(result, Ok(2));
    assert_eq!(*log.lock().unwrap(), vec!["first done", "second built"]);
}

#[tokio::test]
async fn combine_two_joins_values() {
    let joined = Operation::combine_two(delayed(5, Ok(1)), delayed(1, Ok("b"))).await;
    assert_eq!(joined, Ok((1, "b")));
}

#[tokio::test]
async fn combine_two_returns_the_only_error() {
    let joined = Operation::combine_two(delayed(1, Ok(1)), delayed::<u8>(5, Err("b"))).await;
    assert_eq!(joined, Err("b"));

    let joined = Operation::combine_two(delayed::<u8>(5, Err("a")), delayed(1, Ok(2))).await;
    assert_eq!(joined, Err("a"));
}

#[tokio::test]
async fn combine_two_double_failure_returns_first_argument_error() {
    // `b` fails long before `a`; `a` still wins.
    let joined =
        Operation::combine_two(delayed::<u8>(40, Err("a")), delayed::<u8>(0, Err("b"))).await;
    assert_eq!(joined, Err("a"));

    let joined =
        Operation::combine_two(delayed::<u8>(0, Err("a")), delayed::<u8>(40, Err("b"))).await;
    assert_eq!(joined, Err("a"));
}

#[tokio::test]
async fn combine_two_polls_both_operands_concurrently() {
    // `a` can only finish once `b` has run, so sequential evaluation would hang.
    let (tx, rx) = oneshot::channel::<u8>();
    let a = Operation::from_raw_async(rx, |_| "sender dropped");
    let b = Operation::from_raw_async(
        async move { tx.send(7).map_err(|_| "receiver dropped") },
        |e| e,
    );
    let joined = tokio::time::timeout(
        Duration::from_secs(1),
        Operation::combine_two(a, b).into_future(),
    )
    .await
    .expect("combine_two must not serialize its operands");
    assert_eq!(joined, Ok((7, ())));
}

#[tokio::test]
async fn fold_hands_outcome_to_one_branch() {
    let ok = Operation::<_, &str>::from_value(3)
        .fold(|v| format!("ok {v}"), |e| format!("err {e}"))
        .await;
    assert_eq!(ok, "ok 3");

    let err = Operation::<u8, _>::from_error("x")
        .fold(|v| format!("ok {v}"), |e| format!("err {e}"))
        .await;
    assert_eq!(err, "err x");
}
