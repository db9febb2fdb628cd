// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::*;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

/// Returns `Pending` once, so a joined sibling gets polled in between.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

fn yield_once() -> YieldOnce {
    YieldOnce(false)
}

fn value(key: &str) -> Option<String> {
    current_context().and_then(|c| c.get(key).cloned())
}

#[test]
fn nested_blocks_overlay_and_revert() {
    let seen = run_with_context([("requestId", "X")], || {
        run_with_context([("jobId", "Y")], current_context)
    })
    .unwrap();
    let mut expected = ContextMap::new();
    expected.insert("requestId".into(), "X".into());
    expected.insert("jobId".into(), "Y".into());
    assert_eq!(seen, expected);
    assert!(current_context().is_none());
}

#[test]
fn inner_keys_win() {
    run_with_context([("user", "outer"), ("tenant", "t1")], || {
        run_with_context([("user", "inner")], || {
            assert_eq!(value("user").as_deref(), Some("inner"));
            assert_eq!(value("tenant").as_deref(), Some("t1"));
        });
        assert_eq!(value("user").as_deref(), Some("outer"));
    });
}

#[test]
fn mutation_is_scoped_to_the_active_block() {
    run_with_context([("requestId", "R")], || {
        run_with_context([("step", "1")], || {
            mutate_current([("step", "2"), ("extra", "yes")]);
            assert_eq!(value("step").as_deref(), Some("2"));
            assert_eq!(value("extra").as_deref(), Some("yes"));
        });
        assert_eq!(value("step"), None);
        assert_eq!(value("extra"), None);
    });
}

#[test]
fn mutation_reaches_blocks_entered_afterwards_only() {
    let nothing: [(&str, &str); 0] = [];
    run_with_context([("a", "1")], || {
        let before = run_with_context(nothing, current_context).unwrap();
        mutate_current([("b", "2")]);
        let after = run_with_context(nothing, current_context).unwrap();
        assert!(!before.contains_key("b"));
        assert_eq!(after.get("b").map(String::as_str), Some("2"));
    });
}

#[test]
fn mutation_without_a_block_is_a_no_op() {
    mutate_current([("orphan", "value")]);
    assert!(current_context().is_none());
}

#[test]
fn panicking_body_still_reverts() {
    fn failing_body() {
        panic!("body failed");
    }
    let result = std::panic::catch_unwind(|| {
        run_with_context([("requestId", "doomed")], failing_body);
    });
    assert!(result.is_err());
    assert!(current_context().is_none());
}

#[test]
fn frames_are_thread_local() {
    run_with_context([("requestId", "main")], || {
        let other = std::thread::spawn(current_context).join().unwrap();
        assert!(other.is_none());
    });
}

#[test]
fn frames_can_be_carried_to_other_threads() {
    run_with_context([("requestId", "carried")], || {
        let frame = Context::current().unwrap();
        let seen = std::thread::spawn(move || {
            let _guard = frame.enter();
            value("requestId")
        })
        .join()
        .unwrap();
        assert_eq!(seen.as_deref(), Some("carried"));
    });
}

#[test]
fn interleaved_operations_stay_isolated() {
    async fn request(id: &'static str) -> (Option<String>, Option<String>) {
        with_context([("requestId", id)], async move {
            mutate_current([("owner", id)]);
            yield_once().await;
            let first = value("requestId");
            yield_once().await;
            (first, value("owner"))
        })
        .await
    }

    let (a, b) = futures::executor::block_on(futures::future::join(request("A"), request("B")));
    assert_eq!(a, (Some("A".to_string()), Some("A".to_string())));
    assert_eq!(b, (Some("B".to_string()), Some("B".to_string())));
    assert!(current_context().is_none());
}

#[test]
fn with_context_captures_the_call_site() {
    let fut = run_with_context([("requestId", "outer")], || {
        with_context([("jobId", "inner")], async { current_context() })
    });
    // Polled after the block has exited; the frame was derived at the call site.
    let seen = futures::executor::block_on(fut).unwrap();
    assert_eq!(seen["requestId"], "outer");
    assert_eq!(seen["jobId"], "inner");
}

#[test]
fn propagated_futures_share_the_frame() {
    let (continuation, frame) = run_with_context([("requestId", "shared")], || {
        let continuation = propagate(async {
            mutate_current([("continued", "true")]);
            value("requestId")
        });
        (continuation, Context::current().unwrap())
    });
    let seen = std::thread::spawn(move || futures::executor::block_on(continuation))
        .join()
        .unwrap();
    assert_eq!(seen.as_deref(), Some("shared"));
    assert_eq!(frame.get("continued").as_deref(), Some("true"));
}

#[test]
fn unbound_futures_do_not_see_the_polling_thread_context() {
    let unbound = ApplyContext::new(None, async { current_context() });
    let seen = run_with_context([("requestId", "ambient")], || {
        futures::executor::block_on(unbound)
    });
    assert!(seen.is_none());
}

#[test_executors::async_test]
async fn context_survives_awaits() {
    let seen = with_context([("requestId", "async")], async {
        yield_once().await;
        value("requestId")
    })
    .await;
    assert_eq!(seen.as_deref(), Some("async"));
}

#[test]
fn context_equality_is_identity() {
    let a = Context::derive([("k", "v")]);
    let b = a.clone();
    let c = Context::derive([("k", "v")]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string(), "{k=v}");
}
