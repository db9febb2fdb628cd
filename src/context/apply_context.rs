// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async context preservation.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::context_impl::{Context, ContextGuard};

/// A [`Future`] wrapper that carries a context frame across executor boundaries.
///
/// Executors interleave many futures on one thread and may move a future between
/// threads, so thread-local state alone cannot follow a logical operation.
/// `ApplyContext` makes its frame current while the inner future is polled and restores
/// whatever was current before once the poll returns. A wrapper built with no frame
/// polls its future with no context at all, so nothing ambient on the polling thread
/// leaks in.
///
/// # Examples
///
/// ```rust
/// use scopelog::context::{ApplyContext, Context, ContextMap, current_context};
///
/// # async fn example() {
/// let mut values = ContextMap::new();
/// values.insert("jobId".to_string(), "j-1".to_string());
///
/// let job = ApplyContext::new(Some(Context::new(values)), async {
///     current_context().unwrap()["jobId"].clone()
/// });
/// assert_eq!(job.await, "j-1");
/// # }
/// ```
pub struct ApplyContext<F> {
    context: Option<Context>,
    future: F,
}

impl<F> ApplyContext<F> {
    pub fn new(context: Option<Context>, future: F) -> Self {
        Self { context, future }
    }

    /// The frame installed around each poll.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

impl<F> Future for ApplyContext<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // SAFETY: `future` is never moved out of `self`; `context` is only cloned.
        let (context, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (d.context.clone(), Pin::new_unchecked(&mut d.future))
        };
        let _guard = ContextGuard::install(context);
        fut.poll(cx)
    }
}
