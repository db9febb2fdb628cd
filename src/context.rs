// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ambient, execution-scoped key/value context.
//!
//! A context is a string-to-string mapping (a request id, a job id) that every log
//! record emitted inside a block picks up without being passed around explicitly.
//!
//! # Blocks
//!
//! [`run_with_context`] makes a new frame current for the extent of a closure. The new
//! frame is a copy of whatever was current at the call site, overlaid with the supplied
//! keys. On exit, normal or by panic, the previous frame is current again.
//!
//! ```rust
//! use scopelog::context::{current_context, run_with_context};
//!
//! let seen = run_with_context([("requestId", "X")], || {
//!     run_with_context([("jobId", "Y")], current_context)
//! });
//! let seen = seen.unwrap();
//! assert_eq!(seen["requestId"], "X");
//! assert_eq!(seen["jobId"], "Y");
//! assert!(current_context().is_none());
//! ```
//!
//! # Mutation
//!
//! [`mutate_current`] writes into the current frame in place. The change is visible for
//! the rest of the block and to blocks entered afterwards, never to the enclosing block,
//! and is a no-op when no block is active.
//!
//! # Async code
//!
//! Frames are tracked per thread, which is not the same thing as per logical
//! operation once futures interleave on a thread or move between pool threads. Wrap the
//! future instead: [`with_context`] returns an [`ApplyContext`] that installs its frame
//! around every poll and removes it afterwards, so two requests polled on the same
//! worker never see each other's keys.
//!
//! ```rust
//! use scopelog::context::{current_context, with_context};
//!
//! # async fn example() {
//! let request = with_context([("requestId", "r-7")], async {
//!     current_context().unwrap()["requestId"].clone()
//! });
//! assert_eq!(request.await, "r-7");
//! # }
//! ```
//!
//! Continuations spawned from inside a block should be wrapped with [`propagate`] so
//! they run in the frame that was current when they were created.

mod apply_context;
mod context_impl;

#[cfg(test)]
mod tests;

pub use apply_context::ApplyContext;
pub use context_impl::{Context, ContextGuard, ContextMap};

use std::future::Future;

/// Runs `body` with a frame derived from the current one and `partial`.
pub fn run_with_context<I, K, V, R>(partial: I, body: impl FnOnce() -> R) -> R
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let frame = Context::derive(partial);
    let _guard = frame.enter();
    body()
}

/// A snapshot of the current frame, or `None` outside of any block.
pub fn current_context() -> Option<ContextMap> {
    Context::current().map(|frame| frame.snapshot())
}

/// Adds or overwrites keys in the current frame. Does nothing outside of any block.
pub fn mutate_current<I, K, V>(additions: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    if let Some(frame) = Context::current() {
        frame.extend(additions);
    }
}

/// Async counterpart of [`run_with_context`].
///
/// The frame is derived now, from the context current at the call site.
pub fn with_context<I, K, V, F>(partial: I, future: F) -> ApplyContext<F>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    F: Future,
{
    ApplyContext::new(Some(Context::derive(partial)), future)
}

/// Binds `future` to the frame that is current now, sharing it rather than copying it.
pub fn propagate<F: Future>(future: F) -> ApplyContext<F> {
    ApplyContext::new(Context::current(), future)
}
