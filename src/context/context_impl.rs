// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Context implementation.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Key/value pairs of a context frame, in insertion order.
pub type ContextMap = IndexMap<String, String>;

/// One frame of ambient context.
///
/// Frames are cheap to clone (Arc-based); clones are the same frame, so a mutation
/// through one is visible through all of them. Entering a block never shares a frame
/// with the enclosing block: [`Context::derive`] copies.
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<RwLock<ContextMap>>,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.inner.read();
        f.write_str("{")?;
        for (i, (k, v)) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

impl Context {
    pub fn new(values: ContextMap) -> Context {
        Context {
            inner: Arc::new(RwLock::new(values)),
        }
    }

    /// The frame current on this thread, if any.
    pub fn current() -> Option<Context> {
        CURRENT
            .try_with(|current| current.borrow().clone())
            .ok()
            .flatten()
    }

    /// A new frame: a copy of the current one (or empty) overlaid with `partial`.
    pub fn derive<I, K, V>(partial: I) -> Context
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = Context::current()
            .map(|frame| frame.snapshot())
            .unwrap_or_default();
        for (k, v) in partial {
            values.insert(k.into(), v.into());
        }
        Context::new(values)
    }

    /// A copy of this frame's values.
    pub fn snapshot(&self) -> ContextMap {
        self.inner.read().clone()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).cloned()
    }

    /// Adds or overwrites keys in place.
    pub fn extend<I, K, V>(&self, additions: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = self.inner.write();
        for (k, v) in additions {
            values.insert(k.into(), v.into());
        }
    }

    /// Makes this frame current until the guard is dropped.
    pub fn enter(self) -> ContextGuard {
        ContextGuard::install(Some(self))
    }
}

/**
Restores the previously current frame on drop.

The guard belongs to the thread that created it. In async code, do not hold one across
an `.await`; use [`ApplyContext`](super::ApplyContext) instead.
*/
#[must_use = "the context is only current while the guard is alive"]
pub struct ContextGuard {
    prior: Option<Context>,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    pub(crate) fn install(frame: Option<Context>) -> ContextGuard {
        let prior = CURRENT
            .try_with(|current| current.replace(frame))
            .ok()
            .flatten();
        ContextGuard {
            prior,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let prior = self.prior.take();
        // The slot is gone during thread teardown; nothing left to restore then.
        let _ = CURRENT.try_with(|current| current.replace(prior));
    }
}

impl std::fmt::Debug for ContextGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextGuard")
            .field("prior", &self.prior)
            .finish()
    }
}
