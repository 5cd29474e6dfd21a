//! De-duplication of concurrent identical reads.
//!
//! The browse page polls on a timer and also refetches after user actions;
//! both can fire while a previous fetch is still running. [`InFlight`] lets
//! the second caller await the first caller's future instead of issuing a new
//! request. The entry is dropped when that future completes, so the next poll
//! always fetches fresh data. A caller that knows the chain has moved on (a
//! confirmed purchase) calls [`InFlight::invalidate`] first, so it never
//! joins a request that started before the change.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

type Pending<T> = Shared<LocalBoxFuture<'static, T>>;

/// Keyed set of running requests. Cloning shares the same set.
pub struct InFlight<T: Clone> {
    pending: Rc<RefCell<HashMap<String, Pending<T>>>>,
}

impl<T: Clone> Clone for InFlight<T> {
    fn clone(&self) -> Self {
        Self { pending: Rc::clone(&self.pending) }
    }
}

impl<T: Clone + 'static> Default for InFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> InFlight<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { pending: Rc::new(RefCell::new(HashMap::new())) }
    }

    /// Await the running request for `key`, or start one with `start`.
    pub async fn run<F, Fut>(&self, key: &str, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + 'static,
    {
        let existing = self.pending.borrow().get(key).cloned();
        let shared = if let Some(shared) = existing {
            tracing::debug!(key, "joining in-flight request");
            shared
        } else {
            let shared = start().boxed_local().shared();
            self.pending.borrow_mut().insert(key.to_owned(), shared.clone());
            shared
        };

        let output = shared.clone().await;

        let mut pending = self.pending.borrow_mut();
        if pending.get(key).is_some_and(|current| current.ptr_eq(&shared)) {
            pending.remove(key);
        }
        output
    }

    /// Forget the running request for `key`. Callers already awaiting it
    /// still get its result; the next [`InFlight::run`] starts a new one.
    pub fn invalidate(&self, key: &str) {
        if self.pending.borrow_mut().remove(key).is_some() {
            tracing::debug!(key, "in-flight request invalidated");
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.borrow().contains_key(key)
    }
}
