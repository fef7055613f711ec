//! Route lookup and table administration.
//!
//! # Responsibilities
//! - Map request paths to registered handlers, exact match only
//! - Fall through to the not-found slot when nothing matches
//! - Support atomic register / copy / remove / replace-not-found
//!
//! # Design Decisions
//! - `copy` clones the handler reference, so re-registering the source
//!   path later does not affect the copy
//! - The not-found slot is swapped atomically; in-flight dispatches
//!   keep the handler they already resolved

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::handlers::StaticPage;
use crate::protocol::Status;
use crate::routing::Handler;

/// Wrapper so the not-found handler can be swapped atomically.
struct NotFoundSlot {
    handler: Arc<dyn Handler>,
}

/// Path-keyed registry of handlers plus the not-found fallback.
///
/// Shared across all connection workers; reads during dispatch never
/// block administration writes.
pub struct Router {
    routes: DashMap<String, Arc<dyn Handler>>,
    not_found: ArcSwap<NotFoundSlot>,
}

impl Router {
    /// Create an empty router whose not-found slot answers
    /// `51 Not found` with no body.
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
            not_found: ArcSwap::from_pointee(NotFoundSlot {
                handler: Arc::new(StaticPage::new(Status::NotFound, "Not found", Vec::new())),
            }),
        }
    }

    /// Bind `path` to `handler`, overwriting any existing binding.
    pub fn register(&self, path: impl Into<String>, handler: Arc<dyn Handler>) {
        self.routes.insert(path.into(), handler);
    }

    /// Bind `new_path` to the handler currently at `path`.
    ///
    /// The copy is an independent reference: re-registering `path`
    /// afterwards leaves `new_path` untouched. Returns false when
    /// `path` has no binding.
    pub fn copy(&self, path: &str, new_path: impl Into<String>) -> bool {
        let handler = self.routes.get(path).map(|entry| Arc::clone(entry.value()));
        match handler {
            Some(handler) => {
                self.routes.insert(new_path.into(), handler);
                true
            }
            None => false,
        }
    }

    /// Remove the binding for `path`; subsequent lookups fall through
    /// to the not-found handler. Returns false when nothing was bound.
    pub fn remove(&self, path: &str) -> bool {
        self.routes.remove(path).is_some()
    }

    /// Resolve the handler for `path`, or the not-found handler when
    /// no exact match exists.
    pub fn lookup(&self, path: &str) -> Arc<dyn Handler> {
        self.routes
            .get(path)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| Arc::clone(&self.not_found.load().handler))
    }

    /// Replace the not-found handler.
    pub fn set_not_found(&self, handler: Arc<dyn Handler>) {
        self.not_found.store(Arc::new(NotFoundSlot { handler }));
    }

    /// Number of registered paths, not counting the not-found slot.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no paths are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
