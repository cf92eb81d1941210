//! The unit of work a cache pair is bound to.

use super::{ContentRef, Request};
use std::sync::Arc;
use uuid::Uuid;

/// A published object together with the request that published it.
///
/// Immutable for the lifetime of the cache pair built for it.
#[derive(Debug, Clone)]
pub struct Context {
    content: ContentRef,
    request: Arc<Request>,
    request_id: Uuid,
}

impl Context {
    /// Creates a new context with a fresh request id.
    #[must_use]
    pub fn new(content: ContentRef, request: Request) -> Self {
        Self {
            content,
            request: Arc::new(request),
            request_id: Uuid::new_v4(),
        }
    }

    /// Sets a specific request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the published object.
    #[must_use]
    pub fn content(&self) -> &ContentRef {
        &self.content
    }

    /// Returns the request.
    #[must_use]
    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    /// Returns the request id used to correlate log records.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}
