//! High-level profile service handle for the hosting network layer.
//!
//! Provides a convenient wrapper around [`ProfileCoordinator`] with `Arc`
//! for easy sharing across request handlers.

use crate::backend::CacheBackend;
use crate::coordinator::{ProfileCoordinator, RebuildReport};
use crate::error::Result;
use crate::profile::{ConsolidatedProfile, CustomerId};
use crate::sources::{DocumentSource, GraphSource, RelationalSource};
use crate::views::{ProjectedProfile, ViewKind};
use std::sync::Arc;

/// Cheaply cloneable handle over the cache coordinator.
///
/// The coordinator's methods all take `&self` and its backend uses interior
/// mutability, so a plain `Arc` is enough: each inbound profile request can
/// clone the handle and proceed independently, with the cache store as the
/// only shared mutable resource.
///
/// # Example
///
/// ```ignore
/// use profile_kit::{Aggregator, ProfileCoordinator, ProfileService};
/// use profile_kit::backend::InMemoryBackend;
///
/// let aggregator = Aggregator::new(relational, documents, graph);
/// let coordinator = ProfileCoordinator::new(InMemoryBackend::new(), aggregator);
/// let service = ProfileService::new(coordinator);
///
/// // In a request handler:
/// let service = service.clone(); // cheap - just an Arc increment
/// let profile = service.get_profile(42).await?;
/// ```
pub struct ProfileService<B, R, D, G> {
    coordinator: Arc<ProfileCoordinator<B, R, D, G>>,
}

impl<B, R, D, G> Clone for ProfileService<B, R, D, G> {
    fn clone(&self) -> Self {
        ProfileService {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<B, R, D, G> ProfileService<B, R, D, G>
where
    B: CacheBackend,
    R: RelationalSource,
    D: DocumentSource,
    G: GraphSource,
{
    /// Wrap a coordinator for sharing.
    pub fn new(coordinator: ProfileCoordinator<B, R, D, G>) -> Self {
        ProfileService {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Read-through profile lookup. See
    /// [`ProfileCoordinator::get_profile`].
    ///
    /// # Errors
    /// Same error cases as the coordinator method.
    pub async fn get_profile(&self, id: CustomerId) -> Result<ConsolidatedProfile> {
        self.coordinator.get_profile(id).await
    }

    /// Flush and repopulate the whole cache. See
    /// [`ProfileCoordinator::rebuild_all`].
    ///
    /// # Errors
    /// Same error cases as the coordinator method.
    pub async fn rebuild_all(&self) -> Result<RebuildReport> {
        self.coordinator.rebuild_all().await
    }

    /// Apply one read view over all cached profiles. See
    /// [`ProfileCoordinator::list_view`].
    ///
    /// # Errors
    /// Same error cases as the coordinator method.
    pub async fn list_view(&self, kind: ViewKind) -> Result<Vec<ProjectedProfile>> {
        self.coordinator.list_view(kind).await
    }

    /// Evict one customer's cached profile. See
    /// [`ProfileCoordinator::delete_profile`].
    ///
    /// # Errors
    /// Same error cases as the coordinator method.
    pub async fn delete_profile(&self, id: CustomerId) -> Result<()> {
        self.coordinator.delete_profile(id).await
    }

    /// Enumerate every known customer identifier.
    ///
    /// # Errors
    /// Same error cases as the coordinator method.
    pub async fn customer_ids(&self) -> Result<Vec<CustomerId>> {
        self.coordinator.customer_ids().await
    }

    /// Readiness probe for the cache backend.
    ///
    /// The sources are probed by the hosting service, which owns their
    /// connections.
    ///
    /// # Errors
    /// Returns `Error::CacheUnavailable` if the backend is not accessible.
    pub async fn health_check(&self) -> Result<bool> {
        self.coordinator.backend().health_check().await
    }

    /// Get a reference to the underlying coordinator.
    pub fn coordinator(&self) -> &ProfileCoordinator<B, R, D, G> {
        &self.coordinator
    }
}
