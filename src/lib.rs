//! # profile-kit
//!
//! Consolidated customer profile cache over polyglot data sources.
//!
//! Customer profiles live across three independent systems of record: a
//! relational store (identity and purchase history), a document store
//! (interest/behavior tags), and a graph store (friend and referral
//! relationships). This crate assembles them into one consolidated record
//! and accelerates repeated reads through a fourth key-value cache.
//!
//! ## Features
//!
//! - **Read-through caching:** serve from cache, else aggregate from the
//!   three sources and populate on the way out
//! - **Bulk rebuild:** flush the cache namespace and re-derive every known
//!   customer, with bounded fan-out and per-customer failure reporting
//! - **Best-effort enrichment:** a missing or failing document/graph store
//!   degrades to empty collections instead of failing the whole profile
//! - **Read views:** pure projections (profiles, friends, purchases,
//!   referrals) over the cached population
//! - **Backend agnostic:** in-memory by default, Redis behind the `redis`
//!   feature, anything else via the [`CacheBackend`] trait
//!
//! ## Quick Start
//!
//! ```ignore
//! use profile_kit::{
//!     Aggregator, ProfileCoordinator, ProfileService, ViewKind,
//!     backend::InMemoryBackend,
//! };
//!
//! // 1. Implement the source adapter traits over your stores
//! //    (RelationalSource, DocumentSource, GraphSource).
//! let aggregator = Aggregator::new(relational, documents, graph);
//!
//! // 2. Pick a cache backend and build the coordinator.
//! let coordinator = ProfileCoordinator::new(InMemoryBackend::new(), aggregator);
//!
//! // 3. Share it across request handlers.
//! let service = ProfileService::new(coordinator);
//!
//! let profile = service.get_profile(42).await?;       // read-through
//! let report = service.rebuild_all().await?;          // flush + repopulate
//! let rows = service.list_view(ViewKind::ProfilesWithFriends).await?;
//! ```

#[macro_use]
extern crate log;

pub mod aggregator;
pub mod backend;
pub mod coordinator;
pub mod error;
pub mod key;
pub mod observability;
pub mod profile;
pub mod serialization;
pub mod service;
pub mod sources;
pub mod views;

// Re-exports for convenience
pub use aggregator::Aggregator;
pub use backend::CacheBackend;
pub use coordinator::{ProfileCoordinator, RebuildReport};
pub use error::{Error, Result, SourceKind};
pub use profile::{
    ConsolidatedProfile, Customer, CustomerId, FriendRef, InterestProfile, Origin, Purchase,
    ReferralRef,
};
pub use service::ProfileService;
pub use sources::{DocumentSource, GraphSource, RelationalSource};
pub use views::{ProjectedProfile, ViewKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
