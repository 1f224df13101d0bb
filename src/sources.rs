//! Source adapter traits for the three systems of record.
//!
//! Each adapter is a narrow async query interface over one external store,
//! treated as a black box by the core: the relational store (customer rows,
//! purchase history), the document store (interest/behavior documents), and
//! the graph store (friend and referral edges). The hosting service owns
//! the real connections and injects adapters at construction time, which
//! keeps the core testable with the in-memory fakes in this module.
//!
//! # Error Handling
//!
//! When implementing these traits for real stores, return `Ok(None)` (or an
//! empty collection) for "no data" and reserve `Err` for transport-level
//! failures: connectivity loss, timeouts, authentication, query errors.
//! "Row not found" is a domain answer, not an error.

use crate::error::Result;
use crate::profile::{Customer, CustomerId, FriendRef, InterestProfile, Purchase, ReferralRef};

/// Query interface to the relational store.
///
/// This is the source of truth for which customers exist: the mandatory
/// existence check and the rebuild's id enumeration both go through it.
#[allow(async_fn_in_trait)]
pub trait RelationalSource: Send + Sync {
    /// Fetch one customer row by id.
    ///
    /// # Returns
    /// - `Ok(Some(customer))` - Customer found
    /// - `Ok(None)` - No such customer (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the query fails.
    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Fetch the customer's purchases joined with product metadata,
    /// ordered by date descending.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the query fails.
    async fn fetch_purchases(&self, id: CustomerId) -> Result<Vec<Purchase>>;

    /// List every known customer identifier.
    ///
    /// Used by the bulk rebuild to enumerate the cache population.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the query fails.
    async fn list_customer_ids(&self) -> Result<Vec<CustomerId>>;
}

/// Query interface to the document store.
#[allow(async_fn_in_trait)]
pub trait DocumentSource: Send + Sync {
    /// Fetch the customer's interest document.
    ///
    /// # Returns
    /// - `Ok(Some(profile))` - Document found
    /// - `Ok(None)` - No document yet (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the query fails.
    async fn fetch_interest_profile(&self, id: CustomerId) -> Result<Option<InterestProfile>>;
}

/// Query interface to the graph store.
#[allow(async_fn_in_trait)]
pub trait GraphSource: Send + Sync {
    /// One-hop "friend of" traversal from the customer's node.
    ///
    /// Zero edges is an empty vec, not an error.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the traversal fails.
    async fn fetch_friends(&self, id: CustomerId) -> Result<Vec<FriendRef>>;

    /// One-hop "referred" traversal carrying the referred product.
    ///
    /// Zero edges is an empty vec, not an error.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the traversal fails.
    async fn fetch_referrals(&self, id: CustomerId) -> Result<Vec<ReferralRef>>;
}

// ============================================================================
// In-Memory Test Sources
// ============================================================================

use std::collections::HashMap;

/// In-memory relational source for testing.
///
/// Deterministic, no database setup: populate customers and purchases up
/// front, then hand it to the aggregator or coordinator under test.
#[derive(Default)]
pub struct InMemoryRelational {
    customers: HashMap<CustomerId, Customer>,
    purchases: HashMap<CustomerId, Vec<Purchase>>,
}

impl InMemoryRelational {
    /// Create a new empty relational source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a customer row.
    pub fn insert_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    /// Append a purchase for a customer.
    pub fn insert_purchase(&mut self, id: CustomerId, purchase: Purchase) {
        self.purchases.entry(id).or_default().push(purchase);
    }

    /// Return the number of customers.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Return true if no customers are present.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

impl RelationalSource for InMemoryRelational {
    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.customers.get(&id).cloned())
    }

    async fn fetch_purchases(&self, id: CustomerId) -> Result<Vec<Purchase>> {
        let mut purchases = self.purchases.get(&id).cloned().unwrap_or_default();
        purchases.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(purchases)
    }

    async fn list_customer_ids(&self) -> Result<Vec<CustomerId>> {
        let mut ids: Vec<CustomerId> = self.customers.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

/// In-memory document source for testing.
#[derive(Default)]
pub struct InMemoryDocuments {
    documents: HashMap<CustomerId, InterestProfile>,
}

impl InMemoryDocuments {
    /// Create a new empty document source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a customer's interest document.
    pub fn insert(&mut self, id: CustomerId, profile: InterestProfile) {
        self.documents.insert(id, profile);
    }
}

impl DocumentSource for InMemoryDocuments {
    async fn fetch_interest_profile(&self, id: CustomerId) -> Result<Option<InterestProfile>> {
        Ok(self.documents.get(&id).cloned())
    }
}

/// In-memory graph source for testing.
#[derive(Default)]
pub struct InMemoryGraph {
    friends: HashMap<CustomerId, Vec<FriendRef>>,
    referrals: HashMap<CustomerId, Vec<ReferralRef>>,
}

impl InMemoryGraph {
    /// Create a new empty graph source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a one-hop friend edge.
    pub fn add_friend(&mut self, id: CustomerId, friend: FriendRef) {
        self.friends.entry(id).or_default().push(friend);
    }

    /// Add a one-hop referral edge.
    pub fn add_referral(&mut self, id: CustomerId, referral: ReferralRef) {
        self.referrals.entry(id).or_default().push(referral);
    }
}

impl GraphSource for InMemoryGraph {
    async fn fetch_friends(&self, id: CustomerId) -> Result<Vec<FriendRef>> {
        Ok(self.friends.get(&id).cloned().unwrap_or_default())
    }

    async fn fetch_referrals(&self, id: CustomerId) -> Result<Vec<ReferralRef>> {
        Ok(self.referrals.get(&id).cloned().unwrap_or_default())
    }
}
