//! Profile aggregation: fan-out to the three sources, fan-in to one record.

use crate::error::{Error, Result};
use crate::profile::{ConsolidatedProfile, CustomerId, FriendRef, InterestProfile, ReferralRef};
use crate::sources::{DocumentSource, GraphSource, RelationalSource};

/// Orchestrates the three source adapters for one customer identifier and
/// merges their results into a single [`ConsolidatedProfile`].
///
/// The customer existence check is the only step whose absence is fatal: no
/// customer, no profile, and failing fast avoids wasted fan-out. Once the
/// check succeeds, the enrichment queries run concurrently and each returns
/// its own independent result; a single merge step assembles the profile
/// after all of them are in. No shared mutable accumulator, so no locks.
///
/// Enrichment from the document and graph stores is best-effort: "no data
/// yet" and a transient store failure both come back as empty collections,
/// logged in the failure case. The purchases query rides the same mandatory
/// relational store as the existence check, so its transport failures are
/// fatal to the call.
pub struct Aggregator<R, D, G> {
    relational: R,
    documents: D,
    graph: G,
}

impl<R, D, G> Aggregator<R, D, G>
where
    R: RelationalSource,
    D: DocumentSource,
    G: GraphSource,
{
    /// Create an aggregator over the three injected source adapters.
    ///
    /// The hosting service owns the underlying connections; adapters are
    /// handles onto them.
    pub fn new(relational: R, documents: D, graph: G) -> Self {
        Aggregator {
            relational,
            documents,
            graph,
        }
    }

    /// Build the consolidated profile for one customer.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the customer has no relational row; nothing
    ///   else is queried in that case.
    /// - `Error::SourceUnavailable` if a mandatory relational query fails.
    pub async fn aggregate(&self, id: CustomerId) -> Result<ConsolidatedProfile> {
        // Mandatory existence check, before any fan-out.
        let customer = self
            .relational
            .fetch_customer(id)
            .await?
            .ok_or(Error::NotFound(id))?;

        debug!("» Aggregating profile for customer {}", id);

        // Fan-out: the three enrichment legs are independent of each other.
        // Fan-in waits for all of them; no early cancellation.
        let (purchases, interest_profile, (friends, referrals)) = tokio::join!(
            self.relational.fetch_purchases(id),
            self.interests_best_effort(id),
            self.social_best_effort(id),
        );

        let purchases = purchases?;

        Ok(ConsolidatedProfile::from_sources(
            customer,
            purchases,
            interest_profile,
            friends,
            referrals,
        ))
    }

    /// Enumerate every known customer identifier.
    ///
    /// The relational store is the source of truth for which customers
    /// exist; the bulk rebuild walks this listing.
    ///
    /// # Errors
    /// Returns `Err` if the relational store is unavailable.
    pub async fn customer_ids(&self) -> Result<Vec<CustomerId>> {
        self.relational.list_customer_ids().await
    }

    /// Interest document lookup, degraded to empty on absence or failure.
    async fn interests_best_effort(&self, id: CustomerId) -> InterestProfile {
        match self.documents.fetch_interest_profile(id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => InterestProfile::default(),
            Err(e) => {
                warn!(
                    "Interest enrichment for customer {} degraded to empty: {}",
                    id, e
                );
                InterestProfile::default()
            }
        }
    }

    /// Graph traversals, each degraded to empty independently on failure.
    async fn social_best_effort(&self, id: CustomerId) -> (Vec<FriendRef>, Vec<ReferralRef>) {
        let (friends, referrals) = tokio::join!(
            self.graph.fetch_friends(id),
            self.graph.fetch_referrals(id),
        );

        let friends = friends.unwrap_or_else(|e| {
            warn!(
                "Friend enrichment for customer {} degraded to empty: {}",
                id, e
            );
            Vec::new()
        });
        let referrals = referrals.unwrap_or_else(|e| {
            warn!(
                "Referral enrichment for customer {} degraded to empty: {}",
                id, e
            );
            Vec::new()
        });

        (friends, referrals)
    }
}
