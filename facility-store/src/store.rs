use crate::error::StoreError;
use crate::model::Facility;
use crate::query::Predicate;
use async_trait::async_trait;

/// Read access to the facility collection.
///
/// Implementations are shared across request handlers, so they must be
/// `Send + Sync`. All methods are reads; none of them mutate the collection.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Returns up to `limit` matching records, newest first, after skipping
    /// `skip` of them
    async fn find_page(
        &self,
        predicate: &Predicate,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Facility>, StoreError>;

    /// Counts the records matching the predicate
    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Returns the first matching record in the store's natural order
    async fn find_first(&self, predicate: &Predicate) -> Result<Option<Facility>, StoreError>;

    /// Checks that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
