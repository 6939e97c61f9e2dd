use crate::error::StoreError;
use crate::model::Facility;
use crate::query::Predicate;
use crate::store::FacilityStore;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Facility store over a fixed set of records held in memory.
///
/// Evaluates the same [`Predicate`] the MongoDB store renders, so handlers
/// can be exercised without a database. Clones share the records and the
/// call counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFacilityStore {
    facilities: Arc<Vec<Facility>>,
    failure: Option<StoreError>,
    count_calls: Arc<AtomicUsize>,
}

impl InMemoryFacilityStore {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self {
            facilities: Arc::new(facilities),
            ..Default::default()
        }
    }

    /// Makes every operation fail with the given error
    pub fn failing_with(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of times [`FacilityStore::count`] has been called
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FacilityStore for InMemoryFacilityStore {
    async fn find_page(
        &self,
        predicate: &Predicate,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Facility>, StoreError> {
        self.check_available()?;

        let mut matching: Vec<&Facility> = self
            .facilities
            .iter()
            .filter(|facility| predicate.matches(facility))
            .collect();
        // stable, so records sharing a timestamp keep insertion order
        matching.sort_by_key(|facility| Reverse(facility.created_at));

        Ok(matching
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self
            .facilities
            .iter()
            .filter(|facility| predicate.matches(facility))
            .count() as u64)
    }

    async fn find_first(&self, predicate: &Predicate) -> Result<Option<Facility>, StoreError> {
        self.check_available()?;

        Ok(self
            .facilities
            .iter()
            .find(|facility| predicate.matches(facility))
            .cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
