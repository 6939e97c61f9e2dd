//! # facility-store
//!
//! Read-only access to a collection of environmental facility records.
//!
//! ## Components
//!
//! - **Filters:** The optional named constraints a caller can supply.
//! - **Query builder:** Turns filters into a typed predicate that renders to a
//!   MongoDB filter document or evaluates in memory.
//! - **Cursor:** Opaque continuation tokens carrying a record offset.
//! - **Stores:** The [`FacilityStore`] trait with a MongoDB implementation and
//!   an in-memory one.

pub mod cursor;
pub mod error;
pub mod filters;
pub mod memory;
pub mod model;
pub mod mongo;
pub mod query;
pub mod store;

pub use cursor::{PageCursor, decode_token, encode_token};
pub use error::StoreError;
pub use filters::FacilityFilters;
pub use memory::InMemoryFacilityStore;
pub use model::{Facility, FacilitySource};
pub use mongo::{MongoFacilityStore, MongoStoreOptions, redact_credentials};
pub use query::{Field, Predicate, build_predicate};
pub use store::FacilityStore;
