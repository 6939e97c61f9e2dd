use confique::Config;
use facility_store::mongo::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use facility_store::MongoStoreOptions;
use std::time::Duration;

/// Configuration for the MongoDB facility store
#[derive(Debug, Config, Clone)]
pub struct MongoConfig {
    /// Connection string (no default; requests fail until it is set)
    #[config(env = "FACILITIES_MONGODB_URI")]
    pub uri: Option<String>,

    /// Database holding the facility collection (default: epaDump)
    #[config(env = "FACILITIES_MONGODB_DATABASE", default = "epaDump")]
    pub database: String,

    /// Facility collection name (default: facilities)
    #[config(env = "FACILITIES_MONGODB_COLLECTION", default = "facilities")]
    pub collection: String,

    /// Connection establishment timeout in seconds (default: 30)
    #[config(env = "FACILITIES_MONGODB_CONNECT_TIMEOUT", default = 30)]
    pub connect_timeout: u64,

    /// Per-operation timeout in seconds (default: 45)
    #[config(env = "FACILITIES_MONGODB_OPERATION_TIMEOUT", default = 45)]
    pub operation_timeout: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            connect_timeout: 30,
            operation_timeout: 45,
        }
    }
}

impl MongoConfig {
    /// Converts the configuration into store connection options
    pub fn to_options(&self) -> MongoStoreOptions {
        MongoStoreOptions {
            uri: self.uri.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            operation_timeout: Duration::from_secs(self.operation_timeout),
        }
    }
}
