use crate::error::StoreError;
use crate::model::Facility;
use crate::query::Predicate;
use crate::store::FacilityStore;
use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use log::{debug, error, info};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::future::{Future, IntoFuture};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::timeout;
use url::Url;

pub const DEFAULT_DATABASE: &str = "epaDump";
pub const DEFAULT_COLLECTION: &str = "facilities";

/// Connection settings for [`MongoFacilityStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct MongoStoreOptions {
    /// Connection string. Without one every operation fails with a
    /// configuration error.
    pub uri: Option<String>,
    /// Database holding the collection, regardless of any database named in the URI
    pub database: String,
    pub collection: String,
    /// Bound on establishing the connection, including server selection
    pub connect_timeout: Duration,
    /// Bound on every individual store operation
    pub operation_timeout: Duration,
}

impl Default for MongoStoreOptions {
    fn default() -> Self {
        Self {
            uri: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            connect_timeout: Duration::from_secs(30),
            operation_timeout: Duration::from_secs(45),
        }
    }
}

struct Connection {
    database: Database,
    facilities: Collection<Facility>,
}

/// MongoDB-backed facility store.
///
/// The connection is established on first use and then shared by every
/// request. A failed attempt leaves nothing cached, so the next request
/// tries again.
pub struct MongoFacilityStore {
    options: MongoStoreOptions,
    connection: OnceCell<Connection>,
}

impl std::fmt::Debug for MongoFacilityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoFacilityStore")
            .field("uri", &self.redacted_uri())
            .field("database", &self.options.database)
            .field("collection", &self.options.collection)
            .field("connected", &self.connection.initialized())
            .finish()
    }
}

impl MongoFacilityStore {
    pub fn new(options: MongoStoreOptions) -> Self {
        Self {
            options,
            connection: OnceCell::new(),
        }
    }

    /// The configured URI with any password masked, safe to log
    pub fn redacted_uri(&self) -> Option<String> {
        self.options.uri.as_deref().map(redact_credentials)
    }

    async fn connection(&self) -> Result<&Connection, StoreError> {
        self.connection
            .get_or_try_init(|| async {
                self.connect().await.inspect_err(|e| {
                    error!("Failed to connect to facility store: {}", e);
                })
            })
            .await
    }

    async fn connect(&self) -> Result<Connection, StoreError> {
        let uri = self
            .options
            .uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| StoreError::Config("MongoDB connection URI is not set".to_string()))?;

        info!(
            "Connecting to facility store at {} (database: {}, collection: {})",
            redact_credentials(uri),
            self.options.database,
            self.options.collection
        );

        let mut client_options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Config(format!("Invalid MongoDB URI: {}", e)))?;
        client_options.app_name = Some("facility-server".to_string());
        client_options.connect_timeout = Some(self.options.connect_timeout);
        client_options.server_selection_timeout = Some(self.options.connect_timeout);
        client_options.max_idle_time = Some(self.options.operation_timeout);

        let client = Client::with_options(client_options)?;
        let database = client.database(&self.options.database);

        // The driver connects lazily, a ping forces server selection now
        match timeout(
            self.options.connect_timeout,
            database.run_command(doc! { "ping": 1 }),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(StoreError::Connection(e.to_string())),
            Err(_) => {
                return Err(StoreError::Timeout(format!(
                    "connection not established after {} seconds",
                    self.options.connect_timeout.as_secs()
                )));
            }
        }

        info!(
            "Facility store connected (database: {}, collection: {})",
            self.options.database, self.options.collection
        );

        let facilities = database.collection::<Facility>(&self.options.collection);
        Ok(Connection {
            database,
            facilities,
        })
    }

    /// Runs a store operation under the configured operation timeout
    async fn bounded<T, F>(&self, operation: &str, future: F) -> Result<T, StoreError>
    where
        F: Future<Output = mongodb::error::Result<T>>,
    {
        match timeout(self.options.operation_timeout, future).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(format!(
                "{} did not complete within {} seconds",
                operation,
                self.options.operation_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl FacilityStore for MongoFacilityStore {
    async fn find_page(
        &self,
        predicate: &Predicate,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Facility>, StoreError> {
        let connection = self.connection().await?;
        let filter = predicate.to_document();
        debug!("find facilities: filter={} skip={} limit={}", filter, skip, limit);

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.bounded("find", async {
            connection
                .facilities
                .find(filter)
                .sort(doc! { "createdAt": -1 })
                .skip(skip)
                .limit(limit)
                .await?
                .try_collect::<Vec<Facility>>()
                .await
        })
        .await
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        let connection = self.connection().await?;
        let filter = predicate.to_document();
        debug!("count facilities: filter={}", filter);

        self.bounded("count", connection.facilities.count_documents(filter).into_future())
            .await
    }

    async fn find_first(&self, predicate: &Predicate) -> Result<Option<Facility>, StoreError> {
        let connection = self.connection().await?;
        let filter = predicate.to_document();
        debug!("find one facility: filter={}", filter);

        self.bounded("find_one", connection.facilities.find_one(filter).into_future())
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let connection = self.connection().await?;
        self.bounded(
            "ping",
            connection.database.run_command(doc! { "ping": 1 }).into_future(),
        )
        .await
        .map(|_| ())
    }
}

/// Masks the password in a connection string.
///
/// Multi-host MongoDB URIs are not valid URLs, so those fall back to masking
/// the text between the first `:` of the user info and the `@`.
pub fn redact_credentials(uri: &str) -> String {
    if let Ok(mut url) = Url::parse(uri) {
        if url.password().is_some() && url.set_password(Some("****")).is_ok() {
            return url.to_string();
        }
        if url.has_host() {
            return url.to_string();
        }
    }

    let Some(scheme_end) = uri.find("://").map(|i| i + 3) else {
        return uri.to_string();
    };
    let Some(at) = uri[scheme_end..].find('@').map(|i| i + scheme_end) else {
        return uri.to_string();
    };
    match uri[scheme_end..at].find(':').map(|i| i + scheme_end) {
        Some(colon) => format!("{}:****{}", &uri[..colon], &uri[at..]),
        None => uri.to_string(),
    }
}
