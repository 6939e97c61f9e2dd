use crate::config::mongodb::MongoConfig;
use confique::Config;

pub mod mongodb;

/// Main configuration structure for the facilities server
#[derive(Debug, Config, Clone)]
pub struct FacilitiesConfig {
    /// The port the server listens on (default: 3000)
    #[config(env = "FACILITIES_PORT", default = 3000)]
    pub port: u16,

    /// Deployment environment; `production` hides internal error details
    /// (default: development)
    #[config(env = "FACILITIES_ENVIRONMENT", default = "development")]
    pub environment: String,

    /// Comma-separated list of origins allowed by CORS, `*` for any (default: *)
    #[config(env = "FACILITIES_ALLOWED_ORIGINS", default = "*")]
    pub allowed_origins: String,

    /// Timeout for the readiness check in seconds (default: 3)
    #[config(env = "FACILITIES_HEALTHCHECK_TIMEOUT", default = 3)]
    pub healthcheck_timeout: u64,

    /// MongoDB store configuration
    #[config(nested)]
    pub mongodb: MongoConfig,
}

impl Default for FacilitiesConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            allowed_origins: "*".to_string(),
            healthcheck_timeout: 3,
            mongodb: MongoConfig::default(),
        }
    }
}

impl FacilitiesConfig {
    /// Creates a new configuration from environment variables
    pub fn new() -> Result<Self, String> {
        Self::builder().env().load().map_err(|e| e.to_string())
    }

    pub fn is_production(&self) -> bool {
        self.environment.trim().eq_ignore_ascii_case("production")
    }

    /// Get allowed CORS origins as a vector
    pub fn get_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
