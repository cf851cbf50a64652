use std::time::Duration;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Default AWS region, matching the deployment this tool grew up next to.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Default work-pool table name; override with `POOLWATCH_TABLE`.
pub const DEFAULT_TABLE: &str = "converter-work-pool";

/// Floor for the work-pool poll interval.
pub const MIN_POOL_INTERVAL: Duration = Duration::from_secs(5);

/// Floor for the queue-metrics poll interval.
pub const MIN_QUEUE_INTERVAL: Duration = Duration::from_secs(10);

/// Default work-pool poll interval (expiry needs a tight cadence).
pub const DEFAULT_POOL_INTERVAL: Duration = Duration::from_secs(5);

/// Default queue-metrics poll interval.
pub const DEFAULT_QUEUE_INTERVAL: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// How the monitor authenticates against AWS.
///
/// Resolved exactly once at startup into a single [`SdkConfig`] that every
/// client shares; nothing looks credentials up ambiently after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A static key pair, optionally with a session token for temporary
    /// credentials.
    Explicit {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },

    /// A named profile from the shared AWS config files.
    Profile { name: String },

    /// The SDK's standard provider chain (env vars, shared config, IMDS).
    Default,
}

impl Credentials {
    /// Resolve credentials from the process environment.
    ///
    /// A configured `AWS_PROFILE` wins; otherwise an explicit key pair is
    /// used when both halves are present; otherwise the default chain.
    pub fn from_env() -> Self {
        Self::from_parts(
            non_empty(std::env::var("AWS_PROFILE").ok()),
            non_empty(std::env::var("AWS_ACCESS_KEY_ID").ok()),
            non_empty(std::env::var("AWS_SECRET_ACCESS_KEY").ok()),
            non_empty(std::env::var("AWS_SESSION_TOKEN").ok()),
        )
    }

    fn from_parts(
        profile: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        session_token: Option<String>,
    ) -> Self {
        if let Some(name) = profile {
            return Self::Profile { name };
        }

        match (access_key_id, secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Self::Explicit {
                access_key_id,
                secret_access_key,
                session_token,
            },
            // An incomplete pair falls through to the default chain rather
            // than failing; the SDK reports the real problem on first call.
            _ => Self::Default,
        }
    }

    /// Build the one shared SDK config for the given region.
    pub async fn resolve(&self, region: &str) -> SdkConfig {
        let loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        let loader = match self {
            Self::Explicit {
                access_key_id,
                secret_access_key,
                session_token,
            } => loader.credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                "poolwatch-explicit",
            )),
            Self::Profile { name } => loader.profile_name(name),
            Self::Default => loader,
        };

        loader.load().await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Monitor targets and cadence, assembled once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub region: String,
    /// DynamoDB work-pool table to scan.
    pub table: String,
    /// SQS queue names to watch; empty means watch every queue in the
    /// account/region.
    pub queues: Vec<String>,
    pub pool_interval: Duration,
    pub queue_interval: Duration,
}

impl Settings {
    /// Clamp both intervals to their floors.
    pub fn clamp_intervals(mut self) -> Self {
        self.pool_interval = self.pool_interval.max(MIN_POOL_INTERVAL);
        self.queue_interval = self.queue_interval.max(MIN_QUEUE_INTERVAL);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            table: std::env::var("POOLWATCH_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string()),
            queues: Vec::new(),
            pool_interval: DEFAULT_POOL_INTERVAL,
            queue_interval: DEFAULT_QUEUE_INTERVAL,
        }
    }
}
