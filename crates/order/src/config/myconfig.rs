use crate::service::order::{ItemDeltaPolicy, OrderCommandConfig};
use anyhow::{Context, Result, anyhow};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub metric_port: u16,
    pub otel_endpoint: String,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub item_delta_policy: ItemDeltaPolicy,
    pub compensation_timeout: Duration,
    pub recovery_interval: Duration,
    pub intent_lease: Duration,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `init` reads the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;

        let run_migrations_str = lookup("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let metric_port = lookup("ORDER_METRIC_PORT")
            .context("Missing environment variable: ORDER_METRIC_PORT")?
            .parse::<u16>()
            .context("ORDER_METRIC_PORT must be a valid u16 integer")?;

        let otel_endpoint =
            lookup("OTEL_ENDPOINT").unwrap_or_else(|| "http://otel-collector:4317".to_string());

        let db_max_conn: u32 = lookup("DB_MAX_CONNECTION")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = lookup("DB_MIN_CONNECTION")
            .unwrap_or_else(|| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONNECTION ({}) must not exceed DB_MAX_CONNECTION ({})",
                db_min_conn,
                db_max_conn
            ));
        }

        let item_delta_policy = match lookup("ORDER_ITEM_DELTA_POLICY") {
            Some(raw) => raw
                .parse::<ItemDeltaPolicy>()
                .map_err(|e| anyhow!(e))
                .context("Invalid ORDER_ITEM_DELTA_POLICY")?,
            None => ItemDeltaPolicy::default(),
        };

        let compensation_timeout = Duration::from_secs(
            lookup("COMPENSATION_TIMEOUT_SECS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u64>()
                .context("Unable to parse COMPENSATION_TIMEOUT_SECS as u64")?,
        );

        let recovery_interval = Duration::from_secs(
            lookup("LIFECYCLE_RECOVERY_INTERVAL_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("Unable to parse LIFECYCLE_RECOVERY_INTERVAL_SECS as u64")?,
        );

        let intent_lease = Duration::from_secs(
            lookup("LIFECYCLE_INTENT_LEASE_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("Unable to parse LIFECYCLE_INTENT_LEASE_SECS as u64")?,
        );

        Ok(Self {
            database_url,
            run_migrations,
            metric_port,
            otel_endpoint,
            db_max_conn,
            db_min_conn,
            item_delta_policy,
            compensation_timeout,
            recovery_interval,
            intent_lease,
        })
    }

    pub fn order_command(&self) -> OrderCommandConfig {
        OrderCommandConfig {
            delta_policy: self.item_delta_policy,
            compensation_timeout: self.compensation_timeout,
            intent_lease: self.intent_lease,
        }
    }
}
