//! Configuration and dashboard helpers shared by the subcommands.

use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::instrument;
use userdash_business::{BusinessConfig, ClientState, OperationKind, UserDashboard};

use crate::cli::ConfigArgs;

/// `USERDASH_*` environment with command-line flags layered on top.
pub fn build_config(args: &ConfigArgs) -> Result<BusinessConfig> {
    let config = BusinessConfig::from_env().context("Invalid USERDASH_* environment")?;
    apply_args(config, args)
}

fn apply_args(mut config: BusinessConfig, args: &ConfigArgs) -> Result<BusinessConfig> {
    if let Some(url) = &args.api_base_url {
        config = config
            .with_api_base_url(url)
            .context("Invalid --api-base-url")?;
    }
    if let Some(retries) = args.max_retries {
        config = config
            .with_max_retries(retries)
            .context("Invalid --max-retries")?;
    }
    if let Some(ms) = args.retry_delay_ms {
        config = config.with_retry_delay(Duration::from_millis(ms));
    }
    if let Some(size) = args.items_per_page {
        config = config.with_items_per_page(size);
    }
    Ok(config)
}

/// Await every in-flight fetch and apply its outcome.
#[instrument(skip_all, name = "flush")]
pub async fn flush_and_await(dashboard: &mut UserDashboard) {
    dashboard.flush().await;
}

/// Turns a rejected operation into an error carrying its message.
pub fn ensure_settled(state: &ClientState, operation: OperationKind) -> Result<()> {
    match state.status(operation).error_message() {
        Some(message) => anyhow::bail!("{message}"),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn flags_override_config() {
        let args = ConfigArgs {
            api_base_url: Some("http://localhost:3000/".to_owned()),
            max_retries: Some(5),
            retry_delay_ms: Some(10),
            items_per_page: NonZeroUsize::new(2),
        };

        let config = apply_args(BusinessConfig::default(), &args).expect("valid flags");

        assert_eq!(config.api_url().as_str(), "http://localhost:3000");
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.retry_delay(), Duration::from_millis(10));
        assert_eq!(config.items_per_page().get(), 2);
    }

    #[test]
    fn zero_retries_flag_is_rejected() {
        let args = ConfigArgs {
            max_retries: Some(0),
            ..ConfigArgs::default()
        };
        assert!(apply_args(BusinessConfig::default(), &args).is_err());
    }

    #[test]
    fn no_flags_keep_config() {
        let config =
            apply_args(BusinessConfig::default(), &ConfigArgs::default()).expect("no flags");
        assert_eq!(config, BusinessConfig::default());
    }
}
