use std::num::NonZeroUsize;

use clap::{Args, Parser, Subcommand};
use userdash_business::{PageNumber, UserId};

#[derive(Parser)]
#[command(name = "userdash")]
#[command(about = "Browse users from a JSONPlaceholder-style API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Overrides for the `USERDASH_*` configuration.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Base URL of the users API
    #[arg(long, global = true, env = "USERDASH_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Attempts per fetch, including the first
    #[arg(long, global = true, env = "USERDASH_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, global = true, env = "USERDASH_RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,

    /// Users per page
    #[arg(long, global = true, env = "USERDASH_ITEMS_PER_PAGE")]
    pub items_per_page: Option<NonZeroUsize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of users
    List {
        /// Page to show (1-based)
        #[arg(long, short = 'p', default_value = "1")]
        page: PageNumber,

        /// Walk every page from the given one to the last
        #[arg(long, short = 'a')]
        all: bool,
    },
    /// Show a single user's details
    View {
        /// User ID
        id: UserId,
    },
}
