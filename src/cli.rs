use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::client::{BASE_URL_ENV, ClientConfig};
use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::storage::LocalStorage;

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Calculate nutrition for a food and weight
    Calc(CalcArgs),
    /// List the foods the backend knows
    Foods,
    /// Show how a dish breaks down into ingredients
    Composition {
        food_name: String,
    },
    /// Show nutrition for a single raw ingredient
    Ingredient {
        ingredient_name: String,
    },
    /// Check that the backend is up
    Health(HealthArgs),
    /// Show saved calculations
    History {
        /// Remove all saved calculations
        #[arg(long)]
        clear: bool,
    },
    /// Prompt-driven calculator session
    Interactive,
    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Nutrition API base URL
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = ClientConfig::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "NUTRITION_API_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// File backing the saved calculation history
    #[arg(long, global = true, env = "NUTRITION_STORAGE_FILE")]
    pub storage_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    pub food_name: String,

    /// Weight in grams
    #[arg(long, short = 'w', default_value_t = 100.0, allow_negative_numbers = true)]
    pub weight: f64,

    /// Use the GET /calculate-nutrition/{food}/{weight} form
    #[arg(long)]
    pub get: bool,

    /// Include the per-ingredient nutrition table
    #[arg(long)]
    pub details: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HealthArgs {
    /// Keep polling until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Seconds between polls when watching
    #[arg(long, default_value_t = 30)]
    pub interval_secs: u64,

    /// Stop after this many polls when watching
    #[arg(long)]
    pub count: Option<usize>,
}

impl GlobalArgs {
    /// Validate CLI/environment-derived arguments.
    pub fn validate(&self) -> Result<(), String> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(format!(
                "Invalid {BASE_URL_ENV} '{}': expected an http:// or https:// URL",
                self.base_url
            ));
        }
        if self.timeout_ms == 0 {
            return Err("NUTRITION_API_TIMEOUT_MS must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.trim(), Duration::from_millis(self.timeout_ms))
    }

    pub fn local_storage(&self) -> LocalStorage {
        match &self.storage_file {
            Some(path) => LocalStorage::new(path),
            None => LocalStorage::default(),
        }
    }
}

impl HealthArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}
