use crate::core::places::DEFAULT_COLLECTION;
use crate::core::ConfigProvider;
use crate::domain::model::{parse_instant, DEFAULT_PLACEHOLDER_IMAGE_URL};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://ionic-airbnb-3fe1e.firebaseio.com";

#[derive(Debug, Clone, Parser)]
#[command(name = "places")]
#[command(about = "Browse and edit place listings in a remote JSON store")]
pub struct CliConfig {
    /// Read store and identity settings from a TOML file instead of flags
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, global = true, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    #[arg(long, global = true, default_value = "30")]
    pub timeout_seconds: u64,

    /// Owner recorded on places you create
    #[arg(long, global = true)]
    pub user_id: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_PLACEHOLDER_IMAGE_URL)]
    pub placeholder_image_url: String,

    /// Print places as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every place in the store
    List,
    /// Show one place
    Get { id: String },
    /// Offer a new place
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        /// RFC 3339 instant or YYYY-MM-DD
        #[arg(long, value_parser = parse_date_arg)]
        from: DateTime<Utc>,
        /// RFC 3339 instant or YYYY-MM-DD
        #[arg(long, value_parser = parse_date_arg)]
        to: DateTime<Utc>,
    },
    /// Change the title and description of a place
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
}

fn parse_date_arg(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_instant(value).map_err(|e| e.to_string())
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    fn request_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.timeout_seconds))
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn placeholder_image_url(&self) -> &str {
        &self.placeholder_image_url
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path_segment("collection", &self.collection)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validation::validate_url("placeholder_image_url", &self.placeholder_image_url)?;
        if let Some(user_id) = &self.user_id {
            validation::validate_non_empty_string("user_id", user_id)?;
        }
        Ok(())
    }
}
