use crate::core::ConfigProvider;
use crate::core::places::DEFAULT_COLLECTION;
use crate::domain::model::DEFAULT_PLACEHOLDER_IMAGE_URL;
use crate::utils::error::{PlacesError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    pub identity: Option<IdentityConfig>,
    pub listing: Option<ListingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub collection: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub placeholder_image_url: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PlacesError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the variable's value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("store.base_url", &self.store.base_url)?;
        validation::validate_path_segment("store.collection", self.collection())?;

        if let Some(timeout) = self.store.timeout_seconds {
            validation::validate_range("store.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_url(
            "listing.placeholder_image_url",
            self.placeholder_image_url(),
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.store.base_url
    }

    fn collection(&self) -> &str {
        self.store.collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.store.timeout_seconds.map(Duration::from_secs)
    }

    fn user_id(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .and_then(|identity| identity.user_id.as_deref())
            // an unset ${VAR} survives substitution verbatim
            .filter(|id| !env_var_pattern().is_match(id))
    }

    fn placeholder_image_url(&self) -> &str {
        self.listing
            .as_ref()
            .and_then(|listing| listing.placeholder_image_url.as_deref())
            .unwrap_or(DEFAULT_PLACEHOLDER_IMAGE_URL)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
