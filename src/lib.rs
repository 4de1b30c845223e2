pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::{http::ReqwestHttpClient, identity::StaticIdentity};
pub use crate::config::TomlConfig;
pub use crate::core::cache::{PlaceCache, PlacesSnapshot};
pub use crate::core::places::PlacesService;
pub use crate::domain::model::{NewPlace, Place, PlaceData};
pub use crate::utils::error::{PlacesError, Result};
