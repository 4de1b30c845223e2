pub mod cache;
pub mod places;

pub use crate::domain::model::{NewPlace, Place, PlaceData};
pub use crate::domain::ports::{ConfigProvider, HttpClient, IdentityProvider};
pub use crate::utils::error::Result;
