use crate::utils::error::{PlacesError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://i.pinimg.com/originals/65/8f/77/658f77b9b527f89922ba996560a3e2b0.jpg";

/// A listing as held by the client, keyed by the id the store assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    #[serde(with = "iso8601")]
    pub available_from: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub available_to: DateTime<Utc>,
    pub owner_id: String,
}

/// Record body as stored remotely. The id lives in the key or URL, never
/// in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceData {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    #[serde(with = "iso8601")]
    pub available_from: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub available_to: DateTime<Utc>,
    pub user_id: String,
}

impl PlaceData {
    pub fn into_place(self, id: impl Into<String>) -> Place {
        Place {
            id: id.into(),
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            available_from: self.available_from,
            available_to: self.available_to,
            owner_id: self.user_id,
        }
    }
}

impl Place {
    pub fn to_data(&self) -> PlaceData {
        PlaceData {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
            available_from: self.available_from,
            available_to: self.available_to,
            user_id: self.owner_id.clone(),
        }
    }

    /// Copy with new title and description; everything else is kept.
    pub fn with_text(&self, title: &str, description: &str) -> Place {
        Place {
            title: title.to_string(),
            description: description.to_string(),
            ..self.clone()
        }
    }
}

/// Caller-supplied fields for a new listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
}

impl NewPlace {
    pub fn into_data(self, image_url: &str, user_id: String) -> PlaceData {
        PlaceData {
            title: self.title,
            description: self.description,
            image_url: image_url.to_string(),
            price: self.price,
            available_from: self.available_from,
            available_to: self.available_to,
            user_id,
        }
    }
}

/// Response of an append: the key the store generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedKey {
    pub name: String,
}

/// Accepts RFC 3339 instants or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| PlacesError::InvalidInput {
            field: "date".to_string(),
            value: value.to_string(),
            reason: "expected RFC 3339 or YYYY-MM-DD".to_string(),
        })
}

/// ISO-8601 with millisecond precision and a `Z` suffix, the shape browser
/// clients write into the store.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
