use crate::core::cache::{PlaceCache, PlacesSnapshot};
use crate::core::{HttpClient, IdentityProvider, NewPlace, Place, PlaceData};
use crate::domain::model::{CreatedKey, DEFAULT_PLACEHOLDER_IMAGE_URL};
use crate::utils::error::{PlacesError, Result};
use crate::utils::validation::validate_record_id;
use std::collections::BTreeMap;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub const DEFAULT_COLLECTION: &str = "offered-places";

/// Listing store: keeps the held collection in step with the remote
/// document store.
pub struct PlacesService<H: HttpClient, I: IdentityProvider> {
    http: H,
    identity: I,
    cache: PlaceCache,
    collection: String,
    placeholder_image_url: String,
}

impl<H: HttpClient, I: IdentityProvider> PlacesService<H, I> {
    pub fn new(http: H, identity: I) -> Self {
        Self {
            http,
            identity,
            cache: PlaceCache::new(),
            collection: DEFAULT_COLLECTION.to_string(),
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_placeholder_image(mut self, image_url: impl Into<String>) -> Self {
        self.placeholder_image_url = image_url.into();
        self
    }

    /// Watch the held collection. The receiver starts at the latest snapshot.
    pub fn places(&self) -> watch::Receiver<PlacesSnapshot> {
        self.cache.subscribe()
    }

    /// Stream of snapshots, beginning with the current one.
    pub fn places_stream(&self) -> WatchStream<PlacesSnapshot> {
        WatchStream::new(self.cache.subscribe())
    }

    pub fn snapshot(&self) -> PlacesSnapshot {
        self.cache.snapshot()
    }

    fn collection_path(&self) -> String {
        format!("{}.json", self.collection)
    }

    fn place_path(&self, id: &str) -> Result<String> {
        validate_record_id(id)?;
        Ok(format!("{}/{}.json", self.collection, id))
    }

    /// Fetch every place and make the result the held collection.
    pub async fn fetch_places(&self) -> Result<Vec<Place>> {
        let path = self.collection_path();
        tracing::debug!("Fetching all places from {}", path);

        let value = self.http.get(&path).await?;
        let bodies: Option<BTreeMap<String, serde_json::Value>> = serde_json::from_value(value)?;

        // one malformed record does not hide the rest
        let places: Vec<Place> = bodies
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, body)| match serde_json::from_value::<PlaceData>(body) {
                Ok(data) => Some(data.into_place(id)),
                Err(e) => {
                    tracing::warn!("Skipping malformed place {}: {}", id, e);
                    None
                }
            })
            .collect();

        self.cache.replace(places.clone());
        tracing::info!("Loaded {} places", places.len());
        Ok(places)
    }

    /// Fetch one place. The held collection is left alone.
    pub async fn get_place(&self, id: &str) -> Result<Place> {
        let path = self.place_path(id)?;
        tracing::debug!("Fetching place {} from {}", id, path);

        let value = match self.http.get(&path).await {
            Ok(value) => value,
            Err(PlacesError::Status { status: 404, .. }) => {
                return Err(PlacesError::NotFound { id: id.to_string() })
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_value::<Option<PlaceData>>(value)? {
            Some(data) => Ok(data.into_place(id)),
            None => {
                tracing::warn!("Place {} does not exist", id);
                Err(PlacesError::NotFound { id: id.to_string() })
            }
        }
    }

    /// Create a place owned by the current user. It joins the held
    /// collection only once the store has assigned its id.
    pub async fn add_place(&self, new_place: NewPlace) -> Result<Place> {
        let user_id = self
            .identity
            .user_id()
            .ok_or(PlacesError::Unauthenticated)?;

        let data = new_place.into_data(&self.placeholder_image_url, user_id);
        let body = serde_json::to_value(&data)?;

        let path = self.collection_path();
        tracing::debug!("Creating place '{}' at {}", data.title, path);
        let response = self.http.post(&path, body).await?;
        let created: CreatedKey = serde_json::from_value(response)?;

        let place = data.into_place(created.name);
        // a list-all that finished meanwhile may already hold the new id
        self.cache.modify(|places| {
            match places.iter_mut().find(|held| held.id == place.id) {
                Some(held) => *held = place.clone(),
                None => places.push(place.clone()),
            }
            Ok(())
        })?;

        tracing::info!("Created place {}", place.id);
        Ok(place)
    }

    /// Load the collection from the store if nothing is held yet.
    pub async fn ensure_loaded(&self) -> Result<PlacesSnapshot> {
        let snapshot = self.cache.snapshot();
        if !snapshot.is_empty() {
            return Ok(snapshot);
        }

        tracing::debug!("Held collection is empty, fetching");
        self.fetch_places().await?;
        Ok(self.cache.snapshot())
    }

    /// Overwrite title and description of a held place. The place must
    /// already be in the held collection; see `ensure_loaded`.
    pub async fn update_place(&self, id: &str, title: &str, description: &str) -> Result<Place> {
        let path = self.place_path(id)?;
        let updated = self
            .cache
            .snapshot()
            .get(id)
            .map(|old| old.with_text(title, description))
            .ok_or_else(|| {
                tracing::warn!("Cannot update unknown place {}", id);
                PlacesError::NotFound { id: id.to_string() }
            })?;

        tracing::debug!("Updating place {} at {}", id, path);
        let body = serde_json::to_value(updated.to_data())?;
        self.http.put(&path, body).await?;

        self.cache.modify(|places| {
            let slot = places
                .iter_mut()
                .find(|place| place.id == id)
                .ok_or_else(|| PlacesError::NotFound { id: id.to_string() })?;
            *slot = updated.clone();
            Ok(())
        })?;

        tracing::info!("Updated place {}", id);
        Ok(updated)
    }
}
