/**
 * Inventory Items
 *
 * Types, CRUD service, and cached collection for inventory items.
 * Updates use PATCH semantics: only the fields present in the payload
 * are sent.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::transport::ApiClient;

const ENDPOINT: &str = "/items/";

/// Which program an item's stock is allocated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationType {
    /// Training Center
    #[serde(rename = "TRAINING")]
    Training,
    /// NC II Assessment
    #[serde(rename = "NC2")]
    Nc2,
}

/// An inventory item as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    /// e.g. bottles, pieces, towels
    pub unit: String,
    pub allocation_type: AllocationType,
    /// Human-readable allocation label, read-only from the backend
    pub allocation_type_display: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an item
#[derive(Debug, Clone, Serialize)]
pub struct ItemCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to 0 server-side when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub unit: String,
    pub allocation_type: AllocationType,
}

/// Payload for partially updating an item
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_type: Option<AllocationType>,
}

/// Stateless item API client.
#[derive(Debug, Clone)]
pub struct ItemService {
    api: ApiClient,
}

impl ItemService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Retrieve all items.
    pub async fn list(&self) -> Result<Vec<Item>, ApiError> {
        self.api.get_json(ENDPOINT).await
    }

    /// Retrieve a single item by id.
    pub async fn get(&self, id: i64) -> Result<Item, ApiError> {
        self.api.get_json(&format!("{}{}/", ENDPOINT, id)).await
    }

    /// Create a new item.
    pub async fn create(&self, payload: &ItemCreate) -> Result<Item, ApiError> {
        self.api.post_json(ENDPOINT, payload).await
    }

    /// Partially update an item.
    pub async fn update(&self, id: i64, payload: &ItemUpdate) -> Result<Item, ApiError> {
        self.api
            .patch_json(&format!("{}{}/", ENDPOINT, id), payload)
            .await
    }

    /// Delete an item.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("{}{}/", ENDPOINT, id)).await
    }
}

/// Client-side item list that mirrors server mutations, for list views.
///
/// Successful calls update the cached list in place (append on create,
/// replace-by-id on update, remove-by-id on delete), so the UI does not
/// re-fetch after every mutation. Failures record a display message and
/// propagate the error.
#[derive(Debug)]
pub struct ItemCollection {
    service: ItemService,
    items: Vec<Item>,
    current: Option<Item>,
    error: Option<String>,
}

impl ItemCollection {
    pub fn new(service: ItemService) -> Self {
        Self {
            service,
            items: Vec::new(),
            current: None,
            error: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn current(&self) -> Option<&Item> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Re-fetch the whole list. The failure message is recorded rather
    /// than propagated; a list view has nowhere better to put it.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.error = None;
        match self.service.list().await {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to fetch inventory items."));
                Err(err)
            }
        }
    }

    /// Fetch one item and make it the current selection.
    pub async fn fetch(&mut self, id: i64) -> Result<Item, ApiError> {
        self.error = None;
        match self.service.get(id).await {
            Ok(item) => {
                self.current = Some(item.clone());
                Ok(item)
            }
            Err(err) => {
                self.error = Some(display_message(&err, &format!("Failed to fetch item {}.", id)));
                Err(err)
            }
        }
    }

    /// Create an item and append it to the cached list.
    pub async fn create(&mut self, payload: &ItemCreate) -> Result<Item, ApiError> {
        self.error = None;
        match self.service.create(payload).await {
            Ok(item) => {
                self.items.push(item.clone());
                Ok(item)
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to create item."));
                Err(err)
            }
        }
    }

    /// Update an item and replace it in the cached list.
    pub async fn update(&mut self, id: i64, payload: &ItemUpdate) -> Result<Item, ApiError> {
        self.error = None;
        match self.service.update(id, payload).await {
            Ok(item) => {
                if let Some(slot) = self.items.iter_mut().find(|existing| existing.id == id) {
                    *slot = item.clone();
                }
                if self.current.as_ref().is_some_and(|current| current.id == id) {
                    self.current = Some(item.clone());
                }
                Ok(item)
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to update item."));
                Err(err)
            }
        }
    }

    /// Delete an item and drop it from the cached list.
    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        self.error = None;
        match self.service.delete(id).await {
            Ok(()) => {
                self.items.retain(|item| item.id != id);
                if self.current.as_ref().is_some_and(|current| current.id == id) {
                    self.current = None;
                }
                Ok(())
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to delete item."));
                Err(err)
            }
        }
    }
}

/// Prefer the server's own message (DRF validation bodies included),
/// falling back to a generic one.
pub(crate) fn display_message(err: &ApiError, fallback: &str) -> String {
    err.detail()
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_string())
}
