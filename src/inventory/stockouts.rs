/**
 * Stock-Out Transactions
 *
 * Types, CRUD service, and cached collection for stock-out transactions.
 * Creating a transaction makes the backend deduct the released quantity
 * from the item, so callers should re-fetch items they display after a
 * successful create.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::inventory::items::display_message;
use crate::transport::ApiClient;

const ENDPOINT: &str = "/stock-outs/";

/// A stock-out transaction as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOutTransaction {
    pub id: i64,
    /// Id of the released item
    pub item: i64,
    /// Denormalized item name, read-only from the backend
    pub item_name: String,
    /// Denormalized item unit, read-only from the backend
    pub item_unit: String,
    pub quantity_deducted: u32,
    pub release_date: DateTime<Utc>,
    /// Reason for the stock-out or recipient
    pub remarks: Option<String>,
    /// Id of the releasing user; the backend sets this from the request
    pub released_by: Option<i64>,
    /// Denormalized user name, read-only from the backend
    pub released_by_name: String,
}

/// Payload for creating a stock-out transaction
#[derive(Debug, Clone, Serialize)]
pub struct StockOutCreate {
    pub item: i64,
    pub quantity_deducted: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Payload for partially updating a transaction (typically remarks only;
/// changing the deducted quantity after the fact is discouraged)
#[derive(Debug, Clone, Default, Serialize)]
pub struct StockOutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_deducted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Stateless stock-out API client.
#[derive(Debug, Clone)]
pub struct StockOutService {
    api: ApiClient,
}

impl StockOutService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Retrieve all stock-out transactions.
    pub async fn list(&self) -> Result<Vec<StockOutTransaction>, ApiError> {
        self.api.get_json(ENDPOINT).await
    }

    /// Retrieve a single transaction by id.
    pub async fn get(&self, id: i64) -> Result<StockOutTransaction, ApiError> {
        self.api.get_json(&format!("{}{}/", ENDPOINT, id)).await
    }

    /// Create a new transaction; the backend deducts the item quantity.
    pub async fn create(&self, payload: &StockOutCreate) -> Result<StockOutTransaction, ApiError> {
        self.api.post_json(ENDPOINT, payload).await
    }

    /// Partially update a transaction.
    pub async fn update(
        &self,
        id: i64,
        payload: &StockOutUpdate,
    ) -> Result<StockOutTransaction, ApiError> {
        self.api
            .patch_json(&format!("{}{}/", ENDPOINT, id), payload)
            .await
    }

    /// Delete a transaction.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("{}{}/", ENDPOINT, id)).await
    }
}

/// Client-side transaction list mirroring server mutations.
#[derive(Debug)]
pub struct StockOutCollection {
    service: StockOutService,
    transactions: Vec<StockOutTransaction>,
    error: Option<String>,
}

impl StockOutCollection {
    pub fn new(service: StockOutService) -> Self {
        Self {
            service,
            transactions: Vec::new(),
            error: None,
        }
    }

    pub fn transactions(&self) -> &[StockOutTransaction] {
        &self.transactions
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Re-fetch the whole list.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.error = None;
        match self.service.list().await {
            Ok(transactions) => {
                self.transactions = transactions;
                Ok(())
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to fetch stock-out records."));
                Err(err)
            }
        }
    }

    /// Create a transaction and append it to the cached list.
    pub async fn create(
        &mut self,
        payload: &StockOutCreate,
    ) -> Result<StockOutTransaction, ApiError> {
        self.error = None;
        match self.service.create(payload).await {
            Ok(transaction) => {
                self.transactions.push(transaction.clone());
                Ok(transaction)
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to record stock-out."));
                Err(err)
            }
        }
    }

    /// Update a transaction and replace it in the cached list.
    pub async fn update(
        &mut self,
        id: i64,
        payload: &StockOutUpdate,
    ) -> Result<StockOutTransaction, ApiError> {
        self.error = None;
        match self.service.update(id, payload).await {
            Ok(transaction) => {
                if let Some(slot) = self
                    .transactions
                    .iter_mut()
                    .find(|existing| existing.id == id)
                {
                    *slot = transaction.clone();
                }
                Ok(transaction)
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to update stock-out record."));
                Err(err)
            }
        }
    }

    /// Delete a transaction and drop it from the cached list.
    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        self.error = None;
        match self.service.delete(id).await {
            Ok(()) => {
                self.transactions.retain(|transaction| transaction.id != id);
                Ok(())
            }
            Err(err) => {
                self.error = Some(display_message(&err, "Failed to delete stock-out record."));
                Err(err)
            }
        }
    }
}
