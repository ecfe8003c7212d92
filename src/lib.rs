//! IMS Client - Main Library
//!
//! Client core for the CSU supply-office inventory management desktop
//! app. The UI shell talks to a Django REST Framework backend; this
//! crate owns everything between the two: JWT session lifecycle,
//! persisted session state, the shared HTTP transport, and the
//! inventory/stock-out API services.
//!
//! # Module Structure
//!
//! - **`config`** - Server URL and session-file configuration
//! - **`transport`** - Shared reqwest wrapper with a mutable default
//!   bearer credential
//! - **`storage`** - Key-value persistence for the session (file-backed
//!   and in-memory implementations)
//! - **`session`** - The session store: tokens and profile as one
//!   atomic unit, mirrored to storage and the transport header
//! - **`auth`** - Stateless token gateway plus the session controller
//!   (login, logout, verification with a single refresh fallback)
//! - **`inventory`** - Item and stock-out CRUD services with cached
//!   client-side collections
//! - **`error`** - `thiserror` taxonomy shared by all of the above
//!
//! # Session lifecycle
//!
//! The session store is the single source of truth. The controller is
//! the only component with branching logic: verification is attempted
//! first (cheap, validates the current access token) and a refresh is
//! only a fallback, at most once per failed verification. A failed
//! refresh clears the session and forces re-login; nothing here is
//! fatal to the process.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ims_client::{
//!     ApiClient, AuthGateway, Config, Credentials, FileStorage, SessionController,
//!     SessionStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new();
//! let storage = Arc::new(FileStorage::open_from(&config)?);
//! let api = ApiClient::new(config);
//! let store = Arc::new(SessionStore::new(api.clone(), storage)?);
//! let controller = SessionController::new(store, AuthGateway::new(api.clone()));
//!
//! controller
//!     .login(&Credentials::new("alice", "secret"))
//!     .await?;
//! assert!(controller.is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod inventory;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use auth::{AuthGateway, SessionController};
pub use config::Config;
pub use error::{ApiError, AuthError, StorageError};
pub use inventory::{ItemCollection, ItemService, StockOutCollection, StockOutService};
pub use session::{SessionSnapshot, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use transport::ApiClient;
pub use types::{Credentials, RefreshResponse, TokenPair, UserProfile};
