//! Inventory API
//!
//! CRUD services for the two backend resources, plus client-side cached
//! collections that keep a local list in step with server mutations:
//!
//! - `items` - inventory items (`/items/`)
//! - `stockouts` - stock-out transactions (`/stock-outs/`); creating one
//!   makes the backend deduct the item's quantity

pub mod items;
pub mod stockouts;

pub use items::{AllocationType, Item, ItemCollection, ItemCreate, ItemService, ItemUpdate};
pub use stockouts::{
    StockOutCollection, StockOutCreate, StockOutService, StockOutTransaction, StockOutUpdate,
};
