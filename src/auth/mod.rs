//! Authentication
//!
//! Two layers, deliberately kept apart:
//!
//! - `gateway` - stateless HTTP calls to the simplejwt token endpoints;
//!   one round trip each, no retries
//! - `controller` - orchestration of login, logout, and
//!   verification-with-refresh-fallback against the session store

pub mod controller;
pub mod gateway;

pub use controller::SessionController;
pub use gateway::AuthGateway;
