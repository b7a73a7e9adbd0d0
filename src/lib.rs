//! Multi-tenant school administration API.
//!
//! Every authenticated request resolves a [`middleware::auth::TenantContext`]
//! from its bearer token, and every query a handler runs is scoped to that
//! context's school. Feature areas live under [`modules`], each with its own
//! model, service, controller, and router.

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
