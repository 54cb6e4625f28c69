//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /store` - Store a value under a generated key
//! - `GET /get/:key` - Read a value as text and integer
//! - `GET /replay/:identity` - Call history of a recorded operation
//! - `GET /page?url=` - Fetch a page through the page cache
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
