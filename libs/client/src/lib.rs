//! Client library for VexDB, a remote vector database
//!
//! Operations travel over two channels: schema, object and administrative
//! calls use the REST API, while searches and bulk writes use gRPC. The
//! [`VexdbClient`] is the async entry point; [`blocking::VexdbClient`]
//! offers the same surface for synchronous callers.
//!
//! ```no_run
//! use serde_json::json;
//! use vexdb_client::{ClientConfig, DataObject, QueryOptions, VexdbClient};
//!
//! # async fn run() -> Result<(), vexdb_client::VexdbError> {
//! let client = VexdbClient::new(ClientConfig::new(
//!     "https://db.example.com:8080",
//!     "https://db.example.com:50051",
//! )?)?;
//! client.connect().await?;
//!
//! let id = client
//!     .data()
//!     .insert("Books", &DataObject::new(json!({"title": "Rust"})), None)
//!     .await?;
//!
//! let hits = client
//!     .query()
//!     .near_vector("Books", vec![0.1, 0.2, 0.3], &QueryOptions::new().with_limit(10))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod blocking;
mod client;
mod config;
mod connection;
mod error;
mod executor;
mod filter;
mod models;
pub mod transport;
mod validate;

pub use client::VexdbClient;
pub use config::{ClientConfig, Credential};
pub use connection::ClientState;
pub use error::{VexdbError, VexdbResult};
pub use filter::{Filter, FilterValue, PropertyFilter};
pub use models::*;

pub use api::batch::{MAX_BATCH_BYTES, MAX_BATCH_OBJECTS};
