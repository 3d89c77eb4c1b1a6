//! In-memory key/value data storage served over HTTP.
//!
//! [`KVStore`] holds named byte payloads behind a reader/writer lock.
//! [`routes::configure`] mounts it on an actix-web `App` at `/datastorage`
//! (GET retrieves, POST stores a multipart upload, DELETE removes) next to a
//! `/health` check. [`DataStorageClient`] is the blocking client used by the
//! `datastorage-tool` CLI.

pub mod client;
pub mod cors;
pub mod env;
pub mod errors;
pub mod handlers;
pub mod kv_store;
pub mod logger;
pub mod routes;
pub mod server;
pub mod types;

pub use client::{ClientError, DataStorageClient, ServerReply};
pub use env::ServerConfig;
pub use errors::{ApiError, StorageError};
pub use handlers::UploadLimits;
pub use kv_store::KVStore;
