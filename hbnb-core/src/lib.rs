//! Domain records and JSON-file storage engine for HBnB.
//!
//! The crate has two layers:
//!
//! - [`models`]: typed records sharing an identity/timestamp base and a
//!   serialize-to-plain-data contract.
//! - [`storage`]: the in-memory registry of live records and its bulk
//!   persistence to and from one JSON file.

pub mod error;
pub mod models;
pub mod storage;

pub use error::{ModelError, StorageError};
pub use models::{ModelKind, Record};
pub use storage::{FileStorage, ReloadPolicy, ReloadReport};
