//! HBnB command shell.
//!
//! The shell is a thin front end: it parses line-oriented commands and
//! drives the storage engine from [`hbnb_core`].

pub mod config;
pub mod console;

pub use hbnb_core::{models, storage};
