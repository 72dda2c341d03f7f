//! Core types and trait definitions for the drillog composite-log store.
//!
//! This crate is deliberately free of database and spreadsheet dependencies.
//! The extractor, the SQLite backend and the CLI all depend on it.

pub mod catalog;
pub mod directory;
pub mod error;
pub mod export;
pub mod ingest;
pub mod interval;
pub mod propagate;
pub mod store;

pub use error::{Error, Result};
