//! Core types, config, errors, and CSV persistence for pagescrape.

pub mod config;
pub mod content;
pub mod csv_store;
pub mod error;
