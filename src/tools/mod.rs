//! Standalone data chores that ship alongside the board renderer

pub mod download;
pub mod sql;

pub use download::{download_batch, DownloadError, DownloadJob};
pub use sql::{generate_updates, SqlError};
