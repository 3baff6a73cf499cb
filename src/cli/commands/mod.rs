pub mod config;
pub mod dump;
pub mod export;
pub mod groups;
pub mod ingest;
pub mod init;
pub mod list;
pub mod log;
pub mod plot;
mod sources;
pub mod summary;
pub mod totals;
