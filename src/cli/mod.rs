mod import;
mod migrate;
mod server;

pub use import::{ImportSummary, import, import_catalog};
pub use migrate::{migrate, reset, run_migrations};
pub use server::serve;
