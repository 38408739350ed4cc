pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::catalog::{CatalogStore, JsonFileLoader};
pub use config::toml_config::ListingConfig;
pub use core::view_model::ServiceListViewModel;
pub use utils::error::{ListingError, Result};
