pub mod app_config;
pub mod config;
pub mod products;
pub mod text;
pub mod view;

pub use app_config::{BuildConfig, Environment};
pub use config::{build_build_config, load_build_config, load_build_config_from_env};
pub use products::{Product, Variant};
pub use text::{collation_key, compare_collated, slugify};
pub use view::{CatalogFilter, LoadState};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
