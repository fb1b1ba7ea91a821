use std::path::{Path, PathBuf};

use crate::app_config::{BuildConfig, Environment};
use crate::ConfigError;

/// Load build configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_build_config() -> Result<BuildConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_build_config_from_env()
}

/// Load build configuration from environment variables already in the process.
///
/// Unlike [`load_build_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_build_config_from_env() -> Result<BuildConfig, ConfigError> {
    build_build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Every variable is optional. Paths other than `CATALOGO_ROOT` default to
/// locations under the root; relative overrides are taken as given.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for an unknown `CATALOGO_ENV` or an
/// empty `CATALOGO_ROOT`.
pub fn build_build_config<F>(lookup: F) -> Result<BuildConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let path_or = |var: &str, default: PathBuf| -> PathBuf {
        lookup(var).map_or(default, PathBuf::from)
    };

    let root_raw = or_default("CATALOGO_ROOT", ".");
    if root_raw.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATALOGO_ROOT".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    let root = PathBuf::from(root_raw);

    let env = parse_environment(&or_default("CATALOGO_ENV", "development"))?;
    let log_level = or_default("CATALOGO_LOG_LEVEL", "info");

    let data_dir = path_or("CATALOGO_DATA_DIR", root.join("data"));
    let assets_dir = path_or("CATALOGO_ASSETS_DIR", root.join("assets"));
    let output_path = path_or("CATALOGO_OUTPUT", data_dir.join("catalogo.json"));
    let palette_path = path_or("CATALOGO_PALETTE_PATH", root.join("palette.json"));
    let guidance_path = path_or("CATALOGO_GUIDANCE_PATH", root.join("guida_smaltimento.md"));
    let extra_csv = parse_path_list(&root, &or_default("CATALOGO_EXTRA_CSV", "prodotti_enriched.csv"));

    Ok(BuildConfig {
        env,
        log_level,
        root,
        data_dir,
        assets_dir,
        output_path,
        palette_path,
        guidance_path,
        extra_csv,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CATALOGO_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Comma separated list of paths, each resolved against `root`.
fn parse_path_list(root: &Path, raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| root.join(s))
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
