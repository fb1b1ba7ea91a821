use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CATALOGO_ENV"));
}

#[test]
fn build_build_config_defaults_match_rooted_layout() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_build_config(lookup_from_map(&map)).unwrap();
    let expected = BuildConfig::rooted_at(".");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, expected.data_dir);
    assert_eq!(cfg.assets_dir, expected.assets_dir);
    assert_eq!(cfg.output_path, expected.output_path);
    assert_eq!(cfg.palette_path, expected.palette_path);
    assert_eq!(cfg.guidance_path, expected.guidance_path);
    assert_eq!(cfg.extra_csv, expected.extra_csv);
}

#[test]
fn build_build_config_paths_follow_root() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_ROOT", "/srv/site");
    let cfg = build_build_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/srv/site/data"));
    assert_eq!(cfg.output_path, PathBuf::from("/srv/site/data/catalogo.json"));
    assert_eq!(cfg.palette_path, PathBuf::from("/srv/site/palette.json"));
}

#[test]
fn build_build_config_output_follows_data_dir_override() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_DATA_DIR", "/tmp/sources");
    let cfg = build_build_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.output_path, PathBuf::from("/tmp/sources/catalogo.json"));
}

#[test]
fn build_build_config_output_override() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_OUTPUT", "/tmp/out.json");
    let cfg = build_build_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.output_path, PathBuf::from("/tmp/out.json"));
}

#[test]
fn build_build_config_extra_csv_list() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_ROOT", "/srv/site");
    map.insert("CATALOGO_EXTRA_CSV", "a.csv, ,listini/b.csv");
    let cfg = build_build_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.extra_csv,
        vec![
            PathBuf::from("/srv/site/a.csv"),
            PathBuf::from("/srv/site/listini/b.csv")
        ]
    );
}

#[test]
fn build_build_config_empty_extra_csv_means_none() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_EXTRA_CSV", "");
    let cfg = build_build_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.extra_csv.is_empty());
}

#[test]
fn build_build_config_rejects_empty_root() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_ROOT", "  ");
    let result = build_build_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATALOGO_ROOT"),
        "expected InvalidEnvVar(CATALOGO_ROOT), got: {result:?}"
    );
}

#[test]
fn build_build_config_rejects_unknown_env() {
    let mut map = HashMap::new();
    map.insert("CATALOGO_ENV", "staging");
    let result = build_build_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATALOGO_ENV"),
        "expected InvalidEnvVar(CATALOGO_ENV), got: {result:?}"
    );
}
