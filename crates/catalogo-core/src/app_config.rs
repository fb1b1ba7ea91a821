use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Everything the catalog build needs to know about where its inputs and
/// output live. Passed explicitly into the pipeline entry point.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub env: Environment,
    pub log_level: String,
    pub root: PathBuf,
    /// Directory scanned for JSON and CSV sources; also holds the output.
    pub data_dir: PathBuf,
    /// Directory scanned for `linea_*` line images.
    pub assets_dir: PathBuf,
    pub output_path: PathBuf,
    pub palette_path: PathBuf,
    pub guidance_path: PathBuf,
    /// CSV files outside the data dir, read after the data dir JSON and
    /// before the data dir CSV.
    pub extra_csv: Vec<PathBuf>,
}

impl BuildConfig {
    /// Default layout rooted at `root`, as produced with no env overrides.
    #[must_use]
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join("data");
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            assets_dir: root.join("assets"),
            output_path: data_dir.join("catalogo.json"),
            palette_path: root.join("palette.json"),
            guidance_path: root.join("guida_smaltimento.md"),
            extra_csv: vec![root.join("prodotti_enriched.csv")],
            data_dir,
            root,
        }
    }
}
