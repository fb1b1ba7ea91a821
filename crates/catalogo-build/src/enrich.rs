//! Post-merge enrichment: line images, palette groups and the shared
//! disposal guidance.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use catalogo_core::Product;

use crate::sources::list_files;

const LINE_ASSET_PREFIX: &str = "linea_";

/// Uppercase line name to palette group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteAssignments(HashMap<String, String>);

impl PaletteAssignments {
    /// Load `{ "group": ["LINE", ...], ... }`. When a line is listed under
    /// several groups the last one in the file wins.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "malformed palette file; ignoring");
                Self::default()
            }),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "unable to read palette file");
                }
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns the JSON error when `content` is not an object.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let groups: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        let mut assignments = HashMap::new();
        for (group, lines) in groups {
            let serde_json::Value::Array(lines) = lines else {
                continue;
            };
            for line in lines.iter().filter_map(serde_json::Value::as_str) {
                assignments.insert(line.to_uppercase(), group.clone());
            }
        }
        Ok(Self(assignments))
    }

    #[must_use]
    pub fn group_for(&self, linea: &str) -> Option<&str> {
        self.0.get(&linea.to_uppercase()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAsset {
    /// Lowercased name between `linea_` and `.svg`, e.g. `"seta"`.
    pub base: String,
    /// Site-relative path, e.g. `"assets/linea_SETA.svg"`.
    pub path: String,
}

/// `linea_*` images in the assets directory, sorted by file name so the
/// first match is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAssets(Vec<LineAsset>);

impl LineAssets {
    #[must_use]
    pub fn scan(dir: &Path) -> Self {
        Self::from_file_names(
            list_files(dir)
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
        )
    }

    pub fn from_file_names<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .filter(|n| n.to_lowercase().starts_with(LINE_ASSET_PREFIX))
            .collect();
        names.sort();
        Self(
            names
                .into_iter()
                .map(|name| {
                    let lower = name.to_lowercase();
                    let stem = &lower[LINE_ASSET_PREFIX.len()..];
                    let base = stem.strip_suffix(".svg").unwrap_or(stem).to_string();
                    LineAsset {
                        base,
                        path: format!("assets/{name}"),
                    }
                })
                .collect(),
        )
    }

    /// First asset whose base name occurs in the line name.
    #[must_use]
    pub fn matching(&self, linea: &str) -> Option<&LineAsset> {
        let linea = linea.to_lowercase();
        self.0.iter().find(|asset| linea.contains(&asset.base))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trimmed guidance text; `None` when the file is missing or blank.
#[must_use]
pub fn load_guidance(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "unable to read guidance file");
            }
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enricher {
    pub palette: PaletteAssignments,
    pub assets: LineAssets,
    pub guidance: Option<String>,
}

impl Enricher {
    #[must_use]
    pub fn load(palette_path: &Path, assets_dir: &Path, guidance_path: &Path) -> Self {
        let enricher = Self {
            palette: PaletteAssignments::load(palette_path),
            assets: LineAssets::scan(assets_dir),
            guidance: load_guidance(guidance_path),
        };
        tracing::debug!(
            palette_lines = enricher.palette.len(),
            line_assets = enricher.assets.len(),
            has_guidance = enricher.guidance.is_some(),
            "loaded enrichment tables"
        );
        enricher
    }

    #[must_use]
    pub fn enrich(&self, mut product: Product) -> Product {
        if let Some(linea) = product.linea.as_deref() {
            if product.image.is_none() {
                if let Some(asset) = self.assets.matching(linea) {
                    product.image = Some(asset.path.clone());
                }
            }
            if let Some(group) = self.palette.group_for(linea) {
                product.palette = Some(group.to_string());
            }
        }
        if let Some(guidance) = &self.guidance {
            product.smaltimento = Some(guidance.clone());
        }
        product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_linea(linea: &str) -> Product {
        Product {
            codice: Some("A1".to_owned()),
            linea: Some(linea.to_owned()),
            ..Product::default()
        }
    }

    #[test]
    fn palette_parse_maps_uppercase_lines() {
        let palette =
            PaletteAssignments::parse(r#"{"caldi": ["Fibra Avana", "SETA ORO"], "freddi": ["seta blu"], "x": 3}"#)
                .unwrap();
        assert_eq!(palette.group_for("fibra avana"), Some("caldi"));
        assert_eq!(palette.group_for("SETA BLU"), Some("freddi"));
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn palette_later_group_overwrites() {
        let palette =
            PaletteAssignments::parse(r#"{"zeta": ["SETA"], "alfa": ["SETA"]}"#).unwrap();
        assert_eq!(palette.group_for("SETA"), Some("alfa"));
    }

    #[test]
    fn palette_rejects_non_object() {
        assert!(PaletteAssignments::parse("[1, 2]").is_err());
    }

    #[test]
    fn line_assets_strip_prefix_and_extension() {
        let assets = LineAssets::from_file_names(
            ["Linea_SETA.svg", "default.svg", "linea_fibra.SVG"].map(String::from),
        );
        assert_eq!(assets.len(), 2);
        assert_eq!(assets.matching("FIBRA AVANA").unwrap().path, "assets/linea_fibra.SVG");
        assert_eq!(assets.matching("seta oro").unwrap().path, "assets/Linea_SETA.svg");
        assert!(assets.matching("CRYSTAL").is_none());
    }

    #[test]
    fn line_assets_first_sorted_match_wins() {
        let assets =
            LineAssets::from_file_names(["linea_SETA_ORO.svg", "linea_SETA.svg"].map(String::from));
        assert_eq!(
            assets.matching("SETA_ORO LUCIDO").unwrap().path,
            "assets/linea_SETA.svg"
        );
    }

    #[test]
    fn enrich_keeps_existing_image() {
        let enricher = Enricher {
            assets: LineAssets::from_file_names(["linea_SETA.svg".to_owned()]),
            ..Enricher::default()
        };
        let mut product = with_linea("SETA");
        product.image = Some("assets/prodotti/A1.svg".to_owned());
        let enriched = enricher.enrich(product);
        assert_eq!(enriched.image.as_deref(), Some("assets/prodotti/A1.svg"));
    }

    #[test]
    fn enrich_attaches_image_palette_and_guidance() {
        let enricher = Enricher {
            palette: PaletteAssignments::parse(r#"{"caldi": ["SETA ORO"]}"#).unwrap(),
            assets: LineAssets::from_file_names(["linea_SETA.svg".to_owned()]),
            guidance: Some("Carta: bidone blu".to_owned()),
        };
        let enriched = enricher.enrich(with_linea("Seta Oro"));
        assert_eq!(enriched.image.as_deref(), Some("assets/linea_SETA.svg"));
        assert_eq!(enriched.palette.as_deref(), Some("caldi"));
        assert_eq!(enriched.smaltimento.as_deref(), Some("Carta: bidone blu"));
    }

    #[test]
    fn enrich_without_line_only_adds_guidance() {
        let enricher = Enricher {
            guidance: Some("Carta".to_owned()),
            ..Enricher::default()
        };
        let enriched = enricher.enrich(Product::default());
        assert!(enriched.image.is_none());
        assert!(enriched.palette.is_none());
        assert_eq!(enriched.smaltimento.as_deref(), Some("Carta"));
    }

    #[test]
    fn load_guidance_missing_or_blank_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_guidance(&dir.path().join("nope.md")).is_none());
        let path = dir.path().join("guida.md");
        std::fs::write(&path, "  \n").unwrap();
        assert!(load_guidance(&path).is_none());
        std::fs::write(&path, "\n# Smaltimento\nCarta\n").unwrap();
        assert_eq!(load_guidance(&path).as_deref(), Some("# Smaltimento\nCarta"));
    }
}
