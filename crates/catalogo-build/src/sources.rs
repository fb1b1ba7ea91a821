//! Discovery and loading of catalog sources.
//!
//! Loading never fails: a missing file contributes nothing, and an
//! unreadable or malformed file is logged and contributes nothing.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use catalogo_core::BuildConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub format: SourceFormat,
}

impl SourceSpec {
    #[must_use]
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: SourceFormat::Json,
        }
    }

    #[must_use]
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: SourceFormat::Csv,
        }
    }
}

/// CSV row keyed by header.
pub type CsvRow = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceRows {
    Json(Vec<serde_json::Value>),
    Csv(Vec<CsvRow>),
}

impl SourceRows {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SourceRows::Json(rows) => rows.len(),
            SourceRows::Csv(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSource {
    pub spec: SourceSpec,
    pub rows: SourceRows,
}

impl LoadedSource {
    fn empty(spec: &SourceSpec) -> Self {
        let rows = match spec.format {
            SourceFormat::Json => SourceRows::Json(Vec::new()),
            SourceFormat::Csv => SourceRows::Csv(Vec::new()),
        };
        Self {
            spec: spec.clone(),
            rows,
        }
    }
}

/// The ordered source list for a build. Order is precedence: earlier
/// sources win scalar conflicts.
///
/// 1. `*.json` in the data dir, by file name, excluding the output file.
/// 2. The configured extra CSV files, in configured order.
/// 3. `*.csv` in the data dir, by file name, excluding `schema` files.
#[must_use]
pub fn discover_sources(config: &BuildConfig) -> Vec<SourceSpec> {
    let entries = list_files(&config.data_dir);
    let output_name = config.output_path.file_name();

    let json = entries
        .iter()
        .filter(|p| extension_is(p, "json", true))
        .filter(|p| p.file_name() != output_name)
        .cloned()
        .map(SourceSpec::json);

    let extra = config.extra_csv.iter().cloned().map(SourceSpec::csv);

    let csv = entries
        .iter()
        .filter(|p| extension_is(p, "csv", false))
        .filter(|p| !file_name_lower(p).contains("schema"))
        .cloned()
        .map(SourceSpec::csv);

    let mut specs: Vec<SourceSpec> = Vec::new();
    for spec in json.chain(extra).chain(csv) {
        if !specs.iter().any(|s| s.path == spec.path) {
            specs.push(spec);
        }
    }
    specs
}

/// Regular files in `dir`, sorted by file name. A missing or unreadable
/// directory yields nothing.
pub(crate) fn list_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.path())
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

pub(crate) fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn extension_is(path: &Path, ext: &str, case_sensitive: bool) -> bool {
    let name = if case_sensitive {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        file_name_lower(path)
    };
    name.strip_suffix(ext)
        .is_some_and(|stem| stem.ends_with('.'))
}

/// Read and parse one source.
#[must_use]
pub fn load_source(spec: &SourceSpec) -> LoadedSource {
    let content = match std::fs::read_to_string(&spec.path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %spec.path.display(), "source not present");
            return LoadedSource::empty(spec);
        }
        Err(e) => {
            tracing::warn!(path = %spec.path.display(), error = %e, "unable to read source; skipping");
            return LoadedSource::empty(spec);
        }
    };

    let rows = match spec.format {
        SourceFormat::Json => parse_json_rows(&content, &spec.path).map(SourceRows::Json),
        SourceFormat::Csv => parse_csv_rows(&content, &spec.path).map(SourceRows::Csv),
    };

    match rows {
        Some(rows) => LoadedSource {
            spec: spec.clone(),
            rows,
        },
        None => LoadedSource::empty(spec),
    }
}

/// Array elements of a JSON document. Non-array documents are empty.
fn parse_json_rows(content: &str, path: &Path) -> Option<Vec<serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Array(items)) => Some(items),
        Ok(_) => {
            tracing::debug!(path = %path.display(), "JSON source is not an array; ignoring");
            Some(Vec::new())
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed JSON source; skipping");
            None
        }
    }
}

/// Header-keyed rows. Short rows are padded with empty cells; a header-only
/// file has no rows.
pub(crate) fn parse_csv_rows(content: &str, path: &Path) -> Option<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed CSV header; skipping");
            return None;
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed CSV source; skipping");
                return None;
            }
        };
        let row: CsvRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                (
                    header.to_string(),
                    record.get(i).unwrap_or_default().to_string(),
                )
            })
            .collect();
        rows.push(row);
    }
    Some(rows)
}
