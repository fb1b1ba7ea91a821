//! Build entry point: discover, load, aggregate, enrich, sort, write.

use std::path::PathBuf;

use catalogo_core::{BuildConfig, Product};

use crate::aggregate::{aggregate, FoldStats};
use crate::enrich::Enricher;
use crate::error::BuildError;
use crate::sources::{discover_sources, load_source, SourceSpec};

/// The catalog as it would be written, plus how it was assembled.
#[derive(Debug)]
pub struct CatalogPlan {
    pub sources: Vec<SourceSpec>,
    /// Sources that contributed at least one row.
    pub sources_with_rows: usize,
    pub stats: FoldStats,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub sources_read: usize,
    pub records_seen: usize,
    pub records_dropped: usize,
    pub products: usize,
    pub output_path: PathBuf,
}

/// Assemble the enriched, sorted catalog without writing it.
#[must_use]
pub fn plan_catalog(config: &BuildConfig) -> CatalogPlan {
    let enricher = Enricher::load(
        &config.palette_path,
        &config.assets_dir,
        &config.guidance_path,
    );

    let sources = discover_sources(config);
    let loaded: Vec<_> = sources.iter().map(load_source).collect();
    let sources_with_rows = loaded.iter().filter(|s| !s.rows.is_empty()).count();

    let catalog = aggregate(loaded);
    let stats = catalog.stats();
    let products = catalog
        .into_sorted()
        .into_iter()
        .map(|p| enricher.enrich(p))
        .collect();

    CatalogPlan {
        sources,
        sources_with_rows,
        stats,
        products,
    }
}

/// Build the catalog and write it to `config.output_path`.
///
/// # Errors
///
/// Returns [`BuildError`] if the data directory cannot be created or the
/// output cannot be serialized or written. Per-source problems are logged
/// and never surface here.
pub fn build_catalog(config: &BuildConfig) -> Result<BuildReport, BuildError> {
    std::fs::create_dir_all(&config.data_dir).map_err(|e| BuildError::io(&config.data_dir, e))?;

    let plan = plan_catalog(config);

    let mut output = serde_json::to_string_pretty(&plan.products)?;
    output.push('\n');
    if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    std::fs::write(&config.output_path, output)
        .map_err(|e| BuildError::io(&config.output_path, e))?;

    let report = BuildReport {
        sources_read: plan.sources_with_rows,
        records_seen: plan.stats.records_seen,
        records_dropped: plan.stats.dropped,
        products: plan.products.len(),
        output_path: config.output_path.clone(),
    };
    tracing::info!(
        sources = report.sources_read,
        records = report.records_seen,
        dropped = report.records_dropped,
        products = report.products,
        output = %report.output_path.display(),
        "catalog written"
    );
    Ok(report)
}
