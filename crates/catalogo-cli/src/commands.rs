//! Command handlers. Each takes the resolved [`BuildConfig`] and prints a
//! short summary to stdout; diagnostics go through `tracing` on stderr.

use std::path::Path;

use anyhow::Context;
use catalogo_core::view::{colore_options, load_catalog, variante_options};
use catalogo_core::{BuildConfig, CatalogFilter, LoadState, Product};

const PRICE_LIST_FILE: &str = "catalogo_confezioni_2025.tsv";
const PRICE_LIST_OUTPUT: &str = "prodotti.json";

/// Resolve configuration from `.env` and the environment, with `--root`
/// taking the place of `CATALOGO_ROOT` when given.
pub(crate) fn load_config(root: Option<&Path>) -> anyhow::Result<BuildConfig> {
    let config = match root {
        None => catalogo_core::load_build_config(),
        Some(root) => {
            dotenvy::dotenv().ok();
            let root = root.display().to_string();
            catalogo_core::build_build_config(|key| match key {
                "CATALOGO_ROOT" => Ok(root.clone()),
                _ => std::env::var(key),
            })
        }
    };
    config.context("invalid configuration")
}

pub(crate) fn run_build(config: &BuildConfig, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        let plan = catalogo_build::plan_catalog(config);
        for spec in &plan.sources {
            println!("source  {}", spec.path.display());
        }
        println!(
            "dry run: {} products from {} records ({} dropped); {} not written",
            plan.products.len(),
            plan.stats.records_seen,
            plan.stats.dropped,
            config.output_path.display()
        );
        return Ok(());
    }

    let report = catalogo_build::build_catalog(config).context("catalog build failed")?;
    println!(
        "wrote {} products from {} sources to {}",
        report.products,
        report.sources_read,
        report.output_path.display()
    );
    Ok(())
}

pub(crate) fn run_convert(
    config: &BuildConfig,
    input: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let input = input.map_or_else(|| config.data_dir.join(PRICE_LIST_FILE), Path::to_path_buf);
    let output = output.map_or_else(|| config.data_dir.join(PRICE_LIST_OUTPUT), Path::to_path_buf);

    let count = catalogo_build::convert_file(&input, &output)
        .with_context(|| format!("failed to convert {}", input.display()))?;
    println!("converted {count} articles to {}", output.display());
    Ok(())
}

pub(crate) fn run_query(
    config: &BuildConfig,
    filter: &CatalogFilter,
    options: bool,
) -> anyhow::Result<()> {
    let products = match load_catalog(&config.output_path) {
        LoadState::Ready(products) => products,
        LoadState::Error(message) => anyhow::bail!(message),
        LoadState::Loading => Vec::new(),
    };
    let lines = if options {
        option_lines(&products)
    } else {
        query_lines(&products, filter)
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn option_lines(products: &[Product]) -> Vec<String> {
    let mut lines = vec!["variante:".to_string()];
    lines.extend(variante_options(products).into_iter().map(|v| format!("  {v}")));
    lines.push("colore:".to_string());
    lines.extend(colore_options(products).into_iter().map(|c| format!("  {c}")));
    lines
}

/// One `codice<TAB>articolo` line per visible product, then a count.
pub(crate) fn query_lines(products: &[Product], filter: &CatalogFilter) -> Vec<String> {
    let visible = filter.apply(products);
    let mut lines: Vec<String> = visible
        .iter()
        .map(|p| {
            format!(
                "{}\t{}",
                p.codice.as_deref().unwrap_or("-"),
                p.articolo.as_deref().unwrap_or_default()
            )
        })
        .collect();
    if visible.is_empty() && filter.is_active() {
        lines.push("no products match the current filters".to_string());
    }
    lines.push(format!("{} of {} visible", visible.len(), products.len()));
    lines
}
