use std::collections::HashMap;

use catalogo_core::{compare_collated, Product};

use crate::merge::merge_into;
use crate::normalize::{normalize_csv_row, normalize_product};
use crate::raw::RawValue;
use crate::sources::{LoadedSource, SourceRows};

/// What happened to one record folded into a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Inserted,
    Merged,
    /// The record had neither a code nor a usable description.
    Dropped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Rows read from sources, including those the normalizer rejected.
    pub records_seen: usize,
    pub inserted: usize,
    pub merged: usize,
    pub dropped: usize,
}

/// Products keyed by [`Product::key`], in first-insertion order.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    stats: FoldStats,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> FoldStats {
        self.stats
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Product> {
        self.index.get(key).map(|&i| &self.products[i])
    }

    /// Merge one normalized product into the catalog. Products that arrive
    /// later only fill what earlier ones left empty.
    pub fn fold(&mut self, product: Product) -> FoldOutcome {
        let Some(key) = product.key() else {
            tracing::debug!(articolo = ?product.articolo, "dropping record without a usable key");
            self.stats.dropped += 1;
            return FoldOutcome::Dropped;
        };

        if let Some(&i) = self.index.get(&key) {
            merge_into(&mut self.products[i], product);
            self.stats.merged += 1;
            FoldOutcome::Merged
        } else {
            self.index.insert(key, self.products.len());
            self.products.push(product);
            self.stats.inserted += 1;
            FoldOutcome::Inserted
        }
    }

    /// Normalize and fold every row of a loaded source.
    pub fn fold_source(&mut self, source: LoadedSource) {
        let products: Vec<Option<Product>> = match source.rows {
            SourceRows::Json(rows) => rows
                .into_iter()
                .map(|row| normalize_product(&RawValue::from(row)))
                .collect(),
            SourceRows::Csv(rows) => rows.iter().map(normalize_csv_row).collect(),
        };

        self.stats.records_seen += products.len();
        for product in products {
            match product {
                Some(product) => {
                    self.fold(product);
                }
                None => self.stats.dropped += 1,
            }
        }
    }

    /// Products ordered by description (code when there is none), accent-
    /// and case-insensitively. Equal names keep insertion order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Product> {
        let mut products = self.products;
        products.sort_by(|a, b| compare_collated(a.sort_name(), b.sort_name()));
        products
    }
}

/// Fold all sources, in order, into one catalog.
pub fn aggregate<I>(sources: I) -> Catalog
where
    I: IntoIterator<Item = LoadedSource>,
{
    let mut catalog = Catalog::new();
    for source in sources {
        let rows = source.rows.len();
        let path = source.spec.path.display().to_string();
        catalog.fold_source(source);
        tracing::debug!(%path, rows, total = catalog.len(), "folded source");
    }
    catalog
}
