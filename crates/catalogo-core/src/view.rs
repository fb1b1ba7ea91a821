//! Read-side helpers for presenting a built catalog: loading, dropdown
//! option lists, filtering and free-text search.

use std::collections::HashSet;
use std::path::Path;

use crate::products::Product;
use crate::text::compare_collated;

/// Image shown when a product has none, or its asset fails to load.
pub const DEFAULT_IMAGE: &str = "assets/default.svg";

/// Lifecycle of a catalog load as seen by a consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Vec<Product>),
    /// User-facing message describing why the catalog is unavailable.
    Error(String),
}

impl LoadState {
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            LoadState::Ready(products) => products,
            LoadState::Loading | LoadState::Error(_) => &[],
        }
    }
}

/// Read the published catalog. A document that is valid JSON but not an
/// array loads as an empty catalog.
#[must_use]
pub fn load_catalog(path: &Path) -> LoadState {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return LoadState::Error(format!(
                "unable to load catalog {} ({})",
                path.display(),
                e.kind()
            ))
        }
    };
    parse_catalog(&content)
}

fn parse_catalog(content: &str) -> LoadState {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => return LoadState::Error(format!("catalog is not valid JSON: {e}")),
    };
    if !value.is_array() {
        return LoadState::Ready(Vec::new());
    }
    match serde_json::from_value::<Vec<Product>>(value) {
        Ok(products) => LoadState::Ready(products),
        Err(e) => LoadState::Error(format!("catalog has an unexpected shape: {e}")),
    }
}

/// Distinct non-empty values, sorted accent- and case-insensitively.
/// Distinct spellings stay distinct options, since filters compare exactly.
pub fn unique_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen = HashSet::new();
    let mut out: Vec<String> = values
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_owned)
        .collect();
    out.sort_by(|a, b| compare_collated(a, b));
    out
}

#[must_use]
pub fn variante_options(products: &[Product]) -> Vec<String> {
    unique_sorted(products.iter().map(|p| p.variante.as_deref()))
}

#[must_use]
pub fn colore_options(products: &[Product]) -> Vec<String> {
    unique_sorted(products.iter().map(Product::colore_or_linea))
}

#[must_use]
pub fn display_image(product: &Product) -> &str {
    product
        .image
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_IMAGE)
}

/// Lowercased, space-joined text of every searchable field of a product.
#[must_use]
pub fn search_text(product: &Product) -> String {
    let scalars = [
        &product.codice,
        &product.articolo,
        &product.variante,
        &product.tipologia,
        &product.settore,
        &product.linea,
        &product.materiale,
        &product.colore,
        &product.famiglia,
        &product.note,
    ];
    let variant_fields = product.varianti.iter().flat_map(|v| {
        [&v.codice, &v.size, &v.confezione]
            .into_iter()
            .filter_map(|f| f.as_deref())
    });

    scalars
        .into_iter()
        .filter_map(|f| f.as_deref())
        .chain(product.accessori.iter().map(String::as_str))
        .chain(variant_fields)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Active filter selection. `None` in a dropdown slot means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub variante: Option<String>,
    pub colore: Option<String>,
    pub search: Option<String>,
}

impl CatalogFilter {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.variante.is_some()
            || self.colore.is_some()
            || self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Dropdowns compare exactly; search requires every query term to
    /// appear somewhere in [`search_text`].
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(variante) = &self.variante {
            if product.variante.as_deref() != Some(variante.as_str()) {
                return false;
            }
        }
        if let Some(colore) = &self.colore {
            if product.colore_or_linea() != Some(colore.as_str()) {
                return false;
            }
        }
        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            let mut terms = query.split_whitespace().peekable();
            if terms.peek().is_some() {
                let haystack = search_text(product);
                return terms.all(|term| haystack.contains(term));
            }
        }
        true
    }

    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
