use serde::{Deserialize, Serialize};

use crate::text::slugify;

/// A catalog article in its canonical shape, after normalization and
/// merging across every source that mentions it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    /// Article code, e.g. `"101007S"`. Primary merge key.
    pub codice: Option<String>,
    /// Article description / display name.
    pub articolo: Option<String>,
    pub tipologia: Option<String>,
    pub settore: Option<String>,
    /// Product line, e.g. `"FIBRA AVANA"`. Drives image and palette lookup.
    pub linea: Option<String>,
    pub materiale: Option<String>,
    pub eco: Option<String>,
    pub famiglia: Option<String>,
    pub colore: Option<String>,
    /// Short family label derived from the description, used as a filter.
    pub variante: Option<String>,
    pub cartone: Option<String>,
    pub stagionale: bool,
    pub brevettato: bool,
    pub personalizzabile: Option<bool>,
    pub disponibilita: Option<String>,
    pub min_ordine: Option<f64>,
    /// Free text; several sources are joined with `" · "`.
    pub note: Option<String>,
    pub accessori: Vec<String>,
    pub varianti: Vec<Variant>,
    /// Asset path relative to the site root, e.g. `"assets/linea_SETA.svg"`.
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smaltimento: Option<String>,
}

impl Product {
    /// The key products are merged under: the article code, or a slug of
    /// the description when there is no code. `None` means the record
    /// cannot be keyed and must be dropped.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        if let Some(codice) = self.codice.as_deref().filter(|c| !c.is_empty()) {
            return Some(codice.to_string());
        }
        let slug = slugify(self.articolo.as_deref().unwrap_or_default());
        (!slug.is_empty()).then_some(slug)
    }

    /// Name used for ordering the published catalog.
    #[must_use]
    pub fn sort_name(&self) -> &str {
        self.articolo
            .as_deref()
            .or(self.codice.as_deref())
            .unwrap_or_default()
    }

    /// Colour label shown in the UI, falling back to the product line.
    #[must_use]
    pub fn colore_or_linea(&self) -> Option<&str> {
        self.colore.as_deref().or(self.linea.as_deref())
    }
}

/// A sellable package of a [`Product`]: one size in one packaging type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variant {
    pub codice: Option<String>,
    pub size: Option<String>,
    /// Packaging type, e.g. `"Cartone 50 pz"`.
    pub confezione: Option<String>,
    /// Unit price for unbranded packages.
    pub prezzo_anonimo: Option<f64>,
    /// Unit price for customer-branded packages.
    pub prezzo_personalizzato: Option<f64>,
}

/// Exact identity of a variant, used for dedup.
pub type VariantIdentity<'a> = (Option<&'a str>, Option<&'a str>, Option<&'a str>);

impl Variant {
    #[must_use]
    pub fn identity(&self) -> VariantIdentity<'_> {
        (
            self.codice.as_deref(),
            self.size.as_deref(),
            self.confezione.as_deref(),
        )
    }

    /// Code and packaging only: variants sharing this compete for a
    /// single slot in the reconciled list.
    #[must_use]
    pub fn package_key(&self) -> (Option<&str>, Option<&str>) {
        (self.codice.as_deref(), self.confezione.as_deref())
    }

    /// Number of informative fields present. Higher wins when two
    /// variants compete for the same slot.
    #[must_use]
    pub fn richness(&self) -> u8 {
        u8::from(self.size.is_some())
            + u8::from(self.prezzo_anonimo.is_some())
            + u8::from(self.prezzo_personalizzato.is_some())
    }

    /// `false` when the variant has no code, size or package at all.
    #[must_use]
    pub fn is_identifiable(&self) -> bool {
        self.codice.is_some() || self.size.is_some() || self.confezione.is_some()
    }
}
