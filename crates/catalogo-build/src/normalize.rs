//! Normalization from decoded source records to [`catalogo_core::Product`].
//!
//! Nothing here fails: unusable values become `None`, `false` or an empty
//! collection. Whether a record can be keyed is decided later, by the
//! aggregator.

use std::collections::HashMap;
use std::sync::OnceLock;

use catalogo_core::{Product, Variant};
use regex::Regex;

use crate::merge::reconcile_variants;
use crate::raw::{Field, RawRecord, RawValue};

const TRUTHY: &[&str] = &["true", "1", "yes", "y", "si", "sì", "ok"];

/// Joins list-valued notes, and separates merged notes.
pub const NOTE_SEPARATOR: &str = " · ";

fn accessory_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[;•,]").expect("valid accessory separator regex"))
}

#[must_use]
pub fn to_bool(value: &RawValue) -> bool {
    match value {
        RawValue::Bool(b) => *b,
        RawValue::Number(n) => *n != 0.0,
        RawValue::Text(s) => TRUTHY.contains(&s.trim().to_lowercase().as_str()),
        RawValue::Null | RawValue::List(_) | RawValue::Object(_) => false,
    }
}

/// Like [`to_bool`], but a missing value stays unknown.
#[must_use]
pub fn to_optional_bool(value: &RawValue) -> Option<bool> {
    (!value.is_null()).then(|| to_bool(value))
}

#[must_use]
pub fn to_number(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
        RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        RawValue::Bool(b) => Some(f64::from(u8::from(*b))),
        RawValue::Null | RawValue::List(_) | RawValue::Object(_) => None,
    }
}

fn to_note(value: &RawValue) -> Option<String> {
    match value {
        RawValue::List(items) => {
            let parts: Vec<String> = items.iter().filter_map(RawValue::as_text).collect();
            (!parts.is_empty()).then(|| parts.join(NOTE_SEPARATOR))
        }
        other => other.as_text(),
    }
}

/// Accessories arrive either as a list or as one string separated by `;`,
/// `•` or `,`.
#[must_use]
pub fn split_accessories(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::List(items) => items.iter().filter_map(RawValue::as_text).collect(),
        RawValue::Text(s) => accessory_separator()
            .split(s)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        other => other.as_text().into_iter().collect(),
    }
}

fn normalize_variant(value: &RawValue) -> Variant {
    let Some(record) = value.as_record() else {
        return Variant::default();
    };
    Variant {
        codice: record.get(Field::Codice).as_text(),
        size: record.get(Field::Size).as_text(),
        confezione: record.get(Field::Confezione).as_text(),
        prezzo_anonimo: to_number(record.get(Field::PrezzoAnonimo)),
        prezzo_personalizzato: to_number(record.get(Field::PrezzoPersonalizzato)),
    }
}

/// Normalizes one decoded JSON record into a [`Product`].
///
/// Returns `None` for values that are not objects and for empty objects.
/// A variant described by top-level fields (`size`, `confezione`, prices,
/// or a variant code distinct from the product code) is appended to the
/// variant list unless an identical variant is already there.
#[must_use]
pub fn normalize_product(raw: &RawValue) -> Option<Product> {
    let record = raw.as_record().filter(|r| !r.is_empty())?;

    let text = |field: Field| record.get(field).as_text();

    let varianti = match record.get(Field::Varianti) {
        RawValue::List(items) => items.iter().map(normalize_variant).collect(),
        _ => Vec::new(),
    };

    let mut product = Product {
        codice: text(Field::Codice),
        articolo: text(Field::Articolo),
        tipologia: text(Field::Tipologia),
        settore: text(Field::Settore),
        linea: text(Field::Linea),
        materiale: text(Field::Materiale),
        eco: text(Field::Eco),
        famiglia: text(Field::Famiglia),
        colore: text(Field::Colore),
        variante: text(Field::Variante),
        cartone: text(Field::Cartone),
        stagionale: to_bool(record.get(Field::Stagionale)),
        brevettato: to_bool(record.get(Field::Brevettato)),
        personalizzabile: to_optional_bool(record.get(Field::Personalizzabile)),
        disponibilita: text(Field::Disponibilita),
        min_ordine: to_number(record.get(Field::MinOrdine)),
        note: to_note(record.get(Field::Note)),
        accessori: split_accessories(record.get(Field::Accessori)),
        varianti,
        image: text(Field::Image),
        palette: None,
        smaltimento: None,
    };

    if let Some(variant) = top_level_variant(record, product.codice.as_deref()) {
        if !product
            .varianti
            .iter()
            .any(|v| v.identity() == variant.identity())
        {
            product.varianti.push(variant);
        }
    }

    product.varianti = reconcile_variants(std::mem::take(&mut product.varianti));
    Some(product)
}

fn top_level_variant(record: &RawRecord, product_codice: Option<&str>) -> Option<Variant> {
    let codice = record.get(Field::VariantCodice).as_text();
    let variant = Variant {
        size: record.get(Field::Size).as_text(),
        confezione: record.get(Field::Confezione).as_text(),
        prezzo_anonimo: to_number(record.get(Field::PrezzoAnonimo)),
        prezzo_personalizzato: to_number(record.get(Field::PrezzoPersonalizzato)),
        codice: None,
    };

    let distinct_code = codice.is_some() && codice.as_deref() != product_codice;
    let has_data = distinct_code
        || variant.size.is_some()
        || variant.confezione.is_some()
        || variant.prezzo_anonimo.is_some()
        || variant.prezzo_personalizzato.is_some();

    has_data.then(|| Variant {
        codice: codice.or_else(|| product_codice.map(str::to_owned)),
        ..variant
    })
}

/// Normalizes one CSV row (header to cell) into a [`Product`].
///
/// CSV price lists carry a narrower shape than JSON sources: descriptive
/// columns, the two flags, and exactly one variant per row. Rows whose
/// cells are all blank return `None`.
#[must_use]
pub fn normalize_csv_row(row: &HashMap<String, String>) -> Option<Product> {
    let record: RawRecord = row
        .iter()
        .map(|(k, v)| (k.clone(), RawValue::from_text(v)))
        .collect();
    if record.is_blank() {
        return None;
    }

    let text = |field: Field| record.get(field).as_text();

    let variant = Variant {
        codice: text(Field::Codice),
        size: text(Field::Size),
        confezione: text(Field::Confezione),
        prezzo_anonimo: to_number(record.get(Field::PrezzoAnonimo)),
        prezzo_personalizzato: to_number(record.get(Field::PrezzoPersonalizzato)),
    };

    Some(Product {
        codice: text(Field::Codice),
        articolo: record.key("articolo").as_text(),
        tipologia: record.key("tipologia").as_text(),
        settore: text(Field::Settore),
        linea: text(Field::Linea),
        materiale: text(Field::Materiale),
        eco: text(Field::Eco),
        stagionale: to_bool(record.get(Field::Stagionale)),
        brevettato: to_bool(record.get(Field::Brevettato)),
        varianti: reconcile_variants(vec![variant]),
        ..Product::default()
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
