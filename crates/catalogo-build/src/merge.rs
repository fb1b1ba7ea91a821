//! Field-level merging of two records that share a catalog key.
//!
//! Precedence is positional: the record already in the catalog came from an
//! earlier source and wins every choice that content does not decide.
//! Scalars keep the first non-empty value, list unions keep first-seen
//! order, and variant ties keep the earlier variant. Flags (OR), minimum
//! order (min) and variant richness are decided by content alone.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::OnceLock;

use catalogo_core::{Product, Variant};
use regex::Regex;

use crate::normalize::NOTE_SEPARATOR;

fn note_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*·\s*").expect("valid note separator regex"))
}

/// Merges `incoming` into `existing`. Either side may be absent.
#[must_use]
pub fn merge_products(existing: Option<Product>, incoming: Option<Product>) -> Option<Product> {
    match (existing, incoming) {
        (None, None) => None,
        (Some(product), None) | (None, Some(product)) => Some(product),
        (Some(mut target), Some(source)) => {
            merge_into(&mut target, source);
            Some(target)
        }
    }
}

/// In-place form of [`merge_products`].
pub fn merge_into(target: &mut Product, source: Product) {
    fill(&mut target.codice, source.codice);
    fill(&mut target.articolo, source.articolo);
    fill(&mut target.tipologia, source.tipologia);
    fill(&mut target.settore, source.settore);
    fill(&mut target.linea, source.linea);
    fill(&mut target.materiale, source.materiale);
    fill(&mut target.eco, source.eco);
    fill(&mut target.famiglia, source.famiglia);
    fill(&mut target.colore, source.colore);
    fill(&mut target.variante, source.variante);
    fill(&mut target.cartone, source.cartone);
    fill(&mut target.disponibilita, source.disponibilita);
    fill(&mut target.image, source.image);

    target.stagionale |= source.stagionale;
    target.brevettato |= source.brevettato;
    target.personalizzabile = merge_tri_state(target.personalizzabile, source.personalizzabile);

    target.min_ordine = match (target.min_ordine, source.min_ordine) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    if source.note.is_some() {
        target.note = merge_notes(target.note.as_deref(), source.note.as_deref());
    }

    if !source.accessori.is_empty() {
        let mut seen: HashSet<String> = target.accessori.iter().cloned().collect();
        for item in source.accessori {
            if seen.insert(item.clone()) {
                target.accessori.push(item);
            }
        }
    }

    if !source.varianti.is_empty() {
        let mut all = std::mem::take(&mut target.varianti);
        all.extend(source.varianti);
        target.varianti = reconcile_variants(all);
    }
}

/// Takes `incoming` only when `slot` holds nothing usable.
fn fill(slot: &mut Option<String>, incoming: Option<String>) {
    let empty = slot.as_deref().is_none_or(str::is_empty);
    if empty {
        if let Some(value) = incoming.filter(|v| !v.is_empty()) {
            *slot = Some(value);
        }
    }
}

/// `true` if either side says so, else `false` if either side says so.
fn merge_tri_state(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), _) | (_, Some(false)) => Some(false),
        (None, None) => None,
    }
}

/// Union of `·`-separated note segments, first-seen order.
fn merge_notes(existing: Option<&str>, incoming: Option<&str>) -> Option<String> {
    let mut seen = HashSet::new();
    let segments: Vec<&str> = existing
        .into_iter()
        .chain(incoming)
        .flat_map(|note| note_separator().split(note))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(*s))
        .collect();

    if segments.is_empty() {
        existing.map(str::to_owned)
    } else {
        Some(segments.join(NOTE_SEPARATOR))
    }
}

/// Canonical variant list.
///
/// 1. Variants with no code, size or package are dropped.
/// 2. Exact duplicates by `(codice, size, confezione)` collapse to the
///    richer one.
/// 3. Variants sharing `(codice, confezione)` collapse to the richest one.
///
/// The survivor of each group takes the position of the group's first
/// member; on equal richness the earlier variant stays.
#[must_use]
pub fn reconcile_variants(variants: Vec<Variant>) -> Vec<Variant> {
    let identifiable: Vec<Variant> = variants
        .into_iter()
        .filter(Variant::is_identifiable)
        .collect();
    let deduped = keep_richest_by(identifiable, |v| {
        (v.codice.clone(), v.size.clone(), v.confezione.clone())
    });
    keep_richest_by(deduped, |v| (v.codice.clone(), v.confezione.clone()))
}

fn keep_richest_by<K, F>(variants: Vec<Variant>, key: F) -> Vec<Variant>
where
    K: Eq + Hash,
    F: Fn(&Variant) -> K,
{
    let mut slots: Vec<Variant> = Vec::with_capacity(variants.len());
    let mut index: HashMap<K, usize> = HashMap::new();

    for variant in variants {
        let k = key(&variant);
        if let Some(&i) = index.get(&k) {
            if variant.richness() > slots[i].richness() {
                slots[i] = variant;
            }
            continue;
        }
        index.insert(k, slots.len());
        slots.push(variant);
    }

    slots
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
