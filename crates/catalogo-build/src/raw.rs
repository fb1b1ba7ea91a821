//! Decoded source records, before normalization.
//!
//! Source files disagree on both key names and value shapes: the same
//! description may arrive as `articolo`, `nome` or `descrizione`, a flag as
//! `true`, `1` or `"sì"`, accessories as a list or a `;`-joined string.
//! Everything is decoded into [`RawValue`] first and canonical fields are
//! read through [`Field`], which owns the alias table.

use std::collections::HashMap;

/// A loosely-typed source value. Blank text decodes to [`RawValue::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
    Object(RawRecord),
}

static NULL: RawValue = RawValue::Null;

impl RawValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Whether the value counts as "set" when choosing between aliases.
    /// `false` and `0` do not, matching how the sources use them as blanks.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RawValue::Text(_) | RawValue::List(_) | RawValue::Object(_) => true,
        }
    }

    /// Text view of a scalar. Numbers are printed without a trailing `.0`
    /// when integral.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        if !self.is_truthy() {
            return None;
        }
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) => Some(format_number(*n)),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Null | RawValue::List(_) | RawValue::Object(_) => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&RawRecord> {
        match self {
            RawValue::Object(record) => Some(record),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
            serde_json::Value::String(s) => RawValue::from_text(s),
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(map) => RawValue::Object(RawRecord {
                fields: map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect(),
            }),
        }
    }
}

impl RawValue {
    /// Trimmed text, or `Null` when nothing is left.
    #[must_use]
    pub fn from_text(s: impl AsRef<str>) -> Self {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            RawValue::Null
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }
}

/// One source record: a JSON object or a CSV row keyed by header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, RawValue>,
}

impl RawRecord {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `true` when every field decoded to `Null`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(RawValue::is_null)
    }

    /// Raw lookup by literal key.
    #[must_use]
    pub fn key(&self, key: &str) -> &RawValue {
        self.fields.get(key).unwrap_or(&NULL)
    }

    /// Canonical lookup: the first alias holding a usable value.
    #[must_use]
    pub fn get(&self, field: Field) -> &RawValue {
        let usable = |v: &&RawValue| {
            if field.nullish_fallback() {
                !v.is_null()
            } else {
                v.is_truthy()
            }
        };
        field
            .aliases()
            .iter()
            .map(|alias| self.key(alias))
            .find(usable)
            .unwrap_or(&NULL)
    }
}

impl FromIterator<(String, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Canonical fields read from source records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Codice,
    Articolo,
    Tipologia,
    Settore,
    Linea,
    Materiale,
    Eco,
    Famiglia,
    Colore,
    Variante,
    Cartone,
    Stagionale,
    Brevettato,
    Personalizzabile,
    Disponibilita,
    MinOrdine,
    Note,
    Accessori,
    Varianti,
    Image,
    /// Code of the variant described by top-level fields.
    VariantCodice,
    Size,
    Confezione,
    PrezzoAnonimo,
    PrezzoPersonalizzato,
}

impl Field {
    /// Source keys accepted for this field, in lookup order.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Codice => &["codice"],
            Field::Articolo => &["articolo", "nome", "descrizione"],
            Field::Tipologia => &["tipologia", "categoria"],
            Field::Settore => &["settore"],
            Field::Linea => &["linea"],
            Field::Materiale => &["materiale"],
            Field::Eco => &["eco"],
            Field::Famiglia => &["famiglia"],
            Field::Colore => &["colore", "color"],
            Field::Variante => &["variante"],
            Field::Cartone => &["cartone"],
            Field::Stagionale => &["stagionale"],
            Field::Brevettato => &["brevettato"],
            Field::Personalizzabile => &["personalizzabile"],
            Field::Disponibilita => &["disponibilita", "disponibilità"],
            Field::MinOrdine => &["minOrdine", "min_ordine", "minimoOrdine"],
            Field::Note => &["note"],
            Field::Accessori => &["accessori"],
            Field::Varianti => &["varianti"],
            Field::Image => &["image", "foto"],
            Field::VariantCodice => &["codiceVariante", "variantCodice", "codiceVar", "codice"],
            Field::Size => &["size", "formato"],
            Field::Confezione => &["confezione"],
            Field::PrezzoAnonimo => &["prezzoAnonimo"],
            Field::PrezzoPersonalizzato => &["prezzoPersonalizzato"],
        }
    }

    /// Numeric fields fall through aliases only on missing values, so an
    /// explicit `0` is kept.
    fn nullish_fallback(self) -> bool {
        matches!(self, Field::MinOrdine)
    }
}
