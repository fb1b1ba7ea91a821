//! Conversion of the tab-separated price-list export into a JSON product
//! source.
//!
//! The export has one row per article with `Codice Articolo`,
//! `Descrizione`, `Linea` and `Dimensioni` columns. The output is a plain
//! JSON array that the build picks up like any other data dir source.

use std::path::Path;

use serde::Serialize;

use crate::error::BuildError;
use crate::sources::CsvRow;

const DEFAULT_IMAGE: &str = "assets/default.svg";
const CARTONE_UNSPECIFIED: &str = "Non specificato";

/// Line markers with a dedicated image, checked in order.
const LINE_IMAGES: &[(&str, &str)] = &[
    ("FIBRA", "assets/linea_FIBRA.svg"),
    ("SETA", "assets/linea_SETA.svg"),
    ("SPOT", "assets/linea_SPOT.svg"),
    ("CRYSTAL", "assets/linea_CRYSTAL.svg"),
];

/// Articles with a hand-made image.
const CODE_IMAGES: &[(&str, &str)] = &[("101007S", "assets/prodotti/101007S.svg")];

/// Description prefix (lowercase) to family label. First match wins, so
/// `prestige c/cordini` and `baulotto new` are shadowed by their shorter
/// prefixes and only document the families.
const FAMILY_PREFIXES: &[(&str, &str)] = &[
    ("portapanettone + bott.", "Portapanettone + Bott."),
    ("portapanettone portapanettone", "Portapanettone"),
    ("portapanettone+bott.", "Portapanettone + Bott."),
    ("portapanettone", "Portapanettone"),
    ("vassoio conico", "Vassoio Conico"),
    ("vassoio esagono", "Vassoio Esagono"),
    ("cesto incollato", "Cesto Incollato"),
    ("cantinetta sicura", "Cantinetta"),
    ("cantinetta cantina", "Cantinetta"),
    ("cantinetta", "Cantinetta"),
    ("quadrella", "Quadrella"),
    ("tutto a posto", "Tutto A Posto"),
    ("baulotto", "Baulotto"),
    ("casetta", "Casetta"),
    ("coperchio", "Coperchio"),
    ("automatico", "Automatico"),
    ("magnum", "Magnum"),
    ("segret", "Segreto"),
    ("unica", "Unica"),
    ("cubotto", "Cubotto"),
    ("prestige", "Prestige"),
    ("maison", "Maison"),
    ("cofanetto", "Cofanetto"),
    ("shopperbox", "Shopperbox"),
    ("cassetta smart", "Cassetta Smart"),
    ("cassetta marmotta", "Cassetta Marmotta"),
    ("cassetta", "Cassetta"),
    ("liquore", "Liquore"),
    ("gourmet", "Gourmet"),
    ("valigetta", "Valigetta"),
    ("finestra", "Finestra"),
    ("saccotto", "Saccotto"),
    ("scatola salmone", "Scatola Salmone"),
    ("manuale", "Manuale"),
    ("libreria", "Arredo"),
    ("targhetta", "Targhetta"),
    ("cuore da appendere", "Decorazione"),
    ("strip", "Strip"),
    ("prestige c/cordini", "Prestige"),
    ("video montaggio", "Video"),
    ("baulotto new", "Baulotto"),
];

/// Words that bind the first two tokens to a third, as in "Scatola a Libro".
const CONNECTORS: &[&str] = &["+", "a", "al", "alla", "di", "da"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceListRecord {
    pub codice: String,
    pub descrizione: String,
    pub variante: Option<String>,
    pub linea: String,
    pub colore: Option<String>,
    pub formato: String,
    pub cartone: String,
    pub foto: String,
}

/// Millimetre dimension label: `"200x300"` becomes `"200×300 mm"`.
#[must_use]
pub fn format_dimension(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    let value = value.replace('x', "×");
    if value.ends_with("mm") || value.ends_with("MM") {
        value
    } else {
        format!("{value} mm")
    }
}

/// Whitespace tokens with `.`/`,` trimmed and consecutive repeats removed.
fn simplify_tokens(descrizione: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for raw in descrizione.split_whitespace() {
        let cleaned = raw.trim_matches(|c| c == '.' || c == ',');
        if cleaned.is_empty() {
            continue;
        }
        if tokens
            .last()
            .is_some_and(|prev| prev.to_lowercase() == cleaned.to_lowercase())
        {
            continue;
        }
        tokens.push(cleaned);
    }
    tokens
}

/// Short family label for a description, used as the `variante` filter.
#[must_use]
pub fn derive_variante(descrizione: &str) -> String {
    let mut tokens = simplify_tokens(descrizione);
    let normalized = tokens.join(" ").to_lowercase();

    if let Some((_, label)) = FAMILY_PREFIXES
        .iter()
        .find(|(prefix, _)| normalized.starts_with(prefix))
    {
        return (*label).to_string();
    }

    if tokens.is_empty() {
        return String::new();
    }
    if tokens[0] == "+" && tokens.len() > 1 {
        tokens.remove(0);
    }
    if tokens.len() >= 3 && CONNECTORS.contains(&tokens[1].to_lowercase().as_str()) {
        return tokens[..3].join(" ");
    }
    if tokens.len() > 1 {
        tokens[..2].join(" ")
    } else {
        tokens[0].to_string()
    }
}

#[must_use]
pub fn derive_foto(codice: &str, linea: &str) -> String {
    if let Some((_, path)) = CODE_IMAGES.iter().find(|(code, _)| *code == codice) {
        return (*path).to_string();
    }
    let linea = linea.to_uppercase();
    LINE_IMAGES
        .iter()
        .find(|(marker, _)| linea.contains(marker))
        .map_or(DEFAULT_IMAGE, |(_, path)| *path)
        .to_string()
}

fn cell<'a>(row: &'a CsvRow, column: &str) -> &'a str {
    row.get(column).map_or("", |v| v.trim())
}

/// Convert one export row. Rows without a code are skipped.
#[must_use]
pub fn convert_row(row: &CsvRow) -> Option<PriceListRecord> {
    let codice = cell(row, "Codice Articolo");
    if codice.is_empty() {
        return None;
    }
    let linea = cell(row, "Linea");
    let descrizione = cell(row, "Descrizione");
    let variante = derive_variante(descrizione);

    Some(PriceListRecord {
        codice: codice.to_string(),
        descrizione: descrizione.to_string(),
        variante: (!variante.is_empty()).then_some(variante),
        linea: linea.to_string(),
        colore: (!linea.is_empty()).then(|| linea.to_string()),
        formato: format_dimension(cell(row, "Dimensioni")),
        cartone: CARTONE_UNSPECIFIED.to_string(),
        foto: derive_foto(codice, linea),
    })
}

/// Parse the tab-separated export into records sorted by code.
///
/// # Errors
///
/// Returns [`BuildError::Csv`] if the content is not valid TSV.
pub fn convert_price_list(content: &str, source: &Path) -> Result<Vec<PriceListRecord>, BuildError> {
    let csv_err = |e| BuildError::Csv {
        path: source.display().to_string(),
        source: e,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        if let Some(converted) = convert_row(&row) {
            records.push(converted);
        }
    }
    records.sort_by(|a, b| a.codice.cmp(&b.codice));
    Ok(records)
}

/// Convert `input` and write the JSON array to `output`. Returns the number
/// of records written.
///
/// # Errors
///
/// Returns [`BuildError::ConvertSourceMissing`] when `input` does not
/// exist, and I/O, CSV or serialization errors otherwise.
pub fn convert_file(input: &Path, output: &Path) -> Result<usize, BuildError> {
    if !input.exists() {
        return Err(BuildError::ConvertSourceMissing {
            path: input.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(input).map_err(|e| BuildError::io(input, e))?;
    let records = convert_price_list(&content, input)?;

    let mut json = serde_json::to_string_pretty(&records)?;
    json.push('\n');
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    std::fs::write(output, json).map_err(|e| BuildError::io(output, e))?;

    tracing::info!(
        records = records.len(),
        input = %input.display(),
        output = %output.display(),
        "price list converted"
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_dimension_appends_unit() {
        assert_eq!(format_dimension(" 200x300x90 "), "200×300×90 mm");
        assert_eq!(format_dimension("150 mm"), "150 mm");
        assert_eq!(format_dimension("150MM"), "150MM");
        assert_eq!(format_dimension(""), "");
    }

    #[test]
    fn derive_variante_uses_prefix_table() {
        assert_eq!(derive_variante("Cassetta Smart 2 bottiglie"), "Cassetta Smart");
        assert_eq!(derive_variante("CASSETTA vino"), "Cassetta");
        assert_eq!(derive_variante("Portapanettone Portapanettone alto"), "Portapanettone");
        assert_eq!(derive_variante("Libreria 3 ripiani"), "Arredo");
        assert_eq!(derive_variante("Prestige c/cordini nero"), "Prestige");
        assert_eq!(derive_variante("Baulotto New grande"), "Baulotto");
    }

    #[test]
    fn derive_variante_collapses_repeated_tokens() {
        assert_eq!(derive_variante("Vassoio vassoio, conico."), "Vassoio Conico");
    }

    #[test]
    fn derive_variante_keeps_connector_phrases() {
        assert_eq!(derive_variante("Scatola a libro grande"), "Scatola a libro");
        assert_eq!(derive_variante("+ Busta di carta"), "Busta di carta");
    }

    #[test]
    fn derive_variante_falls_back_to_first_tokens() {
        assert_eq!(derive_variante("Scatola regalo rossa"), "Scatola regalo");
        assert_eq!(derive_variante("Sacchetto"), "Sacchetto");
        assert_eq!(derive_variante("  "), "");
    }

    #[test]
    fn derive_foto_prefers_code_override() {
        assert_eq!(derive_foto("101007S", "SETA"), "assets/prodotti/101007S.svg");
        assert_eq!(derive_foto("X1", "Fibra Avana"), "assets/linea_FIBRA.svg");
        assert_eq!(derive_foto("X1", "Carta Kraft"), DEFAULT_IMAGE);
    }

    #[test]
    fn convert_price_list_skips_rows_without_code_and_sorts() {
        let content = "Codice Articolo\tDescrizione\tLinea\tDimensioni\n\
                       B200\tVassoio conico piccolo\tSETA ORO\t250x250\n\
                       \tRiga vuota\tSETA\t\n\
                       A100\tScatola a libro\t\t\n";
        let records = convert_price_list(content, Path::new("listino.tsv")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].codice, "A100");
        assert_eq!(records[0].variante.as_deref(), Some("Scatola a libro"));
        assert!(records[0].colore.is_none());
        assert_eq!(records[0].foto, DEFAULT_IMAGE);
        assert_eq!(records[1].formato, "250×250 mm");
        assert_eq!(records[1].colore.as_deref(), Some("SETA ORO"));
        assert_eq!(records[1].foto, "assets/linea_SETA.svg");
        assert_eq!(records[1].cartone, "Non specificato");
    }
}
