use std::fs;
use std::path::Path;

use catalogo_build::{build_catalog, plan_catalog};
use catalogo_core::{BuildConfig, Product};

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read_catalog(config: &BuildConfig) -> Vec<Product> {
    let content = fs::read_to_string(&config.output_path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn same_code_in_two_files_merges_into_one_product() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(
        &config.data_dir.join("a.json"),
        r#"[{"codice": "A1", "linea": "ALPHA"}]"#,
    );
    write(
        &config.data_dir.join("b.json"),
        r#"[{"codice": "A1", "stagionale": "si"}]"#,
    );

    let report = build_catalog(&config).unwrap();
    assert_eq!(report.products, 1);
    assert_eq!(report.sources_read, 2);

    let products = read_catalog(&config);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].codice.as_deref(), Some("A1"));
    assert_eq!(products[0].linea.as_deref(), Some("ALPHA"));
    assert!(products[0].stagionale);
}

#[test]
fn empty_tree_writes_empty_array() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());

    let report = build_catalog(&config).unwrap();
    assert_eq!(report.products, 0);
    assert_eq!(fs::read_to_string(&config.output_path).unwrap(), "[]\n");
}

#[test]
fn previous_output_is_not_read_back() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(
        &config.output_path,
        r#"[{"codice": "STALE", "articolo": "Vecchio"}]"#,
    );
    write(
        &config.data_dir.join("prodotti.json"),
        r#"[{"codice": "N1", "articolo": "Nuovo"}]"#,
    );

    build_catalog(&config).unwrap();
    let products = read_catalog(&config);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].codice.as_deref(), Some("N1"));
}

#[test]
fn csv_sources_fill_gaps_after_json() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(
        &config.data_dir.join("prodotti.json"),
        r#"[{"codice": "A1", "articolo": "Cassetta vino"}]"#,
    );
    write(
        &root.path().join("prodotti_enriched.csv"),
        "codice,articolo,materiale,size,confezione\nA1,Altro nome,Cartone,300×200 mm,10 pz\nB2,Vassoio,,,\n",
    );
    write(
        &config.data_dir.join("schema.csv"),
        "codice,articolo\nZZ,Da ignorare\n",
    );

    build_catalog(&config).unwrap();
    let products = read_catalog(&config);
    let codes: Vec<_> = products.iter().filter_map(|p| p.codice.as_deref()).collect();
    assert_eq!(codes, vec!["A1", "B2"]);

    let cassetta = &products[0];
    assert_eq!(cassetta.articolo.as_deref(), Some("Cassetta vino"));
    assert_eq!(cassetta.materiale.as_deref(), Some("Cartone"));
    assert_eq!(cassetta.varianti.len(), 1);
    assert_eq!(cassetta.varianti[0].confezione.as_deref(), Some("10 pz"));
}

#[test]
fn enrichment_applies_palette_assets_and_guidance() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(
        &config.data_dir.join("prodotti.json"),
        r#"[
            {"codice": "S1", "articolo": "Scatola", "linea": "Seta Oro"},
            {"codice": "S2", "articolo": "Scrigno", "linea": "SETA", "image": "assets/prodotti/S2.svg"},
            {"codice": "K1", "articolo": "Kraft", "linea": "KRAFT"}
        ]"#,
    );
    write(&config.assets_dir.join("linea_SETA.svg"), "<svg/>");
    write(&config.assets_dir.join("default.svg"), "<svg/>");
    write(&config.palette_path, r#"{"caldi": ["SETA ORO"], "neutri": ["kraft"]}"#);
    write(&config.guidance_path, "\nCarta nel bidone blu.\n");

    build_catalog(&config).unwrap();
    let products = read_catalog(&config);
    let by_code = |code: &str| {
        products
            .iter()
            .find(|p| p.codice.as_deref() == Some(code))
            .unwrap()
    };

    assert_eq!(by_code("S1").image.as_deref(), Some("assets/linea_SETA.svg"));
    assert_eq!(by_code("S1").palette.as_deref(), Some("caldi"));
    assert_eq!(by_code("S2").image.as_deref(), Some("assets/prodotti/S2.svg"));
    assert!(by_code("S2").palette.is_none());
    assert!(by_code("K1").image.is_none());
    assert_eq!(by_code("K1").palette.as_deref(), Some("neutri"));
    assert!(products
        .iter()
        .all(|p| p.smaltimento.as_deref() == Some("Carta nel bidone blu.")));
}

#[test]
fn malformed_source_is_skipped() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(&config.data_dir.join("a.json"), "[{\"codice\": ");
    write(
        &config.data_dir.join("b.json"),
        r#"[{"codice": "B1", "articolo": "Busta"}]"#,
    );

    let report = build_catalog(&config).unwrap();
    assert_eq!(report.products, 1);
    assert_eq!(report.sources_read, 1);
}

#[test]
fn output_is_sorted_by_name() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(
        &config.data_dir.join("prodotti.json"),
        r#"[
            {"codice": "3", "articolo": "zaino"},
            {"codice": "1", "articolo": "Älbero"},
            {"codice": "2", "articolo": "borsa"}
        ]"#,
    );

    build_catalog(&config).unwrap();
    let names: Vec<_> = read_catalog(&config)
        .into_iter()
        .filter_map(|p| p.articolo)
        .collect();
    assert_eq!(names, vec!["Älbero", "borsa", "zaino"]);
}

#[test]
fn plan_does_not_write_output() {
    let root = tempfile::tempdir().unwrap();
    let config = BuildConfig::rooted_at(root.path());
    write(
        &config.data_dir.join("prodotti.json"),
        r#"[{"codice": "A1"}, {"note": "senza chiave"}]"#,
    );

    let plan = plan_catalog(&config);
    assert_eq!(plan.products.len(), 1);
    assert_eq!(plan.stats.records_seen, 2);
    assert_eq!(plan.stats.dropped, 1);
    assert!(!config.output_path.exists());
}
