pub mod aggregate;
pub mod convert;
pub mod enrich;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod raw;
pub mod sources;

pub use aggregate::{aggregate, Catalog, FoldOutcome, FoldStats};
pub use convert::{convert_file, convert_price_list, PriceListRecord};
pub use enrich::Enricher;
pub use error::BuildError;
pub use merge::{merge_products, reconcile_variants};
pub use normalize::{normalize_csv_row, normalize_product};
pub use pipeline::{build_catalog, plan_catalog, BuildReport, CatalogPlan};
pub use sources::{discover_sources, load_source, LoadedSource, SourceFormat, SourceSpec};
