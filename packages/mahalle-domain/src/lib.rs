pub mod catalog;
pub mod describe;
pub mod explain;
pub mod fallback;
pub mod filter;
pub mod finance;
pub mod preferences;
pub mod records;

pub use catalog::{Catalog, CatalogError};
pub use filter::{CandidateSet, FilterSettings, filter_catalog};
pub use finance::Financials;
pub use preferences::PreferenceRecord;
pub use records::{EarthquakeSim, NeighborhoodRecord};
