use std::{fs, path::Path};

use mahalle_domain::{Catalog, NeighborhoodRecord};

use crate::{Error, Result};

/// Loads the catalog from a JSON array of raw records. Normalization and
/// invariants (sentinel drop, id uniqueness, derived station totals) are
/// enforced by [`Catalog::from_records`].
pub fn load(path: &Path) -> Result<Catalog> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadCatalog { path: path.to_path_buf(), source: err })?;
	let records: Vec<NeighborhoodRecord> = serde_json::from_str(&raw)
		.map_err(|err| Error::ParseCatalog { path: path.to_path_buf(), source: err })?;

	Ok(Catalog::from_records(records)?)
}
