use ahash::AHashMap;

use crate::records::{NeighborhoodRecord, UNKNOWN_NAME};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("Duplicate neighborhood id {id}.")]
	DuplicateId { id: String },
	#[error("Record {id} has a non-positive rent_per_sqm.")]
	InvalidRent { id: String },
}

/// The immutable set of neighborhoods available for recommendation. Built
/// once at process start and only read afterwards.
#[derive(Debug)]
pub struct Catalog {
	records: Vec<NeighborhoodRecord>,
	by_id: AHashMap<String, usize>,
}

impl Catalog {
	/// Normalizes raw records into the catalog: drops sentinel rows, derives
	/// `id` and `total_stations`, and enforces id uniqueness.
	pub fn from_records(raw: Vec<NeighborhoodRecord>) -> Result<Self, CatalogError> {
		let mut records = Vec::with_capacity(raw.len());
		let mut by_id = AHashMap::with_capacity(raw.len());

		for mut record in raw {
			if record.name == UNKNOWN_NAME {
				continue;
			}

			record.id = NeighborhoodRecord::normalized_id(&record.district, &record.name);
			record.total_stations =
				record.bus_stations + record.train_stations + record.transit_stations;

			if !(record.rent_per_sqm > 0.0) {
				return Err(CatalogError::InvalidRent { id: record.id });
			}
			if by_id.insert(record.id.clone(), records.len()).is_some() {
				return Err(CatalogError::DuplicateId { id: record.id });
			}

			records.push(record);
		}

		Ok(Self { records, by_id })
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Records in load order. The constraint filter and the fallback ranker
	/// both rely on this order being stable.
	pub fn records(&self) -> &[NeighborhoodRecord] {
		&self.records
	}

	pub fn get(&self, id: &str) -> Option<&NeighborhoodRecord> {
		self.by_id.get(id).map(|index| &self.records[*index])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw_record(district: &str, name: &str) -> NeighborhoodRecord {
		NeighborhoodRecord {
			district: district.to_string(),
			name: name.to_string(),
			id: String::new(),
			green_index: 0.5,
			welfare_index: 0.5,
			walkability_index: 0.5,
			cultural_index: 0.5,
			restaurants: 0,
			schools: 0,
			parks: 0,
			cafes: 0,
			hospitals: 0,
			pharmacies: 0,
			mosques: 0,
			libraries: 0,
			population: 10_000,
			bus_stations: 3,
			train_stations: 1,
			transit_stations: 2,
			total_stations: 0,
			rent_per_sqm: 400.0,
			earthquake: None,
		}
	}

	#[test]
	fn derives_total_stations_at_load() {
		let catalog = Catalog::from_records(vec![raw_record("Kadikoy", "Moda")])
			.expect("catalog must build");
		let record = catalog.get("Kadikoy_Moda").expect("record must exist");

		assert_eq!(
			record.total_stations,
			record.bus_stations + record.train_stations + record.transit_stations
		);
	}

	#[test]
	fn drops_sentinel_rows() {
		let catalog =
			Catalog::from_records(vec![raw_record("Kadikoy", "Moda"), raw_record("Sisli", UNKNOWN_NAME)])
				.expect("catalog must build");

		assert_eq!(catalog.len(), 1);
		assert!(catalog.get("Sisli_Unknown").is_none());
	}

	#[test]
	fn rejects_duplicate_ids() {
		let result =
			Catalog::from_records(vec![raw_record("Kadikoy", "Moda"), raw_record("Kadikoy", "Moda")]);

		assert!(matches!(result, Err(CatalogError::DuplicateId { .. })));
	}

	#[test]
	fn rejects_non_positive_rent() {
		let mut record = raw_record("Kadikoy", "Moda");

		record.rent_per_sqm = 0.0;

		assert!(matches!(
			Catalog::from_records(vec![record]),
			Err(CatalogError::InvalidRent { .. })
		));
	}
}
