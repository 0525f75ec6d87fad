use ahash::AHashSet;
use serde::Serialize;

use crate::MahalleService;

#[derive(Clone, Debug, Serialize)]
pub struct ListItem {
	pub id: String,
	pub neighborhood: String,
	pub district: String,
	pub rent_per_sqm: f64,
	pub welfare_index: f64,
	pub population: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListResponse {
	pub total: usize,
	pub neighborhoods: Vec<ListItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatsResponse {
	pub total_neighborhoods: usize,
	pub districts: usize,
	pub averages: StatAverages,
	pub rent_range: RentRange,
	pub amenity_totals: AmenityTotals,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct StatAverages {
	pub green_index: f64,
	pub welfare_index: f64,
	pub walkability_index: f64,
	pub cultural_index: f64,
	pub rent_per_sqm: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct RentRange {
	pub min: f64,
	pub max: f64,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct AmenityTotals {
	pub restaurants: u64,
	pub schools: u64,
	pub parks: u64,
	pub cafes: u64,
	pub hospitals: u64,
	pub pharmacies: u64,
	pub mosques: u64,
	pub libraries: u64,
}

impl MahalleService {
	/// Catalog listing in load order.
	pub fn list(&self) -> ListResponse {
		let neighborhoods = self
			.catalog
			.records()
			.iter()
			.map(|record| ListItem {
				id: record.id.clone(),
				neighborhood: record.name.clone(),
				district: record.district.clone(),
				rent_per_sqm: record.rent_per_sqm,
				welfare_index: record.welfare_index,
				population: record.population,
			})
			.collect::<Vec<_>>();

		ListResponse { total: neighborhoods.len(), neighborhoods }
	}

	/// Catalog-wide aggregates. Zeroes throughout for an empty catalog.
	pub fn stats(&self) -> StatsResponse {
		let records = self.catalog.records();
		let count = records.len();
		let districts: AHashSet<&str> =
			records.iter().map(|record| record.district.as_str()).collect();
		let mut averages = StatAverages {
			green_index: 0.0,
			welfare_index: 0.0,
			walkability_index: 0.0,
			cultural_index: 0.0,
			rent_per_sqm: 0.0,
		};
		let mut rent_range = RentRange { min: 0.0, max: 0.0 };
		let mut amenity_totals = AmenityTotals::default();

		if count > 0 {
			rent_range = RentRange { min: f64::INFINITY, max: f64::NEG_INFINITY };

			for record in records {
				averages.green_index += record.green_index;
				averages.welfare_index += record.welfare_index;
				averages.walkability_index += record.walkability_index;
				averages.cultural_index += record.cultural_index;
				averages.rent_per_sqm += record.rent_per_sqm;
				rent_range.min = rent_range.min.min(record.rent_per_sqm);
				rent_range.max = rent_range.max.max(record.rent_per_sqm);
				amenity_totals.restaurants += u64::from(record.restaurants);
				amenity_totals.schools += u64::from(record.schools);
				amenity_totals.parks += u64::from(record.parks);
				amenity_totals.cafes += u64::from(record.cafes);
				amenity_totals.hospitals += u64::from(record.hospitals);
				amenity_totals.pharmacies += u64::from(record.pharmacies);
				amenity_totals.mosques += u64::from(record.mosques);
				amenity_totals.libraries += u64::from(record.libraries);
			}

			let divisor = count as f64;

			averages.green_index /= divisor;
			averages.welfare_index /= divisor;
			averages.walkability_index /= divisor;
			averages.cultural_index /= divisor;
			averages.rent_per_sqm /= divisor;
		}

		StatsResponse {
			total_neighborhoods: count,
			districts: districts.len(),
			averages,
			rent_range,
			amenity_totals,
		}
	}
}
