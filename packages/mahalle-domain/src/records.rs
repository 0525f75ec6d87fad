use serde::{Deserialize, Serialize};

/// Sentinel name used by the upstream data set for rows without a resolved
/// neighborhood; such rows never enter the catalog.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Simulation outputs for the reference earthquake scenario. The block is
/// absent as a whole when no simulation was run for the neighborhood.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct EarthquakeSim {
	pub casualties: u64,
	pub severely_damaged: u64,
	pub heavily_damaged: u64,
	pub moderately_damaged: u64,
	pub shelter_needed: u64,
}

/// One row of the catalog. Immutable after load; `id` and `total_stations`
/// are derived once by [`crate::Catalog::from_records`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NeighborhoodRecord {
	pub district: String,
	pub name: String,
	#[serde(default)]
	pub id: String,
	pub green_index: f64,
	pub welfare_index: f64,
	pub walkability_index: f64,
	pub cultural_index: f64,
	pub restaurants: u32,
	pub schools: u32,
	pub parks: u32,
	pub cafes: u32,
	pub hospitals: u32,
	pub pharmacies: u32,
	pub mosques: u32,
	pub libraries: u32,
	pub population: u64,
	pub bus_stations: u32,
	pub train_stations: u32,
	pub transit_stations: u32,
	#[serde(default)]
	pub total_stations: u32,
	pub rent_per_sqm: f64,
	#[serde(default)]
	pub earthquake: Option<EarthquakeSim>,
}

impl NeighborhoodRecord {
	pub fn normalized_id(district: &str, name: &str) -> String {
		format!("{district}_{name}").replace(' ', "_")
	}
}
