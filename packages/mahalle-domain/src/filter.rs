use crate::{
	catalog::Catalog,
	preferences::PreferenceRecord,
	records::{EarthquakeSim, NeighborhoodRecord},
};

/// Catalog-ordered ids surviving every applied predicate, plus the trace of
/// constraint descriptions for observability.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
	pub ids: Vec<String>,
	pub trace: Vec<String>,
}

impl CandidateSet {
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

#[derive(Clone, Copy, Debug)]
pub struct FilterSettings {
	/// Effective apartment area when the preference record carries no size.
	pub default_area_sqm: f64,
}

impl Default for FilterSettings {
	fn default() -> Self {
		Self { default_area_sqm: 80.0 }
	}
}

/// One boolean test derived from a non-null preference field. `Noted`
/// carries no machine-checkable test and exists only for the trace.
enum Predicate {
	Budget { limit: f64, area_sqm: f64 },
	MinCount { threshold: u32, count: fn(&NeighborhoodRecord) -> u32 },
	MinIndex { threshold: f64, index: fn(&NeighborhoodRecord) -> f64 },
	MaxPopulation { limit: u64 },
	MinStations { threshold: u32 },
	QuakeMax { limit: u64, figure: fn(&EarthquakeSim) -> u64 },
	Noted,
}

impl Predicate {
	fn holds(&self, record: &NeighborhoodRecord) -> bool {
		match self {
			Self::Budget { limit, area_sqm } => record.rent_per_sqm * area_sqm <= *limit,
			Self::MinCount { threshold, count } => count(record) >= *threshold,
			Self::MinIndex { threshold, index } => index(record) >= *threshold,
			Self::MaxPopulation { limit } => record.population <= *limit,
			Self::MinStations { threshold } => record.total_stations >= *threshold,
			// A record without simulation data cannot demonstrate the bound.
			Self::QuakeMax { limit, figure } => {
				record.earthquake.as_ref().map(|sim| figure(sim) <= *limit).unwrap_or(false)
			},
			Self::Noted => true,
		}
	}
}

struct ActivePredicate {
	description: String,
	predicate: Predicate,
}

type AmenityRow = (&'static str, Option<u32>, fn(&NeighborhoodRecord) -> u32);
type IndexRow = (&'static str, Option<f64>, fn(&NeighborhoodRecord) -> f64);
type QuakeRow = (&'static str, Option<u64>, fn(&EarthquakeSim) -> u64);

/// Builds the predicate list in the documented application order. The order
/// fixes the trace layout only; the predicates are independent per-record
/// tests and commute.
fn active_predicates(prefs: &PreferenceRecord, settings: FilterSettings) -> Vec<ActivePredicate> {
	let mut active = Vec::new();

	if let Some(limit) = prefs.monthly_budget {
		let area_sqm = prefs.apartment_size_sqm.unwrap_or(settings.default_area_sqm);

		active.push(ActivePredicate {
			description: format!("Budget: <= {limit:.0} TRY/month"),
			predicate: Predicate::Budget { limit, area_sqm },
		});
	}

	let amenity_rows: [AmenityRow; 8] = [
		("Parks", prefs.min_parks, |record| record.parks),
		("Schools", prefs.min_schools, |record| record.schools),
		("Restaurants", prefs.min_restaurants, |record| record.restaurants),
		("Cafes", prefs.min_cafes, |record| record.cafes),
		("Hospitals", prefs.min_hospitals, |record| record.hospitals),
		("Pharmacies", prefs.min_pharmacies, |record| record.pharmacies),
		("Libraries", prefs.min_libraries, |record| record.libraries),
		("Mosques", prefs.min_mosques, |record| record.mosques),
	];

	for (label, threshold, count) in amenity_rows {
		if let Some(threshold) = threshold {
			active.push(ActivePredicate {
				description: format!("{label}: >= {threshold}"),
				predicate: Predicate::MinCount { threshold, count },
			});
		}
	}

	let index_rows: [IndexRow; 4] = [
		("Green Index", prefs.min_green_index, |record| record.green_index),
		("Welfare Index", prefs.min_welfare_index, |record| record.welfare_index),
		("Walkability", prefs.min_walkability, |record| record.walkability_index),
		("Cultural Index", prefs.min_cultural_index, |record| record.cultural_index),
	];

	for (label, threshold, index) in index_rows {
		if let Some(threshold) = threshold {
			active.push(ActivePredicate {
				description: format!("{label}: >= {threshold:.2}"),
				predicate: Predicate::MinIndex { threshold, index },
			});
		}
	}

	if let Some(limit) = prefs.max_population {
		active.push(ActivePredicate {
			description: format!("Population: <= {limit}"),
			predicate: Predicate::MaxPopulation { limit },
		});
	}
	if let Some(threshold) = prefs.min_total_stations {
		active.push(ActivePredicate {
			description: format!("Total Stations (bus+train+transit): >= {threshold}"),
			predicate: Predicate::MinStations { threshold },
		});
	}

	let quake_rows: [QuakeRow; 5] = [
		("Max Casualties (earthquake sim)", prefs.max_casualties, |sim| sim.casualties),
		("Max Severely Damaged Buildings", prefs.max_severely_damaged, |sim| sim.severely_damaged),
		("Max Heavily Damaged Buildings", prefs.max_heavily_damaged, |sim| sim.heavily_damaged),
		("Max Moderately Damaged Buildings", prefs.max_moderately_damaged, |sim| {
			sim.moderately_damaged
		}),
		("Max People Needing Shelter", prefs.max_shelter_needed, |sim| sim.shelter_needed),
	];

	for (label, limit, figure) in quake_rows {
		if let Some(limit) = limit {
			active.push(ActivePredicate {
				description: format!("{label}: <= {limit}"),
				predicate: Predicate::QuakeMax { limit, figure },
			});
		}
	}

	// The bare flag is not enforceable; numeric bounds are the only form
	// that filters. Recorded so the trace shows the request was seen.
	if prefs.earthquake_safe == Some(true) && !prefs.has_earthquake_bounds() {
		active.push(ActivePredicate {
			description: "Earthquake safety requested (no numeric bound)".to_string(),
			predicate: Predicate::Noted,
		});
	}
	if let Some(kind) = prefs.building_type.as_deref() {
		active.push(ActivePredicate {
			description: format!("Building type preference noted: {kind} (no hard filter)"),
			predicate: Predicate::Noted,
		});
	}
	if let Some(leaning) = prefs.political_leaning.as_deref() {
		active.push(ActivePredicate {
			description: format!("Political leaning preference noted: {leaning} (no hard filter)"),
			predicate: Predicate::Noted,
		});
	}
	if let Some(tags) = prefs.lifestyle.as_deref() {
		active.push(ActivePredicate {
			description: format!("Lifestyle preference noted: {} (no hard filter)", tags.join(", ")),
			predicate: Predicate::Noted,
		});
	}

	active
}

/// Applies every active predicate to the catalog. Pure; catalog order is
/// preserved. Every applied predicate lands in the trace whether or not it
/// removed a record.
pub fn filter_catalog(
	catalog: &Catalog,
	prefs: &PreferenceRecord,
	settings: FilterSettings,
) -> CandidateSet {
	let predicates = active_predicates(prefs, settings);
	let trace = predicates.iter().map(|active| active.description.clone()).collect();
	let ids = catalog
		.records()
		.iter()
		.filter(|record| predicates.iter().all(|active| active.predicate.holds(record)))
		.map(|record| record.id.clone())
		.collect();

	CandidateSet { ids, trace }
}
