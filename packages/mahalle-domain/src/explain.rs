use crate::{finance::Financials, preferences::PreferenceRecord, records::NeighborhoodRecord};

/// Remaining budget above this margin upgrades the financial claim.
const WELL_UNDER_BUDGET_MARGIN: f64 = 5_000.0;
/// Casualty tier boundaries for earthquake-safety claims; above the upper
/// boundary no claim is generated.
const QUAKE_GOOD_CASUALTIES: u64 = 5;
const QUAKE_MODERATE_CASUALTIES: u64 = 10;

type CountReason = (&'static str, Option<u32>, fn(&NeighborhoodRecord) -> u32);
type IndexReason = (&'static str, Option<f64>, fn(&NeighborhoodRecord) -> f64);

/// Derives the ordered reason list for one result. Reasons are generated
/// only for preferences that were both specified and satisfied; unmet
/// thresholds yield nothing. Pure function of its inputs.
pub fn explain_match(
	record: &NeighborhoodRecord,
	prefs: &PreferenceRecord,
	financials: Option<&Financials>,
) -> Vec<String> {
	let mut reasons = Vec::new();

	if let Some(financials) = financials {
		if financials.budget_remaining > WELL_UNDER_BUDGET_MARGIN {
			reasons.push(format!(
				"Well under budget (saves {:.0} TRY)",
				financials.budget_remaining
			));
		} else if financials.budget_remaining > 0.0 {
			reasons.push(format!("Within budget (saves {:.0} TRY)", financials.budget_remaining));
		}
	}

	let index_reasons: [IndexReason; 4] = [
		("green space", prefs.min_green_index, |record| record.green_index),
		("welfare", prefs.min_welfare_index, |record| record.welfare_index),
		("walkability", prefs.min_walkability, |record| record.walkability_index),
		("cultural activity", prefs.min_cultural_index, |record| record.cultural_index),
	];

	for (label, threshold, index) in index_reasons {
		if let Some(threshold) = threshold {
			let value = index(record);

			if value >= threshold {
				reasons.push(format!("Meets {label} requirement ({value:.2})"));
			}
		}
	}

	let count_reasons: [CountReason; 8] = [
		("schools", prefs.min_schools, |record| record.schools),
		("parks", prefs.min_parks, |record| record.parks),
		("restaurants", prefs.min_restaurants, |record| record.restaurants),
		("cafes", prefs.min_cafes, |record| record.cafes),
		("hospitals", prefs.min_hospitals, |record| record.hospitals),
		("pharmacies", prefs.min_pharmacies, |record| record.pharmacies),
		("libraries", prefs.min_libraries, |record| record.libraries),
		("mosques", prefs.min_mosques, |record| record.mosques),
	];

	for (label, threshold, count) in count_reasons {
		if let Some(threshold) = threshold {
			let value = count(record);

			if value >= threshold {
				reasons.push(format!("Has {value} {label}"));
			}
		}
	}

	if let Some(threshold) = prefs.min_total_stations
		&& record.total_stations >= threshold
	{
		reasons.push(format!("Good public transport ({} stations)", record.total_stations));
	}

	if (prefs.earthquake_safe == Some(true) || prefs.max_casualties.is_some())
		&& let Some(sim) = record.earthquake.as_ref()
	{
		if sim.casualties == 0 {
			reasons.push("Excellent earthquake safety (0 expected casualties)".to_string());
		} else if sim.casualties <= QUAKE_GOOD_CASUALTIES {
			reasons.push(format!(
				"Good earthquake safety ({} expected casualties)",
				sim.casualties
			));
		} else if sim.casualties <= QUAKE_MODERATE_CASUALTIES {
			reasons.push(format!(
				"Moderate earthquake safety ({} expected casualties)",
				sim.casualties
			));
		}
	}

	reasons
}
