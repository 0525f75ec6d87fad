use serde::Serialize;

use crate::{preferences::PreferenceRecord, records::NeighborhoodRecord};

/// Estimated monthly rent and what the stated budget leaves over. Only
/// produced when a budget was specified.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Financials {
	pub estimated_rent: f64,
	pub budget_remaining: f64,
}

/// The budget filter upstream guarantees `budget_remaining >= 0` for any
/// record that survived it; the pipeline treats a negative remainder as an
/// invariant violation rather than clamping it here.
pub fn annotate(
	record: &NeighborhoodRecord,
	prefs: &PreferenceRecord,
	default_area_sqm: f64,
) -> Option<Financials> {
	let budget = prefs.monthly_budget?;
	let area_sqm = prefs.apartment_size_sqm.unwrap_or(default_area_sqm);
	let estimated_rent = record.rent_per_sqm * area_sqm;

	Some(Financials { estimated_rent, budget_remaining: budget - estimated_rent })
}
