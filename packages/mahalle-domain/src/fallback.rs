use std::cmp::Ordering;

use crate::records::NeighborhoodRecord;

/// Fixed similarity attached to fallback-ranked results, which carry no
/// embedding distance.
pub const FALLBACK_SIMILARITY: f64 = 0.5;

/// Deterministic secondary ranking: welfare index descending. The input is
/// expected in catalog order and the sort is stable, so ties keep that
/// order and repeated invocations agree.
pub fn rank_by_welfare<'a>(
	mut records: Vec<&'a NeighborhoodRecord>,
	n: usize,
) -> Vec<&'a NeighborhoodRecord> {
	records.sort_by(|a, b| {
		b.welfare_index.partial_cmp(&a.welfare_index).unwrap_or(Ordering::Equal)
	});
	records.truncate(n);

	records
}
