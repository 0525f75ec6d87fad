use serde::{Deserialize, Serialize};

use mahalle_domain::{
	CandidateSet, EarthquakeSim, Financials, FilterSettings, NeighborhoodRecord, PreferenceRecord,
	explain, fallback, filter_catalog, finance,
};

use crate::{
	MahalleService, ServiceError, ServiceResult,
	retrieve::{self, SemanticHit},
};

/// Rationale used when the extraction oracle is unavailable and the request
/// proceeds without structured preferences.
pub const UNFILTERED_RATIONALE: &str =
	"Could not extract structured preferences; showing generally suitable neighborhoods.";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RecommendRequest {
	pub query: String,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecommendResponse {
	pub query: String,
	pub reasoning: String,
	pub preferences: PreferenceRecord,
	pub filters_applied: Vec<String>,
	pub total_neighborhoods: usize,
	pub filtered_neighborhoods: usize,
	pub recommendations: Vec<Recommendation>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
	pub rank: usize,
	pub neighborhood: String,
	pub district: String,
	/// Percentage with one decimal, e.g. `"87.3%"`.
	pub similarity_score: String,
	pub match_reasons: Vec<String>,
	pub details: Details,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub financial: Option<Financials>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Details {
	pub indices: Indices,
	pub population: u64,
	pub amenities: Amenities,
	pub transit: Transit,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub earthquake: Option<EarthquakeSim>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Indices {
	pub green: f64,
	pub welfare: f64,
	pub walkability: f64,
	pub cultural: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Amenities {
	pub restaurants: u32,
	pub schools: u32,
	pub parks: u32,
	pub cafes: u32,
	pub hospitals: u32,
	pub pharmacies: u32,
	pub mosques: u32,
	pub libraries: u32,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Transit {
	pub bus_stations: u32,
	pub train_stations: u32,
	pub transit_stations: u32,
	pub total_stations: u32,
}

impl Details {
	fn from_record(record: &NeighborhoodRecord) -> Self {
		Self {
			indices: Indices {
				green: record.green_index,
				welfare: record.welfare_index,
				walkability: record.walkability_index,
				cultural: record.cultural_index,
			},
			population: record.population,
			amenities: Amenities {
				restaurants: record.restaurants,
				schools: record.schools,
				parks: record.parks,
				cafes: record.cafes,
				hospitals: record.hospitals,
				pharmacies: record.pharmacies,
				mosques: record.mosques,
				libraries: record.libraries,
			},
			transit: Transit {
				bus_stations: record.bus_stations,
				train_stations: record.train_stations,
				transit_stations: record.transit_stations,
				total_stations: record.total_stations,
			},
			earthquake: record.earthquake,
		}
	}
}

impl MahalleService {
	/// Full pipeline: extraction, constraint filter, semantic retrieval with
	/// welfare fallback, annotation and assembly. An oracle failure degrades
	/// to an unfiltered request rather than aborting.
	pub async fn recommend(&self, req: RecommendRequest) -> ServiceResult<RecommendResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "query must be non-empty.".to_string(),
			});
		}

		let (preferences, reasoning) =
			match self.providers.oracle.extract(&self.cfg.providers.oracle, query).await {
				Ok(extracted) => extracted,
				Err(err) => {
					tracing::warn!("Preference extraction failed; continuing unfiltered: {err}");

					(PreferenceRecord::default(), UNFILTERED_RATIONALE.to_string())
				},
			};

		self.recommend_with_preferences(req, preferences, reasoning).await
	}

	/// Pipeline below the oracle, for callers that already hold a structured
	/// preference set.
	pub async fn recommend_with_preferences(
		&self,
		req: RecommendRequest,
		preferences: PreferenceRecord,
		reasoning: String,
	) -> ServiceResult<RecommendResponse> {
		let top_k = match req.top_k {
			Some(0) => {
				return Err(ServiceError::InvalidRequest {
					message: "top_k must be greater than zero.".to_string(),
				});
			},
			Some(k) => k as usize,
			None => self.cfg.search.top_k as usize,
		};
		let settings = FilterSettings { default_area_sqm: self.cfg.search.default_area_sqm };
		let candidates = filter_catalog(&self.catalog, &preferences, settings);
		let mut response = RecommendResponse {
			query: req.query.trim().to_string(),
			reasoning,
			preferences: preferences.clone(),
			filters_applied: candidates.trace.clone(),
			total_neighborhoods: self.catalog.len(),
			filtered_neighborhoods: candidates.len(),
			recommendations: Vec::new(),
		};

		// Nothing survived the constraints; the index is never consulted.
		if candidates.is_empty() {
			return Ok(response);
		}

		let hits = match retrieve::semantic(
			&self.cfg,
			&self.providers,
			self.catalog.len(),
			&candidates,
			preferences.preferences_text.as_deref(),
			top_k,
		)
		.await
		{
			Ok(hits) if !hits.is_empty() => hits,
			Ok(_) => self.fallback_hits(&candidates, top_k)?,
			Err(err) => {
				tracing::warn!("Semantic retrieval failed; ranking by welfare instead: {err}");

				self.fallback_hits(&candidates, top_k)?
			},
		};

		for (position, hit) in hits.iter().enumerate() {
			let record = self.catalog.get(&hit.id).ok_or_else(|| ServiceError::Invariant {
				message: format!("Result id {} is not in the catalog.", hit.id),
			})?;
			let financial = finance::annotate(record, &preferences, settings.default_area_sqm);

			// The budget predicate already removed anything unaffordable.
			if let Some(financial) = financial.as_ref()
				&& financial.budget_remaining < 0.0
			{
				return Err(ServiceError::Invariant {
					message: format!("Negative budget remainder for {}.", record.id),
				});
			}

			let match_reasons = explain::explain_match(record, &preferences, financial.as_ref());

			response.recommendations.push(Recommendation {
				rank: position + 1,
				neighborhood: record.name.clone(),
				district: record.district.clone(),
				// Cosine scores below zero would otherwise surface as a
				// negative percentage.
				similarity_score: format!("{:.1}%", hit.similarity.clamp(0.0, 1.0) * 100.0),
				match_reasons,
				details: Details::from_record(record),
				financial,
			});
		}

		Ok(response)
	}

	/// Deterministic replacement ranking when retrieval fails or returns no
	/// usable hit: welfare index descending over the surviving candidates,
	/// with the fixed fallback similarity.
	fn fallback_hits(&self, candidates: &CandidateSet, n: usize) -> ServiceResult<Vec<SemanticHit>> {
		let survivors = candidates
			.ids
			.iter()
			.map(|id| {
				self.catalog.get(id).ok_or_else(|| ServiceError::Invariant {
					message: format!("Candidate id {id} is not in the catalog."),
				})
			})
			.collect::<ServiceResult<Vec<_>>>()?;
		let ranked = fallback::rank_by_welfare(survivors, n);

		Ok(ranked
			.into_iter()
			.map(|record| SemanticHit {
				id: record.id.clone(),
				similarity: fallback::FALLBACK_SIMILARITY,
			})
			.collect())
	}
}
