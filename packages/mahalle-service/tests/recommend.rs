use std::{sync::Arc, time::Duration};

use mahalle_domain::{Catalog, PreferenceRecord};
use mahalle_service::{
	MahalleService, Providers, RecommendRequest, ServiceError, recommend::UNFILTERED_RATIONALE,
};
use mahalle_storage::qdrant::ScoredId;
use mahalle_testkit::{
	DelayedIndex, FailingOracle, ScriptedEmbedding, ScriptedIndex, StaticOracle, TEST_VECTOR_DIM,
	sample_record, test_config,
};

fn catalog() -> Catalog {
	let mut moda = sample_record("Kadikoy", "Moda");
	let mut tesvikiye = sample_record("Sisli", "Tesvikiye");
	let mut etiler = sample_record("Besiktas", "Etiler");

	moda.rent_per_sqm = 300.0;
	moda.parks = 2;
	moda.welfare_index = 0.9;
	tesvikiye.rent_per_sqm = 600.0;
	tesvikiye.parks = 0;
	tesvikiye.welfare_index = 0.5;
	etiler.rent_per_sqm = 400.0;
	etiler.parks = 3;
	etiler.welfare_index = 0.7;

	Catalog::from_records(vec![moda, tesvikiye, etiler]).expect("catalog must build")
}

fn budget_and_parks() -> PreferenceRecord {
	PreferenceRecord {
		monthly_budget: Some(32_000.0),
		min_parks: Some(1),
		preferences_text: Some("affordable area with parks".to_string()),
		..PreferenceRecord::default()
	}
}

fn service(
	embedding: Arc<ScriptedEmbedding>,
	oracle: Arc<StaticOracle>,
	index: Arc<ScriptedIndex>,
) -> MahalleService {
	MahalleService::with_providers(
		test_config(),
		catalog(),
		Providers::new(embedding, oracle, index),
	)
}

fn request(query: &str) -> RecommendRequest {
	RecommendRequest { query: query.to_string(), top_k: None }
}

#[tokio::test]
async fn results_keep_index_order_and_skip_filtered_hits() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![
		ScoredId { id: "Besiktas_Etiler".to_string(), distance: 0.1 },
		ScoredId { id: "Sisli_Tesvikiye".to_string(), distance: 0.2 },
		ScoredId { id: "Kadikoy_Moda".to_string(), distance: 0.3 },
	]));
	let svc = service(embedding, oracle, index);
	let response =
		svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");
	let names: Vec<&str> =
		response.recommendations.iter().map(|item| item.neighborhood.as_str()).collect();

	// Tesvikiye scored well but failed the parks filter; it never appears.
	assert_eq!(names, ["Etiler", "Moda"]);
	assert_eq!(response.recommendations[0].rank, 1);
	assert_eq!(response.recommendations[0].similarity_score, "90.0%");
	assert_eq!(response.recommendations[1].rank, 2);
	assert_eq!(response.recommendations[1].similarity_score, "70.0%");
	assert_eq!(response.total_neighborhoods, 3);
	assert_eq!(response.filtered_neighborhoods, 2);
	assert!(response.filters_applied.iter().any(|line| line == "Budget: <= 32000 TRY/month"));
	assert!(response.filters_applied.iter().any(|line| line == "Parks: >= 1"));
}

#[tokio::test]
async fn top_k_caps_the_result_list() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![
		ScoredId { id: "Besiktas_Etiler".to_string(), distance: 0.1 },
		ScoredId { id: "Kadikoy_Moda".to_string(), distance: 0.3 },
	]));
	let svc = service(embedding, oracle, index);
	let response = svc
		.recommend(RecommendRequest {
			query: "affordable area with parks".to_string(),
			top_k: Some(1),
		})
		.await
		.expect("pipeline must run");

	assert_eq!(response.recommendations.len(), 1);
	assert_eq!(response.recommendations[0].neighborhood, "Etiler");
}

#[tokio::test]
async fn blank_query_and_zero_top_k_are_rejected() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(PreferenceRecord::default(), "No constraints."));
	let index = Arc::new(ScriptedIndex::with_hits(Vec::new()));
	let svc = service(embedding, oracle, index);

	assert!(matches!(
		svc.recommend(request("   ")).await,
		Err(ServiceError::InvalidRequest { .. })
	));
	assert!(matches!(
		svc.recommend(RecommendRequest { query: "anywhere nice".to_string(), top_k: Some(0) })
			.await,
		Err(ServiceError::InvalidRequest { .. })
	));
}

#[tokio::test]
async fn summary_drives_the_embedded_query_text() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Kadikoy_Moda".to_string(),
		distance: 0.2,
	}]));
	let svc = service(embedding.clone(), oracle, index);

	svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");

	assert_eq!(
		embedding.last_texts().expect("embedding must be called"),
		vec!["affordable area with parks".to_string()]
	);
}

#[tokio::test]
async fn empty_summary_falls_back_to_the_generic_phrase() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let prefs = PreferenceRecord { preferences_text: None, ..budget_and_parks() };
	let oracle = Arc::new(StaticOracle::new(prefs, "Budget and parks."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Kadikoy_Moda".to_string(),
		distance: 0.2,
	}]));
	let svc = service(embedding.clone(), oracle, index);

	svc.recommend(request("somewhere to live")).await.expect("pipeline must run");

	assert_eq!(
		embedding.last_texts().expect("embedding must be called"),
		vec!["good neighborhood".to_string()]
	);
}

#[tokio::test]
async fn oracle_failure_degrades_to_an_unfiltered_request() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let index = Arc::new(ScriptedIndex::with_hits(vec![
		ScoredId { id: "Sisli_Tesvikiye".to_string(), distance: 0.1 },
		ScoredId { id: "Kadikoy_Moda".to_string(), distance: 0.2 },
	]));
	let svc = MahalleService::with_providers(
		test_config(),
		catalog(),
		Providers::new(embedding, Arc::new(FailingOracle), index),
	);
	let response = svc.recommend(request("anywhere nice")).await.expect("pipeline must run");

	assert_eq!(response.preferences, PreferenceRecord::default());
	assert_eq!(response.reasoning, UNFILTERED_RATIONALE);
	assert!(response.filters_applied.is_empty());
	assert_eq!(response.filtered_neighborhoods, 3);
	assert_eq!(response.recommendations.len(), 2);
}

#[tokio::test]
async fn retrieval_failure_falls_back_to_welfare_ranking() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	let index = Arc::new(ScriptedIndex::failing());
	let svc = service(embedding, oracle, index);
	let response =
		svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");
	let names: Vec<&str> =
		response.recommendations.iter().map(|item| item.neighborhood.as_str()).collect();

	// Welfare descending over the survivors: Moda 0.9, Etiler 0.7.
	assert_eq!(names, ["Moda", "Etiler"]);
	assert!(
		response
			.recommendations
			.iter()
			.all(|item| item.similarity_score == "50.0%")
	);
}

#[tokio::test]
async fn slow_index_queries_hit_the_deadline_and_fall_back() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	// The index would answer with a perfect hit, but only after the deadline.
	let index = Arc::new(DelayedIndex::with_hits(
		Duration::from_millis(200),
		vec![ScoredId { id: "Besiktas_Etiler".to_string(), distance: 0.1 }],
	));
	let mut cfg = test_config();

	cfg.storage.qdrant.timeout_ms = 50;

	let svc =
		MahalleService::with_providers(cfg, catalog(), Providers::new(embedding, oracle, index.clone()));
	let response =
		svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");
	let names: Vec<&str> =
		response.recommendations.iter().map(|item| item.neighborhood.as_str()).collect();

	assert_eq!(index.query_calls(), 1);
	assert_eq!(names, ["Moda", "Etiler"]);
	assert!(
		response
			.recommendations
			.iter()
			.all(|item| item.similarity_score == "50.0%")
	);
}

#[tokio::test]
async fn far_hits_never_show_a_negative_similarity() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	// A cosine score below zero comes back as a distance above one.
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Besiktas_Etiler".to_string(),
		distance: 1.3,
	}]));
	let svc = service(embedding, oracle, index);
	let response =
		svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");

	assert_eq!(response.recommendations[0].neighborhood, "Etiler");
	assert_eq!(response.recommendations[0].similarity_score, "0.0%");
}

#[tokio::test]
async fn stale_index_hits_trigger_the_fallback() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	// Only a filtered-out id comes back, as after a stale rebuild.
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Sisli_Tesvikiye".to_string(),
		distance: 0.1,
	}]));
	let svc = service(embedding, oracle, index);
	let response =
		svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");
	let names: Vec<&str> =
		response.recommendations.iter().map(|item| item.neighborhood.as_str()).collect();

	assert_eq!(names, ["Moda", "Etiler"]);
}

#[tokio::test]
async fn empty_candidate_set_never_queries_the_index() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let prefs = PreferenceRecord { monthly_budget: Some(1_000.0), ..PreferenceRecord::default() };
	let oracle = Arc::new(StaticOracle::new(prefs, "Impossible budget."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Kadikoy_Moda".to_string(),
		distance: 0.2,
	}]));
	let svc = service(embedding.clone(), oracle, index.clone());
	let response = svc.recommend(request("very cheap place")).await.expect("pipeline must run");

	assert_eq!(response.filtered_neighborhoods, 0);
	assert!(response.recommendations.is_empty());
	assert_eq!(index.query_calls(), 0);
	assert_eq!(embedding.calls(), 0);
	assert!(response.filters_applied.iter().any(|line| line == "Budget: <= 1000 TRY/month"));
}

#[tokio::test]
async fn financial_block_follows_the_budget() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let oracle = Arc::new(StaticOracle::new(budget_and_parks(), "Budget and parks."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Kadikoy_Moda".to_string(),
		distance: 0.2,
	}]));
	let svc = service(embedding, oracle, index);
	let response =
		svc.recommend(request("affordable area with parks")).await.expect("pipeline must run");
	let financial =
		response.recommendations[0].financial.as_ref().expect("budget implies financials");

	assert_eq!(financial.estimated_rent, 24_000.0);
	assert_eq!(financial.budget_remaining, 8_000.0);
	assert!(
		response.recommendations[0]
			.match_reasons
			.iter()
			.any(|reason| reason == "Well under budget (saves 8000 TRY)")
	);
}

#[tokio::test]
async fn no_budget_means_no_financial_block() {
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize));
	let prefs = PreferenceRecord {
		min_parks: Some(1),
		preferences_text: Some("green area".to_string()),
		..PreferenceRecord::default()
	};
	let oracle = Arc::new(StaticOracle::new(prefs, "Parks only."));
	let index = Arc::new(ScriptedIndex::with_hits(vec![ScoredId {
		id: "Kadikoy_Moda".to_string(),
		distance: 0.2,
	}]));
	let svc = service(embedding, oracle, index);
	let response = svc.recommend(request("green area")).await.expect("pipeline must run");

	assert!(response.recommendations[0].financial.is_none());
}
