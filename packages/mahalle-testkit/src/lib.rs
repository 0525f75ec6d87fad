//! Scripted providers and fixture builders shared by the service and API
//! tests. Nothing here talks to the network.

use std::{
	path::PathBuf,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use color_eyre::eyre;

use mahalle_config::Config;
use mahalle_domain::{NeighborhoodRecord, PreferenceRecord};
use mahalle_service::{BoxFuture, EmbeddingProvider, PreferenceOracle, VectorIndex};
use mahalle_storage::qdrant::ScoredId;

pub const TEST_VECTOR_DIM: u32 = 8;

/// In-memory config with test defaults; provider endpoints point nowhere on
/// purpose.
pub fn test_config() -> Config {
	Config {
		service: mahalle_config::Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		catalog: mahalle_config::Catalog { path: PathBuf::from("neighborhoods.json") },
		storage: mahalle_config::Storage {
			qdrant: mahalle_config::Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "neighborhoods_test".to_string(),
				vector_dim: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
			},
		},
		providers: mahalle_config::Providers {
			embedding: mahalle_config::EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			oracle: mahalle_config::OracleProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-oracle".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		search: mahalle_config::Search {
			top_k: 3,
			oversample_cap: 50,
			default_area_sqm: 80.0,
			generic_query: "good neighborhood".to_string(),
			rebuild_batch_size: 4,
		},
	}
}

/// Raw record with moderate values; `id` and `total_stations` are left for
/// catalog normalization to derive.
pub fn sample_record(district: &str, name: &str) -> NeighborhoodRecord {
	NeighborhoodRecord {
		district: district.to_string(),
		name: name.to_string(),
		id: String::new(),
		green_index: 0.6,
		welfare_index: 0.6,
		walkability_index: 0.6,
		cultural_index: 0.6,
		restaurants: 5,
		schools: 2,
		parks: 2,
		cafes: 4,
		hospitals: 1,
		pharmacies: 2,
		mosques: 1,
		libraries: 1,
		population: 15_000,
		bus_stations: 4,
		train_stations: 1,
		transit_stations: 2,
		total_stations: 0,
		rent_per_sqm: 350.0,
		earthquake: None,
	}
}

/// Embedding provider returning zero vectors of a fixed dimension, recording
/// the texts it was asked to embed.
pub struct ScriptedEmbedding {
	dimensions: usize,
	calls: AtomicUsize,
	last_texts: Mutex<Option<Vec<String>>>,
}

impl ScriptedEmbedding {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions, calls: AtomicUsize::new(0), last_texts: Mutex::new(None) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn last_texts(&self) -> Option<Vec<String>> {
		self.last_texts.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

impl EmbeddingProvider for ScriptedEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a mahalle_config::EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			*self.last_texts.lock().unwrap_or_else(|err| err.into_inner()) = Some(texts.to_vec());

			Ok(texts.iter().map(|_| vec![0.0; self.dimensions]).collect())
		})
	}
}

pub struct FailingEmbedding;

impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a mahalle_config::EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Err(eyre::eyre!("Embedding provider is scripted to fail.")) })
	}
}

/// Vector index answering every query with a fixed hit list (or a scripted
/// failure), counting queries and upserts.
pub struct ScriptedIndex {
	hits: Vec<ScoredId>,
	fail: bool,
	query_calls: AtomicUsize,
	upsert_calls: AtomicUsize,
}

impl ScriptedIndex {
	pub fn with_hits(hits: Vec<ScoredId>) -> Self {
		Self {
			hits,
			fail: false,
			query_calls: AtomicUsize::new(0),
			upsert_calls: AtomicUsize::new(0),
		}
	}

	pub fn failing() -> Self {
		Self {
			hits: Vec::new(),
			fail: true,
			query_calls: AtomicUsize::new(0),
			upsert_calls: AtomicUsize::new(0),
		}
	}

	pub fn query_calls(&self) -> usize {
		self.query_calls.load(Ordering::SeqCst)
	}

	pub fn upsert_calls(&self) -> usize {
		self.upsert_calls.load(Ordering::SeqCst)
	}
}

impl VectorIndex for ScriptedIndex {
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn query<'a>(
		&'a self,
		_vector: Vec<f32>,
		_limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredId>>> {
		Box::pin(async move {
			self.query_calls.fetch_add(1, Ordering::SeqCst);

			if self.fail {
				return Err(eyre::eyre!("Vector index is scripted to fail."));
			}

			Ok(self.hits.clone())
		})
	}

	fn upsert<'a>(
		&'a self,
		_ordinal: u64,
		_record: &'a NeighborhoodRecord,
		_vector: Vec<f32>,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			self.upsert_calls.fetch_add(1, Ordering::SeqCst);

			if self.fail {
				return Err(eyre::eyre!("Vector index is scripted to fail."));
			}

			Ok(())
		})
	}
}

/// Vector index that sleeps before answering, for exercising the query
/// deadline.
pub struct DelayedIndex {
	delay: std::time::Duration,
	hits: Vec<ScoredId>,
	query_calls: AtomicUsize,
}

impl DelayedIndex {
	pub fn with_hits(delay: std::time::Duration, hits: Vec<ScoredId>) -> Self {
		Self { delay, hits, query_calls: AtomicUsize::new(0) }
	}

	pub fn query_calls(&self) -> usize {
		self.query_calls.load(Ordering::SeqCst)
	}
}

impl VectorIndex for DelayedIndex {
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn query<'a>(
		&'a self,
		_vector: Vec<f32>,
		_limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredId>>> {
		Box::pin(async move {
			self.query_calls.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(self.delay).await;

			Ok(self.hits.clone())
		})
	}

	fn upsert<'a>(
		&'a self,
		_ordinal: u64,
		_record: &'a NeighborhoodRecord,
		_vector: Vec<f32>,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			tokio::time::sleep(self.delay).await;

			Ok(())
		})
	}
}

/// Oracle returning a fixed extraction result.
pub struct StaticOracle {
	pub preferences: PreferenceRecord,
	pub rationale: String,
}

impl StaticOracle {
	pub fn new(preferences: PreferenceRecord, rationale: &str) -> Self {
		Self { preferences, rationale: rationale.to_string() }
	}
}

impl PreferenceOracle for StaticOracle {
	fn extract<'a>(
		&'a self,
		_cfg: &'a mahalle_config::OracleProviderConfig,
		_user_text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<(PreferenceRecord, String)>> {
		Box::pin(async move { Ok((self.preferences.clone(), self.rationale.clone())) })
	}
}

pub struct FailingOracle;

impl PreferenceOracle for FailingOracle {
	fn extract<'a>(
		&'a self,
		_cfg: &'a mahalle_config::OracleProviderConfig,
		_user_text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<(PreferenceRecord, String)>> {
		Box::pin(async move { Err(eyre::eyre!("Extraction oracle is scripted to fail.")) })
	}
}
