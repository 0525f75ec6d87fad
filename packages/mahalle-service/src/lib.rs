pub mod admin;
pub mod list;
pub mod recommend;

mod retrieve;

use std::{future::Future, pin::Pin, sync::Arc};

pub use admin::RebuildReport;
pub use list::{ListItem, ListResponse, StatsResponse};
pub use recommend::{Recommendation, RecommendRequest, RecommendResponse};

use mahalle_config::{Config, EmbeddingProviderConfig, OracleProviderConfig};
use mahalle_domain::{Catalog, NeighborhoodRecord, PreferenceRecord};
use mahalle_providers::{embedding, oracle};
use mahalle_storage::qdrant::{QdrantStore, ScoredId};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait PreferenceOracle
where
	Self: Send + Sync,
{
	fn extract<'a>(
		&'a self,
		cfg: &'a OracleProviderConfig,
		user_text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<(PreferenceRecord, String)>>;
}

/// Seam over the vector store so the retrieval and rebuild paths can run
/// against a scripted index in tests.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<()>>;

	fn query<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredId>>>;

	fn upsert<'a>(
		&'a self,
		ordinal: u64,
		record: &'a NeighborhoodRecord,
		vector: Vec<f32>,
	) -> BoxFuture<'a, color_eyre::Result<()>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Provider { message: String },
	Index { message: String },
	Invariant { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub oracle: Arc<dyn PreferenceOracle>,
	pub index: Arc<dyn VectorIndex>,
}

pub struct MahalleService {
	pub cfg: Config,
	pub catalog: Catalog,
	pub providers: Providers,
}

struct DefaultProviders;

struct QdrantIndex {
	store: QdrantStore,
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Index { message } => write!(f, "Index error: {message}"),
			Self::Invariant { message } => write!(f, "Invariant violation: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl PreferenceOracle for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a OracleProviderConfig,
		user_text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<(PreferenceRecord, String)>> {
		Box::pin(oracle::extract(cfg, user_text))
	}
}

impl VectorIndex for QdrantIndex {
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move { Ok(self.store.ensure_collection().await?) })
	}

	fn query<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredId>>> {
		Box::pin(async move { Ok(self.store.search(vector, limit).await?) })
	}

	fn upsert<'a>(
		&'a self,
		ordinal: u64,
		record: &'a NeighborhoodRecord,
		vector: Vec<f32>,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			Ok(self
				.store
				.upsert_record(ordinal, &record.id, &record.district, &record.name, vector)
				.await?)
		})
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		oracle: Arc<dyn PreferenceOracle>,
		index: Arc<dyn VectorIndex>,
	) -> Self {
		Self { embedding, oracle, index }
	}

	/// HTTP providers plus the given Qdrant collection as the index.
	pub fn with_store(store: QdrantStore) -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), oracle: provider, index: Arc::new(QdrantIndex { store }) }
	}
}

impl MahalleService {
	pub fn new(cfg: Config, catalog: Catalog, store: QdrantStore) -> Self {
		Self { cfg, catalog, providers: Providers::with_store(store) }
	}

	pub fn with_providers(cfg: Config, catalog: Catalog, providers: Providers) -> Self {
		Self { cfg, catalog, providers }
	}
}
