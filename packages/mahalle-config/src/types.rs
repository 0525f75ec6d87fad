use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub catalog: Catalog,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
	pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	#[serde(default = "default_qdrant_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub oracle: OracleProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct OracleProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	/// Upper bound on the oversampled list requested from the vector index.
	#[serde(default = "default_oversample_cap")]
	pub oversample_cap: u32,
	/// Effective apartment area when the preference record carries no size.
	#[serde(default = "default_area_sqm")]
	pub default_area_sqm: f64,
	/// Query text substituted when the preference summary is empty.
	#[serde(default = "default_generic_query")]
	pub generic_query: String,
	#[serde(default = "default_rebuild_batch_size")]
	pub rebuild_batch_size: u32,
}

fn default_qdrant_timeout_ms() -> u64 {
	5_000
}

fn default_top_k() -> u32 {
	3
}

fn default_oversample_cap() -> u32 {
	50
}

fn default_area_sqm() -> f64 {
	80.0
}

fn default_generic_query() -> String {
	"good neighborhood".to_string()
}

fn default_rebuild_batch_size() -> u32 {
	32
}
