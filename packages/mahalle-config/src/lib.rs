mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, EmbeddingProviderConfig, OracleProviderConfig, Providers, Qdrant, Search,
	Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.catalog.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "catalog.path must be non-empty.".to_string() });
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.storage.qdrant.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.oversample_cap < cfg.search.top_k {
		return Err(Error::Validation {
			message: "search.oversample_cap must be at least search.top_k.".to_string(),
		});
	}
	if !cfg.search.default_area_sqm.is_finite() || cfg.search.default_area_sqm <= 0.0 {
		return Err(Error::Validation {
			message: "search.default_area_sqm must be a positive finite number.".to_string(),
		});
	}
	if cfg.search.generic_query.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.generic_query must be non-empty.".to_string(),
		});
	}
	if cfg.search.rebuild_batch_size == 0 {
		return Err(Error::Validation {
			message: "search.rebuild_batch_size must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.oracle.temperature.is_finite() || cfg.providers.oracle.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.oracle.temperature must be zero or greater.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("oracle", &cfg.providers.oracle.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.search.generic_query.trim();

	if trimmed.len() != cfg.search.generic_query.len() {
		cfg.search.generic_query = trimmed.to_string();
	}
}
