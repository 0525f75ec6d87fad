use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
	index: usize,
	embedding: Vec<f32>,
}

/// Embeds a batch of neighborhood descriptions (or a single query phrase).
/// The returned vectors follow the input order even when the provider
/// reorders its response items, and every input must be covered.
pub async fn embed(
	cfg: &mahalle_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let response: EmbeddingResponse = res.error_for_status()?.json().await?;

	into_ordered_vectors(response, texts.len())
}

fn into_ordered_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
	if response.data.len() != expected {
		return Err(eyre::eyre!(
			"Embedding response covers {} of {expected} inputs.",
			response.data.len()
		));
	}

	let mut ordered: Vec<Option<Vec<f32>>> = vec![None; expected];

	for item in response.data {
		let slot = ordered
			.get_mut(item.index)
			.ok_or_else(|| eyre::eyre!("Embedding index {} is out of range.", item.index))?;

		if slot.replace(item.embedding).is_some() {
			return Err(eyre::eyre!("Embedding index {} appears more than once.", item.index));
		}
	}

	ordered
		.into_iter()
		.map(|slot| slot.ok_or_else(|| eyre::eyre!("Embedding response left an input uncovered.")))
		.collect()
}
