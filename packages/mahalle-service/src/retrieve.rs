use std::time::Duration;

use ahash::AHashSet;
use color_eyre::eyre;
use mahalle_config::Config;
use mahalle_domain::CandidateSet;
use tokio::time;

use crate::Providers;

/// One candidate returned by the semantic stage, already converted from the
/// index's distance form.
#[derive(Clone, Debug)]
pub(crate) struct SemanticHit {
	pub(crate) id: String,
	pub(crate) similarity: f64,
}

/// Embeds the preference summary (or the configured generic phrase), queries
/// the index oversampled, and keeps the first `n` hits that survived the
/// constraint filter. Hits outside the candidate set are skipped, never an
/// error; a stale index entry must not poison the request.
pub(crate) async fn semantic(
	cfg: &Config,
	providers: &Providers,
	catalog_len: usize,
	candidates: &CandidateSet,
	summary: Option<&str>,
	n: usize,
) -> color_eyre::Result<Vec<SemanticHit>> {
	let query = summary
		.map(str::trim)
		.filter(|text| !text.is_empty())
		.unwrap_or(cfg.search.generic_query.as_str());
	let limit = (cfg.search.oversample_cap as usize).min(catalog_len) as u64;
	let embeddings =
		providers.embedding.embed(&cfg.providers.embedding, &[query.to_string()]).await?;
	let Some(vector) = embeddings.into_iter().next() else {
		return Err(eyre::eyre!("Embedding provider returned no vectors."));
	};

	if vector.len() != cfg.storage.qdrant.vector_dim as usize {
		return Err(eyre::eyre!("Embedding vector dimension mismatch."));
	}

	let hits = time::timeout(
		Duration::from_millis(cfg.storage.qdrant.timeout_ms),
		providers.index.query(vector, limit),
	)
	.await
	.map_err(|_| eyre::eyre!("Vector index query timed out."))??;
	let members: AHashSet<&str> = candidates.ids.iter().map(String::as_str).collect();
	let mut kept = Vec::with_capacity(n.min(hits.len()));

	for hit in hits {
		if !members.contains(hit.id.as_str()) {
			continue;
		}

		kept.push(SemanticHit { id: hit.id, similarity: 1.0 - hit.distance });

		if kept.len() == n {
			break;
		}
	}

	Ok(kept)
}
