use serde::{Deserialize, Serialize};

use mahalle_domain::describe;

use crate::{MahalleService, ServiceError, ServiceResult};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RebuildReport {
	pub rebuilt_count: u64,
	pub error_count: u64,
}

impl MahalleService {
	/// Re-embeds every catalog record and upserts it into the vector index.
	/// Point ids are catalog ordinals, so a rebuild overwrites in place.
	/// Per-record failures are counted, not fatal.
	pub async fn rebuild_index(&self) -> ServiceResult<RebuildReport> {
		self.providers
			.index
			.ensure_collection()
			.await
			.map_err(|err| ServiceError::Index { message: err.to_string() })?;

		let batch_size = self.cfg.search.rebuild_batch_size as usize;
		let vector_dim = self.cfg.storage.qdrant.vector_dim as usize;
		let mut rebuilt_count = 0_u64;
		let mut error_count = 0_u64;

		for (batch_index, batch) in self.catalog.records().chunks(batch_size).enumerate() {
			let texts: Vec<String> = batch.iter().map(describe::embedding_text).collect();
			let vectors =
				match self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await {
					Ok(vectors) => vectors,
					Err(err) => {
						tracing::warn!("Embedding failed for a rebuild batch: {err}");

						error_count += batch.len() as u64;

						continue;
					},
				};

			if vectors.len() != batch.len() {
				tracing::warn!(
					"Embedding provider returned {} vectors for {} texts.",
					vectors.len(),
					batch.len()
				);

				error_count += batch.len() as u64;

				continue;
			}

			for (offset, (record, vector)) in batch.iter().zip(vectors).enumerate() {
				if vector.len() != vector_dim {
					error_count += 1;

					continue;
				}

				let ordinal = (batch_index * batch_size + offset) as u64;

				match self.providers.index.upsert(ordinal, record, vector).await {
					Ok(()) => rebuilt_count += 1,
					Err(err) => {
						tracing::warn!("Upsert failed for {}: {err}", record.id);

						error_count += 1;
					},
				}
			}
		}

		Ok(RebuildReport { rebuilt_count, error_count })
	}
}
