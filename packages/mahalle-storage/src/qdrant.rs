use qdrant_client::{
	Payload,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, Query, QueryPointsBuilder,
		UpsertPointsBuilder, VectorParamsBuilder, value::Kind,
	},
};

use crate::{Error, Result};

/// Payload key carrying the normalized neighborhood id on each point.
pub const ID_PAYLOAD_KEY: &str = "id";

/// One oversampled hit from the index, in the wire contract's distance
/// form. Similarity conversion happens in the retriever.
#[derive(Clone, Debug)]
pub struct ScoredId {
	pub id: String,
	pub distance: f64,
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}

impl QdrantStore {
	pub fn new(cfg: &mahalle_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			return Ok(());
		}

		self.client
			.create_collection(CreateCollectionBuilder::new(&self.collection).vectors_config(
				VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
			))
			.await?;

		Ok(())
	}

	/// Nearest-neighbor query. Qdrant reports cosine similarity; the result
	/// carries `1 - score` so downstream code speaks in distances.
	pub async fn search(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<ScoredId>> {
		let response = self
			.client
			.query(
				QueryPointsBuilder::new(self.collection.clone())
					.query(Query::new_nearest(vector))
					.limit(limit)
					.with_payload(true),
			)
			.await?;
		let mut hits = Vec::with_capacity(response.result.len());

		for point in response.result {
			let id = point
				.payload
				.get(ID_PAYLOAD_KEY)
				.and_then(|value| match &value.kind {
					Some(Kind::StringValue(text)) => Some(text.clone()),
					_ => None,
				})
				.ok_or(Error::MissingPointId)?;

			hits.push(ScoredId { id, distance: 1.0 - f64::from(point.score) });
		}

		Ok(hits)
	}

	/// Replaces one record's point during an index rebuild. `ordinal` is the
	/// record's position in the catalog and doubles as the point id.
	pub async fn upsert_record(
		&self,
		ordinal: u64,
		id: &str,
		district: &str,
		name: &str,
		vector: Vec<f32>,
	) -> Result<()> {
		let mut payload = Payload::new();

		payload.insert(ID_PAYLOAD_KEY, id);
		payload.insert("district", district);
		payload.insert("name", name);

		let point = PointStruct::new(ordinal, vector, payload);

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true))
			.await?;

		Ok(())
	}
}
