pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read catalog file at {path:?}.")]
	ReadCatalog { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse catalog file at {path:?}.")]
	ParseCatalog { path: std::path::PathBuf, source: serde_json::Error },
	#[error(transparent)]
	Catalog(#[from] mahalle_domain::CatalogError),
	#[error(transparent)]
	Qdrant(#[from] qdrant_client::QdrantError),
	#[error("Qdrant point is missing a readable id payload.")]
	MissingPointId,
}
