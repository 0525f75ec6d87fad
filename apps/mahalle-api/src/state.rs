use std::sync::Arc;

use mahalle_service::MahalleService;
use mahalle_storage::{catalog, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MahalleService>,
}
impl AppState {
	pub fn new(config: mahalle_config::Config) -> color_eyre::Result<Self> {
		let loaded = catalog::load(&config.catalog.path)?;

		tracing::info!("Catalog loaded with {} neighborhoods.", loaded.len());

		let store = QdrantStore::new(&config.storage.qdrant)?;
		let service = MahalleService::new(config, loaded, store);

		Ok(Self { service: Arc::new(service) })
	}
}
