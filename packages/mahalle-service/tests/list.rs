use std::sync::Arc;

use mahalle_domain::{Catalog, PreferenceRecord};
use mahalle_service::{MahalleService, Providers};
use mahalle_testkit::{
	ScriptedEmbedding, ScriptedIndex, StaticOracle, TEST_VECTOR_DIM, sample_record, test_config,
};

fn service(catalog: Catalog) -> MahalleService {
	MahalleService::with_providers(
		test_config(),
		catalog,
		Providers::new(
			Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM as usize)),
			Arc::new(StaticOracle::new(PreferenceRecord::default(), "unused")),
			Arc::new(ScriptedIndex::with_hits(Vec::new())),
		),
	)
}

#[test]
fn list_preserves_catalog_order() {
	let catalog = Catalog::from_records(vec![
		sample_record("Kadikoy", "Moda"),
		sample_record("Sisli", "Tesvikiye"),
	])
	.expect("catalog must build");
	let response = service(catalog).list();

	assert_eq!(response.total, 2);
	assert_eq!(response.neighborhoods[0].id, "Kadikoy_Moda");
	assert_eq!(response.neighborhoods[1].id, "Sisli_Tesvikiye");
}

#[test]
fn stats_aggregate_across_the_catalog() {
	let mut moda = sample_record("Kadikoy", "Moda");
	let mut caddebostan = sample_record("Kadikoy", "Caddebostan");
	let mut etiler = sample_record("Besiktas", "Etiler");

	moda.rent_per_sqm = 300.0;
	moda.welfare_index = 1.0;
	moda.parks = 2;
	caddebostan.rent_per_sqm = 500.0;
	caddebostan.welfare_index = 0.5;
	caddebostan.parks = 1;
	etiler.rent_per_sqm = 400.0;
	etiler.welfare_index = 0.75;
	etiler.parks = 3;

	let catalog = Catalog::from_records(vec![moda, caddebostan, etiler]).expect("catalog must build");
	let stats = service(catalog).stats();

	assert_eq!(stats.total_neighborhoods, 3);
	assert_eq!(stats.districts, 2);
	assert_eq!(stats.averages.rent_per_sqm, 400.0);
	assert_eq!(stats.averages.welfare_index, 0.75);
	assert_eq!(stats.rent_range.min, 300.0);
	assert_eq!(stats.rent_range.max, 500.0);
	assert_eq!(stats.amenity_totals.parks, 6);
}

#[test]
fn empty_catalog_yields_zeroed_stats() {
	let catalog = Catalog::from_records(Vec::new()).expect("catalog must build");
	let stats = service(catalog).stats();

	assert_eq!(stats.total_neighborhoods, 0);
	assert_eq!(stats.districts, 0);
	assert_eq!(stats.averages.rent_per_sqm, 0.0);
	assert_eq!(stats.rent_range.min, 0.0);
	assert_eq!(stats.rent_range.max, 0.0);
}
