use crate::records::NeighborhoodRecord;

/// At most this many amenity fragments enter the embedding text; the long
/// tail adds noise without improving retrieval.
const MAX_AMENITY_FRAGMENTS: usize = 8;

type AmenityField = (&'static str, fn(&NeighborhoodRecord) -> u32);

/// Builds the text embedded for one record during an index rebuild. The
/// request pipeline never calls this; it only queries the finished index.
pub fn embedding_text(record: &NeighborhoodRecord) -> String {
	let mut parts = vec![
		format!("Neighborhood: {} in {} district", record.name, record.district),
		format!("Average rent: {:.0} TRY per square meter", record.rent_per_sqm),
		format!("Green space index: {:.2}", record.green_index),
		format!("Society welfare index: {:.2}", record.welfare_index),
		format!("Walkability index: {:.2}", record.walkability_index),
		format!("Cultural activity index: {:.2}", record.cultural_index),
	];
	let amenity_fields: [AmenityField; 11] = [
		("restaurants", |record| record.restaurants),
		("schools", |record| record.schools),
		("parks", |record| record.parks),
		("cafes", |record| record.cafes),
		("hospitals", |record| record.hospitals),
		("pharmacies", |record| record.pharmacies),
		("mosques", |record| record.mosques),
		("libraries", |record| record.libraries),
		("bus stations", |record| record.bus_stations),
		("train stations", |record| record.train_stations),
		("transit stations", |record| record.transit_stations),
	];
	let amenities: Vec<String> = amenity_fields
		.iter()
		.filter_map(|(label, count)| {
			let value = count(record);

			(value > 0).then(|| format!("{value} {label}"))
		})
		.take(MAX_AMENITY_FRAGMENTS)
		.collect();

	if !amenities.is_empty() {
		parts.push(format!("Nearby amenities: {}", amenities.join(", ")));
	}
	if record.population > 0 {
		parts.push(format!("Population: {} residents", record.population));
	}
	if let Some(sim) = record.earthquake.as_ref() {
		parts.push(format!(
			"Earthquake scenario: {} estimated casualties, {} severely damaged buildings",
			sim.casualties, sim.severely_damaged
		));
	}

	parts.join(" | ")
}
