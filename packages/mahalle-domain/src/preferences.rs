use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured preference set produced by the extraction oracle. Every field
/// is independently optional; `None` means "unconstrained".
///
/// Wrong-typed values fail open: the field deserializes to `None` instead of
/// aborting the request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PreferenceRecord {
	#[serde(deserialize_with = "lenient_f64")]
	pub monthly_budget: Option<f64>,
	#[serde(deserialize_with = "lenient_f64")]
	pub apartment_size_sqm: Option<f64>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_parks: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_schools: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_restaurants: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_cafes: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_hospitals: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_pharmacies: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_libraries: Option<u32>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_mosques: Option<u32>,
	#[serde(deserialize_with = "lenient_f64")]
	pub min_green_index: Option<f64>,
	#[serde(deserialize_with = "lenient_f64")]
	pub min_welfare_index: Option<f64>,
	#[serde(deserialize_with = "lenient_f64")]
	pub min_walkability: Option<f64>,
	#[serde(deserialize_with = "lenient_f64")]
	pub min_cultural_index: Option<f64>,
	#[serde(deserialize_with = "lenient_u64")]
	pub max_population: Option<u64>,
	#[serde(deserialize_with = "lenient_u32")]
	pub min_total_stations: Option<u32>,
	#[serde(deserialize_with = "lenient_u64")]
	pub max_casualties: Option<u64>,
	#[serde(deserialize_with = "lenient_u64")]
	pub max_severely_damaged: Option<u64>,
	#[serde(deserialize_with = "lenient_u64")]
	pub max_heavily_damaged: Option<u64>,
	#[serde(deserialize_with = "lenient_u64")]
	pub max_moderately_damaged: Option<u64>,
	#[serde(deserialize_with = "lenient_u64")]
	pub max_shelter_needed: Option<u64>,
	#[serde(deserialize_with = "lenient_bool")]
	pub earthquake_safe: Option<bool>,
	#[serde(deserialize_with = "lenient_string")]
	pub building_type: Option<String>,
	#[serde(deserialize_with = "lenient_string")]
	pub political_leaning: Option<String>,
	#[serde(deserialize_with = "lenient_string_list")]
	pub lifestyle: Option<Vec<String>>,
	#[serde(deserialize_with = "lenient_string")]
	pub preferences_text: Option<String>,
}

impl PreferenceRecord {
	/// True when at least one earthquake bound carries a number; the bare
	/// `earthquake_safe` flag is not enforceable on its own.
	pub fn has_earthquake_bounds(&self) -> bool {
		self.max_casualties.is_some()
			|| self.max_severely_damaged.is_some()
			|| self.max_heavily_damaged.is_some()
			|| self.max_moderately_damaged.is_some()
			|| self.max_shelter_needed.is_some()
	}
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(value.as_ref().and_then(Value::as_f64).filter(|number| number.is_finite()))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(value.as_ref().and_then(Value::as_u64))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(value.as_ref().and_then(Value::as_u64).and_then(|number| u32::try_from(number).ok()))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(value.as_ref().and_then(Value::as_bool))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(value.as_ref().and_then(Value::as_str).map(str::to_string))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	let items = value.as_ref().and_then(Value::as_array).map(|array| {
		array.iter().filter_map(Value::as_str).map(str::to_string).collect::<Vec<_>>()
	});

	Ok(items.filter(|items| !items.is_empty()))
}
