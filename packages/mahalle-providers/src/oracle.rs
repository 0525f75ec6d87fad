use std::time::Duration;

use color_eyre::{Result, eyre};
use mahalle_domain::PreferenceRecord;
use reqwest::Client;
use serde_json::Value;

const SYSTEM_PROMPT: &str = "\
You are a real estate agent analyzing a client's housing preferences. \
Respond with a single JSON object holding two keys: \"rationale\" (2-3 \
sentences explaining what you understood and why you set certain \
thresholds) and \"preferences\" (an object whose keys are: monthly_budget, \
apartment_size_sqm, min_parks, min_schools, min_restaurants, min_cafes, \
min_hospitals, min_pharmacies, min_libraries, min_mosques, min_green_index, \
min_welfare_index, min_walkability, min_cultural_index, max_population, \
min_total_stations, max_casualties, max_severely_damaged, \
max_heavily_damaged, max_moderately_damaged, max_shelter_needed, \
earthquake_safe, building_type, political_leaning, lifestyle, \
preferences_text). Use null for anything the client did not express. \
Indices are on a 0-1 scale. Mentions of green space, nature or dog walking \
imply min_green_index 0.7 and min_parks 2; quiet or peaceful implies \
max_population 20000; family or children implies min_schools 2 and \
min_parks 2; vibrant or nightlife implies min_restaurants 5 and min_cafes \
5; public transport or commuting implies min_total_stations 8; earthquake \
safety implies earthquake_safe true, max_casualties 5 and \
max_severely_damaged 50. preferences_text is a short free-text summary of \
the stated preferences.";

/// Calls the extraction oracle and returns its typed output. The caller is
/// expected to absorb a failure here into an all-null preference record;
/// this function never partially parses.
pub async fn extract(
	cfg: &mahalle_config::OracleProviderConfig,
	user_text: &str,
) -> Result<(PreferenceRecord, String)> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	for _ in 0..3 {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"response_format": { "type": "json_object" },
			"messages": [
				{ "role": "system", "content": SYSTEM_PROMPT },
				{ "role": "user", "content": user_text },
			],
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		if let Ok(parsed) = parse_oracle_response(json) {
			return Ok(parsed);
		}
	}

	Err(eyre::eyre!("Oracle response is not a valid preference object."))
}

fn parse_oracle_response(json: Value) -> Result<(PreferenceRecord, String)> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| eyre::eyre!("Oracle response is missing message content."))?;
	let parsed: Value = serde_json::from_str(content)
		.map_err(|_| eyre::eyre!("Oracle content is not valid JSON."))?;

	if !parsed.is_object() {
		return Err(eyre::eyre!("Oracle content is not a JSON object."));
	}

	let rationale = parsed
		.get("rationale")
		.and_then(Value::as_str)
		.unwrap_or("Understanding user preferences.")
		.to_string();
	// Wrong-typed fields inside the object fail open to null during
	// deserialization; only a non-object payload is rejected.
	let preferences = match parsed.get("preferences") {
		Some(Value::Object(map)) => {
			serde_json::from_value(Value::Object(map.clone())).unwrap_or_default()
		},
		_ => PreferenceRecord::default(),
	};

	Ok((preferences, rationale))
}
