pub mod embedding;
pub mod oracle;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

/// Builds the outbound header set for a provider call: a bearer token plus
/// any extra headers from the provider's config block. Extra header values
/// must be TOML strings.
pub fn auth_headers(api_key: &str, extra: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::with_capacity(1 + extra.len());

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (name, value) in extra {
		let text = value
			.as_str()
			.ok_or_else(|| eyre::eyre!("Header {name:?} in the provider config is not a string."))?;

		headers.insert(HeaderName::from_bytes(name.as_bytes())?, text.parse()?);
	}

	Ok(headers)
}
