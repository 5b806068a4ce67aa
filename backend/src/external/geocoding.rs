//! Reverse geocoding via the Google Geocoding API
//!
//! Best effort only: any failure yields `None` so the caller can fall back to
//! the weather provider's own location name.

use reqwest::Client;
use serde::Deserialize;
use shared::GpsCoordinates;

/// Google Geocoding API client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    types: Vec<String>,
}

impl AddressComponent {
    fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

impl GeocodingClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://maps.googleapis.com/maps/api".to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// "City, CC" for the coordinates, or the formatted address
    pub async fn city_name(&self, coords: &GpsCoordinates) -> Option<String> {
        if self.api_key.is_empty() {
            tracing::warn!("Geocoding API key is not configured, using weather provider location name");
            return None;
        }

        match self.lookup(coords).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(%coords, error = %e, "Reverse geocoding failed");
                None
            }
        }
    }

    async fn lookup(&self, coords: &GpsCoordinates) -> Result<Option<String>, reqwest::Error> {
        let latlng = format!("{},{}", coords.latitude, coords.longitude);
        let data: GeocodeResponse = self
            .client
            .get(format!("{}/geocode/json", self.base_url))
            .query(&[("latlng", latlng.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if data.status != "OK" {
            tracing::warn!(
                status = %data.status,
                message = data.error_message.as_deref().unwrap_or("No results found."),
                "Geocoding API returned no result"
            );
            return Ok(None);
        }

        Ok(data.results.first().and_then(display_name))
    }
}

fn display_name(result: &GeocodeResult) -> Option<String> {
    let city = result
        .address_components
        .iter()
        .find(|c| c.has_type("locality") || c.has_type("administrative_area_level_2"));
    let country = result.address_components.iter().find(|c| c.has_type("country"));

    match (city, country) {
        (Some(city), Some(country)) => Some(format!("{}, {}", city.long_name, country.short_name)),
        _ if !result.formatted_address.is_empty() => Some(result.formatted_address.clone()),
        _ => None,
    }
}
