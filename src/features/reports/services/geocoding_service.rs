use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::{GEOCODE_SUGGESTION_LIMIT, MIN_GEOCODE_QUERY_LEN};

/// Nominatim API response structure
#[derive(Debug, Deserialize)]
pub struct NominatimResponse {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    pub address: Option<NominatimAddress>,
}

/// Nominatim address components
#[derive(Debug, Deserialize)]
pub struct NominatimAddress {
    pub postcode: Option<String>,
}

/// A place the citizen can pick instead of clicking on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaceSuggestion {
    pub display_name: String,
    pub lat: String,
    pub lng: String,
    pub pincode: Option<String>,
}

impl From<NominatimResponse> for PlaceSuggestion {
    fn from(r: NominatimResponse) -> Self {
        Self {
            display_name: r.display_name,
            lat: r.lat,
            lng: r.lon,
            pincode: r.address.and_then(|a| a.postcode),
        }
    }
}

/// Service for place search using Nominatim
pub struct GeocodingService {
    client: reqwest::Client,
    base_url: String,
    country_codes: Option<String>,
}

impl GeocodingService {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            country_codes: config.country_codes.clone(),
        })
    }

    /// Search places by free text.
    ///
    /// Queries shorter than three characters return no suggestions
    /// without contacting the geocoder.
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        let query = query.trim();
        if query.chars().count() < MIN_GEOCODE_QUERY_LEN {
            return Ok(Vec::new());
        }

        let url = self.search_url(query);
        tracing::debug!("Geocoding (free-form): {} -> {}", query, url);

        let results = self.execute_request(&url).await?;
        Ok(results.into_iter().map(PlaceSuggestion::from).collect())
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            GEOCODE_SUGGESTION_LIMIT
        );
        if let Some(codes) = &self.country_codes {
            url.push_str("&countrycodes=");
            url.push_str(&urlencoding::encode(codes));
        }
        url
    }

    /// Execute HTTP request to Nominatim and parse response
    async fn execute_request(&self, url: &str) -> Result<Vec<NominatimResponse>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(Vec::new());
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Nominatim response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
        })
    }
}
