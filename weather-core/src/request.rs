//! Builds OpenWeather "current weather" URLs.

use url::Url;

use crate::model::LocationQuery;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_COUNTRY_CODE: &str = "US";

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: Url,
    api_key: String,
    country_code: Option<String>,
}

impl RequestBuilder {
    pub fn new(endpoint: Url, api_key: String, country_code: Option<String>) -> Self {
        let country_code = country_code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Self { endpoint, api_key, country_code }
    }

    /// Builder against the public endpoint with the `US` suffix.
    pub fn with_defaults(api_key: &str) -> Self {
        Self::new(default_endpoint(), api_key.to_string(), Some(DEFAULT_COUNTRY_CODE.to_string()))
    }

    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// `q=<city>,<country>&appid=<key>`. The city must already be validated as non-empty.
    pub fn city_url(&self, city: &str) -> Url {
        let mut q = urlencoding::encode(city).into_owned();
        if let Some(country) = &self.country_code {
            q.push(',');
            q.push_str(&urlencoding::encode(country));
        }

        self.with_query(&format!("q={q}&appid={}", urlencoding::encode(&self.api_key)))
    }

    /// `lat=<lat>&lon=<lon>&appid=<key>`.
    pub fn geo_url(&self, latitude: f64, longitude: f64) -> Url {
        self.with_query(&format!(
            "lat={latitude}&lon={longitude}&appid={}",
            urlencoding::encode(&self.api_key)
        ))
    }

    pub fn url_for(&self, query: &LocationQuery) -> Url {
        match query {
            LocationQuery::CityName(name) => self.city_url(name),
            LocationQuery::Coordinates(c) => self.geo_url(c.latitude, c.longitude),
        }
    }

    fn with_query(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(query));
        url
    }
}

pub fn build_city_url(city: &str, api_key: &str) -> Url {
    RequestBuilder::with_defaults(api_key).city_url(city)
}

pub fn build_geo_url(latitude: f64, longitude: f64, api_key: &str) -> Url {
    RequestBuilder::with_defaults(api_key).geo_url(latitude, longitude)
}

pub(crate) fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

/// URL as a loggable string, with the API key masked.
pub fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return redacted.to_string();
    }

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_url_appends_country_and_key() {
        let url = build_city_url("Paris", "KEY123");

        assert_eq!(url.host_str(), Some("api.openweathermap.org"));
        assert_eq!(url.path(), "/data/2.5/weather");
        assert!(url.query().unwrap().contains("q=Paris,US&appid=KEY123"));
    }

    #[test]
    fn city_url_percent_encodes_spaces_and_symbols() {
        let url = build_city_url("New York", "KEY123");
        assert_eq!(url.query(), Some("q=New%20York,US&appid=KEY123"));

        let url = build_city_url("São Paulo&x=1", "KEY123");
        assert_eq!(url.query(), Some("q=S%C3%A3o%20Paulo%26x%3D1,US&appid=KEY123"));
    }

    #[test]
    fn geo_url_uses_shortest_decimal_literals() {
        let url = build_geo_url(40.7128, -74.0060, "KEY123");
        assert!(url.query().unwrap().contains("lat=40.7128&lon=-74.006&appid=KEY123"));
    }

    #[test]
    fn country_suffix_can_be_disabled() {
        let builder = RequestBuilder::new(default_endpoint(), "K".into(), Some("  ".into()));
        assert_eq!(builder.country_code(), None);
        assert_eq!(builder.city_url("Paris").query(), Some("q=Paris&appid=K"));

        let builder = RequestBuilder::new(default_endpoint(), "K".into(), Some("FR".into()));
        assert_eq!(builder.city_url("Paris").query(), Some("q=Paris,FR&appid=K"));
    }

    #[test]
    fn url_for_dispatches_on_query_kind() {
        let builder = RequestBuilder::with_defaults("K");

        let city = builder.url_for(&LocationQuery::city("Oslo"));
        assert_eq!(city.query(), Some("q=Oslo,US&appid=K"));

        let geo = builder.url_for(&LocationQuery::coordinates(1.5, 2.0));
        assert_eq!(geo.query(), Some("lat=1.5&lon=2&appid=K"));
    }

    #[test]
    fn custom_endpoint_is_respected() {
        let endpoint = Url::parse("http://127.0.0.1:8080/data/2.5/weather").unwrap();
        let builder = RequestBuilder::new(endpoint, "K".into(), None);

        let url = builder.city_url("Rome");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/data/2.5/weather?q=Rome&appid=K");
    }

    #[test]
    fn default_endpoint_parses() {
        assert_eq!(default_endpoint().as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn redact_masks_api_key() {
        let url = build_city_url("Paris", "SECRET");
        let logged = redact(&url);

        assert_eq!(
            logged,
            "https://api.openweathermap.org/data/2.5/weather?q=Paris%2CUS&appid=***"
        );
    }
}
