/// Client for the WeatherAPI.com service.
use async_trait::async_trait;
use common::err_context::ErrorContextExt;
use common::settings::WeatherApiSettings;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::ports::secondary::{WeatherError as Error, WeatherProvider};
use crate::domain::Weather;

/// Error code returned by WeatherAPI.com when no location matches the query.
const CITY_NOT_FOUND_CODE: i64 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http_client: Client,
    // eg 'https://api.weatherapi.com/v1', without trailing '/'
    base_url: String,
    key: String,
}

impl WeatherApiClient {
    pub fn new(settings: WeatherApiSettings) -> Result<WeatherApiClient, Error> {
        let WeatherApiSettings {
            base_url,
            key,
            timeout,
        } = settings;

        if key.trim().is_empty() {
            return Err(Error::Configuration {
                context: "Missing weather API key".to_string(),
            });
        }

        Url::parse(&base_url).map_err(|err| Error::Configuration {
            context: format!("Invalid weather API base url '{base_url}': {err}"),
        })?;

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .context("Could not build weather API http client")?;

        Ok(WeatherApiClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key,
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    #[tracing::instrument(name = "Requesting forecast from WeatherAPI", skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<Weather, Error> {
        let url = format!("{}/forecast.json", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.key.as_str()), ("q", city)])
            .send()
            .await
            .context("http client request to weather API")?;

        let status = response.status();

        if status.is_success() {
            let forecast = response
                .json::<ForecastResponse>()
                .await
                .context("Could not decode weather API forecast")?;
            return Ok(forecast.into());
        }

        let ErrorResponse { error } = response
            .json::<ErrorResponse>()
            .await
            .context(format!("Could not decode weather API error ({status})"))?;

        if error.code == CITY_NOT_FOUND_CODE {
            Err(Error::CityNotFound {
                context: format!("{city}: {}", error.message),
            })
        } else {
            Err(Error::Api {
                context: format!("weather API returned {status}"),
                code: error.code,
                message: error.message,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    humidity: i32,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

impl From<ForecastResponse> for Weather {
    fn from(forecast: ForecastResponse) -> Self {
        let Current {
            temp_c,
            humidity,
            condition,
        } = forecast.current;
        Weather {
            temperature: temp_c,
            description: condition.text,
            humidity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use speculoos::prelude::*;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(base_url: String, timeout: u64) -> WeatherApiClient {
        WeatherApiClient::new(WeatherApiSettings {
            base_url,
            key: "secret-key".to_string(),
            timeout,
        })
        .expect("weather api client")
    }

    fn forecast_body() -> serde_json::Value {
        json!({
            "location": { "name": "Kyiv" },
            "current": {
                "temp_c": 21.5,
                "humidity": 63,
                "wind_kph": 11.2,
                "condition": { "text": "Partly cloudy" }
            }
        })
    }

    #[tokio::test]
    async fn fetch_forecast_should_query_the_forecast_endpoint() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri(), 10);

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("key", "secret-key"))
            .and(query_param("q", "Kyiv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let weather = client.fetch_forecast("Kyiv").await.expect("forecast");

        assert_that(&weather.temperature).is_equal_to(21.5);
        assert_that(&weather.description.as_str()).is_equal_to("Partly cloudy");
        assert_that(&weather.humidity).is_equal_to(63);
    }

    #[tokio::test]
    async fn fetch_forecast_should_map_unknown_location_to_city_not_found() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri(), 10);

        Mock::given(any())
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let res = client.fetch_forecast("Atlantis").await;

        assert!(matches!(res, Err(Error::CityNotFound { .. })));
    }

    #[tokio::test]
    async fn fetch_forecast_should_report_other_api_errors() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri(), 10);

        Mock::given(any())
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 2008, "message": "API key has been disabled." }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let res = client.fetch_forecast("Kyiv").await;

        match res {
            Err(Error::Api { code, message, .. }) => {
                assert_that(&code).is_equal_to(2008);
                assert_that(&message.as_str()).is_equal_to("API key has been disabled.");
            }
            other => panic!("expected an api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_forecast_fails_if_the_server_returns_garbage() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri(), 10);

        Mock::given(any())
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let res = client.fetch_forecast("Kyiv").await;

        assert!(matches!(res, Err(Error::Connection { .. })));
    }

    #[tokio::test]
    async fn fetch_forecast_times_out_if_the_server_takes_too_long() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri(), 1);

        let response = ResponseTemplate::new(200)
            .set_body_json(forecast_body())
            .set_delay(std::time::Duration::from_secs(3));

        Mock::given(any())
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;

        let res = client.fetch_forecast("Kyiv").await;

        assert!(matches!(res, Err(Error::Connection { .. })));
    }

    #[test]
    fn client_should_require_an_api_key() {
        let res = WeatherApiClient::new(WeatherApiSettings {
            base_url: "https://api.weatherapi.com/v1".to_string(),
            key: " ".to_string(),
            timeout: 10,
        });
        assert!(matches!(res, Err(Error::Configuration { .. })));
    }

    #[test]
    fn client_should_reject_an_invalid_base_url() {
        let res = WeatherApiClient::new(WeatherApiSettings {
            base_url: "not a url".to_string(),
            key: "key".to_string(),
            timeout: 10,
        });
        assert!(matches!(res, Err(Error::Configuration { .. })));
    }
}
