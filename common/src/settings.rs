use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgSslMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub base_url: String,
    /// Maximum duration of a request, in milliseconds.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    /// Pool acquire timeout, in milliseconds.
    pub connection_timeout: u64,
    /// How long to wait for the database to come online at startup, in seconds.
    pub wait_timeout: u64,
    pub max_connections: u32,
    /// Storage backend: 'postgres' or 'memory'.
    pub executor: String,
    /// Run the embedded migrations after connecting.
    pub migrate: bool,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            // Try an encrypted connection, fallback
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database_name)
            .port(self.port)
            .ssl_mode(ssl_mode)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherApiSettings {
    /// Base URL of the weather provider API, eg 'https://api.weatherapi.com/v1'
    pub base_url: String,
    pub key: String,
    /// Request timeout, in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub weather_api: WeatherApiSettings,
    pub mode: String,
}
