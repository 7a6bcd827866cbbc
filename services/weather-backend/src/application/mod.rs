mod error;
mod listener;
pub mod opts;
pub mod server;

pub use self::error::Error;

use common::err_context::ErrorContextExt;
use common::settings::{ApplicationSettings, DatabaseSettings, Settings, WeatherApiSettings};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use self::listener::listen_with_host_port;
use self::server::AppState;
use crate::domain::service::{DynSubscriptionStorage, DynTokenGenerator, DynWeatherProvider};
use crate::domain::SubscriptionService;
use crate::services::memory::InMemoryStorage;
use crate::services::postgres::PostgresStorage;
use crate::services::token::RandomTokenGenerator;
use crate::services::weatherapi::WeatherApiClient;

pub struct Application {
    port: u16,
    server: server::AppServer,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }
}

/// Assembles the application from its parts.
///
/// `ApplicationBuilder::new` builds every part from the settings, individual
/// parts can then be replaced (eg a deterministic token generator in tests).
#[derive(Default)]
pub struct ApplicationBuilder {
    pub storage: Option<DynSubscriptionStorage>,
    pub weather: Option<DynWeatherProvider>,
    pub tokens: Option<DynTokenGenerator>,
    pub listener: Option<TcpListener>,
    pub request_timeout: Option<Duration>,
}

impl ApplicationBuilder {
    pub async fn new(settings: Settings) -> Result<Self, Error> {
        let Settings {
            application,
            database,
            weather_api,
            mode,
        } = settings;
        tracing::info!("Building application in '{mode}' mode");
        let builder = Self::default()
            .storage(database)
            .await?
            .weather(weather_api)?
            .tokens(Arc::new(RandomTokenGenerator))
            .listener(&application)?
            .request_timeout(application.request_timeout);

        Ok(builder)
    }

    /// Picks the storage according to the `executor` setting.
    pub async fn storage(mut self, settings: DatabaseSettings) -> Result<Self, Error> {
        let storage: DynSubscriptionStorage = match settings.executor.as_str() {
            "postgres" => Arc::new(
                PostgresStorage::new(settings)
                    .await
                    .context("Establishing a database connection")?,
            ),
            "memory" => {
                tracing::warn!("Using in memory storage, subscriptions will not survive a restart");
                Arc::new(InMemoryStorage::default())
            }
            executor => {
                return Err(Error::Configuration {
                    context: format!(
                        "Unknown database executor '{executor}', expected 'postgres' or 'memory'"
                    ),
                })
            }
        };
        self.storage = Some(storage);
        Ok(self)
    }

    pub fn weather(mut self, settings: WeatherApiSettings) -> Result<Self, Error> {
        let weather = Arc::new(
            WeatherApiClient::new(settings).context("Building the weather API client")?,
        );
        self.weather = Some(weather);
        Ok(self)
    }

    pub fn tokens(mut self, tokens: DynTokenGenerator) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn listener(mut self, settings: &ApplicationSettings) -> Result<Self, Error> {
        let listener = listen_with_host_port(settings.host.as_str(), settings.port).context(
            format!("Could not create listener for {}:{}", settings.host, settings.port),
        )?;
        self.listener = Some(listener);
        Ok(self)
    }

    /// Maximum duration of a request, in milliseconds.
    pub fn request_timeout(mut self, timeout: u64) -> Self {
        self.request_timeout = Some(Duration::from_millis(timeout));
        self
    }

    pub fn build(self) -> Result<Application, Error> {
        let ApplicationBuilder {
            storage,
            weather,
            tokens,
            listener,
            request_timeout,
        } = self;
        let storage = storage.ok_or_else(|| missing("storage"))?;
        let weather = weather.ok_or_else(|| missing("weather provider"))?;
        let tokens = tokens.ok_or_else(|| missing("token generator"))?;
        let listener = listener.ok_or_else(|| missing("listener"))?;
        let request_timeout = request_timeout.ok_or_else(|| missing("request timeout"))?;

        let port = listener
            .local_addr()
            .map_err(|err| Error::Configuration {
                context: format!("Could not get listener local address: {err}"),
            })?
            .port();

        let state = AppState {
            service: SubscriptionService::new(storage, weather, tokens),
        };
        let server = server::new(listener, state, request_timeout)
            .context("Could not create server from listener")?;

        tracing::info!("Listening on port {port}");
        Ok(Application { port, server })
    }
}

fn missing(part: &str) -> Error {
    Error::Configuration {
        context: format!("Application {part} is missing"),
    }
}

impl Application {
    /// The port the server actually listens on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serves requests until the process receives SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> Result<(), Error> {
        self.server.await.context("server execution error")?;
        tracing::info!("Server stopped");
        Ok(())
    }
}
