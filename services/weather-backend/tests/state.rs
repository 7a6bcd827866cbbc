use cucumber::World;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time;
use tokio::task::JoinHandle;
use wiremock::MockServer;

use common::settings::Settings;
use weather::application::opts::{Command, Opts};
use weather::application::{Application, Error};
use weather::domain::ports::secondary::TokenGenerator;
use weather::domain::SubscriptionToken;
use weather::services::token::RandomTokenGenerator;

/// The TestWorld contains both the context for every tests
/// and information that needs to be kept between steps of a
/// scenario.
#[derive(World, Debug)]
#[world(init = Self::new)]
pub struct TestWorld {
    pub app: TestApp,
    // The last response, set in a 'when' step, and checked in a following 'then' step.
    pub resp: Option<TestResponse>,
    // Tokens issued to each (email, city) subscription during the scenario.
    pub tokens: HashMap<(String, String), String>,
}

impl TestWorld {
    /// Creates a new TestWorld, with a freshly spawned application.
    pub async fn new() -> Self {
        TestWorld {
            app: spawn_app().await,
            resp: None,
            tokens: HashMap::new(),
        }
    }

    pub fn token_for(&self, email: &str, city: &str) -> String {
        self.tokens
            .get(&(email.to_string(), city.to_string()))
            .cloned()
            .unwrap_or_else(|| panic!("no token issued for {email} in {city}"))
    }
}

/// What the steps need to know about a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: reqwest::StatusCode,
    pub body: serde_json::Value,
}

impl TestResponse {
    pub async fn read(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let body = resp.json().await.unwrap_or(serde_json::Value::Null);
        TestResponse { status, body }
    }
}

/// Hands out random tokens, and remembers them so that steps can play the
/// part of a subscriber following the link in the confirmation email.
#[derive(Default)]
pub struct RecordingTokenGenerator {
    issued: Mutex<Vec<SubscriptionToken>>,
}

impl RecordingTokenGenerator {
    pub fn last(&self) -> Option<SubscriptionToken> {
        self.issued.lock().unwrap().last().cloned()
    }
}

impl TokenGenerator for RecordingTokenGenerator {
    fn generate(&self) -> SubscriptionToken {
        let token = RandomTokenGenerator.generate();
        self.issued.lock().unwrap().push(token.clone());
        token
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    // A Mock Server standing for the weather provider.
    pub weather_server: MockServer,
    pub tokens: Arc<RecordingTokenGenerator>,
    // The API to access the server.
    pub api_client: reqwest::Client,
    // The server handle, so that it can be killed.
    pub server_handle: JoinHandle<Result<(), Error>>,
}

impl fmt::Debug for TestApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .field("port", &self.port)
            .finish()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    // We are not using the real weather provider, so we spawn a wiremock server,
    // and use its url in the configuration. Expectations are attached by the steps.
    let weather_server = MockServer::start().await;

    // This syntax is what would be used on the command line to override the
    // weather provider's url.
    let override_weather_url = format!("weather_api.base_url='{}'", weather_server.uri());

    let opts = Opts {
        config_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config"),
        run_mode: Some("testing".to_string()),
        settings: vec![override_weather_url],
        cmd: Command::Run,
    };

    // The 'testing' profile uses the in memory storage, and port 0.
    let settings: Settings = opts.try_into().expect("settings");

    let tokens = Arc::new(RecordingTokenGenerator::default());

    let app = Application::builder()
        .storage(settings.database.clone())
        .await
        .expect("subscription storage")
        .weather(settings.weather_api.clone())
        .expect("weather client")
        .tokens(tokens.clone())
        .listener(&settings.application)
        .expect("listener")
        .request_timeout(settings.application.request_timeout)
        .build()
        .expect("application");

    let port = app.port();
    let address = format!("{}:{}", settings.application.base_url, port);
    let server_handle = tokio::spawn(app.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .timeout(time::Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("api client build");

    TestApp {
        address,
        port,
        weather_server,
        tokens,
        api_client,
        server_handle,
    }
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("failed to execute request")
    }

    /// Send a form to the subscribe endpoint.
    pub async fn post_subscription(&self, form: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", self.address))
            .form(form)
            .send()
            .await
            .expect("failed to post on subscribe endpoint")
    }

    pub async fn get_weather(&self, city: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/weather", self.address))
            .query(&[("city", city)])
            .send()
            .await
            .expect("failed to get weather")
    }
}
