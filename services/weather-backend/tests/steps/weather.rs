use cucumber::{given, then, when};
use serde_json::json;
use speculoos::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::state::{TestResponse, TestWorld};

#[given(
    regex = r#"^the weather provider reports ([-\d.]+) degrees, "([^"]*)" and (\d+)% humidity for "([^"]*)"$"#
)]
async fn provider_reports(
    world: &mut TestWorld,
    temperature: f64,
    description: String,
    humidity: i32,
    city: String,
) {
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", city.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": city },
            "current": {
                "temp_c": temperature,
                "humidity": humidity,
                "condition": { "text": description }
            }
        })))
        .mount(&world.app.weather_server)
        .await;
}

#[given(regex = r#"^the weather provider does not know "([^"]*)"$"#)]
async fn provider_does_not_know(world: &mut TestWorld, city: String) {
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", city.as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&world.app.weather_server)
        .await;
}

#[given("the weather provider is failing")]
async fn provider_failing(world: &mut TestWorld) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&world.app.weather_server)
        .await;
}

#[when(regex = r#"^the user requests the weather for "([^"]*)"$"#)]
async fn requests_weather(world: &mut TestWorld, city: String) {
    let resp = world.app.get_weather(&city).await;
    world.resp = Some(TestResponse::read(resp).await);
}

#[when("the user requests the weather without a city")]
async fn requests_weather_without_city(world: &mut TestWorld) {
    let resp = world.app.get("/api/weather").await;
    world.resp = Some(TestResponse::read(resp).await);
}

#[then(regex = r#"^the weather is ([-\d.]+) degrees, "([^"]*)" and (\d+)% humidity$"#)]
fn weather_is(world: &mut TestWorld, temperature: f64, description: String, humidity: i64) {
    let body = &world.resp.as_ref().expect("response").body;
    assert_that(&body["temperature"].as_f64()).is_equal_to(Some(temperature));
    assert_that(&body["description"].as_str()).is_equal_to(Some(description.as_str()));
    assert_that(&body["humidity"].as_i64()).is_equal_to(Some(humidity));
}
