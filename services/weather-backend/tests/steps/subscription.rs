use cucumber::{given, when};
use reqwest::StatusCode;

use crate::state::{TestResponse, TestWorld};

/// Posts the subscription form, and remembers the token issued on success.
async fn subscribe(world: &mut TestWorld, email: String, frequency: String, city: String) {
    let resp = world
        .app
        .post_subscription(&[
            ("email", email.as_str()),
            ("city", city.as_str()),
            ("frequency", frequency.as_str()),
        ])
        .await;
    let resp = TestResponse::read(resp).await;
    if resp.status == StatusCode::OK {
        let token = world.app.tokens.last().expect("issued token");
        world.tokens.insert((email, city), token.into());
    }
    world.resp = Some(resp);
}

#[given(regex = r#"^"(\S*)" subscribed to (\S*) updates for "([^"]*)"$"#)]
async fn subscribed(world: &mut TestWorld, email: String, frequency: String, city: String) {
    subscribe(world, email, frequency, city).await;
    let status = world.resp.as_ref().expect("response").status;
    assert_eq!(status, StatusCode::OK);
}

#[when(regex = r#"^"(\S*)" subscribes to (\S*) updates for "([^"]*)"$"#)]
async fn subscribes(world: &mut TestWorld, email: String, frequency: String, city: String) {
    subscribe(world, email, frequency, city).await;
}

#[when(regex = r#"^the user posts a subscription without (email|city|frequency)$"#)]
async fn subscribes_without(world: &mut TestWorld, missing: String) {
    let form: Vec<(&str, &str)> = [
        ("email", "a@x.com"),
        ("city", "Kyiv"),
        ("frequency", "daily"),
    ]
    .into_iter()
    .filter(|(field, _)| *field != missing)
    .collect();
    let resp = world.app.post_subscription(&form).await;
    world.resp = Some(TestResponse::read(resp).await);
}
