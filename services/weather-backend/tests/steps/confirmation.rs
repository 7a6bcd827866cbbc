use cucumber::when;

use crate::state::{TestResponse, TestWorld};

#[when(regex = r#"^"(\S*)" (confirms|unsubscribes) the subscription for "([^"]*)"$"#)]
async fn follows_link(world: &mut TestWorld, email: String, action: String, city: String) {
    let token = world.token_for(&email, &city);
    let path = match action.as_str() {
        "confirms" => format!("/api/confirm/{token}"),
        _ => format!("/api/unsubscribe/{token}"),
    };
    let resp = world.app.get(&path).await;
    world.resp = Some(TestResponse::read(resp).await);
}

#[when(regex = r#"^the user (confirms|unsubscribes) with the token "(\S*)"$"#)]
async fn uses_token(world: &mut TestWorld, action: String, token: String) {
    let path = match action.as_str() {
        "confirms" => format!("/api/confirm/{token}"),
        _ => format!("/api/unsubscribe/{token}"),
    };
    let resp = world.app.get(&path).await;
    world.resp = Some(TestResponse::read(resp).await);
}
