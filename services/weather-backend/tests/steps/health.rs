use cucumber::when;

use crate::state::{TestResponse, TestWorld};

#[when(regex = r#"^the user requests the (liveness|readiness) probe$"#)]
async fn requests_probe(world: &mut TestWorld, probe: String) {
    let resp = world.app.get(&format!("/health/{probe}")).await;
    world.resp = Some(TestResponse::read(resp).await);
}

#[when(regex = r#"^the user requests "(\S+)"$"#)]
async fn request_path(world: &mut TestWorld, path: String) {
    let resp = world.app.get(&path).await;
    world.resp = Some(TestResponse::read(resp).await);
}
