use cucumber::then;
use speculoos::prelude::*;

use crate::state::TestWorld;

#[then(regex = r#"^the response is (\d{3})"#)]
fn response_status(world: &mut TestWorld, status: u16) {
    let resp = world.resp.as_ref().expect("response");
    assert_that(&resp.status.as_u16()).is_equal_to(status);
}

#[then(regex = r#"^the response status field is "(\w+)"$"#)]
fn response_status_field(world: &mut TestWorld, status: String) {
    let resp = world.resp.as_ref().expect("response");
    assert_that(&resp.body["status"].as_str()).is_equal_to(Some(status.as_str()));
}

#[then(regex = r#"^the error code is "(\S+)"$"#)]
fn response_error_code(world: &mut TestWorld, code: String) {
    let resp = world.resp.as_ref().expect("response");
    assert_that(&resp.body["status"].as_str()).is_equal_to(Some("fail"));
    assert_that(&resp.body["code"].as_str()).is_equal_to(Some(code.as_str()));
}
