
use self::setup::*;
use easyreq::{Body, Error, Request};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize, Eq, PartialEq, Debug)]
struct User {
    user: String,
}

#[test]
fn test_get_appends_query() {
    setup();
    let body = get_body(easyreq::get(url("/echo-url"), &[("userId", "6")]));
    assert_eq!(body, "/echo-url?userId=6");
}

#[test]
fn test_get_appends_separator_even_without_parameters() {
    setup();
    let body = get_body(easyreq::get(url("/echo-url"), &[]));
    assert_eq!(body, "/echo-url?");
}

#[test]
fn test_get_encodes_parameters() {
    setup();
    let body = get_body(easyreq::get(url("/echo-url"), &[("a b", "c&d")]));
    assert_eq!(body, "/echo-url?a%20b=c%26d");
}

#[test]
fn test_post() {
    setup();
    let body = get_body(easyreq::post(url("/c"), &[("userId", "6")]));
    assert_eq!(body, "l: userId=6");
}

#[test]
fn test_post_raw_payload() {
    setup();
    let body = get_body(easyreq::post(url("/c"), "{\"a\":1}"));
    assert_eq!(body, "l: {\"a\":1}");
}

#[test]
fn test_post_sets_form_content_type() {
    setup();
    let body = get_body(easyreq::post(url("/content-type-pong"), &[("a", "b")]));
    assert_eq!(body, "application/x-www-form-urlencoded");
}

#[test]
fn test_set_json_sets_content_type() {
    setup();

    #[derive(serde::Serialize)]
    struct NewUser {
        user: &'static str,
    }

    let mut request = Request::new();
    request
        .set_json(&NewUser { user: "user2" })
        .unwrap()
        .set_post(true)
        .set_url(url("/content-type-pong"));
    let body = get_body(request.run());
    assert_eq!(body, "application/json");
}

#[test]
fn test_put() {
    setup();
    let body = get_body(easyreq::put(url("/d"), &[("userId", "6")]));
    assert_eq!(body, "m: userId=6");
}

#[test]
fn test_patch() {
    setup();
    let body = get_body(easyreq::patch(url("/i"), &[("a", "b")]));
    assert_eq!(body, "r: a=b");
}

#[test]
fn test_delete_carries_query_not_body() {
    setup();
    let body = get_body(easyreq::delete(url("/e"), &[("userId", "6")]));
    assert_eq!(body, "n: /e?userId=6");
}

#[test]
fn test_run_with_custom_method() {
    setup();
    let mut request = Request::new();
    request.set_request_method("options").set_url(url("/g"));
    let body = get_body(request.run());
    assert_eq!(body, "p: ");
}

#[test]
fn test_json_body_is_decoded() {
    setup();
    let response = easyreq::get(url("/json"), &[]).unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.body(), &Body::Json(json!({ "user": "user2" })));
}

#[test]
fn test_json_with_charset_stays_raw() {
    setup();
    let response = easyreq::get(url("/json-charset"), &[]).unwrap();
    assert!(response.body().as_json().is_none());
    assert_eq!(response.body().as_str(), Some("{\"user\":\"user2\"}"));
}

#[test]
fn test_undecodable_json_becomes_null() {
    setup();
    let response = easyreq::get(url("/json-bad"), &[]).unwrap();
    assert_eq!(response.body(), &Body::Json(Value::Null));
}

#[test]
fn test_json_into_struct() {
    setup();
    let response = easyreq::get(url("/json"), &[]).unwrap();
    let user: User = response.json().unwrap();
    assert_eq!(
        user,
        User {
            user: String::from("user2")
        }
    );
}

#[test]
fn test_headers() {
    setup();
    let mut request = Request::new();
    request.set_header("Ping", "Qwerty");
    let body = get_body(request.get(url("/header_pong"), &[]));
    assert_eq!(body, "Qwerty");
}

#[test]
fn test_empty_header_value_still_sends_the_name() {
    setup();
    let mut request = Request::new();
    request.set_header("X-Flag", "");
    let body = get_body(request.get(url("/flag_pong"), &[]));
    assert_eq!(body, "yes");
}

#[test]
fn test_bearer() {
    setup();
    let mut request = Request::new();
    request.set_bearer("iugu342");
    let body = get_body(request.get(url("/bearer_pong"), &[]));
    assert_eq!(body, "Bearer iugu342");
}

#[test]
fn test_error_statuses_are_data_not_errors() {
    setup();
    let response = easyreq::get(url("/status-404"), &[]).unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.body().as_str(), Some("gone"));
}

#[test]
fn test_redirects_are_followed_by_default() {
    setup();
    let response = easyreq::get(url("/redirect-once"), &[]).unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.body().as_str(), Some("/echo-url"));
}

#[test]
fn test_redirects_come_back_as_data_when_not_followed() {
    setup();
    let mut request = Request::new();
    request.set_follow_redirects(false);
    let response = request.get(url("/redirect-once"), &[]).unwrap();
    assert_eq!(response.status(), 301);
    assert_eq!(
        response.header("location"),
        Some("http://localhost:35794/echo-url")
    );
}

#[test]
fn test_redirect_loops_error_out() {
    setup();
    let result = easyreq::get(url("/loop-a"), &[]);
    assert!(matches!(result, Err(Error::Transport(_))));
}

#[test]
fn test_timeout_too_low() {
    setup();
    let mut request = Request::new();
    request.set_timeout(1);
    let result = request.get(url("/slow"), &[]);
    assert!(matches!(result, Err(Error::Transport(_))));
}

#[test]
fn test_timeout_high_enough() {
    setup();
    let mut request = Request::new();
    request.set_timeout(3);
    let body = get_body(request.get(url("/slow"), &[]));
    assert_eq!(body, "slow: ok");
}

#[test]
fn test_port_override() {
    setup();
    let mut request = Request::new();
    let body = get_body(
        request
            .set_port(PORT)
            .get("http://localhost:1/echo-url", &[("p", "1")]),
    );
    assert_eq!(body, "/echo-url?p=1");
}

#[test]
fn test_default_protocol_fills_in_the_scheme() {
    setup();
    let body = get_body(easyreq::get(format!("localhost:{}/echo-url", PORT), &[]));
    assert_eq!(body, "/echo-url?");
}

#[test]
fn test_exists() {
    setup();
    assert!(easyreq::exists(url("/probe")));
}

#[test]
fn test_exists_is_false_for_404() {
    setup();
    assert!(!easyreq::exists(url("/no-such-path")));
}

#[test]
fn test_exists_does_not_follow_redirects() {
    setup();
    assert!(!easyreq::exists(url("/probe-moved")));
}

#[test]
fn test_exists_swallows_connection_failures() {
    assert!(!easyreq::exists("http://localhost:35795/probe"));
}

#[test]
fn test_last_response_is_kept() {
    setup();
    let mut request = Request::new();
    let response = request.get(url("/json"), &[]).unwrap();
    let kept = request.last_response().unwrap();
    assert_eq!(kept.status(), response.status());
    assert_eq!(kept.body(), response.body());
}

#[test]
fn test_builder_survives_reuse_across_verbs() {
    setup();
    let mut request = Request::new();

    let first = get_body(request.get(url("/echo-url"), &[("a", "1")]));
    assert_eq!(first, "/echo-url?a=1");

    let second = get_body(request.get(url("/echo-url"), &[("a", "2")]));
    assert_eq!(second, "/echo-url?a=2");

    let third = get_body(request.post(url("/c"), &[("a", "3")]));
    assert_eq!(third, "l: a=3");
}

#[test]
fn test_status_code_helper_reports_errors() {
    setup();
    assert_eq!(get_status_code(easyreq::get(url("/status-404"), &[])), 404);
    assert_eq!(
        get_status_code(easyreq::get("http://localhost:35795/", &[])),
        -1
    );
}
