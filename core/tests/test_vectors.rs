//! Verify build/parse/fetch against the JSON test vectors in `test-vectors/`.
//!
//! Each case describes the expected request, a simulated response, and either
//! the expected parsed list or the expected error class. Comparing parsed
//! values (not raw strings) avoids false negatives from field ordering.

use posts_core::{FetchError, HttpMethod, HttpRequest, HttpResponse, Post, PostsClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PostsClient {
    PostsClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn cases() -> Vec<serde_json::Value> {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

#[test]
fn list_test_vectors() {
    let c = client();
    for case in cases() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_posts();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.headers.is_empty(), "{name}: headers should be empty");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_list_posts(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "Http" => assert!(matches!(err, FetchError::Http { .. }), "{name}: expected Http, got {err}"),
                "Deserialization" => {
                    assert!(matches!(err, FetchError::Deserialization(_)), "{name}: expected Deserialization, got {err}")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let posts = result.unwrap();
            let expected: Vec<Post> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(posts, expected, "{name}: parsed result");
        }
    }
}

#[test]
fn fetch_posts_matches_vectors() {
    let c = client();
    for case in cases() {
        let name = case["name"].as_str().unwrap();
        let response = simulated_response(&case);
        let transport = move |_: HttpRequest| -> Result<HttpResponse, FetchError> { Ok(response.clone()) };

        let posts = c.fetch_posts(&transport);
        if case.get("expected_error").is_some() {
            assert!(posts.is_empty(), "{name}: failure should yield an empty list");
        } else {
            let expected: Vec<Post> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(posts, expected, "{name}: fetched result");
        }
    }
}
