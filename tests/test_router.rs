use switchyard::http::request::{Method, RequestBuilder};
use switchyard::{handler_fn, Request, ResponseContext, Router};

fn tag(name: &'static str) -> impl switchyard::Handler {
    handler_fn(move |_req, res| {
        res.send(name);
        Ok(())
    })
}

/// Runs whatever handler matched and returns the body it wrote.
async fn matched_body(router: &Router, method: Method, path: &str) -> Option<String> {
    let found = router.find(&method, path)?;
    let raw = RequestBuilder::new().method(method).path(path).build().unwrap();
    let mut req = Request::new(&raw);
    let mut res = ResponseContext::default();
    found.handler.call(&mut req, &mut res).await.unwrap();
    res.body_text().map(str::to_string)
}

#[test]
fn test_extracts_named_params() {
    let mut router = Router::new();
    router.get("/users/:id/posts/:post", tag("posts"));

    let found = router.find(&Method::GET, "/users/42/posts/7").unwrap();
    assert_eq!(found.pattern.as_str(), "/users/:id/posts/:post");
    assert_eq!(found.params.len(), 2);
    assert_eq!(found.params["id"], "42");
    assert_eq!(found.params["post"], "7");
}

#[test]
fn test_literal_only_route_has_no_params() {
    let mut router = Router::new();
    router.get("/health", tag("health"));

    let found = router.find(&Method::GET, "/health").unwrap();
    assert!(found.params.is_empty());
}

#[test]
fn test_segment_count_mismatch_never_matches() {
    let mut router = Router::new();
    router.get("/users/:id", tag("user"));

    assert!(router.find(&Method::GET, "/users").is_none());
    assert!(router.find(&Method::GET, "/users/1/extra").is_none());
    assert!(router.find(&Method::GET, "/users/1/").is_none());
}

#[test]
fn test_trailing_slash_is_a_distinct_route() {
    let mut router = Router::new();
    router.get("/foo", tag("bare"));

    assert!(router.find(&Method::GET, "/foo").is_some());
    assert!(router.find(&Method::GET, "/foo/").is_none());
}

#[test]
fn test_root_and_empty_path_are_the_same_shape() {
    let mut router = Router::new();
    router.get("/", tag("root"));

    assert!(router.find(&Method::GET, "/").is_some());
    assert!(router.find(&Method::GET, "").is_some());
    assert!(router.find(&Method::GET, "/x").is_none());
}

#[test]
fn test_literals_are_case_sensitive() {
    let mut router = Router::new();
    router.get("/About", tag("about"));

    assert!(router.find(&Method::GET, "/About").is_some());
    assert!(router.find(&Method::GET, "/about").is_none());
}

#[test]
fn test_routes_are_per_method() {
    let mut router = Router::new();
    router.post("/items", tag("create"));

    assert!(router.find(&Method::GET, "/items").is_none());
    assert!(router.find(&Method::POST, "/items").is_some());
}

#[test]
fn test_unsupported_method_registration_is_ignored() {
    let mut router = Router::new();
    router.register(Method::Extension("BREW".into()), "/pot", tag("teapot"));

    assert!(router.is_empty());
    assert!(router.find(&Method::Extension("BREW".into()), "/pot").is_none());
}

#[tokio::test]
async fn test_param_route_registered_first_shadows_literal() {
    let mut router = Router::new();
    router.get("/users/:id", tag("param"));
    router.get("/users/me", tag("literal"));

    assert_eq!(matched_body(&router, Method::GET, "/users/me").await.as_deref(), Some("param"));
}

#[tokio::test]
async fn test_literal_route_registered_first_wins() {
    let mut router = Router::new();
    router.get("/users/me", tag("literal"));
    router.get("/users/:id", tag("param"));

    assert_eq!(matched_body(&router, Method::GET, "/users/me").await.as_deref(), Some("literal"));
    assert_eq!(matched_body(&router, Method::GET, "/users/7").await.as_deref(), Some("param"));
}

#[tokio::test]
async fn test_precedence_with_params_at_different_positions() {
    let mut router = Router::new();
    router.get("/:kind/new", tag("kind-first"));
    router.get("/posts/:id", tag("id-second"));

    assert_eq!(matched_body(&router, Method::GET, "/posts/new").await.as_deref(), Some("kind-first"));
    assert_eq!(matched_body(&router, Method::GET, "/posts/9").await.as_deref(), Some("id-second"));
}

#[tokio::test]
async fn test_reregistering_replaces_handler_in_place() {
    let mut router = Router::new();
    router.get("/a/:x", tag("first"));
    router.get("/a/b", tag("literal"));
    router.get("/a/:x", tag("second"));

    assert_eq!(router.len(), 2);
    assert_eq!(router.patterns(&Method::GET), vec!["/a/:x", "/a/b"]);
    assert_eq!(matched_body(&router, Method::GET, "/a/b").await.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_leading_slash_does_not_make_a_new_route() {
    let mut router = Router::new();
    router.get("/users/:id", tag("first"));
    router.get("users/:id", tag("second"));

    assert_eq!(router.len(), 1);
    assert_eq!(router.patterns(&Method::GET), vec!["/users/:id"]);
    assert_eq!(matched_body(&router, Method::GET, "/users/7").await.as_deref(), Some("second"));
}
