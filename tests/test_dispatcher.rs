mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use common::{counting, get, post_json, Deny, SetHeader};
use switchyard::dispatcher::NOT_FOUND_BODY;
use switchyard::http::request::{Method, RequestBuilder};
use switchyard::middleware::BodyParser;
use switchyard::{handler_fn, App, Body, Handler, Request, ResponseContext};

#[tokio::test]
async fn test_handler_receives_path_params() {
    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();

    let mut app = App::new();
    app.get("/users/:id", handler_fn(move |req, res| {
        *captured.lock().unwrap() = Some(req.params.clone());
        res.send(format!("user {}", req.param("id").unwrap_or("?")));
        Ok(())
    }));

    let response = app.build().dispatch(&get("/users/42")).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body, b"user 42".to_vec());
    let params = seen.lock().unwrap().clone().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params["id"], "42");
}

#[tokio::test]
async fn test_unknown_route_is_404_not_found() {
    let app = App::new();
    let response = app.build().dispatch(&get("/unknown")).await.unwrap();

    assert_eq!(response.status.as_u16(), 404);
    assert_eq!(response.body, NOT_FOUND_BODY.as_bytes().to_vec());
    assert_eq!(response.body, b"Not Found".to_vec());
}

#[tokio::test]
async fn test_unrecognized_method_falls_through_to_404() {
    let mut app = App::new();
    app.get("/", handler_fn(|_req, res| {
        res.send("root");
        Ok(())
    }));

    let raw = RequestBuilder::new()
        .method(Method::Extension("PURGE".into()))
        .path("/")
        .build()
        .unwrap();
    let response = app.build().dispatch(&raw).await.unwrap();

    assert_eq!(response.status.as_u16(), 404);
}

#[tokio::test]
async fn test_middleware_header_and_handler_body_combine() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.use_middleware(SetHeader("X-Powered-By", "switchyard"))
        .get("/", counting("ok", hits.clone()));

    let response = app.build().dispatch(&get("/")).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.header("X-Powered-By"), Some("switchyard"));
    assert_eq!(response.body, b"ok".to_vec());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejecting_middleware_never_invokes_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.use_middleware(Deny).get("/", counting("ok", hits.clone()));

    let response = app.build().dispatch(&get("/")).await.unwrap();

    assert_eq!(response.status.as_u16(), 401);
    assert_eq!(response.body, b"no".to_vec());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_handler_error_propagates() {
    let mut app = App::new();
    app.get("/boom", handler_fn(|_req, _res| Err(anyhow::anyhow!("handler failed"))));

    let err = app.build().dispatch(&get("/boom")).await.unwrap_err();
    assert_eq!(err.to_string(), "handler failed");
}

#[tokio::test]
async fn test_json_serialization_failure_is_fatal() {
    struct Bad;
    impl serde::Serialize for Bad {
        fn serialize<S: serde::Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("nope"))
        }
    }

    let mut app = App::new();
    app.get("/", handler_fn(|_req, res| {
        res.json(&Bad)?;
        Ok(())
    }));

    assert!(app.build().dispatch(&get("/")).await.is_err());
}

#[tokio::test]
async fn test_contexts_are_fresh_per_request() {
    let mut app = App::new();
    app.get("/count/:n", handler_fn(|req, res| {
        assert_eq!(req.params.len(), 1);
        res.set_header(format!("X-{}", req.param("n").unwrap_or_default()), "1");
        res.send("ok");
        Ok(())
    }));
    let dispatcher = app.build();

    let first = dispatcher.dispatch(&get("/count/a")).await.unwrap();
    let second = dispatcher.dispatch(&get("/count/b")).await.unwrap();

    assert!(first.header("X-a").is_some());
    assert!(second.header("X-a").is_none());
    assert!(second.header("X-b").is_some());
}

struct Echo;

#[async_trait]
impl Handler for Echo {
    async fn call(&self, req: &mut Request<'_>, res: &mut ResponseContext) -> anyhow::Result<()> {
        let body = req.body.as_json().cloned().unwrap_or(Value::Null);
        res.status(201).json(&json!({ "echo": body }))?;
        Ok(())
    }
}

#[tokio::test]
async fn test_body_parser_feeds_handler() {
    let mut app = App::new();
    app.use_middleware(BodyParser::new()).post("/echo", Echo);

    let response = app
        .build()
        .dispatch(&post_json("/echo", r#"{"name":"Ada"}"#))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 201);
    let parsed: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(parsed, json!({ "echo": { "name": "Ada" } }));
}

#[tokio::test]
async fn test_body_parse_failure_short_circuits_with_400() {
    let mut app = App::new();
    app.use_middleware(BodyParser::new()).post("/echo", Echo);

    let response = app.build().dispatch(&post_json("/echo", "{broken")).await.unwrap();

    assert_eq!(response.status.as_u16(), 400);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    let parsed: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(parsed["error"], "Bad Request");
    assert!(parsed["message"].as_str().unwrap().contains("invalid JSON"));
}

#[tokio::test]
async fn test_body_parser_ignores_safe_methods() {
    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();

    let mut app = App::new();
    app.use_middleware(BodyParser::new())
        .get("/", handler_fn(move |req, _res| {
            *captured.lock().unwrap() = Some(req.body.clone());
            Ok(())
        }));

    let raw = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .header("Content-Type", "application/json")
        .body(b"{broken".to_vec())
        .build()
        .unwrap();
    let response = app.build().dispatch(&raw).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(seen.lock().unwrap().clone(), Some(Body::Pending));
}

#[tokio::test]
async fn test_dispatcher_is_shareable_across_tasks() {
    let mut app = App::new();
    app.get("/n/:n", handler_fn(|req, res| {
        res.send(req.param("n").unwrap_or_default().to_string());
        Ok(())
    }));
    let dispatcher = Arc::new(app.build());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let raw = get(&format!("/n/{i}"));
                let response = dispatcher.dispatch(&raw).await.unwrap();
                assert_eq!(response.body, i.to_string().into_bytes());
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}
