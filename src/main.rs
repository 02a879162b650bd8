use async_trait::async_trait;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use switchyard::config::Config;
use switchyard::http::response::StatusCode;
use switchyard::middleware::{BodyParser, ServeStatic};
use switchyard::templates::Views;
use switchyard::{handler_fn, App, Body, Handler, Request, ResponseContext};

struct Home;

#[async_trait]
impl Handler for Home {
    async fn call(&self, req: &mut Request<'_>, res: &mut ResponseContext) -> anyhow::Result<()> {
        let name = req.query().get("name").cloned().unwrap_or_else(|| "world".to_string());
        res.render("index", json!({ "name": name })).await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let mut app = App::new();
    app.use_middleware(BodyParser::new());

    if let Some(static_cfg) = &cfg.static_files {
        tracing::info!(root = %static_cfg.root.display(), "Serving static files");
        app.use_middleware(ServeStatic::new(static_cfg.root.clone()));
    }

    if let Some(views) = &cfg.views {
        app.templates(Views::new(views.dir.clone()));
        app.get("/", Home);
    } else {
        app.get("/", handler_fn(|_req, res| {
            res.set_header("Content-Type", "text/plain").send("Hello from Switchyard\n");
            Ok(())
        }));
    }

    app.get("/health", handler_fn(|_req, res| {
        res.json(&json!({ "status": "ok" }))?;
        Ok(())
    }))
    .get("/users/:id", handler_fn(|req, res| {
        res.json(&json!({ "id": req.param("id") }))?;
        Ok(())
    }))
    .post("/echo", handler_fn(|req, res| {
        let echoed = match &req.body {
            Body::Json(v) => v.clone(),
            Body::Form(f) => json!(f),
            Body::Text(t) => json!(t),
            _ => json!(null),
        };
        res.status(StatusCode::CREATED.as_u16()).json(&json!({ "received": echoed }))?;
        Ok(())
    }));

    tokio::select! {
        res = app.listen(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
