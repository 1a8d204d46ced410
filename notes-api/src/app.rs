use aide::scalar::Scalar;
use axum::{
    middleware::{self},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::config;

use rand::Rng;
use serde_json::json;

use crate::{
    errors::{self, on_error, ErrorResponseDocs},
    notes::NoteStoreRef,
    openapi::{self, aide::axum::ApiRouter, OpenApi},
    state::AppState,
};

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> ApiRouter,
{
    pub notes: NoteStoreRef,
    pub router: Router,
}

pub async fn create<R>(AppParams { notes, router }: AppParams<R>) -> errors::Result<(Router, OpenApi)>
where
    R: FnOnce(AppState) -> ApiRouter,
{
    let mut api = OpenApi::default();

    let state = AppState { notes };

    let docs_router = axum::Router::new()
        .route(
            "/__docs__",
            get(Scalar::new("/__docs__/spec.json")
                .with_title("Notes API")
                .axum_handler()),
        )
        .route("/__docs__/spec.json", get(serve_docs));

    let app = ApiRouter::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .merge(docs_router)
        .merge(router(state))
        .finish_api_with(&mut api, |t| {
            t.title("Notes API")
                .description("An API for managing short text notes owned by users")
                .default_response::<openapi::Json<ErrorResponseDocs>>()
        })
        .layer(
            ServiceBuilder::new()
                .layer(Extension(Arc::new(api.clone())))
                .layer(middleware::from_fn(on_error)),
        );

    Ok((app, api))
}

async fn version() -> impl IntoResponse {
    let config = &config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat() -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    let random: u32 = rng.gen_range(0..=10000);

    Json(json!({
        "status" : "ok",
        "random": random,
    }))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoResponse {
    Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{db::init_test_db, errors::Result, notes, notes::SqliteNoteStore};

    async fn server() -> Result<axum_test::TestServer> {
        let store = SqliteNoteStore::new(init_test_db().await?).into_ref();
        crate::tests::test_server(store, notes::router).await
    }

    #[tokio::test]
    async fn heartbeat() -> Result<()> {
        let server = server().await?;

        let response = server.get("/__heartbeat__").await;
        assert_eq!(response.json::<Value>()["status"], "ok");

        server.get("/__lbheartbeat__").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn version() -> Result<()> {
        let server = server().await?;

        let response = server.get("/__version__").await;
        let body = response.json::<Value>();
        assert!(body.get("version").is_some());
        assert!(body.get("commit").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn serves_openapi_document() -> Result<()> {
        let server = server().await?;

        let spec = server.get("/__docs__/spec.json").await.json::<Value>();
        let paths = spec["paths"].as_object().unwrap();

        assert!(paths.contains_key("/notes"));
        assert!(paths.contains_key("/notes/{id}"));
        assert!(paths.contains_key("/notes/user/{user_id}"));
        Ok(())
    }
}
