mod config;

mod app;
mod db;
mod errors;
mod logging;
mod notes;
mod openapi;
mod state;

use std::net::SocketAddr;

use aide::axum::ApiRouter;
use app::AppParams;
pub use config::config;
pub use db::init_db;
pub use errors::{Error, Result};
use notes::SqliteNoteStore;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config();

    logging::setup_tracing(config.log_json);

    let conn = init_db().await?;

    let (app, _api) = app::create(AppParams {
        notes: SqliteNoteStore::new(conn).into_ref(),
        router: |state| ApiRouter::new().merge(notes::router(state)),
    })
    .await?;

    let app = logging::add_tracing_layer(app);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
