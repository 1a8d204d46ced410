mod migrations;

use tokio_rusqlite::Connection;

use crate::config::config;

use migrations::MIGRATIONS;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error(transparent)]
    TokioRusqlite(tokio_rusqlite::Error),
    #[error(transparent)]
    Rusqlite(rusqlite::Error),
    #[error(transparent)]
    Migration(#[from] rusqlite_migration::Error),
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

impl From<tokio_rusqlite::Error> for Error {
    fn from(error: tokio_rusqlite::Error) -> Self {
        match error {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => Self::NotFound("Not found".into()),
            error => Self::TokioRusqlite(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound("Not found".into()),
            error => Self::Rusqlite(error),
        }
    }
}

pub type DB = Connection;

pub async fn init_db() -> Result<DB> {
    let config = config();
    let conn = if config.is_in_memory() {
        Connection::open_in_memory().await?
    } else {
        Connection::open(&config.database_url).await?
    };

    let journal_mode = (!config.is_in_memory()).then_some("WAL");
    migrate(&conn, journal_mode).await?;

    tracing::debug!(database_url = %config.database_url, "database ready");

    Ok(conn)
}

#[cfg(test)]
pub async fn init_test_db() -> Result<DB> {
    let conn = Connection::open_in_memory().await?;
    migrate(&conn, None).await?;
    Ok(conn)
}

async fn migrate(conn: &DB, journal_mode: Option<&'static str>) -> Result<()> {
    conn.call(move |conn| {
        if let Some(journal_mode) = journal_mode {
            conn.pragma_update(None, "journal_mode", journal_mode)?;
        }

        Ok(MIGRATIONS.to_latest(conn))
    })
    .await??;

    Ok(())
}
