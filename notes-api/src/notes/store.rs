use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::db::{self, DB};

use super::{Note, NoteFields, NoteId, UserId};

pub type NoteStoreRef = Arc<dyn NoteStore>;

/// Authoritative set of notes.
///
/// `update` and `delete` fail with [`db::Error::NotFound`] when the id is unknown.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_by_user(&self, user_id: UserId) -> db::Result<Vec<Note>>;
    async fn get(&self, id: NoteId) -> db::Result<Option<Note>>;
    async fn insert(&self, fields: NoteFields) -> db::Result<Note>;
    async fn update(&self, id: NoteId, fields: NoteFields) -> db::Result<Note>;
    async fn delete(&self, id: NoteId) -> db::Result<()>;
}

#[derive(Iden)]
enum Notes {
    Table,
    Id,
    Title,
    Body,
    UserId,
    CreatedOn,
    UpdatedOn,
}

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            user_id: row.get(3)?,
            created_on: row.get(4)?,
            updated_on: row.get(5)?,
        })
    }
}

fn select_notes() -> SelectStatement {
    Query::select()
        .columns({
            use Notes::*;
            [Id, Title, Body, UserId, CreatedOn, UpdatedOn]
        })
        .from(Notes::Table)
        .to_owned()
}

fn find_note(conn: &rusqlite::Connection, id: NoteId) -> rusqlite::Result<Option<Note>> {
    let (sql, values) = select_notes()
        .and_where(Expr::col(Notes::Id).eq(id))
        .build_rusqlite(SqliteQueryBuilder);

    conn.query_row(&sql, &*values.as_params(), |row| Note::try_from(row))
        .optional()
}

/// Notes kept in SQLite. Every call runs on the connection's worker thread,
/// so writes to the same note are applied one after another.
#[derive(Clone)]
pub struct SqliteNoteStore {
    db: DB,
}

impl SqliteNoteStore {
    pub fn new(db: DB) -> Self {
        Self { db }
    }

    pub fn into_ref(self) -> NoteStoreRef {
        Arc::new(self)
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn list_by_user(&self, user_id: UserId) -> db::Result<Vec<Note>> {
        self.db
            .call(move |conn| {
                let (sql, values) = select_notes()
                    .and_where(Expr::col(Notes::UserId).eq(user_id))
                    .order_by(Notes::Id, Order::Asc)
                    .build_rusqlite(SqliteQueryBuilder);

                let notes = conn
                    .prepare(&sql)?
                    .query_map(&*values.as_params(), |row| Note::try_from(row))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(notes)
            })
            .await
            .map_err(db::Error::from)
    }

    async fn get(&self, id: NoteId) -> db::Result<Option<Note>> {
        self.db
            .call(move |conn| Ok(find_note(conn, id)?))
            .await
            .map_err(db::Error::from)
    }

    async fn insert(&self, NoteFields { title, body, user_id }: NoteFields) -> db::Result<Note> {
        let now = Utc::now();
        self.db
            .call(move |conn| {
                conn.query_row(
                    r#"INSERT INTO notes (title, body, user_id, created_on, updated_on) VALUES (?, ?, ?, ?, ?)
                    RETURNING id, title, body, user_id, created_on, updated_on"#,
                    params![title, body, user_id, now, now],
                    |row| Note::try_from(row),
                )
                .map_err(|e| e.into())
            })
            .await
            .map_err(db::Error::from)
    }

    async fn update(&self, id: NoteId, NoteFields { title, body, user_id }: NoteFields) -> db::Result<Note> {
        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;

                let current = find_note(&tx, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
                // keeps updated_on monotonic if the wall clock steps back
                let updated_on = Utc::now().max(current.updated_on);

                let note = tx.query_row(
                    r#"UPDATE notes SET title = ?, body = ?, user_id = ?, updated_on = ?
                    WHERE id = ?
                    RETURNING id, title, body, user_id, created_on, updated_on"#,
                    params![title, body, user_id, updated_on, id],
                    |row| Note::try_from(row),
                )?;

                tx.commit()?;
                Ok(note)
            })
            .await
            .map_err(db::Error::from)
    }

    async fn delete(&self, id: NoteId) -> db::Result<()> {
        self.db
            .call(move |conn| {
                conn.query_row("DELETE FROM notes WHERE id = ? RETURNING id", params![id], |row| {
                    row.get::<_, NoteId>(0)
                })?;
                Ok(())
            })
            .await
            .map_err(db::Error::from)
    }
}
