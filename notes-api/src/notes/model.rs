use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type NoteId = i64;
pub type UserId = i64;

/// A note as it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: Option<String>,
    pub user_id: UserId,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Request and response shape of a note.
///
/// On input `id`, `createdOn` and `updatedOn` may be omitted. The id is only
/// compared against the path on update, timestamps are always set by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    #[serde(default)]
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub updated_on: DateTime<Utc>,
    #[serde(default)]
    pub created_on: DateTime<Utc>,
    pub user_id: UserId,
}

/// Fields of a note a client is allowed to write.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFields {
    pub title: String,
    pub body: Option<String>,
    pub user_id: UserId,
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            body: note.body,
            updated_on: note.updated_on,
            created_on: note.created_on,
            user_id: note.user_id,
        }
    }
}

impl From<NoteDto> for NoteFields {
    fn from(NoteDto { title, body, user_id, .. }: NoteDto) -> Self {
        Self { title, body, user_id }
    }
}
