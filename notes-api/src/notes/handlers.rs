use crate::{db, Error, Result};

use super::{NoteDto, NoteId, NoteStore, UserId};

const NOTE_NOT_FOUND: &str = "Note not found";

pub async fn find_notes(store: &dyn NoteStore, user_id: UserId) -> Result<Vec<NoteDto>> {
    let notes = store.list_by_user(user_id).await.map_err(Error::from)?;
    Ok(notes.into_iter().map(NoteDto::from).collect())
}

pub async fn get_note(store: &dyn NoteStore, note_id: NoteId) -> Result<NoteDto> {
    store
        .get(note_id)
        .await
        .map_err(Error::from)?
        .map(NoteDto::from)
        .ok_or_else(|| Error::NotFound(NOTE_NOT_FOUND.into()))
}

/// The id of `note` is ignored, the store assigns a new one.
pub async fn create_note(store: &dyn NoteStore, note: NoteDto) -> Result<NoteDto> {
    let note = store.insert(note.into()).await.map_err(Error::from)?;
    tracing::debug!(note_id = note.id, user_id = note.user_id, "note created");
    Ok(note.into())
}

pub async fn update_note(store: &dyn NoteStore, note_id: NoteId, note: NoteDto) -> Result<()> {
    if note.id != note_id {
        return Err(Error::BadRequest(format!(
            "Note id {} in body does not match id {note_id} in path",
            note.id
        )));
    }

    store
        .update(note_id, note.into())
        .await
        .map_err(|e| db::Error::not_found_message(e, NOTE_NOT_FOUND))
        .map_err(Error::from)?;
    Ok(())
}

pub async fn delete_note(store: &dyn NoteStore, note_id: NoteId) -> Result<()> {
    store
        .delete(note_id)
        .await
        .map_err(|e| db::Error::not_found_message(e, NOTE_NOT_FOUND))
        .map_err(Error::from)
}
