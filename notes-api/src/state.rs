use axum::extract::FromRef;

use crate::notes::NoteStoreRef;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub notes: NoteStoreRef,
}
