use crate::{
    openapi::{
        aide::{
            axum::{
                routing::{get_with, post_with},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json, Path,
    },
    state::AppState,
};
use axum::{extract::State, http::header, http::StatusCode};

use schemars::JsonSchema;

use serde::Deserialize;

use super::{handlers, NoteDto, NoteId, NoteStoreRef, UserId};

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    id: NoteId,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UserIdPath {
    user_id: UserId,
}

pub fn note_location(id: NoteId) -> String {
    format!("/notes/{id}")
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/notes",
            post_with(create_note, |t| {
                t.summary("Creates new note")
                    .response::<201, Json<NoteDto>>()
            }),
        )
        .api_route(
            "/notes/user/{user_id}",
            get_with(find_notes, |t| t.summary("Gets all user notes")),
        )
        .api_route(
            "/notes/{id}",
            get_with(get_note, |t| t.summary("Gets a specific note"))
                .put_with(update_note, |t| {
                    t.summary("Edits a specific note").response::<204, ()>()
                })
                .delete_with(delete_note, |t| {
                    t.summary("Deletes a specific note").response::<204, ()>()
                }),
        )
        .with_state(state)
}

async fn find_notes(
    State(store): State<NoteStoreRef>,
    Path(UserIdPath { user_id }): Path<UserIdPath>,
) -> impl IntoApiResponse {
    handlers::find_notes(store.as_ref(), user_id).await.map(Json)
}

async fn get_note(
    State(store): State<NoteStoreRef>,
    Path(NoteIdPath { id }): Path<NoteIdPath>,
) -> impl IntoApiResponse {
    handlers::get_note(store.as_ref(), id).await.map(Json)
}

async fn create_note(State(store): State<NoteStoreRef>, Json(note): Json<NoteDto>) -> impl IntoApiResponse {
    handlers::create_note(store.as_ref(), note)
        .await
        .map(|note| (StatusCode::CREATED, [(header::LOCATION, note_location(note.id))], Json(note)))
}

async fn update_note(
    State(store): State<NoteStoreRef>,
    Path(NoteIdPath { id }): Path<NoteIdPath>,
    Json(note): Json<NoteDto>,
) -> impl IntoApiResponse {
    handlers::update_note(store.as_ref(), id, note)
        .await
        .map(|_| NoApi(StatusCode::NO_CONTENT))
}

async fn delete_note(
    State(store): State<NoteStoreRef>,
    Path(NoteIdPath { id }): Path<NoteIdPath>,
) -> impl IntoApiResponse {
    handlers::delete_note(store.as_ref(), id)
        .await
        .map(|_| NoApi(StatusCode::NO_CONTENT))
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::{ErrorResponse, Result},
        notes::{NoteDto, NoteStoreRef, SqliteNoteStore},
    };
    use axum_test::TestServer;
    use serde_json::json;

    use super::note_location;

    async fn setup() -> Result<(TestServer, NoteStoreRef)> {
        let store = SqliteNoteStore::new(crate::db::init_test_db().await?).into_ref();
        let server = crate::tests::test_server(store.clone(), super::router).await?;
        Ok((server, store))
    }

    async fn seed(store: &NoteStoreRef, title: &str, user_id: i64) -> Result<NoteDto> {
        let note = serde_json::from_value(json!({ "title": title, "body": title, "userId": user_id })).unwrap();
        crate::notes::handlers::create_note(store.as_ref(), note).await
    }

    #[tokio::test]
    async fn find_notes() -> Result<()> {
        let (server, store) = setup().await?;
        seed(&store, "first", 1).await?;
        seed(&store, "second", 1).await?;
        seed(&store, "third", 2).await?;

        let response = server.get("/notes/user/1").await;

        assert_eq!(response.status_code(), 200);
        let notes = response.json::<Vec<NoteDto>>();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.user_id == 1));
        Ok(())
    }

    #[tokio::test]
    async fn find_notes_for_user_without_notes() -> Result<()> {
        let (server, _) = setup().await?;

        let response = server.get("/notes/user/5").await;

        assert_eq!(response.status_code(), 200);
        response.assert_json(&json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn create_note() -> Result<()> {
        let (server, store) = setup().await?;

        let response = server
            .post("/notes")
            .json(&json!({
                "id": 100,
                "title": "A",
                "body": "x",
                "userId": 1
            }))
            .await;

        assert_eq!(response.status_code(), 201);
        let note = response.json::<NoteDto>();
        assert_eq!(note.title, "A");
        assert_eq!(note.body.as_deref(), Some("x"));
        assert_eq!(note.user_id, 1);
        assert_eq!(note.created_on, note.updated_on);
        assert_eq!(response.header("location").to_str().unwrap(), note_location(note.id));
        assert!(store.get(note.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn create_note_without_title() -> Result<()> {
        let (server, _) = setup().await?;

        let response = server
            .post("/notes")
            .json(&json!({ "body": "x", "userId": 1 }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "json_validation");
        Ok(())
    }

    #[tokio::test]
    async fn get_note() -> Result<()> {
        let (server, store) = setup().await?;
        let note = seed(&store, "first", 1).await?;

        let response = server.get(&note_location(note.id)).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<NoteDto>(), note);
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_note() -> Result<()> {
        let (server, _) = setup().await?;

        let response = server.get("/notes/1").expect_failure().await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<ErrorResponse>().error, "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn get_note_with_malformed_id() -> Result<()> {
        let (server, _) = setup().await?;

        let response = server.get("/notes/abc").expect_failure().await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "path_validation");
        Ok(())
    }

    #[tokio::test]
    async fn update_note() -> Result<()> {
        let (server, store) = setup().await?;
        let note = seed(&store, "first", 1).await?;

        let response = server
            .put(&note_location(note.id))
            .json(&json!({
                "id": note.id,
                "title": "B",
                "body": "y",
                "userId": 3
            }))
            .await;

        assert_eq!(response.status_code(), 204);
        assert!(response.text().is_empty());

        let stored = store.get(note.id).await?.unwrap();
        assert_eq!(stored.title, "B");
        assert_eq!(stored.body.as_deref(), Some("y"));
        assert_eq!(stored.user_id, 3);
        assert_eq!(stored.created_on, note.created_on);
        assert!(stored.updated_on >= note.updated_on);
        Ok(())
    }

    #[tokio::test]
    async fn update_note_with_mismatched_id() -> Result<()> {
        let (server, store) = setup().await?;
        let note = seed(&store, "first", 1).await?;

        let response = server
            .put(&note_location(note.id))
            .json(&json!({
                "id": note.id + 1,
                "title": "B",
                "userId": 1
            }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "bad_request");
        assert_eq!(store.get(note.id).await?.unwrap().title, "first");
        Ok(())
    }

    #[tokio::test]
    async fn missing_note_leaves_store_unchanged() -> Result<()> {
        let (server, store) = setup().await?;
        let other = seed(&store, "other", 1).await?;
        let missing = other.id + 1;

        let response = server
            .put(&note_location(missing))
            .json(&json!({ "id": missing, "title": "B", "userId": 1 }))
            .expect_failure()
            .await;
        assert_eq!(response.status_code(), 404);

        let response = server.delete(&note_location(missing)).expect_failure().await;
        assert_eq!(response.status_code(), 404);

        assert_eq!(server.get(&note_location(other.id)).await.json::<NoteDto>(), other);
        server.get("/notes/user/1").await.assert_json(&vec![other]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_note() -> Result<()> {
        let (server, store) = setup().await?;
        let note = seed(&store, "first", 1).await?;

        let response = server.delete(&note_location(note.id)).await;

        assert_eq!(response.status_code(), 204);
        assert!(store.get(note.id).await?.is_none());

        let response = server.delete(&note_location(note.id)).expect_failure().await;
        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn note_lifecycle() -> Result<()> {
        let (server, _) = setup().await?;

        let response = server
            .post("/notes")
            .json(&json!({ "title": "A", "body": "x", "userId": 1 }))
            .await;
        assert_eq!(response.status_code(), 201);
        let created = response.json::<NoteDto>();
        let location = note_location(created.id);

        let fetched = server.get(&location).await.json::<NoteDto>();
        assert_eq!((fetched.title.as_str(), fetched.body.as_deref(), fetched.user_id), ("A", Some("x"), 1));

        let response = server
            .put(&location)
            .json(&json!({ "id": created.id, "title": "B", "body": "y", "userId": 1 }))
            .await;
        assert_eq!(response.status_code(), 204);

        let fetched = server.get(&location).await.json::<NoteDto>();
        assert_eq!((fetched.title.as_str(), fetched.body.as_deref()), ("B", Some("y")));
        assert_eq!(fetched.created_on, created.created_on);

        assert_eq!(server.delete(&location).await.status_code(), 204);
        assert_eq!(server.get(&location).expect_failure().await.status_code(), 404);
        Ok(())
    }
}
