use crate::contracts::time_entry::TimeEntryResource;
use crate::modules::identity::core::user::User;
use crate::modules::time_entries::use_cases::update_time_entry::handler::UpdateTimeEntry;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shared::infrastructure::http::json_body::JsonBody;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((project_name, entry_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<TimeEntryResource>,
) -> Result<Json<TimeEntryResource>, ApiError> {
    let command = UpdateTimeEntry {
        id: body.id,
        entry_type: body.entry_type,
        start: body.start,
        end: body.end,
        breaks: body.breaks,
        comment: body.comment,
    };
    let entry = state
        .update_time_entry
        .handle(&user.id, &project_name, &entry_id, command)
        .await?;
    Ok(Json(TimeEntryResource::from_entry(&entry, &project_name)))
}

#[cfg(test)]
mod update_time_entry_http_inbound_tests {
    use crate::contracts::time_entry::TimeEntryResource;
    use crate::tests::fixtures::state::{
        authorized, make_test_state, seed_entry, seed_project, test_app,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    fn put(path: &str, body: String) -> Request<Body> {
        authorized(Request::put(path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_the_updated_entry() {
        let (state, repository) = make_test_state();
        let project = seed_project(&repository, "acme").await;
        let entry = seed_entry(&repository, &project).await;

        let response = test_app(state)
            .oneshot(put(
                &format!("/projects/acme/entries/{}", entry.id),
                format!(r#"{{"id":"{}","type":"work","comment":"edited"}}"#, entry.id),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let updated: TimeEntryResource = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(updated.comment, "edited");
        assert_eq!(updated.project_name, "acme");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_400_when_ids_disagree() {
        let (state, repository) = make_test_state();
        let project = seed_project(&repository, "acme").await;
        let entry = seed_entry(&repository, &project).await;

        let response = test_app(state)
            .oneshot(put(
                &format!("/projects/acme/entries/{}", entry.id),
                r#"{"id":"something-else"}"#.to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &bytes[..],
            br#"{"message":"entry ID in URL does not match entry ID in body"}"#
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_404_for_unknown_entries() {
        let (state, repository) = make_test_state();
        seed_project(&repository, "acme").await;

        let response = test_app(state)
            .oneshot(put("/projects/acme/entries/missing", "{}".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
