use crate::contracts::time_entry::TimeEntryResource;
use crate::shared::infrastructure::http::error::ErrorBody;
use crate::tests::fixtures::state::{authorized, make_test_state, seed_project, test_app};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn post(app: &Router, path: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            authorized(Request::post(path))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn starts_refuses_a_second_start_and_stops() {
    let (state, repository) = make_test_state();
    seed_project(&repository, "acme").await;
    let app = test_app(state);

    let started = post(&app, "/projects/acme/start", r#"{"comment":"standup"}"#).await;
    assert_eq!(started.status(), StatusCode::CREATED);
    let started: TimeEntryResource = json(started).await;
    assert!(started.is_open());
    assert_eq!(started.project_name, "acme");

    let again = post(&app, "/projects/acme/start", "{}").await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = json(again).await;
    assert!(error.message.contains("already started"), "{}", error.message);

    let stopped = post(&app, "/projects/acme/stop", "{}").await;
    assert_eq!(stopped.status(), StatusCode::OK);
    let stopped: TimeEntryResource = json(stopped).await;
    assert_eq!(stopped.id, started.id);
    assert!(stopped.end.is_some());
    assert_eq!(stopped.comment, "standup");

    let nothing_open = post(&app, "/projects/acme/stop", "{}").await;
    assert_eq!(nothing_open.status(), StatusCode::BAD_REQUEST);

    let listed = app
        .clone()
        .oneshot(
            authorized(Request::get("/entries"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed: Vec<TimeEntryResource> = json(listed).await;
    assert_eq!(listed, [stopped]);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let (state, _) = make_test_state();

    let response = test_app(state)
        .oneshot(Request::get("/self").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));
}
