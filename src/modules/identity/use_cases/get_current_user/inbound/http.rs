use crate::contracts::user::UserResource;
use crate::modules::identity::core::user::User;
use axum::{Extension, Json};

pub async fn handle(Extension(user): Extension<User>) -> Json<UserResource> {
    Json(UserResource::from(&user))
}

#[cfg(test)]
mod get_current_user_http_inbound_tests {
    use crate::contracts::user::UserResource;
    use crate::tests::fixtures::state::{authorized, make_test_state, test_app};
    use crate::tests::fixtures::tokens::{TEST_ISSUER, issue_token};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    #[rstest]
    #[tokio::test]
    async fn it_should_return_the_authenticated_user() {
        let (state, _) = make_test_state();

        let response = test_app(state)
            .oneshot(authorized(Request::get("/self")).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let user: UserResource = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(user.identities.len(), 1);
        assert_eq!(user.identities[0].issuer, TEST_ISSUER);
        assert_eq!(user.identities[0].email, "owner@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_resolve_the_same_user_on_every_request() {
        let (state, _) = make_test_state();
        let app = test_app(state);
        let mut ids = Vec::new();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(authorized(Request::get("/self")).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            ids.push(serde_json::from_slice::<UserResource>(&bytes).unwrap().id);
        }

        assert_eq!(ids[0], ids[1]);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic Zm9vOmJhcg==".to_string()))]
    #[case(Some("Bearer not-a-jwt".to_string()))]
    #[case(Some(format!("Bearer {}", issue_token("https://rogue.example.com", "s", "e@example.com"))))]
    #[tokio::test]
    async fn it_should_answer_401_for_bad_credentials(#[case] authorization: Option<String>) {
        let (state, _) = make_test_state();
        let mut request = Request::get("/self");
        if let Some(authorization) = authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }

        let response = test_app(state)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"message":"Authorization needed"}"#);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_answer_500_when_users_cannot_be_resolved() {
        let (state, _) = crate::tests::fixtures::state::make_offline_state();

        let response = test_app(state)
            .oneshot(authorized(Request::get("/self")).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
