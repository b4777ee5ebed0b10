#[cfg(test)]
mod tests {
    use crate::errors::{ApiError, AuthError, ImportError, ReservationError, SurveyError};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::Value;

    async fn render(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = render(AuthError::MissingToken.into_response()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Access denied. No token provided.");
        assert_eq!(body["code"], "AUTH_MISSING_TOKEN");
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let (status, body) =
            render(ReservationError::internal("connection refused on 10.0.0.5").into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DB error");

        let (_, body) = render(AuthError::internal("bcrypt cost error").into_response()).await;
        assert!(!body["error"].as_str().unwrap().contains("bcrypt"));

        let (status, body) = render(ApiError::internal_server_error("pool timed out").into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_auth_status_codes() {
        let cases = [
            (AuthError::InvalidToken.into_response(), StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials.into_response(), StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden { role: "student".into() }.into_response(), StatusCode::FORBIDDEN),
            (AuthError::SignupDisabled.into_response(), StatusCode::FORBIDDEN),
            (AuthError::DuplicateEmail { email: "a@b.c".into() }.into_response(), StatusCode::CONFLICT),
            (AuthError::VerificationFailed.into_response(), StatusCode::BAD_REQUEST),
            (AuthError::AccountExists { id_number: 3 }.into_response(), StatusCode::BAD_REQUEST),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_survey_messages() {
        let (status, body) = render(SurveyError::TooManyQuestions { count: 11 }.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You can only add up to 10 questions.");

        let (_, body) = render(SurveyError::UnknownQuestions { ids: vec![4, 9] }.into_response()).await;
        assert_eq!(body["error"], "Unknown question ids: 4, 9");
    }

    #[tokio::test]
    async fn test_import_status_codes() {
        let (status, body) = render(ImportError::NoFile.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file uploaded!");

        let (status, _) = render(ImportError::TooLarge { limit: 10 }.into_response()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (status, body) =
            render(ImportError::InsertFailed { message: "deadlock".into() }.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to insert CSV data");
    }
}
