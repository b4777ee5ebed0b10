#[cfg(test)]
mod tests {
    use alumnitrack::test_utils::{TestConfigBuilder, TestContext};
    use anyhow::Result;
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let response = ctx
                .app
                .clone()
                .oneshot(
                    axum::http::Request::builder()
                        .uri("/api/health")
                        .body(axum::body::Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["status"], "ok");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_json_bodies_use_error_envelope() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let cases = [
                (Some("application/json"), r#"{"email": "admin@example.com", "passw"#),
                (Some("application/json"), r#"{"email": 42, "password": "secret"}"#),
                (None, r#"{"email": "admin@example.com", "password": "secret"}"#),
            ];

            for (content_type, body) in cases {
                let mut request = axum::http::Request::builder().method("POST").uri("/api/auth/login");
                if let Some(content_type) = content_type {
                    request = request.header("Content-Type", content_type);
                }

                let response = ctx
                    .app
                    .clone()
                    .oneshot(request.body(axum::body::Body::from(body)).unwrap())
                    .await
                    .unwrap();

                assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
                let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
                let json: serde_json::Value = serde_json::from_slice(&bytes)?;
                assert_eq!(json["code"], "INVALID_REQUEST_BODY");
                assert_eq!(json["status"], 400);
                assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
            }
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_admin_signup_and_login() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;

            let response = auth_helper
                .request(
                    "POST",
                    "/api/auth/admin/login",
                    Some(json!({ "email": admin.email.to_uppercase(), "password": admin.password })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.body["message"], "Login successful");
            assert_eq!(response.body["user"]["email"], admin.email.as_str());
            assert!(response.body["user"].get("passwords").is_none());
            assert!(response.body["user"].get("password_hash").is_none());

            let me = auth_helper
                .make_authenticated_request("GET", "/api/auth/me", None, &admin.token)
                .await;
            assert_eq!(me.status, StatusCode::OK);
            assert_eq!(me.body["role"], "admin");
            assert_eq!(me.body["email"], admin.email.as_str());
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_admin_wrong_password_is_unauthorized() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;

            let response = auth_helper
                .request(
                    "POST",
                    "/api/auth/admin/login",
                    Some(json!({ "email": admin.email, "password": "not-the-password" })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);
            assert_eq!(response.body["error"], "Invalid credentials.");

            let response = auth_helper
                .request(
                    "POST",
                    "/api/auth/admin/login",
                    Some(json!({ "email": format!("{}_nobody@example.com", ctx.marker()), "password": "x" })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);

            let response = auth_helper
                .request("POST", "/api/auth/admin/login", Some(json!({ "email": admin.email })), None)
                .await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_admin_signup_validation() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;

            let response = auth_helper
                .request(
                    "POST",
                    "/api/auth/admin/signup",
                    Some(json!({ "firstname": "No", "email": "x@example.com", "password": "pw" })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["error"], "Missing required fields");

            let response = auth_helper
                .request(
                    "POST",
                    "/api/auth/admin/signup",
                    Some(json!({
                        "firstname": "Dup",
                        "lastname": "Licate",
                        "email": admin.email,
                        "password": "pw"
                    })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::CONFLICT);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_admin_signup_can_be_disabled() {
        let ctx = TestContext::with_config(TestConfigBuilder::default().with_admin_signup(false)).await;

        let result: Result<()> = async {
            let response = ctx
                .auth_helper()
                .request(
                    "POST",
                    "/api/auth/admin/signup",
                    Some(json!({
                        "firstname": "Ana",
                        "lastname": "Lim",
                        "email": format!("{}_closed@example.com", ctx.marker()),
                        "password": "pw"
                    })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::FORBIDDEN);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_student_signup_and_login() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let student = auth_helper.create_student().await;

            assert!(student.student.user_account);
            assert_eq!(student.student.user_email.as_deref(), Some(student.email.as_str()));
            assert_eq!(student.student.field_of_work.as_deref(), Some("IT"));
            assert_eq!(student.student.experience, Some(2));

            let me = auth_helper
                .make_authenticated_request("GET", "/api/auth/me", None, &student.token)
                .await;
            assert_eq!(me.status, StatusCode::OK);
            assert_eq!(me.body["role"], "student");
            assert_eq!(me.body["id"], student.id());
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_student_signup_requires_matching_record() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let record = auth_helper.create_student_record().await;
            let email = format!("{}@example.com", record.firstname);

            let mut body = auth_helper.signup_body(&record, &email, "pw123456");
            body["year_graduated"] = json!("1990");
            let response = auth_helper.request("POST", "/api/auth/signup", Some(body), None).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["error"], "Verification failed: Student not found.");

            let mut body = auth_helper.signup_body(&record, &email, "pw123456");
            body["password"] = json!(null);
            let response = auth_helper.request("POST", "/api/auth/signup", Some(body), None).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["error"], "All required fields must be filled.");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_student_cannot_sign_up_twice() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let record = auth_helper.create_student_record().await;
            let email = format!("{}@example.com", record.firstname);
            let body = auth_helper.signup_body(&record, &email, "pw123456");

            let first = auth_helper.request("POST", "/api/auth/signup", Some(body.clone()), None).await;
            assert_eq!(first.status, StatusCode::OK);
            assert_eq!(first.body["message"], "Account created successfully!");

            let second = auth_helper.request("POST", "/api/auth/signup", Some(body), None).await;
            assert_eq!(second.status, StatusCode::BAD_REQUEST);
            assert_eq!(second.body["error"], "Account already exists.");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_student_email_already_taken() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let existing = auth_helper.create_student().await;
            let record = auth_helper.create_student_record().await;

            let body = auth_helper.signup_body(&record, &existing.email, "pw123456");
            let response = auth_helper.request("POST", "/api/auth/signup", Some(body), None).await;
            assert_eq!(response.status, StatusCode::CONFLICT);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_student_wrong_password_is_unauthorized() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let student = auth_helper.create_student().await;

            let response = auth_helper
                .request(
                    "POST",
                    "/api/auth/login",
                    Some(json!({ "email": student.email, "password": "wrong" })),
                    None,
                )
                .await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);
            assert_eq!(response.body["error"], "Invalid credentials.");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_protected_routes_reject_missing_and_bad_tokens() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();

            let response = auth_helper.request("GET", "/api/auth/me", None, None).await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);
            assert_eq!(response.body["error"], "Access denied. No token provided.");

            let response = auth_helper
                .make_authenticated_request("GET", "/api/auth/me", None, "not.a.token")
                .await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);
            assert_eq!(response.body["error"], "Invalid token");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }
}
