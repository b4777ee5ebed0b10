#[cfg(test)]
mod tests {
    use alumnitrack::models::{ActiveSurveyQuestion, SurveyQuestion};
    use alumnitrack::test_utils::TestContext;
    use anyhow::Result;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_single_and_batch_questions() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;
            let single = ctx.unique("single");

            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/create-survey",
                    Some(json!({ "question": single, "category": "Employment" })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED);
            assert_eq!(response.body["count"], 1);

            let batch = [ctx.unique("b1"), ctx.unique("b2")];
            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/create-survey",
                    Some(json!({ "questions": [batch[0], "   ", batch[1]] })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED);
            assert_eq!(response.body["count"], 2);

            let response = auth_helper
                .make_authenticated_request("GET", "/api/dashboard/surveys", None, &admin.token)
                .await;
            assert_eq!(response.status, StatusCode::OK);
            let bank: Vec<SurveyQuestion> = serde_json::from_value(response.body)?;
            let mine: Vec<&SurveyQuestion> =
                bank.iter().filter(|q| q.question.starts_with(ctx.marker())).collect();
            assert_eq!(mine.len(), 3);
            assert_eq!(mine[0].question, single);
            assert_eq!(mine[0].category.as_deref(), Some("Employment"));
            assert_eq!(mine[1].question, batch[0]);
            assert_eq!(mine[2].question, batch[1]);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_create_survey_validation() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;
            let eleven: Vec<String> = (0..11).map(|i| ctx.unique(&format!("q{}", i))).collect();

            let cases = [
                (json!({ "questions": [] }), "Questions array is empty."),
                (json!({ "questions": eleven }), "You can only add up to 10 questions."),
                (json!({ "questions": ["", "  "] }), "All provided questions are empty."),
                (json!({ "question": "   " }), "Question is required"),
            ];

            for (body, message) in cases {
                let response = auth_helper
                    .make_authenticated_request("POST", "/api/dashboard/create-survey", Some(body), &admin.token)
                    .await;
                assert_eq!(response.status, StatusCode::BAD_REQUEST);
                assert_eq!(response.body["error"], message);
            }
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    // The active survey is global, so deployment is exercised in one test
    #[tokio::test]
    async fn test_deploy_and_read_active_survey() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;
            let questions: Vec<String> = (0..3).map(|i| ctx.unique(&format!("deploy{}", i))).collect();

            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/create-survey",
                    Some(json!({ "questions": questions })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED);

            let bank: Vec<SurveyQuestion> = serde_json::from_value(
                auth_helper
                    .make_authenticated_request("GET", "/api/dashboard/surveys", None, &admin.token)
                    .await
                    .body,
            )?;
            let ids: Vec<i64> = questions
                .iter()
                .map(|q| bank.iter().find(|b| &b.question == q).unwrap().id)
                .collect();

            // Deploy in reverse order with a duplicate
            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/deploy-survey",
                    Some(json!({ "questionIds": [ids[2], ids[0], ids[2]] })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.body["message"], "Survey deployed successfully!");

            // Public, and reachable under both prefixes
            for path in ["/api/dashboard/active-survey", "/admin/active-survey"] {
                let response = auth_helper.request("GET", path, None, None).await;
                assert_eq!(response.status, StatusCode::OK);
                let active: Vec<ActiveSurveyQuestion> = serde_json::from_value(response.body)?;
                assert_eq!(
                    active,
                    vec![
                        ActiveSurveyQuestion { id: ids[2], question: questions[2].clone() },
                        ActiveSurveyQuestion { id: ids[0], question: questions[0].clone() },
                    ]
                );
            }

            // Redeploying replaces the whole set; ids may arrive as strings
            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/admin/deploy-survey",
                    Some(json!({ "questionIds": [ids[1].to_string()] })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::OK);

            let active: Vec<ActiveSurveyQuestion> =
                serde_json::from_value(auth_helper.request("GET", "/admin/active-survey", None, None).await.body)?;
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].id, ids[1]);

            // Unknown ids leave the deployed survey untouched
            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/deploy-survey",
                    Some(json!({ "questionIds": [ids[0], 999999999] })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["error"], "Unknown question ids: 999999999");

            let active: Vec<ActiveSurveyQuestion> =
                serde_json::from_value(auth_helper.request("GET", "/admin/active-survey", None, None).await.body)?;
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].id, ids[1]);

            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/deploy-survey",
                    Some(json!({ "questionIds": [] })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["error"], "Please select at least one question.");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_survey_bodies_of_the_wrong_shape() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();
            let admin = auth_helper.create_admin_user().await;

            let cases = [
                ("/api/dashboard/deploy-survey", json!({ "questionIds": "abc" }), "Please select at least one question."),
                ("/admin/deploy-survey", json!({ "questionIds": { "id": 1 } }), "Please select at least one question."),
                ("/api/dashboard/deploy-survey", json!({ "questionIds": ["abc"] }), "Invalid question id: abc"),
                ("/api/dashboard/create-survey", json!({ "questions": "q" }), "Question is required"),
            ];

            for (path, body, message) in cases {
                let response = auth_helper
                    .make_authenticated_request("POST", path, Some(body), &admin.token)
                    .await;
                assert_eq!(response.status, StatusCode::BAD_REQUEST);
                assert_eq!(response.body["error"], message);
                assert_eq!(response.body["status"], 400);
            }

            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/api/dashboard/create-survey",
                    Some(json!({ "question": ["not", "text"] })),
                    &admin.token,
                )
                .await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body["code"], "INVALID_REQUEST_BODY");
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }
        result.unwrap();
    }

    #[tokio::test]
    async fn test_survey_management_requires_admin() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let auth_helper = ctx.auth_helper();

            let response = auth_helper
                .request("POST", "/api/dashboard/create-survey", Some(json!({ "question": "Q?" })), None)
                .await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);

            let student = auth_helper.create_student().await;
            let response = auth_helper
                .make_authenticated_request(
                    "POST",
                    "/admin/deploy-survey",
                    Some(json!({ "questionIds": [1] })),
                    &student.token,
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
}
