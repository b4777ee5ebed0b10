//! Test harness shared by unit and integration tests.
//!
//! A single MySQL container is started per test binary and reused by every
//! `TestContext`. Each context gets a short marker string; the helpers
//! prefix the rows they create with it so `cleanup_database` only removes
//! this context's data.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;
use tower::util::ServiceExt;

use crate::{
    config::Config,
    db::Database,
    models::{NewStudentRecord, StudentResponse},
    AppState,
};

/// Shared test database manager that uses a single MySQL container
/// across all tests in a binary
static SHARED_DB_MANAGER: std::sync::LazyLock<std::sync::Mutex<Option<SharedDatabaseManager>>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(None));

struct SharedDatabaseManager {
    container: Arc<ContainerAsync<Mysql>>,
    database_url: String,
    active_contexts: HashMap<String, u32>,
}

impl SharedDatabaseManager {
    async fn get_or_create() -> Result<SharedDatabaseManager, Box<dyn std::error::Error + Send + Sync>> {
        let container = Mysql::default()
            .start()
            .await
            .map_err(|e| format!("Failed to start shared mysql container: {}", e))?;

        let port = container
            .get_host_port_ipv4(3306)
            .await
            .map_err(|e| format!("Failed to get mysql port: {}", e))?;

        let database_url = format!("mysql://root@127.0.0.1:{}/test", port);

        // MySQL accepts connections a little after the container reports ready
        let mut retries = 0;
        const MAX_RETRIES: u32 = 60;
        loop {
            match Database::new_with_pool_config(&database_url, 5, 1).await {
                Ok(db) => match db.migrate().await {
                    Ok(()) => {
                        db.close().await;
                        break;
                    }
                    Err(e) if retries < MAX_RETRIES => {
                        eprintln!("Migration failed: {}, retrying...", e);
                    }
                    Err(e) => return Err(format!("Migrations failed: {}", e).into()),
                },
                Err(e) if retries < MAX_RETRIES => {
                    eprintln!("Database not ready: {}, retrying...", e);
                }
                Err(e) => {
                    return Err(format!(
                        "Failed to connect to shared database after {} retries: {}",
                        MAX_RETRIES, e
                    )
                    .into())
                }
            }
            retries += 1;
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }

        Ok(SharedDatabaseManager {
            container: Arc::new(container),
            database_url,
            active_contexts: HashMap::new(),
        })
    }
}

/// Full application wired to the shared test database
pub struct TestContext {
    pub app: Router,
    pub container: Arc<ContainerAsync<Mysql>>,
    pub state: Arc<AppState>,
    marker: String,
    cleanup_called: Arc<std::sync::atomic::AtomicBool>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if !self.cleanup_called.load(std::sync::atomic::Ordering::Acquire) {
            self.cleanup_called.store(true, std::sync::atomic::Ordering::Release);

            let state = Arc::clone(&self.state);
            std::thread::spawn(move || {
                if let Ok(rt) = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    rt.block_on(async {
                        state.db.close().await;
                    });
                }
            });
        }

        if let Ok(mut manager_guard) = SHARED_DB_MANAGER.lock() {
            if let Some(manager) = manager_guard.as_mut() {
                if let Some(count) = manager.active_contexts.get_mut(&self.marker) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        manager.active_contexts.remove(&self.marker);
                    }
                }
            }
        }
    }
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(TestConfigBuilder::default()).await
    }

    pub async fn with_config(config_builder: TestConfigBuilder) -> Self {
        let marker = new_marker();

        let (container, database_url) = {
            let mut manager_guard = SHARED_DB_MANAGER.lock().unwrap();
            match manager_guard.as_mut() {
                Some(manager) => {
                    *manager.active_contexts.entry(marker.clone()).or_insert(0) += 1;
                    (manager.container.clone(), manager.database_url.clone())
                }
                None => {
                    drop(manager_guard);
                    let new_manager = SharedDatabaseManager::get_or_create()
                        .await
                        .expect("Failed to create shared database manager");

                    let mut manager_guard = SHARED_DB_MANAGER.lock().unwrap();
                    // Another test may have won the race while the container started
                    let manager = manager_guard.get_or_insert(new_manager);
                    *manager.active_contexts.entry(marker.clone()).or_insert(0) += 1;
                    (manager.container.clone(), manager.database_url.clone())
                }
            }
        };

        let db = Database::new_with_pool_config(&database_url, 10, 1)
            .await
            .expect("Failed to create database connection");

        let config = config_builder.build(database_url);
        let state = Arc::new(AppState::new(db, config));
        let app = crate::build_router(state.clone());

        Self {
            app,
            container,
            state,
            marker,
            cleanup_called: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Prefix carried by every row this context creates
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Unique value scoped to this context, e.g. a first name or question
    pub fn unique(&self, label: &str) -> String {
        format!("{}_{}_{}", self.marker, label, &uuid::Uuid::new_v4().simple().to_string()[..8])
    }

    pub fn auth_helper(&self) -> TestAuthHelper {
        TestAuthHelper {
            app: self.app.clone(),
            db: self.state.db.clone(),
            marker: self.marker.clone(),
        }
    }

    /// Deletes the rows created under this context's marker. Reservations
    /// and survey answers go with their students through cascading keys.
    pub async fn cleanup_database(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let pattern = format!("{}%", self.marker);
        let cleanup_queries = [
            "DELETE FROM students WHERE firstname LIKE ?",
            "DELETE FROM surveys_creation WHERE question LIKE ?",
            "DELETE FROM admin_info WHERE email LIKE ?",
        ];

        for query in cleanup_queries {
            if let Err(e) = sqlx::query(query)
                .bind(&pattern)
                .execute(self.state.db.get_pool())
                .await
            {
                eprintln!("Warning: Failed to execute cleanup query '{}': {}", query, e);
            }
        }

        Ok(())
    }

    pub async fn close_connections(&self) {
        self.state.db.close().await;
    }

    pub async fn cleanup_and_close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.cleanup_called.store(true, std::sync::atomic::Ordering::Release);
        self.cleanup_database().await?;
        self.close_connections().await;
        Ok(())
    }
}

fn new_marker() -> String {
    format!("t{}", &uuid::Uuid::new_v4().simple().to_string()[..10])
}

/// Builder for the `Config` a test context runs with
pub struct TestConfigBuilder {
    jwt_secret: String,
    jwt_expiry_hours: i64,
    max_csv_size_mb: u64,
    allow_admin_signup: bool,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 1,
            max_csv_size_mb: 10,
            allow_admin_signup: true,
        }
    }
}

impl TestConfigBuilder {
    pub fn with_max_csv_size_mb(mut self, mb: u64) -> Self {
        self.max_csv_size_mb = mb;
        self
    }

    pub fn with_admin_signup(mut self, allowed: bool) -> Self {
        self.allow_admin_signup = allowed;
        self
    }

    fn build(self, database_url: String) -> Config {
        Config {
            database_url,
            server_address: "127.0.0.1:0".to_string(),
            jwt_secret: self.jwt_secret,
            jwt_expiry_hours: self.jwt_expiry_hours,
            max_csv_size_mb: self.max_csv_size_mb,
            allow_admin_signup: self.allow_admin_signup,
            admin_email: None,
            admin_password: None,
        }
    }
}

/// Response status plus parsed JSON body (Null for empty bodies)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Creates accounts through the public API and drives requests with them
pub struct TestAuthHelper {
    app: Router,
    db: Database,
    marker: String,
}

impl TestAuthHelper {
    fn unique_suffix(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
    }

    /// Registers an admin through `/api/auth/admin/signup` and logs in
    pub async fn create_admin_user(&self) -> TestAdmin {
        let email = format!("{}_admin_{}@example.com", self.marker, self.unique_suffix());
        let password = "adminpass123";

        let response = self
            .request(
                "POST",
                "/api/auth/admin/signup",
                Some(json!({
                    "firstname": "Test",
                    "lastname": "Admin",
                    "email": email,
                    "password": password
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "admin signup failed: {}", response.body);

        let token = self.login_admin(&email, password).await;
        TestAdmin { email, password: password.to_string(), token }
    }

    pub async fn login_admin(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/admin/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "admin login failed: {}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Inserts an alumni record as a CSV import would, without an account
    pub async fn create_student_record(&self) -> NewStudentRecord {
        let record = NewStudentRecord {
            firstname: format!("{}_{}", self.marker, self.unique_suffix()),
            lastname: "Alumnus".to_string(),
            middlename: None,
            birthdate: chrono::NaiveDate::from_ymd_opt(1999, 4, 12),
            department: Some("COT".to_string()),
            year_graduated: Some("2021".to_string()),
            ..Default::default()
        };
        self.db
            .insert_students_batch(std::slice::from_ref(&record))
            .await
            .expect("Failed to insert student record");
        record
    }

    /// Signup body matching `record`
    pub fn signup_body(&self, record: &NewStudentRecord, email: &str, password: &str) -> Value {
        json!({
            "firstname": record.firstname,
            "middlename": record.middlename,
            "lastname": record.lastname,
            "email": email,
            "birthdate": record.birthdate.map(|d| d.format("%Y-%m-%d").to_string()),
            "year_graduated": record.year_graduated,
            "department": record.department,
            "password": password,
            "currently_working": "Yes",
            "field_of_work": "IT",
            "experience": 2,
            "company_name": "Acme"
        })
    }

    /// Imports a record, activates its account and logs in
    pub async fn create_student(&self) -> TestStudent {
        let record = self.create_student_record().await;
        let email = format!("{}@example.com", record.firstname);
        let password = "studentpass123";

        let response = self
            .request("POST", "/api/auth/signup", Some(self.signup_body(&record, &email, password)), None)
            .await;
        assert_eq!(response.status, StatusCode::OK, "student signup failed: {}", response.body);

        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "student login failed: {}", response.body);

        let student: StudentResponse = serde_json::from_value(response.body["student"].clone())
            .expect("login response should carry the student");
        let token = response.body["token"].as_str().unwrap().to_string();

        TestStudent { student, email, password: password.to_string(), token }
    }

    pub async fn make_authenticated_request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: &str,
    ) -> TestResponse {
        self.request(method, uri, body, Some(token)).await
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request_body = match body {
            Some(body) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&body).unwrap())
            }
            None => Body::empty(),
        };

        send(&self.app, builder.body(request_body).unwrap()).await
    }

    /// Posts `csv` as a multipart file field
    pub async fn upload_csv(&self, uri: &str, field: &str, csv: &str, token: &str) -> TestResponse {
        let (content_type, body) = multipart_body(field, "alumni.csv", csv.as_bytes());
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();

        send(&self.app, request).await
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse { status, body }
}

/// Hand-built `multipart/form-data` body with a single file field
pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = format!("----alumnitrack{}", uuid::Uuid::new_v4().simple());
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

pub struct TestAdmin {
    pub email: String,
    pub password: String,
    pub token: String,
}

pub struct TestStudent {
    pub student: StudentResponse,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestStudent {
    pub fn id(&self) -> i64 {
        self.student.id_number
    }
}
