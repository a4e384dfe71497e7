//! HTTP client for the Asana API.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::fields::{PROJECT_FIELDS, TASK_FIELDS};
use crate::types::{
    CreateProjectRequest, CreateTaskRequest, DataBody, DataWrapper, Project, Task,
    UpdateProjectRequest,
};
use crate::Error;

/// Default Asana API base URL.
pub const BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Client for interacting with the Asana API.
#[derive(Debug, Clone)]
pub struct AsanaClient {
    http: reqwest::Client,
    base_url: String,
}

impl AsanaClient {
    /// Create a new client with the given access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(token: &str) -> Result<Self, Error> {
        Self::with_timeout(token, None)
    }

    /// Create a new client with the given access token and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be initialized.
    pub fn with_timeout(token: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|_| Error::InvalidToken)?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Http)?;

        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Returns the base URL for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set a custom base URL (for testing and proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    // ========== Projects ==========

    /// Create a project in a workspace.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, Error> {
        self.post("/projects", &DataBody::new(request)).await
    }

    /// Fetch a project by its GID.
    pub async fn find_project_by_id(&self, gid: &str) -> Result<Project, Error> {
        self.get(
            &format!("/projects/{}", gid),
            &[("opt_fields", PROJECT_FIELDS)],
        )
        .await
    }

    /// Update a project's mutable fields.
    pub async fn update_project(
        &self,
        gid: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project, Error> {
        self.put(&format!("/projects/{}", gid), &DataBody::new(request))
            .await
    }

    /// Delete a project.
    pub async fn delete_project(&self, gid: &str) -> Result<(), Error> {
        self.delete(&format!("/projects/{}", gid)).await
    }

    // ========== Tasks ==========

    /// Create a task in a workspace and/or a set of projects.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, Error> {
        self.post("/tasks", &DataBody::new(request)).await
    }

    /// Fetch a task by its GID.
    pub async fn find_task_by_id(&self, gid: &str) -> Result<Task, Error> {
        self.get(&format!("/tasks/{}", gid), &[("opt_fields", TASK_FIELDS)])
            .await
    }

    /// Delete a task.
    pub async fn delete_task(&self, gid: &str) -> Result<(), Error> {
        self.delete(&format!("/tasks/{}", gid)).await
    }

    // ========== Raw requests ==========

    /// Make a GET request to the API and deserialize the response.
    ///
    /// The `path` should be the API endpoint path without the base URL (e.g., "/users/me").
    /// Query parameters can be passed via the `query` slice.
    pub async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;

        self.handle_response::<DataWrapper<T>>(response)
            .await
            .map(|wrapper| wrapper.data)
    }

    /// Make a POST request to create a resource and deserialize the response.
    ///
    /// The `body` will be serialized as JSON in the request body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.post(&url).json(body).send().await?;

        self.handle_response::<DataWrapper<T>>(response)
            .await
            .map(|wrapper| wrapper.data)
    }

    /// Make a PUT request to update a resource and deserialize the response.
    ///
    /// The `body` will be serialized as JSON in the request body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.put(&url).json(body).send().await?;

        self.handle_response::<DataWrapper<T>>(response)
            .await
            .map(|wrapper| wrapper.data)
    }

    /// Make a DELETE request to remove a resource.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Handle an API response, converting errors as appropriate.
    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(Error::Parse)
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Handle an API response whose body is ignored.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), Error> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Convert an error response to an Error.
    async fn error_from_response(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::NOT_FOUND {
            let message =
                extract_error_message(&body).unwrap_or_else(|| "resource not found".to_string());
            Error::NotFound(message)
        } else {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
            });
            Error::Api { message }
        }
    }
}

/// Extract the error message from an Asana API error response.
fn extract_error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        errors: Vec<ErrorDetail>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.errors.into_iter().next())
        .map(|e| e.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_client() {
        let client = AsanaClient::new("test-token").unwrap();
        assert_eq!(client.base_url(), BASE_URL);
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let result = AsanaClient::new("bad\ntoken");
        assert!(matches!(result, Err(Error::InvalidToken)));
    }

    /// Create a test client pointing at the mock server.
    fn test_client(server: &MockServer) -> AsanaClient {
        AsanaClient::new("test-token")
            .unwrap()
            .with_base_url(&server.uri())
    }

    // ========== project endpoints ==========

    #[tokio::test]
    async fn test_create_project_posts_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({"data": {
                "name": "Launch Plan",
                "color": "dark-blue",
                "layout": "board",
                "workspace": "12345",
                "public": false
            }})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"gid": "1001", "name": "Launch Plan", "color": "dark-blue"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let project = client
            .create_project(&CreateProjectRequest {
                name: "Launch Plan".into(),
                notes: None,
                color: Some("dark-blue".into()),
                layout: "board".into(),
                workspace: "12345".into(),
                public: false,
            })
            .await
            .unwrap();

        assert_eq!(project.gid, "1001");
    }

    #[tokio::test]
    async fn test_find_project_requests_opt_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/1001"))
            .and(query_param("opt_fields", PROJECT_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "gid": "1001",
                    "name": "Launch Plan",
                    "notes": "Q3",
                    "color": null,
                    "workspace": {"gid": "12345"}
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let project = client.find_project_by_id("1001").await.unwrap();

        assert_eq!(project.notes.as_deref(), Some("Q3"));
        assert!(project.color.is_none());
    }

    #[tokio::test]
    async fn test_update_project_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/projects/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .update_project(
                "missing",
                &UpdateProjectRequest {
                    name: "x".into(),
                    notes: String::new(),
                    color: None,
                    public: false,
                },
            )
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_project_success() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/projects/1001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(client.delete_project("1001").await.is_ok());
    }

    // ========== task endpoints ==========

    #[tokio::test]
    async fn test_create_task_posts_numeric_projects() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(body_json(serde_json::json!({"data": {
                "name": "Write brief",
                "projects": [1001, 1002]
            }})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"gid": "77", "name": "Write brief"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let task = client
            .create_task(&CreateTaskRequest {
                name: "Write brief".into(),
                notes: None,
                workspace: None,
                projects: vec![1001, 1002],
            })
            .await
            .unwrap();

        assert_eq!(task.gid, "77");
    }

    #[tokio::test]
    async fn test_find_task_requests_opt_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tasks/77"))
            .and(query_param("opt_fields", TASK_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "gid": "77",
                    "name": "Write brief",
                    "workspace": {"gid": "12345"},
                    "projects": [{"gid": "1001"}]
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let task = client.find_task_by_id("77").await.unwrap();

        assert_eq!(task.projects.len(), 1);
        assert_eq!(task.workspace.unwrap().gid, "12345");
    }

    #[tokio::test]
    async fn test_delete_task_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/tasks/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.delete_task("missing").await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    // ========== error mapping ==========

    #[tokio::test]
    async fn test_get_404_extracts_asana_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "errors": [{"message": "project: Unknown object: 999"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.find_project_by_id("999").await;

        match &result {
            Err(Error::NotFound(msg)) => assert_eq!(msg, "project: Unknown object: 999"),
            _ => panic!("Expected NotFound with Asana message, got {:?}", result),
        }
    }

    #[tokio::test]
    async fn test_get_404_with_malformed_body_falls_back() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/999"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.find_project_by_id("999").await;

        match &result {
            Err(Error::NotFound(msg)) => assert_eq!(msg, "resource not found"),
            _ => panic!("Expected NotFound fallback, got {:?}", result),
        }
    }

    #[tokio::test]
    async fn test_api_error_extracts_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "errors": [{"message": "Not authorized"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let body = serde_json::json!({"data": {}});
        let result: Result<Project, Error> = client.post("/projects", &body).await;

        match result {
            Err(Error::Api { message }) => assert_eq!(message, "Not authorized"),
            _ => panic!("Expected Api error"),
        }
    }

    #[tokio::test]
    async fn test_api_error_fallback_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tasks/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.find_task_by_id("1").await;

        match result {
            Err(Error::Api { message }) => assert!(message.contains("500")),
            _ => panic!("Expected Api error"),
        }
    }

    #[tokio::test]
    async fn test_success_with_unexpected_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tasks/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.find_task_by_id("1").await;

        assert!(matches!(result, Err(Error::Parse(_))));
    }

    // ========== extract_error_message tests ==========

    #[test]
    fn test_extract_error_message_valid() {
        let body = r#"{"errors": [{"message": "Project not found"}]}"#;
        assert_eq!(
            extract_error_message(body),
            Some("Project not found".to_string())
        );
    }

    #[test]
    fn test_extract_error_message_empty_errors() {
        let body = r#"{"errors": []}"#;
        assert_eq!(extract_error_message(body), None);
    }

    #[test]
    fn test_extract_error_message_wrong_structure() {
        let body = r#"{"error": "Something went wrong"}"#;
        assert_eq!(extract_error_message(body), None);
    }
}
