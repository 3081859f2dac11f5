//! Shared router harness: a migrated in-memory database behind the full app.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use dataguard_api::{AppState, create_router};
use dataguard_core::activity::ComplianceWeights;
use dataguard_db::migration::Migrator;
use dataguard_shared::{JwtConfig, JwtService};

/// The application plus a workspace to act in.
pub struct TestApp {
    pub router: Router,
    pub jwt: Arc<JwtService>,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
}

impl TestApp {
    /// Builds the router over a fresh, migrated database.
    pub async fn spawn() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "router-test-secret-with-enough-length".to_string(),
            access_token_expires_minutes: 15,
        }));

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::clone(&jwt),
            compliance_weights: ComplianceWeights::default(),
        };

        Self {
            router: create_router(state),
            jwt,
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
        }
    }

    /// A token for this app's workspace with the given role.
    pub fn token(&self, role: &str) -> String {
        self.jwt
            .issue_token(self.user_id, self.tenant_id, self.workspace_id, role)
            .expect("Failed to issue token")
    }

    /// Sends a request and returns the status with the decoded JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };
        (status, json)
    }

    /// Sends a request as a workspace editor.
    pub async fn as_editor(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.token("editor");
        self.send(method, uri, Some(&token), body).await
    }
}

/// The `id` field of a created record.
pub fn id_of(body: &Value) -> String {
    body["id"]
        .as_str()
        .expect("Response has no id")
        .to_string()
}
