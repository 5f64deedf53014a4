//! Account flows: login, signup, password reset and invitation acceptance.

use std::sync::Arc;

use domain::{entity::Acknowledgement, record::RecordId};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

use super::{
    graphql::{GENERIC_FAILURE, GraphQlClientError, GraphQlRequest, GraphQlTransport, take_root},
    session::{SessionError, SessionStore},
};

const USER_SELECTION: &str = "accessToken user { id email firstName lastName role companyId }";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Client(#[from] GraphQlClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: RecordId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvitationAcceptance {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct AuthService {
    transport: Arc<dyn GraphQlTransport>,
    session: SessionStore,
}

impl AuthService {
    pub fn new(transport: Arc<dyn GraphQlTransport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Rejected(
                "Email and password are required".to_string(),
            ));
        }
        let payload: AuthPayload = self
            .call(
                "Login",
                &format!(
                    "mutation Login($input: LoginInput!) {{ login(input: $input) {{ {USER_SELECTION} }} }}"
                ),
                "login",
                json!({ "input": { "email": email.trim(), "password": password } }),
            )
            .await?;
        self.start_session(payload)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthPayload, AuthError> {
        let payload: AuthPayload = self
            .call(
                "Signup",
                &format!(
                    "mutation Signup($input: SignupInput!) {{ signup(input: $input) {{ {USER_SELECTION} }} }}"
                ),
                "signup",
                json!({ "input": request }),
            )
            .await?;
        self.start_session(payload)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Acknowledgement, AuthError> {
        let ack = self
            .call(
                "ForgotPassword",
                "mutation ForgotPassword($email: String!) { forgotPassword(email: $email) { success message } }",
                "forgotPassword",
                json!({ "email": email.trim() }),
            )
            .await?;
        Self::accepted(ack)
    }

    /// `token` is the one-time token from the reset link.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<Acknowledgement, AuthError> {
        let ack = self
            .call(
                "ResetPassword",
                "mutation ResetPassword($input: ResetPasswordInput!) { resetPassword(input: $input) { success message } }",
                "resetPassword",
                json!({ "input": { "token": token, "new_password": password } }),
            )
            .await?;
        Self::accepted(ack)
    }

    pub async fn accept_invitation(
        &self,
        token: &str,
        acceptance: &InvitationAcceptance,
    ) -> Result<AuthPayload, AuthError> {
        let mut input = serde_json::to_value(acceptance)
            .map_err(|e| GraphQlClientError::Serde(e.to_string()))?;
        if let Value::Object(fields) = &mut input {
            fields.insert("token".to_string(), json!(token));
        }
        let payload: AuthPayload = self
            .call(
                "AcceptInvitation",
                &format!(
                    "mutation AcceptInvitation($input: AcceptInvitationInput!) {{ acceptInvitation(input: $input) {{ {USER_SELECTION} }} }}"
                ),
                "acceptInvitation",
                json!({ "input": input }),
            )
            .await?;
        self.start_session(payload)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear()?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        document: &str,
        root: &str,
        variables: Value,
    ) -> Result<T, AuthError> {
        let request = GraphQlRequest::new(operation, document).with_variables(variables);
        let data = self.transport.execute(request).await.inspect_err(|e| {
            warn!(operation, error = %e, "Auth request failed");
        })?;
        let value = take_root(data, root)?;
        if value.is_null() {
            return Err(GraphQlClientError::MissingData(root.to_string()).into());
        }
        serde_json::from_value(value)
            .map_err(|e| AuthError::Client(GraphQlClientError::Serde(e.to_string())))
    }

    fn start_session(&self, payload: AuthPayload) -> Result<AuthPayload, AuthError> {
        if payload.access_token.is_empty() {
            return Err(AuthError::Rejected(GENERIC_FAILURE.to_string()));
        }
        self.session.save_token(&payload.access_token)?;
        info!(user = %payload.user.id, "Signed in");
        Ok(payload)
    }

    fn accepted(ack: Acknowledgement) -> Result<Acknowledgement, AuthError> {
        if ack.success {
            Ok(ack)
        } else {
            Err(AuthError::Rejected(
                ack.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::services::{graphql::GraphQlError, test_support::ScriptedTransport};

    fn service(dir: &TempDir, transport: &Arc<ScriptedTransport>) -> AuthService {
        AuthService::new(
            transport.clone(),
            SessionStore::new(dir.path().join("session.json")),
        )
    }

    fn payload(root: &str) -> Value {
        json!({ root: {
            "accessToken": "jwt-1",
            "user": {"id": 7, "email": "ops@acme.io", "firstName": "Ada", "role": "admin"}
        }})
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        transport.respond("Login", payload("login"));
        let auth = service(&dir, &transport);

        let signed_in = auth.login(" ops@acme.io ", "hunter2").await.unwrap();
        assert_eq!(signed_in.user.id, RecordId::new("7"));
        assert_eq!(auth.session().load_token().unwrap().as_deref(), Some("jwt-1"));

        let sent = transport.requests_for("Login");
        assert_eq!(sent[0].variables["input"]["email"], json!("ops@acme.io"));

        auth.logout().unwrap();
        assert_eq!(auth.session().load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_logged_out() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        transport.fail(
            "Login",
            GraphQlClientError::GraphQl(vec![GraphQlError::new("Invalid credentials")]),
        );
        let auth = service(&dir, &transport);

        let err = auth.login("ops@acme.io", "nope").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(auth.session().load_token().unwrap(), None);

        let err = auth.login("", "").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert_eq!(transport.calls("Login"), 1);
    }

    #[tokio::test]
    async fn test_reset_password_rejection_carries_server_message() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        transport.respond(
            "ResetPassword",
            json!({"resetPassword": {"success": false, "message": "Reset link has expired"}}),
        );
        let auth = service(&dir, &transport);

        let err = auth.reset_password("tok-9", "n3w-pass").await.unwrap_err();
        assert_eq!(err.user_message(), "Reset link has expired");
        let sent = transport.requests_for("ResetPassword");
        assert_eq!(
            sent[0].variables,
            json!({"input": {"token": "tok-9", "new_password": "n3w-pass"}})
        );
    }

    #[tokio::test]
    async fn test_accept_invitation_sends_token_and_signs_in() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        transport.respond("AcceptInvitation", payload("acceptInvitation"));
        let auth = service(&dir, &transport);

        let acceptance = InvitationAcceptance {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "s3cret".to_string(),
        };
        auth.accept_invitation("inv-1", &acceptance).await.unwrap();

        let input = &transport.requests_for("AcceptInvitation")[0].variables["input"];
        assert_eq!(input["token"], json!("inv-1"));
        assert_eq!(input["first_name"], json!("Ada"));
        assert_eq!(auth.session().load_token().unwrap().as_deref(), Some("jwt-1"));
    }

    #[tokio::test]
    async fn test_forgot_password_accepts_boolean_ack() {
        let dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        transport.respond("ForgotPassword", json!({"forgotPassword": true}));
        let auth = service(&dir, &transport);

        assert!(auth.forgot_password("ops@acme.io").await.unwrap().success);
    }
}
