use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::http::header;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{roles::Role, session::SessionToken};

/// Identity
///
/// The slice of the authenticated user's profile this layer consumes.
/// Owned by the data-fetching layer; the gateway only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Identity {
    /// Raw role identifier as reported by the API.
    pub role: Option<String>,
    pub company_id: Option<String>,
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Role from the closed set, `None` when missing or unknown.
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity API answered with status {0}")]
    Status(u16),

    #[error("identity query returned errors: {0}")]
    Graphql(String),

    #[error("identity response could not be decoded: {0}")]
    Decode(String),
}

/// IdentityProvider
///
/// The identity query boundary. `Ok(None)` means the API knows no user for this
/// session; errors cover transport and server failures.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self, token: &SessionToken)
    -> Result<Option<Identity>, IdentityError>;
}

/// Shared handle stored in `AppState`.
pub type IdentityState = Arc<dyn IdentityProvider>;

const CURRENT_IDENTITY_QUERY: &str =
    "query CurrentIdentity { me { role companyId customerId firstName lastName email } }";

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<CurrentIdentityData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct CurrentIdentityData {
    me: Option<Identity>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

/// GraphqlIdentityClient
///
/// Resolves the identity against the remote GraphQL API, forwarding the
/// session cookie exactly as the browser would.
#[derive(Clone)]
pub struct GraphqlIdentityClient {
    client: reqwest::Client,
    endpoint: String,
    cookie_name: String,
}

impl GraphqlIdentityClient {
    pub fn new(
        endpoint: impl Into<String>,
        cookie_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            cookie_name: cookie_name.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GraphqlIdentityClient {
    async fn current_identity(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Identity>, IdentityError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(
                header::COOKIE,
                format!("{}={}", self.cookie_name, token.as_str()),
            )
            .json(&serde_json::json!({ "query": CURRENT_IDENTITY_QUERY }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        let body = response
            .json::<GraphqlResponse>()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))?;

        match body.data {
            Some(data) => {
                if !body.errors.is_empty() {
                    tracing::debug!(errors = body.errors.len(), "partial identity response");
                }
                Ok(data.me)
            }
            None if !body.errors.is_empty() => Err(IdentityError::Graphql(
                body.errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
            None => Err(IdentityError::Decode("missing `data`".to_string())),
        }
    }
}

/// StaticIdentityProvider
///
/// Serves a fixed answer for every session. Used for local development when
/// no GraphQL endpoint is configured, and in tests.
#[derive(Clone, Default)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
    should_fail: bool,
}

impl StaticIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            should_fail: false,
        }
    }

    /// A provider that knows no user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            identity: None,
            should_fail: true,
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_identity(
        &self,
        _token: &SessionToken,
    ) -> Result<Option<Identity>, IdentityError> {
        if self.should_fail {
            return Err(IdentityError::Status(503));
        }
        Ok(self.identity.clone())
    }
}
