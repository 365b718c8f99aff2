//! Live session against a Wikibase `api.php`
//!
//! Handles the MediaWiki login handshake, CSRF token retrieval and the
//! `wbeditentity` calls behind [`EntityClient`]. Cookies are kept by the
//! underlying `reqwest` client, so one session maps to one logged-in user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::WikibaseError;
use super::model::{ClaimMap, EntityData, EntityId, EntityKind};
use super::EntityClient;

/// Login flavour offered by MediaWiki
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    /// `action=clientlogin` with a regular account
    #[default]
    Client,
    /// Legacy `action=login` with a bot password
    Bot,
}

/// Configuration for a [`WikibaseSession`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// URL of `api.php`
    pub api_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,

    /// `loginreturnurl` required by `clientlogin`
    pub login_return_url: String,
}

impl SessionConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("ont2wb/{}", env!("CARGO_PKG_VERSION")),
            login_return_url: "http://127.0.0.1:5000/".to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_login_return_url(mut self, url: impl Into<String>) -> Self {
        self.login_return_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct EditedEntity {
    id: EntityId,
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    error: Option<ApiErrorBody>,
    entity: Option<EditedEntity>,
}

/// HTTP session with a Wikibase instance
pub struct WikibaseSession {
    config: SessionConfig,
    http_client: Client,
    csrf_token: Option<String>,
}

impl WikibaseSession {
    /// Create a new, not yet logged in session
    pub fn new(config: SessionConfig) -> Result<Self, WikibaseError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            config,
            http_client,
            csrf_token: None,
        })
    }

    /// Log in with the given method
    pub async fn authenticate(
        &mut self,
        method: LoginMethod,
        username: &str,
        password: &str,
    ) -> Result<(), WikibaseError> {
        match method {
            LoginMethod::Client => self.login(username, password).await.map(|_| ()),
            LoginMethod::Bot => self.bot_login(username, password).await,
        }
    }

    /// Fetch a login token via the `tokens` module
    pub async fn fetch_login_token(&self) -> Result<String, WikibaseError> {
        self.fetch_token("login").await
    }

    /// `action=clientlogin`; returns the user name the wiki greets us with
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String, WikibaseError> {
        let login_token = self.fetch_login_token().await?;

        let ans = self
            .post_api(&[
                ("action", "clientlogin"),
                ("username", username),
                ("password", password),
                ("loginreturnurl", &self.config.login_return_url),
                ("logintoken", &login_token),
                ("format", "json"),
            ])
            .await?;

        let status = ans["clientlogin"]["status"].as_str().unwrap_or_default();
        if status == "PASS" {
            let user = ans["clientlogin"]["username"]
                .as_str()
                .unwrap_or(username)
                .to_string();
            self.csrf_token = None;
            tracing::info!(user = %user, api_url = %self.config.api_url, "Logged into Wikibase");
            Ok(user)
        } else {
            let reason = ans["clientlogin"]["messagecode"]
                .as_str()
                .or_else(|| ans["error"]["info"].as_str())
                .unwrap_or(status)
                .to_string();
            Err(WikibaseError::Login {
                api_url: self.config.api_url.clone(),
                reason,
            })
        }
    }

    /// Legacy `action=login` with a bot password
    pub async fn bot_login(&mut self, bot_user: &str, bot_password: &str) -> Result<(), WikibaseError> {
        let login_token = self.fetch_login_token().await?;

        let ans = self
            .post_api(&[
                ("action", "login"),
                ("lgname", bot_user),
                ("lgpassword", bot_password),
                ("lgtoken", &login_token),
                ("format", "json"),
            ])
            .await?;

        let result = ans["login"]["result"].as_str().unwrap_or_default();
        if result == "Success" {
            self.csrf_token = None;
            tracing::info!(user = %bot_user, api_url = %self.config.api_url, "Bot logged into Wikibase");
            Ok(())
        } else {
            let reason = ans["login"]["reason"]
                .as_str()
                .unwrap_or(result)
                .to_string();
            Err(WikibaseError::Login {
                api_url: self.config.api_url.clone(),
                reason,
            })
        }
    }

    /// The CSRF token required by every edit, fetched once per login
    pub async fn csrf_token(&mut self) -> Result<String, WikibaseError> {
        if let Some(token) = &self.csrf_token {
            return Ok(token.clone());
        }
        let token = self.fetch_token("csrf").await?;
        self.csrf_token = Some(token.clone());
        Ok(token)
    }

    async fn fetch_token(&self, token_type: &str) -> Result<String, WikibaseError> {
        let response = self
            .http_client
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", token_type),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WikibaseError::Token {
                token_type: token_type.to_string(),
                reason: format!("HTTP error: {}", response.status().as_u16()),
            });
        }

        let ans: Value = response.json().await?;
        let key = format!("{token_type}token");
        ans["query"]["tokens"][key.as_str()]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WikibaseError::Token {
                token_type: token_type.to_string(),
                reason: format!("missing '{key}' in response"),
            })
    }

    async fn post_api(&self, form: &[(&str, &str)]) -> Result<Value, WikibaseError> {
        let response = self
            .http_client
            .post(&self.config.api_url)
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WikibaseError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// One `wbeditentity` round trip
    async fn edit_entity(
        &mut self,
        kind: EntityKind,
        data: &EntityData,
        target: EditTarget<'_>,
    ) -> Result<EntityId, WikibaseError> {
        let token = self.csrf_token().await?;
        let data_json = serde_json::to_string(data)
            .map_err(|e| WikibaseError::InvalidResponse(format!("unserializable entity: {e}")))?;
        let id_str;

        let mut form: Vec<(&str, &str)> = vec![
            ("action", "wbeditentity"),
            ("format", "json"),
            ("data", &data_json),
        ];
        match target {
            EditTarget::New => form.push(("new", kind.api_name())),
            EditTarget::Existing(id) => {
                id_str = id.to_string();
                form.push(("id", &id_str));
            }
            EditTarget::Clear(id) => {
                id_str = id.to_string();
                form.push(("id", &id_str));
                form.push(("clear", "true"));
            }
        }
        form.push(("token", &token));

        tracing::debug!(kind = %kind, data = %data_json, "wbeditentity");

        let ans: EditResponse = serde_json::from_value(self.post_api(&form).await?)
            .map_err(|e| WikibaseError::InvalidResponse(e.to_string()))?;

        if let Some(error) = ans.error {
            return Err(WikibaseError::from_api(kind, error.code, error.info));
        }

        ans.entity
            .map(|entity| entity.id)
            .ok_or_else(|| WikibaseError::InvalidResponse("missing 'entity' in response".into()))
    }
}

enum EditTarget<'a> {
    New,
    Existing(&'a EntityId),
    Clear(&'a EntityId),
}

#[async_trait]
impl EntityClient for WikibaseSession {
    async fn create_entity(
        &mut self,
        kind: EntityKind,
        data: &EntityData,
        target: Option<&EntityId>,
    ) -> Result<EntityId, WikibaseError> {
        let edit_target = match target {
            Some(id) => EditTarget::Existing(id),
            None => EditTarget::New,
        };
        let id = self.edit_entity(kind, data, edit_target).await?;
        tracing::info!(kind = %kind, id = %id, "Created entity");
        Ok(id)
    }

    async fn update_entity_claims(
        &mut self,
        id: &EntityId,
        claims: &ClaimMap,
    ) -> Result<(), WikibaseError> {
        let data = EntityData::claims_only(claims.clone());
        self.edit_entity(id.kind(), &data, EditTarget::Existing(id))
            .await
            .map(|_| ())
    }

    async fn clear_entity(&mut self, id: &EntityId) -> Result<(), WikibaseError> {
        tracing::info!(id = %id, "Clearing entity");
        self.edit_entity(id.kind(), &EntityData::default(), EditTarget::Clear(id))
            .await
            .map(|_| ())
    }
}
