// Cloud API client: a small blocking HTTP client for the Vapor Cloud API.
// Every call is a single request/response round trip; nothing is retried
// and no state is kept between calls apart from the reqwest connection pool.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, ToolboxError};

pub const DEFAULT_BASE_URL: &str = "https://api.v2.vapor.cloud/v2/";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "VAPOR_CLOUD_API_URL";

const USERS_PATH: &str = "auth/users";
const LOGIN_PATH: &str = "auth/users/login";
const ME_PATH: &str = "auth/users/me";
const SSH_KEYS_PATH: &str = "git/keys";

pub const LIST_KEYS_OP: &str = "listing SSH keys";
pub const DELETE_KEY_OP: &str = "deleting SSH keys";

/// Blocking client for the cloud API. Construct one per invocation and pass
/// it to the calls that need it.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Profile of a cloud user as returned by signup and `me`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloudUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Signup payload.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_name: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("organization_name", &self.organization_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session token returned by login. Lives only as long as the process.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Token {
    /// Assumes the server encodes dates as RFC 3339 strings
    /// (e.g. `2030-01-01T00:00:00Z`); any other encoding fails to decode.
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub token: String,
}

impl Token {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("expires_at", &self.expires_at)
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Anything that can authorize a request with a bearer header.
pub trait BearerAuth {
    fn auth_headers(&self) -> Result<HeaderMap>;
}

impl BearerAuth for Token {
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

/// SSH key record as stored by the cloud. Timestamps are RFC 3339 strings,
/// same as [`Token::expires_at`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
    pub key: String,
    pub name: String,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where the public key material comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// A public key file on disk, e.g. `~/.ssh/id_rsa.pub`.
    Path(PathBuf),
    /// The key material itself.
    Material(String),
}

impl KeySource {
    /// Resolve to key text. Trailing whitespace is dropped from key files;
    /// file problems surface as [`ToolboxError::File`].
    pub fn load(self) -> Result<String> {
        let path = match self {
            KeySource::Material(key) => return Ok(key),
            KeySource::Path(path) => path,
        };
        if !path.is_file() {
            return Err(ToolboxError::File {
                path,
                reason: "no SSH key found".into(),
            });
        }
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                return Err(ToolboxError::File {
                    path,
                    reason: format!("unable to load SSH key ({err})"),
                })
            }
        };
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text.trim_end().to_string()),
            Err(_) => Err(ToolboxError::File {
                path,
                reason: "SSH key is not valid UTF-8 text".into(),
            }),
        }
    }
}

/// Raw outcome of a key push. The server's reply is not interpreted.
#[derive(Debug, Clone)]
pub struct KeyPushResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create an ApiClient configured from `VAPOR_CLOUD_API_URL`, falling
    /// back to the public cloud endpoint.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Create an account. The server creates the organization alongside it.
    pub fn signup(&self, user: &NewUser) -> Result<CloudUser> {
        let url = self.url(USERS_PATH);
        debug!(%url, email = %user.email, "signing up");
        let res = self.client.post(&url).json(user).send()?;
        let created: CloudUser = decode(res)?;
        info!(user_id = %created.id, "account created");
        Ok(created)
    }

    /// Exchange email and password for a session token using HTTP Basic auth.
    pub fn login(&self, email: &str, password: &str) -> Result<Token> {
        let url = self.url(LOGIN_PATH);
        debug!(%url, %email, "logging in");
        let credentials = STANDARD.encode(format!("{email}:{password}"));
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {credentials}"))?,
        );
        let res = self.client.post(&url).headers(headers).send()?;
        let token: Token = decode(res)?;
        info!(user_id = %token.user_id, expires_at = %token.expires_at, "logged in");
        Ok(token)
    }

    /// Fetch the profile owning `token`.
    pub fn me(&self, token: &Token) -> Result<CloudUser> {
        let url = self.url(ME_PATH);
        debug!(%url, "fetching profile");
        let res = self.client.get(&url).headers(token.auth_headers()?).send()?;
        decode(res)
    }

    pub fn push_ssh_key(
        &self,
        token: &Token,
        name: &str,
        source: KeySource,
    ) -> Result<KeyPushResponse> {
        SshKeyApi::new(self, token).push(name, source)
    }

    pub fn list_ssh_keys(&self, token: &Token) -> Result<Vec<SshKey>> {
        SshKeyApi::new(self, token).list()
    }

    pub fn delete_ssh_key(&self, token: &Token, name: &str) -> Result<()> {
        SshKeyApi::new(self, token).delete(name)
    }
}

/// SSH key calls, all authorized by the same session token.
pub struct SshKeyApi<'a> {
    client: &'a ApiClient,
    token: &'a Token,
}

#[derive(Serialize)]
struct KeyPackage<'a> {
    name: &'a str,
    key: &'a str,
}

impl<'a> SshKeyApi<'a> {
    pub fn new(client: &'a ApiClient, token: &'a Token) -> Self {
        SshKeyApi { client, token }
    }

    fn content_headers(&self) -> Result<HeaderMap> {
        let mut headers = self.token.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Upload a public key under `name`. Key files are read before any
    /// request is made.
    pub fn push(&self, name: &str, source: KeySource) -> Result<KeyPushResponse> {
        let key = source.load()?;
        let url = self.client.url(SSH_KEYS_PATH);
        debug!(%url, %name, "pushing SSH key");
        let res = self
            .client
            .client
            .post(&url)
            .headers(self.content_headers()?)
            .json(&KeyPackage { name, key: &key })
            .send()?;
        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            warn!(%status, "SSH key push was not accepted");
        }
        Ok(KeyPushResponse { status, body })
    }

    // No endpoint contract is documented for listing or deleting keys.
    pub fn list(&self) -> Result<Vec<SshKey>> {
        Err(ToolboxError::Unspecified(LIST_KEYS_OP))
    }

    pub fn delete(&self, _name: &str) -> Result<()> {
        Err(ToolboxError::Unspecified(DELETE_KEY_OP))
    }
}

/// Check the status, then decode the body as `T`.
fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let body = res.text()?;
    if !status.is_success() {
        return Err(ToolboxError::from_status(status, body));
    }
    Ok(serde_json::from_str(&body)?)
}
