//! IBM Quantum credentials
//!
//! Gantree: L4_Qiskit → Auth
//!
//! Credential lookup order:
//! 1. Environment (IBM_QUANTUM_TOKEN, IBMQ_TOKEN, QISKIT_IBM_TOKEN)
//! 2. Qiskit account file (~/.qiskit/qiskit-ibm.json)
//!
//! IQP tokens are sent as bearer tokens directly. IBM Cloud API keys are
//! exchanged for a short-lived IAM access token, cached until shortly before
//! expiry.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

/// Environment variables holding the token, in lookup order
pub const TOKEN_ENV_VARS: [&str; 3] = ["IBM_QUANTUM_TOKEN", "IBMQ_TOKEN", "QISKIT_IBM_TOKEN"];

/// Environment variable holding the instance (hub/group/project or CRN)
pub const INSTANCE_ENV_VAR: &str = "IBM_QUANTUM_INSTANCE";

/// Environment variable selecting the channel
pub const CHANNEL_ENV_VAR: &str = "IBM_QUANTUM_CHANNEL";

/// IAM token endpoint
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Refresh the IAM token this long before it expires
const IAM_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Shortest token accepted by `validate`
const MIN_TOKEN_LEN: usize = 32;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token in the environment or account file
    #[error("IBM Quantum token not found. Set IBM_QUANTUM_TOKEN or save an account with Qiskit")]
    MissingToken,

    /// Token too short or not usable as a header value
    #[error("Invalid API token format")]
    InvalidTokenFormat,

    /// Server rejected the credentials
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Account file unreadable
    #[error("Failed to read Qiskit account file: {0}")]
    ConfigFileError(String),

    /// Account file malformed or missing the requested entry
    #[error("Failed to parse Qiskit account file: {0}")]
    ConfigParseError(String),

    /// IAM exchange rejected
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchangeFailed(String),

    /// Transport failure during IAM exchange
    #[error("HTTP request failed: {0}")]
    HttpError(String),
}

/// Kind of secret held by the credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// IQP token, sent as bearer directly
    IqpToken,
    /// IBM Cloud API key, exchanged through IAM
    ApiKey,
}

impl TokenType {
    /// Classify a secret by its prefix
    pub fn detect(token: &str) -> Self {
        if token.starts_with("ApiKey-") || token.starts_with("apikey-") {
            TokenType::ApiKey
        } else {
            TokenType::IqpToken
        }
    }
}

/// Service channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IbmChannel {
    /// IBM Quantum Platform
    #[default]
    IbmQuantum,
    /// IBM Cloud
    IbmCloud,
}

impl IbmChannel {
    /// Interpret a channel label ("ibm_quantum", "ibm_cloud", ...)
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("cloud") {
            IbmChannel::IbmCloud
        } else {
            IbmChannel::IbmQuantum
        }
    }

    /// Service root
    pub fn base_url(&self) -> &'static str {
        match self {
            IbmChannel::IbmQuantum | IbmChannel::IbmCloud => "https://quantum.cloud.ibm.com",
        }
    }

    /// REST API root
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.base_url())
    }
}

/// Where credentials were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed in directly
    Explicit,
    /// Named environment variable
    Environment(&'static str),
    /// Qiskit account file entry
    AccountFile {
        /// File read
        path: PathBuf,
        /// Entry name inside the file
        entry: String,
    },
}

/// One entry of `~/.qiskit/qiskit-ibm.json`
#[derive(Debug, Clone, Deserialize)]
struct AccountEntry {
    token: String,

    #[serde(default)]
    channel: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    instance: Option<String>,
}

impl AccountEntry {
    fn channel(&self) -> IbmChannel {
        if let Some(label) = &self.channel {
            return IbmChannel::from_label(label);
        }
        match &self.url {
            Some(url) if url.contains("cloud.ibm.com") && !url.contains("quantum-computing") => {
                IbmChannel::IbmCloud
            }
            _ => IbmChannel::IbmQuantum,
        }
    }
}

/// Pick an entry from account-file content
///
/// With a name, that entry; otherwise the first entry whose name starts
/// with "default", else the first entry by name.
fn select_account(content: &str, name: Option<&str>) -> Result<(String, AccountEntry), AuthError> {
    let mut accounts: BTreeMap<String, AccountEntry> =
        serde_json::from_str(content).map_err(|e| AuthError::ConfigParseError(e.to_string()))?;

    let key = match name {
        Some(name) => accounts
            .contains_key(name)
            .then(|| name.to_string())
            .ok_or_else(|| AuthError::ConfigParseError(format!("Account '{}' not found", name)))?,
        None => accounts
            .keys()
            .find(|k| k.starts_with("default"))
            .or_else(|| accounts.keys().next())
            .cloned()
            .ok_or_else(|| AuthError::ConfigParseError("No accounts in file".into()))?,
    };

    let entry = accounts
        .remove(&key)
        .ok_or_else(|| AuthError::ConfigParseError(format!("Account '{}' not found", key)))?;
    Ok((key, entry))
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// IBM Quantum credentials
/// Gantree: IbmCredentials // 인증 정보
#[derive(Debug, Clone)]
pub struct IbmCredentials {
    token: String,
    token_type: TokenType,
    instance: Option<String>,
    channel: IbmChannel,
    source: CredentialSource,
    iam_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl IbmCredentials {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create credentials from a token or API key
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token_type: TokenType::detect(&token),
            token,
            instance: None,
            channel: IbmChannel::default(),
            source: CredentialSource::Explicit,
            iam_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        let (var, token) = TOKEN_ENV_VARS
            .iter()
            .find_map(|&var| std::env::var(var).ok().map(|t| (var, t)))
            .ok_or(AuthError::MissingToken)?;

        let mut creds = Self::new(token);
        creds.source = CredentialSource::Environment(var);
        creds.instance = std::env::var(INSTANCE_ENV_VAR).ok();
        if let Ok(label) = std::env::var(CHANNEL_ENV_VAR) {
            creds.channel = IbmChannel::from_label(&label);
        }
        Ok(creds)
    }

    /// Default account file location
    pub fn account_file_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qiskit").join("qiskit-ibm.json"))
    }

    /// Load from the default Qiskit account file
    pub fn from_qiskit_config(name: Option<&str>) -> Result<Self, AuthError> {
        let path = Self::account_file_path()
            .ok_or_else(|| AuthError::ConfigFileError("home directory unknown".into()))?;
        Self::from_account_file(&path, name)
    }

    /// Load from a Qiskit-format account file
    pub fn from_account_file(path: &Path, name: Option<&str>) -> Result<Self, AuthError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AuthError::ConfigFileError(format!("{}: {}", path.display(), e)))?;
        let (entry_name, entry) = select_account(&content, name)?;

        log::info!(
            "Loaded IBM Quantum account '{}' from {}",
            entry_name,
            path.display()
        );

        let mut creds = Self::new(entry.token.clone());
        creds.channel = entry.channel();
        creds.instance = entry.instance;
        creds.source = CredentialSource::AccountFile {
            path: path.to_path_buf(),
            entry: entry_name,
        };
        Ok(creds)
    }

    /// Environment first, then the account file
    /// Gantree: auto_load() -> Result<IbmCredentials> // 자동 탐색
    pub fn auto_load() -> Result<Self, AuthError> {
        if let Ok(creds) = Self::from_env() {
            log::info!("Loaded IBM Quantum credentials from environment");
            return Ok(creds);
        }
        Self::from_qiskit_config(None).map_err(|e| {
            log::debug!("No usable account file: {}", e);
            AuthError::MissingToken
        })
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set instance (hub/group/project or CRN)
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set channel
    pub fn with_channel(mut self, channel: IbmChannel) -> Self {
        self.channel = channel;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Raw token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Token kind
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Instance or CRN
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Channel
    pub fn channel(&self) -> IbmChannel {
        self.channel
    }

    /// Where the credentials came from
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Check if an IAM exchange is needed before requests
    pub fn requires_iam_exchange(&self) -> bool {
        self.token_type == TokenType::ApiKey
    }

    /// Basic format check
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if self.token.len() < MIN_TOKEN_LEN {
            return Err(AuthError::InvalidTokenFormat);
        }
        Ok(())
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Bearer header for IQP tokens
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Bearer header, exchanging an API key through IAM when needed
    pub async fn authorization(&self) -> Result<String, AuthError> {
        match self.token_type {
            TokenType::IqpToken => Ok(self.bearer()),
            TokenType::ApiKey => Ok(format!("Bearer {}", self.iam_access_token().await?)),
        }
    }

    async fn iam_access_token(&self) -> Result<String, AuthError> {
        if let Some(cached) = self.iam_cache.read().await.as_ref() {
            if cached.expires_at > Instant::now() + IAM_EXPIRY_MARGIN {
                return Ok(cached.access_token.clone());
            }
        }

        let api_key = self
            .token
            .strip_prefix("ApiKey-")
            .or_else(|| self.token.strip_prefix("apikey-"))
            .unwrap_or(&self.token);

        let response = reqwest::Client::new()
            .post(IAM_TOKEN_URL)
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| AuthError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::IamTokenExchangeFailed(format!("HTTP {}: {}", status, body)));
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::IamTokenExchangeFailed(e.to_string()))?;

        log::info!("IAM token obtained, expires in {}s", token.expires_in);

        *self.iam_cache.write().await = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(token.access_token)
    }
}
