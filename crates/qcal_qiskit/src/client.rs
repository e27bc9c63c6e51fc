//! IBM Quantum REST client
//!
//! Gantree: L4_Qiskit → Client
//!
//! Read-only calls used by calibration history and job metadata
//! extraction: backend properties (optionally as of a past instant), job
//! listings, and job results.

use crate::auth::{AuthError, IbmCredentials};
use crate::job::{JobInfo, JobResults, JobsListResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use qcal_core::{CalibrationSnapshot, GateDescriptor, GateParameter, QubitProperty};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// API version header value
const API_VERSION: &str = "2025-01-01";

/// Per-qubit property carrying the dedicated readout error
const READOUT_ERROR_PROPERTY: &str = qcal_core::constants::gates::READOUT_ERROR_PROPERTY;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Transport error
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Malformed request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success response
    #[error("API error ({code}): {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Response body
        message: String,
    },

    /// Response body not in the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Unknown backend
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    /// Unknown job
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: u64,
    },

    /// Service temporarily unavailable
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

impl ClientError {
    /// Replace a 404 with a more specific error
    fn or_not_found(self, not_found: impl FnOnce() -> ClientError) -> ClientError {
        match self {
            ClientError::ApiError { code: 404, .. } => not_found(),
            other => other,
        }
    }
}

/// IBM Quantum REST client
/// Gantree: IbmClient // REST 클라이언트
#[derive(Clone)]
pub struct IbmClient {
    client: reqwest::Client,
    credentials: IbmCredentials,
    base_url: String,
}

impl IbmClient {
    /// Create client; IQP tokens are installed as a default header
    pub fn new(credentials: IbmCredentials) -> Result<Self, ClientError> {
        credentials.validate()?;

        let mut headers = HeaderMap::new();
        if !credentials.requires_iam_exchange() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&credentials.bearer())
                    .map_err(|_| AuthError::InvalidTokenFormat)?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("qcal-qiskit/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            HeaderName::from_static("ibm-api-version"),
            HeaderValue::from_static(API_VERSION),
        );
        if let Some(instance) = credentials.instance() {
            headers.insert(
                HeaderName::from_static("service-crn"),
                HeaderValue::from_str(instance).map_err(|_| AuthError::InvalidTokenFormat)?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: credentials.channel().api_url(),
            client,
            credentials,
        })
    }

    /// Create client and, for API keys, perform the first IAM exchange
    pub async fn connect(credentials: IbmCredentials) -> Result<Self, ClientError> {
        let client = Self::new(credentials)?;
        if client.credentials.requires_iam_exchange() {
            client.credentials.authorization().await?;
        }
        Ok(client)
    }

    // ========================================================================
    // Low-level HTTP
    // ========================================================================

    /// Absolute URL for an API path with query parameters
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        if query.is_empty() {
            return Ok(Url::parse(&url)?);
        }
        Ok(Url::parse_with_params(&url, query)?)
    }

    /// GET and decode JSON
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        log::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if self.credentials.requires_iam_exchange() {
            request = request.header(AUTHORIZATION, self.credentials.authorization().await?);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }

        match status.as_u16() {
            401 => Err(AuthError::AuthFailed("invalid or expired token".into()).into()),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                Err(ClientError::RateLimited { retry_after })
            }
            503 => Err(ClientError::ServiceUnavailable),
            code => Err(ClientError::ApiError {
                code,
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    // ========================================================================
    // Backend Properties
    // ========================================================================

    /// Current calibration properties
    pub async fn get_backend_properties(
        &self,
        name: &str,
    ) -> Result<Option<BackendProperties>, ClientError> {
        let url = self.endpoint(&format!("/backends/{}/properties", name), &[])?;
        self.get(url)
            .await
            .map_err(|e| e.or_not_found(|| ClientError::BackendNotFound(name.to_string())))
    }

    /// Calibration properties in effect at `at`
    ///
    /// `None` when the backend has no calibration recorded before `at`.
    /// Gantree: get_backend_properties_at(name,at) // 과거 시점 캘리브레이션
    pub async fn get_backend_properties_at(
        &self,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<BackendProperties>, ClientError> {
        let url = self.endpoint(
            &format!("/backends/{}/properties", name),
            &[(
                "updated_before",
                at.to_rfc3339_opts(SecondsFormat::Secs, true),
            )],
        )?;
        self.get(url)
            .await
            .map_err(|e| e.or_not_found(|| ClientError::BackendNotFound(name.to_string())))
    }

    // ========================================================================
    // Jobs
    // ========================================================================

    /// Most recent jobs on `backend`, newest first
    pub async fn list_jobs(&self, backend: &str, limit: usize) -> Result<Vec<JobInfo>, ClientError> {
        let url = self.endpoint(
            "/jobs",
            &[
                ("backend", backend.to_string()),
                ("limit", limit.to_string()),
                ("sort", "DESC".to_string()),
            ],
        )?;
        let response: JobsListResponse = self.get(url).await?;
        Ok(response.jobs)
    }

    /// One job's metadata
    pub async fn get_job(&self, id: &str) -> Result<JobInfo, ClientError> {
        let url = self.endpoint(&format!("/jobs/{}", id), &[])?;
        self.get(url)
            .await
            .map_err(|e| e.or_not_found(|| ClientError::JobNotFound(id.to_string())))
    }

    /// One job's per-experiment results
    pub async fn get_job_results(&self, id: &str) -> Result<JobResults, ClientError> {
        let url = self.endpoint(&format!("/jobs/{}/results", id), &[])?;
        self.get(url)
            .await
            .map_err(|e| e.or_not_found(|| ClientError::JobNotFound(id.to_string())))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Credentials in use
    pub fn credentials(&self) -> &IbmCredentials {
        &self.credentials
    }

    /// API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Backend calibration properties
/// Gantree: BackendProperties // 백엔드 속성
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendProperties {
    /// Backend name
    #[serde(default)]
    pub backend_name: Option<String>,

    /// Last calibration time (RFC 3339)
    #[serde(default)]
    pub last_update_date: Option<String>,

    /// Per-qubit measured values
    #[serde(default)]
    pub qubits: Vec<Vec<Nduv>>,

    /// Per-gate parameters
    #[serde(default)]
    pub gates: Vec<GateProperty>,
}

/// Name, date, unit, value entry
///
/// Fields of the wrong type decode as absent so one bad entry does not
/// reject the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nduv {
    /// Property name
    pub name: String,

    /// Property value; `None` when null or non-numeric
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,

    /// Unit
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,

    /// Measurement date
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Gate calibration entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateProperty {
    /// Gate name
    pub gate: String,

    /// Target qubits
    pub qubits: Vec<usize>,

    /// Parameters (gate_error, gate_length, ...)
    #[serde(default)]
    pub parameters: Vec<Nduv>,
}

impl BackendProperties {
    /// Parsed last update time
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    /// Per-channel readout errors taken from each qubit's `readout_error` entry
    pub fn readout_errors(&self) -> Vec<Option<f64>> {
        self.qubits
            .iter()
            .map(|props| {
                props
                    .iter()
                    .find(|p| p.name == READOUT_ERROR_PROPERTY)
                    .and_then(|p| p.value)
            })
            .collect()
    }

    /// Provider-neutral snapshot
    /// Gantree: to_snapshot(fallback_name) -> CalibrationSnapshot // 변환
    pub fn to_snapshot(&self, fallback_name: &str) -> CalibrationSnapshot {
        let qubits = self
            .qubits
            .iter()
            .map(|props| {
                props
                    .iter()
                    .map(|p| QubitProperty {
                        name: p.name.clone(),
                        value: p.value,
                        unit: p.unit.clone(),
                        date: p.date.clone(),
                    })
                    .collect()
            })
            .collect();

        let gates = self
            .gates
            .iter()
            .map(|g| GateDescriptor {
                name: g.gate.clone(),
                qubits: g.qubits.clone(),
                parameters: g
                    .parameters
                    .iter()
                    .filter_map(|p| {
                        p.value.map(|value| GateParameter {
                            name: p.name.clone(),
                            value,
                            unit: p.unit.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        CalibrationSnapshot {
            backend_name: self
                .backend_name
                .clone()
                .unwrap_or_else(|| fallback_name.to_string()),
            last_update: self.last_update(),
            qubits,
            gates,
            readout_errors: self.readout_errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use qcal_core::constants::slots;

    const PROPERTIES: &str = r#"{
        "backend_name": "ibm_sherbrooke",
        "last_update_date": "2025-06-01T07:12:03+00:00",
        "qubits": [
            [
                {"name": "frequency", "value": 4.72, "unit": "GHz"},
                {"name": "T1", "value": 215.3, "unit": "us", "date": "2025-06-01T06:00:00+00:00"},
                {"name": "T2", "value": 130.1, "unit": "us"},
                {"name": "anharmonicity", "value": -0.31, "unit": "GHz"},
                {"name": "readout_error", "value": 0.0121}
            ],
            [
                {"name": "frequency", "value": 4.81, "unit": "GHz"},
                {"name": "T1", "value": 198.0, "unit": "us"}
            ]
        ],
        "gates": [
            {"gate": "sx", "qubits": [0], "parameters": [
                {"name": "gate_error", "value": 0.00021},
                {"name": "gate_length", "value": 35.55, "unit": "ns"}
            ]},
            {"gate": "ecr", "qubits": [0, 1], "parameters": [
                {"name": "gate_error", "value": 0.0074}
            ]}
        ]
    }"#;

    fn credentials() -> IbmCredentials {
        IbmCredentials::new("q".repeat(44))
    }

    #[test]
    fn test_properties_deserialize() {
        let props: BackendProperties = serde_json::from_str(PROPERTIES).unwrap();
        assert_eq!(props.qubits.len(), 2);
        assert_eq!(props.gates.len(), 2);
        assert_eq!(
            props.last_update(),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 7, 12, 3).unwrap())
        );
    }

    #[test]
    fn test_null_properties_body() {
        let props: Option<BackendProperties> = serde_json::from_str("null").unwrap();
        assert!(props.is_none());
    }

    #[test]
    fn test_readout_errors_by_name() {
        let props: BackendProperties = serde_json::from_str(PROPERTIES).unwrap();
        assert_eq!(props.readout_errors(), vec![Some(0.0121), None]);
    }

    #[test]
    fn test_to_snapshot() {
        let props: BackendProperties = serde_json::from_str(PROPERTIES).unwrap();
        let snapshot = props.to_snapshot("fallback");

        assert_eq!(snapshot.backend_name, "ibm_sherbrooke");
        assert_eq!(snapshot.num_qubits(), 2);
        assert_relative_eq!(snapshot.slot(0, slots::T1).unwrap(), 215.3);
        assert_relative_eq!(snapshot.slot(0, slots::READOUT_ERROR).unwrap(), 0.0121);
        assert!(snapshot.slot(1, slots::T2).is_none());
        assert_eq!(snapshot.gates[1].qubits, vec![0, 1]);
        assert_eq!(snapshot.gates[0].parameters[1].unit.as_deref(), Some("ns"));
        assert_eq!(snapshot.readout_errors.len(), 2);
    }

    #[test]
    fn test_null_value_keeps_rest_of_day() {
        let json = r#"{
            "qubits": [
                [
                    {"name": "frequency", "value": 4.72},
                    {"name": "T1", "value": 215.3}
                ],
                [
                    {"name": "frequency", "value": null},
                    {"name": "T1", "value": 198.0, "unit": 7},
                    {"name": "T2", "value": "n/a"}
                ]
            ],
            "gates": [
                {"gate": "sx", "qubits": [1], "parameters": [
                    {"name": "gate_error", "value": null},
                    {"name": "gate_length", "value": 35.55}
                ]}
            ]
        }"#;

        let props: BackendProperties = serde_json::from_str(json).unwrap();
        let snapshot = props.to_snapshot("ibm_sherbrooke");

        assert_eq!(snapshot.num_qubits(), 2);
        assert_relative_eq!(snapshot.slot(0, slots::FREQUENCY).unwrap(), 4.72);
        assert!(snapshot.slot(1, slots::FREQUENCY).is_none());
        assert_relative_eq!(snapshot.slot(1, slots::T1).unwrap(), 198.0);
        assert!(snapshot.slot(1, slots::T2).is_none());
        assert!(snapshot.qubits[1][1].unit.is_none());

        let sx = &snapshot.gates[0];
        assert_eq!(sx.parameters.len(), 1);
        assert_eq!(sx.parameters[0].name, "gate_length");
    }

    #[test]
    fn test_to_snapshot_fallback_name() {
        let snapshot = BackendProperties::default().to_snapshot("ibm_kyiv");
        assert_eq!(snapshot.backend_name, "ibm_kyiv");
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let client = IbmClient::new(credentials()).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let url = client
            .endpoint(
                "/backends/ibm_sherbrooke/properties",
                &[("updated_before", at.to_rfc3339_opts(SecondsFormat::Secs, true))],
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://quantum.cloud.ibm.com/api/v1/backends/ibm_sherbrooke/properties?updated_before=2025-06-01T00%3A00%3A00Z"
        );
    }

    #[test]
    fn test_client_rejects_short_token() {
        assert!(matches!(
            IbmClient::new(IbmCredentials::new("short")),
            Err(ClientError::Auth(AuthError::InvalidTokenFormat))
        ));
    }

    #[test]
    fn test_not_found_mapping() {
        let err = ClientError::ApiError {
            code: 404,
            message: String::new(),
        }
        .or_not_found(|| ClientError::BackendNotFound("ibm_x".into()));
        assert!(matches!(err, ClientError::BackendNotFound(_)));

        let err = ClientError::ServiceUnavailable
            .or_not_found(|| ClientError::BackendNotFound("ibm_x".into()));
        assert!(matches!(err, ClientError::ServiceUnavailable));
    }

    #[test]
    #[ignore]
    fn test_live_properties() {
        let client = tokio_test::block_on(IbmClient::connect(
            IbmCredentials::auto_load().unwrap(),
        ))
        .unwrap();
        let at = Utc::now() - chrono::Duration::days(7);
        let props = tokio_test::block_on(client.get_backend_properties_at("ibm_sherbrooke", at))
            .unwrap();
        assert!(props.is_some());
    }
}
