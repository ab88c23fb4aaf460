use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Result, TaskdefError};

/// Assertion type attached when client-credentials validation selects the
/// `client_assertion` proof-of-possession mode.
pub const CLIENT_ASSERTION_TYPE_JWT_BEARER: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Lifetime granted to a bearer token supplied without `expires_at`.
pub const DEFAULT_BEARER_TTL_SECS: u64 = 30 * 60;

/// Default `expires_in` for the private-key proof-of-possession mode.
pub const DEFAULT_PRIVATE_KEY_EXPIRES_IN_SECS: u64 = 300;

// ─── AuthMethod ──────────────────────────────────────────────────────────────

/// Discriminant of the supported credential shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    ApiKey,
    AwsSignature,
    BearerToken,
    ClientCredentials,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::ApiKey => "api-key",
            AuthMethod::AwsSignature => "aws-signature",
            AuthMethod::BearerToken => "bearer-token",
            AuthMethod::ClientCredentials => "client-credentials",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "api-key" => Some(AuthMethod::ApiKey),
            "aws-signature" => Some(AuthMethod::AwsSignature),
            "bearer-token" => Some(AuthMethod::BearerToken),
            "client-credentials" => Some(AuthMethod::ClientCredentials),
            _ => None,
        }
    }
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Canonical, normalized output of an authorization validator, ready for the
/// external execution collaborator. Only validators mint the `validated`
/// marker; a `Credentials` assembled any other way reports itself invalid
/// until re-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub method: AuthMethod,
    pub credentials: HashMap<String, serde_json::Value>,
    #[serde(default)]
    validated: bool,
}

impl Credentials {
    pub(crate) fn validated(
        method: AuthMethod,
        credentials: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            method,
            credentials,
            validated: true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validated
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.credentials.get(key)
    }

    /// The payload-attachable form: a plain JSON object map.
    pub fn to_map(&self) -> HashMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }
}

// ─── Field presence ──────────────────────────────────────────────────────────

/// Presence in the sense the credential checks need it: set, non-null, and
/// not an empty string / `false` / `0`.
fn is_present(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(_) => true,
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_secs()
}

// ─── ApiKeyAuthorization ─────────────────────────────────────────────────────

/// API-key credentials: a header or query parameter pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKeyAuthorization {
    authorization: HashMap<String, serde_json::Value>,
}

impl ApiKeyAuthorization {
    pub fn new(authorization: HashMap<String, serde_json::Value>) -> Self {
        Self { authorization }
    }

    pub fn validate(&self) -> Result<Credentials> {
        if is_present(self.authorization.get("key")) && is_present(self.authorization.get("value"))
        {
            let mut credentials = self.authorization.clone();
            credentials
                .entry("addTo".to_string())
                .or_insert_with(|| json!("header"));
            Ok(Credentials::validated(AuthMethod::ApiKey, credentials))
        } else {
            Err(TaskdefError::AuthValidation(
                "API Key format wrong!".to_string(),
            ))
        }
    }
}

// ─── AwsSignatureAuthorization ───────────────────────────────────────────────

/// AWS signature credentials: an access-key / secret-key pair. The signing
/// itself happens in the external execution collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct AwsSignatureAuthorization {
    authorization: HashMap<String, serde_json::Value>,
}

impl AwsSignatureAuthorization {
    pub fn new(authorization: HashMap<String, serde_json::Value>) -> Self {
        Self { authorization }
    }

    pub fn validate(&self) -> Result<Credentials> {
        if is_present(self.authorization.get("accesskey"))
            && is_present(self.authorization.get("secretkey"))
        {
            Ok(Credentials::validated(
                AuthMethod::AwsSignature,
                self.authorization.clone(),
            ))
        } else {
            Err(TaskdefError::AuthValidation(
                "AccessKey SecretKey format wrong!".to_string(),
            ))
        }
    }
}

// ─── BearerTokenAuthorization ────────────────────────────────────────────────

/// Bearer-token credentials with an expiry check. The check is a value
/// comparison against the clock, not a live timer.
#[derive(Debug, Clone, PartialEq)]
pub struct BearerTokenAuthorization {
    authorization: HashMap<String, serde_json::Value>,
}

impl BearerTokenAuthorization {
    pub fn new(authorization: HashMap<String, serde_json::Value>) -> Self {
        Self { authorization }
    }

    pub fn validate(&self) -> Result<Credentials> {
        if !is_present(self.authorization.get("access_token")) {
            return Err(TaskdefError::AuthValidation(
                "Valid access token missing!".to_string(),
            ));
        }
        let now = now_secs();
        let mut credentials = self.authorization.clone();
        credentials
            .entry("expires_at".to_string())
            .or_insert_with(|| json!(now + DEFAULT_BEARER_TTL_SECS));
        credentials
            .entry("token_type".to_string())
            .or_insert_with(|| json!("Bearer"));

        let expires_at = credentials
            .get("expires_at")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0);
        if expires_at <= now as i64 {
            return Err(TaskdefError::AuthValidation(
                "TokenSet Expired: The authentication token associated with your request has \
                 expired. Please reauthenticate to continue using the service. Make sure to \
                 obtain a fresh token before attempting to access protected resources."
                    .to_string(),
            ));
        }
        Ok(Credentials::validated(AuthMethod::BearerToken, credentials))
    }
}

// ─── ClientCredentialsAuthorization ──────────────────────────────────────────

/// OAuth2 client-credentials with three mutually exclusive proof-of-possession
/// modes. Precedence is fixed: client_assertion, then client_secret, then
/// private_key_path.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentialsAuthorization {
    authorization: HashMap<String, serde_json::Value>,
}

impl ClientCredentialsAuthorization {
    pub fn new(authorization: HashMap<String, serde_json::Value>) -> Self {
        Self { authorization }
    }

    pub fn validate(&self) -> Result<Credentials> {
        let auth = &self.authorization;
        if !is_present(auth.get("client_id")) {
            return Err(TaskdefError::AuthValidation(
                "Client ID Missing: The required client ID is not provided. Please include the \
                 client ID to authenticate and proceed with the operation."
                    .to_string(),
            ));
        }
        let mut credentials: HashMap<String, serde_json::Value> = HashMap::new();
        credentials.insert("client_id".to_string(), auth["client_id"].clone());

        if is_present(auth.get("scope")) {
            credentials.insert("scope".to_string(), auth["scope"].clone());
        }
        if is_present(auth.get("additional_parameters")) {
            credentials.insert(
                "additional_parameters".to_string(),
                auth["additional_parameters"].clone(),
            );
        }

        if !is_present(auth.get("token_endpoint")) {
            return Err(TaskdefError::AuthValidation(
                "Token Endpoint Missing: The required Token Endpoint is not provided. Please \
                 include the Token Endpoint to authenticate and proceed with the operation."
                    .to_string(),
            ));
        }
        credentials.insert("token_endpoint".to_string(), auth["token_endpoint"].clone());

        if is_present(auth.get("client_assertion")) {
            credentials.insert(
                "client_assertion".to_string(),
                auth["client_assertion"].clone(),
            );
            credentials.insert(
                "client_assertion_type".to_string(),
                json!(CLIENT_ASSERTION_TYPE_JWT_BEARER),
            );
        } else if is_present(auth.get("client_secret")) {
            credentials.insert("client_secret".to_string(), auth["client_secret"].clone());
        } else if is_present(auth.get("private_key_path")) {
            credentials.insert(
                "private_key_path".to_string(),
                auth["private_key_path"].clone(),
            );
            let expires_in = auth
                .get("expires_in")
                .filter(|v| is_present(Some(v)))
                .cloned()
                .unwrap_or_else(|| json!(DEFAULT_PRIVATE_KEY_EXPIRES_IN_SECS));
            credentials.insert("expires_in".to_string(), expires_in);
        } else {
            return Err(TaskdefError::AuthValidation(
                "Client Secret, Client Assertion, or Private Key Path Needed: To authenticate \
                 and access the requested resource, you need to provide either a valid client \
                 secret, a client assertion, or the path to a private key."
                    .to_string(),
            ));
        }
        Ok(Credentials::validated(
            AuthMethod::ClientCredentials,
            credentials,
        ))
    }
}

// ─── TaskAuthorization ───────────────────────────────────────────────────────

/// Closed union over the supported authorization methods. Dispatch is
/// exhaustive: adding a method means adding a variant and its `validate` arm.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAuthorization {
    ApiKey(ApiKeyAuthorization),
    AwsSignature(AwsSignatureAuthorization),
    BearerToken(BearerTokenAuthorization),
    ClientCredentials(ClientCredentialsAuthorization),
}

impl TaskAuthorization {
    pub fn new(method: AuthMethod, authorization: HashMap<String, serde_json::Value>) -> Self {
        match method {
            AuthMethod::ApiKey => {
                TaskAuthorization::ApiKey(ApiKeyAuthorization::new(authorization))
            }
            AuthMethod::AwsSignature => {
                TaskAuthorization::AwsSignature(AwsSignatureAuthorization::new(authorization))
            }
            AuthMethod::BearerToken => {
                TaskAuthorization::BearerToken(BearerTokenAuthorization::new(authorization))
            }
            AuthMethod::ClientCredentials => {
                TaskAuthorization::ClientCredentials(ClientCredentialsAuthorization::new(
                    authorization,
                ))
            }
        }
    }

    /// Builds the validator matching the raw input's declared `method`.
    pub fn from_raw(raw: HashMap<String, serde_json::Value>) -> Result<Self> {
        let declared = raw
            .get("method")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                TaskdefError::AuthValidation(
                    "Authorization method missing from the supplied credentials.".to_string(),
                )
            })?;
        let method = AuthMethod::parse(declared).ok_or_else(|| {
            TaskdefError::AuthValidation(format!("Unknown authorization method: {declared}"))
        })?;
        Ok(Self::new(method, raw))
    }

    pub fn method(&self) -> AuthMethod {
        match self {
            TaskAuthorization::ApiKey(_) => AuthMethod::ApiKey,
            TaskAuthorization::AwsSignature(_) => AuthMethod::AwsSignature,
            TaskAuthorization::BearerToken(_) => AuthMethod::BearerToken,
            TaskAuthorization::ClientCredentials(_) => AuthMethod::ClientCredentials,
        }
    }

    /// Normalizes the raw input into canonical credentials, or fails with an
    /// auth-validation error. Pure function of the raw input; safe to call
    /// repeatedly.
    pub fn validate(&self) -> Result<Credentials> {
        match self {
            TaskAuthorization::ApiKey(a) => a.validate(),
            TaskAuthorization::AwsSignature(a) => a.validate(),
            TaskAuthorization::BearerToken(a) => a.validate(),
            TaskAuthorization::ClientCredentials(a) => a.validate(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn map(entries: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn assert_auth_error(result: Result<Credentials>, needle: &str) {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(
            err.to_string().contains(needle),
            "expected {:?} to contain {:?}",
            err.to_string(),
            needle
        );
    }

    // ─── AuthMethod ──────────────────────────────────────────────────────

    #[test]
    fn method_serializes_to_kebab_case() {
        assert_eq!(serde_json::to_string(&AuthMethod::ApiKey).unwrap(), "\"api-key\"");
        assert_eq!(
            serde_json::to_string(&AuthMethod::AwsSignature).unwrap(),
            "\"aws-signature\""
        );
        assert_eq!(
            serde_json::to_string(&AuthMethod::BearerToken).unwrap(),
            "\"bearer-token\""
        );
        assert_eq!(
            serde_json::to_string(&AuthMethod::ClientCredentials).unwrap(),
            "\"client-credentials\""
        );
    }

    #[test]
    fn method_parse_round_trips_as_str() {
        for method in [
            AuthMethod::ApiKey,
            AuthMethod::AwsSignature,
            AuthMethod::BearerToken,
            AuthMethod::ClientCredentials,
        ] {
            assert_eq!(AuthMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(AuthMethod::parse("basic"), None);
    }

    // ─── ApiKeyAuthorization ─────────────────────────────────────────────

    #[test]
    fn api_key_defaults_add_to_header() {
        let auth = ApiKeyAuthorization::new(map(&[
            ("key", serde_json::json!("x-api-key")),
            ("value", serde_json::json!("s3cret")),
        ]));
        let credentials = auth.validate().unwrap();
        assert!(credentials.is_valid());
        assert_eq!(credentials.method, AuthMethod::ApiKey);
        assert_eq!(credentials.get("addTo").unwrap(), "header");
        assert_eq!(credentials.get("key").unwrap(), "x-api-key");
        assert_eq!(credentials.get("value").unwrap(), "s3cret");
    }

    #[test]
    fn api_key_preserves_explicit_add_to() {
        let auth = ApiKeyAuthorization::new(map(&[
            ("key", serde_json::json!("token")),
            ("value", serde_json::json!("abc")),
            ("addTo", serde_json::json!("query")),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("addTo").unwrap(), "query");
    }

    #[test]
    fn api_key_missing_key_fails() {
        let auth = ApiKeyAuthorization::new(map(&[("value", serde_json::json!("abc"))]));
        assert_auth_error(auth.validate(), "API Key format wrong!");
    }

    #[test]
    fn api_key_missing_value_fails() {
        let auth = ApiKeyAuthorization::new(map(&[("key", serde_json::json!("x-api-key"))]));
        assert_auth_error(auth.validate(), "API Key format wrong!");
    }

    #[test]
    fn api_key_empty_string_value_fails() {
        let auth = ApiKeyAuthorization::new(map(&[
            ("key", serde_json::json!("x-api-key")),
            ("value", serde_json::json!("")),
        ]));
        assert_auth_error(auth.validate(), "API Key format wrong!");
    }

    #[test]
    fn api_key_validate_is_idempotent() {
        let auth = ApiKeyAuthorization::new(map(&[
            ("key", serde_json::json!("k")),
            ("value", serde_json::json!("v")),
        ]));
        assert_eq!(auth.validate().unwrap(), auth.validate().unwrap());
    }

    // ─── AwsSignatureAuthorization ───────────────────────────────────────

    #[test]
    fn aws_signature_passes_input_through_unchanged() {
        let input = map(&[
            ("accesskey", serde_json::json!("AKIA123")),
            ("secretkey", serde_json::json!("shhh")),
            ("region", serde_json::json!("eu-west-1")),
        ]);
        let auth = AwsSignatureAuthorization::new(input.clone());
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.credentials, input);
        assert_eq!(credentials.method, AuthMethod::AwsSignature);
    }

    #[test]
    fn aws_signature_missing_either_key_fails() {
        let auth =
            AwsSignatureAuthorization::new(map(&[("accesskey", serde_json::json!("AKIA123"))]));
        assert_auth_error(auth.validate(), "AccessKey SecretKey format wrong!");

        let auth = AwsSignatureAuthorization::new(map(&[("secretkey", serde_json::json!("shhh"))]));
        assert_auth_error(auth.validate(), "AccessKey SecretKey format wrong!");
    }

    // ─── BearerTokenAuthorization ────────────────────────────────────────

    #[test]
    fn bearer_defaults_expiry_and_token_type() {
        let auth =
            BearerTokenAuthorization::new(map(&[("access_token", serde_json::json!("tok-1"))]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("token_type").unwrap(), "Bearer");

        let expires_at = credentials.get("expires_at").unwrap().as_u64().unwrap();
        let expected = now_secs() + DEFAULT_BEARER_TTL_SECS;
        // Allow a little slack between the validate() call and this check.
        assert!(expires_at >= expected - 5 && expires_at <= expected + 5);
    }

    #[test]
    fn bearer_preserves_future_expiry_verbatim() {
        let future = now_secs() + 86_400;
        let auth = BearerTokenAuthorization::new(map(&[
            ("access_token", serde_json::json!("tok-1")),
            ("expires_at", serde_json::json!(future)),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(
            credentials.get("expires_at").unwrap().as_u64().unwrap(),
            future
        );
    }

    #[test]
    fn bearer_expired_token_fails() {
        let past = now_secs() - 60;
        let auth = BearerTokenAuthorization::new(map(&[
            ("access_token", serde_json::json!("tok-1")),
            ("expires_at", serde_json::json!(past)),
        ]));
        assert_auth_error(auth.validate(), "TokenSet Expired");
    }

    #[test]
    fn bearer_missing_access_token_fails() {
        let auth = BearerTokenAuthorization::new(map(&[(
            "expires_at",
            serde_json::json!(now_secs() + 600),
        )]));
        assert_auth_error(auth.validate(), "Valid access token missing!");
    }

    #[test]
    fn bearer_preserves_extra_fields() {
        let auth = BearerTokenAuthorization::new(map(&[
            ("access_token", serde_json::json!("tok-1")),
            ("refresh_token", serde_json::json!("ref-1")),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("refresh_token").unwrap(), "ref-1");
    }

    // ─── ClientCredentialsAuthorization ──────────────────────────────────

    #[test]
    fn client_credentials_missing_client_id_fails() {
        let auth = ClientCredentialsAuthorization::new(map(&[(
            "token_endpoint",
            serde_json::json!("https://auth.example.com/token"),
        )]));
        assert_auth_error(auth.validate(), "Client ID Missing");
    }

    #[test]
    fn client_credentials_missing_token_endpoint_fails() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            ("client_secret", serde_json::json!("shhh")),
        ]));
        assert_auth_error(auth.validate(), "Token Endpoint Missing");
    }

    #[test]
    fn client_credentials_no_proof_of_possession_fails() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
        ]));
        assert_auth_error(
            auth.validate(),
            "Client Secret, Client Assertion, or Private Key Path Needed",
        );
    }

    #[test]
    fn client_assertion_wins_over_client_secret() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
            ("client_assertion", serde_json::json!("eyJhbGciOi...")),
            ("client_secret", serde_json::json!("shhh")),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(
            credentials.get("client_assertion_type").unwrap(),
            CLIENT_ASSERTION_TYPE_JWT_BEARER
        );
        assert_eq!(credentials.get("client_assertion").unwrap(), "eyJhbGciOi...");
        assert!(credentials.get("client_secret").is_none());
    }

    #[test]
    fn client_secret_wins_over_private_key_path() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
            ("client_secret", serde_json::json!("shhh")),
            ("private_key_path", serde_json::json!("/keys/client.pem")),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("client_secret").unwrap(), "shhh");
        assert!(credentials.get("private_key_path").is_none());
        assert!(credentials.get("expires_in").is_none());
    }

    #[test]
    fn private_key_path_defaults_expires_in() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
            ("private_key_path", serde_json::json!("/keys/client.pem")),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("expires_in").unwrap(), 300);
    }

    #[test]
    fn private_key_path_preserves_explicit_expires_in() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
            ("private_key_path", serde_json::json!("/keys/client.pem")),
            ("expires_in", serde_json::json!(600)),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("expires_in").unwrap(), 600);
    }

    #[test]
    fn client_credentials_copies_scope_and_additional_parameters() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
            ("client_secret", serde_json::json!("shhh")),
            ("scope", serde_json::json!("tasks.read tasks.write")),
            (
                "additional_parameters",
                serde_json::json!({ "audience": "https://api.example.com" }),
            ),
        ]));
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("scope").unwrap(), "tasks.read tasks.write");
        assert_eq!(
            credentials.get("additional_parameters").unwrap()["audience"],
            "https://api.example.com"
        );
    }

    #[test]
    fn client_credentials_drops_unrelated_input_fields() {
        let auth = ClientCredentialsAuthorization::new(map(&[
            ("client_id", serde_json::json!("client-1")),
            (
                "token_endpoint",
                serde_json::json!("https://auth.example.com/token"),
            ),
            ("client_secret", serde_json::json!("shhh")),
            ("method", serde_json::json!("client-credentials")),
        ]));
        let credentials = auth.validate().unwrap();
        assert!(credentials.get("method").is_none());
    }

    // ─── TaskAuthorization ───────────────────────────────────────────────

    #[test]
    fn from_raw_dispatches_on_declared_method() {
        let auth = TaskAuthorization::from_raw(map(&[
            ("method", serde_json::json!("api-key")),
            ("key", serde_json::json!("x-api-key")),
            ("value", serde_json::json!("s3cret")),
        ]))
        .unwrap();
        assert_eq!(auth.method(), AuthMethod::ApiKey);
        let credentials = auth.validate().unwrap();
        assert_eq!(credentials.get("addTo").unwrap(), "header");
    }

    #[test]
    fn from_raw_missing_method_fails() {
        let result = TaskAuthorization::from_raw(map(&[("key", serde_json::json!("x"))]));
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("method missing"));
    }

    #[test]
    fn from_raw_unknown_method_fails() {
        let result =
            TaskAuthorization::from_raw(map(&[("method", serde_json::json!("kerberos"))]));
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("Unknown authorization method"));
    }

    // ─── Credentials ─────────────────────────────────────────────────────

    #[test]
    fn deserialized_credentials_default_to_invalid() {
        let credentials: Credentials = serde_json::from_value(serde_json::json!({
            "method": "api-key",
            "credentials": { "key": "k", "value": "v" }
        }))
        .unwrap();
        assert!(!credentials.is_valid());
    }

    #[test]
    fn credentials_round_trip_keeps_validated_marker() {
        let auth = ApiKeyAuthorization::new(map(&[
            ("key", serde_json::json!("k")),
            ("value", serde_json::json!("v")),
        ]));
        let credentials = auth.validate().unwrap();
        let value = serde_json::to_value(&credentials).unwrap();
        let back: Credentials = serde_json::from_value(value).unwrap();
        assert!(back.is_valid());
        assert_eq!(back, credentials);
    }

    #[test]
    fn to_map_contains_method_and_credential_fields() {
        let auth = ApiKeyAuthorization::new(map(&[
            ("key", serde_json::json!("k")),
            ("value", serde_json::json!("v")),
        ]));
        let as_map = auth.validate().unwrap().to_map();
        assert_eq!(as_map["method"], serde_json::json!("api-key"));
        assert_eq!(as_map["credentials"]["key"], serde_json::json!("k"));
        assert_eq!(as_map["validated"], serde_json::json!(true));
    }

    // ─── Property: valid API-key inputs keep their addTo ─────────────────

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn api_key_add_to_is_header_or_preserved(
                key in "[a-zA-Z][a-zA-Z0-9-]{0,16}",
                value in "[a-zA-Z0-9]{1,24}",
                add_to in proptest::option::of("(header|query)"),
            ) {
                let mut input = map(&[
                    ("key", serde_json::json!(key)),
                    ("value", serde_json::json!(value)),
                ]);
                if let Some(ref explicit) = add_to {
                    input.insert("addTo".to_string(), serde_json::json!(explicit));
                }
                let credentials = ApiKeyAuthorization::new(input).validate().unwrap();
                let got = credentials.get("addTo").unwrap().as_str().unwrap();
                match add_to {
                    Some(explicit) => prop_assert_eq!(got, explicit),
                    None => prop_assert_eq!(got, "header"),
                }
            }
        }
    }
}
