use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// JWT claim set.
///
/// Carries the registered claims this service relies on (`sub`, `iat`, `exp`)
/// plus arbitrary custom fields via the flattened `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (the user's email in this system)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp, exclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Additional custom fields (flattened into the token payload)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a subject with a validity window starting now.
    ///
    /// Sets `sub`, `iat` = now, and `exp` = now + `validity`.
    pub fn for_subject(subject: impl ToString, validity: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: Some(subject.to_string()),
            iat: Some(now.timestamp()),
            exp: Some((now + validity).timestamp()),
            extra: HashMap::new(),
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Merge a map of custom fields.
    pub fn with_extra_claims(mut self, claims: HashMap<String, serde_json::Value>) -> Self {
        self.extra.extend(claims);
        self
    }

    /// Check if the claim set is expired at the given timestamp.
    ///
    /// Expiration is exclusive: the token is valid at `t` iff `t < exp`.
    /// Claims without an `exp` never expire.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| current_timestamp >= exp)
    }
}
