//! Wire payload
//!
//! `Report` is exactly what is POSTed to the collection endpoint. Unknown
//! identity fields travel as JSON `false`, unknown endpoint details are
//! omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::module::Severity;

/// Application identity attached to every report.
///
/// The same shape serves as configuration default, per-event override and
/// resolved wire value; a `None` field means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    #[serde(default, with = "string_or_false")]
    pub name: Option<String>,
    #[serde(default, with = "string_or_false")]
    pub version: Option<String>,
    #[serde(default, with = "string_or_false")]
    pub stage: Option<String>,
}

impl AppIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Resolve the agent's identity from configuration, falling back to the
    /// host name for `name`. Empty strings count as unknown.
    pub fn resolve(configured: &AppIdentity, hostname: Option<String>) -> Self {
        Self {
            name: non_empty(configured.name.clone()).or_else(|| non_empty(hostname)),
            version: non_empty(configured.version.clone()),
            stage: non_empty(configured.stage.clone()),
        }
    }

    /// Field-by-field merge: values present on `self` win over `fallback`.
    pub fn or(&self, fallback: &AppIdentity) -> Self {
        Self {
            name: non_empty(self.name.clone()).or_else(|| fallback.name.clone()),
            version: non_empty(self.version.clone()).or_else(|| fallback.version.clone()),
            stage: non_empty(self.stage.clone()).or_else(|| fallback.stage.clone()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// The reporting endpoint (the client installation, not the server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// A fully enriched report, as transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub app: AppIdentity,
    pub endpoint: EndpointInfo,
    pub tags: BTreeMap<String, String>,
    pub stack: String,
}

/// `Option<String>` encoded as the string itself or `false`.
mod string_or_false {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Flag(bool),
        Missing(()),
    }

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Some(s),
            Repr::Flag(_) | Repr::Missing(()) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> Report {
        Report {
            severity: Severity::Error,
            error_type: "TypeError".to_string(),
            message: "x is undefined".to_string(),
            timestamp: 1_700_000_000_000,
            resource: Some("file:///usr/bin/app".to_string()),
            app: AppIdentity::new("shop").with_stage("prod"),
            endpoint: EndpointInfo {
                id: "abc".to_string(),
                language: Some("en-US".to_string()),
                platform: None,
            },
            tags: BTreeMap::from([("team".to_string(), "web".to_string())]),
            stack: "TypeError: x is undefined".to_string(),
        }
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(sample_report()).unwrap();

        assert_eq!(value["type"], "TypeError");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["app"], json!({"name": "shop", "version": false, "stage": "prod"}));
        assert_eq!(value["endpoint"], json!({"id": "abc", "language": "en-US"}));
        assert_eq!(value["tags"], json!({"team": "web"}));
        assert!(value.get("error_type").is_none());
    }

    #[test]
    fn test_wire_format_decodes_false_identity() {
        let report = sample_report();
        let body = serde_json::to_string(&report).unwrap();
        let decoded: Report = serde_json::from_str(&body).unwrap();

        assert_eq!(decoded, report);
        assert_eq!(decoded.app.version, None);
    }

    #[test]
    fn test_resolve_identity_falls_back_to_hostname() {
        let configured = AppIdentity {
            name: None,
            version: Some("1.2.3".to_string()),
            stage: Some(String::new()),
        };
        let resolved = AppIdentity::resolve(&configured, Some("build-host".to_string()));

        assert_eq!(resolved.name.as_deref(), Some("build-host"));
        assert_eq!(resolved.version.as_deref(), Some("1.2.3"));
        assert_eq!(resolved.stage, None);

        let named = AppIdentity::resolve(&AppIdentity::new("shop"), Some("host".to_string()));
        assert_eq!(named.name.as_deref(), Some("shop"));
    }

    #[test]
    fn test_identity_override_is_per_field() {
        let defaults = AppIdentity::new("shop").with_version("1.0").with_stage("prod");
        let override_ = AppIdentity {
            version: Some("2.0".to_string()),
            ..AppIdentity::default()
        };

        let merged = override_.or(&defaults);
        assert_eq!(merged, AppIdentity::new("shop").with_version("2.0").with_stage("prod"));
    }
}
