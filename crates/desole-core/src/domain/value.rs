//! Values handed over by the host runtime
//!
//! A host passes the agent error values, console arguments, rejection
//! reasons and raw stacks. `HostValue` carries any of them; `CapturedFault`
//! is the one-time classification of an error value into "error-like" or
//! "plain" that the global-error hook relies on.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields whose presence marks a JSON object as error-like.
const ERROR_FIELDS: [&str; 3] = ["name", "message", "stack"];

/// An arbitrary object owned by the host runtime.
///
/// JSON serialization may fail (cyclic graphs, non-string map keys); the
/// `Display` conversion is the infallible fallback.
pub trait HostObject: fmt::Display + fmt::Debug + Send + Sync {
    /// Serialize the object to a JSON string.
    fn to_json(&self) -> serde_json::Result<String>;

    /// Look up a named field, if the object exposes one.
    fn field(&self, _name: &str) -> Option<HostValue> {
        None
    }
}

/// An error value with the usual name / message / stack triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeError {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl NativeError {
    /// Create an error value without a stack.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Set the stack text.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Build an error value from a Rust error.
    ///
    /// The name is the unqualified type name; the stack lists the display
    /// text of the error followed by its `source()` chain.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let type_name = std::any::type_name::<E>();
        let name = type_name
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(type_name);

        let mut stack = format!("{name}: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: name.to_string(),
            message: err.to_string(),
            stack: Some(stack),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.message.is_empty()) {
            (true, _) => f.write_str(&self.message),
            (false, true) => f.write_str(&self.name),
            (false, false) => write!(f, "{}: {}", self.name, self.message),
        }
    }
}

/// A value handed over by the host runtime.
#[derive(Debug, Clone)]
pub enum HostValue {
    Text(String),
    Json(Value),
    Error(NativeError),
    Object(Arc<dyn HostObject>),
}

impl HostValue {
    /// Wrap a host object.
    pub fn object(obj: impl HostObject + 'static) -> Self {
        HostValue::Object(Arc::new(obj))
    }

    /// Plain string conversion. Never fails.
    pub fn to_plain_string(&self) -> String {
        match self {
            HostValue::Text(s) => s.clone(),
            HostValue::Json(Value::String(s)) => s.clone(),
            HostValue::Json(v) => v.to_string(),
            HostValue::Error(e) => e.to_string(),
            HostValue::Object(o) => o.to_string(),
        }
    }

    /// JSON serialization of the value.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        match self {
            HostValue::Text(s) => serde_json::to_string(s),
            HostValue::Json(v) => serde_json::to_string(v),
            HostValue::Error(e) => serde_json::to_string(e),
            HostValue::Object(o) => o.to_json(),
        }
    }

    /// Console-style conversion: strings verbatim, everything else as JSON,
    /// falling back to the plain string form when serialization fails.
    pub fn stringify(&self) -> String {
        match self {
            HostValue::Text(s) | HostValue::Json(Value::String(s)) => s.clone(),
            other => other
                .to_json_string()
                .unwrap_or_else(|_| other.to_plain_string()),
        }
    }

    /// Look up a named field on structured values.
    pub fn field(&self, name: &str) -> Option<HostValue> {
        match self {
            HostValue::Text(_) => None,
            HostValue::Json(Value::Object(map)) => map.get(name).cloned().map(HostValue::Json),
            HostValue::Json(_) => None,
            HostValue::Error(e) => match name {
                "name" => Some(HostValue::Text(e.name.clone())),
                "message" => Some(HostValue::Text(e.message.clone())),
                "stack" => e.stack.clone().map(HostValue::Text),
                _ => None,
            },
            HostValue::Object(o) => o.field(name),
        }
    }

    /// The string content, for values that are strings.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostValue::Text(s) | HostValue::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Text(s)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Text(s.to_string())
    }
}

impl From<Value> for HostValue {
    fn from(v: Value) -> Self {
        HostValue::Json(v)
    }
}

impl From<NativeError> for HostValue {
    fn from(e: NativeError) -> Self {
        HostValue::Error(e)
    }
}

/// An intercepted error value, classified once at the interception boundary.
#[derive(Debug, Clone)]
pub enum CapturedFault {
    /// Error-like: exposes a name, message or stack
    Native(NativeError),
    /// Anything else, including no value at all
    Plain(Option<HostValue>),
}

impl CapturedFault {
    /// Classify a raw error value by the fields it exposes.
    pub fn classify(value: Option<HostValue>) -> Self {
        match value {
            Some(HostValue::Error(e)) => CapturedFault::Native(e),
            Some(value) if ERROR_FIELDS.iter().any(|f| value.field(f).is_some()) => {
                let text = |name: &str| value.field(name).map(|v| v.to_plain_string());
                CapturedFault::Native(NativeError {
                    name: text("name").unwrap_or_default(),
                    message: text("message").unwrap_or_default(),
                    stack: text("stack"),
                })
            }
            other => CapturedFault::Plain(other),
        }
    }

    /// Plain string form of the fault.
    pub fn describe(&self) -> String {
        match self {
            CapturedFault::Native(e) => e.to_string(),
            CapturedFault::Plain(Some(v)) => v.to_plain_string(),
            CapturedFault::Plain(None) => String::new(),
        }
    }

    /// Error class name; empty for plain values.
    pub fn error_type(&self) -> String {
        match self {
            CapturedFault::Native(e) => e.name.clone(),
            CapturedFault::Plain(_) => String::new(),
        }
    }

    /// Stack text for error-like values, the string form otherwise.
    pub fn stack_text(&self) -> String {
        match self {
            CapturedFault::Native(NativeError {
                stack: Some(stack), ..
            }) if !stack.is_empty() => stack.clone(),
            other => other.describe(),
        }
    }
}
