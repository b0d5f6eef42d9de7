//! Host environment ports

/// Read-only context about where the agent runs.
///
/// Every accessor may return `None` when the host cannot tell.
pub trait HostEnvironment: Send + Sync {
    /// Current location, used as the report's `resource`
    fn location_href(&self) -> Option<String>;

    /// Host name, used as the fallback application name
    fn hostname(&self) -> Option<String>;

    /// Preferred language tag, e.g. `en-US`
    fn language(&self) -> Option<String>;

    /// Platform description, e.g. `linux x86_64`
    fn platform(&self) -> Option<String>;
}

/// Source of unique identifiers for report endpoints.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}
