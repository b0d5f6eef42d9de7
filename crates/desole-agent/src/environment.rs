//! Process environment collector
//!
//! Supplies the location, host name, language and platform details that
//! enrich every report when the agent runs inside a native process.

use desole_core::ports::{HostEnvironment, IdGenerator};
use uuid::Uuid;

/// Environment variables consulted for the language, in priority order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// [`HostEnvironment`] for the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl HostEnvironment for ProcessEnvironment {
    fn location_href(&self) -> Option<String> {
        std::env::current_exe()
            .ok()
            .map(|path| format!("file://{}", path.display()))
    }

    fn hostname(&self) -> Option<String> {
        std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .or_else(read_kernel_hostname)
    }

    fn language(&self) -> Option<String> {
        LOCALE_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .and_then(|raw| normalize_locale(&raw))
    }

    fn platform(&self) -> Option<String> {
        Some(format!(
            "{} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }
}

fn read_kernel_hostname() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Turn a POSIX locale such as `en_US.UTF-8@euro` into a language tag
/// (`en-US`). The `C` and `POSIX` locales carry no language.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }

    Some(base.replace('_', "-"))
}

/// Random (v4) UUIDs for report endpoint ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform() {
        let platform = ProcessEnvironment.platform().unwrap();
        assert!(platform.starts_with(std::env::consts::OS));
        assert!(platform.ends_with(std::env::consts::ARCH));
    }

    #[test]
    fn test_location_points_at_executable() {
        let href = ProcessEnvironment.location_href().unwrap();
        assert!(href.starts_with("file://"));
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(normalize_locale("fr").as_deref(), Some("fr"));
        assert_eq!(normalize_locale("C.UTF-8"), None);
        assert_eq!(normalize_locale("POSIX"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_uuid_generator_is_unique() {
        let ids = UuidGenerator;
        let a = ids.new_id();
        let b = ids.new_id();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
