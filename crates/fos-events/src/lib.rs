//! fOS Events - Event abstraction layer
//!
//! Normalizes creation, binding, dispatching and teardown of native UI events
//! behind one API, and keeps a per-target registry of bound events so that
//! binding, unbinding and re-firing are idempotent and introspectable.
//!
//! # Example
//! ```rust,ignore
//! use fos_events::{Handler, MemoryHost, Registry, TargetId};
//!
//! let registry = Registry::new(MemoryHost::default());
//! let button = registry.target(TargetId(7));
//! button.on("click", Some(Handler::new(|e| e.stop())), None)?;
//! button.fire("click", None, None)?;
//! ```

mod config;
mod event;
mod factory;
mod family;
mod host;
pub mod keys;
mod native;
mod options;
mod registry;
mod target;

pub use config::Config;
pub use event::{Event, Handler};
pub use factory::{NativeEventHandle, create_native};
pub use family::{EventFamily, classify, is_standard_type};
pub use host::{EventHost, ListenerId, MemoryHost, NativeListener};
pub use native::{EventInit, MouseInit, MutationInit, NativeEvent};
pub use options::EventOptions;
pub use registry::Registry;
pub use target::EventTarget;

/// Payload merged into events at dispatch time
pub type EventData = serde_json::Map<String, serde_json::Value>;

/// Identity of a host object that can carry listeners
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct TargetId(pub u64);

impl TargetId {
    /// The global window object
    pub const WINDOW: TargetId = TargetId(0);
}

/// Event layer error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("Type required.")]
    MissingType,

    #[error("No target given.")]
    MissingTarget,

    #[error("Event interface not supported: {0}")]
    NotSupported(String),

    #[error("{interface} constructor failed: {reason}")]
    Constructor { interface: String, reason: String },
}

pub type Result<T> = std::result::Result<T, EventError>;

/// Split a comma separated type list (`"click, keyup"`).
pub(crate) fn type_list(types: &str) -> Result<Vec<&str>> {
    let list: Vec<&str> = types
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if list.is_empty() {
        return Err(EventError::MissingType);
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_list() {
        let types = type_list("click, keyup,focus").unwrap();
        assert_eq!(types, ["click", "keyup", "focus"]);
    }

    #[test]
    fn test_type_list_skips_blanks() {
        assert_eq!(type_list("click,, ").unwrap(), ["click"]);
        assert_eq!(type_list(" , ").unwrap_err(), EventError::MissingType);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(EventError::MissingType.to_string(), "Type required.");
        assert_eq!(
            EventError::NotSupported("FooEvents".into()).to_string(),
            "Event interface not supported: FooEvents"
        );
    }
}
