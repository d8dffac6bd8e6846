//! Host Environment Configuration

use crate::TargetId;

/// Capabilities of the host environment events are created in
#[derive(Debug, Clone)]
pub struct Config {
    /// DOM level of the host. Below 3, legacy interface names take an `s` suffix.
    pub dom_level: u8,

    /// Host supports dictionary constructors (`new MouseEvent(type, init)`)
    pub modern_constructors: bool,

    /// Host supports `document.createEvent(interface)`
    pub legacy_interfaces: bool,

    /// Default `view` for UI and mouse events
    pub window: TargetId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dom_level: 3,
            modern_constructors: true,
            legacy_interfaces: true,
            window: TargetId::WINDOW,
        }
    }
}

impl Config {
    /// An old host that only knows `createEvent` with DOM level 2 names
    pub fn legacy() -> Self {
        Self {
            dom_level: 2,
            modern_constructors: false,
            ..Default::default()
        }
    }
}
