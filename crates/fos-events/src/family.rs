//! Event Families
//!
//! Maps textual event type names to the native event interface that creates them.
//!
//! Families are matched in table order and the first anchored, case-insensitive
//! match wins. The order is a compatibility contract: `load` is a UI event while
//! `loadstart` falls through to `ProgressEvent`.

use std::sync::LazyLock;

use regex::Regex;

/// Native event interface family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EventFamily {
    #[serde(rename = "UIEvent")]
    Ui,
    #[serde(rename = "MouseEvent")]
    Mouse,
    #[serde(rename = "FocusEvent")]
    Focus,
    #[serde(rename = "KeyboardEvent")]
    Keyboard,
    #[serde(rename = "TouchEvent")]
    Touch,
    #[serde(rename = "DragEvent")]
    Drag,
    #[serde(rename = "WheelEvent")]
    Wheel,
    #[serde(rename = "HashChangeEvent")]
    HashChange,
    #[serde(rename = "BeforeUnloadEvent")]
    BeforeUnload,
    #[serde(rename = "MutationEvent")]
    Mutation,
    #[serde(rename = "MessageEvent")]
    Message,
    #[serde(rename = "PopStateEvent")]
    PopState,
    #[serde(rename = "StorageEvent")]
    Storage,
    #[serde(rename = "AnimationEvent")]
    Animation,
    #[serde(rename = "TransitionEvent")]
    Transition,
    #[serde(rename = "PageTransitionEvent")]
    PageTransition,
    #[serde(rename = "ProgressEvent")]
    Progress,
    #[serde(rename = "CompositionEvent")]
    Composition,
    #[serde(rename = "DeviceMotionEvent")]
    DeviceMotion,
    #[serde(rename = "DeviceOrientationEvent")]
    DeviceOrientation,
    /// Explicitly requested custom events. Never produced by [`classify`].
    #[serde(rename = "CustomEvent")]
    Custom,
    /// Fallback for every name no pattern recognizes
    #[serde(rename = "Event")]
    Generic,
}

/// Classification priority list
const FAMILY_TABLE: [(EventFamily, &str); 20] = [
    (EventFamily::Ui, "resize|scroll|select|(un)?load|DOMActivate"),
    (
        EventFamily::Mouse,
        "(dbl)?click|mouse(up|down|enter|leave|in|out|over|move|wheel)|show|contextmenu|DOMMouseScroll",
    ),
    (EventFamily::Focus, "blur|focus(in|out)?|DOMFocus(In|Out)"),
    (EventFamily::Keyboard, "key(up|down|press)"),
    (EventFamily::Touch, "touch(end|start|move|cancel)"),
    (EventFamily::Drag, "drag(end|start|enter|leave|over|exit|gesture|drop)?|drop"),
    (EventFamily::Wheel, "wheel"),
    (EventFamily::HashChange, "hashchange"),
    (EventFamily::BeforeUnload, "beforeunload"),
    (
        EventFamily::Mutation,
        "DOM((Attr|CharacterData|Subtree)Modified|Node(Inserted(IntoDocument)?|Removed(FromDocument)?))",
    ),
    (EventFamily::Message, "message"),
    (EventFamily::PopState, "popstate"),
    (EventFamily::Storage, "storage"),
    (EventFamily::Animation, "animation(end|start|iteration)"),
    (EventFamily::Transition, "transition(end|start)"),
    (EventFamily::PageTransition, "page(hide|show)"),
    (EventFamily::Progress, "load(end|start)|progress|timeout"),
    (EventFamily::Composition, "composition(end|start|update)"),
    (EventFamily::DeviceMotion, "devicemotion"),
    (EventFamily::DeviceOrientation, "deviceorientation"),
];

static FAMILY_PATTERNS: LazyLock<Vec<(EventFamily, Regex)>> = LazyLock::new(|| {
    FAMILY_TABLE
        .iter()
        .map(|(family, pattern)| {
            let re = Regex::new(&format!("(?i)^(?:{pattern})$")).expect("valid family pattern");
            (*family, re)
        })
        .collect()
});

static STANDARD_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    let union = FAMILY_TABLE
        .iter()
        .map(|(_, pattern)| *pattern)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)({union})")).expect("valid standard type pattern")
});

/// Resolve the family of an event type name. Total: unknown names are `Generic`.
pub fn classify(event_type: &str) -> EventFamily {
    FAMILY_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(event_type))
        .map(|(family, _)| *family)
        .unwrap_or(EventFamily::Generic)
}

/// Whether the name looks like a standard event type.
///
/// Unlike [`classify`] the union pattern is unanchored, so any name containing a
/// standard type (`"myclick"`) counts as standard.
pub fn is_standard_type(event_type: &str) -> bool {
    STANDARD_TYPE.is_match(event_type)
}

impl EventFamily {
    /// All families that take part in classification, in priority order
    pub fn classified() -> impl Iterator<Item = EventFamily> {
        FAMILY_TABLE.iter().map(|(family, _)| *family)
    }

    /// Native interface name (`"MouseEvent"`)
    pub fn interface(&self) -> &'static str {
        match self {
            Self::Ui => "UIEvent",
            Self::Mouse => "MouseEvent",
            Self::Focus => "FocusEvent",
            Self::Keyboard => "KeyboardEvent",
            Self::Touch => "TouchEvent",
            Self::Drag => "DragEvent",
            Self::Wheel => "WheelEvent",
            Self::HashChange => "HashChangeEvent",
            Self::BeforeUnload => "BeforeUnloadEvent",
            Self::Mutation => "MutationEvent",
            Self::Message => "MessageEvent",
            Self::PopState => "PopStateEvent",
            Self::Storage => "StorageEvent",
            Self::Animation => "AnimationEvent",
            Self::Transition => "TransitionEvent",
            Self::PageTransition => "PageTransitionEvent",
            Self::Progress => "ProgressEvent",
            Self::Composition => "CompositionEvent",
            Self::DeviceMotion => "DeviceMotionEvent",
            Self::DeviceOrientation => "DeviceOrientationEvent",
            Self::Custom => "CustomEvent",
            Self::Generic => "Event",
        }
    }

    /// Look up a family by interface name (case-insensitive)
    pub fn from_interface(name: &str) -> Option<EventFamily> {
        Self::classified()
            .chain([Self::Custom, Self::Generic])
            .find(|family| family.interface().eq_ignore_ascii_case(name))
    }

    /// Interface name used with `createEvent` on the given DOM level
    pub fn legacy_interface(&self, dom_level: u8) -> String {
        let name = self.interface();
        if dom_level < 3 && matches!(self, Self::Ui | Self::Mouse | Self::Mutation) {
            format!("{name}s")
        } else {
            name.to_string()
        }
    }

    /// Class reported for constructed events: recognized families keep their
    /// own name, everything else is a `CustomEvent`.
    pub fn event_class(&self) -> EventFamily {
        match self {
            Self::Generic => Self::Custom,
            other => *other,
        }
    }

    /// Families initialized with the 15-argument mouse recipe
    pub fn is_mouse_like(&self) -> bool {
        matches!(self, Self::Mouse | Self::Drag | Self::Wheel)
    }
}

impl std::fmt::Display for EventFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.interface())
    }
}
