//! Event Factory
//!
//! Builds initialized native events. The dictionary constructor is tried first;
//! if the host rejects it the event is created blank and initialized with the
//! family's legacy init recipe.

use crate::{EventError, EventFamily, EventHost, EventOptions, NativeEvent, Result, classify};

/// A constructed native event and the class it resolved to
#[derive(Debug, Clone)]
pub struct NativeEventHandle {
    pub event: NativeEvent,
    /// The family name for recognized families, `Custom` otherwise
    pub event_class: EventFamily,
}

/// Create a native event for `event_type`, classifying it when no family is forced.
pub fn create_native(
    host: &dyn EventHost,
    family: Option<EventFamily>,
    event_type: &str,
    options: &EventOptions,
) -> Result<NativeEventHandle> {
    if event_type.trim().is_empty() {
        return Err(EventError::MissingType);
    }

    let family = family.unwrap_or_else(|| classify(event_type));

    // Mutation events always take the legacy path
    let modern = if family == EventFamily::Mutation {
        None
    } else {
        match host.construct(family, event_type, options) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::trace!("Falling back to createEvent for `{}`: {}", event_type, err);
                None
            }
        }
    };

    let event = match modern {
        Some(event) => event,
        None => create_legacy(host, family, event_type, options)?,
    };

    Ok(NativeEventHandle {
        event,
        event_class: family.event_class(),
    })
}

fn create_legacy(
    host: &dyn EventHost,
    family: EventFamily,
    event_type: &str,
    options: &EventOptions,
) -> Result<NativeEvent> {
    let interface = family.legacy_interface(host.dom_level());
    let mut event = host.create_event(&interface)?;
    let view = options.view.or(Some(host.window()));

    match family {
        EventFamily::Ui => {
            event.init_ui_event(
                event_type,
                options.bubbles,
                options.cancelable,
                view,
                options.detail.clone(),
            );
        }
        EventFamily::Mouse | EventFamily::Drag | EventFamily::Wheel => {
            event.init_mouse_event(
                event_type,
                options.bubbles,
                options.cancelable,
                view,
                options.detail.clone(),
                options.screen_x,
                options.screen_y,
                options.client_x,
                options.client_y,
                options.ctrl_key,
                options.alt_key,
                options.shift_key,
                options.meta_key,
                options.button,
                options.related_target,
            );
        }
        EventFamily::Mutation => {
            event.init_mutation_event(
                event_type,
                options.bubbles,
                options.cancelable,
                options.related_node,
                &options.prev_value,
                &options.new_value,
                &options.attr_name,
                options.attr_change,
            );
        }
        EventFamily::Custom => {
            event.init_custom_event(
                event_type,
                options.bubbles,
                options.cancelable,
                options.detail.clone(),
            );
        }
        _ => {
            event.init_event(event_type, options.bubbles, options.cancelable);
        }
    }

    Ok(event)
}
