//! Property-selection policies for [`Logger::log_props`].
//!
//! Two policies shipped over time and both are supported:
//!
//! - **Opt-in (default):** the object implements [`LoggedProps`] and names
//!   exactly which properties to record. Rust's coherence rules give the
//!   parent/child override behavior for free — the one impl that applies to
//!   the concrete type wins.
//! - **Everything JSON-safe (fallback):** [`json_props`] serializes the whole
//!   object and keeps every field, usable as the body of a [`LoggedProps`]
//!   impl or passed straight to [`Logger::log_dict`].
//!
//! Serde's `Serialize` is the conversion layer in both cases; implementing it
//! by hand (or via `serialize_with`) is how a caller overrides how a value is
//! coerced to JSON.
//!
//! [`Logger::log_props`]: crate::Logger::log_props
//! [`Logger::log_dict`]: crate::Logger::log_dict

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LogError, Result};

/// Opt-in marker for objects whose properties can be logged.
///
/// ```
/// use serde_json::{json, Map, Value};
/// use runlog::LoggedProps;
///
/// struct Spectrometer {
///     serial: String,
///     gain: f64,
///     raw_buffer: Vec<u8>, // deliberately not logged
/// }
///
/// impl LoggedProps for Spectrometer {
///     fn logged_props(&self) -> Map<String, Value> {
///         let mut props = Map::new();
///         props.insert("serial".into(), json!(self.serial));
///         props.insert("gain".into(), json!(self.gain));
///         props
///     }
/// }
/// ```
pub trait LoggedProps {
    /// The properties to record, as a JSON object.
    fn logged_props(&self) -> Map<String, Value>;
}

/// "Everything JSON-safe" policy: serializes the whole object and returns all
/// of its fields.
///
/// Fails with [`LogError::NotADict`] if the object does not serialize to a
/// JSON object (e.g. a tuple or a bare number).
pub fn json_props<T: Serialize>(object: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(object)? {
        Value::Object(props) => Ok(props),
        _ => Err(LogError::NotADict(std::any::type_name::<T>().to_string())),
    }
}
