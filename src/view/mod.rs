pub(crate) mod config;
pub(crate) mod state;
pub(crate) mod transform;

use serde::de::DeserializeOwned;

use crate::foundation::error::{WipeviewError, WipeviewResult};

/// Deserialize `s`, which must hold a JSON object (derived structs would also take arrays).
pub(crate) fn from_json_object<T: DeserializeOwned>(s: &str, what: &str) -> WipeviewResult<T> {
    let value: serde_json::Value =
        serde_json::from_str(s).map_err(|e| WipeviewError::serde(e.to_string()))?;
    if !value.is_object() {
        return Err(WipeviewError::serde(format!("{what} must be a JSON object")));
    }
    serde_json::from_value(value).map_err(|e| WipeviewError::serde(e.to_string()))
}
