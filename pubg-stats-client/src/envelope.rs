//! The top-level response shape returned by the PUBG API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single entry of the `errors` array in an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable description supplied by the server.
    #[serde(default)]
    pub detail: String,

    /// Remaining fields of the error object (e.g. `title`), passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The top-level JSON envelope of an API response.
///
/// Resource objects are treated as opaque [`Value`]s; request handling only
/// cares about the presence of a non-empty `errors` array. Top-level fields
/// other than `data`/`errors` (`links`, `meta`, ...) are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Resource objects, in server order.
    #[serde(default)]
    pub data: Vec<Value>,

    /// Server-reported request errors, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,

    /// Top-level fields outside `data`/`errors`, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Returns the first server-reported error detail, if the response
    /// carried a non-empty `errors` array.
    #[must_use]
    pub fn first_error_detail(&self) -> Option<&str> {
        self.errors.as_ref()?.first().map(|error| error.detail.as_str())
    }
}
