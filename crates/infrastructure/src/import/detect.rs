//! Format detection.
//!
//! Classifies raw input into a [`FormatTag`] by structural probes on the
//! parsed JSON, with filename substrings as a tie-break only. Detection is a
//! pure function of its inputs.

use serde::{Deserialize, Serialize};

/// Every input format the importer can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    /// Postman Collection v2 JSON.
    PostmanCollection,
    /// Postman Environment JSON.
    PostmanEnvironment,
    /// Insomnia export JSON.
    InsomniaExport,
    /// OpenAPI 3 or Swagger 2 JSON.
    OpenapiSpec,
    /// Quiver's own archival envelope.
    NativeExport,
    /// HTTP Archive 1.2.
    HarFile,
    /// Free-form cURL command text.
    CurlText,
    /// No format matched.
    Unknown,
}

impl FormatTag {
    /// Every tag, in detection-precedence order.
    pub const ALL: [Self; 8] = [
        Self::PostmanCollection,
        Self::PostmanEnvironment,
        Self::InsomniaExport,
        Self::OpenapiSpec,
        Self::NativeExport,
        Self::HarFile,
        Self::CurlText,
        Self::Unknown,
    ];

    /// The tag's snake_case name, matching its serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PostmanCollection => "postman_collection",
            Self::PostmanEnvironment => "postman_environment",
            Self::InsomniaExport => "insomnia_export",
            Self::OpenapiSpec => "openapi_spec",
            Self::NativeExport => "native_export",
            Self::HarFile => "har_file",
            Self::CurlText => "curl_text",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies raw input text, using `filename` only as a fallback hint.
///
/// Structural probes run in fixed precedence on the parsed JSON; a
/// structural match always wins over the filename. When the text is not
/// JSON, the filename hint still applies, so a corrupt `*.postman.json`
/// routes to the Postman decoder and fails there with a malformed-input
/// error instead of an unrecognized-format error. Text that is neither JSON
/// nor hinted is cURL when it contains a `curl ` invocation.
#[must_use]
pub fn detect_format(text: &str, filename: Option<&str>) -> FormatTag {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => detect_structural(&json)
            .or_else(|| detect_by_filename(filename))
            .unwrap_or(FormatTag::Unknown),
        Err(_) => detect_by_filename(filename).unwrap_or_else(|| {
            if text.contains("curl ") {
                FormatTag::CurlText
            } else {
                FormatTag::Unknown
            }
        }),
    }
}

fn detect_structural(json: &serde_json::Value) -> Option<FormatTag> {
    if json.pointer("/info/schema").is_some() && json.get("item").is_some() {
        return Some(FormatTag::PostmanCollection);
    }
    if json.get("name").is_some() && json.get("values").is_some_and(serde_json::Value::is_array) {
        return Some(FormatTag::PostmanEnvironment);
    }
    if json.get("_type").and_then(serde_json::Value::as_str) == Some("export")
        && json.get("resources").is_some_and(serde_json::Value::is_array)
    {
        return Some(FormatTag::InsomniaExport);
    }
    if json.get("openapi").is_some() || json.get("swagger").is_some() {
        return Some(FormatTag::OpenapiSpec);
    }
    if json.get("quiver_export").is_some()
        || json.get("quiver_collection").is_some()
        || json.get("quiver_environments").is_some()
    {
        return Some(FormatTag::NativeExport);
    }
    if json.pointer("/log/entries").is_some() {
        return Some(FormatTag::HarFile);
    }
    None
}

fn detect_by_filename(filename: Option<&str>) -> Option<FormatTag> {
    let name = filename?.to_lowercase();
    if name.contains("postman") {
        Some(FormatTag::PostmanCollection)
    } else if name.contains("insomnia") {
        Some(FormatTag::InsomniaExport)
    } else if name.contains(".har") {
        Some(FormatTag::HarFile)
    } else {
        None
    }
}
