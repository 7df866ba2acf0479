//! HTTP Archive (HAR 1.2) decoder.
//!
//! Only the request half of each log entry matters here; responses and
//! timings are captured traffic, not collection content.

use serde::Deserialize;

use quiver_domain::{Body, CollectionBuilder, HttpMethod, KeyValue, Request};

use super::{DecodeError, ImportBundle, ImportLimits};
use crate::import::warning::ImportWarning;

#[derive(Debug, Deserialize)]
struct HarFile {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    #[serde(default)]
    request: Option<HarRequest>,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    #[serde(default)]
    method: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    headers: Vec<HarPair>,
    #[serde(rename = "queryString", default)]
    query_string: Vec<HarPair>,
    #[serde(default)]
    cookies: Vec<HarPair>,
    #[serde(rename = "postData", default)]
    post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
struct HarPair {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct HarPostData {
    #[serde(rename = "mimeType", default)]
    mime_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    params: Vec<HarPair>,
}

/// Decodes a HAR capture into one collection named "HAR Import".
///
/// Entries without a URL or with an unsupported method are skipped; an
/// archive can mix browser-internal traffic with the calls worth keeping.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRequiredField`] when `log` is absent,
/// [`DecodeError::MalformedInput`] when the JSON does not parse, and
/// [`DecodeError::TooManyItems`] when the entry count exceeds `limits`.
pub fn decode(text: &str, limits: &ImportLimits) -> Result<ImportBundle, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    if json.get("log").is_none() {
        return Err(DecodeError::MissingRequiredField("log".to_string()));
    }

    let archive: HarFile =
        serde_json::from_value(json).map_err(|e| DecodeError::MalformedInput(e.to_string()))?;

    let count = archive.log.entries.len();
    if count > limits.max_items {
        return Err(DecodeError::TooManyItems {
            count,
            max: limits.max_items,
        });
    }

    let mut bundle = ImportBundle::default();
    let mut builder = CollectionBuilder::new("HAR Import");

    for (index, entry) in archive.log.entries.iter().enumerate() {
        let Some(request) = entry.request.as_ref().filter(|r| !r.url.is_empty()) else {
            // Entries with no usable request are capture noise.
            continue;
        };
        if let Some(converted) = convert_request(index, request, &mut bundle) {
            builder
                .add_request(converted, None)
                .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        }
    }

    bundle.collections.push(builder.build());
    Ok(bundle)
}

fn convert_request(
    index: usize,
    source: &HarRequest,
    bundle: &mut ImportBundle,
) -> Option<Request> {
    let Ok(method) = source.method.parse::<HttpMethod>() else {
        bundle.skip(ImportWarning::error(
            format!("entries[{index}]"),
            format!("unsupported HTTP method '{}'", source.method),
        ));
        return None;
    };

    let name = format!("{method} {}", source.url);
    let mut request = Request::new(name, method, &source.url);
    request.headers = pairs(&source.headers);
    request.params = pairs(&source.query_string);
    request.cookies = pairs(&source.cookies);

    if let Some(post_data) = &source.post_data {
        request = request.with_body(convert_body(index, post_data, bundle));
    }
    Some(request)
}

fn pairs(source: &[HarPair]) -> Vec<KeyValue> {
    source
        .iter()
        .map(|p| KeyValue::new(&p.name, &p.value))
        .collect()
}

fn convert_body(index: usize, post_data: &HarPostData, bundle: &mut ImportBundle) -> Body {
    if !post_data.params.is_empty() {
        return Body::form(pairs(&post_data.params));
    }
    let Some(text) = post_data.text.as_ref().filter(|t| !t.is_empty()) else {
        return Body::None;
    };
    if post_data.mime_type.contains("json") {
        return Body::json(text);
    }
    if post_data.mime_type.contains("urlencoded") {
        bundle.warnings.push(ImportWarning::info(
            format!("entries[{index}]"),
            "urlencoded body kept as raw text (no parsed params present)",
        ));
        return Body::raw(text);
    }
    Body::raw(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn har_json(entries: &str) -> String {
        format!(r#"{{"log":{{"version":"1.2","entries":{entries}}}}}"#)
    }

    #[test]
    fn test_entries_become_requests() {
        let text = har_json(
            r#"[
                {"request":{"method":"GET","url":"https://api.example.com/users?page=1",
                    "headers":[{"name":"Accept","value":"application/json"}],
                    "queryString":[{"name":"page","value":"1"}],
                    "cookies":[{"name":"session","value":"abc"}]}},
                {"request":{"method":"POST","url":"https://api.example.com/users",
                    "postData":{"mimeType":"application/json","text":"{\"name\":\"a\"}"}}}
            ]"#,
        );

        let bundle = decode(&text, &ImportLimits::default()).unwrap();
        let collection = &bundle.collections[0];
        assert_eq!(collection.name, "HAR Import");
        assert_eq!(collection.request_count(), 2);

        let get = &collection.requests[0];
        assert_eq!(get.name, "GET https://api.example.com/users?page=1");
        assert_eq!(get.headers, vec![KeyValue::new("Accept", "application/json")]);
        assert_eq!(get.params, vec![KeyValue::new("page", "1")]);
        assert_eq!(get.cookies, vec![KeyValue::new("session", "abc")]);

        let post = &collection.requests[1];
        assert_eq!(post.body, Body::json(r#"{"name":"a"}"#));
    }

    #[test]
    fn test_form_params_win_over_text() {
        let text = har_json(
            r#"[{"request":{"method":"POST","url":"https://x",
                "postData":{"mimeType":"application/x-www-form-urlencoded",
                    "text":"a=1&b=2",
                    "params":[{"name":"a","value":"1"},{"name":"b","value":"2"}]}}}]"#,
        );

        let bundle = decode(&text, &ImportLimits::default()).unwrap();
        assert_eq!(
            bundle.collections[0].requests[0].body,
            Body::form(vec![KeyValue::new("a", "1"), KeyValue::new("b", "2")])
        );
    }

    #[test]
    fn test_entry_without_url_is_silently_dropped() {
        let text = har_json(
            r#"[
                {"request":{"method":"GET","url":""}},
                {"request":{"method":"GET","url":"https://x"}}
            ]"#,
        );

        let bundle = decode(&text, &ImportLimits::default()).unwrap();
        assert_eq!(bundle.collections[0].request_count(), 1);
        assert_eq!(bundle.skipped, 0);
    }

    #[test]
    fn test_unknown_method_is_skipped_with_warning() {
        let text = har_json(
            r#"[{"request":{"method":"CONNECT","url":"https://x"}}]"#,
        );

        let bundle = decode(&text, &ImportLimits::default()).unwrap();
        assert_eq!(bundle.collections[0].request_count(), 0);
        assert_eq!(bundle.skipped, 1);
        assert!(bundle.warnings[0].is_error());
    }

    #[test]
    fn test_missing_log_aborts() {
        let err = decode(r#"{"entries":[]}"#, &ImportLimits::default()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredField(f) if f == "log"));
    }

    #[test]
    fn test_entry_limit() {
        let entries: Vec<String> = (0..4)
            .map(|i| format!(r#"{{"request":{{"method":"GET","url":"https://x/{i}"}}}}"#))
            .collect();
        let text = har_json(&format!("[{}]", entries.join(",")));
        let limits = ImportLimits {
            max_items: 2,
            ..ImportLimits::default()
        };

        let err = decode(&text, &limits).unwrap_err();
        assert!(matches!(err, DecodeError::TooManyItems { count: 4, max: 2 }));
    }
}
