//! cURL command text decoder.
//!
//! Parses pasted shell text holding one or more `curl` invocations. This is
//! a pragmatic tokenizer, not a shell: quoted strings and a handful of
//! common flags are understood, everything else is ignored.

use std::sync::LazyLock;

use regex::Regex;

use quiver_domain::{Auth, Body, CollectionBuilder, HttpMethod, Request};

use super::{DecodeError, ImportBundle, ImportLimits};
use crate::import::warning::ImportWarning;

/// Double-quoted, single-quoted, or bare tokens.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#""([^"]*)"|'([^']*)'|(\S+)"#).expect("token pattern is valid")
});

/// Decodes cURL command text into one collection named "cURL Import".
///
/// # Errors
///
/// Returns [`DecodeError::MalformedInput`] when no command yields a usable
/// request, and [`DecodeError::TooManyItems`] when the command count
/// exceeds `limits`.
pub fn decode(text: &str, limits: &ImportLimits) -> Result<ImportBundle, DecodeError> {
    // Line continuations first, so one command tokenizes as one stream.
    let joined = text.replace("\\\r\n", " ").replace("\\\n", " ");
    let commands = split_commands(&joined);

    if commands.len() > limits.max_items {
        return Err(DecodeError::TooManyItems {
            count: commands.len(),
            max: limits.max_items,
        });
    }

    let mut bundle = ImportBundle::default();
    let mut builder = CollectionBuilder::new("cURL Import");

    for (index, command) in commands.iter().enumerate() {
        if let Some(request) = parse_command(index, command, &mut bundle) {
            builder
                .add_request(request, None)
                .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
        }
    }

    if builder.is_empty() {
        return Err(DecodeError::MalformedInput(
            "no curl command with a URL found".to_string(),
        ));
    }

    bundle.collections.push(builder.build());
    Ok(bundle)
}

/// Splits the text at every `curl ` that starts a command (start of input
/// or preceded by whitespace).
fn split_commands(text: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    for (at, _) in text.match_indices("curl ") {
        let preceded_by_space = text[..at]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if preceded_by_space {
            starts.push(at);
        }
    }

    let mut commands = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        commands.push(text[start..end].trim());
    }
    commands
}

fn tokenize(command: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(command)
        .filter_map(|capture| {
            capture
                .get(1)
                .or_else(|| capture.get(2))
                .or_else(|| capture.get(3))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

fn parse_command(index: usize, command: &str, bundle: &mut ImportBundle) -> Option<Request> {
    let tokens = tokenize(command);
    let path = format!("command[{index}]");

    let mut method_text: Option<String> = None;
    let mut url: Option<String> = None;
    let mut headers: Vec<(String, String)> = Vec::new();
    let mut cookies: Vec<(String, String)> = Vec::new();
    let mut body: Option<String> = None;
    let mut auth = Auth::None;

    let mut iter = tokens.iter().skip(1).peekable();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "-X" | "--request" => method_text = iter.next().cloned(),
            "-H" | "--header" => {
                if let Some(header) = iter.next() {
                    let (key, value) = header
                        .split_once(':')
                        .map_or((header.as_str(), ""), |(k, v)| (k, v));
                    headers.push((key.trim().to_string(), value.trim().to_string()));
                }
            }
            "-d" | "--data" | "--data-raw" => body = iter.next().cloned(),
            "-b" | "--cookie" => {
                if let Some(jar) = iter.next() {
                    for pair in jar.split(';') {
                        if let Some((key, value)) = pair.split_once('=') {
                            cookies.push((key.trim().to_string(), value.trim().to_string()));
                        }
                    }
                }
            }
            "-u" | "--user" => {
                if let Some(credentials) = iter.next() {
                    let (username, password) = credentials
                        .split_once(':')
                        .map_or((credentials.as_str(), ""), |(u, p)| (u, p));
                    auth = Auth::basic(username, password);
                }
            }
            "--url" => url = iter.next().cloned(),
            // Unknown flags are dropped without consuming an argument; a
            // flag's value is then harmlessly mistaken for the URL only
            // when no real URL follows it.
            flag if flag.starts_with('-') => {}
            bare => {
                if url.is_none() {
                    url = Some(bare.to_string());
                }
            }
        }
    }

    let Some(url) = url else {
        bundle.skip(ImportWarning::error(&path, "curl command has no URL"));
        return None;
    };

    let method_text = method_text.unwrap_or_else(|| "GET".to_string());
    let Ok(method) = method_text.parse::<HttpMethod>() else {
        bundle.skip(ImportWarning::error(
            &path,
            format!("unsupported HTTP method '{method_text}'"),
        ));
        return None;
    };

    let mut request = Request::new(format!("{method} {url}"), method, url);
    for (key, value) in headers {
        request = request.with_header(key, value);
    }
    for (key, value) in cookies {
        request.cookies.push(quiver_domain::KeyValue::new(key, value));
    }
    if !auth.is_none() {
        request = request.with_auth(auth);
    }
    if let Some(data) = body {
        request = request.with_body(Body::from_text(data));
    }
    Some(request)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quiver_domain::KeyValue;

    #[test]
    fn test_simple_get() {
        let bundle = decode("curl https://api.example.com/ping", &ImportLimits::default())
            .unwrap();
        let request = &bundle.collections[0].requests[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://api.example.com/ping");
        assert_eq!(request.name, "GET https://api.example.com/ping");
    }

    #[test]
    fn test_flags_and_quoting() {
        let text = r#"curl -X POST 'https://api.example.com/users' \
            -H "Content-Type: application/json" \
            -H 'Authorization: Bearer {{token}}' \
            --data '{"name":"alice"}'"#;

        let bundle = decode(text, &ImportLimits::default()).unwrap();
        let request = &bundle.collections[0].requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.example.com/users");
        assert_eq!(
            request.headers,
            vec![
                KeyValue::new("Content-Type", "application/json"),
                KeyValue::new("Authorization", "Bearer {{token}}"),
            ]
        );
        assert_eq!(request.body, Body::json(r#"{"name":"alice"}"#));
    }

    #[test]
    fn test_data_does_not_change_method() {
        let bundle = decode(
            "curl https://x -d 'a=1'",
            &ImportLimits::default(),
        )
        .unwrap();
        let request = &bundle.collections[0].requests[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.body, Body::raw("a=1"));
    }

    #[test]
    fn test_cookies_and_basic_auth() {
        let bundle = decode(
            "curl -b 'session=abc; theme=dark' -u admin:secret https://x",
            &ImportLimits::default(),
        )
        .unwrap();
        let request = &bundle.collections[0].requests[0];
        assert_eq!(
            request.cookies,
            vec![
                KeyValue::new("session", "abc"),
                KeyValue::new("theme", "dark"),
            ]
        );
        assert_eq!(request.auth, Auth::basic("admin", "secret"));
    }

    #[test]
    fn test_multiple_commands_in_one_paste() {
        let text = "curl https://x/one\ncurl -X DELETE https://x/two";
        let bundle = decode(text, &ImportLimits::default()).unwrap();
        let collection = &bundle.collections[0];
        assert_eq!(collection.name, "cURL Import");
        assert_eq!(collection.request_count(), 2);
        assert_eq!(collection.requests[1].method, HttpMethod::Delete);
    }

    #[test]
    fn test_command_without_url_is_skipped() {
        let text = "curl -X POST\ncurl https://x/kept";
        let bundle = decode(text, &ImportLimits::default()).unwrap();
        assert_eq!(bundle.collections[0].request_count(), 1);
        assert_eq!(bundle.skipped, 1);
    }

    #[test]
    fn test_no_usable_command_is_malformed() {
        let err = decode("curl -X POST", &ImportLimits::default()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput(_)));
    }

    #[test]
    fn test_unknown_verb_skips_command() {
        let text = "curl -X PURGE https://x\ncurl https://x/ok";
        let bundle = decode(text, &ImportLimits::default()).unwrap();
        assert_eq!(bundle.collections[0].request_count(), 1);
        assert!(bundle.warnings.iter().any(|w| w.message.contains("PURGE")));
    }
}
