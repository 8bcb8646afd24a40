use std::collections::HashMap;
use std::str;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;

/// The payload of a [`Response`]: the raw bytes the transport handed
/// back, or the decoded document when the server declared
/// `Content-Type: application/json`.
#[derive(Clone, PartialEq, Debug)]
pub enum Body {
    /// The body bytes, stored unchanged.
    Raw(Vec<u8>),
    /// The body decoded as JSON. A body that declared JSON but failed to
    /// parse decodes to [`Value::Null`] rather than an error; callers that
    /// need to distinguish should use [`Response::json`].
    Json(Value),
}

impl Body {
    /// Returns the raw bytes, or `None` for a decoded JSON body.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Body::Raw(bytes) => Some(bytes),
            Body::Json(_) => None,
        }
    }

    /// Returns the raw bytes as UTF-8 text. `None` for a decoded JSON
    /// body, or when the bytes are not UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Body::Raw(bytes) => str::from_utf8(bytes).ok(),
            Body::Json(_) => None,
        }
    }

    /// Returns the decoded JSON document, or `None` for a raw body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Raw(_) => None,
            Body::Json(value) => Some(value),
        }
    }
}

/// The parsed outcome of one request: body, status code, and response
/// headers.
///
/// Built at the end of [`Request::run`](crate::Request::run), or directly
/// via [`Response::new`] when the pieces come from somewhere else. Never
/// mutated after construction.
///
/// # Example
///
/// ```
/// let response = easyreq::Response::new(
///     "{\"user\":\"user2\"}",
///     200,
///     "Content-Type: application/json\nRandom-Header: test",
/// );
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.header("Random-Header"), Some("test"));
/// assert!(response.body().as_json().is_some());
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct Response {
    body: Body,
    status: i32,
    headers: HashMap<String, String>,
}

impl Response {
    /// Parses a raw body, status code, and header blob into a `Response`.
    ///
    /// The blob is split into lines, and each line into a name and a value
    /// at the first `": "`. Names are lowercased for storage, values are
    /// trimmed. Lines without the separator (the status line, blank
    /// separators) are skipped, entries whose name or value is empty are
    /// dropped, and a name that occurs twice keeps the last value.
    ///
    /// When the parsed `content-type` is exactly `application/json`, the
    /// body is decoded into [`Body::Json`]; any other content type,
    /// including ones with a charset suffix, keeps the bytes raw.
    pub fn new<B: Into<Vec<u8>>>(body: B, status: i32, headers: &str) -> Response {
        let headers = parse_headers(headers);
        let body = body.into();
        let body = if headers.get("content-type").map(String::as_str) == Some("application/json") {
            Body::Json(serde_json::from_slice(&body).unwrap_or(Value::Null))
        } else {
            Body::Raw(body)
        };
        Response {
            body,
            status,
            headers,
        }
    }

    /// Returns the body: raw bytes, or the decoded document when the
    /// server declared JSON.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Returns the HTTP status code, eg. 404.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Looks up a response header by name, case-insensitively. The
    /// returned value is trimmed. `None` means the server did not send the
    /// header (or sent it with an empty value).
    pub fn header<T: AsRef<str>>(&self, name: T) -> Option<&str> {
        self.headers
            .get(&name.as_ref().to_lowercase())
            .map(String::as_str)
    }

    /// Returns all response headers. The header field names (the keys) are
    /// all lowercase.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Converts the body to a `struct` using Serde.
    ///
    /// Works on raw bodies too, so it does not depend on the server
    /// declaring the right content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if Serde runs into a
    /// problem converting the body to a `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::Value;
    ///
    /// # fn main() -> Result<(), easyreq::Error> {
    /// let response = easyreq::Response::new("{\"name\":\"user2\"}", 200, "");
    /// // Value could be any type that implements Deserialize!
    /// let user = response.json::<Value>()?;
    /// assert_eq!(user["name"], "user2");
    /// # Ok(())
    /// # }
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match &self.body {
            Body::Json(value) => serde_json::from_value(value.clone()).map_err(Error::Json),
            Body::Raw(bytes) => serde_json::from_slice(bytes).map_err(Error::Json),
        }
    }
}

fn parse_headers(blob: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for line in blob.split('\n') {
        // Lines without the separator are status lines or noise.
        if let Some((name, value)) = line.split_once(": ") {
            let name = name.to_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            headers.insert(name, value.to_string());
        }
    }
    headers
}
