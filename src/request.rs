use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::{
    Error, OptionKey, OptionSet, OptionValue, RawResponse, Response, Transport, UreqTransport,
};

/// A URL type for requests.
pub type URL = String;

/// The body of a POST-style request.
///
/// Form fields are URL-encoded into `key=value&key2=value2` when the body
/// is set; a raw payload (a pre-serialized JSON document, usually) is
/// passed through unchanged.
///
/// # Example
///
/// ```
/// use easyreq::Payload;
///
/// let fields = Payload::from(&[("user", "user2")]);
/// let raw = Payload::from("{\"user\":\"user2\"}");
/// assert_ne!(fields, raw);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Payload {
    /// Key/value form fields.
    Fields(Vec<(String, String)>),
    /// A pre-serialized body.
    Raw(String),
}

impl Payload {
    /// Serializes `value` to JSON and wraps it as a raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if Serde cannot serialize `value`.
    pub fn json<T: Serialize>(value: &T) -> Result<Payload, Error> {
        serde_json::to_string(value)
            .map(Payload::Raw)
            .map_err(Error::Json)
    }

    fn encode(&self) -> String {
        match self {
            Payload::Fields(fields) => {
                encode_query(fields.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            }
            Payload::Raw(raw) => raw.clone(),
        }
    }
}

impl From<&[(&str, &str)]> for Payload {
    fn from(fields: &[(&str, &str)]) -> Payload {
        Payload::Fields(
            fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }
}

impl<const N: usize> From<&[(&str, &str); N]> for Payload {
    fn from(fields: &[(&str, &str); N]) -> Payload {
        Payload::from(&fields[..])
    }
}

impl From<Vec<(String, String)>> for Payload {
    fn from(fields: Vec<(String, String)>) -> Payload {
        Payload::Fields(fields)
    }
}

impl From<&str> for Payload {
    fn from(raw: &str) -> Payload {
        Payload::Raw(raw.to_string())
    }
}

impl From<String> for Payload {
    fn from(raw: String) -> Payload {
        Payload::Raw(raw)
    }
}

/// An HTTP request under construction.
///
/// The setters return `&mut Request` so calls chain; the verb methods
/// ([`get`](Request::get), [`post`](Request::post) and friends) fill in
/// the last pieces and execute. A builder stays usable after a verb call:
/// options set earlier are kept, so it can be reconfigured and run again.
///
/// For one-shot requests there are [free functions](crate::get) that do
/// the same on a fresh builder.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), easyreq::Error> {
/// let mut request = easyreq::Request::new();
/// let response = request
///     .set_bearer("hunter2")
///     .set_timeout(10)
///     .get("https://example.com/users", &[("page", "2")])?;
/// assert_eq!(response.status(), 200);
/// # Ok(())
/// # }
/// ```
pub struct Request {
    options: OptionSet,
    headers: BTreeMap<String, String>,
    transport: Box<dyn Transport>,
    result: Option<Response>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Request")
            .field("options", &self.options)
            .field("headers", &self.headers)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl Default for Request {
    fn default() -> Request {
        Request::new()
    }
}

impl Request {
    /// Creates a builder wired to the bundled [`UreqTransport`].
    ///
    /// Every builder starts from the same defaults: plain "http" for URLs
    /// without a scheme, the payload returned to the caller, redirects
    /// followed up to 3 hops, response headers included, and a 10 second
    /// connect timeout.
    pub fn new() -> Request {
        Request::with_transport(UreqTransport::new())
    }

    /// Creates a builder that executes through `transport` instead of the
    /// bundled one. The option defaults are the same as [`Request::new`].
    pub fn with_transport<T: Transport + 'static>(transport: T) -> Request {
        Request {
            options: default_options(),
            headers: BTreeMap::new(),
            transport: Box::new(transport),
            result: None,
        }
    }

    /// Stores a transport option, overwriting any previous value under the
    /// same key.
    ///
    /// No validation happens here: whether the value makes sense for the
    /// key is between the caller and the transport. The named setters
    /// below cover the common options.
    pub fn set_option(&mut self, key: OptionKey, value: OptionValue) -> &mut Request {
        self.options.insert(key, value);
        self
    }

    /// Sets the URL to call. The verb methods overwrite this.
    pub fn set_url<T: Into<URL>>(&mut self, url: T) -> &mut Request {
        self.set_option(OptionKey::Url, OptionValue::Str(url.into()))
    }

    /// Sets the request method, uppercased, overriding whatever the verb
    /// methods or the transport would infer.
    pub fn set_request_method<T: AsRef<str>>(&mut self, method: T) -> &mut Request {
        self.set_option(
            OptionKey::Method,
            OptionValue::Str(method.as_ref().to_uppercase()),
        )
    }

    /// Sets the request body. Form fields are URL-encoded; a raw payload
    /// is passed through unchanged.
    pub fn set_post_fields<P: Into<Payload>>(&mut self, payload: P) -> &mut Request {
        let encoded = payload.into().encode();
        self.set_option(OptionKey::PostFields, OptionValue::Str(encoded))
    }

    /// Marks or unmarks the request as a form-style POST submission.
    pub fn set_post(&mut self, value: bool) -> &mut Request {
        self.set_option(OptionKey::Post, OptionValue::Bool(value))
    }

    /// Sets whether the transport follows redirect responses. When it does
    /// not, a redirect comes back as an ordinary response with a 3xx
    /// status.
    pub fn set_follow_redirects(&mut self, value: bool) -> &mut Request {
        self.set_option(OptionKey::FollowRedirects, OptionValue::Bool(value))
    }

    /// Caps how many redirects are followed before the transport reports
    /// an error. Only meaningful while
    /// [`set_follow_redirects`](Request::set_follow_redirects) is on.
    pub fn set_max_redirects(&mut self, value: u32) -> &mut Request {
        self.set_option(OptionKey::MaxRedirects, OptionValue::Int(i64::from(value)))
    }

    /// Set to false to skip verification of the peer's TLS certificate.
    /// Useful against self-signed certificates in test environments, and a
    /// bad idea everywhere else.
    pub fn set_ssl_verify_peer(&mut self, value: bool) -> &mut Request {
        self.set_option(OptionKey::SslVerifyPeer, OptionValue::Bool(value))
    }

    /// Sets the maximum time in seconds for establishing the connection.
    pub fn set_connect_timeout(&mut self, seconds: u64) -> &mut Request {
        self.set_option(OptionKey::ConnectTimeout, OptionValue::Int(seconds as i64))
    }

    /// Sets the maximum time in seconds for the whole transfer. Without
    /// this, the `EASYREQ_TIMEOUT` environment variable applies, and
    /// without that the transfer can take however long it takes.
    pub fn set_timeout(&mut self, seconds: u64) -> &mut Request {
        self.set_option(OptionKey::Timeout, OptionValue::Int(seconds as i64))
    }

    /// Connects to `port` instead of the one in the URL.
    pub fn set_port(&mut self, port: u16) -> &mut Request {
        self.set_option(OptionKey::Port, OptionValue::Int(i64::from(port)))
    }

    /// Sets an outgoing header. Names are kept verbatim, so "Accept" and
    /// "accept" are two different headers here; setting the same name
    /// again replaces the value. A header with an empty value is sent as
    /// the bare name.
    pub fn set_header<K: Into<String>, V: Into<String>>(
        &mut self,
        key: K,
        value: V,
    ) -> &mut Request {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the `Authorization` header to a bearer token.
    pub fn set_bearer<T: AsRef<str>>(&mut self, token: T) -> &mut Request {
        self.set_header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Serializes `value` to JSON, makes it the request body, and sets
    /// `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if Serde cannot serialize `value`.
    pub fn set_json<T: Serialize>(&mut self, value: &T) -> Result<&mut Request, Error> {
        let payload = Payload::json(value)?;
        self.set_header("Content-Type", "application/json");
        Ok(self.set_post_fields(payload))
    }

    /// Does a GET request: `parameters` are URL-encoded and appended to
    /// the URL as a query string, and the request executes.
    ///
    /// The `?` separator is appended even when `parameters` is empty, so
    /// `get("http://host/a", &[])` requests `http://host/a?`. Existing
    /// callers depend on the exact URLs this produces, quirk included.
    ///
    /// # Errors
    ///
    /// Whatever the transport reports, as [`Error::Transport`]. HTTP error
    /// statuses are not transport failures; they come back as ordinary
    /// responses.
    pub fn get<T: AsRef<str>>(
        &mut self,
        url: T,
        parameters: &[(&str, &str)],
    ) -> Result<Response, Error> {
        self.set_option(OptionKey::HttpGet, OptionValue::Bool(true));
        self.set_request_method("GET");
        let url = build_url(url.as_ref(), parameters);
        self.set_url(url);
        self.run()
    }

    /// Does a POST request: the URL is used unchanged and `payload`
    /// becomes the request body.
    ///
    /// # Errors
    ///
    /// See [`Request::get`].
    pub fn post<T: AsRef<str>, P: Into<Payload>>(
        &mut self,
        url: T,
        payload: P,
    ) -> Result<Response, Error> {
        self.set_url(url.as_ref());
        self.set_request_method("POST");
        self.set_post_fields(payload);
        self.set_post(true);
        self.run()
    }

    /// Does a PUT request: like [`post`](Request::post) with the method
    /// replaced.
    ///
    /// # Errors
    ///
    /// See [`Request::get`].
    pub fn put<T: AsRef<str>, P: Into<Payload>>(
        &mut self,
        url: T,
        payload: P,
    ) -> Result<Response, Error> {
        self.set_url(url.as_ref());
        self.set_request_method("PUT");
        self.set_post_fields(payload);
        self.set_post(true);
        self.run()
    }

    /// Does a PATCH request: like [`post`](Request::post) with the method
    /// replaced.
    ///
    /// # Errors
    ///
    /// See [`Request::get`].
    pub fn patch<T: AsRef<str>, P: Into<Payload>>(
        &mut self,
        url: T,
        payload: P,
    ) -> Result<Response, Error> {
        self.set_url(url.as_ref());
        self.set_request_method("PATCH");
        self.set_post_fields(payload);
        self.set_post(true);
        self.run()
    }

    /// Does a DELETE request: `parameters` are appended to the URL the way
    /// [`get`](Request::get) appends them (trailing `?` included), and no
    /// body is sent.
    ///
    /// # Errors
    ///
    /// See [`Request::get`].
    pub fn delete<T: AsRef<str>>(
        &mut self,
        url: T,
        parameters: &[(&str, &str)],
    ) -> Result<Response, Error> {
        self.set_request_method("DELETE");
        let url = build_url(url.as_ref(), parameters);
        self.set_url(url);
        self.run()
    }

    /// Executes the accumulated request through the transport and parses
    /// the outcome into a [`Response`].
    ///
    /// The transport sees the builder's options plus the serialized header
    /// lines; the builder itself is left exactly as configured, so it can
    /// be adjusted and run again. The verb methods all end up here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the round trip failed.
    pub fn run(&mut self) -> Result<Response, Error> {
        let mut options = self.options.clone();
        options.insert(
            OptionKey::HttpHeader,
            OptionValue::Lines(serialize_headers(&self.headers)),
        );

        let raw = self.transport.execute(&options)?;
        let response = parse_raw(raw);
        self.result = Some(response.clone());
        Ok(response)
    }

    /// Checks whether `url` answers a headers-only probe with status 200.
    ///
    /// The probe runs on a fresh option set, not the builder's accumulated
    /// one, so redirects are not followed: a 3xx answer counts as "no",
    /// as does any other non-200 status. Transport failures (connection
    /// refused, DNS, timeouts) are swallowed and also answer false.
    pub fn exists<T: AsRef<str>>(&self, url: T) -> bool {
        let mut options = OptionSet::new();
        options.insert(OptionKey::Url, OptionValue::Str(url.as_ref().to_string()));
        options.insert(OptionKey::NoBody, OptionValue::Bool(true));

        match self.transport.execute(&options) {
            Ok(raw) => raw.status == 200,
            Err(err) => {
                log::debug!("existence probe for {} failed: {}", url.as_ref(), err);
                false
            }
        }
    }

    /// Returns the response of the most recent successful [`run`](Request::run)
    /// (or verb call), if there has been one.
    pub fn last_response(&self) -> Option<&Response> {
        self.result.as_ref()
    }
}

/// Does a GET request on a fresh builder. See [`Request::get`].
///
/// # Errors
///
/// See [`Request::get`].
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), easyreq::Error> {
/// let response = easyreq::get("http://example.com/users", &[("userId", "6")])?;
/// assert_eq!(response.status(), 200);
/// # Ok(())
/// # }
/// ```
pub fn get<T: AsRef<str>>(url: T, parameters: &[(&str, &str)]) -> Result<Response, Error> {
    Request::new().get(url, parameters)
}

/// Does a POST request on a fresh builder. See [`Request::post`].
///
/// # Errors
///
/// See [`Request::get`].
pub fn post<T: AsRef<str>, P: Into<Payload>>(url: T, payload: P) -> Result<Response, Error> {
    Request::new().post(url, payload)
}

/// Does a PUT request on a fresh builder. See [`Request::put`].
///
/// # Errors
///
/// See [`Request::get`].
pub fn put<T: AsRef<str>, P: Into<Payload>>(url: T, payload: P) -> Result<Response, Error> {
    Request::new().put(url, payload)
}

/// Does a PATCH request on a fresh builder. See [`Request::patch`].
///
/// # Errors
///
/// See [`Request::get`].
pub fn patch<T: AsRef<str>, P: Into<Payload>>(url: T, payload: P) -> Result<Response, Error> {
    Request::new().patch(url, payload)
}

/// Does a DELETE request on a fresh builder. See [`Request::delete`].
///
/// # Errors
///
/// See [`Request::get`].
pub fn delete<T: AsRef<str>>(url: T, parameters: &[(&str, &str)]) -> Result<Response, Error> {
    Request::new().delete(url, parameters)
}

/// Probes `url` on a fresh builder. See [`Request::exists`].
pub fn exists<T: AsRef<str>>(url: T) -> bool {
    Request::new().exists(url)
}

fn default_options() -> OptionSet {
    let mut options = OptionSet::new();
    options.insert(
        OptionKey::DefaultProtocol,
        OptionValue::Str(String::from("http")),
    );
    options.insert(OptionKey::ReturnTransfer, OptionValue::Bool(true));
    options.insert(OptionKey::FollowRedirects, OptionValue::Bool(true));
    options.insert(OptionKey::MaxRedirects, OptionValue::Int(3));
    options.insert(OptionKey::IncludeHeaders, OptionValue::Bool(true));
    options.insert(OptionKey::ConnectTimeout, OptionValue::Int(10));
    options
}

/// Builds `url?query`. The `?` goes in even for an empty parameter list;
/// see [`Request::get`].
fn build_url(url: &str, parameters: &[(&str, &str)]) -> String {
    format!("{}?{}", url, encode_query(parameters.iter().copied()))
}

fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut query = String::new();
    for (key, value) in pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&urlencoding::encode(key));
        query.push('=');
        query.push_str(&urlencoding::encode(value));
    }
    query
}

/// Serializes the outgoing header map into one line per header:
/// `"name : value"`, or the bare name when the value is empty.
fn serialize_headers(headers: &BTreeMap<String, String>) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            if value.is_empty() {
                name.clone()
            } else {
                format!("{} : {}", name, value)
            }
        })
        .collect()
}

/// Splits a transport payload at the reported header length and parses the
/// two halves.
fn parse_raw(raw: RawResponse) -> Response {
    let cut = raw.header_size.min(raw.raw.len());
    let (head, body) = raw.raw.split_at(cut);
    let head = String::from_utf8_lossy(head);
    Response::new(body, raw.status, &head)
}
