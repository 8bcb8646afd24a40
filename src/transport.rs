use std::env;
use std::io;
use std::time::Duration;

use ureq::http;

use crate::{Error, OptionKey, OptionSet};

/// Checked for a whole-transfer timeout (in seconds) when a request does
/// not set one of its own.
const TIMEOUT_ENV: &str = "EASYREQ_TIMEOUT";

/// What a [`Transport`] hands back: the undecoded outcome of one round
/// trip.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawResponse {
    /// The response payload: the header block, when one was requested,
    /// immediately followed by the body.
    pub raw: Vec<u8>,
    /// Length in bytes of the header block at the start of `raw`. Zero
    /// when headers were not requested.
    pub header_size: usize,
    /// The final HTTP status code, after any redirects.
    pub status: i32,
}

/// The collaborator that performs the actual network I/O.
///
/// [`Request`](crate::Request) only describes requests and parses
/// responses; everything socket-shaped happens behind this trait.
/// Implementations are blocking: `execute` returns once the exchange has
/// finished or failed. The bundled implementation is [`UreqTransport`].
pub trait Transport: Send + Sync {
    /// Performs one blocking round trip described by `options`.
    ///
    /// Option keys an implementation does not understand are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] for anything that prevented a response:
    /// connection refused, DNS failure, TLS handshake problems, a timeout,
    /// or an option set the engine cannot express.
    fn execute(&self, options: &OptionSet) -> Result<RawResponse, Error>;
}

/// The bundled [`Transport`], backed by [ureq](https://docs.rs/ureq).
///
/// An engine agent is configured from scratch for every call, so requests
/// are independent: no connection pooling, no shared cookies. HTTP error
/// statuses come back as data, never as `Err`. Bodies are read fully into
/// memory, subject to ureq's default body size limit.
#[derive(Clone, Copy, Default, Debug)]
pub struct UreqTransport;

impl UreqTransport {
    /// Creates the transport. It is stateless; this exists for symmetry
    /// with transports that need configuration.
    pub fn new() -> UreqTransport {
        UreqTransport
    }
}

impl Transport for UreqTransport {
    fn execute(&self, options: &OptionSet) -> Result<RawResponse, Error> {
        let mut url = target_url(options)?;
        if let Some(port) = options.get_int(OptionKey::Port) {
            url = override_port(&url, port)?;
        }
        let method = effective_method(options);
        log::debug!("{} {}", method, url);

        if options.get_bool(OptionKey::ReturnTransfer) == Some(false) {
            log::warn!("return-transfer is disabled, but this transport always returns the payload");
        }

        let body = options.get_str(OptionKey::PostFields);
        let mut request = http::Request::builder().method(method).uri(url.as_str());
        let mut has_content_type = false;
        for line in options.get_lines(OptionKey::HttpHeader).unwrap_or(&[]) {
            let (name, value) = split_header_line(line);
            if name.eq_ignore_ascii_case("content-type") {
                has_content_type = true;
            }
            request = request.header(name, value);
        }
        if body.is_some() && !has_content_type {
            request = request.header("Content-Type", "application/x-www-form-urlencoded");
        }
        let request = request
            .body(body.map(|fields| fields.as_bytes().to_vec()).unwrap_or_default())
            .map_err(Error::transport)?;

        let agent = build_agent(options);
        let mut response = agent.run(request).map_err(Error::transport)?;

        let status = i32::from(response.status().as_u16());
        let mut raw = if options.get_bool(OptionKey::IncludeHeaders).unwrap_or(false) {
            render_header_block(&response)
        } else {
            Vec::new()
        };
        let header_size = raw.len();

        if options.get_bool(OptionKey::NoBody) != Some(true) {
            let body = response.body_mut().read_to_vec().map_err(Error::transport)?;
            raw.extend_from_slice(&body);
        }
        log::debug!("{} {} -> {} ({} bytes)", method, url, status, raw.len());

        Ok(RawResponse {
            raw,
            header_size,
            status,
        })
    }
}

/// Resolves the URL to call, prefixing the default protocol when the URL
/// carries no scheme of its own.
fn target_url(options: &OptionSet) -> Result<String, Error> {
    let url = match options.get_str(OptionKey::Url) {
        Some(url) => url,
        None => {
            return Err(Error::transport(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no url set",
            )))
        }
    };
    if url.contains("://") {
        Ok(url.to_string())
    } else {
        let scheme = options
            .get_str(OptionKey::DefaultProtocol)
            .unwrap_or("http");
        Ok(format!("{}://{}", scheme, url))
    }
}

/// Rewrites the URL's authority to use `port`, keeping the host.
fn override_port(url: &str, port: i64) -> Result<String, Error> {
    let uri: http::Uri = url.parse().map_err(Error::transport)?;
    let mut parts = uri.into_parts();
    let host = parts
        .authority
        .as_ref()
        .map(|authority| authority.host().to_string())
        .unwrap_or_default();
    let authority = format!("{}:{}", host, port)
        .parse::<http::uri::Authority>()
        .map_err(Error::transport)?;
    parts.authority = Some(authority);
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(http::uri::PathAndQuery::from_static("/"));
    }
    let uri = http::Uri::from_parts(parts).map_err(Error::transport)?;
    Ok(uri.to_string())
}

/// Picks the method to send. An explicit method always wins; otherwise a
/// headers-only probe is a HEAD, a request carrying a submission flag or a
/// body is a POST, and anything else is a GET.
fn effective_method(options: &OptionSet) -> &str {
    if let Some(method) = options.get_str(OptionKey::Method) {
        return method;
    }
    if options.get_bool(OptionKey::NoBody) == Some(true) {
        return "HEAD";
    }
    if options.get_bool(OptionKey::Post) == Some(true)
        || options.get_str(OptionKey::PostFields).is_some()
    {
        return "POST";
    }
    "GET"
}

/// Splits a serialized header line back into name and value. A line
/// without the `" : "` separator is a bare name with an empty value.
fn split_header_line(line: &str) -> (&str, &str) {
    match line.split_once(" : ") {
        Some((name, value)) => (name, value),
        None => (line, ""),
    }
}

fn build_agent(options: &OptionSet) -> ureq::Agent {
    let mut config = ureq::Agent::config_builder().http_status_as_error(false);

    if options.get_bool(OptionKey::FollowRedirects) == Some(true) {
        let max = match options.get_int(OptionKey::MaxRedirects) {
            Some(max) if max >= 0 => max as u32,
            // curl uses a negative cap for "unlimited".
            Some(_) => u32::MAX,
            None => 3,
        };
        config = config.max_redirects(max);
    } else {
        config = config.max_redirects(0).max_redirects_will_error(false);
    }

    if let Some(seconds) = connect_timeout(options) {
        config = config.timeout_connect(Some(Duration::from_secs(seconds)));
    }
    if let Some(seconds) = total_timeout(options) {
        config = config.timeout_global(Some(Duration::from_secs(seconds)));
    }

    if options.get_bool(OptionKey::SslVerifyPeer) == Some(false) {
        config = config.tls_config(
            ureq::tls::TlsConfig::builder()
                .disable_verification(true)
                .build(),
        );
    }

    config.build().new_agent()
}

fn connect_timeout(options: &OptionSet) -> Option<u64> {
    u64::try_from(options.get_int(OptionKey::ConnectTimeout)?).ok()
}

/// The whole-transfer timeout: the request's own, or the `EASYREQ_TIMEOUT`
/// environment variable when the request sets none.
fn total_timeout(options: &OptionSet) -> Option<u64> {
    if let Some(seconds) = options.get_int(OptionKey::Timeout) {
        return u64::try_from(seconds).ok();
    }
    env::var(TIMEOUT_ENV).ok()?.parse().ok()
}

/// Renders the response's status line and headers the way they would have
/// appeared on the wire, terminated by an empty line.
fn render_header_block<B>(response: &http::Response<B>) -> Vec<u8> {
    let status = response.status();
    let mut block = format!(
        "{:?} {} {}\r\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
    );
    for (name, value) in response.headers() {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block.push_str("\r\n");
    block.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionValue;

    fn options_with(entries: &[(OptionKey, OptionValue)]) -> OptionSet {
        let mut options = OptionSet::new();
        for (key, value) in entries {
            options.insert(*key, value.clone());
        }
        options
    }

    #[test]
    fn explicit_method_wins() {
        let options = options_with(&[
            (OptionKey::Method, OptionValue::Str(String::from("DELETE"))),
            (OptionKey::NoBody, OptionValue::Bool(true)),
            (OptionKey::Post, OptionValue::Bool(true)),
        ]);
        assert_eq!(effective_method(&options), "DELETE");
    }

    #[test]
    fn method_is_inferred_when_not_set() {
        assert_eq!(effective_method(&OptionSet::new()), "GET");

        let probe = options_with(&[(OptionKey::NoBody, OptionValue::Bool(true))]);
        assert_eq!(effective_method(&probe), "HEAD");

        let flagged = options_with(&[(OptionKey::Post, OptionValue::Bool(true))]);
        assert_eq!(effective_method(&flagged), "POST");

        let with_body = options_with(&[(
            OptionKey::PostFields,
            OptionValue::Str(String::from("a=b")),
        )]);
        assert_eq!(effective_method(&with_body), "POST");
    }

    #[test]
    fn bare_urls_get_the_default_protocol() {
        let options = options_with(&[(
            OptionKey::Url,
            OptionValue::Str(String::from("example.com/path")),
        )]);
        assert_eq!(target_url(&options).unwrap(), "http://example.com/path");

        let https = options_with(&[
            (OptionKey::Url, OptionValue::Str(String::from("example.com"))),
            (
                OptionKey::DefaultProtocol,
                OptionValue::Str(String::from("https")),
            ),
        ]);
        assert_eq!(target_url(&https).unwrap(), "https://example.com");
    }

    #[test]
    fn urls_with_a_scheme_pass_through() {
        let options = options_with(&[
            (
                OptionKey::Url,
                OptionValue::Str(String::from("https://example.com/x?q=1")),
            ),
            (
                OptionKey::DefaultProtocol,
                OptionValue::Str(String::from("ftp")),
            ),
        ]);
        assert_eq!(target_url(&options).unwrap(), "https://example.com/x?q=1");
    }

    #[test]
    fn a_missing_url_is_an_error() {
        assert!(target_url(&OptionSet::new()).is_err());
    }

    #[test]
    fn port_override_rewrites_the_authority() {
        assert_eq!(
            override_port("http://localhost/a?b=c", 8080).unwrap(),
            "http://localhost:8080/a?b=c"
        );
        assert_eq!(
            override_port("http://localhost:1234/a", 8080).unwrap(),
            "http://localhost:8080/a"
        );
        assert_eq!(
            override_port("http://localhost", 8080).unwrap(),
            "http://localhost:8080/"
        );
        assert!(override_port("http://localhost/a", -1).is_err());
    }

    #[test]
    fn header_lines_split_back_into_name_and_value() {
        assert_eq!(
            split_header_line("Authorization : Bearer a : b"),
            ("Authorization", "Bearer a : b")
        );
        assert_eq!(split_header_line("X-Flag"), ("X-Flag", ""));
    }

    #[test]
    fn header_block_renders_like_the_wire() {
        let response = http::Response::builder()
            .status(404)
            .header("Content-Type", "text/plain")
            .header("X-Twice", "1")
            .header("X-Twice", "2")
            .body(())
            .unwrap();
        let block = String::from_utf8(render_header_block(&response)).unwrap();
        assert!(block.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(block.contains("content-type: text/plain\r\n"));
        assert!(block.contains("x-twice: 1\r\n"));
        assert!(block.contains("x-twice: 2\r\n"));
        assert!(block.ends_with("\r\n\r\n"));
    }

    #[test]
    fn total_timeout_prefers_the_option_over_the_environment() {
        env::remove_var(TIMEOUT_ENV);
        assert_eq!(total_timeout(&OptionSet::new()), None);

        env::set_var(TIMEOUT_ENV, "8");
        assert_eq!(total_timeout(&OptionSet::new()), Some(8));

        let explicit = options_with(&[(OptionKey::Timeout, OptionValue::Int(2))]);
        assert_eq!(total_timeout(&explicit), Some(2));
        env::remove_var(TIMEOUT_ENV);
    }

    #[test]
    fn negative_timeouts_are_ignored() {
        let options = options_with(&[
            (OptionKey::ConnectTimeout, OptionValue::Int(-1)),
            (OptionKey::Timeout, OptionValue::Int(-1)),
        ]);
        assert_eq!(connect_timeout(&options), None);
        assert_eq!(total_timeout(&options), None);
    }
}
