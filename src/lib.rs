//! # Easyreq
//!
//! Fluent, blocking HTTP client wrapper. The library has a small API
//! with curl-flavored bones: a [`Request`] builder accumulates a set of
//! transport options, a verb method dispatches them through a
//! [`Transport`], and the outcome comes back as a parsed [`Response`].
//! You'll probably know everything you need to after reading a few
//! examples.
//!
//! Note: this crate does not speak HTTP itself. The protocol work
//! happens inside the transport collaborator, and the bundled
//! [`UreqTransport`] delegates it to [ureq](https://docs.rs/ureq). If
//! you need streaming bodies, connection pooling, or async, use a full
//! HTTP client directly; this wrapper is for the boring 95% of
//! request/response round trips.
//!
//! # Examples
//!
//! ## Get
//!
//! Query parameters are URL-encoded and appended to the URL. The `?`
//! separator is appended even when there are no parameters; callers
//! depend on the exact URLs this produces, so don't let it surprise you.
//!
//! ```no_run
//! # fn main() -> Result<(), easyreq::Error> {
//! let response = easyreq::get("http://example.com/posts", &[("userId", "6")])?;
//! assert_eq!(200, response.status());
//! if let Some(text) = response.body().as_str() {
//!     println!("{}", text);
//! }
//! # Ok(()) }
//! ```
//!
//! ## Post
//!
//! Form fields are URL-encoded into the body and sent as
//! `application/x-www-form-urlencoded`. A `&str` payload is passed
//! through as-is instead, for pre-serialized bodies:
//!
//! ```no_run
//! # fn main() -> Result<(), easyreq::Error> {
//! let formed = easyreq::post("http://example.com/posts", &[("title", "hello")])?;
//!
//! let mut request = easyreq::Request::new();
//! request.set_header("Content-Type", "application/json");
//! let raw = request.post("http://example.com/posts", "{\"title\":\"hello\"}")?;
//! # Ok(()) }
//! ```
//!
//! `put` and `patch` work the same way; `delete` takes query parameters
//! like `get` does.
//!
//! ## JSON
//!
//! [`Request::set_json`] serializes a body with Serde and sets the
//! content type in one go. It pairs with [`Request::run`], which
//! executes whatever has been configured so far:
//!
//! ```no_run
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct NewPost {
//!     title: &'static str,
//! }
//!
//! # fn main() -> Result<(), easyreq::Error> {
//! let mut request = easyreq::Request::new();
//! request
//!     .set_json(&NewPost { title: "hello" })?
//!     .set_post(true)
//!     .set_url("http://example.com/posts");
//! let response = request.run()?;
//! # Ok(()) }
//! ```
//!
//! On the receiving side, a response that declares
//! `Content-Type: application/json` (exactly that, no charset suffix)
//! arrives pre-decoded as [`Body::Json`]. [`Response::json`] converts
//! the body into your own types regardless of what the server declared:
//!
//! ```no_run
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     id: i64,
//!     title: String,
//! }
//!
//! # fn main() -> Result<(), easyreq::Error> {
//! let response = easyreq::get("http://example.com/posts/1", &[])?;
//! let post: Post = response.json()?;
//! # Ok(()) }
//! ```
//!
//! ## Headers
//!
//! Outgoing headers are set one at a time and kept with their names
//! verbatim. Incoming header names are lowercased: HTTP treats them
//! case-insensitively anyway, and one casing makes for easier lookups.
//!
//! ```
//! let response = easyreq::Response::new("", 200, "Content-Type: text/html\nServer: test");
//! assert_eq!(response.header("content-type"), Some("text/html"));
//! assert_eq!(response.header("SERVER"), Some("test"));
//! ```
//!
//! ## Probing
//!
//! [`exists`] answers whether a URL is live with a headers-only request:
//! `true` exactly when the server said 200. Redirects are not followed
//! and failures of any kind mean `false`.
//!
//! ```no_run
//! if easyreq::exists("http://example.com/report.pdf") {
//!     println!("still there");
//! }
//! ```
//!
//! # The transport
//!
//! Everything socket-shaped lives behind the [`Transport`] trait, and
//! [`Request::with_transport`] swaps the bundled engine out. This is how
//! you test code built on this crate without a server:
//!
//! ```
//! use easyreq::{Error, OptionKey, OptionSet, RawResponse, Request, Transport};
//!
//! struct Canned;
//!
//! impl Transport for Canned {
//!     fn execute(&self, options: &OptionSet) -> Result<RawResponse, Error> {
//!         assert_eq!(options.get_str(OptionKey::Url), Some("http://example.com/a?"));
//!         Ok(RawResponse {
//!             raw: b"pong".to_vec(),
//!             header_size: 0,
//!             status: 200,
//!         })
//!     }
//! }
//!
//! # fn main() -> Result<(), easyreq::Error> {
//! let mut request = Request::with_transport(Canned);
//! let response = request.get("http://example.com/a", &[])?;
//! assert_eq!(response.body().as_str(), Some("pong"));
//! # Ok(()) }
//! ```
//!
//! # Timeouts
//!
//! By default, a request has a 10 second connect timeout and no limit on
//! the whole transfer. You can change the latter in two ways:
//!
//! - Use [`set_timeout`](Request::set_timeout) on your request to set
//!   the timeout per-request like so:
//!   ```no_run
//!   let mut request = easyreq::Request::new();
//!   let _ = request.set_timeout(8).get("localhost", &[]);
//!   ```
//! - Set the environment variable `EASYREQ_TIMEOUT` to the desired
//!   amount of seconds until timeout. Ie. if you have a program called
//!   `foo` that uses easyreq, and you want all the requests made by that
//!   program to timeout in 8 seconds, you launch the program like so:
//!   ```text,ignore
//!   $ EASYREQ_TIMEOUT=8 ./foo
//!   ```
//!   Or add the following somewhere before the requests in the code.
//!   ```
//!   std::env::set_var("EASYREQ_TIMEOUT", "8");
//!   ```
//!
//! If the timeout is set with `set_timeout`, the environment variable
//! will be ignored.
//!
//! # Logging
//!
//! The crate logs through the [log](https://docs.rs/log) facade: one
//! `debug` line when a request is dispatched and one when its response
//! arrives, plus a `debug` line when an existence probe is swallowed and
//! a `warn` when an option is recognized but not honored. Hook up
//! `env_logger` or any other `log` backend to see them.

#![deny(missing_docs)]

mod error;
mod options;
mod request;
mod response;
mod transport;

pub use error::*;
pub use options::*;
pub use request::*;
pub use response::*;
pub use transport::*;
