use std::collections::BTreeMap;

/// A transport option key.
///
/// Transport engines in the curl tradition key their options with raw
/// integer constants, so any integer is a "valid" key. This enum is the
/// closed set of options this crate recognizes, decoupled from any engine's
/// constant values. New keys can be added here without breaking
/// [`Transport`](crate::Transport) implementations, which simply ignore
/// keys they do not understand.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum OptionKey {
    /// Scheme prefixed to the URL when it does not carry one. Defaults to
    /// "http".
    DefaultProtocol,
    /// The URL the request is sent to.
    Url,
    /// Explicit request method, stored uppercase ("GET", "DELETE", ...).
    Method,
    /// Whether the transport follows redirect responses. Absent counts as
    /// "do not follow".
    FollowRedirects,
    /// Cap on the number of redirects followed before the transport gives
    /// up.
    MaxRedirects,
    /// Seconds allowed for establishing the connection.
    ConnectTimeout,
    /// Seconds allowed for the whole transfer.
    Timeout,
    /// Port override for the URL's authority.
    Port,
    /// The request body, already serialized: URL-encoded form fields or a
    /// raw payload.
    PostFields,
    /// Marks the request as a plain GET retrieval.
    HttpGet,
    /// Marks the request as a form-style POST submission.
    Post,
    /// Whether the peer's TLS certificate is verified. Absent counts as
    /// "verify".
    SslVerifyPeer,
    /// Headers-only probe: the transport asks the server for no body.
    NoBody,
    /// Serialized outgoing header lines. Inserted into the dispatched set
    /// by [`Request::run`](crate::Request::run), never retained on the
    /// builder.
    HttpHeader,
    /// Whether the raw response payload starts with the header block. When
    /// disabled the transport reports a header length of zero.
    IncludeHeaders,
    /// Whether the transport hands the payload back to the caller. The
    /// bundled transport always does, and logs a warning when this is
    /// explicitly disabled.
    ReturnTransfer,
}

/// A value stored under an [`OptionKey`].
///
/// Values are deliberately loose: nothing checks that a key carries the
/// variant a transport expects. A mistyped value is invisible to the typed
/// getters on [`OptionSet`] and therefore treated as absent.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OptionValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer: ports, redirect caps, timeouts in seconds.
    Int(i64),
    /// A string: URLs, methods, serialized bodies.
    Str(String),
    /// A list of serialized header lines.
    Lines(Vec<String>),
}

/// The accumulated transport configuration for one request.
///
/// A thin ordered map from [`OptionKey`] to [`OptionValue`]. The builder
/// mutates it up to the moment of dispatch; a [`Transport`](crate::Transport)
/// only ever sees a shared reference.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct OptionSet {
    entries: BTreeMap<OptionKey, OptionValue>,
}

impl OptionSet {
    /// Creates an empty option set.
    pub fn new() -> OptionSet {
        OptionSet::default()
    }

    /// Stores `value` under `key`, overwriting any previous entry.
    pub fn insert(&mut self, key: OptionKey, value: OptionValue) {
        self.entries.insert(key, value);
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: OptionKey) -> Option<&OptionValue> {
        self.entries.get(&key)
    }

    /// Returns the string under `key`, if present and actually a string.
    pub fn get_str(&self, key: OptionKey) -> Option<&str> {
        match self.entries.get(&key) {
            Some(OptionValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the integer under `key`, if present and actually an integer.
    pub fn get_int(&self, key: OptionKey) -> Option<i64> {
        match self.entries.get(&key) {
            Some(OptionValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the flag under `key`, if present and actually a boolean.
    pub fn get_bool(&self, key: OptionKey) -> Option<bool> {
        match self.entries.get(&key) {
            Some(OptionValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the header lines under `key`, if present and actually lines.
    pub fn get_lines(&self, key: OptionKey) -> Option<&[String]> {
        match self.entries.get(&key) {
            Some(OptionValue::Lines(lines)) => Some(lines),
            _ => None,
        }
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &OptionValue)> {
        self.entries.iter()
    }

    /// Returns true when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites() {
        let mut options = OptionSet::new();
        options.insert(OptionKey::Url, OptionValue::Str(String::from("first")));
        options.insert(OptionKey::Url, OptionValue::Str(String::from("second")));
        assert_eq!(options.len(), 1);
        assert_eq!(options.get_str(OptionKey::Url), Some("second"));
    }

    #[test]
    fn typed_getters_ignore_mismatched_variants() {
        let mut options = OptionSet::new();
        options.insert(OptionKey::Timeout, OptionValue::Str(String::from("10")));
        assert_eq!(options.get_int(OptionKey::Timeout), None);
        assert_eq!(options.get_str(OptionKey::Timeout), Some("10"));
        assert_eq!(options.get_bool(OptionKey::Timeout), None);
        assert_eq!(options.get_lines(OptionKey::Timeout), None);
    }

    #[test]
    fn absent_keys_read_as_none() {
        let options = OptionSet::new();
        assert!(options.is_empty());
        assert_eq!(options.get(OptionKey::Url), None);
        assert_eq!(options.get_bool(OptionKey::Post), None);
    }

    #[test]
    fn equal_contents_compare_equal() {
        let mut a = OptionSet::new();
        a.insert(OptionKey::Post, OptionValue::Bool(true));
        a.insert(OptionKey::Url, OptionValue::Str(String::from("url")));

        let mut b = OptionSet::new();
        b.insert(OptionKey::Url, OptionValue::Str(String::from("url")));
        b.insert(OptionKey::Post, OptionValue::Bool(true));

        assert_eq!(a, b);
    }
}
