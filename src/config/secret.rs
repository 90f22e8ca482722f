//! PostgreSQL connection string held as a secret
//!
//! The raw URL carries the database password, so it lives inside a
//! `secrecy::SecretString` and is only reachable through
//! [`ConnectionString::expose`]. `Debug`, `Display` and `Serialize` all
//! render the redacted form, which keeps the user name and server but
//! masks the password and any query parameters.
//!
//! # Example
//!
//! ```rust
//! use carelink::config::ConnectionString;
//!
//! let conn = ConnectionString::new("postgresql://carelink:hunter2@db:5432/carelink");
//! assert_eq!(conn.redacted(), "postgresql://carelink:***@db:5432/carelink");
//! assert_eq!(conn.server(), "db:5432/carelink");
//! assert!(!format!("{conn:?}").contains("hunter2"));
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MASK: &str = "***";

/// A PostgreSQL URL whose credentials never reach logs or config dumps
#[derive(Clone)]
pub struct ConnectionString(SecretString);

/// Borrowed pieces of a `scheme://[userinfo@]server[?query]` URL
struct Parts<'a> {
    scheme: &'a str,
    userinfo: Option<&'a str>,
    server: &'a str,
    query: Option<&'a str>,
}

impl ConnectionString {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::new(raw.into()))
    }

    /// The raw URL, password included. Only the pool builder should need this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    /// True for `postgresql://` and `postgres://` URLs
    pub fn has_postgres_scheme(&self) -> bool {
        matches!(self.parts().scheme, "postgresql" | "postgres") && self.expose().contains("://")
    }

    /// `host[:port][/database]` with credentials and query stripped
    pub fn server(&self) -> &str {
        self.parts().server
    }

    /// The URL with its password and query values replaced by `***`
    pub fn redacted(&self) -> String {
        let parts = self.parts();
        let mut out = format!("{}://", parts.scheme);

        if let Some(userinfo) = parts.userinfo {
            match userinfo.split_once(':') {
                Some((user, _)) => out.push_str(&format!("{user}:{MASK}@")),
                None => out.push_str(&format!("{userinfo}@")),
            }
        }
        out.push_str(parts.server);
        if parts.query.is_some() {
            out.push('?');
            out.push_str(MASK);
        }
        out
    }

    fn parts(&self) -> Parts<'_> {
        let raw = self.expose();
        let (scheme, rest) = raw.split_once("://").unwrap_or(("postgresql", raw));
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        // Passwords may contain '@', the last one separates the server
        let (userinfo, server) = match rest.rsplit_once('@') {
            Some((userinfo, server)) => (Some(userinfo), server),
            None => (None, rest),
        };

        Parts {
            scheme,
            userinfo,
            server,
            query,
        }
    }
}

impl From<String> for ConnectionString {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionString")
            .field(&self.redacted())
            .finish()
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl Serialize for ConnectionString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.redacted())
    }
}

impl<'de> Deserialize<'de> for ConnectionString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}
