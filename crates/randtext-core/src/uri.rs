//! Provider resource identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Resource identifier of the default text provider.
pub const DEFAULT_TEXT_URI: &str = "content://com.iav.contestdataprovider/text";

/// Error when parsing a [`ContentUri`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid content URI '{uri}': {reason}")]
pub struct UriError {
    pub uri: String,
    pub reason: &'static str,
}

/// A `scheme://authority/path` identifier naming a provider resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri {
    scheme: String,
    authority: String,
    path: String,
}

impl ContentUri {
    /// Parse a URI string.
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let err = |reason| UriError {
            uri: uri.to_string(),
            reason,
        };

        let (scheme, rest) = uri.split_once("://").ok_or_else(|| err("missing '://'"))?;
        let scheme_ok = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(err("invalid scheme"));
        }

        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };
        if authority.is_empty() {
            return Err(err("missing authority"));
        }

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            authority: authority.to_string(),
            path: path.to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Path component, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for ContentUri {
    fn default() -> Self {
        Self {
            scheme: "content".to_string(),
            authority: "com.iav.contestdataprovider".to_string(),
            path: "/text".to_string(),
        }
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

impl FromStr for ContentUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
