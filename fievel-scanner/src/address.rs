use crate::error::{Result, ScanError};
use std::fmt;
use url::Url;

/// A `(host, path)` pair split out of an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    host: String,
    path: String,
}

impl Address {
    /// Parse a raw URL string into its host and path.
    ///
    /// Anything without a usable host is a `MalformedAddress`. Query strings and fragments are
    /// dropped, and an empty path becomes `/`.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| ScanError::MalformedAddress(format!("{raw} ({e})")))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(ScanError::MalformedAddress(format!("{raw} (no host)"))),
        };

        let path = match url.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        Ok(Self { host, path })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host + path`, the form recorded in visited sets and compared for duplicates.
    pub fn key(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.path)
    }
}
