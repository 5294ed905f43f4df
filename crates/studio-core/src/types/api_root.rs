//! API root URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Path prefix under which every admin endpoint lives.
pub const ADMIN_PREFIX: &str = "/api/v1/admin";

/// A validated admin API root URL.
///
/// Must use HTTPS, except for `localhost`, `127.0.0.1` and `::1`, where plain
/// HTTP is allowed for local development and tests.
///
/// # Example
///
/// ```
/// use studio_core::ApiRoot;
///
/// let root = ApiRoot::new("https://api.studio.app/").unwrap();
/// assert_eq!(root.admin_url("/templates"),
///            "https://api.studio.app/api/v1/admin/templates");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiRoot(Url);

impl ApiRoot {
    /// Create a new API root from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiRoot {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the full URL of an admin endpoint.
    ///
    /// `path` is appended to `<root>/api/v1/admin` and should start with `/`.
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base(), ADMIN_PREFIX, path)
    }

    /// Returns the root without a trailing slash.
    pub fn base(&self) -> &str {
        // The URL crate always keeps a trailing slash on root paths.
        self.0.as_str().trim_end_matches('/')
    }

    /// Returns the root URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::ApiRoot {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(invalid("must use HTTPS (HTTP allowed only for localhost)"));
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host"));
        }

        Ok(())
    }
}

impl fmt::Display for ApiRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())
    }
}

impl FromStr for ApiRoot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiRoot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.base())
    }
}

impl<'de> Deserialize<'de> for ApiRoot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiRoot::new(&s).map_err(serde::de::Error::custom)
    }
}
