//! Declarative endpoint descriptors.
//!
//! Every vManage operation is described by a `const` [`Endpoint`]: the HTTP
//! verb, a path template relative to `/dataservice`, the optional key that
//! wraps the interesting part of the response and an optional version
//! constraint. API crates declare descriptors next to the methods that use
//! them and hand them to [`ServiceClient`](crate::client::ServiceClient).
//!
//! ```
//! use vmanage_core::endpoint::Endpoint;
//!
//! const GET_LISTS: Endpoint = Endpoint::get("/template/policy/list/vpn").with_resultbody("data");
//! assert_eq!(GET_LISTS.render_path(&[]).unwrap(), "template/policy/list/vpn");
//! ```

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::{Error, Result};
use crate::version::VersionConstraint;

/// HTTP verb used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpVerb {
    /// Convert into a [`reqwest::Method`].
    #[must_use]
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Upper-case verb name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a single REST operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP verb
    pub verb: HttpVerb,
    /// Path template with `{name}` placeholders, e.g. `/template/policy/list/vpn/{id}`
    pub path: &'static str,
    /// Response member holding the payload (`"data"` for collections)
    pub resultbody: Option<&'static str>,
    /// Version constraint such as `">=20.13"`
    pub versions: Option<&'static str>,
}

impl Endpoint {
    /// Describe an endpoint with an explicit verb.
    #[must_use]
    pub const fn new(verb: HttpVerb, path: &'static str) -> Self {
        Self {
            verb,
            path,
            resultbody: None,
            versions: None,
        }
    }

    /// GET endpoint.
    #[must_use]
    pub const fn get(path: &'static str) -> Self {
        Self::new(HttpVerb::Get, path)
    }

    /// POST endpoint.
    #[must_use]
    pub const fn post(path: &'static str) -> Self {
        Self::new(HttpVerb::Post, path)
    }

    /// PUT endpoint.
    #[must_use]
    pub const fn put(path: &'static str) -> Self {
        Self::new(HttpVerb::Put, path)
    }

    /// DELETE endpoint.
    #[must_use]
    pub const fn delete(path: &'static str) -> Self {
        Self::new(HttpVerb::Delete, path)
    }

    /// Unwrap the response from the given member before decoding.
    #[must_use]
    pub const fn with_resultbody(mut self, key: &'static str) -> Self {
        self.resultbody = Some(key);
        self
    }

    /// Restrict the endpoint to controller versions matching `constraint`.
    #[must_use]
    pub const fn with_versions(mut self, constraint: &'static str) -> Self {
        self.versions = Some(constraint);
        self
    }

    /// Parse the declared version constraint, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the declared constraint is malformed.
    pub fn version_constraint(&self) -> Result<Option<VersionConstraint>> {
        self.versions
            .map(|raw| {
                raw.parse().map_err(|e| {
                    Error::InvalidEndpoint(format!("{} {}: {e}", self.verb, self.path))
                })
            })
            .transpose()
    }

    /// Substitute `{name}` placeholders and return a path relative to the API base.
    ///
    /// Argument values are percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a placeholder has no matching
    /// argument or a brace is left unbalanced.
    pub fn render_path(&self, args: &[(&str, &str)]) -> Result<String> {
        let template = self.path.trim_start_matches('/');
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                Error::InvalidRequest(format!("unbalanced placeholder in `{}`", self.path))
            })?;
            let name = &after[..close];
            let value = args
                .iter()
                .find_map(|(key, value)| (*key == name).then_some(*value))
                .ok_or_else(|| {
                    Error::InvalidRequest(format!(
                        "missing path argument `{name}` for `{}`",
                        self.path
                    ))
                })?;
            rendered.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
            rest = &after[close + 1..];
        }
        rendered.push_str(rest);

        Ok(rendered)
    }

    /// Decode a JSON response body, unwrapping [`Endpoint::resultbody`] when set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the body is not valid JSON, lacks the
    /// result member, or does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        let parse_err =
            |e: serde_json::Error| Error::ParseError(format!("{} {}: {e}", self.verb, self.path));

        match self.resultbody {
            None => serde_json::from_slice(body).map_err(parse_err),
            Some(key) => {
                let mut value: serde_json::Value =
                    serde_json::from_slice(body).map_err(parse_err)?;
                let inner = value
                    .as_object_mut()
                    .and_then(|map| map.remove(key))
                    .ok_or_else(|| {
                        Error::ParseError(format!(
                            "{} {}: response has no `{key}` member",
                            self.verb, self.path
                        ))
                    })?;
                serde_json::from_value(inner).map_err(parse_err)
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const GET_ONE: Endpoint = Endpoint::get("/template/policy/list/vpn/{id}");
    const GET_ALL: Endpoint = Endpoint::get("/template/policy/list/vpn").with_resultbody("data");
    const IMPORT: Endpoint =
        Endpoint::post("/tenantmigration/import/{migration_key}").with_versions(">=20.13");

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn renders_placeholders() {
        assert_eq!(
            GET_ONE.render_path(&[("id", "abc-123")]).unwrap(),
            "template/policy/list/vpn/abc-123"
        );
    }

    #[test]
    fn encodes_placeholder_values() {
        let path = GET_ONE.render_path(&[("id", "a/b c")]).unwrap();
        assert_eq!(path, "template/policy/list/vpn/a%2Fb+c");
    }

    #[test]
    fn missing_argument_is_rejected() {
        let err = GET_ONE.render_path(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn decode_unwraps_resultbody() {
        let body = br#"{"header": {}, "data": [{"name": "a"}, {"name": "b"}]}"#;
        let decoded: Vec<Named> = GET_ALL.decode(body).unwrap();
        assert_eq!(decoded.len(), 2);

        let err = GET_ALL.decode::<Vec<Named>>(br#"{"header": {}}"#).unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn decode_without_resultbody() {
        let decoded: Named = GET_ONE.decode(br#"{"name": "vpn-list"}"#).unwrap();
        assert_eq!(decoded.name, "vpn-list");
    }

    #[test]
    fn version_constraint_is_parsed() {
        let constraint = IMPORT.version_constraint().unwrap().unwrap();
        assert!(constraint.matches(&"20.13.1".parse().unwrap()));
        assert!(GET_ONE.version_constraint().unwrap().is_none());
    }
}
