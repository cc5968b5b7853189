//! vManage API version parsing and constraint matching.
//!
//! Some endpoints only exist on certain controller releases. They declare a
//! constraint such as `"<20.13"` or `">=20.9, <20.13"` which is checked
//! against the version reported by `/client/server` before a request is sent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A dotted numeric controller version such as `20.12.1`.
///
/// Missing trailing components compare as zero, so `20.13 == 20.13.0`.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    components: Vec<u64>,
}

impl ApiVersion {
    /// Build a version from numeric components.
    #[must_use]
    pub fn new(components: impl Into<Vec<u64>>) -> Self {
        Self {
            components: components.into(),
        }
    }

    /// Numeric components as parsed.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Major component (`20` in `20.12.1`).
    #[must_use]
    pub fn major(&self) -> u64 {
        self.component(0)
    }

    /// Minor component (`12` in `20.12.1`).
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::ParseError("empty version string".to_string()));
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            // "20.13.999-2" -> 999; trailing build labels are ignored
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                if components.is_empty() {
                    return Err(Error::ParseError(format!("invalid version `{s}`")));
                }
                break;
            }
            let value = digits
                .parse::<u64>()
                .map_err(|e| Error::ParseError(format!("invalid version `{s}`: {e}")))?;
            components.push(value);
            if digits.len() != part.len() {
                break;
            }
        }

        Ok(Self { components })
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for index in 0..len {
            match self.component(index).cmp(&other.component(index)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}

impl Hash for ApiVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let significant = self
            .components
            .iter()
            .rposition(|c| *c != 0)
            .map_or(0, |last| last + 1);
        self.components[..significant].hash(state);
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Comparison operator in a version specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl VersionOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
        }
    }
}

/// A single `<op><version>` specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecifier {
    /// Comparison operator
    pub op: VersionOp,
    /// Right-hand side version
    pub version: ApiVersion,
}

impl VersionSpecifier {
    /// Check whether `version` satisfies this specifier.
    #[must_use]
    pub fn matches(&self, version: &ApiVersion) -> bool {
        self.op.holds(version.cmp(&self.version))
    }
}

impl FromStr for VersionSpecifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        // two-character operators first so "<=" is not read as "<"
        let (op, rest) = [
            ("<=", VersionOp::Le),
            (">=", VersionOp::Ge),
            ("==", VersionOp::Eq),
            ("!=", VersionOp::Ne),
            ("<", VersionOp::Lt),
            (">", VersionOp::Gt),
        ]
        .iter()
        .find_map(|(prefix, op)| s.strip_prefix(*prefix).map(|rest| (*op, rest)))
        .ok_or_else(|| Error::ParseError(format!("version specifier `{s}` has no operator")))?;

        Ok(Self {
            op,
            version: rest.parse()?,
        })
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

/// Comma-separated set of specifiers which must all hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    specifiers: Vec<VersionSpecifier>,
}

impl VersionConstraint {
    /// Check whether `version` satisfies every specifier.
    #[must_use]
    pub fn matches(&self, version: &ApiVersion) -> bool {
        self.specifiers.iter().all(|spec| spec.matches(version))
    }

    /// Individual specifiers.
    #[must_use]
    pub fn specifiers(&self) -> &[VersionSpecifier] {
        &self.specifiers
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let specifiers = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<VersionSpecifier>>>()?;

        if specifiers.is_empty() {
            return Err(Error::ParseError(format!("empty version constraint `{s}`")));
        }

        Ok(Self { specifiers })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.specifiers.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(","))
    }
}
