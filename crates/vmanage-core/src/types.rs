//! Shared wire enums and validation helpers.
//!
//! vManage encodes many booleans and numbers as strings; the helpers here
//! express the checks the API crates attach through `validator`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::ValidationError;

/// Boolean encoded as the strings `"true"` / `"false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StringBool {
    /// `"true"`
    True,
    /// `"false"`
    #[default]
    False,
}

impl From<bool> for StringBool {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl From<StringBool> for bool {
    fn from(value: StringBool) -> Self {
        value == StringBool::True
    }
}

/// Interface families accepted by zone lists and interface matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceType {
    /// `Ethernet`
    Ethernet,
    /// `FastEthernet`
    FastEthernet,
    /// `FiveGigabitEthernet`
    FiveGigabitEthernet,
    /// `FortyGigabitEthernet`
    FortyGigabitEthernet,
    /// `GigabitEthernet`
    GigabitEthernet,
    /// `HundredGigE`
    HundredGigE,
    /// `Loopback`
    Loopback,
    /// `TenGigabitEthernet`
    TenGigabitEthernet,
    /// `Tunnel`
    Tunnel,
    /// `TwentyFiveGigE`
    TwentyFiveGigE,
    /// `TwentyFiveGigabitEthernet`
    TwentyFiveGigabitEthernet,
    /// `TwoGigabitEthernet`
    TwoGigabitEthernet,
    /// `VirtualPortGroup`
    VirtualPortGroup,
    /// `Vlan`
    Vlan,
}

/// Build a [`ValidationError`] carrying a human readable message.
#[must_use]
pub fn validation_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

/// Parse a string-encoded integer and check it lies within `min..=max`.
///
/// `label` names the value in the error message, e.g. `"jitter"`.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the string is not an integer or is out of range.
pub fn check_int_range(
    raw: &str,
    min: i128,
    max: i128,
    label: &str,
) -> Result<(), ValidationError> {
    let value: i128 = raw
        .trim()
        .parse()
        .map_err(|_| validation_error("not_integer", format!("{label} must be an integer")))?;
    if value < min || value > max {
        return Err(validation_error(
            "range",
            format!("{label} should be in range {min}-{max}"),
        ));
    }
    Ok(())
}

/// Named presence flags used by [`check_fields_exclusive`].
pub type FieldPresence<'a> = (&'a str, bool);

/// Check that at most one of `fields` is set, or exactly one when
/// `at_least_one` is true.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming all fields when the rule is broken.
pub fn check_fields_exclusive(
    fields: &[FieldPresence<'_>],
    at_least_one: bool,
) -> Result<(), ValidationError> {
    let assigned = fields.iter().filter(|(_, set)| *set).count();
    let names = FieldList(fields);

    if at_least_one && assigned != 1 {
        return Err(validation_error(
            "exclusive_fields",
            format!("Exactly one of {names} must be assigned"),
        ));
    }
    if assigned > 1 {
        return Err(validation_error(
            "exclusive_fields",
            format!("At most one of {names} can be assigned"),
        ));
    }
    Ok(())
}

struct FieldList<'a, 'b>(&'a [FieldPresence<'b>]);

impl fmt::Display for FieldList<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|(name, _)| *name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_bool_wire_format() {
        assert_eq!(serde_json::to_string(&StringBool::True).unwrap(), "\"true\"");
        let parsed: StringBool = serde_json::from_str("\"false\"").unwrap();
        assert!(!bool::from(parsed));
        assert_eq!(StringBool::from(true), StringBool::True);
    }

    #[test]
    fn interface_type_wire_format() {
        let parsed: InterfaceType = serde_json::from_str("\"GigabitEthernet\"").unwrap();
        assert_eq!(parsed, InterfaceType::GigabitEthernet);
        assert!(serde_json::from_str::<InterfaceType>("\"Gi\"").is_err());
    }

    #[test]
    fn int_range_checks() {
        assert!(check_int_range("7", 0, 7, "queue").is_ok());
        let err = check_int_range("8", 0, 7, "queue").unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("queue should be in range 0-7")
        );
        assert!(check_int_range("seven", 0, 7, "queue").is_err());
    }

    #[test]
    fn exclusive_fields_exactly_one() {
        assert!(check_fields_exclusive(&[("vpn", true), ("interface", false)], true).is_ok());
        let none = check_fields_exclusive(&[("vpn", false), ("interface", false)], true);
        assert!(none.is_err());
        let both = check_fields_exclusive(&[("vpn", true), ("interface", true)], true);
        assert_eq!(
            both.unwrap_err().message.as_deref(),
            Some("Exactly one of [vpn, interface] must be assigned")
        );
    }

    #[test]
    fn exclusive_fields_at_most_one() {
        assert!(check_fields_exclusive(&[("a", false), ("b", false)], false).is_ok());
        let err = check_fields_exclusive(&[("a", true), ("b", true)], false).unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("At most one of [a, b] can be assigned")
        );
    }
}
