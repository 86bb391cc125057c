//! Typed widget configuration.
//!
//! Host fields carry configuration as loose string attributes
//! (`disable-future="true"`, `year-limit="current"`, ...). Parsing is
//! forgiving: an unrecognized key or value is treated as unset, never an
//! error, so a misconfigured field degrades to default behavior.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::calendar::{DateConstraint, WeekendRule};

/// Attribute names recognized on a date-picker host field
pub const ATTR_DISABLE_FUTURE: &str = "disable-future";
pub const ATTR_DISABLE_PAST: &str = "disable-past";
pub const ATTR_YEAR_LIMIT: &str = "year-limit";
pub const ATTR_WEEKENDS_DISABLED: &str = "weekends-disabled";

/// Year range the picker may navigate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearLimit {
    /// Any year
    #[default]
    Unlimited,
    /// Locked to the current year; navigation out of it is ignored and
    /// days past today are disabled
    CurrentYear,
}

/// Complete configuration for one calendar picker instance.
///
/// Every knob the old copy-paste variants hardcoded differently lives
/// here, so one component covers all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    /// Future/past exclusions
    pub constraint: DateConstraint,
    /// Which weekday pair gets weekend styling
    pub weekend_rule: WeekendRule,
    /// Render weekend days as non-selectable
    pub weekends_disabled: bool,
    /// Year navigation lock
    pub year_limit: YearLimit,
    /// Whether today is exempt from the future/past exclusions. Some
    /// variants let a past-exclusion swallow today; set this to false to
    /// keep that behavior.
    pub today_exempt: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            constraint: DateConstraint::default(),
            weekend_rule: WeekendRule::default(),
            weekends_disabled: false,
            year_limit: YearLimit::default(),
            // Today stays selectable unless a host opts out
            today_exempt: true,
        }
    }
}

impl PickerOptions {
    /// Options with the documented defaults (today exempt, unlimited
    /// years, Friday/Saturday weekend, nothing disabled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a host field's attribute map.
    ///
    /// Unknown keys are ignored; unrecognized values leave the option at
    /// its default.
    pub fn from_attrs(attrs: &HashMap<String, String>) -> Self {
        let mut opts = Self::new();

        if attr_flag(attrs, ATTR_DISABLE_FUTURE) {
            opts.constraint.disable_future = true;
        }
        if attr_flag(attrs, ATTR_DISABLE_PAST) {
            opts.constraint.disable_past = true;
        }
        if attr_flag(attrs, ATTR_WEEKENDS_DISABLED) {
            opts.weekends_disabled = true;
        }
        if let Some(value) = attrs.get(ATTR_YEAR_LIMIT) {
            if value.trim().eq_ignore_ascii_case("current") {
                opts.year_limit = YearLimit::CurrentYear;
            }
        }

        opts
    }
}

/// Read a boolean attribute; anything other than "true" counts as unset
fn attr_flag(attrs: &HashMap<String, String>, key: &str) -> bool {
    attrs
        .get(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let opts = PickerOptions::new();
        assert!(!opts.constraint.disable_future);
        assert!(!opts.constraint.disable_past);
        assert!(opts.today_exempt);
        assert_eq!(opts.year_limit, YearLimit::Unlimited);
        assert_eq!(opts.weekend_rule, WeekendRule::FridaySaturday);
    }

    #[test]
    fn test_from_attrs() {
        let opts = PickerOptions::from_attrs(&attrs(&[
            ("disable-future", "true"),
            ("year-limit", "current"),
        ]));
        assert!(opts.constraint.disable_future);
        assert!(!opts.constraint.disable_past);
        assert_eq!(opts.year_limit, YearLimit::CurrentYear);
    }

    #[test]
    fn test_unrecognized_values_default_to_unset() {
        let opts = PickerOptions::from_attrs(&attrs(&[
            ("disable-past", "yes"),
            ("year-limit", "2030"),
            ("some-unknown-attr", "true"),
        ]));
        assert_eq!(opts, PickerOptions::new());
    }

    #[test]
    fn test_flag_parsing_is_case_insensitive() {
        let opts = PickerOptions::from_attrs(&attrs(&[("weekends-disabled", " TRUE ")]));
        assert!(opts.weekends_disabled);
    }
}
