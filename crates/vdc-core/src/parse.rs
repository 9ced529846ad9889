//! Smart parsing of colon-delimited timestamp tokens.
//!
//! A token is two or three colon-separated groups such as `1:20:30` or `10:30`.
//! Only the leading digit run of each group counts, so `1h:20m:30s` parses the
//! same as `1:20:30`. Two-group tokens are ambiguous and resolved by an
//! [`AmbiguityPolicy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// How a two-group token like `10:30` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// `10:30` is ten minutes and thirty seconds.
    #[default]
    MinutesSeconds,
    /// `10:30` is ten hours and thirty minutes.
    HoursMinutes,
}

impl AmbiguityPolicy {
    /// Resolves the interactive menu selection: `2` picks hours:minutes,
    /// anything else falls back to minutes:seconds.
    #[must_use]
    pub fn from_selection(selection: &str) -> Self {
        match selection.trim() {
            "2" => Self::HoursMinutes,
            _ => Self::MinutesSeconds,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MinutesSeconds => "minutes_seconds",
            Self::HoursMinutes => "hours_minutes",
        }
    }
}

impl fmt::Display for AmbiguityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbiguityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minutes_seconds" | "minutes-seconds" | "mm:ss" => Ok(Self::MinutesSeconds),
            "hours_minutes" | "hours-minutes" | "hh:mm" => Ok(Self::HoursMinutes),
            _ => Err(format!("invalid ambiguity policy: {s}")),
        }
    }
}

/// Parses a timestamp token into whole seconds.
///
/// Returns 0 for anything that is not a usable timestamp: an empty token, a
/// token without a colon, or a token that does not yield exactly two or three
/// numeric groups. Groups without a leading digit are dropped before the
/// positional mapping, so `1::30` reads as the two-group token `1:30`.
///
/// Values are not range checked: `90:00` is ninety minutes.
pub fn parse_duration(token: &str, policy: AmbiguityPolicy) -> u64 {
    if token.is_empty() || !token.contains(':') {
        return 0;
    }

    let groups: Vec<u64> = token.split(':').filter_map(leading_number).collect();

    let (hours, minutes, seconds) = match (groups.as_slice(), policy) {
        (&[hours, minutes, seconds], _) => (hours, minutes, seconds),
        (&[hours, minutes], AmbiguityPolicy::HoursMinutes) => (hours, minutes, 0),
        (&[minutes, seconds], AmbiguityPolicy::MinutesSeconds) => (0, minutes, seconds),
        _ => return 0,
    };

    hours
        .saturating_mul(SECONDS_PER_HOUR)
        .saturating_add(minutes.saturating_mul(SECONDS_PER_MINUTE))
        .saturating_add(seconds)
}

/// Extracts the leading run of ASCII digits from a whitespace-trimmed group.
///
/// A run too large for `u64` is treated the same as no digits at all.
fn leading_number(group: &str) -> Option<u64> {
    let group = group.trim();
    let end = group
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(group.len());
    group[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::AmbiguityPolicy::{HoursMinutes, MinutesSeconds};

    #[test]
    fn three_groups_are_always_hours_minutes_seconds() {
        assert_eq!(parse_duration("1:20:30", MinutesSeconds), 4830);
        assert_eq!(parse_duration("1:20:30", HoursMinutes), 4830);
    }

    #[test]
    fn two_groups_follow_policy() {
        assert_eq!(parse_duration("10:30", MinutesSeconds), 630);
        assert_eq!(parse_duration("10:30", HoursMinutes), 37800);
    }

    #[test]
    fn no_colon_is_invalid() {
        assert_eq!(parse_duration("90", MinutesSeconds), 0);
        assert_eq!(parse_duration("90", HoursMinutes), 0);
    }

    #[test]
    fn empty_and_digitless_tokens_are_invalid() {
        assert_eq!(parse_duration("", MinutesSeconds), 0);
        assert_eq!(parse_duration(":", MinutesSeconds), 0);
        assert_eq!(parse_duration("ab:cd", HoursMinutes), 0);
    }

    #[test]
    fn trailing_letters_are_ignored() {
        assert_eq!(parse_duration("1h:20m:30s", MinutesSeconds), 4830);
        assert_eq!(parse_duration("1h:20m:30s", HoursMinutes), 4830);
    }

    #[test]
    fn whitespace_around_colons_is_trimmed() {
        assert_eq!(parse_duration("1 : 30", MinutesSeconds), 90);
        assert_eq!(parse_duration(" 2 : 00 : 05 ", MinutesSeconds), 7205);
    }

    #[test]
    fn digitless_groups_shift_remaining_positions() {
        // The empty middle group is dropped, leaving a two-group token.
        assert_eq!(parse_duration("1::30", MinutesSeconds), 90);
        assert_eq!(parse_duration("1:x:30", HoursMinutes), 3600 + 30 * 60);
    }

    #[test]
    fn single_group_with_colon_is_invalid() {
        assert_eq!(parse_duration("45:", MinutesSeconds), 0);
        assert_eq!(parse_duration(":45", HoursMinutes), 0);
    }

    #[test]
    fn more_than_three_groups_is_invalid() {
        assert_eq!(parse_duration("1:2:3:4", MinutesSeconds), 0);
    }

    #[test]
    fn values_are_not_renormalized() {
        assert_eq!(parse_duration("90:00", MinutesSeconds), 5400);
        assert_eq!(parse_duration("0:90:90", MinutesSeconds), 5490);
    }

    #[test]
    fn oversized_groups_are_dropped() {
        let huge = "99999999999999999999999";
        assert_eq!(parse_duration(&format!("{huge}:10"), MinutesSeconds), 0);
        assert_eq!(parse_duration(&format!("{huge}:1:10"), MinutesSeconds), 70);
    }

    #[test]
    fn arithmetic_saturates() {
        let max = u64::MAX.to_string();
        assert_eq!(parse_duration(&format!("{max}:0:0"), MinutesSeconds), u64::MAX);
    }

    #[test]
    fn policy_selection() {
        assert_eq!(AmbiguityPolicy::from_selection("1"), MinutesSeconds);
        assert_eq!(AmbiguityPolicy::from_selection(" 2 "), HoursMinutes);
        assert_eq!(AmbiguityPolicy::from_selection(""), MinutesSeconds);
        assert_eq!(AmbiguityPolicy::from_selection("3"), MinutesSeconds);
    }

    #[test]
    fn policy_string_roundtrip() {
        for policy in [MinutesSeconds, HoursMinutes] {
            let parsed: AmbiguityPolicy = policy.to_string().parse().expect("should parse");
            assert_eq!(parsed, policy);
        }
        assert!("seconds".parse::<AmbiguityPolicy>().is_err());
    }

    #[test]
    fn policy_serde_uses_snake_case() {
        let json = serde_json::to_string(&HoursMinutes).unwrap();
        assert_eq!(json, r#""hours_minutes""#);
        let parsed: AmbiguityPolicy = serde_json::from_str(r#""minutes_seconds""#).unwrap();
        assert_eq!(parsed, MinutesSeconds);
    }
}
