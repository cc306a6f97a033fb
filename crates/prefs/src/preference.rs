use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParsePreferenceError;

/// Theme choice as the user (or nobody) expressed it.
///
/// `System` means "follow the operating system". It is an input-only value:
/// before anything is shown it gets expanded into a [`ResolvedPreference`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Light,
    Dark,
    System,
}

/// The concrete theme applied to the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedPreference {
    #[default]
    Light,
    Dark,
}

impl Preference {
    /// Canonical stored form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
            Preference::System => "system",
        }
    }

    /// The pinned theme, or `None` when the choice follows the system.
    #[must_use]
    pub const fn pinned(self) -> Option<ResolvedPreference> {
        match self {
            Preference::Light => Some(ResolvedPreference::Light),
            Preference::Dark => Some(ResolvedPreference::Dark),
            Preference::System => None,
        }
    }

    /// Expands `System` using the OS signal; pinned values pass through.
    #[must_use]
    pub fn resolve(self, prefers_dark: Option<bool>) -> ResolvedPreference {
        self.pinned()
            .unwrap_or_else(|| ResolvedPreference::from_prefers_dark(prefers_dark))
    }
}

impl ResolvedPreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResolvedPreference::Light => "light",
            ResolvedPreference::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            ResolvedPreference::Light => ResolvedPreference::Dark,
            ResolvedPreference::Dark => ResolvedPreference::Light,
        }
    }

    /// Maps the OS "prefers dark" signal. An unknown signal means light.
    #[must_use]
    pub const fn from_prefers_dark(prefers_dark: Option<bool>) -> Self {
        match prefers_dark {
            Some(true) => ResolvedPreference::Dark,
            Some(false) | None => ResolvedPreference::Light,
        }
    }
}

impl From<ResolvedPreference> for Preference {
    fn from(value: ResolvedPreference) -> Self {
        match value {
            ResolvedPreference::Light => Preference::Light,
            ResolvedPreference::Dark => Preference::Dark,
        }
    }
}

impl core::fmt::Display for Preference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for ResolvedPreference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ParsePreferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Preference::Light),
            "dark" => Ok(Preference::Dark),
            "system" => Ok(Preference::System),
            other => Err(ParsePreferenceError(other.to_string())),
        }
    }
}

impl FromStr for ResolvedPreference {
    type Err = ParsePreferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.parse::<Preference>()? {
            Preference::System => Err(ParsePreferenceError(Preference::System.to_string())),
            pinned => Ok(pinned.resolve(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_follows_the_signal() {
        assert_eq!(
            Preference::System.resolve(Some(true)),
            ResolvedPreference::Dark
        );
        assert_eq!(
            Preference::System.resolve(Some(false)),
            ResolvedPreference::Light
        );
        assert_eq!(Preference::System.resolve(None), ResolvedPreference::Light);
    }

    #[test]
    fn pinned_values_ignore_the_signal() {
        assert_eq!(Preference::Light.resolve(Some(true)), ResolvedPreference::Light);
        assert_eq!(Preference::Dark.resolve(Some(false)), ResolvedPreference::Dark);
        assert_eq!(Preference::Dark.resolve(None), ResolvedPreference::Dark);
    }

    #[test]
    fn parse_is_case_insensitive_and_trimmed() {
        assert_eq!(" Dark ".parse::<Preference>().unwrap(), Preference::Dark);
        assert_eq!("SYSTEM".parse::<Preference>().unwrap(), Preference::System);
        assert_eq!(
            "light".parse::<ResolvedPreference>().unwrap(),
            ResolvedPreference::Light
        );
    }

    #[test]
    fn resolved_rejects_system() {
        assert_eq!(
            "system".parse::<ResolvedPreference>(),
            Err(ParsePreferenceError("system".to_string()))
        );
    }

    #[test]
    fn unknown_value_is_reported() {
        assert_eq!(
            "sepia".parse::<Preference>(),
            Err(ParsePreferenceError("sepia".to_string()))
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Preference::System).unwrap();
        assert_eq!(json, "\"system\"");
        let parsed: ResolvedPreference = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(parsed, ResolvedPreference::Dark);
    }

    #[test]
    fn opposite_alternates() {
        let start = ResolvedPreference::Light;
        assert_eq!(start.opposite(), ResolvedPreference::Dark);
        assert_eq!(start.opposite().opposite(), start);
    }
}
