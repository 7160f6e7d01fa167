//! Routing for the farm section entry page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which farm products a chain offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmAvailability {
    pub available: bool,
    #[serde(default)]
    pub v2: bool,
    #[serde(default)]
    pub v3: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FarmVersion {
    V2,
    V3,
}

impl FarmVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmVersion::V2 => "v2",
            FarmVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for FarmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FarmAvailability {
    /// v3 wins when both exist, v3 is also the fallback when neither is flagged.
    pub fn preferred_version(&self) -> FarmVersion {
        if self.v2 && !self.v3 {
            FarmVersion::V2
        } else {
            FarmVersion::V3
        }
    }
}

/// Where the farm entry page sends the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmRoute {
    Home,
    Farm { version: FarmVersion, path: String },
}

impl FarmRoute {
    pub fn target(&self) -> &str {
        match self {
            FarmRoute::Home => "/",
            FarmRoute::Farm { path, .. } => path,
        }
    }
}

/// Resolves the redirect for `current_path` on a chain.
pub fn resolve_farm_route(availability: &FarmAvailability, current_path: &str) -> FarmRoute {
    if !availability.available {
        return FarmRoute::Home;
    }
    let version = availability.preferred_version();
    let path = current_path.replacen("/farm", &format!("/farm/{version}"), 1);
    FarmRoute::Farm { version, path }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(available: bool, v2: bool, v3: bool) -> FarmAvailability {
        FarmAvailability { available, v2, v3 }
    }

    #[test]
    fn test_unavailable_goes_home() {
        let route = resolve_farm_route(&farm(false, true, true), "/farm");
        assert_eq!(route, FarmRoute::Home);
        assert_eq!(route.target(), "/");
    }

    #[test]
    fn test_version_selection() {
        assert_eq!(farm(true, true, true).preferred_version(), FarmVersion::V3);
        assert_eq!(farm(true, true, false).preferred_version(), FarmVersion::V2);
        assert_eq!(farm(true, false, true).preferred_version(), FarmVersion::V3);
        assert_eq!(farm(true, false, false).preferred_version(), FarmVersion::V3);
    }

    #[test]
    fn test_path_keeps_query_and_replaces_once() {
        let route = resolve_farm_route(&farm(true, true, false), "/farm?tab=my-farms&q=/farm");
        assert_eq!(route.target(), "/farm/v2?tab=my-farms&q=/farm");
    }
}
