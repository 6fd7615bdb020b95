//! Name and state/territory filtering

use crate::area::ProtectedArea;
use crate::constants::search::ALL_STATES;
use serde::{Deserialize, Serialize};

/// Current filter inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaFilter {
    /// Substring to look for in area names (case-insensitive)
    #[serde(default)]
    pub name: String,
    /// Exact state/territory, or `ALL`
    #[serde(default = "all_states")]
    pub state: String,
}

fn all_states() -> String {
    ALL_STATES.to_string()
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self {
            name: String::new(),
            state: all_states(),
        }
    }
}

impl AreaFilter {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }

    /// The user has narrowed the list in some way
    ///
    /// Whitespace-only names do not count.
    pub fn is_active(&self) -> bool {
        !self.name.trim().is_empty() || self.state != ALL_STATES
    }

    /// State bias for geocoding, `None` when every state is allowed
    pub fn state_bias(&self) -> Option<&str> {
        (self.state != ALL_STATES).then_some(self.state.as_str())
    }

    /// Apply this filter to a list of areas
    pub fn apply(&self, areas: &[ProtectedArea]) -> Vec<ProtectedArea> {
        filter(areas, &self.name, &self.state)
    }
}

/// Areas whose name contains `name` (case-insensitive) and whose state equals
/// `state` exactly, unless `state` is `ALL`
///
/// Source order is preserved.
pub fn filter(areas: &[ProtectedArea], name: &str, state: &str) -> Vec<ProtectedArea> {
    let needle = name.to_lowercase();

    areas
        .iter()
        .filter(|area| needle.is_empty() || area.name.to_lowercase().contains(&needle))
        .filter(|area| state == ALL_STATES || area.state == state)
        .cloned()
        .collect()
}
