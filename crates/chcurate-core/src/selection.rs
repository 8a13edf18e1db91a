//! Per-channel inclusion flags.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::dataset::Dataset;

/// Inclusion flag of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Inclusion {
    /// Part of the curated output.
    Yes,
    /// Not selected.
    #[default]
    No,
}

impl Inclusion {
    /// Converts a checkbox state into a flag.
    #[must_use]
    pub const fn from_checked(checked: bool) -> Self {
        if checked { Self::Yes } else { Self::No }
    }

    /// Returns `true` for [`Inclusion::Yes`].
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl fmt::Display for Inclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
        }
    }
}

/// Mapping from channel URL to inclusion flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    flags: HashMap<String, Inclusion>,
}

impl SelectionState {
    /// Creates a state with every channel of the dataset set to `No`.
    #[must_use]
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            flags: dataset
                .rows()
                .iter()
                .map(|row| (row.url.clone(), Inclusion::No))
                .collect(),
        }
    }

    /// Returns the flag of a channel, or `None` for an unknown URL.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Inclusion> {
        self.flags.get(url).copied()
    }

    /// Returns `true` if the channel is flagged `Yes`. Unknown URLs are not.
    #[must_use]
    pub fn is_included(&self, url: &str) -> bool {
        self.get(url).is_some_and(Inclusion::is_yes)
    }

    /// Number of channels flagged `Yes`.
    #[must_use]
    pub fn included_count(&self) -> usize {
        self.flags.values().filter(|flag| flag.is_yes()).count()
    }

    /// Overwrites every flag of `group_id`: `Yes` for channels whose URL is
    /// in `selected`, `No` for the rest. Other groups are untouched.
    ///
    /// Returns the number of flags that changed. An unknown group is a no-op.
    pub fn apply_group_selection(
        &mut self,
        dataset: &Dataset,
        group_id: &str,
        selected: &HashSet<&str>,
    ) -> usize {
        if !dataset.contains_group(group_id) {
            tracing::debug!("Ignoring selection for unknown group {group_id}");
            return 0;
        }

        let mut changed: usize = 0;
        for row in dataset.group_channels(group_id) {
            let flag = Inclusion::from_checked(selected.contains(row.url.as_str()));
            if self.flags.insert(row.url.clone(), flag) != Some(flag) {
                changed = changed.saturating_add(1);
            }
        }
        tracing::debug!("Group {group_id}: {changed} inclusion flag(s) changed");
        changed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::dataset::test_row;

    fn make_dataset() -> Dataset {
        Dataset::from_rows([
            test_row("c1", "g1", "Gaming", "English", "US"),
            test_row("c2", "g1", "Gaming", "English", "US"),
            test_row("c3", "g2", "Music", "English", "US"),
        ])
    }

    #[test]
    fn test_initial_state_all_no() {
        // Arrange
        let dataset = make_dataset();

        // Act
        let state = SelectionState::new(&dataset);

        // Assert
        for row in dataset.rows() {
            assert_eq!(state.get(&row.url), Some(Inclusion::No));
        }
        assert_eq!(state.included_count(), 0);
        assert_eq!(state.get("unknown"), None);
        assert!(!state.is_included("unknown"));
    }

    #[test]
    fn test_apply_selects_and_clears() {
        // Arrange
        let dataset = make_dataset();
        let mut state = SelectionState::new(&dataset);
        state.apply_group_selection(&dataset, "g1", &HashSet::from(["c1", "c2"]));

        // Act: deselect c2
        let changed = state.apply_group_selection(&dataset, "g1", &HashSet::from(["c1"]));

        // Assert
        assert_eq!(changed, 1);
        assert_eq!(state.get("c1"), Some(Inclusion::Yes));
        assert_eq!(state.get("c2"), Some(Inclusion::No));
    }

    #[test]
    fn test_apply_is_idempotent() {
        // Arrange
        let dataset = make_dataset();
        let selected = HashSet::from(["c2"]);
        let mut once = SelectionState::new(&dataset);
        once.apply_group_selection(&dataset, "g1", &selected);

        // Act
        let mut twice = once.clone();
        let changed = twice.apply_group_selection(&dataset, "g1", &selected);

        // Assert
        assert_eq!(changed, 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_apply_leaves_other_groups() {
        // Arrange
        let dataset = make_dataset();
        let mut state = SelectionState::new(&dataset);
        state.apply_group_selection(&dataset, "g2", &HashSet::from(["c3"]));

        // Act: ids from another group are ignored, g2 untouched
        state.apply_group_selection(&dataset, "g1", &HashSet::from(["c3"]));

        // Assert
        assert_eq!(state.get("c1"), Some(Inclusion::No));
        assert_eq!(state.get("c2"), Some(Inclusion::No));
        assert_eq!(state.get("c3"), Some(Inclusion::Yes));
    }

    #[test]
    fn test_apply_unknown_group_is_noop() {
        // Arrange
        let dataset = make_dataset();
        let mut state = SelectionState::new(&dataset);
        let before = state.clone();

        // Act
        let changed = state.apply_group_selection(&dataset, "gone", &HashSet::from(["c1"]));

        // Assert
        assert_eq!(changed, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_inclusion_display() {
        // Arrange & Act & Assert
        assert_eq!(Inclusion::Yes.to_string(), "Yes");
        assert_eq!(Inclusion::from_checked(false).to_string(), "No");
    }
}
