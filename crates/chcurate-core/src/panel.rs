//! Open-group state machine and the per-group expansion panel.

use crate::dataset::ChannelRow;
use crate::page::{page_count, page_slice};
use crate::selection::SelectionState;

/// Rows shown per expansion panel page.
pub const PANEL_PAGE_SIZE: usize = 20;

/// Which group, if any, shows its channel list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpenGroup {
    /// No panel open.
    #[default]
    Closed,
    /// The panel of this group is open.
    Open(String),
}

/// A click on a group's expand control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleClick {
    /// Group whose control was clicked.
    pub group_id: String,
    /// Click time in milliseconds. `None` if the control was never clicked.
    pub clicked_at: Option<i64>,
}

impl OpenGroup {
    /// Returns the open group identifier.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Open(group_id) => Some(group_id),
        }
    }

    /// Returns `true` if `group_id` is the open group.
    #[must_use]
    pub fn is_open(&self, group_id: &str) -> bool {
        self.group_id() == Some(group_id)
    }

    /// Applies a click on `group_id`'s control: closes the panel if that
    /// group is open, otherwise opens it (closing any other).
    #[must_use]
    pub fn toggle(self, group_id: &str) -> Self {
        if self.is_open(group_id) {
            Self::Closed
        } else {
            Self::Open(String::from(group_id))
        }
    }

    /// Applies a batch of clicks reported together.
    ///
    /// Only the most recent click counts; on equal timestamps the later
    /// entry wins. Without any timestamped click the state is unchanged.
    #[must_use]
    pub fn apply_clicks(self, clicks: &[ToggleClick]) -> Self {
        let latest = clicks
            .iter()
            .filter_map(|click| click.clicked_at.map(|at| (at, click)))
            .max_by_key(|(at, _)| *at);
        match latest {
            Some((_, click)) => self.toggle(&click.group_id),
            None => self,
        }
    }
}

/// A selectable channel row of the expansion panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    /// Channel URL (link target of the name).
    pub url: String,
    /// Channel display name.
    pub name: String,
    /// Curated genre.
    pub genre: String,
    /// Channel country.
    pub country: String,
    /// Whether the row is checked.
    pub checked: bool,
}

/// Channel table of the open group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPanel {
    /// Group shown by the panel.
    pub group_id: String,
    /// Rows in filtered order.
    pub rows: Vec<PanelRow>,
}

impl ExpansionPanel {
    /// Number of pages.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        page_count(self.rows.len(), PANEL_PAGE_SIZE)
    }

    /// Rows of one page (0-based).
    #[must_use]
    pub fn page(&self, page: usize) -> &[PanelRow] {
        page_slice(&self.rows, PANEL_PAGE_SIZE, page)
    }

    /// URLs of the checked rows.
    pub fn checked_urls(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(|row| row.checked)
            .map(|row| row.url.as_str())
    }

    /// Finds a row by channel URL.
    #[must_use]
    pub fn row(&self, url: &str) -> Option<&PanelRow> {
        self.rows.iter().find(|row| row.url == url)
    }
}

/// Builds the panel for `group_id` from the filtered rows.
///
/// Returns `None` when no filtered row belongs to the group.
#[must_use]
pub fn expand(
    group_id: &str,
    filtered: &[&ChannelRow],
    selection: &SelectionState,
) -> Option<ExpansionPanel> {
    let rows: Vec<PanelRow> = filtered
        .iter()
        .filter(|row| row.group_id == group_id)
        .map(|row| PanelRow {
            url: row.url.clone(),
            name: row.name.clone(),
            genre: row.genre.clone(),
            country: row.country.clone().unwrap_or_default(),
            checked: selection.is_included(&row.url),
        })
        .collect();

    if rows.is_empty() {
        return None;
    }
    Some(ExpansionPanel {
        group_id: String::from(group_id),
        rows,
    })
}
