//! Curation session: the single state object and its transitions.
//!
//! Every user action is one method on [`Session`]; every view is derived
//! from the current state by [`Session::render`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::dataset::{ChannelRow, Dataset, FilterOptions};
use crate::filter::{FilterDimension, FilterSelection, filter_rows};
use crate::gallery::{Gallery, render_gallery};
use crate::output::{OutputTable, render_output};
use crate::panel::{ExpansionPanel, OpenGroup, ToggleClick, expand};
use crate::selection::SelectionState;

/// Views derived from one session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<'a> {
    /// Card gallery (with the open group's panel).
    pub gallery: Gallery,
    /// Included channels.
    pub output: OutputTable<'a>,
}

/// State of one user's curation session.
///
/// The dataset is shared read-only; filters, selection and the open group
/// belong to the session.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    options: FilterOptions,
    filters: FilterSelection,
    selection: SelectionState,
    open_group: OpenGroup,
}

impl Session {
    /// Starts a session with no filters, nothing included and no panel open.
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let options = dataset.filter_options();
        let selection = SelectionState::new(&dataset);
        Self {
            dataset,
            options,
            filters: FilterSelection::default(),
            selection,
            open_group: OpenGroup::Closed,
        }
    }

    /// The shared dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Values selectable in each filter dimension.
    #[must_use]
    pub const fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Current filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    /// Current inclusion flags.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current open-group marker.
    #[must_use]
    pub const fn open_group(&self) -> &OpenGroup {
        &self.open_group
    }

    /// Toggles one filter value.
    pub fn toggle_filter(&mut self, dimension: FilterDimension, value: &str) {
        self.filters.toggle(dimension, value);
        tracing::debug!("Filter {dimension}: {:?}", self.filters.values(dimension));
    }

    /// Replaces the chosen values of one dimension.
    pub fn set_filter(&mut self, dimension: FilterDimension, values: impl IntoIterator<Item = String>) {
        self.filters.set(dimension, values);
        tracing::debug!("Filter {dimension}: {:?}", self.filters.values(dimension));
    }

    /// Clears one dimension.
    pub fn clear_filter(&mut self, dimension: FilterDimension) {
        self.filters.clear(dimension);
        tracing::debug!("Filter {dimension} cleared");
    }

    /// Applies clicks on expand controls reported together.
    pub fn click_expand(&mut self, clicks: &[ToggleClick]) {
        self.open_group = std::mem::take(&mut self.open_group).apply_clicks(clicks);
        tracing::debug!("Open group: {:?}", self.open_group);
    }

    /// Applies a single click on `group_id`'s expand control.
    pub fn toggle_expand(&mut self, group_id: &str) {
        self.open_group = std::mem::take(&mut self.open_group).toggle(group_id);
        tracing::debug!("Open group: {:?}", self.open_group);
    }

    /// Rows passing the current filters, in dataset order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&ChannelRow> {
        filter_rows(&self.dataset, &self.filters)
    }

    /// Panel of the open group, or `None` if closed or filtered out.
    #[must_use]
    pub fn panel(&self) -> Option<ExpansionPanel> {
        let group_id = self.open_group.group_id()?;
        expand(group_id, &self.filtered(), &self.selection)
    }

    /// Replaces the checked rows of the open group's panel.
    ///
    /// Returns the number of changed flags; zero when no panel is shown.
    pub fn set_panel_selection(&mut self, selected: &HashSet<&str>) -> usize {
        let Some(panel) = self.panel() else {
            tracing::debug!("Ignoring panel selection: no panel shown");
            return 0;
        };
        self.selection
            .apply_group_selection(&self.dataset, &panel.group_id, selected)
    }

    /// Flips one row of the open group's panel. Unknown rows are a no-op.
    pub fn toggle_panel_row(&mut self, url: &str) -> usize {
        let Some(panel) = self.panel() else {
            return 0;
        };
        let Some(row) = panel.row(url) else {
            tracing::debug!("Ignoring toggle of {url}: not in panel");
            return 0;
        };
        let mut selected: HashSet<&str> = panel.checked_urls().collect();
        if row.checked {
            selected.remove(url);
        } else {
            selected.insert(url);
        }
        self.selection
            .apply_group_selection(&self.dataset, &panel.group_id, &selected)
    }

    /// Checks or unchecks every row of the open group's panel.
    pub fn set_panel_all(&mut self, checked: bool) -> usize {
        let Some(panel) = self.panel() else {
            return 0;
        };
        let selected: HashSet<&str> = if checked {
            panel.rows.iter().map(|row| row.url.as_str()).collect()
        } else {
            HashSet::new()
        };
        self.selection
            .apply_group_selection(&self.dataset, &panel.group_id, &selected)
    }

    /// Card toggle: deselects the group if every visible channel is
    /// included, otherwise includes every visible channel.
    pub fn toggle_group_inclusion(&mut self, group_id: &str) -> usize {
        let filtered = filter_rows(&self.dataset, &self.filters);
        let visible: Vec<&str> = filtered
            .iter()
            .filter(|row| row.group_id == group_id)
            .map(|row| row.url.as_str())
            .collect();
        if visible.is_empty() {
            tracing::debug!("Ignoring inclusion toggle for hidden group {group_id}");
            return 0;
        }
        let all_included = visible.iter().all(|url| self.selection.is_included(url));
        let selected: HashSet<&str> = if all_included {
            HashSet::new()
        } else {
            visible.into_iter().collect()
        };
        self.selection
            .apply_group_selection(&self.dataset, group_id, &selected)
    }

    /// Derives the gallery and the output table from the current state.
    #[must_use]
    pub fn render(&self) -> SessionView<'_> {
        let filtered = self.filtered();
        SessionView {
            gallery: render_gallery(&filtered, &self.selection, &self.open_group),
            output: render_output(&self.dataset, &self.selection),
        }
    }

    /// Output table of the included channels.
    #[must_use]
    pub fn output(&self) -> OutputTable<'_> {
        render_output(&self.dataset, &self.selection)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::dataset::test_row;
    use crate::gallery::GalleryItem;
    use crate::selection::Inclusion;

    fn make_session() -> Session {
        Session::new(Arc::new(Dataset::from_rows([
            test_row("c1", "g1", "Gaming", "English", "US"),
            test_row("c2", "g1", "Music", "French", "FR"),
            test_row("c3", "g2", "Music", "English", "US"),
        ])))
    }

    fn output_urls(session: &Session) -> Vec<String> {
        session
            .output()
            .rows()
            .iter()
            .map(|row| row.url.clone())
            .collect()
    }

    #[test]
    fn test_open_and_select_one_channel() {
        // Arrange
        let mut session = make_session();

        // Act
        session.toggle_expand("g1");
        session.set_panel_selection(&HashSet::from(["c1"]));

        // Assert
        let selection = session.selection();
        assert_eq!(selection.get("c1"), Some(Inclusion::Yes));
        assert_eq!(selection.get("c2"), Some(Inclusion::No));
        assert_eq!(selection.get("c3"), Some(Inclusion::No));
        assert_eq!(output_urls(&session), ["c1"]);
    }

    #[test]
    fn test_comedy_filter_renders_placeholder() {
        // Arrange
        let mut session = make_session();

        // Act
        session.toggle_filter(FilterDimension::Genre, "Comedy");
        let view = session.render();

        // Assert
        assert!(session.filtered().is_empty());
        assert_eq!(view.gallery, Gallery::NoResults);
        assert_eq!(view.gallery.cards().count(), 0);
    }

    #[test]
    fn test_selection_kept_across_filter_changes() {
        // Arrange
        let mut session = make_session();
        session.toggle_expand("g2");
        session.toggle_panel_row("c3");

        // Act
        session.toggle_filter(FilterDimension::Genre, "Gaming");
        session.clear_filter(FilterDimension::Genre);

        // Assert
        assert_eq!(output_urls(&session), ["c3"]);
        assert!(session.render().gallery.panel().is_some());
    }

    #[test]
    fn test_panel_edit_without_open_group_is_noop() {
        // Arrange
        let mut session = make_session();

        // Act
        let changed = session.set_panel_selection(&HashSet::from(["c1"]));

        // Assert
        assert_eq!(changed, 0);
        assert!(session.output().is_empty());
    }

    #[test]
    fn test_panel_edit_when_open_group_filtered_out_is_noop() {
        // Arrange
        let mut session = make_session();
        session.toggle_expand("g2");
        session.toggle_filter(FilterDimension::Country, "FR");

        // Act
        let changed = session.toggle_panel_row("c3");

        // Assert
        assert_eq!(changed, 0);
        assert!(session.panel().is_none());
        assert!(session.render().gallery.panel().is_none());
    }

    #[test]
    fn test_toggle_panel_row_flips() {
        // Arrange
        let mut session = make_session();
        session.toggle_expand("g1");

        // Act & Assert
        session.toggle_panel_row("c2");
        assert!(session.selection().is_included("c2"));
        session.toggle_panel_row("c2");
        assert!(!session.selection().is_included("c2"));
        assert_eq!(session.toggle_panel_row("c3"), 0);
    }

    #[test]
    fn test_set_panel_all() {
        // Arrange
        let mut session = make_session();
        session.toggle_expand("g1");

        // Act & Assert
        assert_eq!(session.set_panel_all(true), 2);
        assert_eq!(output_urls(&session), ["c1", "c2"]);
        assert_eq!(session.set_panel_all(false), 2);
        assert!(session.output().is_empty());
    }

    #[test]
    fn test_switching_open_group_edits_only_new_group() {
        // Arrange
        let mut session = make_session();
        session.toggle_expand("g1");
        session.set_panel_all(true);

        // Act
        session.toggle_expand("g2");
        session.set_panel_selection(&HashSet::from(["c3"]));

        // Assert
        assert_eq!(session.open_group().group_id(), Some("g2"));
        assert_eq!(output_urls(&session), ["c1", "c2", "c3"]);
    }

    #[test]
    fn test_click_expand_latest_wins() {
        // Arrange
        let mut session = make_session();
        let clicks = [
            ToggleClick {
                group_id: String::from("g1"),
                clicked_at: Some(10),
            },
            ToggleClick {
                group_id: String::from("g2"),
                clicked_at: Some(20),
            },
        ];

        // Act
        session.click_expand(&clicks);

        // Assert
        assert_eq!(session.open_group(), &OpenGroup::Open(String::from("g2")));
    }

    #[test]
    fn test_toggle_group_inclusion() {
        // Arrange
        let mut session = make_session();

        // Act & Assert
        assert_eq!(session.toggle_group_inclusion("g1"), 2);
        let view = session.render();
        assert!(view.gallery.cards().next().unwrap().included_all());
        assert_eq!(session.toggle_group_inclusion("g1"), 2);
        assert!(session.output().is_empty());
        assert_eq!(session.toggle_group_inclusion("missing"), 0);
    }

    #[test]
    fn test_render_places_panel_after_card_row() {
        // Arrange
        let mut session = make_session();
        session.toggle_expand("g2");

        // Act
        let view = session.render();

        // Assert
        let Gallery::Items(items) = view.gallery else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(items.last(), Some(GalleryItem::Panel(panel)) if panel.group_id == "g2"));
    }

    #[test]
    fn test_sessions_share_dataset_but_not_state() {
        // Arrange
        let dataset = Arc::new(Dataset::from_rows([test_row(
            "c1", "g1", "Gaming", "English", "US",
        )]));
        let mut first = Session::new(Arc::clone(&dataset));
        let second = Session::new(dataset);

        // Act
        first.toggle_group_inclusion("g1");

        // Assert
        assert_eq!(first.output().len(), 1);
        assert!(second.output().is_empty());
        assert_eq!(second.filter_options().genres, ["Gaming"]);
    }
}
