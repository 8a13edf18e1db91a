//! Curator TUI state management.

use chcurate_core::{
    CARDS_PER_ROW, FilterDimension, GroupCard, PANEL_PAGE_SIZE, PanelRow, Session, ToggleClick,
};

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Output table only.
    Main,
    /// Curated picks modal on top of the output table.
    Modal,
}

/// Focused area inside the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Filter selectors (left column).
    Filters,
    /// Card gallery.
    Gallery,
    /// Expansion panel of the open group.
    Panel,
}

/// State for the curator TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CuratorState {
    /// Curation session (filters, selection, open group).
    pub session: Session,
    /// Current screen.
    pub screen: Screen,
    /// Focused modal area.
    pub focus: Focus,
    /// Filter dimension under the cursor.
    pub filter_dimension: FilterDimension,
    /// Cursor within the active filter dimension's options.
    pub filter_cursor: usize,
    /// Cursor over the gallery cards (display order).
    pub card_cursor: usize,
    /// Cursor over the expansion panel rows (absolute index).
    pub panel_cursor: usize,
    /// Current output table page.
    pub output_page: usize,
}

impl CuratorState {
    /// Creates a new state on the main screen.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self {
            session,
            screen: Screen::Main,
            focus: Focus::Gallery,
            filter_dimension: FilterDimension::Genre,
            filter_cursor: 0,
            card_cursor: 0,
            panel_cursor: 0,
            output_page: 0,
        }
    }

    /// Opens the curated picks modal.
    pub const fn open_modal(&mut self) {
        self.screen = Screen::Modal;
    }

    /// Closes the modal, keeping filters and selection.
    pub fn close_modal(&mut self) {
        self.screen = Screen::Main;
        self.clamp_cursors();
    }

    /// Cards currently rendered, in display order.
    #[must_use]
    pub fn cards(&self) -> Vec<GroupCard> {
        self.session.render().gallery.cards().cloned().collect()
    }

    /// Card under the gallery cursor.
    #[must_use]
    pub fn current_card(&self) -> Option<GroupCard> {
        self.session
            .render()
            .gallery
            .cards()
            .nth(self.card_cursor)
            .cloned()
    }

    /// Panel row under the panel cursor.
    #[must_use]
    pub fn current_panel_row(&self) -> Option<PanelRow> {
        self.session
            .panel()
            .and_then(|panel| panel.rows.get(self.panel_cursor).cloned())
    }

    /// Option values of the active filter dimension.
    #[must_use]
    pub fn filter_values(&self) -> &[String] {
        self.session.filter_options().values(self.filter_dimension)
    }

    /// Cycles focus: filters, gallery, then the panel if one is shown.
    pub fn cycle_focus(&mut self) {
        let has_panel = self.session.panel().is_some();
        self.focus = match self.focus {
            Focus::Filters => Focus::Gallery,
            Focus::Gallery if has_panel => Focus::Panel,
            Focus::Gallery | Focus::Panel => Focus::Filters,
        };
    }

    /// Switches to the next filter dimension.
    pub const fn next_dimension(&mut self) {
        self.filter_dimension = self.filter_dimension.next();
        self.filter_cursor = 0;
    }

    /// Switches to the previous filter dimension.
    pub const fn prev_dimension(&mut self) {
        self.filter_dimension = self.filter_dimension.prev();
        self.filter_cursor = 0;
    }

    /// Moves the cursor up in the focused area.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Filters => self.filter_cursor = self.filter_cursor.saturating_sub(1),
            Focus::Gallery => {
                if self.card_cursor >= CARDS_PER_ROW {
                    self.card_cursor -= CARDS_PER_ROW;
                }
            }
            Focus::Panel => self.panel_cursor = self.panel_cursor.saturating_sub(1),
        }
    }

    /// Moves the cursor down in the focused area.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Filters => {
                if self.filter_cursor + 1 < self.filter_values().len() {
                    self.filter_cursor += 1;
                }
            }
            Focus::Gallery => {
                if self.card_cursor + CARDS_PER_ROW < self.cards().len() {
                    self.card_cursor += CARDS_PER_ROW;
                }
            }
            Focus::Panel => {
                let count = self.session.panel().map_or(0, |panel| panel.rows.len());
                if self.panel_cursor + 1 < count {
                    self.panel_cursor += 1;
                }
            }
        }
    }

    /// Moves the gallery cursor to the previous card.
    pub const fn move_left(&mut self) {
        self.card_cursor = self.card_cursor.saturating_sub(1);
    }

    /// Moves the gallery cursor to the next card.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_right(&mut self) {
        if self.card_cursor + 1 < self.cards().len() {
            self.card_cursor += 1;
        }
    }

    /// Toggles the filter value under the cursor.
    pub fn toggle_filter_value(&mut self) {
        let Some(value) = self.filter_values().get(self.filter_cursor).cloned() else {
            return;
        };
        self.session.toggle_filter(self.filter_dimension, &value);
        self.clamp_cursors();
    }

    /// Clears the active filter dimension.
    pub fn clear_filter_dimension(&mut self) {
        self.session.clear_filter(self.filter_dimension);
        self.clamp_cursors();
    }

    /// Builds a click on the expand control of the card under the cursor.
    #[must_use]
    pub fn expand_click(&self, clicked_at: i64) -> Option<ToggleClick> {
        self.current_card().map(|card| ToggleClick {
            group_id: card.group_id,
            clicked_at: Some(clicked_at),
        })
    }

    /// Applies expand clicks collected from one batch of events.
    ///
    /// Focus moves to the panel when one opens.
    pub fn apply_expand_clicks(&mut self, clicks: &[ToggleClick]) {
        if clicks.is_empty() {
            return;
        }
        self.session.click_expand(clicks);
        self.panel_cursor = 0;
        if self.session.panel().is_some() {
            self.focus = Focus::Panel;
        } else if self.focus == Focus::Panel {
            self.focus = Focus::Gallery;
        }
    }

    /// Toggles "include all channels" of the card under the cursor.
    pub fn toggle_current_card_inclusion(&mut self) {
        if let Some(card) = self.current_card() {
            self.session.toggle_group_inclusion(&card.group_id);
        }
    }

    /// Toggles inclusion of the panel row under the cursor.
    pub fn toggle_current_panel_row(&mut self) {
        if let Some(row) = self.current_panel_row() {
            self.session.toggle_panel_row(&row.url);
        }
    }

    /// Checks or unchecks every panel row.
    pub fn set_panel_all(&mut self, checked: bool) {
        self.session.set_panel_all(checked);
    }

    /// Page of the panel holding the cursor.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn panel_page(&self) -> usize {
        self.panel_cursor / PANEL_PAGE_SIZE
    }

    /// Moves the panel cursor to the first row of the next page.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn panel_next_page(&mut self) {
        let Some(panel) = self.session.panel() else {
            return;
        };
        let next = self.panel_page() + 1;
        if next < panel.page_count() {
            self.panel_cursor = next * PANEL_PAGE_SIZE;
        }
    }

    /// Moves the panel cursor to the first row of the previous page.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn panel_prev_page(&mut self) {
        self.panel_cursor = self.panel_page().saturating_sub(1) * PANEL_PAGE_SIZE;
    }

    /// Shows the next output page.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn output_next_page(&mut self) {
        if self.output_page + 1 < self.session.output().page_count() {
            self.output_page += 1;
        }
    }

    /// Shows the previous output page.
    pub const fn output_prev_page(&mut self) {
        self.output_page = self.output_page.saturating_sub(1);
    }

    /// URL to open for the focused item (click-through or channel page).
    #[must_use]
    pub fn focused_url(&self) -> Option<String> {
        match self.focus {
            Focus::Filters => None,
            Focus::Gallery => self
                .current_card()
                .map(|card| card.clickthrough_url)
                .filter(|url| !url.is_empty()),
            Focus::Panel => self.current_panel_row().map(|row| row.url),
        }
    }

    /// Keeps every cursor inside its list after the state changed.
    pub fn clamp_cursors(&mut self) {
        let option_count = self.filter_values().len();
        self.filter_cursor = self.filter_cursor.min(option_count.saturating_sub(1));

        let card_count = self.cards().len();
        self.card_cursor = self.card_cursor.min(card_count.saturating_sub(1));

        let panel_rows = self.session.panel().map_or(0, |panel| panel.rows.len());
        self.panel_cursor = self.panel_cursor.min(panel_rows.saturating_sub(1));
        if panel_rows == 0 && self.focus == Focus::Panel {
            self.focus = Focus::Gallery;
        }

        let output_pages = self.session.output().page_count();
        self.output_page = self.output_page.min(output_pages.saturating_sub(1));
    }
}
