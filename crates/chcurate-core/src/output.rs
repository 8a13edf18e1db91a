//! Output table of included channels.

use crate::dataset::{ChannelRow, Dataset};
use crate::page::{page_count, page_slice};
use crate::selection::{Inclusion, SelectionState};

/// Rows shown per output page.
pub const OUTPUT_PAGE_SIZE: usize = 20;

/// Column headers of the output table.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "Channel_URL",
    "Channel_Name",
    "Channel_Group_ID",
    "Channel_Group",
    "Group_Thumbnail_URL",
    "Group_Clickthrough_URL",
    "Channel_Genre_Manual",
    "Video_Genre",
    "Video_Language_Output",
    "Channel_Country",
    "Included",
];

/// Every channel flagged `Yes`, in dataset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable<'a> {
    rows: Vec<&'a ChannelRow>,
}

impl<'a> OutputTable<'a> {
    /// Included rows.
    #[must_use]
    pub fn rows(&self) -> &[&'a ChannelRow] {
        &self.rows
    }

    /// Number of included rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing is included. The header is still shown.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of pages (at least one).
    #[must_use]
    pub const fn page_count(&self) -> usize {
        page_count(self.rows.len(), OUTPUT_PAGE_SIZE)
    }

    /// Rows of one page (0-based).
    #[must_use]
    pub fn page(&self, page: usize) -> &[&'a ChannelRow] {
        page_slice(&self.rows, OUTPUT_PAGE_SIZE, page)
    }

    /// Cell values of a row, aligned with [`OUTPUT_COLUMNS`].
    #[must_use]
    pub fn cells(row: &ChannelRow) -> [String; 11] {
        [
            row.url.clone(),
            row.name.clone(),
            row.group_id.clone(),
            row.group_name.clone(),
            row.thumbnail_url.clone(),
            row.clickthrough_url.clone(),
            row.genre.clone(),
            row.video_genre.clone().unwrap_or_default(),
            row.language.clone().unwrap_or_default(),
            row.country.clone().unwrap_or_default(),
            Inclusion::Yes.to_string(),
        ]
    }
}

/// Collects every included channel across all groups.
#[must_use]
pub fn render_output<'a>(dataset: &'a Dataset, selection: &SelectionState) -> OutputTable<'a> {
    OutputTable {
        rows: dataset
            .rows()
            .iter()
            .filter(|row| selection.is_included(&row.url))
            .collect(),
    }
}
