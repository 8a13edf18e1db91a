//! Core curation logic for chcurate.
//!
//! Loads the channel dataset from CSV and derives every view of the
//! curation session (filtered rows, group cards, the expansion panel and
//! the output table) from one explicit [`Session`] state object.

/// Immutable channel dataset loaded from CSV.
pub mod dataset;
/// Filter selection and the filtering engine.
pub mod filter;
/// Group card gallery rendering.
pub mod gallery;
/// Output table of included channels.
pub mod output;
mod page;
/// Open-group state machine and the expansion panel.
pub mod panel;
/// Per-channel inclusion flags.
pub mod selection;
/// Session state and user-action transitions.
pub mod session;

pub use dataset::{ChannelRow, Dataset, FilterOptions, load_dataset};
pub use filter::{FilterDimension, FilterSelection, filter_rows};
pub use gallery::{CARDS_PER_ROW, CardStatus, Gallery, GalleryItem, GroupCard, render_gallery};
pub use output::{OUTPUT_COLUMNS, OUTPUT_PAGE_SIZE, OutputTable, render_output};
pub use panel::{ExpansionPanel, OpenGroup, PANEL_PAGE_SIZE, PanelRow, ToggleClick, expand};
pub use selection::{Inclusion, SelectionState};
pub use session::{Session, SessionView};
