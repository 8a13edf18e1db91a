//! Group card gallery: grouping, card view models and display rows.

use std::collections::HashMap;

use crate::dataset::ChannelRow;
use crate::panel::{ExpansionPanel, OpenGroup, expand};
use crate::selection::SelectionState;

/// Cards per display row.
pub const CARDS_PER_ROW: usize = 4;

/// Placeholder shown when the filters match nothing.
pub const NO_RESULTS_MESSAGE: &str = "No channels found based on the selected filters.";

/// Visual state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    /// Every channel of the group is included.
    Included,
    /// At least one channel is not included.
    Unselected,
}

impl CardStatus {
    /// Card label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Included => "Included",
            Self::Unselected => "Unselected",
        }
    }
}

/// View model of one group card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCard {
    /// Group identifier.
    pub group_id: String,
    /// Group display name.
    pub name: String,
    /// Thumbnail image URL.
    pub thumbnail_url: String,
    /// Click-through URL.
    pub clickthrough_url: String,
    /// Curated genre label.
    pub genre: String,
    /// URLs of the group's filtered channels, in filtered order.
    pub channel_urls: Vec<String>,
    /// Inclusion status.
    pub status: CardStatus,
}

impl GroupCard {
    /// Number of filtered channels in the group.
    #[must_use]
    pub const fn channel_count(&self) -> usize {
        self.channel_urls.len()
    }

    /// Returns `true` if every channel of the card is included.
    #[must_use]
    pub fn included_all(&self) -> bool {
        self.status == CardStatus::Included
    }
}

/// One vertical slot of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryItem {
    /// Up to [`CARDS_PER_ROW`] cards.
    CardRow(Vec<GroupCard>),
    /// Channel table of the open group, right below its card row.
    Panel(ExpansionPanel),
}

/// Rendered gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gallery {
    /// Nothing matched the filters.
    NoResults,
    /// Card rows, with the open group's panel inserted.
    Items(Vec<GalleryItem>),
}

impl Gallery {
    /// All cards in display order.
    pub fn cards(&self) -> impl Iterator<Item = &GroupCard> {
        let items: &[GalleryItem] = match self {
            Self::NoResults => &[],
            Self::Items(items) => items,
        };
        items.iter().flat_map(|item| match item {
            GalleryItem::CardRow(cards) => cards.as_slice(),
            GalleryItem::Panel(_) => &[][..],
        })
    }

    /// The inserted expansion panel, if any.
    #[must_use]
    pub fn panel(&self) -> Option<&ExpansionPanel> {
        match self {
            Self::NoResults => None,
            Self::Items(items) => items.iter().find_map(|item| match item {
                GalleryItem::Panel(panel) => Some(panel),
                GalleryItem::CardRow(_) => None,
            }),
        }
    }
}

/// Groups rows by group identifier in first-seen order.
///
/// Group display fields come from the first row of each group.
#[must_use]
pub fn group_rows<'a>(filtered: &[&'a ChannelRow]) -> Vec<Vec<&'a ChannelRow>> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&ChannelRow>> = Vec::new();
    for &row in filtered {
        let idx = *position.entry(row.group_id.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len().saturating_sub(1)
        });
        if let Some(group) = groups.get_mut(idx) {
            group.push(row);
        }
    }
    groups
}

/// Builds the card of one group.
fn build_card(rows: &[&ChannelRow], selection: &SelectionState) -> Option<GroupCard> {
    let first = rows.first()?;
    let included_all = rows.iter().all(|row| selection.is_included(&row.url));
    Some(GroupCard {
        group_id: first.group_id.clone(),
        name: first.group_name.clone(),
        thumbnail_url: first.thumbnail_url.clone(),
        clickthrough_url: first.clickthrough_url.clone(),
        genre: first.genre.clone(),
        channel_urls: rows.iter().map(|row| row.url.clone()).collect(),
        status: if included_all {
            CardStatus::Included
        } else {
            CardStatus::Unselected
        },
    })
}

/// Renders the card gallery for the filtered rows.
#[must_use]
pub fn render_gallery(
    filtered: &[&ChannelRow],
    selection: &SelectionState,
    open_group: &OpenGroup,
) -> Gallery {
    if filtered.is_empty() {
        return Gallery::NoResults;
    }

    let cards: Vec<GroupCard> = group_rows(filtered)
        .iter()
        .filter_map(|rows| build_card(rows, selection))
        .collect();

    let mut items = Vec::new();
    for row in cards.chunks(CARDS_PER_ROW) {
        let panel = open_group
            .group_id()
            .filter(|open| row.iter().any(|card| card.group_id == *open))
            .and_then(|open| expand(open, filtered, selection));
        items.push(GalleryItem::CardRow(row.to_vec()));
        if let Some(panel) = panel {
            items.push(GalleryItem::Panel(panel));
        }
    }
    Gallery::Items(items)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use std::collections::HashSet;

    use super::*;
    use crate::dataset::{Dataset, test_row};
    use crate::filter::{FilterDimension, FilterSelection, filter_rows};

    fn make_dataset(groups: usize) -> Dataset {
        Dataset::from_rows((0..groups).flat_map(|g| {
            [
                test_row(&format!("g{g}-a"), &format!("g{g}"), "Gaming", "English", "US"),
                test_row(&format!("g{g}-b"), &format!("g{g}"), "Music", "French", "FR"),
            ]
        }))
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        // Arrange
        let dataset = Dataset::from_rows([
            test_row("c1", "z", "Gaming", "English", "US"),
            test_row("c2", "a", "Gaming", "English", "US"),
            test_row("c3", "z", "Gaming", "English", "US"),
        ]);
        let filtered = filter_rows(&dataset, &FilterSelection::default());
        let selection = SelectionState::new(&dataset);

        // Act
        let gallery = render_gallery(&filtered, &selection, &OpenGroup::Closed);

        // Assert
        let ids: Vec<&str> = gallery.cards().map(|c| c.group_id.as_str()).collect();
        assert_eq!(ids, ["z", "a"]);
        assert_eq!(gallery.cards().next().unwrap().channel_count(), 2);
    }

    #[test]
    fn test_every_row_in_exactly_one_card() {
        // Arrange
        let dataset = make_dataset(6);
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Music");
        let selection = SelectionState::new(&dataset);

        for filters in [FilterSelection::default(), filters] {
            let filtered = filter_rows(&dataset, &filters);

            // Act
            let gallery = render_gallery(&filtered, &selection, &OpenGroup::Closed);

            // Assert
            let total: usize = gallery.cards().map(GroupCard::channel_count).sum();
            assert_eq!(total, filtered.len());
            let mut seen = HashSet::new();
            for card in gallery.cards() {
                for url in &card.channel_urls {
                    assert!(seen.insert(url.clone()));
                }
            }
            assert_eq!(seen.len(), filtered.len());
        }
    }

    #[test]
    fn test_rows_of_four_with_shorter_last_row() {
        // Arrange
        let dataset = make_dataset(6);
        let filtered = filter_rows(&dataset, &FilterSelection::default());
        let selection = SelectionState::new(&dataset);

        // Act
        let gallery = render_gallery(&filtered, &selection, &OpenGroup::Closed);

        // Assert
        let Gallery::Items(items) = gallery else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], GalleryItem::CardRow(cards) if cards.len() == 4));
        assert!(matches!(&items[1], GalleryItem::CardRow(cards) if cards.len() == 2));
    }

    #[test]
    fn test_panel_inserted_after_open_row() {
        // Arrange
        let dataset = make_dataset(6);
        let filtered = filter_rows(&dataset, &FilterSelection::default());
        let selection = SelectionState::new(&dataset);
        let open = OpenGroup::Open(String::from("g1"));

        // Act
        let gallery = render_gallery(&filtered, &selection, &open);

        // Assert
        let Gallery::Items(items) = &gallery else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[1], GalleryItem::Panel(panel) if panel.group_id == "g1"));
        assert_eq!(gallery.panel().unwrap().rows.len(), 2);
    }

    #[test]
    fn test_panel_for_group_in_last_row() {
        // Arrange
        let dataset = make_dataset(6);
        let filtered = filter_rows(&dataset, &FilterSelection::default());
        let selection = SelectionState::new(&dataset);
        let open = OpenGroup::Open(String::from("g5"));

        // Act
        let gallery = render_gallery(&filtered, &selection, &open);

        // Assert
        let Gallery::Items(items) = &gallery else {
            panic!("expected items");
        };
        assert!(matches!(items.last(), Some(GalleryItem::Panel(panel)) if panel.group_id == "g5"));
    }

    #[test]
    fn test_open_group_filtered_out_renders_no_panel() {
        // Arrange
        let dataset = Dataset::from_rows([
            test_row("c1", "g1", "Gaming", "English", "US"),
            test_row("c2", "g2", "Music", "English", "US"),
        ]);
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Music");
        let filtered = filter_rows(&dataset, &filters);
        let selection = SelectionState::new(&dataset);

        // Act
        let gallery = render_gallery(&filtered, &selection, &OpenGroup::Open(String::from("g1")));

        // Assert
        assert!(gallery.panel().is_none());
        assert_eq!(gallery.cards().count(), 1);
    }

    #[test]
    fn test_card_status_follows_selection() {
        // Arrange
        let dataset = make_dataset(2);
        let filtered = filter_rows(&dataset, &FilterSelection::default());
        let mut selection = SelectionState::new(&dataset);
        selection.apply_group_selection(&dataset, "g0", &HashSet::from(["g0-a", "g0-b"]));
        selection.apply_group_selection(&dataset, "g1", &HashSet::from(["g1-a"]));

        // Act
        let gallery = render_gallery(&filtered, &selection, &OpenGroup::Closed);

        // Assert
        let cards: Vec<&GroupCard> = gallery.cards().collect();
        assert_eq!(cards[0].status, CardStatus::Included);
        assert!(cards[0].included_all());
        assert_eq!(cards[1].status.label(), "Unselected");
    }

    #[test]
    fn test_included_all_only_considers_filtered_channels() {
        // Arrange
        let dataset = make_dataset(1);
        let mut selection = SelectionState::new(&dataset);
        selection.apply_group_selection(&dataset, "g0", &HashSet::from(["g0-b"]));
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Music");
        let filtered = filter_rows(&dataset, &filters);

        // Act
        let gallery = render_gallery(&filtered, &selection, &OpenGroup::Closed);

        // Assert
        assert_eq!(gallery.cards().next().unwrap().status, CardStatus::Included);
    }

    #[test]
    fn test_no_results_placeholder() {
        // Arrange
        let dataset = make_dataset(2);
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Comedy");
        let filtered = filter_rows(&dataset, &filters);
        let selection = SelectionState::new(&dataset);

        // Act
        let gallery = render_gallery(&filtered, &selection, &OpenGroup::Closed);

        // Assert
        assert_eq!(gallery, Gallery::NoResults);
        assert_eq!(gallery.cards().count(), 0);
    }

    #[test]
    fn test_card_uses_first_row_display_fields() {
        // Arrange
        let dataset = make_dataset(1);
        let filtered = filter_rows(&dataset, &FilterSelection::default());

        // Act
        let groups = group_rows(&filtered);

        // Assert
        assert_eq!(groups.len(), 1);
        let card = build_card(&groups[0], &SelectionState::new(&dataset)).unwrap();
        assert_eq!(card.name, "g0 name");
        assert_eq!(card.genre, "Gaming");
        assert_eq!(card.thumbnail_url, "https://img.example/g0.png");
    }
}
