//! Filter selection state and the filtering engine.

use std::collections::BTreeSet;
use std::fmt;

use crate::dataset::{ChannelRow, Dataset};

/// One of the three independently filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    /// Raw video genre.
    Genre,
    /// Spoken language.
    Language,
    /// Channel country.
    Country,
}

impl FilterDimension {
    /// All dimensions in display order.
    pub const ALL: [Self; 3] = [Self::Genre, Self::Language, Self::Country];

    /// Returns the row's value for this dimension.
    #[must_use]
    pub fn value_of(self, row: &ChannelRow) -> Option<&str> {
        match self {
            Self::Genre => row.video_genre.as_deref(),
            Self::Language => row.language.as_deref(),
            Self::Country => row.country.as_deref(),
        }
    }

    /// Returns the next dimension, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Genre => Self::Language,
            Self::Language => Self::Country,
            Self::Country => Self::Genre,
        }
    }

    /// Returns the previous dimension, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Genre => Self::Country,
            Self::Language => Self::Genre,
            Self::Country => Self::Language,
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genre => write!(f, "Genre"),
            Self::Language => write!(f, "Spoken Language"),
            Self::Country => write!(f, "Channel Country"),
        }
    }
}

/// Chosen values per dimension. An empty set does not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// Chosen genres.
    pub genres: BTreeSet<String>,
    /// Chosen languages.
    pub languages: BTreeSet<String>,
    /// Chosen countries.
    pub countries: BTreeSet<String>,
}

impl FilterSelection {
    /// Returns the chosen values of a dimension.
    #[must_use]
    pub const fn values(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Genre => &self.genres,
            FilterDimension::Language => &self.languages,
            FilterDimension::Country => &self.countries,
        }
    }

    const fn values_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Genre => &mut self.genres,
            FilterDimension::Language => &mut self.languages,
            FilterDimension::Country => &mut self.countries,
        }
    }

    /// Adds `value` to the dimension, or removes it if already chosen.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) {
        let values = self.values_mut(dimension);
        if !values.remove(value) {
            values.insert(String::from(value));
        }
    }

    /// Replaces the chosen values of a dimension.
    pub fn set(&mut self, dimension: FilterDimension, values: impl IntoIterator<Item = String>) {
        *self.values_mut(dimension) = values.into_iter().collect();
    }

    /// Clears one dimension.
    pub fn clear(&mut self, dimension: FilterDimension) {
        self.values_mut(dimension).clear();
    }

    /// Returns `true` if no dimension restricts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        FilterDimension::ALL
            .iter()
            .all(|&dimension| self.values(dimension).is_empty())
    }

    /// Returns `true` if the row passes every non-empty dimension.
    #[must_use]
    pub fn matches(&self, row: &ChannelRow) -> bool {
        FilterDimension::ALL.iter().all(|&dimension| {
            let chosen = self.values(dimension);
            chosen.is_empty()
                || dimension
                    .value_of(row)
                    .is_some_and(|value| chosen.contains(value))
        })
    }
}

/// Returns the rows passing `filters`, in dataset order.
#[must_use]
pub fn filter_rows<'a>(dataset: &'a Dataset, filters: &FilterSelection) -> Vec<&'a ChannelRow> {
    dataset
        .rows()
        .iter()
        .filter(|row| filters.matches(row))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::dataset::test_row;

    fn make_dataset() -> Dataset {
        Dataset::from_rows([
            test_row("c1", "g1", "Gaming", "English", "US"),
            test_row("c2", "g1", "Gaming", "Spanish", "MX"),
            test_row("c3", "g2", "Music", "English", "GB"),
            test_row("c4", "g3", "Education", "French", "FR"),
            test_row("c5", "g2", "Music", "Spanish", "US"),
        ])
    }

    fn urls<'a>(rows: &[&'a ChannelRow]) -> Vec<&'a str> {
        rows.iter().map(|row| row.url.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_is_identity() {
        // Arrange
        let dataset = make_dataset();

        // Act
        let rows = filter_rows(&dataset, &FilterSelection::default());

        // Assert
        let expected: Vec<&ChannelRow> = dataset.rows().iter().collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_or_within_dimension() {
        // Arrange
        let dataset = make_dataset();
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Gaming");
        filters.toggle(FilterDimension::Genre, "Education");

        // Act
        let rows = filter_rows(&dataset, &filters);

        // Assert
        assert_eq!(urls(&rows), ["c1", "c2", "c4"]);
    }

    #[test]
    fn test_and_across_dimensions() {
        // Arrange
        let dataset = make_dataset();
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Language, "Spanish");
        filters.toggle(FilterDimension::Country, "US");

        // Act
        let rows = filter_rows(&dataset, &filters);

        // Assert
        assert_eq!(urls(&rows), ["c5"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        // Arrange
        let dataset = make_dataset();
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Comedy");

        // Act
        let rows = filter_rows(&dataset, &filters);

        // Assert
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_value_never_matches_restricted_dimension() {
        // Arrange
        let mut row = test_row("c1", "g1", "Gaming", "English", "US");
        row.language = None;
        let dataset = Dataset::from_rows([row]);
        let mut filters = FilterSelection::default();

        // Act & Assert
        assert_eq!(filter_rows(&dataset, &filters).len(), 1);
        filters.toggle(FilterDimension::Language, "English");
        assert!(filter_rows(&dataset, &filters).is_empty());
    }

    #[test]
    fn test_adding_dimension_never_grows_result() {
        // Arrange
        let dataset = make_dataset();
        let options = dataset.filter_options();
        let mut filters = FilterSelection::default();
        filters.toggle(FilterDimension::Genre, "Music");
        let baseline = filter_rows(&dataset, &filters).len();

        // Act & Assert: restricting another dimension never adds rows
        for dimension in [FilterDimension::Language, FilterDimension::Country] {
            for value in options.values(dimension) {
                let mut narrowed = filters.clone();
                narrowed.toggle(dimension, value);
                assert!(filter_rows(&dataset, &narrowed).len() <= baseline);
            }
        }
    }

    #[test]
    fn test_first_value_in_empty_dimension_never_grows_result() {
        // Arrange
        let dataset = make_dataset();
        let options = dataset.filter_options();

        // Act & Assert
        for dimension in FilterDimension::ALL {
            for value in options.values(dimension) {
                let mut filters = FilterSelection::default();
                filters.toggle(dimension, value);
                assert!(filter_rows(&dataset, &filters).len() <= dataset.len());
            }
        }
    }

    #[test]
    fn test_toggle_and_clear() {
        // Arrange
        let mut filters = FilterSelection::default();

        // Act & Assert
        filters.toggle(FilterDimension::Country, "US");
        assert!(filters.countries.contains("US"));
        assert!(!filters.is_empty());

        filters.toggle(FilterDimension::Country, "US");
        assert!(filters.is_empty());

        filters.set(
            FilterDimension::Genre,
            [String::from("Music"), String::from("Gaming")],
        );
        assert_eq!(filters.genres.len(), 2);
        filters.clear(FilterDimension::Genre);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_dimension_cycle() {
        // Arrange & Act & Assert
        assert_eq!(FilterDimension::Genre.next(), FilterDimension::Language);
        assert_eq!(FilterDimension::Country.next(), FilterDimension::Genre);
        assert_eq!(FilterDimension::Genre.prev(), FilterDimension::Country);
        assert_eq!(FilterDimension::Language.to_string(), "Spoken Language");
    }
}
