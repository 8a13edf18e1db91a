//! Channel dataset loading and lookup.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::FilterDimension;

/// A single channel row.
///
/// Group-level display fields are repeated on every row of the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRow {
    /// Channel page URL (unique key).
    pub url: String,
    /// Channel display name.
    pub name: String,
    /// Channel group identifier.
    pub group_id: String,
    /// Group display name.
    pub group_name: String,
    /// Group thumbnail image URL.
    pub thumbnail_url: String,
    /// Group click-through URL.
    pub clickthrough_url: String,
    /// Curated genre label (shown on cards and panel rows).
    pub genre: String,
    /// Raw video genre (used by the genre filter).
    pub video_genre: Option<String>,
    /// Spoken language.
    pub language: Option<String>,
    /// Channel country.
    pub country: Option<String>,
}

/// CSV record as it appears in the dataset file.
#[derive(Debug, Deserialize)]
struct RawChannelRecord {
    #[serde(rename = "Channel_URL", default)]
    channel_url: Option<String>,
    #[serde(rename = "Channel_Name", default)]
    channel_name: Option<String>,
    #[serde(rename = "Channel_Group_ID", default)]
    group_id: Option<String>,
    #[serde(rename = "Channel_Group", default)]
    group_name: Option<String>,
    #[serde(rename = "Group_Thumbnail_URL", default)]
    thumbnail_url: Option<String>,
    #[serde(rename = "Group_Clickthrough_URL", default)]
    clickthrough_url: Option<String>,
    #[serde(rename = "Channel_Genre_Manual", default)]
    genre_manual: Option<String>,
    #[serde(rename = "Video_Genre", default)]
    video_genre: Option<String>,
    #[serde(rename = "Video_Language_Output", default)]
    language: Option<String>,
    #[serde(rename = "Channel_Country", default)]
    country: Option<String>,
}

/// Trims a field and maps blank values to `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl RawChannelRecord {
    /// Converts to a [`ChannelRow`]. Returns `None` for rows without a
    /// thumbnail, URL or group identifier.
    fn into_row(self) -> Option<ChannelRow> {
        let thumbnail_url = non_blank(self.thumbnail_url)?;
        let url = non_blank(self.channel_url)?;
        let group_id = non_blank(self.group_id)?;
        let name = non_blank(self.channel_name).unwrap_or_else(|| url.clone());
        let group_name = non_blank(self.group_name).unwrap_or_else(|| group_id.clone());
        Some(ChannelRow {
            url,
            name,
            group_id,
            group_name,
            thumbnail_url,
            clickthrough_url: non_blank(self.clickthrough_url).unwrap_or_default(),
            genre: non_blank(self.genre_manual).unwrap_or_default(),
            video_genre: non_blank(self.video_genre),
            language: non_blank(self.language),
            country: non_blank(self.country),
        })
    }
}

/// Distinct values available for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Sorted raw genres.
    pub genres: Vec<String>,
    /// Sorted spoken languages.
    pub languages: Vec<String>,
    /// Sorted countries.
    pub countries: Vec<String>,
}

impl FilterOptions {
    /// Returns the option values for a dimension.
    #[must_use]
    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Genre => &self.genres,
            FilterDimension::Language => &self.languages,
            FilterDimension::Country => &self.countries,
        }
    }
}

/// Immutable in-memory channel table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<ChannelRow>,
    /// Row index by channel URL.
    by_url: HashMap<String, usize>,
    /// Row indices by group identifier, in dataset order.
    by_group: HashMap<String, Vec<usize>>,
}

impl Dataset {
    /// Builds a dataset from already parsed rows.
    ///
    /// Rows repeating an earlier channel URL are skipped.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = ChannelRow>) -> Self {
        let mut dataset = Self::default();
        for row in rows {
            if dataset.by_url.contains_key(&row.url) {
                tracing::warn!("Skipping duplicate channel URL: {}", row.url);
                continue;
            }
            let idx = dataset.rows.len();
            dataset.by_url.insert(row.url.clone(), idx);
            dataset
                .by_group
                .entry(row.group_id.clone())
                .or_default()
                .push(idx);
            dataset.rows.push(row);
        }
        dataset
    }

    /// Parses a dataset from CSV data with a header row.
    ///
    /// Rows without a thumbnail URL, channel URL or group identifier are
    /// dropped, as are rows that cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV header cannot be read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        csv_reader
            .headers()
            .context("failed to read dataset header")?;

        let mut dropped: usize = 0;
        let mut rows = Vec::new();
        for (line, record) in csv_reader.deserialize::<RawChannelRecord>().enumerate() {
            match record {
                Ok(raw) => match raw.into_row() {
                    Some(row) => rows.push(row),
                    None => dropped = dropped.saturating_add(1),
                },
                Err(e) => {
                    tracing::warn!("Skipping undecodable dataset row {}: {e}", line.saturating_add(2));
                    dropped = dropped.saturating_add(1);
                }
            }
        }
        if dropped > 0 {
            tracing::debug!("Dropped {dropped} dataset row(s) without thumbnail, URL or group");
        }

        Ok(Self::from_rows(rows))
    }

    /// All rows in dataset order.
    #[must_use]
    pub fn rows(&self) -> &[ChannelRow] {
        &self.rows
    }

    /// Number of channels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset holds no channels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.by_group.len()
    }

    /// Looks up a channel by URL.
    #[must_use]
    pub fn channel(&self, url: &str) -> Option<&ChannelRow> {
        self.by_url.get(url).and_then(|&idx| self.rows.get(idx))
    }

    /// Returns `true` if any channel belongs to `group_id`.
    #[must_use]
    pub fn contains_group(&self, group_id: &str) -> bool {
        self.by_group.contains_key(group_id)
    }

    /// Channels of a group in dataset order. Empty for an unknown group.
    pub fn group_channels(&self, group_id: &str) -> impl Iterator<Item = &ChannelRow> {
        self.by_group
            .get(group_id)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .filter_map(|&idx| self.rows.get(idx))
    }

    /// Collects the sorted distinct values of every filter dimension.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let collect = |dimension: FilterDimension| -> Vec<String> {
            self.rows
                .iter()
                .filter_map(|row| dimension.value_of(row))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(String::from)
                .collect()
        };
        FilterOptions {
            genres: collect(FilterDimension::Genre),
            languages: collect(FilterDimension::Language),
            countries: collect(FilterDimension::Country),
        }
    }
}

/// Loads the dataset CSV from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header is unreadable.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let dataset = Dataset::from_reader(file)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    tracing::info!(
        "Loaded {} channels in {} groups from {}",
        dataset.len(),
        dataset.group_count(),
        path.display()
    );
    Ok(dataset)
}

/// Builds a row for tests. Group display fields derive from `group_id`.
#[cfg(test)]
pub(crate) fn test_row(
    url: &str,
    group_id: &str,
    genre: &str,
    language: &str,
    country: &str,
) -> ChannelRow {
    ChannelRow {
        url: String::from(url),
        name: format!("{url} name"),
        group_id: String::from(group_id),
        group_name: format!("{group_id} name"),
        thumbnail_url: format!("https://img.example/{group_id}.png"),
        clickthrough_url: format!("https://example.com/{group_id}"),
        genre: String::from(genre),
        video_genre: Some(String::from(genre)),
        language: Some(String::from(language)),
        country: Some(String::from(country)),
    }
}
