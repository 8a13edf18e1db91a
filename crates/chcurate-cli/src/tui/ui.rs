//! TUI rendering logic for the curator.

use chcurate_core::gallery::NO_RESULTS_MESSAGE;
use chcurate_core::{
    CARDS_PER_ROW, CardStatus, ExpansionPanel, FilterDimension, Gallery, GalleryItem, GroupCard, OUTPUT_COLUMNS,
    OutputTable, PANEL_PAGE_SIZE,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Wrap};

use super::state::{CuratorState, Focus, Screen};

/// Height of one card row in the gallery.
const CARD_HEIGHT: u16 = 7;

/// Draws the curator UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &CuratorState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // output table
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_output(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);

    if state.screen == Screen::Modal {
        draw_modal(frame, frame.area(), state);
    }
}

/// Draws the header with dataset and selection counts.
fn draw_header(frame: &mut Frame, area: Rect, state: &CuratorState) {
    let dataset = state.session.dataset();
    let text = format!(
        "Included: {} / {}  Groups: {}",
        state.session.selection().included_count(),
        dataset.len(),
        dataset.group_count()
    );
    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Curator "));
    frame.render_widget(header, area);
}

/// Draws the output table of included channels.
fn draw_output(frame: &mut Frame, area: Rect, state: &CuratorState) {
    let output = state.session.output();
    let header = Row::new(OUTPUT_COLUMNS.to_vec())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = output
        .page(state.output_page)
        .iter()
        .map(|row| Row::new(OutputTable::cells(row).to_vec()))
        .collect();

    let widths = [
        Constraint::Min(16),    // Channel_URL
        Constraint::Min(12),    // Channel_Name
        Constraint::Length(10), // Channel_Group_ID
        Constraint::Min(12),    // Channel_Group
        Constraint::Min(8),     // Group_Thumbnail_URL
        Constraint::Min(8),     // Group_Clickthrough_URL
        Constraint::Length(12), // Channel_Genre_Manual
        Constraint::Length(12), // Video_Genre
        Constraint::Length(10), // Video_Language_Output
        Constraint::Length(8),  // Channel_Country
        Constraint::Length(8),  // Included
    ];

    let title = format!(
        " Curated List Output ({}) page {}/{} ",
        output.len(),
        state.output_page.saturating_add(1),
        output.page_count()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &CuratorState) {
    let help_text = match (state.screen, state.focus) {
        (Screen::Main, _) => "o: curated picks  [/]: output page  q: quit",
        (Screen::Modal, Focus::Filters) => {
            "Tab: focus  \u{2190}\u{2192}: dimension  \u{2191}\u{2193}: move  Space: toggle  x: clear  Enter: apply  Esc/c: close"
        }
        (Screen::Modal, Focus::Gallery) => {
            "Tab: focus  arrows: move  Enter/l: expand  Space: include all  o: open link  Esc/c: close"
        }
        (Screen::Modal, Focus::Panel) => {
            "Tab: focus  \u{2191}\u{2193}: move  Space: toggle  a: select all  A: deselect all  [/]: page  o: open channel  Enter: collapse"
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Returns a rectangle centered in `area` with the given percentages.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Draws the curated picks modal.
#[allow(clippy::indexing_slicing)]
fn draw_modal(frame: &mut Frame, area: Rect, state: &CuratorState) {
    let modal = centered_rect(92, 88, area);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Curated Channel Group Picks ");
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(inner);

    draw_filters(frame, columns[0], state);
    draw_gallery(frame, columns[1], state);
}

/// Draws the three filter selectors.
fn draw_filters(frame: &mut Frame, area: Rect, state: &CuratorState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (dimension, chunk) in FilterDimension::ALL.into_iter().zip(chunks.iter()) {
        draw_filter_list(frame, *chunk, state, dimension);
    }
}

/// Heading of a filter selector.
fn filter_heading(dimension: FilterDimension) -> String {
    match dimension {
        FilterDimension::Genre => format!("Filter By {dimension}"),
        FilterDimension::Language | FilterDimension::Country => dimension.to_string(),
    }
}

/// Draws one filter selector list.
#[allow(clippy::arithmetic_side_effects)]
fn draw_filter_list(frame: &mut Frame, area: Rect, state: &CuratorState, dimension: FilterDimension) {
    let is_active = state.focus == Focus::Filters && state.filter_dimension == dimension;
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let chosen = state.session.filters().values(dimension);
    let values = state.session.filter_options().values(dimension);

    // Keep the cursor in view.
    let visible = usize::from(area.height.saturating_sub(2)).max(1);
    let skip = if is_active && state.filter_cursor >= visible {
        state.filter_cursor + 1 - visible
    } else {
        0
    };

    let items: Vec<ListItem> = values
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, value)| {
            let is_cursor = is_active && i == state.filter_cursor;
            let is_chosen = chosen.contains(value);
            let checkbox = if is_chosen { "[x]" } else { "[ ]" };
            let style = if is_cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if is_chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {checkbox} {value}"),
                style,
            )))
        })
        .collect();

    let heading = filter_heading(dimension);
    let title = if chosen.is_empty() {
        format!(" {heading} ")
    } else {
        format!(" {heading} ({}) ", chosen.len())
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(list, area);
}

/// Height of one gallery item.
fn item_height(item: &GalleryItem, panel_page: usize) -> u16 {
    match item {
        GalleryItem::CardRow(_) => CARD_HEIGHT,
        // Borders and header around the rows of the shown page.
        GalleryItem::Panel(panel) => u16::try_from(panel.page(panel_page).len())
            .unwrap_or(u16::MAX)
            .saturating_add(3),
    }
}

/// Index of the item holding the focus: the panel when it is focused,
/// otherwise the card row under the cursor.
fn focused_item(items: &[GalleryItem], state: &CuratorState) -> usize {
    let mut cards_seen = 0_usize;
    for (idx, item) in items.iter().enumerate() {
        match item {
            GalleryItem::Panel(_) if state.focus == Focus::Panel => return idx,
            GalleryItem::Panel(_) => {}
            GalleryItem::CardRow(cards) => {
                cards_seen = cards_seen.saturating_add(cards.len());
                if state.card_cursor < cards_seen {
                    return idx;
                }
            }
        }
    }
    0
}

/// First item to draw so that `target` fits in `available` rows.
fn first_visible(heights: &[u16], target: usize, available: u16) -> usize {
    let mut first = target;
    let mut used = heights.get(target).copied().unwrap_or_default();
    while let Some(prev) = first.checked_sub(1) {
        let height = heights.get(prev).copied().unwrap_or_default();
        if used.saturating_add(height) > available {
            break;
        }
        used = used.saturating_add(height);
        first = prev;
    }
    first
}

/// Draws the gallery items in order (card rows with the open group's
/// panel right below its row), scrolled to keep the focus visible.
#[allow(clippy::arithmetic_side_effects)]
fn draw_gallery(frame: &mut Frame, area: Rect, state: &CuratorState) {
    let is_active = state.focus == Focus::Gallery;
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let gallery = state.session.render().gallery;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Groups ({}) ", gallery.cards().count()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = match gallery {
        Gallery::NoResults => {
            let placeholder = Paragraph::new(NO_RESULTS_MESSAGE)
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(placeholder, inner);
            return;
        }
        Gallery::Items(items) => items,
    };

    let panel_page = state.panel_page();
    let heights: Vec<u16> = items
        .iter()
        .map(|item| item_height(item, panel_page))
        .collect();
    let first = first_visible(&heights, focused_item(&items, state), inner.height);

    let mut y = inner.y;
    let mut card_index = 0_usize;
    for (idx, (item, height)) in items.iter().zip(heights).enumerate() {
        let row_start = card_index;
        if let GalleryItem::CardRow(cards) = item {
            card_index += cards.len();
        }
        if idx < first {
            continue;
        }
        if y >= inner.bottom() {
            break;
        }
        let item_area = Rect::new(inner.x, y, inner.width, height.min(inner.bottom() - y));
        match item {
            GalleryItem::CardRow(cards) => {
                draw_card_row(frame, item_area, state, cards, row_start);
            }
            GalleryItem::Panel(panel) => draw_panel(frame, item_area, state, panel),
        }
        y += height.min(inner.bottom() - y);
    }
}

/// Draws one row of cards; `first_index` is the display index of its first card.
#[allow(clippy::arithmetic_side_effects)]
fn draw_card_row(
    frame: &mut Frame,
    area: Rect,
    state: &CuratorState,
    cards: &[GroupCard],
    first_index: usize,
) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); CARDS_PER_ROW])
        .split(area);

    for (col, (card, cell)) in cards.iter().zip(cells.iter()).enumerate() {
        let is_cursor = state.focus == Focus::Gallery && first_index + col == state.card_cursor;
        draw_card(frame, *cell, state, card, is_cursor);
    }
}

/// Draws one group card.
fn draw_card(frame: &mut Frame, area: Rect, state: &CuratorState, card: &GroupCard, is_cursor: bool) {
    let is_open = state.session.open_group().is_open(&card.group_id);
    let border_style = if is_cursor {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if is_open {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let status_style = match card.status {
        CardStatus::Included => Style::default().fg(Color::Green),
        CardStatus::Unselected => Style::default().fg(Color::DarkGray),
    };
    let link_style = Style::default().fg(Color::Blue);
    let marker = if is_open { "\u{25be}" } else { "\u{25b8}" };

    let lines = vec![
        Line::from(Span::styled(
            card.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(card.genre.clone()),
        Line::from(Span::styled(card.thumbnail_url.clone(), link_style)),
        Line::from(Span::styled(card.clickthrough_url.clone(), link_style)),
        Line::from(vec![
            Span::raw(format!("{marker} {} ch  ", card.channel_count())),
            Span::styled(card.status.label(), status_style),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

/// Draws the expansion panel page holding the cursor.
#[allow(clippy::arithmetic_side_effects)]
fn draw_panel(frame: &mut Frame, area: Rect, state: &CuratorState, panel: &ExpansionPanel) {
    let is_active = state.focus == Focus::Panel;
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let header = Row::new(vec!["", "Channel", "Genre", "Country"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let page = state.panel_page();
    let first = page * PANEL_PAGE_SIZE;
    let rows: Vec<Row> = panel
        .page(page)
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let checkbox = if row.checked { "[x]" } else { "[ ]" };
            let style = if is_active && first + i == state.panel_cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if row.checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![
                String::from(checkbox),
                row.name.clone(),
                row.genre.clone(),
                row.country.clone(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let group_name = state
        .session
        .dataset()
        .group_channels(&panel.group_id)
        .next()
        .map_or_else(|| panel.group_id.clone(), |row| row.group_name.clone());
    let title = format!(
        " Channels of {group_name} ({}/{}) ",
        page + 1,
        panel.page_count()
    );
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(table, area);
}
