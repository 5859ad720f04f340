//! TUI rendering logic for the browser.

use moviehub_api::tmdb::MediaKind;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap};

use super::state::{BrowserState, DetailStatus, DetailView, Screen};
use super::view::{CardView, DetailPage, back_label, empty_message, listing_header};

/// Draws the current screen.
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    if let Screen::Detail(view) = state.screen() {
        draw_detail(frame, view, state.status_message());
    } else {
        draw_listing(frame, state);
    }
}

/// Draws the tabbed listing.
#[allow(clippy::indexing_slicing)]
fn draw_listing(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Length(3), // search box
            Constraint::Length(2), // heading
            Constraint::Min(5),    // cards
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], state.active_tab());
    draw_search_box(frame, chunks[1], state);
    draw_heading(frame, chunks[2], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);

    draw_cards(frame, body[0], state);
    draw_selected_card(frame, body[1], state);

    let hints = "Type: search  Tab/Shift+Tab: switch  \u{2191}\u{2193}: move  Enter: details  Esc: clear/quit  Ctrl+C: quit";
    draw_footer(frame, chunks[4], hints, state.status_message());
}

/// Draws the Movies / TV Shows tab bar.
fn draw_tabs(frame: &mut Frame, area: Rect, active: MediaKind) {
    let selected = MediaKind::ALL
        .iter()
        .position(|kind| *kind == active)
        .unwrap_or(0);
    let tabs = Tabs::new(MediaKind::ALL.iter().map(|kind| kind.label()))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" MovieHub "));
    frame.render_widget(tabs, area);
}

/// Draws the search input with its in-flight indicator.
fn draw_search_box(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let title = if state.is_searching() {
        " Search  Searching... "
    } else {
        " Search "
    };
    let text = Line::from(vec![
        Span::raw(state.search_query()),
        Span::styled("_", Style::default().fg(Color::DarkGray)),
    ]);
    let search = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(search, area);
}

/// Draws the listing heading, or the loading indicator.
fn draw_heading(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header = listing_header(state);
    let mut lines = vec![Line::from(Span::styled(
        header.title,
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(subtitle) = header.subtitle {
        lines.push(Line::from(subtitle));
    } else if state.is_loading() {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Draws the card table.
fn draw_cards(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let block = Block::default().borders(Borders::ALL);
    if state.display_items().is_empty() {
        let message = if state.is_loading() || state.is_searching() {
            String::new()
        } else {
            empty_message(state)
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Title", "Year", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .display_items()
        .iter()
        .map(|item| {
            let card = CardView::new(item);
            Row::new(vec![card.title, card.year, card.rating])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the selected card's summary.
fn draw_selected_card(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default().borders(Borders::ALL).title(" Selected ");
    let Some(item) = state.selected_item() else {
        frame.render_widget(block, area);
        return;
    };
    let card = CardView::new(item);
    let poster_style = if card.poster.is_placeholder() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Blue)
    };
    let lines = vec![
        Line::from(Span::styled(
            card.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{}  \u{2605} {}", card.year, card.rating)),
        Line::from(""),
        Line::from(Span::styled(String::from(card.poster.as_str()), poster_style)),
    ];
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(panel, area);
}

/// Draws a detail page in any of its states.
#[allow(clippy::indexing_slicing)]
fn draw_detail(frame: &mut Frame, view: &DetailView, status_message: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    let back = back_label(view.kind);
    let (title, lines) = match &view.status {
        DetailStatus::Loading => (
            format!(" {} ", view.kind.label()),
            vec![Line::from(Span::styled(
                "Loading details...",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        DetailStatus::Failed(message) => (
            format!(" {} ", view.kind.label()),
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
        ),
        DetailStatus::Ready(item) => {
            let page = DetailPage::new(item);
            let hero = page.hero.url().map_or_else(
                || Span::styled("No image", Style::default().fg(Color::DarkGray)),
                |url| Span::styled(String::from(url), Style::default().fg(Color::Blue)),
            );
            (
                format!(" {} ", page.title),
                vec![
                    Line::from(Span::styled(
                        page.title,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "{}  \u{2605} {} {}",
                        page.year, page.rating, page.votes
                    )),
                    Line::from(hero),
                    Line::from(""),
                    Line::from(page.overview),
                ],
            )
        }
    };

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(body, chunks[0]);

    let hints = format!("Esc/Backspace/\u{2190}: {back}  o: open image  Ctrl+C: quit");
    draw_footer(frame, chunks[1], &hints, status_message);
}

/// Draws the footer with key hints, or the pending status message.
fn draw_footer(frame: &mut Frame, area: Rect, hints: &str, status_message: Option<&str>) {
    let line = status_message.map_or_else(
        || Line::from(String::from(hints)),
        |message| {
            Line::from(Span::styled(
                String::from(message),
                Style::default().fg(Color::Red),
            ))
        },
    );
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
