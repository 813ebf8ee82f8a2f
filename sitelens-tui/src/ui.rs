use crate::app::{App, Focus};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use sitelens_core::card::{CardImage, CardProps};
use sitelens_core::view::{AnalyzerView, ItemsView, LOADING, NO_RESULTS};

pub fn draw(f: &mut Frame, app: &App) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Error notice / status
            Constraint::Length(7), // Overview
            Constraint::Min(5),    // Cards
            Constraint::Length(1), // Hints
        ])
        .split(f.area());

    render_input(f, app, chunks[0]);
    render_notice(f, app, &view, chunks[1]);
    render_overview(f, &view, chunks[2]);
    render_cards(f, app, &view, chunks[3]);
    render_hints(f, app, chunks[4]);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Site location ")
        .border_style(border_style(app.focus() == Focus::Input));

    let cursor_cols = app.input()[..app.cursor_position()].chars().count() as u16;
    let offset = input_scroll(cursor_cols, area.width.saturating_sub(2));

    let input = Paragraph::new(app.input())
        .style(Style::default().fg(Color::Yellow))
        .scroll((0, offset))
        .block(block);
    f.render_widget(input, area);

    if app.focus() == Focus::Input {
        f.set_cursor_position((area.x + 1 + cursor_cols - offset, area.y + 1));
    }
}

/// Horizontal scroll that keeps the cursor inside an input `width` columns wide.
fn input_scroll(cursor_cols: u16, width: u16) -> u16 {
    cursor_cols.saturating_sub(width.saturating_sub(1))
}

fn render_notice(f: &mut Frame, app: &App, view: &AnalyzerView, area: Rect) {
    let line = if let Some(notice) = view.error_notice() {
        Line::from(Span::styled(
            notice,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(status) = app.status() {
        Line::from(Span::styled(status, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_overview(f: &mut Frame, view: &AnalyzerView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Overview ")
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let label = Style::default().fg(Color::DarkGray);
    let text = if view.loading {
        vec![Line::from(Span::styled(
            LOADING,
            Style::default().fg(Color::Yellow),
        ))]
    } else if let Some(ref overview) = view.overview {
        vec![
            Line::from(Span::styled(
                overview.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Description: ", label),
                Span::raw(overview.description.clone()),
            ]),
            Line::from(vec![
                Span::styled("Theme: ", label),
                Span::raw(overview.theme.clone()),
            ]),
            Line::from(vec![
                Span::styled("Created: ", label),
                Span::raw(overview.created.clone()),
                Span::styled("  Last Updated: ", label),
                Span::raw(overview.updated.clone()),
            ]),
        ]
    } else {
        vec![Line::from(Span::styled(
            "Enter a site location and press Enter",
            label,
        ))]
    };

    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}

fn card_item(card: &CardProps, selected: bool) -> ListItem<'static> {
    let label = Style::default().fg(Color::DarkGray);
    let image = match card.image() {
        CardImage::Image(src) => Span::raw(src.to_string()),
        CardImage::Placeholder => Span::styled("[No Image]", label),
    };

    let lines = vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  {}", card.description)),
        Line::from(vec![
            Span::styled("  Image: ", label),
            image,
            Span::styled("  Last Updated: ", label),
            Span::raw(card.last_updated.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Content: ", label),
            Span::raw(card.content_url.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("  Source: ", label),
            Span::raw(card.source_url.clone().unwrap_or_else(|| "-".to_string())),
        ]),
    ];

    let mut style = Style::default();
    if selected {
        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    }
    ListItem::new(lines).style(style)
}

fn render_cards(f: &mut Frame, app: &App, view: &AnalyzerView, area: Rect) {
    let title = format!(" Items ({}) ", view.cards().len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(app.focus() == Focus::Cards));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cards = match &view.items {
        ItemsView::Empty => {
            let empty = Paragraph::new(NO_RESULTS).style(Style::default().fg(Color::DarkGray));
            f.render_widget(empty, inner);
            return;
        }
        ItemsView::Cards(cards) => cards,
    };

    // Each card takes five lines; keep the selection in view
    let per_page = (inner.height as usize / 5).max(1);
    let selected = app.selected_card().min(cards.len() - 1);
    let skip = (selected + 1).saturating_sub(per_page);

    let items: Vec<ListItem> = cards
        .iter()
        .enumerate()
        .skip(skip)
        .take(per_page)
        .map(|(idx, card)| card_item(card, app.focus() == Focus::Cards && idx == selected))
        .collect();

    f.render_widget(List::new(items), inner);
}

fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Black).bg(Color::Gray);
    let hints = match app.focus() {
        Focus::Input => Line::from(vec![
            Span::styled(" Enter ", key),
            Span::raw(" Analyze  "),
            Span::styled(" ↑/↓ ", key),
            Span::raw(" History  "),
            Span::styled(" Tab ", key),
            Span::raw(" Cards  "),
            Span::styled(" ESC ", key),
            Span::raw(" Quit"),
        ]),
        Focus::Cards => Line::from(vec![
            Span::styled(" ↑/↓ ", key),
            Span::raw(" Select  "),
            Span::styled(" o ", key),
            Span::raw(" Open content  "),
            Span::styled(" s ", key),
            Span::raw(" Open source  "),
            Span::styled(" Tab ", key),
            Span::raw(" Input  "),
            Span::styled(" ESC ", key),
            Span::raw(" Quit"),
        ]),
    };

    f.render_widget(
        Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray)),
        area,
    );
}
