use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::catalog::Show;

use super::widgets::titled_block;

pub fn render_shows_view(
    frame: &mut Frame,
    area: Rect,
    shows: &[&Show],
    list_state: &mut ListState,
    is_loading: bool,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_show_list(frame, chunks[0], shows, list_state, is_loading, accent);

    let highlighted = list_state.selected().and_then(|i| shows.get(i).copied());
    render_show_details(frame, chunks[1], highlighted, accent);
}

fn render_show_list(
    frame: &mut Frame,
    area: Rect,
    shows: &[&Show],
    list_state: &mut ListState,
    is_loading: bool,
    accent: Color,
) {
    let title = if is_loading { "Shows (loading...)" } else { "Shows" };

    if shows.is_empty() {
        let hint = if is_loading {
            "Fetching the catalog..."
        } else {
            "No shows to display."
        };
        let empty = Paragraph::new(hint)
            .block(titled_block(title, accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = shows
        .iter()
        .map(|show| {
            let mut spans = vec![Span::raw(show.name.clone())];
            if let Some(rating) = show.rating {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("★ {}", rating),
                    Style::default().fg(Color::Yellow),
                ));
            }
            if !show.genres.is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    show.genres.join(", "),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(titled_block(title, accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

fn render_show_details(frame: &mut Frame, area: Rect, show: Option<&Show>, accent: Color) {
    let Some(show) = show else {
        let empty = Paragraph::new("")
            .block(titled_block("Details", accent));
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            show.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        detail_line(
            "Summary: ",
            show.summary
                .clone()
                .unwrap_or_else(|| "No summary available.".to_string()),
        ),
        detail_line(
            "Genres: ",
            if show.genres.is_empty() {
                "N/A".to_string()
            } else {
                show.genres.join(", ")
            },
        ),
        detail_line("Status: ", option_or_na(show.status.clone())),
        detail_line(
            "Rating: ",
            show.rating.map(|r| r.to_string()).unwrap_or_else(|| "N/A".to_string()),
        ),
        detail_line(
            "Runtime: ",
            show.runtime
                .map(|r| format!("{} minutes", r))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ];

    if let Some(url) = &show.url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("More info: {}", url),
            Style::default().fg(Color::Blue),
        )));
    }

    let details = Paragraph::new(lines)
        .block(titled_block("Details", accent))
        .wrap(Wrap { trim: true });

    frame.render_widget(details, area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

fn option_or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}
