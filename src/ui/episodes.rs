use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::catalog::{Episode, Show};

use super::widgets::titled_block;

fn episode_list_item(ep: &Episode) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("S{:02}E{:02}", ep.season, ep.number),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - "),
        Span::raw(ep.name.clone()),
    ]))
}

pub fn render_episodes_view(
    frame: &mut Frame,
    area: Rect,
    show: &Show,
    episodes: &[&Episode],
    list_state: &mut ListState,
    is_loading: bool,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let title = if is_loading {
        format!("{} - Episodes (loading...)", show.name)
    } else {
        format!("{} - Episodes", show.name)
    };

    if episodes.is_empty() {
        let hint = if is_loading {
            "Fetching episodes..."
        } else {
            "No episodes to display."
        };
        let empty = Paragraph::new(hint)
            .block(titled_block(&title, accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = episodes.iter().map(|ep| episode_list_item(ep)).collect();

        let list = List::new(items)
            .block(titled_block(&title, accent))
            .highlight_style(
                Style::default()
                    .bg(accent)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, chunks[0], list_state);
    }

    let highlighted = list_state.selected().and_then(|i| episodes.get(i).copied());
    render_episode_details(frame, chunks[1], highlighted, accent);
}

fn render_episode_details(frame: &mut Frame, area: Rect, episode: Option<&Episode>, accent: Color) {
    let Some(ep) = episode else {
        let empty = Paragraph::new("").block(titled_block("Details", accent));
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            ep.label(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Summary: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(
                ep.summary
                    .clone()
                    .unwrap_or_else(|| "No summary available.".to_string()),
            ),
        ]),
    ];

    if let Some(url) = &ep.url {
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
