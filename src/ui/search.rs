use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

/// Free-text search input. Filtering is applied live on every keystroke;
/// the cursor is only shown while the box has focus.
pub fn render_search_bar(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    is_active: bool,
    accent: Color,
) {
    let border = if is_active { accent } else { Color::DarkGray };
    let title = if is_active {
        " Search (Enter/Esc to leave) "
    } else {
        " Search (/) "
    };

    let bar = Paragraph::new(input)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title)
                .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(bar, area);

    if is_active {
        frame.set_cursor_position((area.x + input.len() as u16 + 1, area.y + 1));
    }
}
