use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Clear, List, ListItem, ListState},
};

use super::widgets::{popup_area, titled_block};

/// One row of a picker popup. Sentinel rows ("Select a Show",
/// "All Episodes") head the list; placeholder rows ("No episodes found")
/// are rendered dim.
pub enum PickerItem {
    Sentinel(&'static str),
    Entry(String),
    Placeholder(&'static str),
}

/// Centered popup list used for both the show and the episode picker.
pub fn render_picker(
    frame: &mut Frame,
    title: &str,
    items: &[PickerItem],
    list_state: &mut ListState,
    accent: Color,
) {
    let height = (items.len() as u16 + 2).clamp(3, 20);
    let area = popup_area(frame, 60, height);

    frame.render_widget(Clear, area);

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| match item {
            PickerItem::Sentinel(label) => {
                ListItem::new(*label).style(Style::default().add_modifier(Modifier::ITALIC))
            }
            PickerItem::Entry(label) => ListItem::new(label.clone()),
            PickerItem::Placeholder(label) => {
                ListItem::new(*label).style(Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let list = List::new(rows)
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
