use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::PopupRender;
use super::layout::popup_rect;

pub(crate) fn render_popup(frame: &mut Frame<'_>, popup: PopupRender<'_>) {
    if popup.options.is_empty() {
        return;
    }
    let max_width = popup
        .options
        .iter()
        .map(|option| UnicodeWidthStr::width(option.as_str()))
        .chain(std::iter::once(UnicodeWidthStr::width(popup.title)))
        .max()
        .unwrap_or(10) as u16;
    let width_limit = frame.area().width.saturating_sub(2).max(1);
    let extra = if popup.multi { 10 } else { 6 };
    let width = max_width.saturating_add(extra).min(width_limit);
    let height = popup
        .options
        .len()
        .saturating_add(2)
        .min(frame.area().height as usize) as u16;
    let area = popup_rect(frame.area(), width, height.max(3));
    frame.render_widget(Clear, area);

    let items: Vec<ListItem<'static>> = popup
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let label = if popup.multi {
                let mark = popup.active.get(index).copied().unwrap_or(false);
                format!("[{}] {}", if mark { "x" } else { " " }, option)
            } else {
                option.clone()
            };
            ListItem::new(label)
        })
        .collect();
    let mut state = ListState::default();
    let selected = popup.selected.min(popup.options.len().saturating_sub(1));
    state.select(Some(selected));

    let hint = if popup.multi {
        " Space toggle, Enter apply "
    } else {
        " Enter select "
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(popup.title.to_string())
                .title_bottom(hint)
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut state);
}
