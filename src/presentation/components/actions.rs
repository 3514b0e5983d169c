use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{ActionsPlacement, FormSpec};
use crate::form::Focus;

const BUTTON_SPACING: u16 = 2;

pub(crate) fn placement_flex(placement: ActionsPlacement) -> Flex {
    match placement {
        ActionsPlacement::FlexStart => Flex::Start,
        ActionsPlacement::Center => Flex::Center,
        ActionsPlacement::FlexEnd => Flex::End,
        ActionsPlacement::SpaceBetween => Flex::SpaceBetween,
        ActionsPlacement::SpaceAround => Flex::SpaceAround,
    }
}

/// Visible buttons in display order, paired with whether they hold focus.
fn buttons(spec: &FormSpec, focus: Option<Focus>) -> Vec<(String, bool)> {
    let mut buttons = Vec::with_capacity(2);
    let reset = spec.reset();
    if reset.visible {
        buttons.push((format!("[ {} ]", reset.label), focus == Some(Focus::Reset)));
    }
    let submit = spec.submit();
    if submit.visible {
        buttons.push((format!("[ {} ]", submit.label), focus == Some(Focus::Submit)));
    }
    buttons
}

pub(crate) fn render_actions(
    frame: &mut Frame<'_>,
    area: Rect,
    spec: &FormSpec,
    focus: Option<Focus>,
) {
    let buttons = buttons(spec, focus);
    if buttons.is_empty() {
        return;
    }
    let constraints = buttons
        .iter()
        .map(|(label, _)| Constraint::Length(UnicodeWidthStr::width(label.as_str()) as u16));
    let cells = Layout::horizontal(constraints)
        .flex(placement_flex(spec.actions_placement))
        .spacing(BUTTON_SPACING)
        .split(area);
    for ((label, focused), cell) in buttons.into_iter().zip(cells.iter()) {
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        frame.render_widget(Paragraph::new(label).style(style), *cell);
    }
}
