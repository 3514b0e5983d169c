use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::UiContext;

pub(crate) fn footer_height(ctx: &UiContext<'_>) -> u16 {
    if ctx.help.is_some() { 4 } else { 2 }
}

pub(crate) fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let [help_area, status_area] = Layout::vertical([
        Constraint::Length(if ctx.help.is_some() { 2 } else { 0 }),
        Constraint::Min(1),
    ])
    .areas(area);

    if let Some(help) = ctx.help {
        let help_widget = Paragraph::new(format!("Keys: {help}"))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(help_widget, help_area);
    }

    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if let Some(label) = ctx.focus_label {
        status.push_str(" • focus: ");
        status.push_str(label);
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let badge = if ctx.error_count > 0 {
        Span::styled(
            format!("[! {}]", ctx.error_count),
            Style::default().fg(Color::Red).bg(Color::Black),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    };

    let status_widget = Paragraph::new(Line::from(vec![
        Span::raw("Status: "),
        Span::raw(status),
        Span::raw(" "),
        badge,
    ]))
    .wrap(Wrap { trim: true });
    frame.render_widget(status_widget, status_area);
}
