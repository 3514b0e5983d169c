use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::domain::FormLayout;
use crate::field::FieldComponent;
use crate::form::{Focus, FormController, FormView};
use crate::layout::grid_columns;

use super::actions::render_actions;

const COLUMN_GAP: u16 = 1;

/// Draws the container, every group as one grid row, and the action row.
pub(crate) fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FormView,
    controller: &dyn FormController,
) {
    let spec = view.spec();
    let mut block = Block::default();
    if spec.container.borders {
        block = block.borders(Borders::ALL);
    }
    if let Some(title) = &spec.container.title {
        block = block.title(format!(" {title} "));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let has_actions = spec.submit().visible || spec.reset().visible;
    let [fields_area, actions_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(u16::from(has_actions)),
    ])
    .areas(inner);

    if view.rows().iter().all(Vec::is_empty) {
        frame.render_widget(
            Paragraph::new(Span::styled("No fields", Style::default().fg(Color::DarkGray))),
            fields_area,
        );
    } else {
        match spec.layout {
            FormLayout::Column => render_column(frame, fields_area, view, controller),
            FormLayout::Row => render_row(frame, fields_area, view, controller),
        }
    }

    if has_actions {
        render_actions(frame, actions_area, spec, view.focus());
    }
}

fn render_column(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FormView,
    controller: &dyn FormController,
) {
    let spacing = view.spec().container.spacing;
    let heights: Vec<u16> = view.rows().iter().map(|row| row_height(row)).collect();
    let focused_row = match view.focus() {
        Some(Focus::Field { row, .. }) => row,
        _ => heights.len().saturating_sub(1),
    };
    let first = first_visible_row(&heights, spacing, focused_row, area.height);

    let bottom = area.y.saturating_add(area.height);
    let mut y = area.y;
    for (index, row) in view.rows().iter().enumerate().skip(first) {
        let height = heights[index];
        if height == 0 {
            continue;
        }
        if y.saturating_add(height) > bottom {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, height);
        render_group(frame, rect, view, index, row, controller);
        y = y.saturating_add(height).saturating_add(spacing);
    }
}

fn render_row(frame: &mut Frame<'_>, area: Rect, view: &FormView, controller: &dyn FormController) {
    let rows = view.rows();
    if rows.is_empty() {
        return;
    }
    let count = rows.len() as u32;
    let columns = Layout::horizontal(rows.iter().map(|_| Constraint::Ratio(1, count)))
        .spacing(COLUMN_GAP)
        .split(area);
    for (index, (row, column)) in rows.iter().zip(columns.iter()).enumerate() {
        let height = row_height(row).min(column.height);
        let rect = Rect::new(column.x, column.y, column.width, height);
        render_group(frame, rect, view, index, row, controller);
    }
}

fn render_group(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FormView,
    row_index: usize,
    row: &[Box<dyn FieldComponent>],
    controller: &dyn FormController,
) {
    let spans = &view.spans()[row_index];
    let focused_column = match view.focus() {
        Some(Focus::Field { row, column }) if row == row_index => Some(column),
        _ => None,
    };
    let cells = grid_columns(area, spans, COLUMN_GAP);
    for (column, (component, cell)) in row.iter().zip(cells).enumerate() {
        if cell.width < 3 {
            continue;
        }
        render_field(
            frame,
            cell,
            component.as_ref(),
            focused_column == Some(column),
            controller,
        );
    }
}

fn render_field(
    frame: &mut Frame<'_>,
    area: Rect,
    component: &dyn FieldComponent,
    focused: bool,
    controller: &dyn FormController,
) {
    let descriptor = component.descriptor();
    let error = controller.error(&descriptor.name);
    let border_style = match (error.is_some(), focused) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::Yellow),
        (false, false) => Style::default().fg(Color::DarkGray),
    };
    let title_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let room = area.width.saturating_sub(2) as usize;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            fit_width(&descriptor.display_label(), room),
            title_style,
        ));
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            fit_width(message, room),
            Style::default().fg(Color::Red),
        )));
    }
    let body = component.render_body(controller, focused);
    frame.render_widget(Paragraph::new(body).block(block), area);
}

/// Height of a grid row: the tallest field body plus its border.
pub(crate) fn row_height(row: &[Box<dyn FieldComponent>]) -> u16 {
    row.iter()
        .map(|component| component.body_height().saturating_add(2))
        .max()
        .unwrap_or(0)
}

/// First row to draw so the focused row fits inside `available` lines.
fn first_visible_row(heights: &[u16], spacing: u16, focused: usize, available: u16) -> usize {
    let focused = focused.min(heights.len().saturating_sub(1));
    let mut first = 0;
    while first < focused {
        let needed: u32 = heights[first..=focused]
            .iter()
            .map(|height| u32::from(*height) + u32::from(spacing))
            .sum::<u32>()
            .saturating_sub(u32::from(spacing));
        if needed <= u32::from(available) {
            break;
        }
        first += 1;
    }
    first
}

/// First wrapped line of `text` that fits `width` cells, with an ellipsis when
/// something was cut.
pub(crate) fn fit_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width <= 1 {
        return "…".chars().take(width).collect();
    }
    let first = wrap(text, width - 1)
        .into_iter()
        .next()
        .map(|line| line.into_owned())
        .unwrap_or_default();
    let mut fitted = String::new();
    for ch in first.chars() {
        let candidate = format!("{fitted}{ch}");
        if UnicodeWidthStr::width(candidate.as_str()) > width - 1 {
            break;
        }
        fitted = candidate;
    }
    fitted.push('…');
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_width_keeps_short_text() {
        assert_eq!(fit_width("Name", 10), "Name");
    }

    #[test]
    fn fit_width_cuts_on_word_boundary() {
        assert_eq!(fit_width("Email is required", 10), "Email is…");
    }

    #[test]
    fn scrolls_until_focused_row_fits() {
        let heights = [3, 3, 3, 3];
        assert_eq!(first_visible_row(&heights, 0, 1, 9), 0);
        assert_eq!(first_visible_row(&heights, 0, 3, 9), 1);
        assert_eq!(first_visible_row(&heights, 1, 3, 9), 2);
    }
}
