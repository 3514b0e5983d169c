//! Proportional column allocation on a fixed 12 unit grid.

use ratatui::layout::Rect;

use crate::domain::FieldDescriptor;

/// Number of columns in one form row.
pub const GRID_COLUMNS: u16 = 12;

/// Computes the span of every field in a group.
///
/// Fields with an explicit span keep it (clamped to the grid width). The
/// columns left over are split evenly between the remaining fields and the
/// integer division remainder is dropped, so a row may undersum the grid. A
/// row whose explicit spans already fill the grid still gives auto fields one
/// column each.
pub fn allocate_spans(group: &[FieldDescriptor]) -> Vec<u16> {
    let defined: u32 = group
        .iter()
        .filter_map(FieldDescriptor::explicit_span)
        .map(u32::from)
        .sum();
    let auto_count = group
        .iter()
        .filter(|field| field.explicit_span().is_none())
        .count() as u32;
    let auto_span = if auto_count > 0 {
        let remaining = u32::from(GRID_COLUMNS).saturating_sub(defined);
        (remaining / auto_count).max(1) as u16
    } else {
        GRID_COLUMNS
    };

    group
        .iter()
        .map(|field| match field.explicit_span() {
            Some(span) => span.min(GRID_COLUMNS),
            None => auto_span,
        })
        .collect()
}

/// Columns of the row that stay empty after allocation.
pub fn row_shortfall(spans: &[u16]) -> u16 {
    let total: u32 = spans.iter().copied().map(u32::from).sum();
    u32::from(GRID_COLUMNS).saturating_sub(total) as u16
}

/// Splits `area` into one rectangle per span. Widths are proportional to the
/// span out of [`GRID_COLUMNS`]; `gap` cells separate neighbours. Cells past
/// the right edge are clipped, so an over-subscribed row loses its tail.
pub fn grid_columns(area: Rect, spans: &[u16], gap: u16) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(spans.len());
    let right = area.x.saturating_add(area.width);
    let mut consumed: u32 = 0;
    for span in spans {
        let start = column_offset(area.width, consumed);
        consumed += u32::from(*span);
        let end = column_offset(area.width, consumed);
        let x = area.x.saturating_add(start).min(right);
        let mut width = end.saturating_sub(start);
        if x.saturating_add(width) > right {
            width = right - x;
        }
        let is_last = rects.len() + 1 == spans.len();
        if !is_last && width > gap {
            width -= gap;
        }
        rects.push(Rect::new(x, area.y, width, area.height));
    }
    rects
}

fn column_offset(width: u16, columns: u32) -> u16 {
    let offset = u32::from(width) * columns / u32::from(GRID_COLUMNS);
    offset.min(u32::from(u16::MAX)) as u16
}
