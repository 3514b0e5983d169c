use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Rectangle of at most `width` x `height` centred in `area`.
pub(crate) fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_inside_area() {
        let rect = popup_rect(Rect::new(0, 0, 40, 20), 10, 4);
        assert_eq!(rect, Rect::new(15, 8, 10, 4));
    }

    #[test]
    fn clamps_to_area() {
        let rect = popup_rect(Rect::new(2, 2, 8, 3), 20, 10);
        assert_eq!(rect, Rect::new(2, 2, 8, 3));
    }
}
