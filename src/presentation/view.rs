use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::form::{FormController, FormView};

use super::components::{render_footer, render_popup};

/// Everything one frame of the runtime draws.
pub struct UiContext<'a> {
    pub form: &'a FormView,
    pub controller: &'a dyn FormController,
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub focus_label: Option<&'a str>,
    pub help: Option<&'a str>,
    pub popup: Option<PopupRender<'a>>,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: usize,
    pub multi: bool,
    pub active: &'a [bool],
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let [body, footer] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(super::components::footer_height(&ctx)),
    ])
    .areas(frame.area());

    ctx.form.draw(frame, body, ctx.controller);
    render_footer(frame, footer, &ctx);

    if let Some(popup) = ctx.popup {
        render_popup(frame, popup);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    use super::*;
    use crate::domain::{FieldDescriptor, FieldKind, FieldOption, FormSpec};
    use crate::form::FormState;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_form_footer_and_popup() {
        let spec = FormSpec::new(vec![vec![
            FieldDescriptor::new("color", "Color", FieldKind::SingleSelect).with_options(vec![
                FieldOption::new("Red", "red"),
                FieldOption::new("Blue", "blue"),
            ]),
        ]]);
        let mut state = FormState::for_spec(&spec).unwrap();
        state.set_value("color", Some(json!("blue")));
        let view = FormView::new(spec, &mut state);
        let options = vec!["Red".to_string(), "Blue".to_string()];
        let mut terminal = Terminal::new(TestBackend::new(50, 16)).unwrap();
        terminal
            .draw(|frame| {
                draw(
                    frame,
                    UiContext {
                        form: &view,
                        controller: &state,
                        status_message: "Ready",
                        dirty: true,
                        error_count: 0,
                        focus_label: Some("Color"),
                        help: Some("Ctrl+S submit"),
                        popup: Some(PopupRender {
                            title: "Color",
                            options: &options,
                            selected: 1,
                            multi: false,
                            active: &[],
                        }),
                    },
                )
            })
            .unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Keys: Ctrl+S submit"));
        assert!(text.contains("unsaved changes"));
        assert!(text.contains("» Blue"));
    }
}
