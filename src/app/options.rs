use std::time::Duration;

/// Runtime behaviour of the interactive form.
#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    /// Re-run validation after each edit once a submit has reported errors.
    pub auto_validate: bool,
    pub confirm_exit: bool,
    pub show_help: bool,
    /// Leave the event loop as soon as a submit succeeds.
    pub exit_on_submit: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            auto_validate: true,
            confirm_exit: true,
            show_help: true,
            exit_on_submit: true,
        }
    }
}

impl UiOptions {
    pub fn with_auto_validate(mut self, enabled: bool) -> Self {
        self.auto_validate = enabled;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_exit_on_submit(mut self, exit: bool) -> Self {
        self.exit_on_submit = exit;
        self
    }

    pub(crate) fn help_text(&self) -> Option<&'static str> {
        self.show_help.then_some(
            "Tab/↑/↓ move • Enter pick/confirm • Ctrl+S submit • Ctrl+R reset • Ctrl+Q quit",
        )
    }
}
