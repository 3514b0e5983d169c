use crate::{field::ChoiceList, presentation::PopupRender};

/// Picker for the options of a choice field.
pub(crate) struct PopupState {
    choices: ChoiceList,
}

impl PopupState {
    pub(crate) fn new(choices: ChoiceList) -> Self {
        Self { choices }
    }

    pub(crate) fn is_multi(&self) -> bool {
        self.choices.multi
    }

    pub(crate) fn select_previous(&mut self) {
        let len = self.choices.options.len();
        if len == 0 {
            return;
        }
        self.choices.selected = (self.choices.selected + len - 1) % len;
    }

    pub(crate) fn select_next(&mut self) {
        let len = self.choices.options.len();
        if len == 0 {
            return;
        }
        self.choices.selected = (self.choices.selected + 1) % len;
    }

    pub(crate) fn toggle_current(&mut self) {
        if let Some(flag) = self.choices.active.get_mut(self.choices.selected) {
            *flag = !*flag;
        }
    }

    pub(crate) fn selection(&self) -> usize {
        self.choices.selected
    }

    pub(crate) fn field(&self) -> &str {
        &self.choices.field
    }

    pub(crate) fn active(&self) -> &[bool] {
        &self.choices.active
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.choices.title,
            options: &self.choices.options,
            selected: self.choices.selected,
            multi: self.choices.multi,
            active: &self.choices.active,
        }
    }
}
