//! Per-type field renderers.
//!
//! Every renderer binds one [`FieldDescriptor`] to a [`FormController`] by
//! field name. Widget-local state (edit buffers, cursors, previews) lives in
//! the renderer; the field value itself only ever lives in the controller.

mod checkbox_group;
mod choice;
mod custom;
mod date;
mod file;
pub(crate) mod helpers;
mod preview;
mod radio_group;
mod select;
mod switch;
mod text;
mod textarea;

use crossterm::event::KeyEvent;
use ratatui::text::Line;

use crate::domain::{FieldDescriptor, FieldKind};
use crate::form::{FieldRules, FormController};

pub use checkbox_group::CheckboxGroupComponent;
pub use choice::{ChoiceList, toggle_member};
pub use custom::{CustomComponent, CustomWidget, RatingWidget, WidgetChange, WidgetRegistry};
pub use date::DateComponent;
pub use file::{FileComponent, FileEntry};
pub use preview::{PreviewData, PreviewHandle, PreviewKind, PreviewRegistry};
pub use radio_group::RadioGroupComponent;
pub use select::SelectComponent;
pub use switch::SwitchComponent;
pub use text::TextComponent;
pub use textarea::TextareaComponent;

pub(crate) trait FieldComponent: std::fmt::Debug {
    fn descriptor(&self) -> &FieldDescriptor;

    /// Registers the field rules and loads widget state from the controller.
    fn bind(&mut self, controller: &mut dyn FormController) {
        let descriptor = self.descriptor();
        let name = descriptor.name.clone();
        let rules = FieldRules::new(descriptor.label.clone()).with_required(descriptor.required);
        controller.register(&name, rules);
        self.sync(controller);
    }

    /// Reloads widget-local state after the controller changed underneath,
    /// e.g. on reset.
    fn sync(&mut self, controller: &dyn FormController) {
        let _ = controller;
    }

    /// Lines the widget body occupies, borders and error line excluded.
    fn body_height(&self) -> u16 {
        1
    }

    fn render_body(&self, controller: &dyn FormController, focused: bool) -> Vec<Line<'static>>;

    /// Returns `true` when the key was consumed.
    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool;

    fn choices(&self, controller: &dyn FormController) -> Option<ChoiceList> {
        let _ = controller;
        None
    }

    fn apply_choices(
        &mut self,
        selection: usize,
        active: &[bool],
        controller: &mut dyn FormController,
    ) -> bool {
        let _ = (selection, active, controller);
        false
    }
}

/// Shared resources renderers are built with.
#[derive(Debug, Clone, Default)]
pub struct ComponentContext {
    pub previews: PreviewRegistry,
    pub widgets: WidgetRegistry,
}

/// Maps a descriptor's type tag to its renderer.
pub(crate) fn build_component(
    descriptor: &FieldDescriptor,
    context: &ComponentContext,
) -> Box<dyn FieldComponent> {
    let descriptor = descriptor.clone();
    match descriptor.kind {
        FieldKind::Text | FieldKind::Password | FieldKind::Number => {
            Box::new(TextComponent::new(descriptor))
        }
        FieldKind::Textarea => Box::new(TextareaComponent::new(descriptor)),
        FieldKind::SingleSelect | FieldKind::MultiSelect => {
            Box::new(SelectComponent::new(descriptor))
        }
        FieldKind::Date => Box::new(DateComponent::new(descriptor)),
        FieldKind::File => Box::new(FileComponent::new(descriptor, context.previews.clone())),
        FieldKind::Switch => Box::new(SwitchComponent::new(descriptor)),
        FieldKind::CheckboxGroup => Box::new(CheckboxGroupComponent::new(descriptor)),
        FieldKind::RadioGroup => Box::new(RadioGroupComponent::new(descriptor)),
        FieldKind::Custom => {
            let widget = descriptor
                .component
                .as_deref()
                .and_then(|name| context.widgets.create(name));
            Box::new(CustomComponent::new(descriptor, widget))
        }
    }
}
