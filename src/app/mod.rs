mod grid_form;
pub(crate) mod input;
mod options;
mod popup;
mod runtime;
mod status;
mod terminal;

pub use grid_form::GridForm;
pub use options::UiOptions;
