mod components;
mod view;

pub(crate) use components::render_form;
pub use view::{PopupRender, UiContext, draw};
