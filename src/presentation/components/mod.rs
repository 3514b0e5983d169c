mod actions;
mod footer;
mod grid;
mod layout;
mod popup;

pub(crate) use footer::{footer_height, render_footer};
pub(crate) use grid::render_form;
pub(crate) use popup::render_popup;
