#![deny(rust_2018_idioms)]
//! Declarative terminal forms: field descriptors grouped into rows on a
//! 12-column grid, rendered with `ratatui` and bound to a form-state
//! controller that owns values, errors and submit dispatch.

mod app;
mod domain;
mod field;
mod form;
mod io;
pub mod layout;
mod presentation;

pub use app::{GridForm, UiOptions};
pub use domain::{
    ActionButton, ActionsPlacement, ButtonSetting, ContainerProps, FieldDescriptor, FieldGroup,
    FieldKind, FieldOption, FormLayout, FormSpec, SpecIssue, inspect_form_spec,
    inspect_form_spec_with, parse_form_spec,
};
pub use field::{
    ChoiceList, ComponentContext, CustomWidget, FileEntry, PreviewData, PreviewHandle,
    PreviewKind, PreviewRegistry, RatingWidget, WidgetChange, WidgetRegistry, toggle_member,
};
pub use form::{
    FailureCallback, FieldErrors, FieldRules, Focus, FormController, FormEvent, FormState,
    FormView, SubmitHandlers, SubmitOutcome, SuccessCallback, form_schema, is_empty,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, load_form_spec, parse_document_str,
    read_document, render_value,
};
pub use layout::{GRID_COLUMNS, allocate_spans, row_shortfall};
pub use presentation::{PopupRender, UiContext, draw};

pub mod prelude {
    pub use super::{
        FieldDescriptor, FieldKind, FieldOption, FormController, FormSpec, FormState, GridForm,
        SubmitHandlers, UiOptions,
    };
}
