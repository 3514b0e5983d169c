mod descriptor;
mod parser;
mod spec;

pub use descriptor::{FieldDescriptor, FieldGroup, FieldKind, FieldOption};
pub use parser::{SpecIssue, inspect_form_spec, inspect_form_spec_with, parse_form_spec};
pub use spec::{
    ActionButton, ActionsPlacement, ButtonSetting, ContainerProps, FormLayout, FormSpec,
};
