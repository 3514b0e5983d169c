mod controller;
pub(crate) mod path;
mod rules;
mod schema;
mod state;
mod submit;
mod view;

pub use controller::FormController;
pub use rules::{FieldErrors, FieldRules, is_empty};
pub use schema::form_schema;
pub use state::FormState;
pub use submit::{FailureCallback, SubmitHandlers, SubmitOutcome, SuccessCallback};
pub use view::{Focus, FormEvent, FormView};
