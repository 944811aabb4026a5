//! Client side of the contact form: local validation, submission state and
//! the http call to the contact endpoint.

pub use api::{ContactApi, ContactApiError, ContactRequest, HttpContactApi};
pub use form::{ContactForm, Field, FormState, SubmitError, Toast};

pub mod api;
pub mod form;
