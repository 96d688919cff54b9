//! Domain models for the patient roster.

mod form;
mod page;
mod patient;
mod vocab;

pub use form::*;
pub use page::*;
pub use patient::*;
pub use vocab::*;
