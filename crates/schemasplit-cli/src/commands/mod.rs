//! Command implementations.

mod explode;
mod implode;
mod input;
mod validate;
mod verify;

pub use explode::ExplodeCommand;
pub use implode::ImplodeCommand;
pub use input::{load_document, read_value};
pub use validate::ValidateCommand;
pub use verify::VerifyCommand;
