pub mod sanitizer;
pub mod validator;

pub use sanitizer::sanitize;
pub use validator::{validate, ComplianceReport};
