pub mod error;
pub mod models;
pub mod tag;
pub mod time;

pub use error::{CoreError, ErrorCategory, Result};
pub use models::Validate;
pub use tag::Tag;
