//! Request and response types

pub mod query;
pub mod response;

pub use query::{ImageQuery, TextQuery};
pub use response::{AugmentedAnswer, Citation, ImageFollowUpResult};
