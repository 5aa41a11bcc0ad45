//! Link domain - shareable document and data room links

mod entity;
mod validation;

pub use entity::{AccessPolicy, Link, LinkId, LinkKind};
pub use validation::{validate_link_id, validate_link_name, LinkValidationError};
