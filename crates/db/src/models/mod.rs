//! Entity models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for partial updates

pub mod course;
pub mod customization;
pub mod material;
pub mod planning_sheet;
pub mod user;
