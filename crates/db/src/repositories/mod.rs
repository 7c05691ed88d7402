//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod customization_repo;
pub mod material_repo;
pub mod planning_sheet_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use customization_repo::CustomizationRepo;
pub use material_repo::MaterialRepo;
pub use planning_sheet_repo::PlanningSheetRepo;
pub use user_repo::UserRepo;
