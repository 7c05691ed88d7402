//! Business workflows layered above the repositories.

pub mod planning;
