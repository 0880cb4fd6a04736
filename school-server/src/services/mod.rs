//! Domain operations on top of the record store.
//!
//! Handlers build a service per request from the shared [`Store`]; services
//! hold no state of their own.

pub mod avatar;
pub mod faculty;
pub mod math;
pub mod student;

pub use avatar::AvatarService;
pub use faculty::FacultyService;
pub use student::StudentService;

use crate::errors::ApiError;
use crate::models::{Faculty, Student};
use crate::store::{Store, StoreBackend, Table};

pub(crate) fn student_not_found(id: u64) -> ApiError {
    ApiError::not_found(format!("Student not found with id: {id}"))
}

pub(crate) fn faculty_not_found(id: u64) -> ApiError {
    ApiError::not_found(format!("Faculty not found with id: {id}"))
}

/// Loads a student or fails with 404
pub(crate) async fn find_student(store: &Store, id: u64) -> Result<Student, ApiError> {
    store.get(Table::Students, id).await?.ok_or_else(|| {
        log::warn!("Attempt to access non-existent student with id: {}", id);
        student_not_found(id)
    })
}

/// Loads a faculty or fails with 404
pub(crate) async fn find_faculty(store: &Store, id: u64) -> Result<Faculty, ApiError> {
    store.get(Table::Faculties, id).await?.ok_or_else(|| {
        log::warn!("Attempt to access non-existent faculty with id: {}", id);
        faculty_not_found(id)
    })
}
