//! # Storage Traits
//!
//! One trait per student table. The domain layer talks to these traits; the
//! CSV repositories in [`crate::backend::storage::csv`] implement them.
//!
//! Every `delete_for_student` method is a building block for
//! `AccountService::delete_student`, which is the only caller that should
//! remove a student's data.

use crate::backend::domain::models::{Credential, Profile, SportRecord, SubjectEnrollment};
use crate::backend::error::Result;

/// Trait defining the interface for profile storage operations
pub trait ProfileStorage: Send + Sync {
    /// Store a new profile
    fn store_profile(&self, profile: &Profile) -> Result<()>;

    /// Retrieve the first profile with this student ID
    fn get_profile(&self, student_id: &str) -> Result<Option<Profile>>;

    /// Check whether any profile already uses this student ID
    fn student_id_exists(&self, student_id: &str) -> Result<bool>;

    /// List all profiles in file order
    fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// Remove every profile with this student ID, returning how many were removed
    fn delete_for_student(&self, student_id: &str) -> Result<usize>;
}

/// Trait defining the interface for credential storage operations
pub trait CredentialStorage: Send + Sync {
    /// Store a new credential
    fn store_credential(&self, credential: &Credential) -> Result<()>;

    /// True if a credential matches both the ID and the password exactly
    fn verify_credential(&self, student_id: &str, password: &str) -> Result<bool>;

    /// List all credentials in file order
    fn list_credentials(&self) -> Result<Vec<Credential>>;

    /// Remove every credential with this student ID
    fn delete_for_student(&self, student_id: &str) -> Result<usize>;
}

/// Trait defining the interface for subject enrollment storage operations
pub trait EnrollmentStorage: Send + Sync {
    /// Store a new enrollment
    fn store_enrollment(&self, enrollment: &SubjectEnrollment) -> Result<()>;

    /// All enrollments for a student, in file order
    fn list_for_student(&self, student_id: &str) -> Result<Vec<SubjectEnrollment>>;

    /// List all enrollments in file order
    fn list_enrollments(&self) -> Result<Vec<SubjectEnrollment>>;

    /// Remove every enrollment with this student ID
    fn delete_for_student(&self, student_id: &str) -> Result<usize>;
}

/// Trait defining the interface for sport record storage operations
pub trait SportStorage: Send + Sync {
    /// Store a new sport record (append-only, never merges)
    fn store_sport_record(&self, record: &SportRecord) -> Result<()>;

    /// All sport records for a student, in file order
    fn list_for_student(&self, student_id: &str) -> Result<Vec<SportRecord>>;

    /// List all sport records in file order
    fn list_sport_records(&self) -> Result<Vec<SportRecord>>;

    /// Remove every sport record with this student ID
    fn delete_for_student(&self, student_id: &str) -> Result<usize>;
}
