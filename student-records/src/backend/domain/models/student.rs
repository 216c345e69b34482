//! Domain models for the four student tables and the views assembled from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Personal details captured at registration.
/// Stored with the student ID as the last column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub student_id: String,
}

/// Login credential for one student. The password is stored as plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub student_id: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("student_id", &self.student_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Subjects a student enrolled in, kept as one comma-joined string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectEnrollment {
    pub student_id: String,
    pub subjects: String,
}

/// One sports entry, e.g. "Football 3-4 PM". A student may have many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportRecord {
    pub student_id: String,
    pub description: String,
}

/// Everything known about one student, read across all tables.
///
/// `profile` is `None` when subject or sports rows outlive the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub profile: Option<Profile>,
    pub subjects: Vec<String>,
    pub sports: Vec<String>,
}

/// Full, unfiltered contents of every table
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    pub profiles: Vec<Profile>,
    pub credentials: Vec<Credential>,
    pub enrollments: Vec<SubjectEnrollment>,
    pub sports: Vec<SportRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_hides_password() {
        let credential = Credential {
            student_id: "1234567".to_string(),
            password: "hunter2".to_string(),
        };

        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("1234567"));
        assert!(!rendered.contains("hunter2"));
    }
}
