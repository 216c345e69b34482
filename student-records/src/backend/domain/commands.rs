//! Command and result types for account operations.

/// Everything collected from the registration form
#[derive(Debug, Clone, Default)]
pub struct RegisterStudentCommand {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub subjects: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterStudentResult {
    pub student_id: String,
}

#[derive(Debug, Clone)]
pub struct AddSportRecordCommand {
    pub student_id: String,
    pub description: String,
}

/// Records removed from each table by a delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteStudentResult {
    pub student_id: String,
    pub profiles_removed: usize,
    pub credentials_removed: usize,
    pub enrollments_removed: usize,
    pub sports_removed: usize,
}

impl DeleteStudentResult {
    pub fn total_removed(&self) -> usize {
        self.profiles_removed + self.credentials_removed + self.enrollments_removed + self.sports_removed
    }
}
