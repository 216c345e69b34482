pub mod student;

pub use student::{Credential, Profile, SportRecord, StudentDirectory, StudentRecord, SubjectEnrollment};
