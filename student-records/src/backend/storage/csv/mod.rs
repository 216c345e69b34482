//! # CSV Storage Module
//!
//! Flat-file storage for student data. Four headerless, comma-delimited tables
//! share one data directory and are joined by the student ID.
//!
//! ## File Structure
//!
//! ```text
//! student_data/
//! ├── students.txt    first_name,last_name,age,gender,student_id
//! ├── passwords.txt   student_id,password
//! ├── subjects.txt    student_id,subjects
//! └── sports.txt      student_id,description
//! ```

pub mod connection;
pub mod credential_repository;
pub mod profile_repository;
pub mod record_store;
pub mod schema;
pub mod sport_repository;
pub mod subject_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use credential_repository::CredentialRepository;
pub use profile_repository::ProfileRepository;
pub use record_store::{RecordIter, RecordStore};
pub use schema::{Record, TableSchema};
pub use sport_repository::SportRepository;
pub use subject_repository::SubjectRepository;
