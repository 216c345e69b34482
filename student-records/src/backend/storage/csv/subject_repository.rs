//! # CSV Subject Repository
//!
//! Enrollments live in `subjects.txt` as `student_id,subjects`. The subject
//! list is one opaque field; it is written as-is and the commas inside it are
//! re-joined on read.

use super::connection::CsvConnection;
use super::record_store::RecordStore;
use super::schema::{Record, SUBJECT_TABLE};
use crate::backend::domain::models::SubjectEnrollment;
use crate::backend::error::Result;
use crate::backend::storage::traits::EnrollmentStorage;

impl From<Record> for SubjectEnrollment {
    fn from(record: Record) -> Self {
        let mut fields = record.into_fields().into_iter();
        SubjectEnrollment {
            student_id: fields.next().unwrap_or_default(),
            subjects: fields.next().unwrap_or_default(),
        }
    }
}

/// CSV-based subject enrollment repository
#[derive(Debug, Clone)]
pub struct SubjectRepository {
    store: RecordStore,
}

impl SubjectRepository {
    pub fn new(connection: &CsvConnection) -> Self {
        Self {
            store: connection.table(&SUBJECT_TABLE),
        }
    }
}

impl EnrollmentStorage for SubjectRepository {
    fn store_enrollment(&self, enrollment: &SubjectEnrollment) -> Result<()> {
        self.store.append(&[&enrollment.student_id, &enrollment.subjects])
    }

    fn list_for_student(&self, student_id: &str) -> Result<Vec<SubjectEnrollment>> {
        Ok(self
            .store
            .find_by_key(student_id)?
            .into_iter()
            .map(SubjectEnrollment::from)
            .collect())
    }

    fn list_enrollments(&self) -> Result<Vec<SubjectEnrollment>> {
        Ok(self.store.read_all()?.into_iter().map(SubjectEnrollment::from).collect())
    }

    fn delete_for_student(&self, student_id: &str) -> Result<usize> {
        self.store.rewrite_excluding(student_id)
    }
}
