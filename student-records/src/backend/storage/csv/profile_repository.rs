//! # CSV Profile Repository
//!
//! Profiles live in `students.txt`, one per line:
//!
//! ```csv
//! Amy,Lee,20,F,1234567
//! ```
//!
//! The student ID is the last column, unlike the other three tables.

use log::debug;

use super::connection::CsvConnection;
use super::record_store::RecordStore;
use super::schema::{Record, PROFILE_TABLE};
use crate::backend::domain::models::Profile;
use crate::backend::error::Result;
use crate::backend::storage::traits::ProfileStorage;

impl From<Record> for Profile {
    fn from(record: Record) -> Self {
        let mut fields = record.into_fields().into_iter();
        let mut next = || fields.next().unwrap_or_default();
        Profile {
            first_name: next(),
            last_name: next(),
            age: next(),
            gender: next(),
            student_id: next(),
        }
    }
}

/// CSV-based profile repository
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    store: RecordStore,
}

impl ProfileRepository {
    pub fn new(connection: &CsvConnection) -> Self {
        Self {
            store: connection.table(&PROFILE_TABLE),
        }
    }
}

impl ProfileStorage for ProfileRepository {
    fn store_profile(&self, profile: &Profile) -> Result<()> {
        self.store.append(&[
            &profile.first_name,
            &profile.last_name,
            &profile.age,
            &profile.gender,
            &profile.student_id,
        ])
    }

    fn get_profile(&self, student_id: &str) -> Result<Option<Profile>> {
        for result in self.store.scan()? {
            let record = result?;
            if PROFILE_TABLE.key_of(&record) == Some(student_id) {
                debug!("Found profile for student {}", student_id);
                return Ok(Some(record.into()));
            }
        }
        Ok(None)
    }

    fn student_id_exists(&self, student_id: &str) -> Result<bool> {
        Ok(self.get_profile(student_id)?.is_some())
    }

    fn list_profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.store.read_all()?.into_iter().map(Profile::from).collect())
    }

    fn delete_for_student(&self, student_id: &str) -> Result<usize> {
        self.store.rewrite_excluding(student_id)
    }
}
