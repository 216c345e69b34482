//! # CSV Sport Repository
//!
//! Sport records live in `sports.txt` as `student_id,description`. Every add
//! appends a new line; existing entries are never merged or overwritten.

use super::connection::CsvConnection;
use super::record_store::RecordStore;
use super::schema::{Record, SPORT_TABLE};
use crate::backend::domain::models::SportRecord;
use crate::backend::error::Result;
use crate::backend::storage::traits::SportStorage;

impl From<Record> for SportRecord {
    fn from(record: Record) -> Self {
        let mut fields = record.into_fields().into_iter();
        SportRecord {
            student_id: fields.next().unwrap_or_default(),
            description: fields.next().unwrap_or_default(),
        }
    }
}

/// CSV-based sport record repository
#[derive(Debug, Clone)]
pub struct SportRepository {
    store: RecordStore,
}

impl SportRepository {
    pub fn new(connection: &CsvConnection) -> Self {
        Self {
            store: connection.table(&SPORT_TABLE),
        }
    }
}

impl SportStorage for SportRepository {
    fn store_sport_record(&self, record: &SportRecord) -> Result<()> {
        self.store.append(&[&record.student_id, &record.description])
    }

    fn list_for_student(&self, student_id: &str) -> Result<Vec<SportRecord>> {
        Ok(self
            .store
            .find_by_key(student_id)?
            .into_iter()
            .map(SportRecord::from)
            .collect())
    }

    fn list_sport_records(&self) -> Result<Vec<SportRecord>> {
        Ok(self.store.read_all()?.into_iter().map(SportRecord::from).collect())
    }

    fn delete_for_student(&self, student_id: &str) -> Result<usize> {
        self.store.rewrite_excluding(student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::TestEnvironment;

    fn sport(student_id: &str, description: &str) -> SportRecord {
        SportRecord {
            student_id: student_id.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_sport_records_are_additive() {
        let env = TestEnvironment::new().unwrap();
        let repo = SportRepository::new(&env.connection);
        repo.store_sport_record(&sport("1234567", "Football 3-4 PM")).unwrap();
        repo.store_sport_record(&sport("7654321", "Chess")).unwrap();
        repo.store_sport_record(&sport("1234567", "Football 3-4 PM")).unwrap();

        let records = repo.list_for_student("1234567").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(repo.list_sport_records().unwrap().len(), 3);
    }
}
