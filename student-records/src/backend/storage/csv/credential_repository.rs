//! # CSV Credential Repository
//!
//! Credentials live in `passwords.txt` as `student_id,password`.
//! Passwords are kept as plaintext.

use super::connection::CsvConnection;
use super::record_store::RecordStore;
use super::schema::{Record, CREDENTIAL_TABLE};
use crate::backend::domain::models::Credential;
use crate::backend::error::Result;
use crate::backend::storage::traits::CredentialStorage;

impl From<Record> for Credential {
    fn from(record: Record) -> Self {
        let mut fields = record.into_fields().into_iter();
        Credential {
            student_id: fields.next().unwrap_or_default(),
            password: fields.next().unwrap_or_default(),
        }
    }
}

/// CSV-based credential repository
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    store: RecordStore,
}

impl CredentialRepository {
    pub fn new(connection: &CsvConnection) -> Self {
        Self {
            store: connection.table(&CREDENTIAL_TABLE),
        }
    }
}

impl CredentialStorage for CredentialRepository {
    fn store_credential(&self, credential: &Credential) -> Result<()> {
        self.store.append(&[&credential.student_id, &credential.password])
    }

    fn verify_credential(&self, student_id: &str, password: &str) -> Result<bool> {
        for result in self.store.scan()? {
            let record = result?;
            if record.get(0) == Some(student_id) && record.get(1) == Some(password) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn list_credentials(&self) -> Result<Vec<Credential>> {
        Ok(self.store.read_all()?.into_iter().map(Credential::from).collect())
    }

    fn delete_for_student(&self, student_id: &str) -> Result<usize> {
        self.store.rewrite_excluding(student_id)
    }
}
