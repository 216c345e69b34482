//! # Domain Module
//!
//! Business rules for student accounts: identifier allocation, credential
//! checks and the cross-table register/delete flows. Storage details stay in
//! [`crate::backend::storage`].

pub mod account_service;
pub mod commands;
pub mod id_generator;
pub mod models;

pub use account_service::AccountService;
pub use commands::{AddSportRecordCommand, DeleteStudentResult, RegisterStudentCommand, RegisterStudentResult};
pub use id_generator::{RandomStudentIdGenerator, StudentIdGenerator};
