//! Student enrollment records kept in four flat files joined by student ID.

pub mod backend;
pub mod shell;
