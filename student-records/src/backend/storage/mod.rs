pub mod csv;
pub mod traits;

pub use traits::{CredentialStorage, EnrollmentStorage, ProfileStorage, SportStorage};
