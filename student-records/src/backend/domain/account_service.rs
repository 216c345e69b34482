use log::{debug, info, warn};
use std::sync::Arc;

use super::commands::{
    AddSportRecordCommand, DeleteStudentResult, RegisterStudentCommand, RegisterStudentResult,
};
use super::id_generator::{RandomStudentIdGenerator, StudentIdGenerator};
use super::models::{
    Credential, Profile, SportRecord, StudentDirectory, StudentRecord, SubjectEnrollment,
};
use crate::backend::config::AdminCredentials;
use crate::backend::error::{Result, StudentRecordsError};
use crate::backend::storage::csv::{
    CredentialRepository, CsvConnection, ProfileRepository, SportRepository, SubjectRepository,
};
use crate::backend::storage::traits::{
    CredentialStorage, EnrollmentStorage, ProfileStorage, SportStorage,
};

/// Candidate IDs tried before registration gives up
pub const MAX_ID_ATTEMPTS: u32 = 100;

/// Service for registering, authenticating and removing students.
///
/// This is the only place that writes to more than one table. Registration
/// appends a profile, a credential and a subject enrollment; deletion rewrites
/// all four tables. Neither is atomic across tables: a storage failure part way
/// through is returned to the caller and earlier writes stay in place.
#[derive(Clone)]
pub struct AccountService {
    connection: Arc<CsvConnection>,
    profile_repository: ProfileRepository,
    credential_repository: CredentialRepository,
    subject_repository: SubjectRepository,
    sport_repository: SportRepository,
    id_generator: Arc<dyn StudentIdGenerator>,
    admin: AdminCredentials,
}

impl AccountService {
    /// Create a new AccountService with random student IDs
    pub fn new(connection: Arc<CsvConnection>, admin: AdminCredentials) -> Self {
        Self::with_id_generator(connection, admin, Arc::new(RandomStudentIdGenerator))
    }

    pub fn with_id_generator(
        connection: Arc<CsvConnection>,
        admin: AdminCredentials,
        id_generator: Arc<dyn StudentIdGenerator>,
    ) -> Self {
        Self {
            profile_repository: ProfileRepository::new(&connection),
            credential_repository: CredentialRepository::new(&connection),
            subject_repository: SubjectRepository::new(&connection),
            sport_repository: SportRepository::new(&connection),
            connection,
            id_generator,
            admin,
        }
    }

    /// Make sure the data directory and every table exist
    pub fn initialize_storage(&self) -> Result<()> {
        info!("Initializing student data in {:?}", self.connection.base_directory());
        self.connection.initialize_if_absent()
    }

    /// Register a new student and return the generated ID
    pub fn register_student(&self, command: RegisterStudentCommand) -> Result<RegisterStudentResult> {
        self.validate_register_command(&command)?;

        let student_id = self.allocate_student_id()?;
        info!("Registering student {} {} as {}", command.first_name.trim(), command.last_name.trim(), student_id);

        self.profile_repository.store_profile(&Profile {
            first_name: command.first_name.trim().to_string(),
            last_name: command.last_name.trim().to_string(),
            age: command.age.trim().to_string(),
            gender: command.gender.trim().to_string(),
            student_id: student_id.clone(),
        })?;
        self.credential_repository.store_credential(&Credential {
            student_id: student_id.clone(),
            password: command.password,
        })?;
        self.subject_repository.store_enrollment(&SubjectEnrollment {
            student_id: student_id.clone(),
            subjects: command.subjects.trim().to_string(),
        })?;

        info!("Registered student {}", student_id);
        Ok(RegisterStudentResult { student_id })
    }

    /// Check a student's ID and password. The first exact match wins.
    pub fn authenticate(&self, student_id: &str, password: &str) -> Result<()> {
        let student_id = student_id.trim();
        if self.credential_repository.verify_credential(student_id, password)? {
            debug!("Student {} authenticated", student_id);
            Ok(())
        } else {
            warn!("Failed login attempt for student {}", student_id);
            Err(StudentRecordsError::Auth)
        }
    }

    /// Check the administrator login against the configured account
    pub fn authenticate_admin(&self, username: &str, password: &str) -> Result<()> {
        if username == self.admin.username && password == self.admin.password {
            debug!("Admin {} authenticated", username);
            Ok(())
        } else {
            warn!("Failed admin login attempt for {}", username);
            Err(StudentRecordsError::Auth)
        }
    }

    /// Append one sports entry. The student ID is not checked against the profiles.
    pub fn add_sport_record(&self, command: AddSportRecordCommand) -> Result<SportRecord> {
        if command.student_id.trim().is_empty() {
            return Err(StudentRecordsError::missing_field("Student ID"));
        }
        if command.description.trim().is_empty() {
            return Err(StudentRecordsError::missing_field("Sports description"));
        }

        let record = SportRecord {
            student_id: command.student_id.trim().to_string(),
            description: command.description.trim().to_string(),
        };
        self.sport_repository.store_sport_record(&record)?;

        info!("Added sports entry for student {}", record.student_id);
        Ok(record)
    }

    pub fn fetch_profile(&self, student_id: &str) -> Result<Profile> {
        let student_id = student_id.trim();
        self.profile_repository
            .get_profile(student_id)?
            .ok_or_else(|| StudentRecordsError::NotFound(format!("student {}", student_id)))
    }

    /// Subject lists for a student, one entry per enrollment record
    pub fn fetch_subjects(&self, student_id: &str) -> Result<Vec<String>> {
        Ok(self
            .subject_repository
            .list_for_student(student_id.trim())?
            .into_iter()
            .map(|enrollment| enrollment.subjects)
            .collect())
    }

    pub fn fetch_sports(&self, student_id: &str) -> Result<Vec<String>> {
        Ok(self
            .sport_repository
            .list_for_student(student_id.trim())?
            .into_iter()
            .map(|record| record.description)
            .collect())
    }

    /// Profile, subjects and sports for one student.
    ///
    /// A missing profile does not hide the other tables' rows.
    pub fn fetch_student_record(&self, student_id: &str) -> Result<StudentRecord> {
        let profile = match self.fetch_profile(student_id) {
            Ok(profile) => Some(profile),
            Err(StudentRecordsError::NotFound(_)) => {
                debug!("No profile for student {}", student_id.trim());
                None
            }
            Err(e) => return Err(e),
        };

        Ok(StudentRecord {
            profile,
            subjects: self.fetch_subjects(student_id)?,
            sports: self.fetch_sports(student_id)?,
        })
    }

    /// Remove every record for a student from all four tables.
    ///
    /// Succeeds even when the ID matched nothing, so repeating a delete is a no-op.
    pub fn delete_student(&self, student_id: &str) -> Result<DeleteStudentResult> {
        if student_id.trim().is_empty() {
            return Err(StudentRecordsError::missing_field("Student ID"));
        }
        let student_id = student_id.trim();
        info!("Deleting student {}", student_id);

        let result = DeleteStudentResult {
            student_id: student_id.to_string(),
            profiles_removed: self.profile_repository.delete_for_student(student_id)?,
            credentials_removed: self.credential_repository.delete_for_student(student_id)?,
            enrollments_removed: self.subject_repository.delete_for_student(student_id)?,
            sports_removed: self.sport_repository.delete_for_student(student_id)?,
        };

        if result.total_removed() == 0 {
            warn!("Delete for student {} matched no records", student_id);
        } else {
            info!("Deleted {} record(s) for student {}", result.total_removed(), student_id);
        }

        Ok(result)
    }

    /// Unfiltered contents of every table
    pub fn list_all(&self) -> Result<StudentDirectory> {
        let directory = StudentDirectory {
            profiles: self.profile_repository.list_profiles()?,
            credentials: self.credential_repository.list_credentials()?,
            enrollments: self.subject_repository.list_enrollments()?,
            sports: self.sport_repository.list_sport_records()?,
        };

        debug!("Listed {} student profile(s)", directory.profiles.len());
        Ok(directory)
    }

    fn validate_register_command(&self, command: &RegisterStudentCommand) -> Result<()> {
        let required = [
            ("First name", command.first_name.trim()),
            ("Last name", command.last_name.trim()),
            ("Age", command.age.trim()),
            ("Gender", command.gender.trim()),
            ("Subjects", command.subjects.trim()),
            ("Password", command.password.trim()),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(StudentRecordsError::missing_field(field));
        }

        // Each table stores one unquoted line per record
        let line_break = &['\n', '\r'][..];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.contains(line_break)) {
            return Err(StudentRecordsError::Validation(format!(
                "{} cannot contain a line break",
                field
            )));
        }
        if let Some((field, _)) = required[..4].iter().find(|(_, value)| value.contains(',')) {
            return Err(StudentRecordsError::Validation(format!("{} cannot contain ','", field)));
        }
        Ok(())
    }

    /// Draw candidate IDs until one is not used by any profile
    fn allocate_student_id(&self) -> Result<String> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.id_generator.next_candidate();
            if !self.profile_repository.student_id_exists(&candidate)? {
                return Ok(candidate);
            }
            debug!("Student ID {} already taken (attempt {})", candidate, attempt);
        }

        Err(StudentRecordsError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::id_generator::STUDENT_ID_RANGE;
    use crate::backend::storage::csv::schema::{
        CREDENTIAL_TABLE, PROFILE_TABLE, SPORT_TABLE, SUBJECT_TABLE,
    };
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use std::sync::Mutex;

    /// Hands out a fixed list of IDs, then repeats the last one
    struct SequenceIdGenerator {
        ids: Mutex<Vec<String>>,
    }

    impl SequenceIdGenerator {
        fn new(ids: &[&str]) -> Self {
            let mut ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            ids.reverse();
            Self { ids: Mutex::new(ids) }
        }
    }

    impl StudentIdGenerator for SequenceIdGenerator {
        fn next_candidate(&self) -> String {
            let mut ids = self.ids.lock().unwrap();
            if ids.len() > 1 {
                ids.pop().unwrap()
            } else {
                ids[0].clone()
            }
        }
    }

    fn admin() -> AdminCredentials {
        AdminCredentials {
            username: "registrar".to_string(),
            password: "s3cret".to_string(),
        }
    }

    fn setup_service() -> (AccountService, TestEnvironment) {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        let service = AccountService::new(Arc::new(env.connection.clone()), admin());
        (service, env)
    }

    fn amy() -> RegisterStudentCommand {
        RegisterStudentCommand {
            first_name: "Amy".to_string(),
            last_name: "Lee".to_string(),
            age: "20".to_string(),
            gender: "F".to_string(),
            subjects: "Math,Art".to_string(),
            password: "pw1".to_string(),
        }
    }

    #[test]
    fn test_register_creates_one_record_per_table() {
        let (service, env) = setup_service();

        let result = service.register_student(amy()).unwrap();

        assert_eq!(result.student_id.len(), 7);
        let id: u32 = result.student_id.parse().unwrap();
        assert!(STUDENT_ID_RANGE.contains(&id));

        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 1);
        assert_eq!(env.line_count(CREDENTIAL_TABLE.file_name), 1);
        assert_eq!(env.line_count(SUBJECT_TABLE.file_name), 1);
        assert_eq!(env.line_count(SPORT_TABLE.file_name), 0);
    }

    #[test]
    fn test_register_rejects_missing_fields_without_writing() {
        let (service, env) = setup_service();

        let mut command = amy();
        command.gender = "  ".to_string();
        let result = service.register_student(command);

        match result {
            Err(StudentRecordsError::Validation(message)) => assert!(message.contains("Gender")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 0);
        assert_eq!(env.line_count(CREDENTIAL_TABLE.file_name), 0);
    }

    #[test]
    fn test_register_rejects_empty_password() {
        let (service, _env) = setup_service();

        let mut command = amy();
        command.password = String::new();

        assert!(matches!(
            service.register_student(command),
            Err(StudentRecordsError::Validation(_))
        ));
    }

    #[test]
    fn test_register_rejects_whitespace_password_but_keeps_padding() {
        let (service, env) = setup_service();

        let mut command = amy();
        command.password = "   ".to_string();
        match service.register_student(command) {
            Err(StudentRecordsError::Validation(message)) => assert!(message.contains("Password")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 0);

        let mut command = amy();
        command.password = " pw1 ".to_string();
        let student_id = service.register_student(command).unwrap().student_id;
        assert!(service.authenticate(&student_id, " pw1 ").is_ok());
        assert!(service.authenticate(&student_id, "pw1").is_err());
    }

    #[test]
    fn test_register_rejects_values_that_break_the_line_format() {
        let (service, env) = setup_service();

        let mut command = amy();
        command.last_name = "Lee,Jr".to_string();
        match service.register_student(command) {
            Err(StudentRecordsError::Validation(message)) => assert!(message.contains("Last name")),
            other => panic!("expected validation error, got {:?}", other),
        }

        let mut command = amy();
        command.password = "pw\n1".to_string();
        assert!(matches!(
            service.register_student(command),
            Err(StudentRecordsError::Validation(_))
        ));
        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 0);
        assert_eq!(env.line_count(CREDENTIAL_TABLE.file_name), 0);
    }

    #[test]
    fn test_register_skips_ids_already_in_use() {
        let env = TestEnvironment::new().unwrap();
        let generator = Arc::new(SequenceIdGenerator::new(&["1111111", "1111111", "2222222"]));
        let service =
            AccountService::with_id_generator(Arc::new(env.connection.clone()), admin(), generator);

        let first = service.register_student(amy()).unwrap();
        let second = service.register_student(amy()).unwrap();

        assert_eq!(first.student_id, "1111111");
        assert_eq!(second.student_id, "2222222");
    }

    #[test]
    fn test_register_gives_up_when_ids_keep_colliding() {
        let env = TestEnvironment::new().unwrap();
        let generator = Arc::new(SequenceIdGenerator::new(&["1111111"]));
        let service =
            AccountService::with_id_generator(Arc::new(env.connection.clone()), admin(), generator);

        service.register_student(amy()).unwrap();
        let result = service.register_student(amy());

        assert!(matches!(result, Err(StudentRecordsError::IdSpaceExhausted(MAX_ID_ATTEMPTS))));
        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 1);
    }

    #[test]
    fn test_authenticate() {
        let (service, _env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;

        assert!(service.authenticate(&student_id, "pw1").is_ok());
        assert!(matches!(
            service.authenticate(&student_id, "wrong"),
            Err(StudentRecordsError::Auth)
        ));
        assert!(matches!(
            service.authenticate("0000000", "pw1"),
            Err(StudentRecordsError::Auth)
        ));
    }

    #[test]
    fn test_authenticate_admin_uses_configured_account() {
        let (service, _env) = setup_service();

        assert!(service.authenticate_admin("registrar", "s3cret").is_ok());
        assert!(service.authenticate_admin("registrar", "admin").is_err());
        assert!(service.authenticate_admin("admin", "admin").is_err());
    }

    #[test]
    fn test_fetch_with_no_entries_returns_empty() {
        let (service, _env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;

        assert!(service.fetch_sports(&student_id).unwrap().is_empty());
        assert!(service.fetch_subjects("0000000").unwrap().is_empty());
    }

    #[test]
    fn test_add_sport_record_is_additive() {
        let (service, _env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;

        for _ in 0..2 {
            service
                .add_sport_record(AddSportRecordCommand {
                    student_id: student_id.clone(),
                    description: "Football 3-4 PM".to_string(),
                })
                .unwrap();
        }

        assert_eq!(
            service.fetch_sports(&student_id).unwrap(),
            vec!["Football 3-4 PM".to_string(), "Football 3-4 PM".to_string()]
        );
    }

    #[test]
    fn test_add_sport_record_requires_description() {
        let (service, _env) = setup_service();

        let result = service.add_sport_record(AddSportRecordCommand {
            student_id: "1234567".to_string(),
            description: " ".to_string(),
        });

        assert!(matches!(result, Err(StudentRecordsError::Validation(_))));
    }

    #[test]
    fn test_fetch_student_record() {
        let (service, _env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;
        service
            .add_sport_record(AddSportRecordCommand {
                student_id: student_id.clone(),
                description: "Chess".to_string(),
            })
            .unwrap();

        let record = service.fetch_student_record(&student_id).unwrap();

        let profile = record.profile.unwrap();
        assert_eq!(profile.first_name, "Amy");
        assert_eq!(profile.student_id, student_id);
        assert_eq!(record.subjects, vec!["Math,Art".to_string()]);
        assert_eq!(record.sports, vec!["Chess".to_string()]);
    }

    #[test]
    fn test_delete_student_clears_all_tables_and_is_idempotent() {
        let (service, env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;
        let other_id = service.register_student(amy()).unwrap().student_id;
        service
            .add_sport_record(AddSportRecordCommand {
                student_id: student_id.clone(),
                description: "Chess".to_string(),
            })
            .unwrap();

        let first = service.delete_student(&student_id).unwrap();
        assert_eq!(
            first,
            DeleteStudentResult {
                student_id: student_id.clone(),
                profiles_removed: 1,
                credentials_removed: 1,
                enrollments_removed: 1,
                sports_removed: 1,
            }
        );

        let second = service.delete_student(&student_id).unwrap();
        assert_eq!(second.total_removed(), 0);

        assert!(matches!(
            service.fetch_profile(&student_id),
            Err(StudentRecordsError::NotFound(_))
        ));
        assert!(service.fetch_profile(&other_id).is_ok());
        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 1);
        assert_eq!(env.line_count(CREDENTIAL_TABLE.file_name), 1);
        assert_eq!(env.line_count(SUBJECT_TABLE.file_name), 1);
        assert_eq!(env.line_count(SPORT_TABLE.file_name), 0);
    }

    #[test]
    fn test_fetch_student_record_without_profile_keeps_other_rows() {
        let (service, env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;
        service
            .add_sport_record(AddSportRecordCommand {
                student_id: student_id.clone(),
                description: "Chess".to_string(),
            })
            .unwrap();
        std::fs::write(env.base_path.join(PROFILE_TABLE.file_name), "").unwrap();

        let record = service.fetch_student_record(&student_id).unwrap();

        assert!(record.profile.is_none());
        assert_eq!(record.subjects, vec!["Math,Art".to_string()]);
        assert_eq!(record.sports, vec!["Chess".to_string()]);
    }

    #[test]
    fn test_delete_unknown_student_reports_success() {
        let (service, _env) = setup_service();

        let result = service.delete_student("7654321").unwrap();
        assert_eq!(result.total_removed(), 0);
    }

    #[test]
    fn test_list_all_returns_every_table() {
        let (service, _env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;
        service
            .add_sport_record(AddSportRecordCommand {
                student_id: student_id.clone(),
                description: "Chess".to_string(),
            })
            .unwrap();

        let directory = service.list_all().unwrap();

        assert_eq!(directory.profiles.len(), 1);
        assert_eq!(directory.credentials.len(), 1);
        assert_eq!(directory.enrollments.len(), 1);
        assert_eq!(directory.sports.len(), 1);
        assert_eq!(directory.credentials[0].student_id, student_id);
    }

    #[test]
    fn test_register_authenticate_delete_walkthrough() {
        let (service, _env) = setup_service();

        let student_id = service.register_student(amy()).unwrap().student_id;
        service.authenticate(&student_id, "pw1").unwrap();
        assert_eq!(service.fetch_subjects(&student_id).unwrap(), vec!["Math,Art".to_string()]);

        service.delete_student(&student_id).unwrap();

        assert!(matches!(
            service.fetch_profile(&student_id),
            Err(StudentRecordsError::NotFound(_))
        ));
        assert!(service.authenticate(&student_id, "pw1").is_err());
    }

    #[test]
    fn test_student_id_is_trimmed_everywhere() {
        let (service, _env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;
        let padded = format!("  {} ", student_id);

        assert!(service.authenticate(&padded, "pw1").is_ok());
        assert_eq!(service.fetch_profile(&padded).unwrap().student_id, student_id);
        assert_eq!(service.fetch_subjects(&padded).unwrap(), vec!["Math,Art".to_string()]);

        service
            .add_sport_record(AddSportRecordCommand {
                student_id: padded.clone(),
                description: "Chess".to_string(),
            })
            .unwrap();
        assert_eq!(service.fetch_sports(&padded).unwrap(), vec!["Chess".to_string()]);
        assert_eq!(service.delete_student(&padded).unwrap().total_removed(), 4);
    }

    #[test]
    fn test_delete_stops_at_failing_table() {
        let (service, env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;
        service
            .add_sport_record(AddSportRecordCommand {
                student_id: student_id.clone(),
                description: "Chess".to_string(),
            })
            .unwrap();
        let sports_before = env.read_table(SPORT_TABLE.file_name);

        // The sports table is rewritten last; block its temp file
        std::fs::create_dir(env.base_path.join(SPORT_TABLE.file_name).with_extension("tmp")).unwrap();

        let result = service.delete_student(&student_id);

        assert!(matches!(result, Err(StudentRecordsError::Io(_))));
        assert_eq!(env.line_count(PROFILE_TABLE.file_name), 0);
        assert_eq!(env.line_count(CREDENTIAL_TABLE.file_name), 0);
        assert_eq!(env.line_count(SUBJECT_TABLE.file_name), 0);
        assert_eq!(env.read_table(SPORT_TABLE.file_name), sports_before);
    }

    #[test]
    fn test_list_all_and_delete_survive_invalid_utf8_line() {
        let (service, env) = setup_service();
        let student_id = service.register_student(amy()).unwrap().student_id;

        let credentials = env.base_path.join(CREDENTIAL_TABLE.file_name);
        let mut bytes = std::fs::read(&credentials).unwrap();
        bytes.extend_from_slice(b"9999999,\xff\xfe\n");
        std::fs::write(&credentials, &bytes).unwrap();

        let directory = service.list_all().unwrap();
        assert_eq!(directory.credentials.len(), 1);

        let result = service.delete_student(&student_id).unwrap();
        assert_eq!(result.credentials_removed, 1);
        assert_eq!(std::fs::read(&credentials).unwrap(), b"9999999,\xff\xfe\n");
    }
}
