//! # Interactive Shell
//!
//! Text menus for administrators and students. The shell only collects input,
//! calls [`AccountService`] and prints the outcome; all record handling lives
//! in the backend.
//!
//! Input and output are generic so the menus can be driven from a script or a
//! test. End of input leaves every menu and ends the session.

use anyhow::Result;
use log::debug;
use std::io::{BufRead, Write};

use crate::backend::domain::{AccountService, AddSportRecordCommand, RegisterStudentCommand};
use crate::backend::StudentRecordsError;

/// Whether the session should keep going after a menu returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Read one line, or leave the current menu with `Flow::Exit` on end of input
macro_rules! read_or_exit {
    ($shell:expr, $label:expr) => {
        match $shell.read_line($label)? {
            Some(line) => line,
            None => return Ok(Flow::Exit),
        }
    };
}

/// Run a submenu and stop the caller too if it ended the session
macro_rules! propagate_exit {
    ($flow:expr) => {
        if $flow? == Flow::Exit {
            return Ok(Flow::Exit);
        }
    };
}

pub struct Shell<'a, R, W> {
    service: &'a AccountService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(service: &'a AccountService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Run the main menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        self.main_menu()?;
        Ok(())
    }

    fn main_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output, "\nMain Menu\n---------\n1. Admin\n2. Student\n3. Exit")?;
            let choice = read_or_exit!(self, "Choose from above: ");
            match choice.trim() {
                "1" => propagate_exit!(self.admin_login()),
                "2" => propagate_exit!(self.student_menu()),
                "3" => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(Flow::Exit);
                }
                _ => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }
    }

    fn student_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output, "\nStudent Menu\n------------\n1. Login\n2. Register\n3. Back to Main Menu")?;
            let choice = read_or_exit!(self, "Choose from above: ");
            match choice.trim() {
                "1" => propagate_exit!(self.student_login()),
                "2" => propagate_exit!(self.register_student()),
                "3" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }
    }

    fn student_login(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nStudent Login")?;
        let student_id = read_or_exit!(self, "ID: ");
        let password = read_or_exit!(self, "Password: ");
        let student_id = student_id.trim().to_string();

        match self.service.authenticate(&student_id, &password) {
            Ok(()) => self.student_dashboard(&student_id),
            Err(e) => {
                self.report(e)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn register_student(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nStudent Registration")?;
        let command = RegisterStudentCommand {
            first_name: read_or_exit!(self, "Firstname: "),
            last_name: read_or_exit!(self, "Lastname: "),
            age: read_or_exit!(self, "Age: "),
            gender: read_or_exit!(self, "Gender: "),
            subjects: read_or_exit!(self, "Subjects (comma-separated): "),
            password: read_or_exit!(self, "Password: "),
        };

        match self.service.register_student(command) {
            Ok(result) => writeln!(
                self.output,
                "Registration successful! Your ID is: {}",
                result.student_id
            )?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn student_dashboard(&mut self, student_id: &str) -> Result<Flow> {
        if let Ok(profile) = self.service.fetch_profile(student_id) {
            writeln!(self.output, "\nWelcome, {}!", profile.first_name)?;
        }

        loop {
            writeln!(
                self.output,
                "\nStudent Dashboard\n-----------------\n1. View My Details\n2. Add Sports Details\n3. Logout"
            )?;
            let choice = read_or_exit!(self, "Choose from above: ");
            match choice.trim() {
                "1" => self.show_student_details(student_id)?,
                "2" => propagate_exit!(self.add_sports_details(student_id)),
                "3" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }
    }

    fn show_student_details(&mut self, student_id: &str) -> Result<()> {
        let record = match self.service.fetch_student_record(student_id) {
            Ok(record) => record,
            Err(e) => return self.report(e),
        };

        match &record.profile {
            Some(profile) => writeln!(
                self.output,
                "\nFirstname: {}\nLastname: {}\nAge: {}\nGender: {}\nID: {}",
                profile.first_name, profile.last_name, profile.age, profile.gender, profile.student_id
            )?,
            None => writeln!(self.output, "Student could not be found!")?,
        }

        writeln!(self.output, "\nSubjects:")?;
        for subjects in &record.subjects {
            writeln!(self.output, "{}", subjects)?;
        }
        writeln!(self.output, "\nSports:")?;
        for sport in &record.sports {
            writeln!(self.output, "{}", sport)?;
        }
        Ok(())
    }

    fn add_sports_details(&mut self, student_id: &str) -> Result<Flow> {
        let description = read_or_exit!(self, "Enter sports and time (e.g., Football 3-4 PM): ");
        let command = AddSportRecordCommand {
            student_id: student_id.to_string(),
            description,
        };

        match self.service.add_sport_record(command) {
            Ok(_) => writeln!(self.output, "Sports details added!")?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn admin_login(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nAdmin Login")?;
        let username = read_or_exit!(self, "Username: ");
        let password = read_or_exit!(self, "Password: ");

        match self.service.authenticate_admin(username.trim(), &password) {
            Ok(()) => self.admin_dashboard(),
            Err(StudentRecordsError::Auth) => {
                writeln!(self.output, "Invalid admin details!")?;
                Ok(Flow::Continue)
            }
            Err(e) => {
                self.report(e)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn admin_dashboard(&mut self) -> Result<Flow> {
        loop {
            writeln!(
                self.output,
                "\nAdmin Dashboard\n----------------\n1. View All Students\n2. Add New Student\n3. Delete Student\n4. Logout"
            )?;
            let choice = read_or_exit!(self, "Choose from above: ");
            match choice.trim() {
                "1" => self.view_all_students()?,
                "2" => propagate_exit!(self.register_student()),
                "3" => propagate_exit!(self.delete_student()),
                "4" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }
    }

    fn view_all_students(&mut self) -> Result<()> {
        let directory = match self.service.list_all() {
            Ok(directory) => directory,
            Err(e) => return self.report(e),
        };

        writeln!(self.output, "\nAll Students:")?;
        for p in &directory.profiles {
            writeln!(
                self.output,
                "{}, {}, {}, {}, {}",
                p.first_name, p.last_name, p.age, p.gender, p.student_id
            )?;
        }
        writeln!(self.output, "\nSubjects:")?;
        for enrollment in &directory.enrollments {
            writeln!(self.output, "{}: {}", enrollment.student_id, enrollment.subjects)?;
        }
        writeln!(self.output, "\nSports:")?;
        for sport in &directory.sports {
            writeln!(self.output, "{}: {}", sport.student_id, sport.description)?;
        }
        Ok(())
    }

    fn delete_student(&mut self) -> Result<Flow> {
        let student_id = read_or_exit!(self, "Enter the ID of the student to delete: ");

        writeln!(self.output, "Deleting student account...")?;
        match self.service.delete_student(&student_id) {
            Ok(result) => {
                debug!("Delete removed {} record(s)", result.total_removed());
                writeln!(self.output, "Student account deleted successfully!")?;
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    /// Print a user-facing message for a failed operation
    fn report(&mut self, error: StudentRecordsError) -> Result<()> {
        match error {
            StudentRecordsError::Validation(message) => writeln!(self.output, "{}", message)?,
            StudentRecordsError::NotFound(_) => writeln!(self.output, "Student could not be found!")?,
            StudentRecordsError::Auth => writeln!(self.output, "Invalid details!")?,
            other => writeln!(self.output, "Something went wrong: {}", other)?,
        }
        Ok(())
    }

    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string()))
    }
}
