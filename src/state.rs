#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Application state and the pure functions that advance it.
//!
//! Every update takes the current [`AppState`] by reference and returns the
//! next snapshot; nothing here performs I/O.

use std::fmt::{self, Display};

use crate::{
    api::StudentQuery,
    marks::{MarksEntry, Section, ValidationErrors, validate_mark},
    types::{Branch, ClassTest, Student, Subject, Year},
};

/// Selections in the student filter form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected year, if any.
    pub year:    Option<Year>,
    /// Selected branch, if any.
    pub branch:  Option<Branch>,
    /// Selected subject name; empty when nothing is picked.
    pub subject: String,
}

impl FilterState {
    /// Returns the `/fetch/students` body if every field is filled in.
    pub fn query(&self) -> Option<StudentQuery> {
        let subject = self.subject.trim();
        match (self.year, self.branch) {
            (Some(year), Some(branch)) if !subject.is_empty() => Some(StudentQuery {
                year,
                branch,
                subject: subject.to_string(),
            }),
            _ => None,
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something the user asked for worked.
    Success,
    /// Something the user asked for did not work.
    Error,
}

/// Short-lived message for the user, the equivalent of a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Whether this reports a success or a failure.
    pub level:   NoticeLevel,
    /// Text to show.
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level:   NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// A failure notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level:   NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// True for [`NoticeLevel::Success`].
    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The marks modal and everything typed into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarksModal {
    /// Whether the modal is showing.
    pub open:     bool,
    /// Student the modal was last opened for.
    pub student:  Option<Student>,
    /// Raw values typed into the three sections.
    pub marks:    MarksEntry,
    /// Per-field validation messages.
    pub errors:   ValidationErrors,
    /// Class test the marks are for.
    pub selected: ClassTest,
}

/// Everything the marks entry screen shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Filter form selections.
    pub filter:   FilterState,
    /// Subject options for the selected year.
    pub subjects: Vec<Subject>,
    /// Student table rows, in backend order.
    pub students: Vec<Student>,
    /// Marks modal.
    pub modal:    MarksModal,
    /// Notices raised so far, oldest first.
    pub notices:  Vec<Notice>,
}

impl AppState {
    /// The most recent notice, if any.
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

/// Sets the year. The caller is responsible for reloading subjects.
pub fn set_year(state: &AppState, year: Option<Year>) -> AppState {
    let mut next = state.clone();
    next.filter.year = year;
    next
}

/// Sets the branch.
pub fn set_branch(state: &AppState, branch: Option<Branch>) -> AppState {
    let mut next = state.clone();
    next.filter.branch = branch;
    next
}

/// Sets the subject name.
pub fn set_subject(state: &AppState, subject: impl Into<String>) -> AppState {
    let mut next = state.clone();
    next.filter.subject = subject.into();
    next
}

/// Replaces the subject options.
pub fn replace_subjects(state: &AppState, subjects: Vec<Subject>) -> AppState {
    let mut next = state.clone();
    next.subjects = subjects;
    next
}

/// Replaces the student table with exactly `students`.
pub fn replace_students(state: &AppState, students: Vec<Student>) -> AppState {
    let mut next = state.clone();
    next.students = students;
    next
}

/// Appends a notice.
pub fn push_notice(state: &AppState, notice: Notice) -> AppState {
    let mut next = state.clone();
    next.notices.push(notice);
    next
}

/// Selects the class test the marks belong to.
pub fn select_test(state: &AppState, test: ClassTest) -> AppState {
    let mut next = state.clone();
    next.modal.selected = test;
    next
}

/// Opens the marks modal for `student`.
///
/// Marks and messages typed for a previous student are carried over
/// unchanged.
pub fn open_modal(state: &AppState, student: Student) -> AppState {
    let mut next = state.clone();
    next.modal.student = Some(student);
    next.modal.open = true;
    next
}

/// Hides the marks modal, keeping what was typed into it.
pub fn close_modal(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.modal.open = false;
    next
}

/// Stores a raw value for one part and re-validates that part only.
pub fn enter_mark(
    state: &AppState,
    section: Section,
    part: impl Into<String>,
    raw: impl Into<String>,
) -> AppState {
    let part = part.into();
    let raw = raw.into();
    let message = validate_mark(section, &raw);

    let mut next = state.clone();
    next.modal.marks.set(section, part.clone(), raw);
    next.modal.errors.record(section, part, message);
    next
}
