#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::{
    api::{MarksBackend, MarksSubmission},
    constants::{
        MSG_FILL_ALL_FIELDS, MSG_MARKS_ERROR, MSG_MARKS_FAILED, MSG_MARKS_SUBMITTED,
        MSG_NO_STUDENT_SELECTED, MSG_STUDENTS_ERROR, MSG_STUDENTS_FAILED, MSG_STUDENTS_FETCHED,
    },
    marks::Section,
    state::{self, AppState, Notice, NoticeLevel},
    subjects::{self, SubjectLoader, YearChange},
    types::{Branch, ClassTest, Year},
};

/// Drives the marks entry screen: turns user actions into backend calls and
/// state snapshots.
pub struct Session<B: MarksBackend> {
    /// Backend used for student lookups and submissions.
    backend: B,
    /// Reloads subject options on year changes.
    loader:  SubjectLoader<B>,
    /// Current snapshot.
    state:   AppState,
}

impl<B: MarksBackend> Session<B> {
    /// Starts a session with an empty form.
    pub fn new(backend: B) -> Self {
        Self {
            loader: SubjectLoader::new(backend.clone()),
            backend,
            state: AppState::default(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Records a notice and mirrors it to the log.
    fn notify(&mut self, notice: Notice) -> Notice {
        match notice.level {
            NoticeLevel::Success => tracing::info!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
        self.state = state::push_notice(&self.state, notice.clone());
        notice
    }

    /// Changes the year and starts reloading subject options.
    ///
    /// Re-selecting the current year does nothing. Clearing the year empties
    /// the options without contacting the backend. Must be called from within
    /// a tokio runtime.
    pub fn set_year(&mut self, year: Option<Year>) {
        if year == self.state.filter.year {
            return;
        }
        self.state = state::set_year(&self.state, year);
        if self.loader.year_changed(year) == YearChange::Cleared {
            self.state = state::replace_subjects(&self.state, Vec::new());
        }
    }

    /// Changes the branch.
    pub fn set_branch(&mut self, branch: Option<Branch>) {
        self.state = state::set_branch(&self.state, branch);
    }

    /// Changes the subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.state = state::set_subject(&self.state, subject);
    }

    /// Picks the class test marks are entered for.
    pub fn select_test(&mut self, test: ClassTest) {
        self.state = state::select_test(&self.state, test);
    }

    /// Waits for the subject fetch of the current year, if one is running, and
    /// applies it.
    pub async fn settle_subjects(&mut self) {
        if let Some(load) = self.loader.next().await {
            self.state = subjects::apply_load(&self.state, load);
        }
    }

    /// Applies the subject fetch of the current year if it already finished.
    pub fn poll_subjects(&mut self) -> bool {
        match self.loader.try_next() {
            Some(load) => {
                self.state = subjects::apply_load(&self.state, load);
                true
            }
            None => false,
        }
    }

    /// Submits the filter form, refreshing the student table on success.
    ///
    /// Nothing is sent unless year, branch and subject are all filled in. On
    /// failure the previous table is kept.
    pub async fn submit_filter(&mut self) -> Notice {
        let Some(query) = self.state.filter.query() else {
            tracing::debug!("Incomplete filter: {:?}", self.state.filter);
            return self.notify(Notice::error(MSG_FILL_ALL_FIELDS));
        };

        match self.backend.fetch_students(&query).await {
            Ok(students) => {
                self.state = state::replace_students(&self.state, students);
                self.notify(Notice::success(MSG_STUDENTS_FETCHED))
            }
            Err(err) => {
                tracing::error!("{err}");
                let message = if err.is_server_rejection() {
                    MSG_STUDENTS_FAILED
                } else {
                    MSG_STUDENTS_ERROR
                };
                self.notify(Notice::error(message))
            }
        }
    }

    /// Opens the marks modal for the student at `index` in the table.
    pub fn open_marks(&mut self, index: usize) -> bool {
        match self.state.students.get(index).cloned() {
            Some(student) => {
                self.state = state::open_modal(&self.state, student);
                true
            }
            None => false,
        }
    }

    /// Opens the marks modal for the student with `roll_number`.
    pub fn open_marks_for_roll(&mut self, roll_number: &str) -> bool {
        match self
            .state
            .students
            .iter()
            .position(|s| s.roll_number.matches(roll_number))
        {
            Some(index) => self.open_marks(index),
            None => false,
        }
    }

    /// Closes the marks modal without submitting.
    pub fn close_marks(&mut self) {
        self.state = state::close_modal(&self.state);
    }

    /// Types a raw value into a part, returning its validation message if the
    /// value is out of range.
    pub fn enter_mark(&mut self, section: Section, part: &str, raw: &str) -> Option<String> {
        self.state = state::enter_mark(&self.state, section, part, raw);
        self.state
            .modal
            .errors
            .message(section, part)
            .map(str::to_string)
    }

    /// Submits the open modal's marks.
    ///
    /// Outstanding validation messages are logged but do not stop the
    /// submission. The modal closes only when the backend reports success.
    pub async fn submit_marks(&mut self) -> Notice {
        let modal = &self.state.modal;
        let Some(student) = modal.student.as_ref().filter(|_| modal.open) else {
            return self.notify(Notice::error(MSG_NO_STUDENT_SELECTED));
        };

        for (section, part, message) in modal.errors.outstanding() {
            tracing::warn!("Submitting with {section} {part}: {message}");
        }

        let submission = MarksSubmission::for_student(
            student,
            modal.selected,
            self.state.filter.subject.clone(),
            &modal.marks,
        );

        match self.backend.submit_marks(&submission).await {
            Ok(true) => {
                self.state = state::close_modal(&self.state);
                self.notify(Notice::success(MSG_MARKS_SUBMITTED))
            }
            Ok(false) => self.notify(Notice::error(MSG_MARKS_FAILED)),
            Err(err) => {
                tracing::error!("{err}");
                let message = if err.is_server_rejection() {
                    MSG_MARKS_FAILED
                } else {
                    MSG_MARKS_ERROR
                };
                self.notify(Notice::error(message))
            }
        }
    }
}
