#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use addmarks::{
    ApiError, MarksBackend, MarksSubmission, Student, StudentQuery, Subject, Year,
};
use reqwest::StatusCode;

/// Canned answer for `/fetch/students`.
#[derive(Clone)]
pub enum StudentsReply {
    Rows(Vec<Student>),
    Status(u16),
    Malformed,
}

/// Canned answer for `/addData/marks`.
#[derive(Clone, Copy)]
pub enum SubmitReply {
    Flag(bool),
    Status(u16),
}

#[derive(Default)]
struct Inner {
    student_calls:  Vec<StudentQuery>,
    subject_calls:  Vec<Year>,
    submissions:    Vec<MarksSubmission>,
    students_reply: Option<StudentsReply>,
    subjects:       HashMap<Year, Vec<Subject>>,
    subject_delays: HashMap<Year, Duration>,
    submit_reply:   Option<SubmitReply>,
}

/// In-memory backend that records every call.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_students(&self, reply: StudentsReply) {
        self.inner.lock().unwrap().students_reply = Some(reply);
    }

    pub fn offer_subjects(&self, year: Year, names: &[&str]) {
        let subjects = names
            .iter()
            .enumerate()
            .map(|(i, name)| Subject::builder().id(format!("{year}-{i}")).subject_name(*name).build())
            .collect();
        self.inner.lock().unwrap().subjects.insert(year, subjects);
    }

    pub fn delay_subjects(&self, year: Year, delay: Duration) {
        self.inner.lock().unwrap().subject_delays.insert(year, delay);
    }

    pub fn reply_submit(&self, reply: SubmitReply) {
        self.inner.lock().unwrap().submit_reply = Some(reply);
    }

    pub fn student_calls(&self) -> Vec<StudentQuery> {
        self.inner.lock().unwrap().student_calls.clone()
    }

    pub fn subject_calls(&self) -> Vec<Year> {
        self.inner.lock().unwrap().subject_calls.clone()
    }

    pub fn submissions(&self) -> Vec<MarksSubmission> {
        self.inner.lock().unwrap().submissions.clone()
    }
}

fn status(endpoint: &'static str, code: u16) -> ApiError {
    ApiError::Status {
        endpoint,
        status: StatusCode::from_u16(code).unwrap(),
    }
}

impl MarksBackend for FakeBackend {
    async fn fetch_students(&self, query: &StudentQuery) -> Result<Vec<Student>, ApiError> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.student_calls.push(query.clone());
            inner.students_reply.clone()
        };
        match reply.unwrap_or(StudentsReply::Rows(Vec::new())) {
            StudentsReply::Rows(rows) => Ok(rows),
            StudentsReply::Status(code) => Err(status("/fetch/students", code)),
            StudentsReply::Malformed => Err(ApiError::Decode {
                endpoint: "/fetch/students",
                source:   serde_json::from_str::<Vec<Student>>("{").unwrap_err(),
            }),
        }
    }

    async fn fetch_subjects(&self, year: Year) -> Result<Vec<Subject>, ApiError> {
        let (delay, subjects) = {
            let mut inner = self.inner.lock().unwrap();
            inner.subject_calls.push(year);
            (
                inner.subject_delays.get(&year).copied(),
                inner.subjects.get(&year).cloned().unwrap_or_default(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(subjects)
    }

    async fn submit_marks(&self, submission: &MarksSubmission) -> Result<bool, ApiError> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.submissions.push(submission.clone());
            inner.submit_reply
        };
        match reply.unwrap_or(SubmitReply::Flag(true)) {
            SubmitReply::Flag(flag) => Ok(flag),
            SubmitReply::Status(code) => Err(status("/addData/marks", code)),
        }
    }
}

pub fn student(roll: &str, name: &str) -> Student {
    Student::builder()
        .id(format!("id-{roll}"))
        .name(name)
        .roll_number(roll)
        .branch("CSE")
        .year("1")
        .section(Some("A".to_string()))
        .build()
}
