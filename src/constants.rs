#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Backend used when `ADDMARKS_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://coms-imsec-phi.vercel.app";

/// Per-request timeout used when `ADDMARKS_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoint returning the students matching a year/branch/subject filter.
pub const FETCH_STUDENTS_PATH: &str = "/fetch/students";

/// Endpoint returning the subjects taught in a year.
pub const FETCH_SUBJECTS_PATH: &str = "/fetch/subject";

/// Endpoint accepting one student's class-test marks.
pub const ADD_MARKS_PATH: &str = "/addData/marks";

/// Question parts of Section A, each out of 1 mark.
pub const SECTION_A_PARTS: [&str; 5] = ["_1a", "_1b", "_1c", "_1d", "_1e"];

/// Question parts of Section B, each out of 5 marks.
pub const SECTION_B_PARTS: [&str; 5] = ["_2a", "_2b", "_2c", "_2d", "_2e"];

/// Question parts of Section C, each out of 10 marks.
pub const SECTION_C_PARTS: [&str; 3] = ["_3", "_4", "_5"];

/// Notice shown when the filter form is submitted with a blank field.
pub const MSG_FILL_ALL_FIELDS: &str = "Please fill out all fields.";
/// Notice shown after the student table is refreshed.
pub const MSG_STUDENTS_FETCHED: &str = "Students fetched successfully!";
/// Notice shown when the backend rejects a student lookup.
pub const MSG_STUDENTS_FAILED: &str = "Failed to fetch students.";
/// Notice shown when a student lookup never reaches a usable response.
pub const MSG_STUDENTS_ERROR: &str = "An error occurred while fetching students.";
/// Notice shown after the backend accepts a marks submission.
pub const MSG_MARKS_SUBMITTED: &str = "Marks submitted successfully!";
/// Notice shown when the backend answers a submission with `success: false`.
pub const MSG_MARKS_FAILED: &str = "Failed to submit marks.";
/// Notice shown when a submission never reaches a usable response.
pub const MSG_MARKS_ERROR: &str = "An error occurred while submitting marks.";
/// Notice shown when marks are submitted without an open modal.
pub const MSG_NO_STUDENT_SELECTED: &str = "Select a student before submitting marks.";
