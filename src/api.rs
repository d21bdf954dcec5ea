#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use typed_builder::TypedBuilder;

use crate::{
    config::Config,
    constants::{ADD_MARKS_PATH, FETCH_STUDENTS_PATH, FETCH_SUBJECTS_PATH},
    marks::MarksEntry,
    types::{Branch, ClassTest, Scalar, Student, Subject, Year},
};

/// Failures talking to the marks backend.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// ...).
    #[error("Request to `{endpoint}` failed: {source}")]
    Transport {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Underlying client error.
        #[source]
        source:   reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    #[error("`{endpoint}` responded with status {status}")]
    Status {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Status returned by the backend.
        status:   StatusCode,
    },
    /// The response body did not have the expected shape.
    #[error("Could not decode the response from `{endpoint}`: {source}")]
    Decode {
        /// Endpoint path that was called.
        endpoint: &'static str,
        /// Underlying JSON error.
        #[source]
        source:   serde_json::Error,
    },
}

impl ApiError {
    /// True when the backend itself reported the failure, as opposed to the
    /// request or its response being unusable.
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}

/// Body of `/fetch/students`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StudentQuery {
    /// Year of study.
    pub year:    Year,
    /// Branch code.
    pub branch:  Branch,
    /// Subject name, as offered by `/fetch/subject`.
    pub subject: String,
}

/// Body of `/fetch/subject`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubjectQuery {
    /// Year to list subjects for.
    pub year: Year,
}

/// Body of `/addData/marks`.
#[derive(Serialize, Deserialize, TypedBuilder, Clone, Debug, PartialEq)]
#[builder(field_defaults(setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct MarksSubmission {
    /// Backend id of the student being marked.
    pub student_id:  String,
    /// Roll number of the student being marked, as the backend sent it.
    pub roll_number: Scalar,
    /// Class test the marks belong to.
    pub ct:          ClassTest,
    /// Year, as recorded on the student.
    pub year:        Scalar,
    /// Branch, as recorded on the student.
    pub branch:      String,
    /// Subject name taken from the filter form.
    pub subject:     String,
    /// Class section, as recorded on the student.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section:     Option<String>,
    /// Raw marks for all three sections.
    pub marks:       MarksEntry,
}

impl MarksSubmission {
    /// Assembles the payload for `student` from the modal and filter state.
    pub fn for_student(
        student: &Student,
        ct: ClassTest,
        subject: impl Into<String>,
        marks: &MarksEntry,
    ) -> Self {
        MarksSubmission::builder()
            .student_id(student.id.clone())
            .roll_number(student.roll_number.clone())
            .ct(ct)
            .year(student.year.clone())
            .branch(student.branch.clone())
            .subject(subject)
            .section(student.section.clone())
            .marks(marks.clone())
            .build()
    }
}

/// Response of `/addData/marks`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitResponse {
    /// Whether the backend stored the marks.
    pub success: bool,
}

/// The three backend calls the marks workflow depends on.
pub trait MarksBackend: Clone + Send + Sync + 'static {
    /// Lists the students matching a filter, in backend order.
    fn fetch_students(
        &self,
        query: &StudentQuery,
    ) -> impl Future<Output = Result<Vec<Student>, ApiError>> + Send;

    /// Lists the subjects taught in `year`.
    fn fetch_subjects(
        &self,
        year: Year,
    ) -> impl Future<Output = Result<Vec<Subject>, ApiError>> + Send;

    /// Submits one student's marks, returning the backend's `success` flag.
    fn submit_marks(
        &self,
        submission: &MarksSubmission,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;
}

/// [`MarksBackend`] speaking JSON over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    /// Shared reqwest client.
    client: Client,
    /// Where to send requests.
    config: Config,
}

impl HttpBackend {
    /// Creates a backend using an existing client.
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    /// Creates a backend with a client built from `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = config.build_client()?;
        Ok(Self::new(client, config))
    }

    /// POSTs `body` as JSON to `endpoint` and returns the raw response.
    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let url = self.config.endpoint(endpoint);
        tracing::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Ok((status, bytes.to_vec()))
    }

    /// POSTs `body` and decodes a 2xx response as `T`.
    async fn post_json<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, bytes) = self.post(endpoint, body).await?;
        if !status.is_success() {
            return Err(ApiError::Status { endpoint, status });
        }
        decode(endpoint, &bytes)
    }
}

/// Decodes a JSON body, naming the endpoint on failure.
fn decode<T: DeserializeOwned>(endpoint: &'static str, bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|source| ApiError::Decode { endpoint, source })
}

impl MarksBackend for HttpBackend {
    async fn fetch_students(&self, query: &StudentQuery) -> Result<Vec<Student>, ApiError> {
        tracing::info!(
            "Fetching students for year {}, branch {}, subject {}",
            query.year,
            query.branch,
            query.subject
        );
        let students: Vec<Student> = self.post_json(FETCH_STUDENTS_PATH, query).await?;
        tracing::debug!("Received {} students", students.len());
        Ok(students)
    }

    async fn fetch_subjects(&self, year: Year) -> Result<Vec<Subject>, ApiError> {
        self.post_json(FETCH_SUBJECTS_PATH, &SubjectQuery { year })
            .await
    }

    async fn submit_marks(&self, submission: &MarksSubmission) -> Result<bool, ApiError> {
        tracing::info!(
            "Submitting {} marks for roll number {}",
            submission.ct,
            submission.roll_number
        );
        tracing::debug!("Marks payload: {submission:?}");

        let (status, bytes) = self.post(ADD_MARKS_PATH, submission).await?;
        // The backend reports rejections in the body, sometimes with an error status.
        match decode::<SubmitResponse>(ADD_MARKS_PATH, &bytes) {
            Ok(response) => Ok(response.success),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                endpoint: ADD_MARKS_PATH,
                status,
            }),
            Err(err) => Err(err),
        }
    }
}
