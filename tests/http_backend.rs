use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use addmarks::{
    ApiError, Branch, ClassTest, Config, HttpBackend, MarksBackend, MarksEntry, MarksSubmission,
    Section, Session, Student, StudentQuery, Year, render,
};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};

type Log = Arc<Mutex<Vec<(&'static str, Value)>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::from_config(Config::new(base_url, Duration::from_secs(5))).expect("client")
}

async fn students(State(log): State<Log>, Json(body): Json<Value>) -> Json<Value> {
    log.lock().unwrap().push(("students", body));
    Json(json!([
        { "_id": "665f1c", "name": "A", "rollNumber": "101", "branch": "CSE", "year": "1", "section": "B" }
    ]))
}

async fn subjects(State(log): State<Log>, Json(body): Json<Value>) -> Json<Value> {
    log.lock().unwrap().push(("subjects", body));
    Json(json!([
        { "_id": "sub1", "subjectName": "Maths" },
        { "_id": "sub2", "subjectName": "Physics" }
    ]))
}

async fn marks(State(log): State<Log>, Json(body): Json<Value>) -> Json<Value> {
    let accepted = body["marks"]["A"]["_1a"] != "reject";
    log.lock().unwrap().push(("marks", body));
    Json(json!({ "success": accepted }))
}

fn backend_router(log: Log) -> Router {
    Router::new()
        .route("/fetch/students", post(students))
        .route("/fetch/subject", post(subjects))
        .route("/addData/marks", post(marks))
        .with_state(log)
}

#[tokio::test]
async fn full_workflow_hits_each_endpoint_with_expected_bodies() {
    let log = Log::default();
    let base = serve(backend_router(log.clone())).await;
    let mut session = Session::new(backend(&base));

    session.set_year(Some(Year::First));
    session.settle_subjects().await;
    assert_eq!(session.state().subjects.len(), 2);
    assert_eq!(session.state().subjects[0].subject_name, "Maths");

    session.set_branch(Some(Branch::Cse));
    session.set_subject("Maths");
    assert!(session.submit_filter().await.is_success());

    let table = render::student_table(&session.state().students);
    let row = table
        .lines()
        .find(|line| line.contains("101"))
        .expect("student row");
    let cells: Vec<_> = row
        .split('│')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    assert_eq!(cells, vec!["A", "101", "CSE", "1"]);

    assert!(session.open_marks_for_roll("101"));
    session.select_test(ClassTest::Second);
    session.enter_mark(Section::A, "_1a", "1");
    session.enter_mark(Section::B, "_2c", "4.5");
    let notice = session.submit_marks().await;
    assert!(notice.is_success());
    assert!(!session.state().modal.open);

    let log = log.lock().unwrap().clone();
    assert_eq!(log[0], ("subjects", json!({ "year": "1" })));
    assert_eq!(
        log[1],
        ("students", json!({ "year": "1", "branch": "CSE", "subject": "Maths" }))
    );
    assert_eq!(
        log[2],
        (
            "marks",
            json!({
                "studentId": "665f1c",
                "rollNumber": "101",
                "ct": 2,
                "year": "1",
                "branch": "CSE",
                "subject": "Maths",
                "section": "B",
                "marks": { "A": { "_1a": "1" }, "B": { "_2c": "4.5" }, "C": {} }
            })
        )
    );
}

#[tokio::test]
async fn success_false_is_reported_as_rejection() {
    let log = Log::default();
    let base = serve(backend_router(log.clone())).await;
    let mut session = Session::new(backend(&base));
    session.set_year(Some(Year::First));
    session.set_branch(Some(Branch::Cse));
    session.set_subject("Maths");
    session.submit_filter().await;
    session.open_marks(0);

    session.enter_mark(Section::A, "_1a", "reject");
    let notice = session.submit_marks().await;

    assert_eq!(notice.message, "Failed to submit marks.");
    assert!(session.state().modal.open);
}

#[tokio::test]
async fn error_status_maps_to_status_error() {
    let router = Router::new().route(
        "/fetch/students",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(router).await;
    let query = StudentQuery {
        year:    Year::Second,
        branch:  Branch::Csd,
        subject: "DSA".into(),
    };

    let err = backend(&base)
        .fetch_students(&query)
        .await
        .expect_err("500 should fail");
    match err {
        ApiError::Status { endpoint, status } => {
            assert_eq!(endpoint, "/fetch/students");
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn wrong_shape_is_a_decode_error() {
    let router = Router::new().route(
        "/fetch/subject",
        post(|| async { Json(json!({ "subjects": [] })) }),
    );
    let base = serve(router).await;

    let err = backend(&base)
        .fetch_subjects(Year::Fourth)
        .await
        .expect_err("object instead of array");
    assert!(matches!(err, ApiError::Decode { endpoint: "/fetch/subject", .. }));
}

#[tokio::test]
async fn submit_without_flag_is_a_decode_error() {
    let router = Router::new().route("/addData/marks", post(|| async { Json(json!({})) }));
    let base = serve(router).await;

    let student = Student::builder()
        .id("s1")
        .name("A")
        .roll_number("101")
        .branch("CSE")
        .year("1")
        .build();
    let submission =
        MarksSubmission::for_student(&student, ClassTest::First, "Maths", &MarksEntry::default());

    let err = backend(&base)
        .submit_marks(&submission)
        .await
        .expect_err("missing success flag");
    assert!(matches!(err, ApiError::Decode { endpoint: "/addData/marks", .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = backend(&format!("http://{addr}"))
        .fetch_subjects(Year::First)
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(!err.is_server_rejection());
}
