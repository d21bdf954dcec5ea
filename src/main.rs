#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # addmarks
//!
//! Command line front-end for entering class-test marks.
//!
//! Settings are read from the environment (a `.env` file is honoured):
//! `ADDMARKS_BASE_URL`, `ADDMARKS_TIMEOUT_SECS` and `ADDMARKS_LOG`.

use addmarks::{
    Branch, ClassTest, HttpBackend, Section, Session, Year, config, marks::part_label, render,
    types::UnknownOption,
};
use anyhow::{Context, Result, bail};
use bpaf::*;
use dotenvy::dotenv;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// One `SECTION:PART=VALUE` argument, e.g. `A:_1a=0.5`.
#[derive(Debug, Clone)]
struct MarkArg {
    /// Section the part belongs to.
    section: Section,
    /// Part label as the backend stores it.
    part:    String,
    /// Raw value to type in.
    value:   String,
}

/// Parses a `SECTION:PART=VALUE` argument against the paper layout.
fn parse_mark(arg: String) -> Result<MarkArg, String> {
    let (target, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("`{arg}` should look like A:_1a=0.5"))?;
    let (section, part) = target
        .split_once(':')
        .ok_or_else(|| format!("`{arg}` should look like A:_1a=0.5"))?;
    let section: Section = section.parse().map_err(|e: UnknownOption| e.to_string())?;

    let part = if part.starts_with('_') {
        part.to_string()
    } else {
        format!("_{part}")
    };
    if !section.parts().contains(&part.as_str()) {
        return Err(format!(
            "{section} has no part `{part}`; expected one of: {}",
            section.parts().join(", ")
        ));
    }

    Ok(MarkArg {
        section,
        part,
        value: value.trim().to_string(),
    })
}

/// Year/branch/subject selection shared by the student commands.
#[derive(Debug, Clone)]
struct FilterArgs {
    /// Year of study.
    year:    Year,
    /// Branch code.
    branch:  Branch,
    /// Subject name.
    subject: String,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// List the subjects taught in a year
    Subjects(Year),
    /// Fetch and print the student table
    Students(FilterArgs),
    /// Enter and submit marks for one student
    Submit(FilterArgs, String, ClassTest, Vec<MarkArg>),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    options_parser().run()
}

/// Builds the parser for all commands
fn options_parser() -> OptionParser<Cmd> {
    /// parses the year
    fn year() -> impl Parser<Year> {
        long("year")
            .short('y')
            .help("Year of study (1-4)")
            .argument::<String>("YEAR")
            .parse(|s| s.parse::<Year>())
    }

    /// parses the branch
    fn branch() -> impl Parser<Branch> {
        long("branch")
            .short('b')
            .help("Branch code (CSE, CSD, CSAI, Other)")
            .argument::<String>("BRANCH")
            .parse(|s| s.parse::<Branch>())
    }

    /// parses the subject name
    fn subject() -> impl Parser<String> {
        long("subject")
            .short('s')
            .help("Subject name as listed by `addmarks subjects`")
            .argument::<String>("SUBJECT")
    }

    /// parses the filter form
    fn filter() -> impl Parser<FilterArgs> {
        let year = year();
        let branch = branch();
        let subject = subject();
        construct!(FilterArgs {
            year,
            branch,
            subject
        })
    }

    /// parses the roll number
    fn roll() -> impl Parser<String> {
        long("roll")
            .short('r')
            .help("Roll number of the student to mark")
            .argument::<String>("ROLL")
    }

    /// parses the class test
    fn ct() -> impl Parser<ClassTest> {
        long("ct")
            .help("Class test the marks belong to (1 or 2)")
            .argument::<String>("CT")
            .parse(|s| s.parse::<ClassTest>())
            .fallback(ClassTest::First)
    }

    /// parses marks
    fn marks() -> impl Parser<Vec<MarkArg>> {
        positional::<String>("MARK")
            .help("Marks as SECTION:PART=VALUE, e.g. A:_1a=0.5 B:_2c=4 C:_3=8")
            .parse(parse_mark)
            .many()
    }

    let subjects = construct!(Cmd::Subjects(year()))
        .to_options()
        .command("subjects")
        .help("List the subjects taught in a year");

    let students = construct!(Cmd::Students(filter()))
        .to_options()
        .command("students")
        .help("Fetch the students matching a year, branch and subject");

    let submit = construct!(Cmd::Submit(filter(), roll(), ct(), marks()))
        .to_options()
        .command("submit")
        .help("Enter and submit class-test marks for one student");

    let cmd = construct!([subjects, students, submit]);

    cmd.to_options().descr("Enter and submit class-test marks")
}

/// Loads subject options for `filter.year` and applies the rest of the filter.
async fn prepare(session: &mut Session<HttpBackend>, filter: &FilterArgs) {
    session.set_year(Some(filter.year));
    session.settle_subjects().await;

    let offered = &session.state().subjects;
    if !offered.is_empty() && !offered.iter().any(|s| s.subject_name == filter.subject) {
        tracing::warn!(
            "`{}` is not among the subjects offered for {}",
            filter.subject,
            filter.year.label()
        );
    }

    session.set_branch(Some(filter.branch));
    session.set_subject(filter.subject.clone());
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cfg = config::get();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(cfg.config().log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();
    let client = cfg.http_client().context("Could not set up the HTTP client")?;
    let backend = HttpBackend::new(client, cfg.config().clone());
    let mut session = Session::new(backend);

    match cmd {
        Cmd::Subjects(year) => {
            session.set_year(Some(year));
            session.settle_subjects().await;
            println!("{}", render::subject_table(year, &session.state().subjects));
        }
        Cmd::Students(filter) => {
            prepare(&mut session, &filter).await;
            let notice = session.submit_filter().await;
            eprintln!("{}", render::notice(&notice));
            if !notice.is_success() {
                bail!("{notice}");
            }
            println!("{}", render::student_table(&session.state().students));
        }
        Cmd::Submit(filter, roll, ct, marks) => {
            prepare(&mut session, &filter).await;
            let notice = session.submit_filter().await;
            if !notice.is_success() {
                bail!("{notice}");
            }

            if !session.open_marks_for_roll(&roll) {
                bail!("No student with roll number {roll} matches this filter");
            }
            session.select_test(ct);

            for mark in &marks {
                if let Some(message) = session.enter_mark(mark.section, &mark.part, &mark.value) {
                    eprintln!("{} {}: {message}", mark.section, part_label(&mark.part));
                }
            }

            let modal = &session.state().modal;
            println!("{}", render::marks_sheet(&modal.marks, &modal.errors));

            let notice = session.submit_marks().await;
            eprintln!("{}", render::notice(&notice));
            if !notice.is_success() {
                bail!("{notice}");
            }
        }
    };

    Ok(())
}
