#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    marks::{MarksEntry, Section, ValidationErrors, part_label},
    state::{Notice, NoticeLevel},
    types::{Student, Subject, Year},
};

/// Renders the student table: Name, Roll Number, Branch, Year.
pub fn student_table(students: &[Student]) -> String {
    Table::new(students)
        .with(Panel::header(format!("{} students", students.len())))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Renders the subject options offered for `year`.
pub fn subject_table(year: Year, subjects: &[Subject]) -> String {
    if subjects.is_empty() {
        return format!("No subjects available for {}", year.label());
    }

    Table::new(subjects)
        .with(Panel::header(year.label()))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Style::modern())
        .to_string()
}

/// One line of the marks sheet.
#[derive(Tabled)]
struct MarkRow {
    /// Section letter.
    #[tabled(rename = "Section")]
    section: &'static str,
    /// Question as printed on the paper.
    #[tabled(rename = "Question")]
    question: String,
    /// Raw value typed in, blank if none.
    #[tabled(rename = "Marks")]
    marks: String,
    /// Maximum for the part.
    #[tabled(rename = "Out of")]
    out_of: f64,
    /// Validation message, blank if valid.
    #[tabled(rename = "Issue")]
    issue: String,
}

/// Renders every part of the paper with what was typed and any message.
pub fn marks_sheet(marks: &MarksEntry, errors: &ValidationErrors) -> String {
    let rows: Vec<MarkRow> = Section::ALL
        .into_iter()
        .flat_map(|section| {
            section.parts().iter().map(move |part| MarkRow {
                section:  section.as_str(),
                question: part_label(part),
                marks:    marks.get(section, part).unwrap_or_default().to_string(),
                out_of:   section.bounds().1,
                issue:    errors.message(section, part).unwrap_or_default().to_string(),
            })
        })
        .collect();

    Table::new(rows).with(Style::modern()).to_string()
}

/// Renders a notice in green or red.
pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => notice.message.green().to_string(),
        NoticeLevel::Error => notice.message.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(line: &str) -> Vec<&str> {
        line.split('│')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect()
    }

    #[test]
    fn student_row_shows_name_roll_branch_year() {
        let students = vec![
            Student::builder()
                .id("s1")
                .name("A")
                .roll_number("101")
                .branch("CSE")
                .year("1")
                .build(),
        ];

        let table = student_table(&students);
        let header = table
            .lines()
            .find(|line| line.contains("Roll Number"))
            .expect("header row");
        assert_eq!(cells(header), vec!["Name", "Roll Number", "Branch", "Year"]);

        let rows: Vec<_> = table.lines().filter(|line| line.contains("101")).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(cells(rows[0]), vec!["A", "101", "CSE", "1"]);
    }

    #[test]
    fn marks_sheet_lists_every_part() {
        let mut marks = MarksEntry::default();
        marks.set(Section::A, "_1a", "1.5");
        let mut errors = ValidationErrors::default();
        errors.record(Section::A, "_1a", Some(Section::A.range_message()));

        let sheet = marks_sheet(&marks, &errors);
        let row = sheet
            .lines()
            .find(|line| line.contains("1(a)"))
            .expect("row for 1(a)");
        assert_eq!(cells(row), vec!["A", "1(a)", "1.5", "1", "Value must be between 0 and 1"]);
        assert!(sheet.contains("2(e)"));
        assert!(sheet.contains("│ C"));
    }

    #[test]
    fn empty_subject_list_says_so() {
        assert_eq!(subject_table(Year::Second, &[]), "No subjects available for 2nd Year");
    }
}
