#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{SECTION_A_PARTS, SECTION_B_PARTS, SECTION_C_PARTS},
    types::UnknownOption,
};

/// Raw per-part values of one section, keyed by part label (e.g. `_1a`).
pub type SectionMarks = BTreeMap<String, String>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// One of the three groups of questions on a class test paper.
pub enum Section {
    /// Short questions, 1 mark each.
    A,
    /// Medium questions, 5 marks each.
    B,
    /// Long questions, 10 marks each.
    C,
}

impl Section {
    /// Every section, in paper order.
    pub const ALL: [Section; 3] = [Section::A, Section::B, Section::C];

    /// Inclusive `(min, max)` marks a single part of this section can score.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Section::A => (0.0, 1.0),
            Section::B => (0.0, 5.0),
            Section::C => (0.0, 10.0),
        }
    }

    /// Part labels printed on the paper for this section.
    pub fn parts(self) -> &'static [&'static str] {
        match self {
            Section::A => &SECTION_A_PARTS,
            Section::B => &SECTION_B_PARTS,
            Section::C => &SECTION_C_PARTS,
        }
    }

    /// Returns the single-letter name of the section.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::A => "A",
            Section::B => "B",
            Section::C => "C",
        }
    }

    /// Message attached to a part whose value falls outside [`Section::bounds`].
    pub fn range_message(self) -> String {
        let (min, max) = self.bounds();
        format!("Value must be between {min} and {max}")
    }
}

impl FromStr for Section {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Section::A),
            "B" | "b" => Ok(Section::B),
            "C" | "c" => Ok(Section::C),
            other => Err(UnknownOption {
                field:    "section",
                value:    other.to_string(),
                expected: "A, B, C",
            }),
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section {}", self.as_str())
    }
}

/// Renders a part label the way the paper prints it: `_1a` -> `1(a)`, `_3` ->
/// `3`.
pub fn part_label(part: &str) -> String {
    let part = part.trim_start_matches('_');
    let split = part
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(part.len());
    let (number, letter) = part.split_at(split);
    if letter.is_empty() {
        number.to_string()
    } else {
        format!("{number}({letter})")
    }
}

/// Checks a raw input against the section's bounds.
///
/// Returns the message to show next to the field, or `None` when the value is
/// acceptable. Input that is not a number (a cleared field included) is never
/// flagged; only numbers outside the section's range are.
///
/// Numbers are read with Rust's float syntax: `inf` is out of range, while
/// hex such as `0x5` is not a number and so is not flagged. A numeric input
/// widget produces neither.
pub fn validate_mark(section: Section, raw: &str) -> Option<String> {
    let (min, max) = section.bounds();
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_nan() => None,
        Ok(value) if value < min || value > max => Some(section.range_message()),
        _ => None,
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Raw marks typed into the marks modal, grouped by section.
pub struct MarksEntry {
    /// Section A values.
    #[serde(rename = "A")]
    pub a: SectionMarks,
    /// Section B values.
    #[serde(rename = "B")]
    pub b: SectionMarks,
    /// Section C values.
    #[serde(rename = "C")]
    pub c: SectionMarks,
}

impl MarksEntry {
    /// Returns the values entered for `section`.
    pub fn section(&self, section: Section) -> &SectionMarks {
        match section {
            Section::A => &self.a,
            Section::B => &self.b,
            Section::C => &self.c,
        }
    }

    /// Mutable access to the values entered for `section`.
    fn section_mut(&mut self, section: Section) -> &mut SectionMarks {
        match section {
            Section::A => &mut self.a,
            Section::B => &mut self.b,
            Section::C => &mut self.c,
        }
    }

    /// Returns the raw value typed for a part, if any.
    pub fn get(&self, section: Section, part: &str) -> Option<&str> {
        self.section(section).get(part).map(String::as_str)
    }

    /// Stores the raw value for a part, replacing what was there.
    pub fn set(&mut self, section: Section, part: impl Into<String>, value: impl Into<String>) {
        self.section_mut(section).insert(part.into(), value.into());
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Per-field messages mirroring [`MarksEntry`]; an empty string means valid.
pub struct ValidationErrors {
    /// Section A messages.
    #[serde(rename = "A")]
    pub a: SectionMarks,
    /// Section B messages.
    #[serde(rename = "B")]
    pub b: SectionMarks,
    /// Section C messages.
    #[serde(rename = "C")]
    pub c: SectionMarks,
}

impl ValidationErrors {
    /// Mutable access to the messages recorded for `section`.
    fn section_mut(&mut self, section: Section) -> &mut SectionMarks {
        match section {
            Section::A => &mut self.a,
            Section::B => &mut self.b,
            Section::C => &mut self.c,
        }
    }

    /// Returns the messages recorded for `section`.
    pub fn section(&self, section: Section) -> &SectionMarks {
        match section {
            Section::A => &self.a,
            Section::B => &self.b,
            Section::C => &self.c,
        }
    }

    /// Returns the message for a part, or `None` if the part is valid or was
    /// never touched.
    pub fn message(&self, section: Section, part: &str) -> Option<&str> {
        self.section(section)
            .get(part)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Records the outcome of validating a part. `None` clears the message.
    pub fn record(&mut self, section: Section, part: impl Into<String>, message: Option<String>) {
        self.section_mut(section)
            .insert(part.into(), message.unwrap_or_default());
    }

    /// Lists every outstanding message as `(section, part, message)`.
    pub fn outstanding(&self) -> Vec<(Section, &str, &str)> {
        Section::ALL
            .into_iter()
            .flat_map(|section| {
                self.section(section)
                    .iter()
                    .filter(|(_, message)| !message.is_empty())
                    .map(move |(part, message)| (section, part.as_str(), message.as_str()))
            })
            .collect()
    }

    /// True when no field carries a message.
    pub fn is_clean(&self) -> bool {
        self.outstanding().is_empty()
    }
}
