#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use tabled::Tabled;
use typed_builder::TypedBuilder;

/// Error returned when a form value does not name a known option.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("`{value}` is not a valid {field}; expected one of: {expected}")]
pub struct UnknownOption {
    /// Name of the form field being parsed.
    pub field:    &'static str,
    /// The value that was rejected.
    pub value:    String,
    /// Comma separated list of accepted values.
    pub expected: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Year of study a student is enrolled in.
pub enum Year {
    /// 1st year.
    First,
    /// 2nd year.
    Second,
    /// 3rd year.
    Third,
    /// 4th year.
    Fourth,
}

impl Year {
    /// Returns the value sent to the backend (`"1"`..`"4"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Year::First => "1",
            Year::Second => "2",
            Year::Third => "3",
            Year::Fourth => "4",
        }
    }

    /// Returns the label shown in the year picker.
    pub fn label(self) -> &'static str {
        match self {
            Year::First => "1st Year",
            Year::Second => "2nd Year",
            Year::Third => "3rd Year",
            Year::Fourth => "4th Year",
        }
    }
}

impl FromStr for Year {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Year::First),
            "2" => Ok(Year::Second),
            "3" => Ok(Year::Third),
            "4" => Ok(Year::Fourth),
            other => Err(UnknownOption {
                field:    "year",
                value:    other.to_string(),
                expected: "1, 2, 3, 4",
            }),
        }
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Year {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Branch (department) a student belongs to.
pub enum Branch {
    /// Computer Science.
    Cse,
    /// Computer Science & Designing.
    Csd,
    /// Computer Science AI/ML.
    Csai,
    /// Any other branch.
    Other,
}

impl Branch {
    /// Returns the branch code sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::Csd => "CSD",
            Branch::Csai => "CSAI",
            Branch::Other => "Other",
        }
    }
}

impl FromStr for Branch {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CSE" => Ok(Branch::Cse),
            "CSD" => Ok(Branch::Csd),
            "CSAI" => Ok(Branch::Csai),
            "Other" => Ok(Branch::Other),
            other => Err(UnknownOption {
                field:    "branch",
                value:    other.to_string(),
                expected: "CSE, CSD, CSAI, Other",
            }),
        }
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Branch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Branch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Class test the marks are being entered for.
pub enum ClassTest {
    /// CT-01.
    #[default]
    First,
    /// CT-02.
    Second,
}

impl ClassTest {
    /// Returns the ordinal sent to the backend.
    pub fn ordinal(self) -> u8 {
        match self {
            ClassTest::First => 1,
            ClassTest::Second => 2,
        }
    }

    /// Returns the label shown in the test picker.
    pub fn label(self) -> &'static str {
        match self {
            ClassTest::First => "CT-01",
            ClassTest::Second => "CT-02",
        }
    }
}

impl TryFrom<u8> for ClassTest {
    type Error = UnknownOption;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ClassTest::First),
            2 => Ok(ClassTest::Second),
            other => Err(UnknownOption {
                field:    "class test",
                value:    other.to_string(),
                expected: "1, 2",
            }),
        }
    }
}

impl FromStr for ClassTest {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownOption {
            field:    "class test",
            value:    s.to_string(),
            expected: "1, 2",
        };
        s.trim().parse::<u8>().map_err(|_| unknown())?.try_into()
    }
}

impl Display for ClassTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ClassTest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for ClassTest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        ClassTest::try_from(value).map_err(de::Error::custom)
    }
}

#[derive(Tabled, Serialize, Deserialize, TypedBuilder, Clone, Debug, PartialEq, Eq)]
#[builder(field_defaults(setter(into)))]
#[serde(rename_all = "camelCase")]
/// A subject offered for a year, as returned by `/fetch/subject`.
pub struct Subject {
    /// Backend identifier of the subject.
    #[serde(rename = "_id")]
    #[tabled(skip)]
    pub id:           String,
    /// Name of the subject; this is the value the filter form stores.
    #[tabled(rename = "Subject")]
    pub subject_name: String,
}

#[derive(Tabled, Serialize, Deserialize, TypedBuilder, Clone, Debug, PartialEq, Eq)]
#[builder(field_defaults(setter(into)))]
#[serde(rename_all = "camelCase")]
/// A student row, as returned by `/fetch/students`.
pub struct Student {
    /// Backend identifier, used as the submission key.
    #[serde(rename = "_id")]
    #[tabled(skip)]
    pub id:          String,
    /// Full name.
    #[tabled(rename = "Name")]
    pub name:        String,
    /// Roll number, used as the display key.
    #[tabled(rename = "Roll Number")]
    pub roll_number: Scalar,
    /// Branch code as stored by the backend.
    #[tabled(rename = "Branch")]
    pub branch:      String,
    /// Year as stored by the backend.
    #[tabled(rename = "Year")]
    pub year:        Scalar,
    /// Class section, when the backend has one on record.
    #[tabled(skip)]
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section:     Option<String>,
}

/// A free-form backend value that may arrive as a JSON string or number.
///
/// Roll numbers and years are echoed back to the backend in whichever form
/// it sent them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Scalar {
    /// Sent as a JSON string.
    Text(String),
    /// Sent as a JSON number.
    Number(serde_json::Number),
}

impl Scalar {
    /// True if the textual form of this value is `text`.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Scalar::Text(s) => s == text,
            Scalar::Number(n) => n.to_string() == text,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value.into())
    }
}
