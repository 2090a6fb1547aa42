//! Core domain types: course records and academic terms.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Sentinel written whenever a field cannot be determined ("unknown").
pub const UNKNOWN: &str = "未知";

// ---------------------------------------------------------------------------
// CourseRecord
// ---------------------------------------------------------------------------

/// One row of the course catalog, fully extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseRecord {
    /// Catalog-assigned selection code. Numeric-looking, kept as text.
    pub code: String,
    /// Course title without its English subtitle.
    pub name: String,
    /// Category token such as "必修", or [`UNKNOWN`].
    pub course_type: String,
    /// Class/grade token taken from the notes, or [`UNKNOWN`].
    pub grade: String,
    /// Instructor names joined with "與" and suffixed with "教授".
    pub instructor: String,
    /// Plain-text notes; line breaks preserved.
    pub notes: String,
    /// Raw credit descriptor, e.g. "3-0".
    pub credits: String,
    /// Weekly contact hours.
    pub hours: u32,
}

impl CourseRecord {
    /// Cells in export column order: code, type, name, grade, credits, hours,
    /// instructor, notes.
    pub fn to_row(&self) -> [String; 8] {
        [
            self.code.clone(),
            self.course_type.clone(),
            self.name.clone(),
            self.grade.clone(),
            self.credits.clone(),
            self.hours.to_string(),
            self.instructor.clone(),
            self.notes.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Term / AcademicTerm
// ---------------------------------------------------------------------------

/// Semester within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// Fall semester, selector "1".
    First,
    /// Spring semester, selector "2".
    Second,
}

impl Term {
    /// Both terms in catalog order.
    pub const ALL: [Term; 2] = [Term::First, Term::Second];

    /// Selector used in catalog URLs.
    pub fn selector(self) -> &'static str {
        match self {
            Term::First => "1",
            Term::Second => "2",
        }
    }

    /// Localized label used in output file names.
    pub fn label(self) -> &'static str {
        match self {
            Term::First => "上",
            Term::Second => "下",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for Term {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Term::First),
            "2" => Ok(Term::Second),
            other => Err(CatalogError::config(format!(
                "invalid term '{other}': expected 1 (fall) or 2 (spring)"
            ))),
        }
    }
}

/// A single year/term unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcademicTerm {
    /// Academic year in the ROC calendar, e.g. 112.
    pub year: u32,
    pub term: Term,
}

impl AcademicTerm {
    pub fn new(year: u32, term: Term) -> Self {
        Self { year, term }
    }

    /// Parse the raw year and term strings collected from the operator.
    pub fn parse(year: &str, term: &str) -> Result<Self, CatalogError> {
        let year = year.trim().parse::<u32>().map_err(|_| {
            CatalogError::config(format!("invalid academic year '{}'", year.trim()))
        })?;
        Ok(Self::new(year, term.parse()?))
    }

    /// Output file name, e.g. `112學年上課程紀錄.csv`.
    pub fn file_name(&self) -> String {
        format!("{}學年{}課程紀錄.csv", self.year, self.term.label())
    }

    /// Every term from `start` to `end` inclusive, fall before spring.
    pub fn range(start: u32, end: u32) -> Vec<Self> {
        (start..=end)
            .flat_map(|year| Term::ALL.into_iter().map(move |term| Self::new(year, term)))
            .collect()
    }
}

impl fmt::Display for AcademicTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_parsing() {
        assert_eq!("1".parse::<Term>().unwrap(), Term::First);
        assert_eq!(" 2 ".parse::<Term>().unwrap(), Term::Second);

        let err = "3".parse::<Term>().unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
        assert!(err.to_string().contains("invalid term '3'"));
    }

    #[test]
    fn academic_term_parse_rejects_bad_year() {
        assert!(AcademicTerm::parse("abc", "1").is_err());
        assert!(AcademicTerm::parse("112", "上").is_err());
        assert_eq!(
            AcademicTerm::parse("112", "2").unwrap(),
            AcademicTerm::new(112, Term::Second)
        );
    }

    #[test]
    fn file_name_convention() {
        assert_eq!(
            AcademicTerm::new(112, Term::First).file_name(),
            "112學年上課程紀錄.csv"
        );
        assert_eq!(
            AcademicTerm::new(113, Term::Second).file_name(),
            "113學年下課程紀錄.csv"
        );
    }

    #[test]
    fn range_covers_both_terms_in_order() {
        let terms = AcademicTerm::range(111, 112);
        let labels: Vec<String> = terms.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["111-1", "111-2", "112-1", "112-2"]);
        assert!(AcademicTerm::range(113, 112).is_empty());
    }

    #[test]
    fn row_follows_export_column_order() {
        let record = CourseRecord {
            code: "1001".into(),
            name: "測試課".into(),
            course_type: "必修".into(),
            grade: "1A".into(),
            instructor: "王小明教授".into(),
            notes: "無".into(),
            credits: "3-0".into(),
            hours: 3,
        };
        assert_eq!(
            record.to_row(),
            ["1001", "必修", "測試課", "1A", "3-0", "3", "王小明教授", "無"]
        );
    }
}
