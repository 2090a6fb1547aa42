//! Candidate record construction from a raw listing row.

use coursecatalog_crawler::RawRow;
use coursecatalog_shared::{CourseRecord, UNKNOWN};

use crate::parsers::{contact_hours, fragment_text, parse_grade, split_type_and_name};

/// Joins multiple instructor names.
const INSTRUCTOR_CONNECTOR: &str = "與";

/// Appended to the joined instructor names.
const INSTRUCTOR_TITLE: &str = "教授";

/// Populate every field of a record from one row. Never filters.
pub fn build_candidate(row: &RawRow) -> CourseRecord {
    let title = fragment_text(&row.name_html, " ");
    let (course_type, name) = split_type_and_name(title.trim());

    // Grade reads the raw fragment; notes are plain text
    let notes = fragment_text(&row.notes_html, "\n").trim().to_string();

    CourseRecord {
        code: row.code.trim().to_string(),
        name,
        course_type,
        grade: parse_grade(&row.notes_html),
        instructor: format_instructors(&row.instructors),
        notes,
        credits: row.credits.trim().to_string(),
        hours: contact_hours(&row.schedule),
    }
}

/// `["王", "李"]` becomes `"王與李教授"`; no names gives [`UNKNOWN`].
fn format_instructors(names: &[String]) -> String {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    if names.is_empty() {
        return UNKNOWN.to_string();
    }

    format!("{}{INSTRUCTOR_TITLE}", names.join(INSTRUCTOR_CONNECTOR))
}
