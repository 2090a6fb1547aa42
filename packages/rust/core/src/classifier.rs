//! Accept/reject policy applied to fully built candidate records.

use coursecatalog_shared::CourseRecord;

/// Notes marker for graduate-program courses.
const GRADUATE_MARKER: &str = "碩";

/// Type marker for elective courses.
const ELECTIVE_MARKER: &str = "選修";

/// Why a record was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    Graduate,
    Elective,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Decide whether a record belongs in the output.
pub fn classify(record: &CourseRecord) -> Verdict {
    if record.notes.contains(GRADUATE_MARKER) {
        return Verdict::Reject(Rejection::Graduate);
    }
    if record.course_type.contains(ELECTIVE_MARKER) {
        return Verdict::Reject(Rejection::Elective);
    }
    Verdict::Accept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(course_type: &str, notes: &str) -> CourseRecord {
        CourseRecord {
            code: "1".into(),
            course_type: course_type.into(),
            notes: notes.into(),
            ..CourseRecord::default()
        }
    }

    #[test]
    fn accepts_required_undergraduate() {
        assert_eq!(classify(&record("必修", "資工系1A")), Verdict::Accept);
        assert!(classify(&record("未知", "")).is_accept());
    }

    #[test]
    fn rejects_graduate_notes() {
        assert_eq!(
            classify(&record("必修", "68001 資訊工程學系 / 資工碩2-4")),
            Verdict::Reject(Rejection::Graduate)
        );
    }

    #[test]
    fn rejects_elective_type() {
        assert_eq!(
            classify(&record("選修", "資工系3A")),
            Verdict::Reject(Rejection::Elective)
        );
    }

    #[test]
    fn both_markers_still_rejected() {
        assert!(!classify(&record("選修", "碩士班")).is_accept());
    }
}
