//! Field parsers for raw listing fragments.
//!
//! Each parser is a pure `&str -> T` function. Extraction failures never
//! error: they resolve to the [`UNKNOWN`] sentinel or to zero.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::debug;

use coursecatalog_shared::UNKNOWN;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// `/ 資工系` followed by the class token; a trailing `-N` marks a graduate range.
static GRADE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\s*資工系\s*([A-Z0-9,]+)(-[0-9]+)?").expect("grade regex")
});

/// Any tag, stopping at the first `>`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));

/// `<br>`, `<br/>`, `<br />`, `<BR>`.
static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break regex"));

/// Bracketed room codes such as `[C118]`.
static ROOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("room regex"));

/// One class period. ASCII only: `\d` would also accept full-width digits.
static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("period regex"));

/// Schedule cell content when the catalog has no timetable entry.
const NO_DATA: &str = "無資料";

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Split a course title into `(type, name)`.
///
/// `"必修-資料結構 Data Structures"` becomes `("必修", "資料結構")`. Without a
/// hyphen the type is [`UNKNOWN`] and the name is the input unchanged.
pub fn split_type_and_name(title: &str) -> (String, String) {
    let Some((course_type, rest)) = title.split_once('-') else {
        return (UNKNOWN.to_string(), title.to_string());
    };

    let name = rest.split(' ').next().unwrap_or_default();
    (course_type.to_string(), name.to_string())
}

/// Extract the class/grade token from a raw notes fragment.
///
/// Matches against the HTML as served, since the marker is delimited by the
/// markup around it. Graduate ranges like `2-4` are not a grade.
pub fn parse_grade(notes_html: &str) -> String {
    let Some(caps) = GRADE_RE.captures(notes_html) else {
        return UNKNOWN.to_string();
    };

    if let Some(range) = caps.get(2) {
        debug!(matched = &caps[0], range = range.as_str(), "grade looks like a range, ignoring");
        return UNKNOWN.to_string();
    }

    let grade = caps[1].trim();
    if grade.is_empty() {
        UNKNOWN.to_string()
    } else {
        grade.to_string()
    }
}

/// Count weekly contact hours in a schedule string.
///
/// Every run of digits outside `[...]` is one period, so
/// `"星期二/9,三/9[H307] 星期一/1,2[H308]"` is 4.
pub fn contact_hours(schedule: &str) -> u32 {
    if schedule.contains(NO_DATA) {
        return 0;
    }

    let cleaned = ROOM_RE.replace_all(schedule, "");
    PERIOD_RE.find_iter(&cleaned).count() as u32
}

/// Remove every `<...>` tag, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Replace every HTML line break with `with`.
pub fn replace_line_breaks(html: &str, with: &str) -> String {
    BR_RE.replace_all(html, with).into_owned()
}

/// Decode character references (`&amp;`, `&lt;`, `&nbsp;`, ...) into text.
///
/// Expects tag-free input; any markup left in is dropped with its text kept.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    Html::parse_fragment(text).root_element().text().collect()
}

/// Plain text of an HTML fragment: breaks become `line_break`, tags are
/// removed and entities decoded.
pub fn fragment_text(html: &str, line_break: &str) -> String {
    decode_entities(&strip_tags(&replace_line_breaks(html, line_break)))
}
