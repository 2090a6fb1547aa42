//! Listing-page table extraction.
//!
//! The department listing is a single `<table id="no-more-tables">` whose
//! cells carry a `data-title` label. Each `<tr>` becomes one [`RawRow`]
//! holding the untouched cell text or inner HTML; interpreting those
//! fragments is the job of the field parsers downstream.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use coursecatalog_shared::{CatalogError, Result};

/// Selector for data rows of the listing table.
const ROW_SELECTOR: &str = "table#no-more-tables > tbody > tr";

/// Named cells of a listing row, keyed by their `data-title` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLabel {
    Code,
    Name,
    Credits,
    Instructor,
    Notes,
    Schedule,
}

impl CellLabel {
    /// The `data-title` attribute value identifying this cell.
    pub fn data_title(self) -> &'static str {
        match self {
            CellLabel::Code => "選課代碼",
            CellLabel::Name => "課程名稱",
            CellLabel::Credits => "學分數",
            CellLabel::Instructor => "授課教師",
            CellLabel::Notes => "備註",
            CellLabel::Schedule => "時間地點",
        }
    }

    const ALL: [CellLabel; 6] = [
        CellLabel::Code,
        CellLabel::Name,
        CellLabel::Credits,
        CellLabel::Instructor,
        CellLabel::Notes,
        CellLabel::Schedule,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Selectors for one listing page, parsed once and shared by every row.
struct ListingSelectors {
    table: Selector,
    rows: Selector,
    link: Selector,
    cells: [Selector; 6],
}

impl ListingSelectors {
    fn new() -> Self {
        let cells = CellLabel::ALL.map(|label| {
            let css = format!("td[data-title='{}']", label.data_title());
            Selector::parse(&css).expect("valid cell selector")
        });
        Self {
            table: Selector::parse("table#no-more-tables").unwrap(),
            rows: Selector::parse(ROW_SELECTOR).unwrap(),
            link: Selector::parse("a").unwrap(),
            cells,
        }
    }

    fn cell(&self, label: CellLabel) -> &Selector {
        &self.cells[label.index()]
    }
}

/// Unparsed fragments of one listing row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Text of the code cell, trimmed.
    pub code: String,
    /// Inner HTML of the course link (type, name, `<br>`, English title).
    pub name_html: String,
    /// Text of the credits cell.
    pub credits: String,
    /// Text of each instructor link, in page order.
    pub instructors: Vec<String>,
    /// Inner HTML of the notes cell.
    pub notes_html: String,
    /// Text of the time/location cell.
    pub schedule: String,
}

/// Cell lookups on a single `<tr>`.
struct RowCells<'a, 's> {
    row: ElementRef<'a>,
    selectors: &'s ListingSelectors,
}

impl<'a> RowCells<'a, '_> {
    fn cell(&self, label: CellLabel) -> Option<ElementRef<'a>> {
        self.row.select(self.selectors.cell(label)).next()
    }

    /// Concatenated text of the named cell; empty when the cell is absent.
    fn text(&self, label: CellLabel) -> String {
        self.cell(label)
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }

    /// Inner HTML of the named cell.
    fn inner_html(&self, label: CellLabel) -> String {
        self.cell(label).map(|el| el.inner_html()).unwrap_or_default()
    }

    /// Inner HTML of the first link in the named cell.
    fn link_html(&self, label: CellLabel) -> String {
        self.cell(label)
            .and_then(|cell| cell.select(&self.selectors.link).next())
            .map(|a| a.inner_html())
            .unwrap_or_default()
    }

    /// Text of every link inside the named cell.
    fn link_texts(&self, label: CellLabel) -> Vec<String> {
        self.cell(label)
            .map(|cell| {
                cell.select(&self.selectors.link)
                    .map(|a| a.text().collect::<String>().trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Extract every course row from a listing page.
///
/// Rows whose code cell is empty (section headers, spacer rows) are skipped.
/// A page without the listing table is a parse error; a table without rows
/// yields an empty list.
pub fn parse_listing(html: &str) -> Result<Vec<RawRow>> {
    let doc = Html::parse_document(html);

    let selectors = ListingSelectors::new();
    if doc.select(&selectors.table).next().is_none() {
        return Err(CatalogError::parse("listing table #no-more-tables not found"));
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for tr in doc.select(&selectors.rows) {
        let cells = RowCells {
            row: tr,
            selectors: &selectors,
        };

        let code = cells.text(CellLabel::Code).trim().to_string();
        if code.is_empty() {
            skipped += 1;
            continue;
        }

        rows.push(RawRow {
            code,
            name_html: cells.link_html(CellLabel::Name),
            credits: cells.text(CellLabel::Credits).trim().to_string(),
            instructors: cells.link_texts(CellLabel::Instructor),
            notes_html: cells.inner_html(CellLabel::Notes),
            schedule: cells.text(CellLabel::Schedule),
        });
    }

    debug!(rows = rows.len(), skipped, "listing table parsed");

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_FIXTURE: &str = include_str!("../../../../fixtures/html/listing.html");

    #[test]
    fn parses_rows_and_skips_empty_codes() {
        let rows = parse_listing(LISTING_FIXTURE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "28019");
        assert_eq!(rows[1].code, "68001");
    }

    #[test]
    fn extracts_named_cells() {
        let rows = parse_listing(LISTING_FIXTURE).unwrap();
        let row = &rows[0];

        assert!(row.name_html.starts_with("必修-程式設計<br>"));
        assert!(row.name_html.ends_with("Programming"));
        assert_eq!(row.credits, "3-0");
        assert_eq!(row.instructors, vec!["王小明", "李大華"]);
        assert!(row.notes_html.contains("/ 資工系1A<br>"));
        assert_eq!(row.schedule, "星期二/6,7,8[C118]");
    }

    #[test]
    fn missing_table_is_parse_error() {
        let err = parse_listing("<html><body><p>查無資料</p></body></html>").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn empty_table_yields_no_rows() {
        let html = r#"<table id="no-more-tables"><tbody></tbody></table>"#;
        assert!(parse_listing(html).unwrap().is_empty());
    }

    #[test]
    fn data_titles_are_distinct() {
        let mut titles: Vec<&str> = CellLabel::ALL.iter().map(|l| l.data_title()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), CellLabel::ALL.len());
    }

    #[test]
    fn cell_selectors_follow_label_order() {
        let selectors = ListingSelectors::new();
        for (i, label) in CellLabel::ALL.into_iter().enumerate() {
            assert_eq!(label.index(), i);
        }

        let html = r#"<table><tr><td data-title="備註">n</td><td data-title="選課代碼">c</td></tr></table>"#;
        let doc = Html::parse_fragment(html);
        let note = doc.select(selectors.cell(CellLabel::Notes)).next().unwrap();
        assert_eq!(note.text().collect::<String>(), "n");
    }

    #[test]
    fn missing_cells_are_empty() {
        let html = r#"<table id="no-more-tables"><tbody>
            <tr><td data-title="選課代碼">28001</td></tr>
        </tbody></table>"#;
        let rows = parse_listing(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name_html, "");
        assert!(rows[0].instructors.is_empty());
        assert_eq!(rows[0].notes_html, "");
    }
}
