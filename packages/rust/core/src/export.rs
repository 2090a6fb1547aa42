//! CSV serialization of sorted course records.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet software picks the
//! right encoding. The whole file is rendered in memory before anything
//! touches the filesystem; a rejected batch never leaves a partial file.

use std::path::Path;

use tracing::{info, instrument};

use coursecatalog_shared::{CatalogError, CourseRecord, ExportViolation, Result};

/// UTF-8 byte-order mark.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Number of columns emitted per record.
pub const COLUMN_COUNT: usize = 8;

/// Header matching [`CourseRecord::to_row`] column order.
pub const DEFAULT_HEADER: [&str; COLUMN_COUNT] = [
    "選課代碼",
    "課程類別",
    "課程名稱",
    "年級/班級",
    "學分數",
    "時數",
    "授課教師",
    "備註",
];

/// Check batch and header before rendering.
fn validate(records: &[CourseRecord], header: &[&str]) -> Result<()> {
    if records.is_empty() {
        return Err(ExportViolation::EmptyBatch.into());
    }
    if header.is_empty() {
        return Err(ExportViolation::EmptyHeader.into());
    }
    if header.len() != COLUMN_COUNT {
        return Err(ExportViolation::HeaderWidth {
            expected: COLUMN_COUNT,
            found: header.len(),
        }
        .into());
    }
    Ok(())
}

/// Render BOM, header and records into CSV bytes.
pub fn render_csv(records: &[CourseRecord], header: &[&str]) -> Result<Vec<u8>> {
    validate(records, header)?;

    let mut buf = BOM.to_vec();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(header)
            .map_err(|e| CatalogError::Csv(format!("writing header: {e}")))?;

        for record in records {
            wtr.write_record(&record.to_row())
                .map_err(|e| CatalogError::Csv(format!("writing record {}: {e}", record.code)))?;
        }

        wtr.flush()
            .map_err(|e| CatalogError::Csv(format!("flushing output: {e}")))?;
    }

    Ok(buf)
}

/// Write records to `path` as CSV.
#[instrument(skip_all, fields(path = %path.display(), records = records.len()))]
pub fn write_csv(path: &Path, records: &[CourseRecord], header: &[&str]) -> Result<()> {
    let file_name_empty = path
        .file_name()
        .map(|n| n.to_string_lossy().trim().is_empty())
        .unwrap_or(true);
    if path.as_os_str().is_empty() || file_name_empty {
        return Err(ExportViolation::EmptyFileName.into());
    }

    let bytes = render_csv(records, header)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    std::fs::write(path, &bytes).map_err(|e| CatalogError::io(path, e))?;

    info!(bytes = bytes.len(), "CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Vec<CourseRecord> {
        vec![CourseRecord {
            code: "1001".into(),
            course_type: "必修".into(),
            name: "測試課".into(),
            grade: "1".into(),
            credits: "3-0".into(),
            hours: 3,
            instructor: "測試員教授".into(),
            notes: "無".into(),
        }]
    }

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        assert!(bytes.starts_with(BOM));
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&bytes[BOM.len()..]);
        rdr.records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn successful_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("112學年上課程紀錄.csv");

        write_csv(&path, &sample(), &DEFAULT_HEADER).unwrap();

        let rows = read_back(&std::fs::read(&path).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], DEFAULT_HEADER);
        assert_eq!(rows[1], ["1001", "必修", "測試課", "1", "3-0", "3", "測試員教授", "無"]);
    }

    #[test]
    fn empty_file_name_rejected() {
        let err = write_csv(Path::new(""), &sample(), &DEFAULT_HEADER).unwrap_err();
        assert!(matches!(err, CatalogError::Export(ExportViolation::EmptyFileName)));
    }

    #[test]
    fn empty_batch_rejected_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let err = write_csv(&path, &[], &DEFAULT_HEADER).unwrap_err();
        assert!(matches!(err, CatalogError::Export(ExportViolation::EmptyBatch)));
        assert!(!path.exists());
    }

    #[test]
    fn empty_header_rejected_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-header.csv");

        let err = write_csv(&path, &sample(), &[]).unwrap_err();
        assert!(matches!(err, CatalogError::Export(ExportViolation::EmptyHeader)));
        assert!(!path.exists());
    }

    #[test]
    fn short_header_rejected() {
        let header = ["選課代碼", "課程類別", "課程名稱", "學分數", "時數", "授課教師", "備註"];
        let err = render_csv(&sample(), &header).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Export(ExportViolation::HeaderWidth { expected: 8, found: 7 })
        ));
    }

    #[test]
    fn notes_with_newlines_and_commas_roundtrip() {
        let mut records = sample();
        records[0].notes = "第一行, 含逗號\n第二行 \"引號\"".into();

        let bytes = render_csv(&records, &DEFAULT_HEADER).unwrap();
        let rows = read_back(&bytes);
        assert_eq!(rows[1][7], records[0].notes);
    }

    #[test]
    fn directory_path_is_not_a_file_name() {
        let err = write_csv(&PathBuf::from("out/.."), &sample(), &DEFAULT_HEADER).unwrap_err();
        assert!(matches!(err, CatalogError::Export(ExportViolation::EmptyFileName)));
    }
}
