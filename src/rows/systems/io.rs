// src/rows/systems/io.rs
//! CSV import/export and the autosave snapshot.
//!
//! Files carry three logical columns in fixed order: product name, product
//! description, generated ad. The header row is optional; recognized header
//! aliases (including Georgian variants) normalize to the canonical names,
//! and an unrecognized or missing header means the first three positional
//! columns are taken as name/description/ad. Export always writes the
//! canonical header and UTF-8 with a BOM so common spreadsheet tools open
//! Georgian text correctly.

use bevy::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rows::definitions::{AdRow, CANONICAL_COLUMNS};
use crate::rows::events::{RequestExportCsv, RequestImportCsv, RowOperationFeedback};
use crate::rows::resources::{GenerationState, RowSheet};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const AUTOSAVE_FILE_NAME: &str = "tako_ads_autosave.csv";

#[derive(Debug, Error)]
pub enum CsvIoError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Fixed well-known snapshot location in the user's home directory,
/// overwritten after every batch.
pub fn autosave_path() -> Option<PathBuf> {
    directories_next::UserDirs::new().map(|dirs| dirs.home_dir().join(AUTOSAVE_FILE_NAME))
}

fn canonical_index(header_field: &str) -> Option<usize> {
    match header_field.trim().to_lowercase().as_str() {
        "name" | "product name" | "სახელი" | "პროდუქტის სახელი" => Some(0),
        "description" | "product description" | "აღწერა" => Some(1),
        "ad" | "advertisement" | "generated advertisement" | "რეკლამა" => Some(2),
        _ => None,
    }
}

/// If the first record looks like a header (any field matches a known alias),
/// returns the source-column index for each canonical column.
fn header_mapping(record: &csv::StringRecord) -> Option<[Option<usize>; 3]> {
    let mut mapping = [None; 3];
    let mut recognized = false;
    for (source_index, field) in record.iter().enumerate() {
        if let Some(canonical) = canonical_index(field) {
            if mapping[canonical].is_none() {
                mapping[canonical] = Some(source_index);
                recognized = true;
            }
        }
    }
    recognized.then_some(mapping)
}

pub fn read_rows_csv(path: &Path) -> Result<Vec<AdRow>, CsvIoError> {
    let raw = fs::read(path)?;
    let bytes = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };

    let mapping = header_mapping(first);
    let data = if mapping.is_some() {
        &records[1..]
    } else {
        &records[..]
    };

    let field = |record: &csv::StringRecord, canonical: usize| -> String {
        let source = match mapping {
            Some(map) => map[canonical],
            None => Some(canonical),
        };
        source
            .and_then(|i| record.get(i))
            .unwrap_or_default()
            .to_string()
    };

    Ok(data
        .iter()
        .map(|record| AdRow {
            name: field(record, 0),
            description: field(record, 1),
            ad: field(record, 2),
        })
        .collect())
}

pub fn write_rows_csv(rows: &[AdRow], path: &Path) -> Result<(), CsvIoError> {
    let mut file = fs::File::create(path)?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CANONICAL_COLUMNS)?;
    for row in rows {
        writer.write_record([&row.name, &row.description, &row.ad])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn handle_import_request(
    mut events: EventReader<RequestImportCsv>,
    mut sheet: ResMut<RowSheet>,
    generation_state: Res<GenerationState>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    for event in events.read() {
        if generation_state.is_running() {
            feedback_writer.write(RowOperationFeedback {
                message: "Cannot import while generation is running.".to_string(),
                is_error: true,
            });
            continue;
        }
        match read_rows_csv(&event.path) {
            Ok(rows) => {
                let count = rows.len();
                sheet.rows = rows;
                info!("Imported {} row(s) from {:?}.", count, event.path);
                feedback_writer.write(RowOperationFeedback {
                    message: format!("Imported {count} rows."),
                    is_error: false,
                });
            }
            Err(err) => {
                error!("CSV import from {:?} failed: {}", event.path, err);
                feedback_writer.write(RowOperationFeedback {
                    message: format!("Import failed: {err}"),
                    is_error: true,
                });
            }
        }
    }
}

pub fn handle_export_request(
    mut events: EventReader<RequestExportCsv>,
    sheet: Res<RowSheet>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    for event in events.read() {
        match write_rows_csv(&sheet.rows, &event.path) {
            Ok(()) => {
                info!("Exported {} row(s) to {:?}.", sheet.rows.len(), event.path);
                feedback_writer.write(RowOperationFeedback {
                    message: format!("Exported {} rows.", sheet.rows.len()),
                    is_error: false,
                });
            }
            Err(err) => {
                error!("CSV export to {:?} failed: {}", event.path, err);
                feedback_writer.write(RowOperationFeedback {
                    message: format!("Export failed: {err}"),
                    is_error: true,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn tmp_csv(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn rows(cells: &[(&str, &str, &str)]) -> Vec<AdRow> {
        cells.iter()
            .map(|(n, d, a)| AdRow {
                name: n.to_string(),
                description: d.to_string(),
                ad: a.to_string(),
            })
            .collect()
    }

    #[test]
    fn round_trip_preserves_ascii_and_georgian_content() {
        let original = rows(&[
            ("Widget", "Shiny widget", "Buy now!"),
            ("ხინკალი", "გემრიელი, ცომის \"ქუდით\"", "იყიდე ახლავე!"),
            ("Comma, Inc.", "line\nbreak", ""),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_rows_csv(&original, &path).unwrap();
        let reloaded = read_rows_csv(&path).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn export_starts_with_utf8_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_rows_csv(&rows(&[("a", "b", "c")]), &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("name,description,ad"));
    }

    #[test]
    fn canonical_header_is_recognized() {
        let file = tmp_csv("name,description,ad\nWidget,Shiny,Done\n".as_bytes());
        let rows = read_rows_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].ad, "Done");
    }

    #[test]
    fn spreadsheet_style_header_normalizes_identically() {
        let fancy = tmp_csv(
            "Product Name,Product Description,Generated Advertisement\nWidget,Shiny,Done\n"
                .as_bytes(),
        );
        let plain = tmp_csv("name,description,ad\nWidget,Shiny,Done\n".as_bytes());
        let bare = tmp_csv("Widget,Shiny,Done\n".as_bytes());
        assert_eq!(
            read_rows_csv(fancy.path()).unwrap(),
            read_rows_csv(plain.path()).unwrap()
        );
        assert_eq!(
            read_rows_csv(plain.path()).unwrap(),
            read_rows_csv(bare.path()).unwrap()
        );
    }

    #[test]
    fn georgian_header_aliases_are_recognized() {
        let file = tmp_csv("სახელი,აღწერა,რეკლამა\nხაჭაპური,აჭარული,\n".as_bytes());
        let rows = read_rows_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "ხაჭაპური");
        assert_eq!(rows[0].description, "აჭარული");
    }

    #[test]
    fn headerless_file_keeps_its_first_row() {
        let file = tmp_csv("First,Row,\nSecond,Row,\n".as_bytes());
        let rows = read_rows_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "First");
    }

    #[test]
    fn reordered_header_columns_are_mapped() {
        let file = tmp_csv("ad,name,description\nDone,Widget,Shiny\n".as_bytes());
        let rows = read_rows_csv(file.path()).unwrap();
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].description, "Shiny");
        assert_eq!(rows[0].ad, "Done");
    }

    #[test]
    fn missing_third_column_means_empty_ad() {
        let file = tmp_csv("name,description\nWidget,Shiny\nGadget,Small\n".as_bytes());
        let rows = read_rows_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.ad.is_empty()));
    }

    #[test]
    fn bom_on_input_is_stripped() {
        let mut contents = Vec::new();
        contents.extend_from_slice(UTF8_BOM);
        contents.extend_from_slice("name,description,ad\nWidget,Shiny,\n".as_bytes());
        let file = tmp_csv(&contents);
        let rows = read_rows_csv(file.path()).unwrap();
        assert_eq!(rows[0].name, "Widget");
    }

    #[test]
    fn empty_file_imports_as_empty_working_set() {
        let file = tmp_csv(b"");
        assert!(read_rows_csv(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = read_rows_csv(Path::new("/nonexistent/definitely_not_here.csv")).unwrap_err();
        assert!(matches!(err, CsvIoError::Io(_)));
    }
}
