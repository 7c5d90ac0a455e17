//! Reading `.xlsx` workbooks into header-keyed rows.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use super::ImportError;

/// A cell value after calamine's typing, reduced to what the importer needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn from_data(data: &Data) -> Option<Self> {
        match data {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| Self::Text(trimmed.to_string()))
            }
            #[allow(clippy::cast_precision_loss)]
            Data::Int(i) => Some(Self::Number(*i as f64)),
            Data::Float(f) => Some(Self::Number(*f)),
            Data::Bool(b) => Some(Self::Bool(*b)),
            Data::DateTime(dt) => Some(Self::Number(dt.as_f64())),
        }
    }
}

/// One data row, keyed by lowercased header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// 1-based row number as shown in the spreadsheet.
    pub number: usize,
    pub cells: HashMap<String, Cell>,
}

impl Row {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}

/// A worksheet with its name and data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Read every worksheet of an `.xlsx` (or other calamine-supported) file.
///
/// The first non-empty row of each sheet is the header row. Header cells are
/// trimmed and lowercased; columns with a blank header are ignored, and rows
/// with no values are skipped.
///
/// # Errors
///
/// Returns `ImportError::Workbook` if the bytes are not a readable workbook.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Sheet>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ImportError::Workbook(format!("sheet '{name}': {e}")))?;
        let first_row = range.start().map_or(0, |(row, _)| row as usize);

        let mut rows = range.rows().enumerate();
        let headers: Vec<Option<String>> = match rows.next() {
            Some((_, header_row)) => header_row
                .iter()
                .map(|cell| match cell {
                    Data::Empty => None,
                    other => {
                        let header = other.to_string().trim().to_lowercase();
                        (!header.is_empty()).then_some(header)
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let rows = rows
            .filter_map(|(offset, cells)| {
                let cells: HashMap<String, Cell> = headers
                    .iter()
                    .zip(cells)
                    .filter_map(|(header, data)| {
                        Some((header.clone()?, Cell::from_data(data)?))
                    })
                    .collect();
                (!cells.is_empty()).then(|| Row {
                    number: first_row + offset + 1,
                    cells,
                })
            })
            .collect();

        sheets.push(Sheet { name, rows });
    }

    Ok(sheets)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_data() {
        assert_eq!(Cell::from_data(&Data::Empty), None);
        assert_eq!(Cell::from_data(&Data::String("   ".into())), None);
        assert_eq!(
            Cell::from_data(&Data::String(" Dairy ".into())),
            Some(Cell::Text("Dairy".into()))
        );
        assert_eq!(Cell::from_data(&Data::Int(4)), Some(Cell::Number(4.0)));
        assert_eq!(Cell::from_data(&Data::Bool(false)), Some(Cell::Bool(false)));
    }

    fn fixture() -> Vec<Sheet> {
        read_workbook(include_bytes!("../../tests/fixtures/catalog.xlsx")).unwrap()
    }

    #[test]
    fn test_reads_every_sheet_in_order() {
        let names: Vec<_> = fixture().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Categories", "subcategories", "PRODUCTS", "Notes"]);
    }

    #[test]
    fn test_headers_normalized_and_blank_columns_dropped() {
        let sheets = fixture();
        let dairy = &sheets[0].rows[0];

        assert_eq!(dairy.get("name"), Some(&Cell::Text("Dairy".into())));
        assert_eq!(
            dairy.get("description"),
            Some(&Cell::Text("Milk, curd and paneer".into()))
        );
        assert_eq!(dairy.get("is_active"), Some(&Cell::Bool(true)));
        assert_eq!(dairy.cells.len(), 3);
    }

    #[test]
    fn test_empty_rows_skipped_and_numbers_match_sheet() {
        let sheets = fixture();

        let categories: Vec<_> = sheets[0].rows.iter().map(|r| r.number).collect();
        assert_eq!(categories, [2, 4]);

        let products: Vec<_> = sheets[2].rows.iter().map(|r| r.number).collect();
        assert_eq!(products, [2, 3, 5]);
        assert_eq!(sheets[2].rows[0].get("price"), Some(&Cell::Number(54.0)));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(matches!(
            read_workbook(b"definitely not a zip archive"),
            Err(ImportError::Workbook(_))
        ));
    }
}
