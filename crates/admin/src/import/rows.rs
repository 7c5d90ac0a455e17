//! Row validation for spreadsheet imports.
//!
//! Every row of every recognized sheet is checked. Failures are collected
//! as `Row {n} in {Sheet}: {problems}`, with all problems of one row joined
//! by `; `.

use rust_decimal::Decimal;

use jagmart_core::{ImageFolder, Price, PriceError, StockQuantity};

use super::image::{DecodedImage, decode_image_cell};
use super::workbook::{Cell, Row, Sheet};
use crate::models::catalog::MAX_NAME_LENGTH;

/// The sheets the importer understands, matched case-insensitively by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Categories,
    Subcategories,
    Products,
}

impl SheetKind {
    #[must_use]
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "categories" => Some(Self::Categories),
            "subcategories" => Some(Self::Subcategories),
            "products" => Some(Self::Products),
            _ => None,
        }
    }

    /// Name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Subcategories => "Subcategories",
            Self::Products => "Products",
        }
    }

    #[must_use]
    pub const fn folder(self) -> ImageFolder {
        match self {
            Self::Categories => ImageFolder::Categories,
            Self::Subcategories => ImageFolder::Subcategories,
            Self::Products => ImageFolder::Products,
        }
    }
}

/// Fields every catalog row carries.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonFields {
    /// Spreadsheet row number.
    pub row: usize,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<DecodedImage>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub fields: CommonFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryRecord {
    pub fields: CommonFields,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub fields: CommonFields,
    pub category_name: String,
    pub subcategory_name: String,
    pub price: Price,
    pub stock_quantity: StockQuantity,
}

/// Everything parsed out of a workbook, valid or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedImport {
    pub categories: Vec<CategoryRecord>,
    pub subcategories: Vec<SubcategoryRecord>,
    pub products: Vec<ProductRecord>,
    pub errors: Vec<String>,
}

impl ValidatedImport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate every row of the recognized sheets. Other sheets are ignored.
#[must_use]
pub fn validate_sheets(sheets: &[Sheet]) -> ValidatedImport {
    let mut out = ValidatedImport::default();

    for sheet in sheets {
        let Some(kind) = SheetKind::from_sheet_name(&sheet.name) else {
            tracing::debug!(sheet = %sheet.name, "Ignoring unrecognized sheet");
            continue;
        };

        for row in &sheet.rows {
            let mut problems = Vec::new();
            match kind {
                SheetKind::Categories => {
                    if let Some(fields) = common_fields(row, &mut problems) {
                        out.categories.push(CategoryRecord { fields });
                    }
                }
                SheetKind::Subcategories => {
                    let category_name = required_text(row, "category_name", &mut problems);
                    let fields = common_fields(row, &mut problems);
                    if let (Some(fields), Some(category_name)) = (fields, category_name) {
                        out.subcategories.push(SubcategoryRecord {
                            fields,
                            category_name,
                        });
                    }
                }
                SheetKind::Products => {
                    let category_name = required_text(row, "category_name", &mut problems);
                    let subcategory_name = required_text(row, "subcategory_name", &mut problems);
                    let price = price(row, &mut problems);
                    let stock_quantity = stock_quantity(row, &mut problems);
                    let fields = common_fields(row, &mut problems);
                    if let (
                        Some(fields),
                        Some(category_name),
                        Some(subcategory_name),
                        Some(price),
                        Some(stock_quantity),
                    ) = (fields, category_name, subcategory_name, price, stock_quantity)
                    {
                        out.products.push(ProductRecord {
                            fields,
                            category_name,
                            subcategory_name,
                            price,
                            stock_quantity,
                        });
                    }
                }
            }

            if !problems.is_empty() {
                out.errors.push(format!(
                    "Row {} in {}: {}",
                    row.number,
                    kind.label(),
                    problems.join("; ")
                ));
            }
        }
    }

    out
}

/// Parse the shared columns. Returns `None` if any of them failed.
fn common_fields(row: &Row, problems: &mut Vec<String>) -> Option<CommonFields> {
    let before = problems.len();

    let name = required_text(row, "name", problems);
    if let Some(name) = &name
        && name.chars().count() > MAX_NAME_LENGTH
    {
        problems.push(format!("name must be at most {MAX_NAME_LENGTH} characters"));
    }

    let description = optional_text(row, "description");

    let image = optional_text(row, "image").and_then(|cell| {
        decode_image_cell(&cell)
            .map_err(|e| problems.push(format!("image: {e}")))
            .ok()
    });

    let is_active = match row.get("is_active") {
        None => true,
        Some(cell) => parse_bool(cell).unwrap_or_else(|| {
            problems.push("is_active must be true or false".to_string());
            true
        }),
    };

    if problems.len() > before {
        return None;
    }

    Some(CommonFields {
        row: row.number,
        name: name?,
        description,
        image,
        is_active,
    })
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
    }
}

fn optional_text(row: &Row, column: &str) -> Option<String> {
    row.get(column).map(cell_text)
}

fn required_text(row: &Row, column: &str, problems: &mut Vec<String>) -> Option<String> {
    let value = optional_text(row, column);
    if value.is_none() {
        problems.push(format!("{column} is required"));
    }
    value
}

fn parse_bool(cell: &Cell) -> Option<bool> {
    match cell {
        Cell::Bool(b) => Some(*b),
        Cell::Number(n) if *n == 1.0 => Some(true),
        Cell::Number(n) if *n == 0.0 => Some(false),
        Cell::Number(_) => None,
        Cell::Text(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
    }
}

fn price(row: &Row, problems: &mut Vec<String>) -> Option<Price> {
    const MESSAGE: &str = "price must be a positive number";

    let parsed = match row.get("price") {
        None => {
            problems.push("price is required".to_string());
            return None;
        }
        Some(Cell::Number(n)) => Price::from_f64_positive(*n),
        Some(Cell::Text(s)) => s
            .parse::<Decimal>()
            .map_err(|_| PriceError::NotANumber)
            .and_then(Price::new_positive),
        Some(Cell::Bool(_)) => Err(PriceError::NotANumber),
    };

    match parsed {
        Ok(price) => Some(price),
        Err(PriceError::TooLarge) => {
            problems.push(format!("price cannot exceed {}", Price::MAX.amount()));
            None
        }
        Err(_) => {
            problems.push(MESSAGE.to_string());
            None
        }
    }
}

fn stock_quantity(row: &Row, problems: &mut Vec<String>) -> Option<StockQuantity> {
    const MESSAGE: &str = "stock_quantity must be a whole number of at least 0";

    let parsed = match row.get("stock_quantity") {
        None => {
            problems.push("stock_quantity is required".to_string());
            return None;
        }
        Some(Cell::Number(n)) if n.fract() == 0.0 && n.is_finite() => {
            #[allow(clippy::cast_possible_truncation)]
            let whole = *n as i64;
            StockQuantity::new(whole).ok()
        }
        Some(Cell::Text(s)) => s
            .parse::<i64>()
            .ok()
            .and_then(|n| StockQuantity::new(n).ok()),
        Some(_) => None,
    };

    if parsed.is_none() {
        problems.push(MESSAGE.to_string());
    }
    parsed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    fn row(number: usize, cells: &[(&str, Cell)]) -> Row {
        Row {
            number,
            cells: cells
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sheet(name: &str, rows: Vec<Row>) -> Sheet {
        Sheet {
            name: name.to_string(),
            rows,
        }
    }

    #[test]
    fn test_sheet_kind_matching() {
        assert_eq!(
            SheetKind::from_sheet_name("CATEGORIES"),
            Some(SheetKind::Categories)
        );
        assert_eq!(
            SheetKind::from_sheet_name(" products "),
            Some(SheetKind::Products)
        );
        assert_eq!(SheetKind::from_sheet_name("Notes"), None);
    }

    #[test]
    fn test_valid_category_defaults_active() {
        let result = validate_sheets(&[sheet(
            "Categories",
            vec![row(2, &[("name", text("Dairy")), ("description", text("Milk & more"))])],
        )]);

        assert!(result.is_valid());
        let fields = &result.categories[0].fields;
        assert_eq!(fields.name, "Dairy");
        assert_eq!(fields.description.as_deref(), Some("Milk & more"));
        assert!(fields.is_active);
        assert_eq!(fields.row, 2);
    }

    #[test]
    fn test_missing_name_is_reported_with_row_and_sheet() {
        let result = validate_sheets(&[sheet(
            "categories",
            vec![
                row(2, &[("name", text("Bakery"))]),
                row(3, &[("description", text("no name"))]),
            ],
        )]);

        assert_eq!(result.categories.len(), 1);
        assert_eq!(result.errors, vec!["Row 3 in Categories: name is required"]);
    }

    #[test]
    fn test_product_problems_are_joined() {
        let result = validate_sheets(&[sheet(
            "Products",
            vec![row(
                5,
                &[
                    ("name", text("Amul Butter")),
                    ("category_name", text("Dairy")),
                    ("price", Cell::Number(0.0)),
                    ("stock_quantity", Cell::Number(2.5)),
                ],
            )],
        )]);

        assert!(result.products.is_empty());
        assert_eq!(
            result.errors,
            vec![
                "Row 5 in Products: subcategory_name is required; \
                 price must be a positive number; \
                 stock_quantity must be a whole number of at least 0"
            ]
        );
    }

    fn product_priced(price: Cell) -> Vec<String> {
        validate_sheets(&[sheet(
            "Products",
            vec![row(
                4,
                &[
                    ("name", text("Elaichi")),
                    ("category_name", text("Staples")),
                    ("subcategory_name", text("Spices")),
                    ("price", price),
                    ("stock_quantity", Cell::Number(3.0)),
                ],
            )],
        )])
        .errors
    }

    #[test]
    fn test_price_that_rounds_to_zero_is_rejected() {
        let expected = vec!["Row 4 in Products: price must be a positive number"];
        assert_eq!(product_priced(Cell::Number(0.004)), expected);
        assert_eq!(product_priced(text("0.004")), expected);
    }

    #[test]
    fn test_price_beyond_column_range_is_a_row_error() {
        let expected = vec!["Row 4 in Products: price cannot exceed 99999999.99"];
        assert_eq!(product_priced(Cell::Number(1e12)), expected);
        assert_eq!(product_priced(text("100000000")), expected);
        assert!(product_priced(text("99999999.99")).is_empty());
    }

    #[test]
    fn test_valid_product_with_text_numbers() {
        let result = validate_sheets(&[sheet(
            "Products",
            vec![row(
                2,
                &[
                    ("name", text("Basmati Rice 5kg")),
                    ("category_name", text("Staples")),
                    ("subcategory_name", text("Rice")),
                    ("price", text("649.50")),
                    ("stock_quantity", text("12")),
                    ("is_active", text("No")),
                ],
            )],
        )]);

        assert!(result.is_valid(), "{:?}", result.errors);
        let product = &result.products[0];
        assert_eq!(product.price.amount(), Decimal::new(64950, 2));
        assert_eq!(product.stock_quantity.get(), 12);
        assert!(!product.fields.is_active);
    }

    #[test]
    fn test_bad_is_active_and_image() {
        let result = validate_sheets(&[sheet(
            "Subcategories",
            vec![row(
                7,
                &[
                    ("name", text("Cheese")),
                    ("category_name", text("Dairy")),
                    ("is_active", text("maybe")),
                    ("image", text("data:text/plain;base64,aGk=")),
                ],
            )],
        )]);

        assert_eq!(
            result.errors,
            vec![
                "Row 7 in Subcategories: image: File must be an image; \
                 is_active must be true or false"
            ]
        );
    }

    #[test]
    fn test_image_is_decoded_during_validation() {
        let png = STANDARD.encode(b"\x89PNG\r\n\x1a\n0000");
        let result = validate_sheets(&[sheet(
            "Categories",
            vec![row(2, &[("name", text("Snacks")), ("image", text(&png))])],
        )]);

        let image = result.categories[0].fields.image.as_ref().unwrap();
        assert_eq!(image.content_type, "image/png");
    }

    #[test]
    fn test_unrecognized_sheets_are_ignored() {
        let result = validate_sheets(&[sheet("Readme", vec![row(2, &[("x", text("y"))])])]);
        assert_eq!(result, ValidatedImport::default());
    }
}
