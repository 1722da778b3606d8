//! Registry table extraction
//!
//! Turns the organizations table into [`TaxRecord`]s:
//! - Locates the table by its `ta_border` class, falling back to the first table
//! - Drops a leading header row
//! - Skips rows that are too short or carry no tax ID

use crate::extract::patterns::{TAX_ID, TAX_ID_ANNOTATION};
use crate::extract::{selector, stripped_text};
use crate::record::{TaxId, TaxRecord};
use scraper::{ElementRef, Html};

/// Minimum number of `td` cells a data row must have
const MIN_CELLS: usize = 4;

/// Which table the records were read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// The table carrying the `ta_border` class
    Styled,
    /// No styled table; the first table in the document was used
    Fallback,
    /// The document contains no table at all
    NotFound,
}

/// Result of one extraction pass
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Records in document order; duplicates are kept
    pub records: Vec<TaxRecord>,
    /// Rows with fewer than four cells
    pub short_rows: usize,
    /// Rows whose name cell has no tax ID annotation
    pub rows_without_tax_id: usize,
    pub source: TableSource,
}

impl Extraction {
    fn empty(source: TableSource) -> Self {
        Self {
            records: Vec::new(),
            short_rows: 0,
            rows_without_tax_id: 0,
            source,
        }
    }

    /// Total number of rows dropped
    pub fn skipped_rows(&self) -> usize {
        self.short_rows + self.rows_without_tax_id
    }
}

/// Extracts organization records from the registry page
///
/// # Row Rules
///
/// | Cell | Field |
/// |------|-------|
/// | 0 | `stt` |
/// | 1 | organization name, tax ID annotation removed; tax ID captured |
/// | 2 | address |
/// | 3 | first anchor's `href`, else the cell text |
///
/// Rows with fewer than four cells, or with no tax ID in the name cell, are
/// counted and skipped. They never become records with placeholder values.
///
/// # Example
///
/// ```
/// use hddt_sync::extract::extract_records;
///
/// let html = r#"<table><tr><td>1</td><td>ACME Corp (MST: 0123456789)</td>
///     <td>Hà Nội</td><td><a href="https://acme.vn">acme.vn</a></td></tr></table>"#;
/// let extraction = extract_records(html);
/// assert_eq!(extraction.records[0].organization_name, "ACME Corp");
/// assert_eq!(extraction.records[0].tax_id.as_str(), "0123456789");
/// ```
pub fn extract_records(html: &str) -> Extraction {
    let document = Html::parse_document(html);

    let Some((table, source)) = locate_table(&document) else {
        tracing::warn!("Data table not found in HTML");
        return Extraction::empty(TableSource::NotFound);
    };

    if source == TableSource::Fallback {
        tracing::debug!("Styled table missing, using the first table in the document");
    }

    let mut extraction = Extraction::empty(source);

    let (Some(row_selector), Some(cell_selector), Some(header_selector)) =
        (selector("tr"), selector("td"), selector("th"))
    else {
        return extraction;
    };

    let mut rows = table.select(&row_selector).peekable();
    if rows
        .peek()
        .is_some_and(|first| first.select(&header_selector).next().is_some())
    {
        rows.next();
    }

    for row in rows {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < MIN_CELLS {
            extraction.short_rows += 1;
            continue;
        }

        match parse_row(&cells) {
            Some(record) => extraction.records.push(record),
            None => {
                tracing::debug!("Skipping row without tax ID: {}", stripped_text(&cells[1]));
                extraction.rows_without_tax_id += 1;
            }
        }
    }

    tracing::debug!(
        "Extracted {} records, skipped {} short rows and {} rows without tax ID",
        extraction.records.len(),
        extraction.short_rows,
        extraction.rows_without_tax_id
    );

    extraction
}

/// Finds the data table, preferring the styled one
fn locate_table(document: &Html) -> Option<(ElementRef<'_>, TableSource)> {
    if let Some(styled) = selector("table.ta_border").and_then(|s| document.select(&s).next()) {
        return Some((styled, TableSource::Styled));
    }

    selector("table")
        .and_then(|s| document.select(&s).next())
        .map(|table| (table, TableSource::Fallback))
}

/// Builds a record from a row with at least four cells
fn parse_row(cells: &[ElementRef<'_>]) -> Option<TaxRecord> {
    let raw_name = stripped_text(&cells[1]);
    let (tax_id, organization_name) = split_tax_id(&raw_name)?;

    Some(TaxRecord {
        sequence_number: stripped_text(&cells[0]),
        organization_name,
        tax_id,
        address: stripped_text(&cells[2]),
        info_page_link: link_target(&cells[3]),
    })
}

/// Separates the tax ID annotation from an organization name
///
/// Returns the captured tax ID and the name with every annotation removed.
pub(crate) fn split_tax_id(raw_name: &str) -> Option<(TaxId, String)> {
    let digits = TAX_ID.as_ref()?.captures(raw_name)?.get(1)?.as_str();
    let tax_id = TaxId::new(digits).ok()?;

    let name = match TAX_ID_ANNOTATION.as_ref() {
        Some(annotation) => annotation.replace_all(raw_name, "").trim().to_string(),
        None => raw_name.to_string(),
    };

    Some((tax_id, name))
}

/// The anchor target of a cell, or its text when it has no anchor
fn link_target(cell: &ElementRef<'_>) -> String {
    let anchor = selector("a").and_then(|s| cell.select(&s).next());

    match anchor {
        Some(a) => a.value().attr("href").unwrap_or_default().trim().to_string(),
        None => stripped_text(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(table: &str) -> String {
        format!("<html><body><p>Danh sách</p>{}</body></html>", table)
    }

    const STYLED_TABLE: &str = r#"
        <table class="ta_border">
            <tr><th>STT</th><th>Tên tổ chức</th><th>Địa chỉ</th><th>Trang thông tin</th></tr>
            <tr>
                <td>1</td>
                <td>Công ty Cổ phần MISA (MST: 0101243150)</td>
                <td>Hà Nội</td>
                <td><a href=" https://meinvoice.vn "> meinvoice.vn </a></td>
            </tr>
            <tr>
                <td>2</td>
                <td>Tổng Công ty Viettel [MST số 0100109106]</td>
                <td>Hà Nội</td>
                <td>viettel.vn</td>
            </tr>
        </table>"#;

    #[test]
    fn test_extract_styled_table() {
        let extraction = extract_records(&page(STYLED_TABLE));

        assert_eq!(extraction.source, TableSource::Styled);
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.skipped_rows(), 0);

        let misa = &extraction.records[0];
        assert_eq!(misa.sequence_number, "1");
        assert_eq!(misa.organization_name, "Công ty Cổ phần MISA");
        assert_eq!(misa.tax_id.as_str(), "0101243150");
        assert_eq!(misa.address, "Hà Nội");
        assert_eq!(misa.info_page_link, "https://meinvoice.vn");

        let viettel = &extraction.records[1];
        assert_eq!(viettel.organization_name, "Tổng Công ty Viettel");
        assert_eq!(viettel.tax_id.as_str(), "0100109106");
        assert_eq!(viettel.info_page_link, "viettel.vn");
    }

    #[test]
    fn test_name_normalization() {
        let (tax_id, name) = split_tax_id("ACME Corp (MST: 0123456789)").unwrap();
        assert_eq!(tax_id.as_str(), "0123456789");
        assert_eq!(name, "ACME Corp");
    }

    #[test]
    fn test_annotation_in_middle_of_name() {
        let (tax_id, name) = split_tax_id("ACME (mst.0123) Services").unwrap();
        assert_eq!(tax_id.as_str(), "0123");
        assert_eq!(name, "ACME Services");
    }

    #[test]
    fn test_name_without_tax_id() {
        assert!(split_tax_id("ACME Corp").is_none());
        assert!(split_tax_id("MST: chưa cấp").is_none());
    }

    #[test]
    fn test_prefers_styled_table_over_earlier_tables() {
        let html = page(&format!(
            "<table><tr><td>layout</td></tr></table>{}",
            STYLED_TABLE
        ));
        let extraction = extract_records(&html);
        assert_eq!(extraction.source, TableSource::Styled);
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn test_falls_back_to_first_table() {
        let html = page(
            r#"<table>
                <tr><td>7</td><td>Công ty A MST: 0300000001</td><td>HCM</td><td>a.vn</td></tr>
            </table>"#,
        );
        let extraction = extract_records(&html);

        assert_eq!(extraction.source, TableSource::Fallback);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].tax_id.as_str(), "0300000001");
        assert_eq!(extraction.records[0].organization_name, "Công ty A");
    }

    #[test]
    fn test_no_table() {
        let extraction = extract_records("<html><body><p>Không có dữ liệu</p></body></html>");
        assert_eq!(extraction.source, TableSource::NotFound);
        assert!(extraction.records.is_empty());
    }

    #[test]
    fn test_first_row_kept_when_not_header() {
        let html = page(
            r#"<table class="ta_border">
                <tr><td>1</td><td>A (MST: 01)</td><td>x</td><td>y</td></tr>
                <tr><td>2</td><td>B (MST: 02)</td><td>x</td><td>y</td></tr>
            </table>"#,
        );
        assert_eq!(extract_records(&html).records.len(), 2);
    }

    #[test]
    fn test_malformed_rows_are_dropped_not_defaulted() {
        let html = page(
            r#"<table class="ta_border">
                <tr><th>STT</th><th>Tên</th><th>Địa chỉ</th><th>Web</th></tr>
                <tr><td>1</td><td>Short row (MST: 0100)</td><td>x</td></tr>
                <tr><td>2</td><td>No tax id here</td><td>x</td><td>y</td></tr>
                <tr><td colspan="4">Ghi chú</td></tr>
                <tr><td>3</td><td>Good (MST: 0300)</td><td>x</td><td>y</td><td>extra</td></tr>
            </table>"#,
        );
        let extraction = extract_records(&html);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].tax_id.as_str(), "0300");
        assert_eq!(extraction.short_rows, 2);
        assert_eq!(extraction.rows_without_tax_id, 1);
        assert!(extraction
            .records
            .iter()
            .all(|r| !r.tax_id.as_str().is_empty()
                && r.tax_id.as_str().bytes().all(|b| b.is_ascii_digit())));
    }

    #[test]
    fn test_duplicate_tax_ids_are_kept() {
        let html = page(
            r#"<table class="ta_border">
                <tr><td>1</td><td>A (MST: 0100)</td><td>old</td><td>y</td></tr>
                <tr><td>2</td><td>A (MST: 0100)</td><td>new</td><td>y</td></tr>
            </table>"#,
        );
        let extraction = extract_records(&html);
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn test_anchor_without_href() {
        let html = page(
            r#"<table><tr><td>1</td><td>A (MST: 0100)</td><td>x</td><td><a>text only</a></td></tr></table>"#,
        );
        assert_eq!(extract_records(&html).records[0].info_page_link, "");
    }
}
