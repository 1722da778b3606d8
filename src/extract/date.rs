use crate::extract::patterns::SOURCE_DATE;
use crate::extract::{selector, stripped_text};
use crate::record::SourceDate;
use scraper::Html;

/// Extracts the page's declared "last updated" month
///
/// Reads the first `<p dir="ltr">` and looks for `DD/MM` followed by an
/// optional slash and a four-digit year. The day is discarded.
///
/// # Returns
///
/// * `Some(SourceDate)` - The declared month and year
/// * `None` - No marker paragraph, no date in it, or an impossible month
///
/// # Example
///
/// ```
/// use hddt_sync::extract::extract_source_date;
///
/// let html = r#"<p dir="ltr">Cập nhật đến ngày 15/05/2024</p>"#;
/// assert_eq!(extract_source_date(html).unwrap().to_string(), "05/2024");
/// ```
pub fn extract_source_date(html: &str) -> Option<SourceDate> {
    let document = Html::parse_document(html);

    let marker = selector(r#"p[dir="ltr"]"#).and_then(|s| document.select(&s).next())?;
    let text = stripped_text(&marker);

    let captures = SOURCE_DATE.as_ref()?.captures(&text)?;
    let month = captures.get(2)?.as_str().parse::<u32>().ok()?;
    let year = captures.get(3)?.as_str().parse::<i32>().ok()?;

    let date = SourceDate::from_month_year(month, year);
    if date.is_none() {
        tracing::debug!("Ignoring impossible source date in '{}'", text);
    }
    date
}
