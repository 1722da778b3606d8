use crate::record::SourceDate;

/// Whether the source has moved past the last applied revision
///
/// A plain comparison of normalized month tokens. There is no content hash
/// behind it: if the page changes without its date changing, the change is
/// not picked up until the date moves.
pub fn should_proceed(source: &SourceDate, last_synced: Option<&SourceDate>) -> bool {
    last_synced != Some(source)
}
