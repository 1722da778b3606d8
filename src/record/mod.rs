//! Record types for the e-invoice organization registry
//!
//! # Components
//!
//! - `TaxId`: validated, digits-only primary key
//! - `TaxRecord`: one organization's registration entry
//! - `RecordStore`: the persisted collection, keyed by tax ID
//! - `SourceDate`: month/year revision marker declared by the source page

mod source_date;
mod tax_id;
mod tax_record;

// Re-export main types
pub use source_date::SourceDate;
pub use tax_id::{InvalidTaxId, TaxId};
pub use tax_record::{RecordStore, TaxRecord, UNNUMBERED_SORT_KEY};
pub(crate) use tax_record::value_text;
