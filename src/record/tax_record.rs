//! Organization entries and the keyed collection they are stored in

use crate::record::TaxId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Sort key given to records whose `stt` is not an integer
pub const UNNUMBERED_SORT_KEY: i64 = 999_999;

/// The persisted dataset: every record ever seen, keyed by tax ID
pub type RecordStore = HashMap<TaxId, TaxRecord>;

/// One organization's registration entry
///
/// Field names on disk follow the published dataset (`stt`, `ten_to_chuc`,
/// `mst`, `dia_chi`, `trang_thong_tin`). Reading is lenient: text fields
/// accept numbers, booleans and null, and `mst` accepts a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRecord {
    /// Display ordinal from the source table, not guaranteed numeric
    #[serde(rename = "stt", default, deserialize_with = "lenient_string")]
    pub sequence_number: String,

    /// Organization name with the tax-ID annotation removed
    #[serde(rename = "ten_to_chuc", default, deserialize_with = "lenient_string")]
    pub organization_name: String,

    #[serde(rename = "mst", deserialize_with = "lenient_tax_id")]
    pub tax_id: TaxId,

    #[serde(rename = "dia_chi", default, deserialize_with = "lenient_string")]
    pub address: String,

    /// Link target of the info-page cell, or its text when it has no anchor
    #[serde(
        rename = "trang_thong_tin",
        default,
        deserialize_with = "lenient_string"
    )]
    pub info_page_link: String,
}

impl TaxRecord {
    /// Ordering key used when saving: `stt` as an integer, otherwise
    /// [`UNNUMBERED_SORT_KEY`]
    pub fn sort_key(&self) -> i64 {
        Self::sort_key_of(&self.sequence_number)
    }

    /// Ordering key for a raw `stt` value
    pub fn sort_key_of(sequence_number: &str) -> i64 {
        sequence_number
            .trim()
            .parse::<i64>()
            .unwrap_or(UNNUMBERED_SORT_KEY)
    }

    /// Overwrites this record's fields with `other`'s, field by field
    ///
    /// Returns true if any field changed.
    pub fn merge_from(&mut self, other: TaxRecord) -> bool {
        let mut changed = false;
        let TaxRecord {
            sequence_number,
            organization_name,
            tax_id,
            address,
            info_page_link,
        } = other;

        changed |= assign(&mut self.sequence_number, sequence_number);
        changed |= assign(&mut self.organization_name, organization_name);
        changed |= assign(&mut self.tax_id, tax_id);
        changed |= assign(&mut self.address, address);
        changed |= assign(&mut self.info_page_link, info_page_link);
        changed
    }
}

/// Text of a JSON scalar; null becomes empty, other values their JSON text
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|value| value_text(&value))
}

fn lenient_tax_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TaxId, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => TaxId::new(s).map_err(D::Error::custom),
        Value::Number(n) => TaxId::new(n.to_string()).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("unusable mst: {}", other))),
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stt: &str, mst: &str, address: &str) -> TaxRecord {
        TaxRecord {
            sequence_number: stt.to_string(),
            organization_name: "Công ty TNHH Ví dụ".to_string(),
            tax_id: TaxId::new(mst).unwrap(),
            address: address.to_string(),
            info_page_link: "https://example.vn".to_string(),
        }
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(record("12", "1", "").sort_key(), 12);
        assert_eq!(record(" 7 ", "1", "").sort_key(), 7);
        assert_eq!(record("x", "1", "").sort_key(), UNNUMBERED_SORT_KEY);
        assert_eq!(record("", "1", "").sort_key(), UNNUMBERED_SORT_KEY);
    }

    #[test]
    fn test_merge_from_overwrites_fields() {
        let mut existing = record("1", "0100", "A");
        let changed = existing.merge_from(record("1", "0100", "B"));

        assert!(changed);
        assert_eq!(existing.address, "B");
        assert_eq!(existing.sequence_number, "1");
    }

    #[test]
    fn test_merge_from_identical_is_noop() {
        let mut existing = record("1", "0100", "A");
        assert!(!existing.merge_from(existing.clone()));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(record("3", "0312", "Hà Nội")).unwrap();
        assert_eq!(json["stt"], "3");
        assert_eq!(json["mst"], "0312");
        assert_eq!(json["dia_chi"], "Hà Nội");
        assert!(json.get("ten_to_chuc").is_some());
        assert!(json.get("trang_thong_tin").is_some());
    }

    #[test]
    fn test_non_string_fields_are_read_as_text() {
        let parsed: TaxRecord = serde_json::from_str(
            r#"{"stt": 5, "ten_to_chuc": null, "mst": 100, "dia_chi": true, "trang_thong_tin": ""}"#,
        )
        .unwrap();
        assert_eq!(parsed.sequence_number, "5");
        assert_eq!(parsed.organization_name, "");
        assert_eq!(parsed.tax_id.as_str(), "100");
        assert_eq!(parsed.address, "true");
        assert_eq!(parsed.sort_key(), 5);
    }

    #[test]
    fn test_non_digit_tax_id_is_rejected() {
        assert!(serde_json::from_str::<TaxRecord>(r#"{"mst": "0300-001"}"#).is_err());
        assert!(serde_json::from_str::<TaxRecord>(r#"{"mst": null}"#).is_err());
    }

    #[test]
    fn test_missing_optional_fields_deserialize_empty() {
        let parsed: TaxRecord = serde_json::from_str(r#"{"mst": "0100"}"#).unwrap();
        assert_eq!(parsed.tax_id.as_str(), "0100");
        assert_eq!(parsed.address, "");
    }
}
