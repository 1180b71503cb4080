//! Receipt duplicate-detection fingerprints.
//!
//! Two signals: a SHA-256 hash of the receipt image (exact duplicate,
//! cannot be overridden) and a normalized store/amount/date fingerprint
//! from the OCR fields (similar duplicate, user may override). Similar
//! matches only count within [`SIMILAR_WINDOW_DAYS`] of the receipt date.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Look-back window for OCR-fingerprint matches.
pub const SIMILAR_WINDOW_DAYS: i64 = 90;

/// SHA-256 hex digest of a base64 receipt image.
///
/// A `data:image/...;base64,` prefix is stripped first so the same image
/// hashes identically whether or not it arrives as a data URL. The digest
/// is computed over the base64 text itself, matching what clients can
/// compute without decoding.
pub fn image_hash(base64_data: &str) -> String {
    let content = match base64_data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:image/") => rest,
        _ => base64_data,
    };
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Normalized `store_amount_yyyymmdd` fingerprint for similar-duplicate
/// detection.
///
/// Store normalization: lowercase, drop non-alphanumerics (keeping
/// spaces), collapse whitespace runs to a single `_`. The amount is
/// fixed to two decimals.
pub fn ocr_fingerprint(store: &str, amount: f64, date: NaiveDate) -> String {
    let normalized: String = store
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let store_part = normalized.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{store_part}_{amount:.2}_{}", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_hash_strips_data_url_prefix() {
        let raw = image_hash("aGVsbG8=");
        let data_url = image_hash("data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(raw, data_url);
        assert_eq!(raw.len(), 64);
    }

    #[test]
    fn different_images_hash_differently() {
        assert_ne!(image_hash("aGVsbG8="), image_hash("d29ybGQ="));
    }

    #[test]
    fn fingerprint_normalizes_store_names() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let fp = ocr_fingerprint("  The Home  Depot #123! ", 45.5, date);
        assert_eq!(fp, "the_home_depot_123_45.50_20250309");
    }

    #[test]
    fn same_receipt_same_fingerprint() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            ocr_fingerprint("Lowe's", 12.0, date),
            ocr_fingerprint("lowes", 12.0, date),
        );
    }
}
