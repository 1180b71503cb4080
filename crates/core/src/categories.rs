//! Construction trade categories used for expense classification and the
//! receipt-extraction prompt.

/// Expense categories in build-phase order. Receipt analysis classifies
/// into one of these; the first entry doubles as the fallback category
/// when the model output cannot be parsed.
pub const EXPENSE_CATEGORIES: [&str; 18] = [
    "PRE-CONSTRUCTION",
    "DEMOLITION",
    "CONCRETE & MASONRY",
    "FRAMING & ROUGH CARPENTRY",
    "ROOFING",
    "EXTERIOR FINISHES",
    "WINDOWS & DOORS",
    "PLUMBING",
    "ELECTRICAL",
    "HVAC",
    "INSULATION",
    "DRYWALL",
    "INTERIOR FINISHES",
    "FLOORING",
    "PAINTING",
    "CABINETRY & MILLWORK",
    "LANDSCAPING",
    "CLEANUP & FINAL",
];

/// Fallback category for unparseable or unclassifiable receipts.
pub fn default_category() -> &'static str {
    EXPENSE_CATEGORIES[0]
}

/// Whether `name` is one of the known expense categories (exact match).
pub fn is_known_category(name: &str) -> bool {
    EXPENSE_CATEGORIES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_is_first_entry() {
        assert_eq!(default_category(), "PRE-CONSTRUCTION");
    }

    #[test]
    fn known_category_lookup() {
        assert!(is_known_category("ELECTRICAL"));
        assert!(!is_known_category("electrical"));
        assert!(!is_known_category("SPACE TRAVEL"));
    }
}
