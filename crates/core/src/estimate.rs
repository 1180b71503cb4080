//! Estimate money math and the budget-fitting heuristic.
//!
//! Line and document totals are always recomputed server-side from the
//! items; client-supplied totals are never trusted. Budget fitting trims
//! AI-generated line items from the tail until the running total lands
//! within [`BUDGET_TOLERANCE`] of a budget figure pulled out of the
//! user's free-text request.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Generated items may exceed an extracted budget by up to 10%.
pub const BUDGET_TOLERANCE: f64 = 1.10;

// ---------------------------------------------------------------------------
// Money helpers
// ---------------------------------------------------------------------------

/// Round a dollar amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Effective unit price for a line: an explicit custom price wins over
/// the catalog price.
pub fn effective_unit_price(unit_price: f64, custom_price: Option<f64>) -> f64 {
    custom_price.unwrap_or(unit_price)
}

/// Line total: quantity x effective unit price, rounded to cents.
pub fn line_total(quantity: f64, unit_price: f64, custom_price: Option<f64>) -> f64 {
    round_cents(quantity * effective_unit_price(unit_price, custom_price))
}

// ---------------------------------------------------------------------------
// Document totals
// ---------------------------------------------------------------------------

/// Derived totals for an estimate document.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EstimateTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Compute subtotal, tax amount, and total from line totals.
///
/// `tax_rate` is a fraction (`0.0825` for 8.25%). Each component is
/// rounded to cents independently so the stored figures add up exactly.
pub fn compute_totals(line_totals: &[f64], tax_rate: f64) -> EstimateTotals {
    let subtotal = round_cents(line_totals.iter().sum());
    let tax_amount = round_cents(subtotal * tax_rate);
    EstimateTotals {
        subtotal,
        tax_amount,
        total: round_cents(subtotal + tax_amount),
    }
}

// ---------------------------------------------------------------------------
// Budget extraction
// ---------------------------------------------------------------------------

// Explicit-marker forms: "budget of 45000", "budget: $45,000", "$45000",
// "45000 dollars", "45k budget". Bare numbers with no marker are ignored
// so quantities ("2 bathrooms") are never read as budgets.
static DOLLAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*([kK])?").expect("valid regex")
});
static BUDGET_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)budget\s*(?:of|is|at|around|:)?\s*\$?\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*([kK])?")
        .expect("valid regex")
});
static DOLLARS_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*([kK])?\s*(?:dollars|bucks|usd)")
        .expect("valid regex")
});

fn parse_figure(digits: &str, k_suffix: bool) -> Option<f64> {
    let cleaned = digits.replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    let value = if k_suffix { value * 1000.0 } else { value };
    (value > 0.0).then_some(value)
}

/// Pull a budget figure out of free text.
///
/// Matches `$1,234.56`, `budget of 45000`, `45000 dollars`, and `45k`
/// variants of each. When several figures appear the largest wins --
/// estimate requests commonly mention both a budget and smaller
/// incidental amounts.
pub fn extract_budget(text: &str) -> Option<f64> {
    let mut best: Option<f64> = None;
    for re in [&*DOLLAR_RE, &*BUDGET_WORD_RE, &*DOLLARS_SUFFIX_RE] {
        for caps in re.captures_iter(text) {
            let k = caps.get(2).is_some();
            if let Some(value) = caps.get(1).and_then(|m| parse_figure(m.as_str(), k)) {
                if best.is_none_or(|b| value > b) {
                    best = Some(value);
                }
            }
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Budget fitting
// ---------------------------------------------------------------------------

/// How many leading items to keep so the running total fits within
/// [`BUDGET_TOLERANCE`] of `budget`.
///
/// Items are dropped from the tail only; the first item always survives
/// even when it alone exceeds the cap. Returns `line_totals.len()` when
/// everything already fits.
pub fn fit_to_budget(line_totals: &[f64], budget: f64) -> usize {
    let cap = budget * BUDGET_TOLERANCE;
    let mut keep = line_totals.len();
    let mut total: f64 = line_totals.iter().sum();
    while keep > 1 && total > cap {
        keep -= 1;
        total -= line_totals[keep];
    }
    keep
}
