use std::fmt;

use serde::{Serialize, Serializer};

/// Lender comfort bands for the debt service coverage ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DscrStatus {
    NotApplicable,
    BelowLenderMinimum,
    Borderline,
    Strong,
}

impl DscrStatus {
    /// Below this, most lenders decline the loan.
    pub const LENDER_MINIMUM: f64 = 1.2;
    /// At or above this, coverage is comfortable.
    pub const STRONG_THRESHOLD: f64 = 1.35;

    /// Zero or non-finite coverage has no meaningful band.
    pub fn from_dscr(dscr: f64) -> Self {
        if dscr == 0.0 || !dscr.is_finite() {
            DscrStatus::NotApplicable
        } else if dscr < Self::LENDER_MINIMUM {
            DscrStatus::BelowLenderMinimum
        } else if dscr < Self::STRONG_THRESHOLD {
            DscrStatus::Borderline
        } else {
            DscrStatus::Strong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DscrStatus::NotApplicable => "N/A",
            DscrStatus::BelowLenderMinimum => "Below Lender Min.",
            DscrStatus::Borderline => "Borderline",
            DscrStatus::Strong => "Strong",
        }
    }
}

impl fmt::Display for DscrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DscrStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

/// Everything derived from one `InputSnapshot`. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    // Income
    pub total_monthly_rent: f64,
    pub potential_gross_income: f64,
    pub vacancy_loss: f64,
    pub effective_gross_income: f64,

    // Expenses
    pub property_tax_annual: f64,
    pub management_annual: f64,
    pub total_operating_expenses: f64,

    // Financing
    pub loan_amount: f64,
    pub monthly_rate: f64,
    pub number_of_payments: f64,
    pub monthly_mortgage: f64,
    pub annual_debt_service: f64,

    // Returns
    pub net_operating_income: f64,
    pub annual_cash_flow: f64,
    pub monthly_cash_flow: f64,
    pub total_initial_investment: f64,
    #[serde(rename = "cashOnCashROI")]
    pub cash_on_cash_roi: f64,
    pub cap_rate: f64,
    pub gross_rent_multiplier: f64,
    pub opex_ratio: f64,
    pub dscr: f64,
    pub dscr_status: DscrStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dscr_status_bands() {
        assert_eq!(DscrStatus::from_dscr(0.0), DscrStatus::NotApplicable);
        assert_eq!(DscrStatus::from_dscr(-0.4), DscrStatus::BelowLenderMinimum);
        assert_eq!(DscrStatus::from_dscr(1.1999), DscrStatus::BelowLenderMinimum);
        assert_eq!(DscrStatus::from_dscr(1.2), DscrStatus::Borderline);
        assert_eq!(DscrStatus::from_dscr(1.3499), DscrStatus::Borderline);
        assert_eq!(DscrStatus::from_dscr(1.35), DscrStatus::Strong);
        assert_eq!(DscrStatus::from_dscr(2.0), DscrStatus::Strong);
    }

    #[test]
    fn test_non_finite_dscr_is_not_applicable() {
        assert_eq!(DscrStatus::from_dscr(f64::NAN), DscrStatus::NotApplicable);
        assert_eq!(DscrStatus::from_dscr(f64::INFINITY), DscrStatus::NotApplicable);
        assert_eq!(DscrStatus::from_dscr(f64::NEG_INFINITY), DscrStatus::NotApplicable);
    }

    #[test]
    fn test_dscr_status_labels() {
        assert_eq!(DscrStatus::NotApplicable.to_string(), "N/A");
        assert_eq!(DscrStatus::BelowLenderMinimum.to_string(), "Below Lender Min.");
        assert_eq!(
            serde_json::to_value(DscrStatus::Borderline).unwrap(),
            serde_json::json!("Borderline")
        );
    }
}
