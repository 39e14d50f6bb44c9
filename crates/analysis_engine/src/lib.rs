//! Income-property calculation engine.
//!
//! `compute` turns one [`InputSnapshot`] into the full [`MetricsSnapshot`]
//! in a single pass over the rent roll. It never fails: every ratio whose
//! denominator is zero is defined as 0.

pub mod format;
pub mod mix;
pub mod report;

use models::{DscrStatus, InputSnapshot, ManagementFee, MetricsSnapshot};

pub use mix::{unit_mix, UnitMixRow};
pub use report::render_report;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Level monthly payment for a fully amortizing loan.
///
/// `annual_rate_pct` is a whole-number percent. Returns 0 when there is
/// nothing to borrow or no payments to spread it over.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, term_years: f64) -> f64 {
    let monthly_rate = annual_rate_pct / 100.0 / MONTHS_PER_YEAR;
    let number_of_payments = term_years * MONTHS_PER_YEAR;
    level_payment(principal, annual_rate_pct, monthly_rate, number_of_payments)
}

fn level_payment(principal: f64, annual_rate_pct: f64, r: f64, n: f64) -> f64 {
    if principal <= 0.0 || n <= 0.0 {
        return 0.0;
    }
    if annual_rate_pct == 0.0 {
        // Straight-line repayment
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    let payment = principal * (r * growth) / (growth - 1.0);
    if payment.is_finite() {
        payment
    } else {
        0.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn compute(input: &InputSnapshot) -> MetricsSnapshot {
    // Income
    let total_monthly_rent: f64 = input.units.iter().map(|u| u.rent).sum();
    let potential_gross_income = total_monthly_rent * MONTHS_PER_YEAR;
    let vacancy_loss = potential_gross_income * input.vacancy_rate / 100.0;
    let effective_gross_income = potential_gross_income - vacancy_loss;

    // Operating expenses; management is charged on PGI, not EGI
    let property_tax_annual = input.purchase_price * input.property_tax_rate / 100.0;
    let management_annual = match input.management_fee() {
        ManagementFee::PercentOfGross(pct) => potential_gross_income * pct / 100.0,
        ManagementFee::Flat(amount) => amount,
    };
    let total_operating_expenses = management_annual
        + input.maintenance
        + property_tax_annual
        + input.insurance
        + input.other_expenses;

    // Financing
    let loan_amount = input.purchase_price - input.down_payment;
    let monthly_rate = input.interest_rate / 100.0 / MONTHS_PER_YEAR;
    let number_of_payments = input.loan_term * MONTHS_PER_YEAR;
    let monthly_mortgage = level_payment(
        loan_amount,
        input.interest_rate,
        monthly_rate,
        number_of_payments,
    );
    let annual_debt_service = monthly_mortgage * MONTHS_PER_YEAR;

    // Returns
    let net_operating_income = effective_gross_income - total_operating_expenses;
    let annual_cash_flow = net_operating_income - annual_debt_service;
    let total_initial_investment = input.down_payment + input.closing_costs + input.initial_cap_ex;

    let cash_on_cash_roi = ratio(annual_cash_flow, total_initial_investment) * 100.0;
    let cap_rate = ratio(net_operating_income, input.purchase_price) * 100.0;
    let gross_rent_multiplier = ratio(input.purchase_price, potential_gross_income);
    let opex_ratio = ratio(total_operating_expenses, potential_gross_income) * 100.0;
    let dscr = ratio(net_operating_income, annual_debt_service);

    MetricsSnapshot {
        total_monthly_rent,
        potential_gross_income,
        vacancy_loss,
        effective_gross_income,
        property_tax_annual,
        management_annual,
        total_operating_expenses,
        loan_amount,
        monthly_rate,
        number_of_payments,
        monthly_mortgage,
        annual_debt_service,
        net_operating_income,
        annual_cash_flow,
        monthly_cash_flow: annual_cash_flow / MONTHS_PER_YEAR,
        total_initial_investment,
        cash_on_cash_roi,
        cap_rate,
        gross_rent_multiplier,
        opex_ratio,
        dscr,
        dscr_status: DscrStatus::from_dscr(dscr),
    }
}
