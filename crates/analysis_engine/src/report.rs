//! Plain-text analysis report.
//!
//! The layout is fixed: identical inputs always render byte-identical text,
//! so reports can be diffed between scenarios.

use models::{InputSnapshot, ManagementFee, MetricsSnapshot};

use crate::format::{currency, percent, ratio};
use crate::mix::unit_mix;

const WIDTH: usize = 56;
const LABEL_WIDTH: usize = 30;

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
}

fn line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "{:<width$}{}\n",
        format!("{label}:"),
        value,
        width = LABEL_WIDTH
    ));
}

fn or_unset(text: &str) -> &str {
    if text.trim().is_empty() {
        "(not set)"
    } else {
        text
    }
}

pub fn render_report(input: &InputSnapshot, m: &MetricsSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(WIDTH));
    out.push_str("\nMULTIFAMILY ROI ANALYSIS\n");
    out.push_str(&"=".repeat(WIDTH));
    out.push('\n');

    heading(&mut out, "PROPERTY & ASSUMPTIONS");
    line(&mut out, "Address", or_unset(&input.address));
    line(&mut out, "Listing ID", or_unset(&input.listing_id));
    line(&mut out, "Units", &input.units.len().to_string());
    line(&mut out, "Vacancy Rate", &percent(input.vacancy_rate));
    line(&mut out, "Property Tax Rate", &percent(input.property_tax_rate));
    let management = match input.management_fee() {
        ManagementFee::PercentOfGross(pct) => format!("{} of gross income", percent(pct)),
        ManagementFee::Flat(amount) => format!("{} flat per year", currency(amount)),
    };
    line(&mut out, "Management", &management);

    heading(&mut out, "ACQUISITION");
    line(&mut out, "Purchase Price", &currency(input.purchase_price));
    line(&mut out, "Down Payment", &currency(input.down_payment));
    line(&mut out, "Closing Costs", &currency(input.closing_costs));
    line(&mut out, "Initial CapEx", &currency(input.initial_cap_ex));
    line(&mut out, "Total Initial Investment", &currency(m.total_initial_investment));

    heading(&mut out, "FINANCING");
    line(&mut out, "Loan Amount", &currency(m.loan_amount));
    line(&mut out, "Interest Rate", &percent(input.interest_rate));
    line(&mut out, "Loan Term", &format!("{} years", input.loan_term));
    line(&mut out, "Number of Payments", &m.number_of_payments.to_string());
    line(&mut out, "Monthly Mortgage", &currency(m.monthly_mortgage));

    heading(&mut out, "INCOME");
    line(&mut out, "Total Monthly Rent", &currency(m.total_monthly_rent));
    line(&mut out, "Potential Gross Income", &currency(m.potential_gross_income));
    line(&mut out, "Vacancy Loss", &currency(m.vacancy_loss));
    line(&mut out, "Effective Gross Income", &currency(m.effective_gross_income));

    heading(&mut out, "EXPENSES");
    line(&mut out, "Property Tax", &currency(m.property_tax_annual));
    line(&mut out, "Management", &currency(m.management_annual));
    line(&mut out, "Maintenance", &currency(input.maintenance));
    line(&mut out, "Insurance", &currency(input.insurance));
    line(&mut out, "Other / HOA", &currency(input.other_expenses));
    line(&mut out, "Total Operating Expenses", &currency(m.total_operating_expenses));
    line(&mut out, "OpEx Ratio", &percent(m.opex_ratio));

    heading(&mut out, "DEBT & CASH FLOW");
    line(&mut out, "Net Operating Income", &currency(m.net_operating_income));
    line(&mut out, "Annual Debt Service", &currency(m.annual_debt_service));
    line(&mut out, "Annual Cash Flow", &currency(m.annual_cash_flow));
    line(&mut out, "Monthly Cash Flow", &currency(m.monthly_cash_flow));

    heading(&mut out, "KEY PERFORMANCE INDICATORS");
    line(&mut out, "Cash-on-Cash ROI", &percent(m.cash_on_cash_roi));
    line(&mut out, "Cap Rate", &percent(m.cap_rate));
    line(&mut out, "Gross Rent Multiplier", &ratio(m.gross_rent_multiplier));
    line(
        &mut out,
        "DSCR",
        &format!("{} ({})", ratio(m.dscr), m.dscr_status),
    );

    heading(&mut out, "UNIT MIX");
    for unit in &input.units {
        line(
            &mut out,
            &format!("Unit {}", unit.id),
            &format!(
                "{} bd / {} ba  {}/mo",
                unit.bedrooms,
                unit.bathrooms,
                currency(unit.rent)
            ),
        );
    }
    for row in unit_mix(&input.units) {
        line(
            &mut out,
            &format!("{} bd / {} ba x{}", row.bedrooms, row.bathrooms, row.count),
            &format!("avg {}/mo", currency(row.average_rent)),
        );
    }
    line(&mut out, "Total Monthly Rent", &currency(m.total_monthly_rent));

    out
}
