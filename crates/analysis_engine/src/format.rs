//! Display formatting for amounts, percents and ratios.

pub fn round2(v: f64) -> f64 {
    // Adding 0.0 folds -0.0 into 0.0
    (v * 100.0).round() / 100.0 + 0.0
}

/// `$1,234.56`, with a leading `-` for negative amounts.
pub fn currency(v: f64) -> String {
    let cents = (v.abs() * 100.0).round() as u64;
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Whole-number percent with two decimals: `6.50%`.
pub fn percent(v: f64) -> String {
    format!("{:.2}%", round2(v))
}

pub fn ratio(v: f64) -> String {
    format!("{:.2}", round2(v))
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    while n >= 1000 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.push(n.to_string());
    groups.reverse();
    groups.join(",")
}
