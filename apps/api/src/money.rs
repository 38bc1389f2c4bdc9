//! INR amount parsing and formatting shared by the preference model, the prompt
//! compiler and the response validator.

/// The only currency the advisor quotes in.
pub const CURRENCY: &str = "INR";

/// Parses an amount the way users and the model actually write it:
/// `80000`, `"80,000"`, `"₹ 1,20,000"`, `"12499.50 INR"`, `"Rs. 4,999"`.
///
/// Returns `None` for anything that is not a single finite, non-negative number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut text = raw.trim();
    for prefix in ["₹", "INR", "Rs.", "Rs", "rs.", "rs"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim_start();
            break;
        }
    }
    for suffix in ["INR", "/-"] {
        if let Some(rest) = text.strip_suffix(suffix) {
            text = rest.trim_end();
        }
    }

    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = cleaned.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Formats an amount with Indian digit grouping, e.g. `₹1,20,000` or `₹4,999.50`.
pub fn format_inr(amount: f64) -> String {
    format!("₹{}", group_inr(amount))
}

/// Indian digit grouping without the rupee sign: `1,20,000`, `4,999.50`.
///
/// Works on the decimal rendering of the amount, so arbitrarily large values keep every digit.
pub fn group_inr(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (digits, paise) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if digits.len() <= 3 {
        digits.to_string()
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    if paise == "00" {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{paise}")
    }
}
