//! Number formatting for labels and axis ticks.
//!
//! - `group_thousands`: locale-style digit grouping for value and total
//!   labels ("1,234,567").
//! - `si`: two-significant-digit SI notation for axis ticks ("250M",
//!   "1.4G").

/// Group an integer's digits in threes with commas.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const SI_PREFIXES: [(f64, &str); 4] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
];

/// Render a non-negative value with two significant digits and an SI
/// prefix. Values under 1000 are shown as plain integers.
pub fn si(v: f64) -> String {
    if v <= 0.0 {
        return "0".to_string();
    }
    for (factor, prefix) in SI_PREFIXES {
        if v >= factor {
            let scaled = v / factor;
            return format!("{}{}", two_significant(scaled), prefix);
        }
    }
    format!("{}", v.round() as u64)
}

/// Two significant digits, trailing ".0" trimmed.
fn two_significant(v: f64) -> String {
    if v >= 10.0 {
        // 10..999 in the scaled range: round to an integer, keeping only
        // two significant digits.
        let magnitude = 10f64.powf(v.log10().floor() - 1.0);
        let rounded = (v / magnitude).round() * magnitude;
        format!("{}", rounded.round() as u64)
    } else {
        let rounded = (v * 10.0).round() / 10.0;
        if (rounded - rounded.round()).abs() < f64::EPSILON {
            format!("{}", rounded.round() as u64)
        } else {
            format!("{rounded:.1}")
        }
    }
}
