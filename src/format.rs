/// Long money form used in tooltips: "1.50 Billion USD"
pub fn money(x: f64) -> String {
    let abs = x.abs();
    let sign = if x < 0.0 { "-" } else { "" };

    let (value, unit) = if abs >= 1e12 {
        (abs / 1e12, " Trillion USD")
    } else if abs >= 1e9 {
        (abs / 1e9, " Billion USD")
    } else if abs >= 1e6 {
        (abs / 1e6, " Million USD")
    } else if abs >= 1e3 {
        (abs / 1e3, " Thousand USD")
    } else {
        (abs, " USD")
    };

    format!("{sign}{value:.2}{unit}")
}

/// Compact axis form: "1.5B", "-500B", "250"
pub fn axis_money(x: f64) -> String {
    let abs = x.abs();
    let sign = if x < 0.0 { "-" } else { "" };

    let (value, suffix) = if abs >= 1e12 {
        (abs / 1e12, "T")
    } else if abs >= 1e9 {
        (abs / 1e9, "B")
    } else if abs >= 1e6 {
        (abs / 1e6, "M")
    } else if abs >= 1e3 {
        (abs / 1e3, "K")
    } else {
        return format!("{sign}{abs:.0}");
    };

    // Whole numbers drop the decimal
    if value.fract() == 0.0 {
        format!("{sign}{value:.0}{suffix}")
    } else {
        format!("{sign}{value:.1}{suffix}")
    }
}

/// Shorten to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_units() {
        assert_eq!(money(1.5e9), "1.50 Billion USD");
        assert_eq!(money(-48e9), "-48.00 Billion USD");
        assert_eq!(money(2.25e12), "2.25 Trillion USD");
        assert_eq!(money(999.0), "999.00 USD");
        assert_eq!(money(0.0), "0.00 USD");
    }

    #[test]
    fn test_axis_money() {
        assert_eq!(axis_money(-500e9), "-500B");
        assert_eq!(axis_money(100e9), "100B");
        assert_eq!(axis_money(1.5e6), "1.5M");
        assert_eq!(axis_money(10_000.0), "10K");
        assert_eq!(axis_money(250.0), "250");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Education", 20), "Education");
        assert_eq!(truncate("Government and civil society", 10), "Governmen…");
    }
}
