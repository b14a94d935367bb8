use std::fmt;

/// Money is represented as integer cents so that shares and balances stay exact.
/// 1 unit = 100 cents, so 50.00$ = 5000 cents.
pub type Cents = i64;

/// Divide two integers, rounding half away from zero.
///
/// This is the "half-up" rounding used for every monetary result: shares,
/// proportional debts and display values. `denominator` must be non-zero.
pub fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator != 0, "division by zero");
    let negative = (numerator < 0) != (denominator < 0);
    let (n, d) = (numerator.abs(), denominator.abs());
    let rounded = (2 * n + d) / (2 * d);
    if negative { -rounded } else { rounded }
}

/// Scale `amount` by `numerator / denominator`, rounded half-up to whole cents.
pub fn scale_cents(amount: Cents, numerator: Cents, denominator: Cents) -> Cents {
    div_round_half_up(amount as i128 * numerator as i128, denominator as i128) as Cents
}

/// Format cents with exactly two decimals and a `.` separator, independent of locale.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents as whole units, rounding half-up.
/// Example: 260049 -> "2600", 260050 -> "2601"
pub fn format_whole_units(cents: Cents) -> String {
    div_round_half_up(cents as i128, 100).to_string()
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "0.005" -> 1
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if input.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };
    if decimal_str.contains('.') {
        return Err(ParseCentsError::InvalidFormat);
    }
    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().chain(decimal_str.chars()).all(|c| c.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let mut digits = decimal_str.chars().filter_map(|c| c.to_digit(10)).map(i64::from);
    let tens = digits.next().unwrap_or(0);
    let ones = digits.next().unwrap_or(0);
    // Third fractional digit decides rounding; the rest cannot change a half-up result.
    let round_up = digits.next().is_some_and(|d| d >= 5);

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tens * 10 + ones + i64::from(round_up)))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
