//! Float literal formatting for command output
//!
//! Matrix components are written as Minecraft single-precision literals
//! (`0.1488f`, `2f`, `0f`) with at most six decimal digits.

/// Values with a magnitude below this are written as zero.
pub const ZERO_THRESHOLD: f64 = 1e-7;

/// Suffix marking a literal as a single-precision float.
pub const FLOAT_SUFFIX: char = 'f';

/// Format a float as a canonical float literal.
///
/// # Examples
///
/// ```
/// use pixelsummon::format::format_float;
///
/// assert_eq!(format_float(0.0), "0f");
/// assert_eq!(format_float(1.5), "1.5f");
/// assert_eq!(format_float(2.0), "2f");
/// assert_eq!(format_float(0.1488), "0.1488f");
/// ```
pub fn format_float(v: f64) -> String {
    let v = if v.abs() < ZERO_THRESHOLD { 0.0 } else { v };

    let fixed = format!("{:.6}", v);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    let mut literal = match trimmed {
        "" | "-" | "-0" => String::from("0"),
        s => s.to_string(),
    };
    literal.push(FLOAT_SUFFIX);
    literal
}
