// Display formatting helpers for the view layer. All pure functions.

/// Renders `num` with a fixed number of decimals and comma separators every
/// three digits left of the decimal point. A leading sign stays outside the
/// grouped digit run. With `decimals == 0` no decimal point is emitted.
pub fn format_number(num: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, num);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn format_currency(num: f64) -> String {
    format!("${}", format_number(num, 2))
}

pub fn format_percent(num: f64) -> String {
    format!("{}%", format_number(num * 100.0, 1))
}

pub fn format_percent_change(num: f64) -> String {
    if num > 0.0 {
        format!("+{}", format_percent(num))
    } else {
        format_percent(num)
    }
}

/// Turns a human-readable label into a URL/CSS-safe slug: lowercase, word
/// characters and hyphens only, space runs collapsed to a single hyphen.
///
/// Hyphens already present survive, so re-slugging a slug is a no-op.
pub fn identifier(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_space = false;
    for c in label.to_lowercase().chars() {
        if c == ' ' {
            pending_space = !out.is_empty();
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            if pending_space {
                out.push('-');
                pending_space = false;
            }
            out.push(c);
        }
        // Anything else is dropped, without breaking a space run.
    }
    out
}

/// Deterministic 31-bit string hash (multiply-by-31 accumulation, folded to
/// stay non-negative). Historically used for JSONP callback names; kept for
/// stable cache-busting identifiers.
pub fn hash(s: &str) -> u32 {
    let mut h: i32 = 0;
    for c in s.chars() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32);
    }
    (h & 0x7fff_ffff) as u32
}
