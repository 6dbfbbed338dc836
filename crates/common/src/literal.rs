//! Literal text parsing and float notation.
//!
//! Integer literals accept an optional sign followed by decimal digits,
//! `0x` hexadecimal or `0o` octal digits. Float literals accept either the
//! decimal notation Rust understands or C99 hexadecimal notation
//! (`0x1.8p+1`). Floats are always printed in hexadecimal notation, which
//! is what `printf("%a")` produces.
//!
//! String literals use `\DDD` decimal escapes. They are decoded once, when
//! the literal becomes a value; [`encode_escapes`] produces source notation
//! again for listings and state dumps.

/// Parse an integer literal. Returns `None` for malformed or out-of-range text.
pub fn parse_int(text: &str) -> Option<i64> {
    let (negative, rest) = split_sign(text);

    let (digits, radix) = if let Some(hex) = strip_prefix_ci(rest, "0x") {
        (hex, 16)
    } else if let Some(oct) = strip_prefix_ci(rest, "0o") {
        (oct, 8)
    } else {
        (rest, 10)
    };

    // from_str_radix tolerates a leading '+', which would allow "+-5" style input.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()? as i128;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// Parse a float literal in decimal or C99 hexadecimal notation.
pub fn parse_float(text: &str) -> Option<f64> {
    let (negative, rest) = split_sign(text);

    let magnitude = match strip_prefix_ci(rest, "0x") {
        Some(hex) => parse_hex_float(hex)?,
        None => {
            if rest.starts_with(['+', '-']) || rest.is_empty() {
                return None;
            }
            rest.parse::<f64>().ok()?
        }
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a bool literal: exactly `true` or `false`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Decimal codes a `\DDD` escape may name.
fn is_escapable(code: u32) -> bool {
    code <= 32 || code == 35 || code == 92
}

/// Replace every `\DDD` sequence with the character it names.
///
/// Returns `None` when a backslash is not followed by three decimal digits
/// naming 0-32, 35 or 92.
pub fn decode_escapes(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let digits = rest.get(pos + 1..pos + 4)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let code: u32 = digits.parse().ok()?;
        if !is_escapable(code) {
            return None;
        }
        out.push(char::from_u32(code)?);
        rest = &rest[pos + 4..];
    }
    out.push_str(rest);
    Some(out)
}

/// Source notation for decoded string text: whitespace, control characters,
/// `#` and `\` become `\DDD` escapes.
pub fn encode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_escapable(c as u32) {
            out.push_str(&format!("\\{:03}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// Format a float in C99 hexadecimal notation (`%a`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}inf");
    }

    let bits = value.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = bits & ((1u64 << 52) - 1);

    if exponent_bits == 0 && mantissa == 0 {
        return format!("{sign}0x0p+0");
    }

    let (lead, exponent) = if exponent_bits == 0 {
        (0, -1022)
    } else {
        (1, exponent_bits - 1023)
    };

    let fraction = format!("{mantissa:013x}");
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{sign}0x{lead}p{exponent:+}")
    } else {
        format!("{sign}0x{lead}.{fraction}p{exponent:+}")
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Parse the part of a hex float after `0x`: `h*[.h*][p[+-]d+]`.
fn parse_hex_float(text: &str) -> Option<f64> {
    let (body, exponent) = match text.find(['p', 'P']) {
        Some(pos) => {
            let exp_text = &text[pos + 1..];
            let (neg, digits) = split_sign(exp_text);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let exp: i64 = digits.parse().ok()?;
            (&text[..pos], if neg { -exp } else { exp })
        }
        None => (text, 0),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut mantissa: u64 = 0;
    let mut scale: i64 = 0;
    let mut sticky = false;
    for (digits, is_fraction) in [(int_part, false), (frac_part, true)] {
        for c in digits.chars() {
            let d = c.to_digit(16)? as u64;
            if mantissa >> 60 == 0 {
                mantissa = (mantissa << 4) | d;
                if is_fraction {
                    scale -= 4;
                }
            } else {
                // Out of mantissa precision: the digit only shifts the value
                // and decides rounding when non-zero.
                sticky |= d != 0;
                if !is_fraction {
                    scale += 4;
                }
            }
        }
    }
    // Bit 0 sits well below f64 precision once the mantissa is full, so it
    // only breaks ties in the u64 -> f64 conversion.
    if sticky {
        mantissa |= 1;
    }

    let exponent = exponent.checked_add(scale)?;
    let exponent = i32::try_from(exponent.clamp(-4000, 4000)).ok()?;
    Some(scale_by_pow2(mantissa as f64, exponent))
}

/// Multiply `x` by `2^exp` without overflowing the intermediate power.
fn scale_by_pow2(mut x: f64, mut exp: i32) -> f64 {
    let pow2 = |e: i32| f64::from_bits(((e + 1023) as u64) << 52);
    while exp > 1000 {
        x *= pow2(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        x *= pow2(-1000);
        exp += 1000;
    }
    x * pow2(exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_decimal() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-13"), Some(-13));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("0"), Some(0));
    }

    #[test]
    fn int_hex_and_octal() {
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("-0x10"), Some(-16));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("0O7"), Some(7));
    }

    #[test]
    fn int_limits() {
        assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int("9223372036854775808"), None);
    }

    #[test]
    fn int_rejects_garbage() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("12a"), None);
        assert_eq!(parse_int("+-5"), None);
        assert_eq!(parse_int("0x"), None);
        assert_eq!(parse_int("0o8"), None);
        assert_eq!(parse_int(" 5"), None);
    }

    #[test]
    fn float_decimal() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("-2.25"), Some(-2.25));
        assert_eq!(parse_float("3"), Some(3.0));
        assert_eq!(parse_float("1e3"), Some(1000.0));
    }

    #[test]
    fn float_hex() {
        assert_eq!(parse_float("0x1.8p+1"), Some(3.0));
        assert_eq!(parse_float("0x1p-2"), Some(0.25));
        assert_eq!(parse_float("-0x1.4p+3"), Some(-10.0));
        assert_eq!(parse_float("0x0p+0"), Some(0.0));
        assert_eq!(parse_float("0x1.999999999999ap-4"), Some(0.1));
    }

    #[test]
    fn float_hex_long_mantissa_rounds_to_nearest() {
        let bits = |t: &str| parse_float(t).map(f64::to_bits);
        // Exactly halfway between 1.0 and the next float: ties to even.
        assert_eq!(bits("0x1.00000000000008p0"), Some(0x3ff0000000000000));
        assert_eq!(bits("0x1.0000000000000800000000p0"), Some(0x3ff0000000000000));
        // Any non-zero digit past the halfway point rounds up.
        assert_eq!(bits("0x1.00000000000008000000001p0"), Some(0x3ff0000000000001));
        assert_eq!(bits("0x1000000000000080001p-72"), Some(0x3ff0000000000001));
    }

    #[test]
    fn escapes_decode() {
        assert_eq!(decode_escapes("a\\032b").as_deref(), Some("a b"));
        assert_eq!(decode_escapes("\\010").as_deref(), Some("\n"));
        assert_eq!(decode_escapes("\\035\\092").as_deref(), Some("#\\"));
        assert_eq!(decode_escapes("\\000").as_deref(), Some("\0"));
        assert_eq!(decode_escapes("").as_deref(), Some(""));
        // A decoded backslash is not read again as the start of an escape.
        assert_eq!(decode_escapes("\\092032").as_deref(), Some("\\032"));
    }

    #[test]
    fn escapes_reject_bad_sequences() {
        for text in ["\\033", "\\999", "\\12", "tail\\", "\\abc", "\\1a2", "\\-12", "\\ž12"] {
            assert_eq!(decode_escapes(text), None, "{text}");
        }
    }

    #[test]
    fn escapes_encode_for_source_notation() {
        assert_eq!(encode_escapes("a b#c\\d\n"), "a\\032b\\035c\\092d\\010");
        assert_eq!(encode_escapes("žluť"), "žluť");
        assert_eq!(decode_escapes(&encode_escapes("x \\ y")).as_deref(), Some("x \\ y"));
    }

    #[test]
    fn float_rejects_garbage() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("0xp+1"), None);
        assert_eq!(parse_float("0x1p"), None);
        assert_eq!(parse_float("--1.0"), None);
    }

    #[test]
    fn format_matches_printf_a() {
        assert_eq!(format_float(1.5), "0x1.8p+0");
        assert_eq!(format_float(3.0), "0x1.8p+1");
        assert_eq!(format_float(1.0), "0x1p+0");
        assert_eq!(format_float(0.1), "0x1.999999999999ap-4");
        assert_eq!(format_float(-0.25), "-0x1p-2");
        assert_eq!(format_float(0.0), "0x0p+0");
        assert_eq!(format_float(-0.0), "-0x0p+0");
    }

    #[test]
    fn format_subnormal_and_special() {
        assert_eq!(format_float(f64::from_bits(1)), "0x0.0000000000001p-1022");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn format_then_parse_is_exact() {
        for v in [1.5, -3.75, 0.1, 1e300, 5e-320, 123456.789] {
            assert_eq!(parse_float(&format_float(v)), Some(v), "value {v}");
        }
    }

    #[test]
    fn bool_literals() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("TRUE"), None);
        assert_eq!(parse_bool(""), None);
    }
}
