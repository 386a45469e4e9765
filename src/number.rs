//! Prefix scanners for numeric values.
//!
//! Values such as `42xyz` are accepted as `42`: the longest numeric token at the very start of
//! the text is converted and anything after it is ignored. Neither leading whitespace nor a
//! leading `+` is accepted, matching the conventions of C++ `std::from_chars`.

/// A floating-point token found at the start of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FloatToken<'a> {
    pub text: &'a str,
    /// `inf`, `infinity` or `nan`, any case, possibly negated.
    pub special: bool,
}

const SPECIAL_LITERALS: [&str; 3] = ["infinity", "inf", "nan"];

/// Returns the base-10 integer token at the start of `text`, if any.
///
/// A leading `-` only counts when `signed` is set.
pub(crate) fn integer_prefix(text: &str, signed: bool) -> Option<&str> {
    let bytes = text.as_bytes();
    let sign = usize::from(signed && bytes.first() == Some(&b'-'));
    let digits = count_digits(&bytes[sign..]);

    (digits > 0).then(|| &text[..sign + digits])
}

/// Returns the decimal floating-point token at the start of `text`, if any.
///
/// Accepted shapes are `digits[.digits][exponent]`, `.digits[exponent]` and the special
/// literals. An exponent marker without digits after it is left unconsumed.
pub(crate) fn float_prefix(text: &str) -> Option<FloatToken<'_>> {
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    for literal in SPECIAL_LITERALS {
        let candidate = &bytes[end..];
        if candidate
            .get(..literal.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(literal.as_bytes()))
        {
            return Some(FloatToken {
                text: &text[..end + literal.len()],
                special: true,
            });
        }
    }

    let integral = count_digits(&bytes[end..]);
    end += integral;

    let mut fractional = 0;
    if bytes.get(end) == Some(&b'.') {
        fractional = count_digits(&bytes[end + 1..]);
        if integral + fractional > 0 {
            end += 1 + fractional;
        }
    }

    if integral + fractional == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }

        let digits = count_digits(&bytes[exponent..]);
        if digits > 0 {
            end = exponent + digits;
        }
    }

    Some(FloatToken {
        text: &text[..end],
        special: false,
    })
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
