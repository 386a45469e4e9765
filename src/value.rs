use crate::number;

/// Conversion from a raw INI value into a typed value.
///
/// Each implementation is one conversion strategy. Returning `None` means the caller's default
/// is used instead. Implementing this trait for your own type without overriding
/// [`FromIniValue::from_ini_value`] selects the unsupported strategy, which always yields the
/// default:
///
/// ```
/// use ini_reader::{FromIniValue, Ini};
///
/// #[derive(Debug, PartialEq)]
/// struct Opaque(u8);
///
/// impl FromIniValue for Opaque {}
///
/// let ini = Ini::parse("key = 3");
/// assert_eq!(ini.read("", "key", Opaque(9)), Opaque(9));
/// ```
pub trait FromIniValue: Sized {
    /// `fold_case` only affects text conversions.
    fn from_ini_value(raw: &str, fold_case: bool) -> Option<Self> {
        _ = (raw, fold_case);
        None
    }
}

impl FromIniValue for bool {
    /// Only the exact, lowercase literals `true`, `1`, `on` and `yes` are true. Everything else is
    /// false, so a boolean conversion never falls back to the default.
    fn from_ini_value(raw: &str, _fold_case: bool) -> Option<Self> {
        Some(matches!(raw, "true" | "1" | "on" | "yes"))
    }
}

impl FromIniValue for char {
    fn from_ini_value(raw: &str, _fold_case: bool) -> Option<Self> {
        raw.chars().next()
    }
}

impl FromIniValue for String {
    fn from_ini_value(raw: &str, fold_case: bool) -> Option<Self> {
        if fold_case && raw.bytes().any(|b| b.is_ascii_uppercase()) {
            Some(raw.to_ascii_lowercase())
        } else {
            Some(raw.to_owned())
        }
    }
}

macro_rules! impl_integer {
    ($signed:literal => $($t:ty),+ $(,)?) => {
        $(
            impl FromIniValue for $t {
                fn from_ini_value(raw: &str, _fold_case: bool) -> Option<Self> {
                    // Overflow is a failed conversion, not a wrap or a clamp.
                    number::integer_prefix(raw, $signed)?.parse().ok()
                }
            }
        )+
    };
}

impl_integer!(true => i8, i16, i32, i64, i128, isize);
impl_integer!(false => u8, u16, u32, u64, u128, usize);

macro_rules! impl_float {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FromIniValue for $t {
                fn from_ini_value(raw: &str, _fold_case: bool) -> Option<Self> {
                    let token = number::float_prefix(raw)?;
                    let value = token.text.parse::<$t>().ok()?;

                    // A finite literal too large for the type is out of range.
                    (token.special || value.is_finite()).then_some(value)
                }
            }
        )+
    };
}

impl_float!(f32, f64);
