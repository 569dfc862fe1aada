//! Fixed-width number conversion and arithmetic.
//!
//! This module converts integers between the representations used when reading
//! LC-3 words by hand ([`Repr`]), at a selectable [`BitWidth`]:
//! - [`convert`] reads a number out of text in a given representation,
//! - [`format`] writes a number in a given representation,
//! - [`validate_width`] warns when a number does not fit the bit width.
//!
//! It also provides the fixed-width arithmetic a two's complement machine performs
//! ([`add`], [`subtract`], and [`invert`]). Overflow is reported as a flag
//! next to the result, never as an error.
//!
//! ```
//! use lc3_codec::num::{self, BitWidth, Repr};
//!
//! let a = num::convert("0x7FFF", Repr::Hex, BitWidth::W16).unwrap();
//! let (sum, overflow) = num::add(a, 1, BitWidth::W16);
//! assert_eq!(sum, -32768);
//! assert!(overflow);
//! assert_eq!(num::format(sum, Repr::Hex, BitWidth::W16), "0x8000");
//! ```

/// A textual representation of an integer.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Repr {
    /// Signed decimal (e.g., `-5`).
    Decimal,
    /// Hexadecimal, optionally prefixed with `0x` (e.g., `0xFFFB`).
    ///
    /// Hex values are read as two's complement at the selected bit width.
    Hex,
    /// Unsigned binary, optionally prefixed with `0b` (e.g., `0b1011`).
    Binary,
    /// Two's complement binary, optionally prefixed with `0b` (e.g., `0b1011` is `-5` at 4 bits).
    TwosComplement,
}
impl Repr {
    /// All representations.
    pub const ALL: [Repr; 4] = [Repr::Decimal, Repr::Hex, Repr::Binary, Repr::TwosComplement];
}
impl std::fmt::Display for Repr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repr::Decimal        => f.write_str("Decimal"),
            Repr::Hex            => f.write_str("Hexadecimal"),
            Repr::Binary         => f.write_str("Binary (Unsigned)"),
            Repr::TwosComplement => f.write_str("2's Complement"),
        }
    }
}

/// The bit width numbers are converted at.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum BitWidth {
    #[allow(missing_docs)]
    W8,
    #[allow(missing_docs)]
    #[default]
    W16,
    #[allow(missing_docs)]
    W32,
}
impl BitWidth {
    /// The number of bits.
    pub fn bits(self) -> u32 {
        match self {
            BitWidth::W8  => 8,
            BitWidth::W16 => 16,
            BitWidth::W32 => 32,
        }
    }
    /// A mask of the low `bits` bits.
    pub fn mask(self) -> i64 {
        (1 << self.bits()) - 1
    }
    /// The smallest signed value at this width.
    pub fn min(self) -> i64 {
        -(1 << (self.bits() - 1))
    }
    /// The largest signed value at this width.
    pub fn max(self) -> i64 {
        (1 << (self.bits() - 1)) - 1
    }

    /// Truncates a value to this width and sign-extends it back.
    pub fn sign_extend(self, value: i64) -> i64 {
        let shift = 64 - self.bits();
        (value << shift) >> shift
    }
}

/// Errors that can occur in reading a number.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NumErr {
    /// There were no digits.
    Empty,
    /// There were digits that don't belong to the representation.
    InvalidDigits,
    /// The number does not fit a 64-bit integer.
    TooLarge,
}
impl std::fmt::Display for NumErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumErr::Empty         => f.write_str("no digits"),
            NumErr::InvalidDigits => f.write_str("invalid digits"),
            NumErr::TooLarge      => f.write_str("number too large"),
        }
    }
}
impl std::error::Error for NumErr {}
impl crate::err::Error for NumErr {
    fn help(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            NumErr::Empty         => None,
            NumErr::InvalidDigits => Some("decimal uses 0-9 (and -), hex uses 0-9 and A-F, binary uses 0 and 1".into()),
            NumErr::TooLarge      => Some(format!("the range for a 64-bit signed integer is [{}, {}]", i64::MIN, i64::MAX).into()),
        }
    }
}
impl From<std::num::ParseIntError> for NumErr {
    fn from(value: std::num::ParseIntError) -> Self {
        use std::num::IntErrorKind;

        match value.kind() {
            IntErrorKind::Empty => NumErr::Empty,
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => NumErr::TooLarge,
            _ => NumErr::InvalidDigits,
        }
    }
}

fn clean(src: &str) -> String {
    src.chars().filter(|c| !c.is_whitespace()).collect()
}
fn strip_hex_prefix(src: &str) -> &str {
    src.strip_prefix("0x")
        .or_else(|| src.strip_prefix("0X"))
        .unwrap_or(src)
}
fn strip_bin_prefix(src: &str) -> &str {
    src.strip_prefix("0b").unwrap_or(src)
}

/// Reads a number in the given representation.
///
/// Whitespace is ignored. Hex and two's complement values are
/// sign-extended from `width` bits; decimal and unsigned binary values are not.
///
/// # Examples
/// ```
/// use lc3_codec::num::{convert, BitWidth, Repr};
///
/// assert_eq!(convert("-5", Repr::Decimal, BitWidth::W16), Ok(-5));
/// assert_eq!(convert("0xFFFB", Repr::Hex, BitWidth::W16), Ok(-5));
/// assert_eq!(convert("0xFFFB", Repr::Hex, BitWidth::W32), Ok(0xFFFB));
/// assert_eq!(convert("0b1111 1011", Repr::Binary, BitWidth::W8), Ok(251));
/// assert_eq!(convert("0b1111 1011", Repr::TwosComplement, BitWidth::W8), Ok(-5));
/// ```
pub fn convert(src: &str, repr: Repr, width: BitWidth) -> Result<i64, NumErr> {
    let cleaned = clean(src);

    let value = match repr {
        Repr::Decimal        => cleaned.parse::<i64>()?,
        Repr::Hex            => width.sign_extend(i64::from_str_radix(strip_hex_prefix(&cleaned), 16)?),
        Repr::Binary         => i64::from_str_radix(strip_bin_prefix(&cleaned), 2)?,
        Repr::TwosComplement => width.sign_extend(i64::from_str_radix(strip_bin_prefix(&cleaned), 2)?),
    };

    Ok(value)
}

/// Checks whether the number in the given text fits the bit width,
/// returning a warning message if it does not.
///
/// Text that cannot be read (or is empty) produces no warning.
pub fn validate_width(src: &str, repr: Repr, width: BitWidth) -> Option<String> {
    let cleaned = clean(src);
    let bits = width.bits();

    match repr {
        Repr::Decimal => {
            let value = cleaned.parse::<i64>().ok()?;
            let (min, max) = (width.min(), width.max());
            (!(min..=max).contains(&value))
                .then(|| format!("Value {value} exceeds {bits}-bit range [{min}, {max}]"))
        },
        Repr::Hex => {
            let digits = strip_hex_prefix(&cleaned);
            let needed = digits.chars().count() as u32 * 4;
            (needed > bits)
                .then(|| format!("Input requires {needed} bits but only {bits} bits selected"))
        },
        Repr::Binary | Repr::TwosComplement => {
            let digits = strip_bin_prefix(&cleaned);
            let len = digits.chars().count() as u32;
            (len > bits)
                .then(|| format!("Input has {len} bits but only {bits} bits selected"))
        },
    }
}

/// Writes a number in the given representation.
///
/// Decimal is written as is. Every other representation is written
/// zero-padded to the bit width, after masking the number to that width.
///
/// # Examples
/// ```
/// use lc3_codec::num::{format, BitWidth, Repr};
///
/// assert_eq!(format(-5, Repr::Decimal, BitWidth::W8), "-5");
/// assert_eq!(format(-5, Repr::Hex, BitWidth::W8), "0xFB");
/// assert_eq!(format(-5, Repr::Binary, BitWidth::W8), "0b11111011");
/// assert_eq!(format(10, Repr::TwosComplement, BitWidth::W8), "0b00001010");
/// ```
pub fn format(value: i64, repr: Repr, width: BitWidth) -> String {
    let masked = value & width.mask();
    let bits = width.bits() as usize;

    match repr {
        Repr::Decimal => value.to_string(),
        Repr::Hex => format!("0x{masked:0digits$X}", digits = bits / 4),
        Repr::Binary | Repr::TwosComplement => format!("0b{masked:0bits$b}"),
    }
}

/// Adds two numbers at the given bit width.
///
/// The result wraps around to fit the width (and is sign-extended).
/// The returned flag is set when signed overflow occurred,
/// i.e., both operands had the same sign and the result has the other sign.
pub fn add(a: i64, b: i64, width: BitWidth) -> (i64, bool) {
    let result = width.sign_extend(a.wrapping_add(b));
    let overflow = (a < 0) == (b < 0) && (a < 0) != (result < 0);

    (result, overflow)
}

/// Subtracts two numbers at the given bit width.
///
/// This is addition of the negated second operand; see [`add`].
pub fn subtract(a: i64, b: i64, width: BitWidth) -> (i64, bool) {
    add(a, b.wrapping_neg(), width)
}

/// Inverts every bit of a number at the given bit width.
///
/// The result is unsigned (masked to the width).
pub fn invert(value: i64, width: BitWidth) -> i64 {
    !value & width.mask()
}

#[cfg(test)]
mod tests {
    use super::{add, convert, format, invert, subtract, validate_width, BitWidth, NumErr, Repr};

    #[test]
    fn test_convert() {
        assert_eq!(convert(" 1 234 ", Repr::Decimal, BitWidth::W16), Ok(1234));
        assert_eq!(convert("-32768", Repr::Decimal, BitWidth::W16), Ok(-32768));
        assert_eq!(convert("7F", Repr::Hex, BitWidth::W8), Ok(127));
        assert_eq!(convert("0X80", Repr::Hex, BitWidth::W8), Ok(-128));
        assert_eq!(convert("0x8000", Repr::Hex, BitWidth::W16), Ok(-32768));
        assert_eq!(convert("0xFFFFFFFF", Repr::Hex, BitWidth::W32), Ok(-1));
        assert_eq!(convert("0b1000", Repr::Binary, BitWidth::W8), Ok(8));
        assert_eq!(convert("1111111111111111", Repr::Binary, BitWidth::W16), Ok(65535));
        assert_eq!(convert("1111111111111111", Repr::TwosComplement, BitWidth::W16), Ok(-1));
        assert_eq!(convert("0111111111111111", Repr::TwosComplement, BitWidth::W16), Ok(32767));
    }

    #[test]
    fn test_convert_fail() {
        assert_eq!(convert("", Repr::Decimal, BitWidth::W16), Err(NumErr::Empty));
        assert_eq!(convert("0x", Repr::Hex, BitWidth::W16), Err(NumErr::Empty));
        assert_eq!(convert("12a", Repr::Decimal, BitWidth::W16), Err(NumErr::InvalidDigits));
        assert_eq!(convert("0xG", Repr::Hex, BitWidth::W16), Err(NumErr::InvalidDigits));
        assert_eq!(convert("0b102", Repr::Binary, BitWidth::W16), Err(NumErr::InvalidDigits));
        assert_eq!(convert("99999999999999999999", Repr::Decimal, BitWidth::W32), Err(NumErr::TooLarge));
    }

    #[test]
    fn test_validate_width() {
        assert_eq!(validate_width("127", Repr::Decimal, BitWidth::W8), None);
        assert_eq!(validate_width("-128", Repr::Decimal, BitWidth::W8), None);
        assert_eq!(
            validate_width("128", Repr::Decimal, BitWidth::W8).as_deref(),
            Some("Value 128 exceeds 8-bit range [-128, 127]")
        );
        assert_eq!(validate_width("abc", Repr::Decimal, BitWidth::W8), None);

        assert_eq!(validate_width("0xFF", Repr::Hex, BitWidth::W8), None);
        assert_eq!(
            validate_width("0x1FF", Repr::Hex, BitWidth::W8).as_deref(),
            Some("Input requires 12 bits but only 8 bits selected")
        );
        assert_eq!(validate_width("0x", Repr::Hex, BitWidth::W8), None);

        assert_eq!(validate_width("0b1111 1111", Repr::Binary, BitWidth::W8), None);
        assert_eq!(
            validate_width("0b1 0000 0000", Repr::TwosComplement, BitWidth::W8).as_deref(),
            Some("Input has 9 bits but only 8 bits selected")
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(format(-1, Repr::Hex, BitWidth::W16), "0xFFFF");
        assert_eq!(format(0x25, Repr::Hex, BitWidth::W32), "0x00000025");
        assert_eq!(format(-1, Repr::Binary, BitWidth::W16), "0b1111111111111111");
        assert_eq!(format(5, Repr::TwosComplement, BitWidth::W16), "0b0000000000000101");
        assert_eq!(format(-40000, Repr::Decimal, BitWidth::W16), "-40000");

        for repr in Repr::ALL {
            for width in [BitWidth::W8, BitWidth::W16, BitWidth::W32] {
                let text = format(-3, repr, width);
                let back = convert(&text, repr, width).unwrap();
                let expected = match repr {
                    Repr::Binary => -3 & width.mask(),
                    _ => -3,
                };
                assert_eq!(back, expected, "{repr} at {} bits", width.bits());
            }
        }
    }

    #[test]
    fn test_add_sub() {
        assert_eq!(add(1, 2, BitWidth::W16), (3, false));
        assert_eq!(add(32767, 1, BitWidth::W16), (-32768, true));
        assert_eq!(add(-32768, -1, BitWidth::W16), (32767, true));
        assert_eq!(add(-1, 1, BitWidth::W16), (0, false));
        assert_eq!(add(127, 1, BitWidth::W8), (-128, true));
        assert_eq!(add(i32::MAX as i64, 1, BitWidth::W32), (i32::MIN as i64, true));

        assert_eq!(subtract(5, 7, BitWidth::W16), (-2, false));
        assert_eq!(subtract(-32768, 1, BitWidth::W16), (32767, true));
        assert_eq!(subtract(0, -128, BitWidth::W8), (-128, true));
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert(0, BitWidth::W8), 0xFF);
        assert_eq!(invert(0x0F0F, BitWidth::W16), 0xF0F0);
        assert_eq!(invert(-1, BitWidth::W32), 0);
    }
}
