//! Tokenizing LC-3 assembly operands.
//!
//! This module holds the tokens that make up one LC-3 assembly instruction ([`Token`]).
//! The parser splits a line into words and tokenizes each word separately
//! with [`lex_word`], so every operand is exactly one token.

use std::num::IntErrorKind;

use logos::{Lexer, Logos};

use crate::ast::{write_cond_code, CondCode};

/// A unit of information in an LC-3 instruction.
#[derive(Debug, Logos, PartialEq, Eq)]
#[logos(skip r"[ \t]+", error = LexErr)]
pub enum Token {
    // Note, these regexes span over tokens that are technically invalid
    // (e.g., 23trst matches for a decimal even though it shouldn't).
    // This is intended.
    // These regexes collect what would be considered one discernable unit
    // and validates it using the validator function.

    /// A numeric value (e.g., `9`, `#14`, `-3`, `#+3`, `x7F`, `#x7F`, `x-7F`)
    #[regex(r"\d\w*", lex_dec)]
    #[regex(r"#\d?\w*", lex_dec)]
    #[regex(r"[+-]\w*", lex_dec)]
    #[regex(r"#[+-]\w*", lex_dec)]
    #[regex(r"[Xx][\dA-Fa-f]\w*", lex_hex)]
    #[regex(r"#[Xx][\dA-Fa-f]\w*", lex_hex)]
    #[regex(r"[Xx][+-]\w*", lex_hex)]
    #[regex(r"#[Xx][+-]\w*", lex_hex)]
    Int(i64),

    /// A register value (i.e., `R0`-`R7`)
    #[regex(r"[Rr]\d+", lex_reg)]
    Reg(u8),

    /// An identifier (e.g., `ADD`, `BRnz`, `RET`).
    ///
    /// This token type is case-insensitive.
    #[regex(r"[A-Za-z_]\w*", |lx| lx.slice().parse::<Ident>().ok())]
    Ident(Ident),
}

macro_rules! ident_enum {
    ($($instr:ident),+) => {
        /// An identifier.
        ///
        /// This is either an instruction mnemonic (e.g. `ADD`, `AND`, `NOT`, `BRnz`)
        /// or an unrecognized word.
        ///
        /// This token type is case insensitive.
        #[derive(Debug, PartialEq, Eq, Clone)]
        #[allow(clippy::upper_case_acronyms)]
        pub enum Ident {
            $(
                #[allow(missing_docs)]
                $instr
            ),+,
            /// `BR` with its condition code.
            ///
            /// Any word starting with `BR` is a `BR`: its condition bits are the
            /// `n`, `z`, and `p` letters found after the `BR`, and a bare `BR` sets all of them.
            BR(CondCode),
            #[allow(missing_docs)]
            Unknown(String)
        }

        impl std::str::FromStr for Ident {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.to_uppercase();
                match &*upper {
                    $(stringify!($instr) => Ok(Self::$instr)),*,
                    _ => match br_cond_code(&upper) {
                        Some(cc) => Ok(Self::BR(cc)),
                        None => Ok(Self::Unknown(s.to_string())),
                    }
                }
            }
        }

        impl std::fmt::Display for Ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$instr => f.write_str(stringify!($instr))),*,
                    Self::BR(cc) => {
                        f.write_str("BR")?;
                        write_cond_code(f, *cc)
                    },
                    Self::Unknown(id) => f.write_str(id)
                }
            }
        }
    };
}
ident_enum! {
    ADD, AND, NOT, JMP, JSR, JSRR, LD, LDI, LDR, LEA,
    ST, STI, STR, TRAP, RET, RTI
}

/// Computes the condition code of an uppercase mnemonic starting with `BR`.
///
/// Each condition bit is set if its letter occurs anywhere after the `BR`
/// (so `BRANCH` is `BRn`, and `BRX` has no bits set).
/// A bare `BR` sets every bit.
fn br_cond_code(upper: &str) -> Option<CondCode> {
    let suffix = upper.strip_prefix("BR")?;
    if suffix.is_empty() {
        return Some(0b111);
    }

    let bit = |letter, mask| match suffix.contains(letter) {
        true  => mask,
        false => 0,
    };
    Some(bit('N', 0b100) | bit('Z', 0b010) | bit('P', 0b001))
}

/// Any errors raised in attempting to tokenize an operand.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum LexErr {
    /// Numeric literal cannot fit within the range of a i64
    DoesNotFitI64,
    /// Hex literal (starting with x) has invalid hex digits
    InvalidHex,
    /// Numeric literal could not be parsed as a decimal literal because it has invalid digits (i.e., not 0-9)
    InvalidNumeric,
    /// Hex literal (starting with x) doesn't have digits after it.
    InvalidHexEmpty,
    /// Numeric literal could not be parsed as a decimal literal because there are no digits in it (it's just # or #-)
    InvalidDecEmpty,
    /// Int parsing failed but the reason why is unknown
    UnknownIntErr,
    /// Token had the format R\d, but \d isn't 0-7, or the token was not a register at all.
    InvalidReg,
    /// An operand had more than one token in it (e.g., `R1$`).
    TrailingInput,
    /// A symbol was used which is not allowed in LC3 assembly
    #[default]
    InvalidSymbol
}
impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::DoesNotFitI64   => f.write_str("numeric token does not fit 64-bit signed integer"),
            LexErr::InvalidHex      => f.write_str("invalid hex literal"),
            LexErr::InvalidNumeric  => f.write_str("invalid decimal literal"),
            LexErr::InvalidHexEmpty => f.write_str("invalid hex literal"),
            LexErr::InvalidDecEmpty => f.write_str("invalid decimal literal"),
            LexErr::UnknownIntErr   => f.write_str("could not parse integer"),
            LexErr::InvalidReg      => f.write_str("invalid register"),
            LexErr::TrailingInput   => f.write_str("unexpected characters after operand"),
            LexErr::InvalidSymbol   => f.write_str("unrecognized symbol"),
        }
    }
}
impl std::error::Error for LexErr {}
impl crate::err::Error for LexErr {
    fn help(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            LexErr::DoesNotFitI64    => Some(format!("the range for a 64-bit signed integer is [{}, {}]", i64::MIN, i64::MAX).into()),
            LexErr::InvalidHex       => Some("a hex literal starts with 'x' and consists of 0-9, A-F".into()),
            LexErr::InvalidNumeric   => Some("a decimal literal only consists of digits 0-9".into()),
            LexErr::InvalidHexEmpty  => Some("there should be hex digits (0-9, A-F) here".into()),
            LexErr::InvalidDecEmpty  => Some("there should be digits (0-9) here".into()),
            LexErr::UnknownIntErr    => None,
            LexErr::InvalidReg       => Some("this must be R0-R7".into()),
            LexErr::TrailingInput    => Some("operands are separated by commas or spaces".into()),
            LexErr::InvalidSymbol    => Some("this char does not occur in any token in LC-3 assembly".into()),
        }
    }
}
/// Helper that converts an int error kind to its corresponding LexErr, based on the provided inputs.
fn convert_int_error(
    e: &std::num::IntErrorKind,
    invalid_digits_err: LexErr,
    empty_err: LexErr,
    src: &str
) -> LexErr {
    match e {
        IntErrorKind::Empty        => empty_err,
        IntErrorKind::InvalidDigit if matches!(src, "-" | "+") => empty_err,
        IntErrorKind::InvalidDigit => invalid_digits_err,
        IntErrorKind::PosOverflow  => LexErr::DoesNotFitI64,
        IntErrorKind::NegOverflow  => LexErr::DoesNotFitI64,
        _ => LexErr::UnknownIntErr,
    }
}
fn lex_dec(lx: &Lexer<'_, Token>) -> Result<i64, LexErr> {
    let string = lx.slice().strip_prefix('#').unwrap_or(lx.slice());

    string.parse::<i64>()
        .map_err(|e| convert_int_error(e.kind(), LexErr::InvalidNumeric, LexErr::InvalidDecEmpty, string))
}
fn lex_hex(lx: &Lexer<'_, Token>) -> Result<i64, LexErr> {
    let string = lx.slice().strip_prefix('#').unwrap_or(lx.slice());
    let Some(hex) = string.strip_prefix(['X', 'x']) else {
        unreachable!("Lexer slice should have contained an X or x");
    };

    parse_hex(hex)
}
fn parse_hex(hex: &str) -> Result<i64, LexErr> {
    i64::from_str_radix(hex, 16)
        .map_err(|e| convert_int_error(e.kind(), LexErr::InvalidHex, LexErr::InvalidHexEmpty, hex))
}
fn lex_reg(lx: &Lexer<'_, Token>) -> Result<u8, LexErr> {
    lx.slice()[1..].parse::<u8>().ok()
        .filter(|&r| r < 8)
        .ok_or(LexErr::InvalidReg)
}

/// Tokenizes a single word (a whitespace- and comma-free part of an instruction).
///
/// The word must consist of exactly one token.
///
/// # Example
/// ```
/// use lc3_codec::parse::lex::{lex_word, Ident, Token};
/// use lc3_codec::err::LexErr;
///
/// assert_eq!(lex_word("brZP"), Ok(Token::Ident(Ident::BR(0b011))));
/// assert_eq!(lex_word("#-16"), Ok(Token::Int(-16)));
/// assert_eq!(lex_word("R8"),   Err(LexErr::InvalidReg));
/// assert_eq!(lex_word("R1$"),  Err(LexErr::TrailingInput));
/// ```
pub fn lex_word(word: &str) -> Result<Token, LexErr> {
    let mut tokens = Token::lexer(word);
    let token = tokens.next().unwrap_or(Err(LexErr::InvalidSymbol))?;

    match tokens.next() {
        None    => Ok(token),
        Some(_) => Err(LexErr::TrailingInput),
    }
}

/// Reads a trap vector, which is always hexadecimal (`x25`, `X25`, and `25` are all `0x25`).
pub fn lex_trap_vect(word: &str) -> Result<i64, LexErr> {
    parse_hex(word.strip_prefix(['X', 'x']).unwrap_or(word))
}
