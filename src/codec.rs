//! Text-to-text translation of single instructions.
//!
//! This is the interface a presentation layer uses:
//! - [`decode`]: binary text (e.g., `0b0001 001 010 000011`) into assembly text (`ADD R1, R2, R3`)
//! - [`encode`]: assembly text into a 16-character binary string
//!
//! Both functions are pure. Every failure is returned as an error and there is no partial output.

use crate::ast::instr::Instr;
use crate::err::{DecodeErr, EncodeErr};
use crate::parse::parse_instr;

/// Reads a word out of its binary text.
///
/// Whitespace anywhere in the text is ignored, and the text may be prefixed with `0b`.
/// Exactly 16 binary digits must remain.
///
/// # Example
/// ```
/// use lc3_codec::codec::parse_word;
/// use lc3_codec::err::DecodeErr;
///
/// assert_eq!(parse_word("0b1111 0000 0010 0101"), Ok(0xF025));
/// assert_eq!(parse_word("1111"), Err(DecodeErr::MalformedWidth(4)));
/// ```
pub fn parse_word(src: &str) -> Result<u16, DecodeErr> {
    let cleaned: String = src.chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let digits = cleaned.strip_prefix("0b").unwrap_or(&cleaned);

    let width = digits.chars().count();
    if width != 16 {
        return Err(DecodeErr::MalformedWidth(width));
    }

    digits.bytes().try_fold(0u16, |word, b| match b {
        b'0' => Ok(word << 1),
        b'1' => Ok((word << 1) | 1),
        _ => Err(DecodeErr::MalformedDigits)
    })
}

/// Formats a word as a zero-padded 16-character binary string (without a `0b` prefix).
pub fn fmt_word(word: u16) -> String {
    format!("{word:016b}")
}

/// Decodes the binary text of an instruction into its assembly text.
///
/// # Example
/// ```
/// use lc3_codec::codec::decode;
///
/// assert_eq!(decode("0001001010000011").unwrap(), "ADD R1, R2, R3");
/// assert_eq!(decode("0b0000 100 000000100").unwrap(), "BRn #4");
/// assert!(decode("1101000000000000").is_err());
/// ```
pub fn decode(src: &str) -> Result<String, DecodeErr> {
    let word = parse_word(src)?;
    Ok(Instr::decode(word)?.to_string())
}

/// Encodes the assembly text of an instruction into its binary text.
///
/// # Example
/// ```
/// use lc3_codec::codec::encode;
///
/// assert_eq!(encode("ADD R1, R2, R3").unwrap(), "0001001010000011");
/// assert_eq!(encode("TRAP x25").unwrap(), "1111000000100101");
/// assert!(encode("HALT").is_err());
/// ```
pub fn encode(src: &str) -> Result<String, EncodeErr> {
    let instr = parse_instr(src)?;
    Ok(fmt_word(instr.encode()))
}
