//! Error interface for this crate.
//!
//! This module holds the errors that can occur in translating an instruction
//! in either direction:
//! - [`DecodeErr`]: a word (or its binary text) could not be decoded
//! - [`EncodeErr`]: assembly text could not be encoded
//! - [`LexErr`]: a single operand could not be tokenized
//! - [`OffsetNewErr`]: an operand value does not fit its instruction field
//!
//! Every error also implements this module's [`Error`] trait, which can be used
//! to obtain a hint on how to fix the input.

use std::borrow::Cow;
use std::ops::Range;

use crate::ast::format::Opcode;

pub use crate::ast::OffsetNewErr;
pub use crate::num::NumErr;
pub use crate::parse::lex::LexErr;

/// Unified error interface for all errors in this crate.
///
/// Note that the [`Display`] implementation is used for a brief message,
/// where as [`Error::help`] is used for any clarifying messages.
///
/// [`Display`]: std::fmt::Display
pub trait Error: std::error::Error {
    /// The range of the input text where this error occurs (if there is one).
    fn span(&self) -> Option<Range<usize>> {
        None
    }

    /// A clarifying message to help aid someone in how to fix the message.
    fn help(&self) -> Option<Cow<'_, str>>;
}

/// Any error that can occur in decoding an instruction word.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DecodeErr {
    /// Input did not have exactly 16 digits (the number of digits is stored).
    MalformedWidth(usize),
    /// Input had 16 digits, but not all of them were `0` or `1`.
    MalformedDigits,
    /// Word's opcode does not correspond to any instruction (the opcode nibble is stored).
    UnknownOpcode(u8),
}
impl std::fmt::Display for DecodeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErr::MalformedWidth(n)  => write!(f, "expected 16 binary digits, found {n}"),
            DecodeErr::MalformedDigits    => f.write_str("instruction contains non-binary digits"),
            DecodeErr::UnknownOpcode(op)  => write!(f, "unknown opcode {op:04b}"),
        }
    }
}
impl std::error::Error for DecodeErr {}
impl Error for DecodeErr {
    fn help(&self) -> Option<Cow<'_, str>> {
        match self {
            DecodeErr::MalformedWidth(_)  => Some("an instruction is exactly 16 bits (e.g., 0001 001 010 000011), optionally prefixed by 0b".into()),
            DecodeErr::MalformedDigits    => Some("binary digits can only be 0 or 1".into()),
            DecodeErr::UnknownOpcode(_)   => Some("opcode 1101 is reserved and does not have an instruction".into()),
        }
    }
}

/// Kinds of errors that can occur from encoding an assembly instruction.
///
/// See [`EncodeErr`] for this error type with span information included.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum EncodeErrKind {
    /// Input had no tokens.
    EmptyInput,
    /// First token is not an instruction.
    UnknownMnemonic,
    /// Instruction had fewer operands than its format needs.
    MissingOperand {
        /// The instruction's opcode.
        opcode: Opcode,
        /// The number of operands the instruction needs.
        expected: usize,
        /// The number of operands provided.
        found: usize,
    },
    /// Operand was expected to be a register, but could not be parsed as one.
    InvalidRegister(LexErr),
    /// Operand was expected to be an immediate, but could not be parsed as one.
    InvalidImmediate(LexErr),
}
impl std::fmt::Display for EncodeErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput          => f.write_str("no instruction provided"),
            Self::UnknownMnemonic     => f.write_str("unknown instruction"),
            Self::MissingOperand { opcode, expected, found } => write!(f, "{opcode} expected {expected} operand(s), found {found}"),
            Self::InvalidRegister(e)  => write!(f, "invalid register: {e}"),
            Self::InvalidImmediate(e) => write!(f, "invalid immediate: {e}"),
        }
    }
}

/// Error from encoding an assembly instruction.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct EncodeErr {
    /// The kind of error.
    pub kind: EncodeErrKind,
    /// The span in the input text associated with this error.
    pub span: Range<usize>
}
impl EncodeErr {
    /// Creates a new [`EncodeErr`].
    pub fn new(kind: EncodeErrKind, span: Range<usize>) -> Self {
        EncodeErr { kind, span }
    }
}
impl std::fmt::Display for EncodeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}
impl std::error::Error for EncodeErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EncodeErrKind::InvalidRegister(e)  => Some(e),
            EncodeErrKind::InvalidImmediate(e) => Some(e),
            _ => None
        }
    }
}
impl Error for EncodeErr {
    fn span(&self) -> Option<Range<usize>> {
        Some(self.span.clone())
    }

    fn help(&self) -> Option<Cow<'_, str>> {
        match &self.kind {
            EncodeErrKind::EmptyInput          => Some("try an instruction such as ADD R1, R2, R3".into()),
            EncodeErrKind::UnknownMnemonic     => {
                let syntaxes: Vec<_> = Opcode::iter()
                    .map(|op| op.format().syntax)
                    .collect();
                Some(format!("instructions are: {}", syntaxes.join("; ")).into())
            },
            EncodeErrKind::MissingOperand { opcode, .. } => Some(format!("the syntax is: {}", opcode.format().syntax).into()),
            EncodeErrKind::InvalidRegister(e)  => e.help(),
            EncodeErrKind::InvalidImmediate(e) => e.help(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::format::Opcode;
    use crate::parse::parse_instr;

    use super::{Error, LexErr};

    #[test]
    fn test_unknown_mnemonic_help() {
        let help = parse_instr("HALT").unwrap_err().help().unwrap().into_owned();
        for op in Opcode::iter() {
            assert!(help.contains(op.format().syntax), "{op} missing from {help:?}");
        }
        assert!(help.contains("RET"));
        assert!(help.contains("JSRR"));
    }

    #[test]
    fn test_help_and_source() {
        use std::error::Error as _;

        let err = parse_instr("ADD R1, R2").unwrap_err();
        assert_eq!(err.help().as_deref(), Some("the syntax is: ADD DR, SR1, SR2/imm5"));
        assert_eq!(err.to_string(), "ADD expected 3 operand(s), found 2");
        assert!(err.source().is_none());

        let err = parse_instr("ADD R1, R2, R8").unwrap_err();
        assert_eq!(err.help().as_deref(), LexErr::InvalidReg.help().as_deref());
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("invalid register"));
    }
}
