//! Parsing assembly text into instructions.
//!
//! This module is used to convert a single line of LC-3 assembly
//! (e.g., `ADD R1, R2, #-1`) into an [`Instr`].
//!
//! The line is split into words on whitespace and commas.
//! The first word selects the instruction, and every following word is one operand
//! (see [`lex`] for the tokens each operand may be).
//!
//! Numeric operands are truncated to the width of their instruction field
//! rather than range-checked, so `ADD R0, R0, #16` is accepted and encodes `#-16`.
//! Operands beyond what the instruction needs are ignored.

pub mod lex;

use std::ops::Range;

use crate::ast::format::Opcode;
use crate::ast::instr::Instr;
use crate::ast::{IOffset, ImmOrReg, Reg, TrapVect8};
use crate::err::{EncodeErr, EncodeErrKind, LexErr};
use lex::{Ident, Token};

/// Parses one line of assembly into an instruction.
///
/// # Example
/// ```
/// use lc3_codec::parse::parse_instr;
/// use lc3_codec::ast::instr::Instr;
/// use lc3_codec::ast::reg_consts::R7;
///
/// assert_eq!(parse_instr("ret"), Ok(Instr::JMP(R7)));
/// assert_eq!(parse_instr("ADD R1, R2, #1").unwrap().encode(), 0b0001_001_010_1_00001);
/// assert!(parse_instr("HALT").is_err());
/// ```
pub fn parse_instr(src: &str) -> Result<Instr, EncodeErr> {
    Parser::new(src).parse()
}

/// A word of the line, with its location.
struct Word<'s> {
    text: &'s str,
    span: Range<usize>
}

/// Splits a line into its words (separated by whitespace and commas).
fn split_words(src: &str) -> Vec<Word<'_>> {
    let mut words = vec![];
    let mut start = None;

    for (i, c) in src.char_indices() {
        match (c.is_whitespace() || c == ',', start) {
            (true, Some(s)) => {
                words.push(Word { text: &src[s..i], span: s..i });
                start = None;
            },
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(Word { text: &src[s..], span: s..src.len() });
    }

    words
}

struct Parser<'s> {
    src: &'s str,
    words: Vec<Word<'s>>
}
impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, words: split_words(src) }
    }

    fn parse(&self) -> Result<Instr, EncodeErr> {
        let Some(mnemonic) = self.words.first() else {
            return Err(EncodeErr::new(EncodeErrKind::EmptyInput, 0..self.src.len()));
        };
        let ident = match lex::lex_word(mnemonic.text) {
            Ok(Token::Ident(id)) if !matches!(id, Ident::Unknown(_)) => id,
            _ => return Err(EncodeErr::new(EncodeErrKind::UnknownMnemonic, mnemonic.span.clone())),
        };

        let instr = match ident {
            Ident::ADD => {
                self.expect_operands(Opcode::ADD)?;
                Instr::ADD(self.reg(1)?, self.reg(2)?, self.imm_or_reg(3)?)
            },
            Ident::AND => {
                self.expect_operands(Opcode::AND)?;
                Instr::AND(self.reg(1)?, self.reg(2)?, self.imm_or_reg(3)?)
            },
            Ident::BR(cc) => {
                self.expect_operands(Opcode::BR)?;
                Instr::BR(cc, self.imm(1)?)
            },
            Ident::JMP => {
                self.expect_operands(Opcode::JMP)?;
                Instr::JMP(self.reg(1)?)
            },
            Ident::RET => Instr::JMP(crate::ast::reg_consts::R7),
            Ident::JSR => {
                self.expect_operands(Opcode::JSR)?;
                Instr::JSR(ImmOrReg::Imm(self.imm(1)?))
            },
            Ident::JSRR => {
                self.expect_operands(Opcode::JSR)?;
                Instr::JSR(ImmOrReg::Reg(self.reg(1)?))
            },
            Ident::LD => {
                self.expect_operands(Opcode::LD)?;
                Instr::LD(self.reg(1)?, self.imm(2)?)
            },
            Ident::LDI => {
                self.expect_operands(Opcode::LDI)?;
                Instr::LDI(self.reg(1)?, self.imm(2)?)
            },
            Ident::LDR => {
                self.expect_operands(Opcode::LDR)?;
                Instr::LDR(self.reg(1)?, self.reg(2)?, self.imm(3)?)
            },
            Ident::LEA => {
                self.expect_operands(Opcode::LEA)?;
                Instr::LEA(self.reg(1)?, self.imm(2)?)
            },
            Ident::NOT => {
                self.expect_operands(Opcode::NOT)?;
                Instr::NOT(self.reg(1)?, self.reg(2)?)
            },
            Ident::RTI => Instr::RTI,
            Ident::ST => {
                self.expect_operands(Opcode::ST)?;
                Instr::ST(self.reg(1)?, self.imm(2)?)
            },
            Ident::STI => {
                self.expect_operands(Opcode::STI)?;
                Instr::STI(self.reg(1)?, self.imm(2)?)
            },
            Ident::STR => {
                self.expect_operands(Opcode::STR)?;
                Instr::STR(self.reg(1)?, self.reg(2)?, self.imm(3)?)
            },
            Ident::TRAP => {
                self.expect_operands(Opcode::TRAP)?;
                Instr::TRAP(self.trap_vect(1)?)
            },
            Ident::Unknown(_) => unreachable!("unknown identifiers were rejected above"),
        };

        Ok(instr)
    }

    /// Checks that the line has enough operands for the given opcode's format.
    fn expect_operands(&self, opcode: Opcode) -> Result<(), EncodeErr> {
        let expected = opcode.format().operands;
        let found = self.words.len() - 1;

        match found < expected {
            true  => Err(EncodeErr::new(
                EncodeErrKind::MissingOperand { opcode, expected, found },
                self.src.len()..self.src.len()
            )),
            false => Ok(()),
        }
    }

    /// The operand at the given index (the mnemonic is index 0).
    ///
    /// `expect_operands` must be called first.
    fn word(&self, index: usize) -> &Word<'s> {
        &self.words[index]
    }

    fn reg(&self, index: usize) -> Result<Reg, EncodeErr> {
        let word = self.word(index);
        match lex::lex_word(word.text) {
            Ok(Token::Reg(r)) => Ok(Reg(r)),
            Ok(_) => Err(EncodeErr::new(EncodeErrKind::InvalidRegister(LexErr::InvalidReg), word.span.clone())),
            Err(e) => Err(EncodeErr::new(EncodeErrKind::InvalidRegister(e), word.span.clone())),
        }
    }

    fn imm<const N: u32>(&self, index: usize) -> Result<IOffset<N>, EncodeErr> {
        let word = self.word(index);
        match lex::lex_word(word.text) {
            // Only the low N bits are kept, which `as i16` preserves.
            Ok(Token::Int(n)) => Ok(IOffset::new_trunc(n as i16)),
            Ok(_) => Err(EncodeErr::new(EncodeErrKind::InvalidImmediate(LexErr::InvalidNumeric), word.span.clone())),
            Err(e) => Err(EncodeErr::new(EncodeErrKind::InvalidImmediate(e), word.span.clone())),
        }
    }

    /// `ADD`/`AND`'s last operand, which is a register if it starts with `R`.
    fn imm_or_reg<const N: u32>(&self, index: usize) -> Result<ImmOrReg<N>, EncodeErr> {
        match self.word(index).text.starts_with(['R', 'r']) {
            true  => self.reg(index).map(ImmOrReg::Reg),
            false => self.imm(index).map(ImmOrReg::Imm),
        }
    }

    fn trap_vect(&self, index: usize) -> Result<TrapVect8, EncodeErr> {
        let word = self.word(index);
        lex::lex_trap_vect(word.text)
            .map(|n| TrapVect8::new_trunc(n as u16))
            .map_err(|e| EncodeErr::new(EncodeErrKind::InvalidImmediate(e), word.span.clone()))
    }
}
