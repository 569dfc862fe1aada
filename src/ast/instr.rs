//! The structured form of a single LC-3 instruction.
//!
//! [`Instr`] is the pivot between the two representations of an instruction:
//! - [`Instr::decode`] and [`Instr::encode`] convert between an `Instr` and its 16-bit word.
//! - [`crate::parse::parse_instr`] and `Instr`'s [`Display`] implementation
//!   convert between an `Instr` and its assembly text.
//!
//! [`Display`]: std::fmt::Display

use crate::err::DecodeErr;

use super::format::fields::*;
use super::format::{Field, Opcode};
use super::{write_cond_code, CondCode, IOffset, ImmOrReg, Reg, TrapVect8};

/// An LC-3 instruction.
///
/// Each variant corresponds to one [`Opcode`]. Operands are stored with the
/// bit width of their instruction field, so every `Instr` encodes to exactly one word.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[allow(clippy::upper_case_acronyms)]
pub enum Instr {
    /// A `BR` instruction: condition code and PC offset.
    BR(CondCode, IOffset<9>),
    /// An `ADD` instruction: `DR`, `SR1`, and either `imm5` or `SR2`.
    ADD(Reg, Reg, ImmOrReg<5>),
    /// An `LD` instruction: `DR` and PC offset.
    LD(Reg, IOffset<9>),
    /// An `ST` instruction: `SR` and PC offset.
    ST(Reg, IOffset<9>),
    /// A `JSR` (offset) or `JSRR` (base register) instruction.
    JSR(ImmOrReg<11>),
    /// An `AND` instruction: `DR`, `SR1`, and either `imm5` or `SR2`.
    AND(Reg, Reg, ImmOrReg<5>),
    /// An `LDR` instruction: `DR`, `BaseR`, and offset.
    LDR(Reg, Reg, IOffset<6>),
    /// A `STR` instruction: `SR`, `BaseR`, and offset.
    STR(Reg, Reg, IOffset<6>),
    /// An `RTI` instruction.
    RTI,
    /// A `NOT` instruction: `DR` and `SR`.
    NOT(Reg, Reg),
    /// An `LDI` instruction: `DR` and PC offset.
    LDI(Reg, IOffset<9>),
    /// An `STI` instruction: `SR` and PC offset.
    STI(Reg, IOffset<9>),
    /// A `JMP` instruction. `JMP R7` is `RET`.
    JMP(Reg),
    /// An `LEA` instruction: `DR` and PC offset.
    LEA(Reg, IOffset<9>),
    /// A `TRAP` instruction.
    TRAP(TrapVect8),
}

fn reg(word: u16, field: Field) -> Reg {
    Reg::from_field(field.get(word))
}
fn offset<const N: u32>(word: u16, field: Field) -> IOffset<N> {
    debug_assert_eq!(field.width, N, "{} is not {N} bits wide", field.name);
    IOffset::new_trunc(field.get_ext(word))
}
fn imm_or_reg5(word: u16) -> ImmOrReg<5> {
    match IMM_MODE.get(word) {
        0 => ImmOrReg::Reg(reg(word, SR2)),
        _ => ImmOrReg::Imm(offset(word, IMM5)),
    }
}
fn put_imm_or_reg5(op: ImmOrReg<5>) -> u16 {
    match op {
        ImmOrReg::Imm(imm) => IMM_MODE.put(1) | IMM5.put(imm.field_bits()),
        ImmOrReg::Reg(sr2) => SR2.put(sr2.into()),
    }
}

impl Instr {
    /// Decodes a word into an instruction.
    ///
    /// Bits that the instruction's format ignores (e.g., the trailing bits of `NOT`)
    /// are discarded, so re-encoding an instruction does not always reproduce the word.
    ///
    /// # Example
    /// ```
    /// use lc3_codec::ast::instr::Instr;
    /// use lc3_codec::ast::reg_consts::R7;
    ///
    /// assert_eq!(Instr::decode(0b1100_000_111_000000), Ok(Instr::JMP(R7)));
    /// assert!(Instr::decode(0b1101_0000_0000_0000).is_err());
    /// ```
    pub fn decode(word: u16) -> Result<Self, DecodeErr> {
        let opcode = Opcode::of_word(word)
            .ok_or_else(|| DecodeErr::UnknownOpcode(OPCODE.get(word) as u8))?;

        let instr = match opcode {
            Opcode::BR   => Instr::BR(NZP.get(word) as CondCode, offset(word, OFFSET9)),
            Opcode::ADD  => Instr::ADD(reg(word, DR), reg(word, SR1), imm_or_reg5(word)),
            Opcode::LD   => Instr::LD(reg(word, DR), offset(word, OFFSET9)),
            Opcode::ST   => Instr::ST(reg(word, SR), offset(word, OFFSET9)),
            Opcode::JSR  => match JSR_MODE.get(word) {
                0 => Instr::JSR(ImmOrReg::Reg(reg(word, BASE_R))),
                _ => Instr::JSR(ImmOrReg::Imm(offset(word, OFFSET11))),
            },
            Opcode::AND  => Instr::AND(reg(word, DR), reg(word, SR1), imm_or_reg5(word)),
            Opcode::LDR  => Instr::LDR(reg(word, DR), reg(word, BASE_R), offset(word, OFFSET6)),
            Opcode::STR  => Instr::STR(reg(word, SR), reg(word, BASE_R), offset(word, OFFSET6)),
            Opcode::RTI  => Instr::RTI,
            Opcode::NOT  => Instr::NOT(reg(word, DR), reg(word, NOT_SR)),
            Opcode::LDI  => Instr::LDI(reg(word, DR), offset(word, OFFSET9)),
            Opcode::STI  => Instr::STI(reg(word, SR), offset(word, OFFSET9)),
            Opcode::JMP  => Instr::JMP(reg(word, BASE_R)),
            Opcode::LEA  => Instr::LEA(reg(word, DR), offset(word, OFFSET9)),
            Opcode::TRAP => Instr::TRAP(TrapVect8::new_trunc(TRAPVECT8.get(word))),
        };

        Ok(instr)
    }

    /// Encodes this instruction into a word.
    ///
    /// # Example
    /// ```
    /// use lc3_codec::ast::instr::Instr;
    /// use lc3_codec::ast::{ImmOrReg, IOffset};
    /// use lc3_codec::ast::reg_consts::{R1, R2};
    ///
    /// let instr = Instr::ADD(R1, R2, ImmOrReg::Imm(IOffset::new_trunc(1)));
    /// assert_eq!(instr.encode(), 0b0001_001_010_1_00001);
    /// ```
    pub fn encode(&self) -> u16 {
        let operands = match *self {
            Instr::BR(cc, off)         => NZP.put(u16::from(cc)) | OFFSET9.put(off.field_bits()),
            Instr::ADD(dr, sr1, op)    => DR.put(dr.into()) | SR1.put(sr1.into()) | put_imm_or_reg5(op),
            Instr::LD(dr, off)         => DR.put(dr.into()) | OFFSET9.put(off.field_bits()),
            Instr::ST(sr, off)         => SR.put(sr.into()) | OFFSET9.put(off.field_bits()),
            Instr::JSR(ImmOrReg::Imm(off)) => JSR_MODE.put(1) | OFFSET11.put(off.field_bits()),
            Instr::JSR(ImmOrReg::Reg(br))  => BASE_R.put(br.into()),
            Instr::AND(dr, sr1, op)    => DR.put(dr.into()) | SR1.put(sr1.into()) | put_imm_or_reg5(op),
            Instr::LDR(dr, br, off)    => DR.put(dr.into()) | BASE_R.put(br.into()) | OFFSET6.put(off.field_bits()),
            Instr::STR(sr, br, off)    => SR.put(sr.into()) | BASE_R.put(br.into()) | OFFSET6.put(off.field_bits()),
            Instr::RTI                 => 0,
            Instr::NOT(dr, sr)         => DR.put(dr.into()) | NOT_SR.put(sr.into()) | NOT_PAD.put(NOT_PAD.mask()),
            Instr::LDI(dr, off)        => DR.put(dr.into()) | OFFSET9.put(off.field_bits()),
            Instr::STI(sr, off)        => SR.put(sr.into()) | OFFSET9.put(off.field_bits()),
            Instr::JMP(br)             => BASE_R.put(br.into()),
            Instr::LEA(dr, off)        => DR.put(dr.into()) | OFFSET9.put(off.field_bits()),
            Instr::TRAP(vect)          => TRAPVECT8.put(vect.field_bits()),
        };

        let opcode = self.opcode();
        debug_assert_eq!(
            operands & !opcode.format().word_mask(), 0,
            "{opcode} set bits outside of its format's fields"
        );
        opcode.word_bits() | operands
    }

    /// The opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instr::BR(..)  => Opcode::BR,
            Instr::ADD(..) => Opcode::ADD,
            Instr::LD(..)  => Opcode::LD,
            Instr::ST(..)  => Opcode::ST,
            Instr::JSR(..) => Opcode::JSR,
            Instr::AND(..) => Opcode::AND,
            Instr::LDR(..) => Opcode::LDR,
            Instr::STR(..) => Opcode::STR,
            Instr::RTI     => Opcode::RTI,
            Instr::NOT(..) => Opcode::NOT,
            Instr::LDI(..) => Opcode::LDI,
            Instr::STI(..) => Opcode::STI,
            Instr::JMP(..) => Opcode::JMP,
            Instr::LEA(..) => Opcode::LEA,
            Instr::TRAP(_) => Opcode::TRAP,
        }
    }
}

impl std::fmt::Display for Instr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BR(cc, off) => {
                f.write_str("BR")?;
                write_cond_code(f, *cc)?;
                write!(f, " {off}")
            },
            Self::ADD(dr, sr1, op) => write!(f, "ADD {dr}, {sr1}, {op}"),
            Self::LD(dr, off) => write!(f, "LD {dr}, {off}"),
            Self::ST(sr, off) => write!(f, "ST {sr}, {off}"),
            Self::JSR(ImmOrReg::Imm(off)) => write!(f, "JSR {off}"),
            Self::JSR(ImmOrReg::Reg(br)) => write!(f, "JSRR {br}"),
            Self::AND(dr, sr1, op) => write!(f, "AND {dr}, {sr1}, {op}"),
            Self::LDR(dr, br, off) => write!(f, "LDR {dr}, {br}, {off}"),
            Self::STR(sr, br, off) => write!(f, "STR {sr}, {br}, {off}"),
            Self::RTI => f.write_str("RTI"),
            Self::NOT(dr, sr) => write!(f, "NOT {dr}, {sr}"),
            Self::LDI(dr, off) => write!(f, "LDI {dr}, {off}"),
            Self::STI(sr, off) => write!(f, "STI {sr}, {off}"),
            Self::JMP(Reg(7)) => f.write_str("RET"),
            Self::JMP(br) => write!(f, "JMP {br}"),
            Self::LEA(dr, off) => write!(f, "LEA {dr}, {off}"),
            Self::TRAP(vect) => write!(f, "TRAP {vect:02X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::format::Opcode;
    use crate::ast::reg_consts::{R0, R1, R2, R3, R5, R6, R7};
    use crate::ast::{IOffset, ImmOrReg, TrapVect8};
    use crate::err::DecodeErr;

    use super::Instr;

    fn imm<const N: u32>(n: i16) -> ImmOrReg<N> {
        ImmOrReg::Imm(IOffset::new_trunc(n))
    }
    fn off<const N: u32>(n: i16) -> IOffset<N> {
        IOffset::new_trunc(n)
    }
    fn assert_decode(word: u16, instr: Instr, text: &str) {
        let decoded = Instr::decode(word).unwrap();
        assert_eq!(decoded, instr, "{word:016b}");
        assert_eq!(decoded.to_string(), text);
    }

    #[test]
    fn test_decode_each_format() {
        assert_decode(0b0001_001_010_0_00_011, Instr::ADD(R1, R2, ImmOrReg::Reg(R3)), "ADD R1, R2, R3");
        assert_decode(0b0001_001_010_1_00001, Instr::ADD(R1, R2, imm(1)), "ADD R1, R2, #1");
        assert_decode(0b0101_000_000_1_00000, Instr::AND(R0, R0, imm(0)), "AND R0, R0, #0");
        assert_decode(0b0101_111_110_1_10000, Instr::AND(R7, R6, imm(-16)), "AND R7, R6, #-16");
        assert_decode(0b0000_100_000000100, Instr::BR(0b100, off(4)), "BRn #4");
        assert_decode(0b0000_010_111111100, Instr::BR(0b010, off(-4)), "BRz #-4");
        assert_decode(0b0000_000_000000001, Instr::BR(0b000, off(1)), "BRnzp #1");
        assert_decode(0b0000_111_000000001, Instr::BR(0b111, off(1)), "BRnzp #1");
        assert_decode(0b1100_000_010_000000, Instr::JMP(R2), "JMP R2");
        assert_decode(0b1100_000_111_000000, Instr::JMP(R7), "RET");
        assert_decode(0b0100_1_10000000000, Instr::JSR(imm(-1024)), "JSR #-1024");
        assert_decode(0b0100_0_00_101_000000, Instr::JSR(ImmOrReg::Reg(R5)), "JSRR R5");
        assert_decode(0b0010_011_000001010, Instr::LD(R3, off(10)), "LD R3, #10");
        assert_decode(0b1010_011_111111111, Instr::LDI(R3, off(-1)), "LDI R3, #-1");
        assert_decode(0b0110_001_110_011111, Instr::LDR(R1, R6, off(31)), "LDR R1, R6, #31");
        assert_decode(0b1110_000_011111111, Instr::LEA(R0, off(255)), "LEA R0, #255");
        assert_decode(0b1001_001_010_111111, Instr::NOT(R1, R2), "NOT R1, R2");
        assert_decode(0b1000_0000_0000_0000, Instr::RTI, "RTI");
        assert_decode(0b0011_111_100000000, Instr::ST(R7, off(-256)), "ST R7, #-256");
        assert_decode(0b1011_010_000000000, Instr::STI(R2, off(0)), "STI R2, #0");
        assert_decode(0b0111_101_110_100000, Instr::STR(R5, R6, off(-32)), "STR R5, R6, #-32");
        assert_decode(0b1111_0000_0010_0101, Instr::TRAP(TrapVect8::new_trunc(0x25)), "TRAP x25");
        assert_decode(0b1111_0000_0000_1010, Instr::TRAP(TrapVect8::new_trunc(0x0A)), "TRAP x0A");
    }

    #[test]
    fn test_decode_ignored_bits() {
        // NOT's trailing bits, JMP's unused bits, ADD's register-form padding, RTI's operand bits
        assert_eq!(Instr::decode(0b1001_001_010_000000), Ok(Instr::NOT(R1, R2)));
        assert_eq!(Instr::decode(0b1100_111_010_111111), Ok(Instr::JMP(R2)));
        assert_eq!(Instr::decode(0b0001_001_010_0_11_011), Ok(Instr::ADD(R1, R2, ImmOrReg::Reg(R3))));
        assert_eq!(Instr::decode(0b1000_1111_1111_1111), Ok(Instr::RTI));
        assert_eq!(Instr::decode(0b1111_1111_0010_0101), Ok(Instr::TRAP(TrapVect8::new_trunc(0x25))));
    }

    #[test]
    fn test_decode_reserved() {
        assert_eq!(Instr::decode(0b1101_0000_0000_0000), Err(DecodeErr::UnknownOpcode(0b1101)));
        assert_eq!(Instr::decode(0xDFFF), Err(DecodeErr::UnknownOpcode(0b1101)));
    }

    #[test]
    fn test_encode_canonical() {
        assert_eq!(Instr::ADD(R1, R2, ImmOrReg::Reg(R3)).encode(), 0b0001_001_010_000_011);
        assert_eq!(Instr::NOT(R1, R2).encode(), 0b1001_001_010_111111);
        assert_eq!(Instr::JMP(R7).encode(), 0b1100_000_111_000000);
        assert_eq!(Instr::RTI.encode(), 0b1000_0000_0000_0000);
        assert_eq!(Instr::JSR(imm(-1)).encode(), 0b0100_1_11111111111);
        assert_eq!(Instr::BR(0b111, off(-1)).encode(), 0b0000_111_111111111);
    }

    #[test]
    fn test_all_words() {
        for word in 0..=u16::MAX {
            let Ok(instr) = Instr::decode(word) else {
                assert_eq!(word >> 12, 0b1101, "only the reserved opcode may fail ({word:016b})");
                continue;
            };

            assert_eq!(instr.opcode(), Opcode::of_word(word).unwrap());

            // Re-encoding drops ignored bits, but never changes meaning:
            let reencoded = instr.encode();
            assert_eq!(reencoded >> 12, word >> 12);
            assert_eq!(Instr::decode(reencoded), Ok(instr), "{word:016b} -> {reencoded:016b}");
            assert_eq!(Instr::decode(reencoded).unwrap().encode(), reencoded);
        }
    }

    #[test]
    fn test_all_words_within_format() {
        for word in 0..=u16::MAX {
            let Ok(instr) = Instr::decode(word) else { continue };
            let format = instr.opcode().format();

            // Encoding only writes the fields the format lists
            let operands = instr.encode() & 0x0FFF;
            assert_eq!(operands & !format.word_mask(), 0, "{instr} ({word:016b})");
            // and decoding only reads them
            let masked = (word & 0xF000) | (word & format.word_mask());
            assert_eq!(Instr::decode(masked), Ok(instr), "{word:016b}");
        }
    }

    #[test]
    fn test_all_words_exact() {
        // Formats with no ignored bits reproduce the word exactly
        let exact = [Opcode::BR, Opcode::LD, Opcode::ST, Opcode::LDR, Opcode::STR, Opcode::LDI, Opcode::STI, Opcode::LEA];
        for word in 0..=u16::MAX {
            let Some(op) = Opcode::of_word(word) else { continue };
            if exact.contains(&op) {
                assert_eq!(Instr::decode(word).unwrap().encode(), word);
            }
        }
    }
}
