//! The instruction format catalogue.
//!
//! Every defined opcode owns exactly one [`Format`], which names the opcode's operand syntax
//! and the bit [`Field`]s that the format occupies.
//! Both halves of the codec read field positions out of this module,
//! so the decode and encode paths can never disagree on a layout.
//!
//! ```text
//!  15  12 11  9 8   6 5 4     0
//! [opcode][ DR ][SR1 ][m][imm5 ]   ADD, AND (immediate form)
//! [opcode][ DR ][SR1 ][m]  [SR2]   ADD, AND (register form)
//! [opcode][nzp ][   offset9    ]   BR
//! [opcode][ DR ][   offset9    ]   LD, LDI, LEA, ST, STI
//! [opcode][ DR ][BaseR][offset6]   LDR, STR
//! [opcode][m][    offset11     ]   JSR
//! [opcode][   ][BaseR][        ]   JMP, JSRR
//! [opcode][   ][  trapvect8    ]   TRAP
//! ```

use super::sign_extend;

/// A fixed-position bit field within an instruction word.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Field {
    /// The name of the field, as it appears in operand syntax.
    pub name: &'static str,
    /// The bit index of the field's least significant bit.
    pub shift: u32,
    /// The number of bits in the field.
    pub width: u32,
    /// Whether the field is a two's complement value.
    pub signed: bool,
}
impl Field {
    const fn unsigned(name: &'static str, shift: u32, width: u32) -> Self {
        Field { name, shift, width, signed: false }
    }
    const fn signed(name: &'static str, shift: u32, width: u32) -> Self {
        Field { name, shift, width, signed: true }
    }

    /// The mask of this field, aligned to bit 0.
    pub const fn mask(self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }
    /// The mask of this field, aligned to its position in the word.
    pub const fn word_mask(self) -> u16 {
        self.mask() << self.shift
    }

    /// Reads the raw bits of this field out of a word.
    pub const fn get(self, word: u16) -> u16 {
        (word >> self.shift) & self.mask()
    }
    /// Reads this field out of a word, sign-extending it if the field is signed.
    pub fn get_ext(self, word: u16) -> i16 {
        let raw = self.get(word);
        match self.signed {
            true  => sign_extend(raw, self.width),
            false => raw as i16,
        }
    }
    /// Places a value into this field's position, discarding any bits that do not fit.
    pub const fn put(self, value: u16) -> u16 {
        (value & self.mask()) << self.shift
    }
}

/// Field constants!
///
/// Fields that share a position across formats (e.g., `DR` and `SR` at bits 11-9)
/// are still distinct constants so that each format names its own operands.
pub mod fields {
    use super::Field;

    #[allow(missing_docs)] pub const OPCODE:    Field = Field::unsigned("opcode", 12, 4);
    #[allow(missing_docs)] pub const DR:        Field = Field::unsigned("DR", 9, 3);
    #[allow(missing_docs)] pub const SR:        Field = Field::unsigned("SR", 9, 3);
    #[allow(missing_docs)] pub const SR1:       Field = Field::unsigned("SR1", 6, 3);
    #[allow(missing_docs)] pub const NOT_SR:    Field = Field::unsigned("SR", 6, 3);
    #[allow(missing_docs)] pub const BASE_R:    Field = Field::unsigned("BaseR", 6, 3);
    #[allow(missing_docs)] pub const SR2:       Field = Field::unsigned("SR2", 0, 3);
    #[allow(missing_docs)] pub const IMM_MODE:  Field = Field::unsigned("mode", 5, 1);
    #[allow(missing_docs)] pub const IMM5:      Field = Field::signed("imm5", 0, 5);
    #[allow(missing_docs)] pub const NZP:       Field = Field::unsigned("nzp", 9, 3);
    #[allow(missing_docs)] pub const OFFSET6:   Field = Field::signed("offset6", 0, 6);
    #[allow(missing_docs)] pub const OFFSET9:   Field = Field::signed("offset9", 0, 9);
    #[allow(missing_docs)] pub const JSR_MODE:  Field = Field::unsigned("mode", 11, 1);
    #[allow(missing_docs)] pub const OFFSET11:  Field = Field::signed("offset11", 0, 11);
    #[allow(missing_docs)] pub const NOT_PAD:   Field = Field::unsigned("pad", 0, 6);
    #[allow(missing_docs)] pub const TRAPVECT8: Field = Field::unsigned("trapvect8", 0, 8);
}
use fields::*;

/// An instruction family, identified by the top nibble of an instruction word.
///
/// The nibble `0b1101` is reserved and has no `Opcode`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
#[allow(missing_docs, clippy::upper_case_acronyms)]
pub enum Opcode {
    BR   = 0b0000,
    ADD  = 0b0001,
    LD   = 0b0010,
    ST   = 0b0011,
    JSR  = 0b0100,
    AND  = 0b0101,
    LDR  = 0b0110,
    STR  = 0b0111,
    RTI  = 0b1000,
    NOT  = 0b1001,
    LDI  = 0b1010,
    STI  = 0b1011,
    JMP  = 0b1100,
    LEA  = 0b1110,
    TRAP = 0b1111,
}

/// Lookup from opcode nibble to [`Opcode`].
pub const OPCODE_TABLE: [Option<Opcode>; 16] = [
    Some(Opcode::BR),  Some(Opcode::ADD), Some(Opcode::LD),  Some(Opcode::ST),
    Some(Opcode::JSR), Some(Opcode::AND), Some(Opcode::LDR), Some(Opcode::STR),
    Some(Opcode::RTI), Some(Opcode::NOT), Some(Opcode::LDI), Some(Opcode::STI),
    Some(Opcode::JMP), None,              Some(Opcode::LEA), Some(Opcode::TRAP),
];

/// The shape of one instruction family.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Format {
    /// The opcode this format belongs to.
    pub opcode: Opcode,
    /// The assembly syntax accepted for this format.
    pub syntax: &'static str,
    /// The operand fields of this format, from most to least significant.
    ///
    /// Formats with two layouts (`ADD`/`AND` and `JSR`/`JSRR`) list their immediate layout.
    /// The other layout's fields (`SR2`, `JSRR`'s `BaseR`) sit inside those bits.
    pub fields: &'static [Field],
    /// The minimum number of operands an assembly line needs for this format.
    pub operands: usize,
}

impl Format {
    /// The bits of a word that this format's operand fields cover.
    ///
    /// An encoded instruction never sets an operand bit outside this mask.
    pub fn word_mask(&self) -> u16 {
        self.fields.iter().fold(0, |mask, field| mask | field.word_mask())
    }
}

static FORMATS: [Format; 15] = [
    Format { opcode: Opcode::BR,   syntax: "BR[nzp] offset9",             fields: &[NZP, OFFSET9],                         operands: 1 },
    Format { opcode: Opcode::ADD,  syntax: "ADD DR, SR1, SR2/imm5",       fields: &[DR, SR1, IMM_MODE, IMM5],              operands: 3 },
    Format { opcode: Opcode::LD,   syntax: "LD DR, offset9",              fields: &[DR, OFFSET9],                          operands: 2 },
    Format { opcode: Opcode::ST,   syntax: "ST SR, offset9",              fields: &[SR, OFFSET9],                          operands: 2 },
    Format { opcode: Opcode::JSR,  syntax: "JSR offset11 / JSRR BaseR",   fields: &[JSR_MODE, OFFSET11],                   operands: 1 },
    Format { opcode: Opcode::AND,  syntax: "AND DR, SR1, SR2/imm5",       fields: &[DR, SR1, IMM_MODE, IMM5],              operands: 3 },
    Format { opcode: Opcode::LDR,  syntax: "LDR DR, BaseR, offset6",      fields: &[DR, BASE_R, OFFSET6],                  operands: 3 },
    Format { opcode: Opcode::STR,  syntax: "STR SR, BaseR, offset6",      fields: &[SR, BASE_R, OFFSET6],                  operands: 3 },
    Format { opcode: Opcode::RTI,  syntax: "RTI",                         fields: &[],                                     operands: 0 },
    Format { opcode: Opcode::NOT,  syntax: "NOT DR, SR",                  fields: &[DR, NOT_SR, NOT_PAD],                  operands: 2 },
    Format { opcode: Opcode::LDI,  syntax: "LDI DR, offset9",             fields: &[DR, OFFSET9],                          operands: 2 },
    Format { opcode: Opcode::STI,  syntax: "STI SR, offset9",             fields: &[SR, OFFSET9],                          operands: 2 },
    Format { opcode: Opcode::JMP,  syntax: "JMP BaseR / RET",             fields: &[BASE_R],                               operands: 1 },
    Format { opcode: Opcode::LEA,  syntax: "LEA DR, offset9",             fields: &[DR, OFFSET9],                          operands: 2 },
    Format { opcode: Opcode::TRAP, syntax: "TRAP trapvect8",              fields: &[TRAPVECT8],                            operands: 1 },
];

impl Opcode {
    /// Looks up the opcode for the given nibble (the top 4 bits of a word).
    ///
    /// Returns `None` for the reserved nibble `0b1101`, and for any value above `0b1111`.
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        OPCODE_TABLE.get(usize::from(nibble)).copied().flatten()
    }

    /// The opcode of the given instruction word.
    pub fn of_word(word: u16) -> Option<Self> {
        Self::from_nibble(OPCODE.get(word) as u8)
    }

    /// The nibble of this opcode.
    pub fn nibble(self) -> u8 {
        self as u8
    }

    /// The opcode's bits, placed at the top of an instruction word.
    pub fn word_bits(self) -> u16 {
        OPCODE.put(u16::from(self.nibble()))
    }

    /// The format of this opcode.
    pub fn format(self) -> &'static Format {
        // FORMATS is ordered by nibble, with the reserved nibble skipped.
        let index = match self.nibble() {
            n @ 0..=0b1100 => n,
            n => n - 1,
        };
        &FORMATS[usize::from(index)]
    }

    /// The primary mnemonic of this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::BR   => "BR",
            Opcode::ADD  => "ADD",
            Opcode::LD   => "LD",
            Opcode::ST   => "ST",
            Opcode::JSR  => "JSR",
            Opcode::AND  => "AND",
            Opcode::LDR  => "LDR",
            Opcode::STR  => "STR",
            Opcode::RTI  => "RTI",
            Opcode::NOT  => "NOT",
            Opcode::LDI  => "LDI",
            Opcode::STI  => "STI",
            Opcode::JMP  => "JMP",
            Opcode::LEA  => "LEA",
            Opcode::TRAP => "TRAP",
        }
    }

    /// Iterates over every defined opcode, in nibble order.
    pub fn iter() -> impl Iterator<Item = Opcode> {
        FORMATS.iter().map(|f| f.opcode)
    }
}
impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::fields::{BASE_R, IMM5, OFFSET11, OFFSET9, OPCODE, SR2};
    use super::{Opcode, OPCODE_TABLE};

    #[test]
    fn test_opcode_table() {
        assert_eq!(OPCODE_TABLE.iter().filter(|o| o.is_some()).count(), 15);
        assert_eq!(Opcode::from_nibble(0b1101), None);
        assert_eq!(Opcode::from_nibble(16), None);

        for n in 0..16u8 {
            if let Some(op) = Opcode::from_nibble(n) {
                assert_eq!(op.nibble(), n);
                assert_eq!(op.format().opcode, op, "format table out of order at {op}");
            }
        }
        assert_eq!(Opcode::iter().count(), 15);
    }

    #[test]
    fn test_formats_fit_below_opcode() {
        for op in Opcode::iter() {
            let format = op.format();
            let mut taken = OPCODE.word_mask();

            for field in format.fields {
                assert!(field.shift + field.width <= 12, "{op}: {} leaks into the opcode", field.name);
                assert_eq!(taken & field.word_mask(), 0, "{op}: {} overlaps another field", field.name);
                taken |= field.word_mask();
            }
        }
        // SR2 and JSRR's BaseR are not listed, they live inside the immediate layout's bits
        assert_eq!(SR2.word_mask() & !IMM5.word_mask(), 0);
        assert_eq!(BASE_R.word_mask() & !OFFSET11.word_mask(), 0);
    }

    #[test]
    fn test_format_word_mask() {
        assert_eq!(Opcode::ADD.format().word_mask(), 0x0FFF);
        assert_eq!(Opcode::NOT.format().word_mask(), 0x0FFF);
        assert_eq!(Opcode::JMP.format().word_mask(), 0b000_111_000000);
        assert_eq!(Opcode::TRAP.format().word_mask(), 0x00FF);
        assert_eq!(Opcode::RTI.format().word_mask(), 0);
    }

    #[test]
    fn test_field_get_put() {
        assert_eq!(OPCODE.get(0b1111_0000_0010_0101), 0b1111);
        assert_eq!(OFFSET9.put(0xFFFF), 0x01FF);
        assert_eq!(OFFSET9.get_ext(0x01FC), -4);
        assert_eq!(OFFSET11.get_ext(0x03FF), 1023);
        assert_eq!(OFFSET11.get_ext(0x0400), -1024);
        assert_eq!(Opcode::TRAP.word_bits(), 0xF000);
    }
}
