//! Components relating to the operands and instructions
//! that a single LC-3 instruction word can hold.
//!
//! These components together are used to construct [`instr::Instr`],
//! the structured form of one instruction, which sits between the
//! binary and the textual representation of that instruction.
//!
//! The field layout of each instruction is catalogued in [`format`].

pub mod format;
pub mod instr;

use std::fmt::Write as _;
use std::num::TryFromIntError;
use offset_base::OffsetBacking;

/// A register. Must be between 0 and 7.
///
/// This `Reg` struct can either be constructed by selecting a register from [`reg_consts`],
/// or by using [`Reg::try_from`].
///
/// ## Examples
///
/// ```text
/// AND R0, R0, #0
///     ~~  ~~
/// ADD R1, R1, R0
///     ~~  ~~  ~~
/// NOT R1, R2
///     ~~  ~~
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Reg(pub(crate) u8);

/// Register constants!
pub mod reg_consts {
    use super::Reg;

    /// The 0th register in the register file.
    pub const R0: Reg = Reg(0);
    /// The 1st register in the register file.
    pub const R1: Reg = Reg(1);
    /// The 2nd register in the register file.
    pub const R2: Reg = Reg(2);
    /// The 3rd register in the register file.
    pub const R3: Reg = Reg(3);
    /// The 4th register in the register file.
    pub const R4: Reg = Reg(4);
    /// The 5th register in the register file.
    pub const R5: Reg = Reg(5);
    /// The 6th register in the register file.
    pub const R6: Reg = Reg(6);
    /// The 7th register in the register file.
    ///
    /// `JMP R7` is spelled `RET`.
    pub const R7: Reg = Reg(7);
}
impl Reg {
    /// Gets the register number of this [`Reg`]. This is always between 0 and 7.
    pub fn reg_no(self) -> u8 {
        self.0
    }

    /// Creates a register from the low 3 bits of a field value.
    pub(crate) fn from_field(bits: u16) -> Self {
        Reg((bits & 0b111) as u8)
    }
}
impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // padding should have no effect here
        write!(f, "R{}", self.0)
    }
}
impl From<Reg> for u16 {
    fn from(value: Reg) -> Self {
        u16::from(value.0)
    }
}
impl TryFrom<u8> for Reg {
    type Error = TryFromIntError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=7 => Ok(Reg(value)),
            // HACKy, but there's no other way to create this error
            _     => u8::try_from(256).map(|_| unreachable!("should've been TryFromIntError")),
        }
    }
}

/// A condition code (used for `BR`), must be between 0 and 7.
///
/// The condition codes are listed below:
///
/// | instruction        | code (bin) |
/// |--------------------|------------|
/// | `BRn`              | `100`      |
/// | `BRz`              | `010`      |
/// | `BRnz`             | `110`      |
/// | `BRp`              | `001`      |
/// | `BRnp`             | `101`      |
/// | `BRzp`             | `011`      |
/// | `BR`, `BRnzp`      | `111`      |
///
/// A code of `000` never branches on real hardware, but it is
/// displayed as `BRnzp`, the same as `111`.
pub type CondCode = u8;

/// Writes the `nzp` suffix of a condition code.
pub(crate) fn write_cond_code(f: &mut impl std::fmt::Write, cc: CondCode) -> std::fmt::Result {
    if cc & 0b111 == 0 {
        return f.write_str("nzp");
    }
    if cc & 0b100 != 0 { f.write_char('n')?; }
    if cc & 0b010 != 0 { f.write_char('z')?; }
    if cc & 0b001 != 0 { f.write_char('p')?; }
    Ok(())
}

/// Sign-extends the low `bits` bits of `value` into an `i16`.
///
/// The result is negative exactly when bit `bits - 1` of `value` is set,
/// and its low `bits` bits always equal those of `value`.
///
/// # Examples
///
/// ```
/// # use lc3_codec::ast::sign_extend;
/// #
/// assert_eq!(sign_extend(0b00001, 5),   1);
/// assert_eq!(sign_extend(0b11111, 5),  -1);
/// assert_eq!(sign_extend(0b10000, 5), -16);
/// assert_eq!(sign_extend(0x1FC,   9),  -4);
/// ```
///
/// # Panics
///
/// This will panic if `bits` is 0 or larger than 16.
pub fn sign_extend(value: u16, bits: u32) -> i16 {
    assert!((1..=16).contains(&bits), "cannot sign-extend a {bits}-bit field");
    (value as i16).truncate(bits)
}

/// A value representing a signed offset or a signed immediate value.
///
/// `N` indicates the maximum bit size of this offset/immediate value.
///
/// ## Examples
///
/// `IOffset<5>` is used to represent `ADD`/`AND`'s imm5 operand:
///
/// ```text
/// AND R0, R0, #0
///             ~~
/// ADD R1, R1, #1
///             ~~
/// ```
///
/// They are also used for PC and base register offsets:
/// ```text
/// BR #-4
///    ~~~
/// JSR #99
///     ~~~
/// LD R0, #10
///        ~~~
/// LDR R0, R0, #9
///             ~~
/// ```
pub type IOffset<const N: u32> = Offset<i16, N>;
/// An unsigned 8-bit trap vector (used for `TRAP`).
///
/// ## Examples
///
/// ```text
/// TRAP x25
///      ~~~
/// ```
pub type TrapVect8 = Offset<u16, 8>;

/// A value representing either an immediate value or a register.
///
/// This is used to handle cases where an operand can be either
/// an immediate value or a register (e.g., in `AND`, `ADD`, or `JSR`/`JSRR`).
///
/// ## Examples
/// ```text
/// AND R0, R0, #0
/// AND R1, R1, R1
/// ADD R2, R2, #2
/// ADD R3, R3, R3
///             ^^
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ImmOrReg<const N: u32> {
    #[allow(missing_docs)]
    Imm(IOffset<N>),
    #[allow(missing_docs)]
    Reg(Reg)
}
impl<const N: u32> std::fmt::Display for ImmOrReg<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImmOrReg::Imm(imm) => imm.fmt(f),
            ImmOrReg::Reg(reg) => reg.fmt(f),
        }
    }
}

/// A value representing an offset or an immediate value.
///
/// The `OFF` type represents the backing type of this offset.
/// The signedness of this offset type is dependent on the signedness of the `OFF` type:
/// - `Offset<i16, _>`: signed offset (also aliased as [`IOffset`])
/// - `Offset<u16, _>`: unsigned offset
///
/// `N` indicates the bit size of the instruction field this value is stored in.
/// An `Offset` always fits its field: [`Offset::new`] rejects values that do not,
/// and [`Offset::new_trunc`] discards the bits that do not.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Offset<OFF, const N: u32>(OFF);

impl<OFF: std::fmt::Display, const N: u32> std::fmt::Display for Offset<OFF, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('#')?;
        self.0.fmt(f)
    }
}
impl<OFF: std::fmt::UpperHex, const N: u32> std::fmt::UpperHex for Offset<OFF, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('x')?;
        self.0.fmt(f)
    }
}

/// Errors that can result from trying to create an [`Offset`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OffsetNewErr {
    /// The provided offset cannot fit an unsigned integer of the given bitsize.
    CannotFitUnsigned(u32),
    /// The provided offset cannot fit a signed integer of the given bitsize.
    CannotFitSigned(u32)
}

impl std::fmt::Display for OffsetNewErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OffsetNewErr::CannotFitUnsigned(n) => write!(f, "value is too big for unsigned {n}-bit field"),
            OffsetNewErr::CannotFitSigned(n) => write!(f, "value is too big for signed {n}-bit field"),
        }
    }
}
impl std::error::Error for OffsetNewErr {}
impl crate::err::Error for OffsetNewErr {
    fn help(&self) -> Option<std::borrow::Cow<'_, str>> {
        let range = match *self {
            OffsetNewErr::CannotFitUnsigned(n) => format!("the range for an unsigned {n}-bit field is [0, {}]", (1i32 << n) - 1),
            OffsetNewErr::CannotFitSigned(n) => format!("the range for a signed {n}-bit field is [{}, {}]", -(1i32 << (n - 1)), (1i32 << (n - 1)) - 1),
        };

        Some(range.into())
    }
}

mod offset_base {
    use super::OffsetNewErr;

    /// Any type that could store a value for [`Offset`].
    ///
    /// [`Offset`]: super::Offset
    pub trait OffsetBacking: Copy + Eq {
        /// How many bits are contained within this backing.
        ///
        /// For example, `u16` has 16 bits and thus BITS == 16.
        const BITS: u32;

        /// Truncates the given value to the provided `bit_size`,
        /// sign-extending if the backing is signed and zero-extending otherwise.
        ///
        /// This bit size is always known to be at most BITS.
        fn truncate(self, bit_size: u32) -> Self;

        /// The raw bit pattern of this value.
        fn to_bits(self) -> u16;

        /// The error to raise if a given value doesn't match
        /// its provided value when truncated to a given `bit_size`.
        fn does_not_fit_error(bit_size: u32) -> OffsetNewErr;
    }

    macro_rules! impl_offset_backing_for_ints {
        ($($Int:ty: $Err:ident),*) => {
            $(
                impl OffsetBacking for $Int {
                    const BITS: u32 = Self::BITS;

                    fn does_not_fit_error(bit_size: u32) -> OffsetNewErr {
                        OffsetNewErr::$Err(bit_size)
                    }

                    fn truncate(self, bit_size: u32) -> Self {
                        (self << (Self::BITS - bit_size)) >> (Self::BITS - bit_size)
                    }

                    fn to_bits(self) -> u16 {
                        self as u16
                    }
                }
            )*
        }
    }
    impl_offset_backing_for_ints! {
        u16: CannotFitUnsigned,
        i16: CannotFitSigned
    }
}

impl<OFF: OffsetBacking, const N: u32> Offset<OFF, N> {
    /// Creates a new offset, failing if the value does not fit in `N` bits.
    ///
    /// Parsing assembly text truncates instead (see [`Offset::new_trunc`]).
    /// This is for building an instruction's operands directly.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lc3_codec::ast::{Offset, OffsetNewErr};
    /// #
    /// // Signed:
    /// assert_eq!(Offset::<i16, 5>::new(15).map(|o| o.get()), Ok(15));
    /// assert_eq!(Offset::<i16, 5>::new(-16).map(|o| o.get()), Ok(-16));
    /// assert_eq!(Offset::<i16, 5>::new(16), Err(OffsetNewErr::CannotFitSigned(5)));
    ///
    /// // Unsigned:
    /// assert_eq!(Offset::<u16, 8>::new(0xFF).map(|o| o.get()), Ok(0xFF));
    /// assert_eq!(Offset::<u16, 8>::new(0x100), Err(OffsetNewErr::CannotFitUnsigned(8)));
    /// ```
    ///
    /// # Panics
    ///
    /// This will panic if `N` is zero or larger than the offset backing, as with [`Offset::new_trunc`].
    pub fn new(n: OFF) -> Result<Self, OffsetNewErr> {
        let trunc = Self::new_trunc(n);
        match trunc.0 == n {
            true  => Ok(trunc),
            false => Err(OFF::does_not_fit_error(N)),
        }
    }

    /// Creates a new offset by extending the first N bits of the integer,
    /// and discarding the rest.
    ///
    /// The extension is considered sign-extended if the offset's backing is signed,
    /// and zero-extended if the offset's backing is unsigned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lc3_codec::ast::Offset;
    /// #
    /// // Signed:
    /// let neg5 = Offset::<i16, 5>::new_trunc(-5);  // 0b11111111111_11011
    /// let pos15 = Offset::<i16, 5>::new_trunc(15); // 0b00000000000_01111
    /// let pos16 = Offset::<i16, 5>::new_trunc(16); // 0b00000000000_10000
    /// assert_eq!(neg5.get(),   -5); // 0b11011
    /// assert_eq!(pos15.get(),  15); // 0b01111
    /// assert_eq!(pos16.get(), -16); // 0b10000
    ///
    /// // Unsigned:
    /// let pos15 = Offset::<u16, 5>::new_trunc(15); // 0b00000000000_01111
    /// let pos32 = Offset::<u16, 5>::new_trunc(32); // 0b00000000001_00000
    /// assert_eq!(pos15.get(), 15); // 01111
    /// assert_eq!(pos32.get(),  0); // 00000
    /// ```
    ///
    /// # Panics
    ///
    /// This will panic if `N` is zero or larger than the offset backing (e.g., for backing `u16`, larger than 16).
    ///
    /// ```should_panic
    /// # use lc3_codec::ast::Offset;
    /// #
    /// let oh_no = Offset::<i16, 17>::new_trunc(18);
    /// ```
    pub fn new_trunc(n: OFF) -> Self {
        assert!(0 < N && N <= OFF::BITS, "bit size {N} does not fit backing ({})", OFF::BITS);
        Self(n.truncate(N))
    }

    /// Gets the value of the offset.
    pub fn get(&self) -> OFF {
        self.0
    }

    /// Gets the low `N` bits of the offset, as they are stored in an instruction field.
    pub fn field_bits(&self) -> u16 {
        self.0.to_bits() & (u16::MAX >> (16 - N))
    }
}
