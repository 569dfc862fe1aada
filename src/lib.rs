//! An LC-3 instruction codec.
//!
//! This translates one LC-3 instruction at a time between its 16-bit binary encoding
//! and its assembly mnemonic form. It is not an assembler (there are no labels or directives)
//! and not a simulator.
//!
//! # Usage
//!
//! The text-to-text functions are the main entry points:
//! ```
//! use lc3_codec::{decode, encode};
//!
//! assert_eq!(decode("0001 001 010 1 00001").unwrap(), "ADD R1, R2, #1");
//! assert_eq!(encode("add r1, r2, #1").unwrap(), "0001001010100001");
//!
//! // Immediates are truncated to their field's width:
//! assert_eq!(encode("ADD R1, R2, #33").unwrap(), "0001001010100001");
//! ```
//!
//! For a structured view of an instruction, words and assembly text can also be converted
//! into an [`Instr`](ast::instr::Instr):
//! ```
//! use lc3_codec::ast::instr::Instr;
//! use lc3_codec::parse::parse_instr;
//!
//! let instr = parse_instr("LDR R1, R6, #-2").unwrap();
//! let word = instr.encode();
//! assert_eq!(word, 0x63BE);
//! assert_eq!(Instr::decode(word).unwrap(), instr);
//! assert_eq!(instr.to_string(), "LDR R1, R6, #-2");
//! ```
//!
//! The [`num`] module holds the fixed-width number conversions (decimal, hex, binary,
//! and two's complement) that go along with reading instruction words.
#![warn(missing_docs)]

pub mod ast;
pub mod codec;
pub mod err;
pub mod num;
pub mod parse;

pub use codec::{decode, encode};
