//! Streaming ELF/DWARF debug-information extraction.
//!
//! The library loads an ELF image ([`ElfObject`]), discovers its sections
//! ([`SectionMap`]), and pushes every decoded debug-information fact —
//! compilation units, DIE trees, attributes, line tables, call-frame
//! rules, location and range lists — through a single [`DwarfVisitor`]
//! implementation. Nothing is retained on this side of the boundary:
//! consumers build whatever model they need from the callback stream.
//!
//! A second, independent piece is the [`vm`] module: an interpreter for
//! DWARF location-expression bytecode against a pluggable [`DwarfVm`]
//! oracle.
//!
//! ```no_run
//! use dwarfstream::{DwarfVisitor, UnitInfo};
//!
//! struct Counter {
//!     dies: usize,
//! }
//!
//! impl DwarfVisitor for Counter {
//!     type Context = u64;
//!
//!     fn start_compilation_unit(&mut self, unit: &UnitInfo) -> u64 {
//!         unit.offset
//!     }
//!     fn end_compilation_unit(&mut self, _context: &u64, _offset: u64) {}
//!     fn start_die(&mut self, _parent: &u64, _po: u64, offset: u64, _tag: gimli::DwTag) -> u64 {
//!         self.dies += 1;
//!         offset
//!     }
//!     fn end_die(&mut self, _context: &u64, _offset: u64) {}
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut counter = Counter { dies: 0 };
//! dwarfstream::parse_elf("a.out", &mut counter)?;
//! println!("{} entries", counter.dies);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod elf;
pub mod parse;
pub mod visit;
pub mod vm;

pub use core::{
    section_names, CfiEntryInfo, CfiRegister, CfiRule, Class, ElfError, Encoding, ObjectKind,
    Result, UnitInfo, VmError, BASE_ADDRESS_UNSET,
};
pub use elf::{ElfObject, ElfVisitor, SectionMap};
pub use parse::{parse_elf, DwarfParser};
pub use visit::DwarfVisitor;
pub use vm::{evaluate, evaluate32, evaluate64, AddressWidth, DwarfVm};

// Constant types consumers see at the visitor boundary.
pub use gimli::{constants, DwAt, DwTag};
