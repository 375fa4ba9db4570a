//! The outward callback boundary of the pipeline.
//!
//! Every fact the parser decodes is pushed through one implementation of
//! [`DwarfVisitor`]; the library retains nothing itself. The associated
//! `Context` type is an opaque correlation token: whatever the visitor
//! returns from `start_compilation_unit` or `start_die` is handed back to
//! every callback that logically nests inside that unit or entry, which is
//! how a consumer rebuilds the tree from the flat callback stream.

use crate::core::{CfiEntryInfo, CfiRegister, CfiRule, UnitInfo};

/// Consumer of the decoded debug-information stream.
///
/// Only the four tree-structural methods are required. Everything else
/// defaults to a no-op (or `true` for the call-frame methods, meaning
/// "keep decoding"), so a consumer interested in a single phase stays
/// small.
pub trait DwarfVisitor {
    /// Correlation token for nesting; owned entirely by the visitor.
    type Context: Clone;

    /// A compilation unit begins. The returned context is threaded into
    /// every DIE, attribute and line callback of this unit.
    fn start_compilation_unit(&mut self, unit: &UnitInfo) -> Self::Context;

    /// The unit at `offset` is complete. Called by the orchestrator after
    /// the unit's DIE tree and line program have both been delivered; DIE
    /// pairs close themselves, units do not.
    fn end_compilation_unit(&mut self, context: &Self::Context, offset: u64);

    /// A debugging information entry begins. `parent` is the context of
    /// the enclosing DIE (or of the unit, for the root), and the returned
    /// context becomes the parent of everything until the matching
    /// [`end_die`](Self::end_die).
    fn start_die(
        &mut self,
        parent: &Self::Context,
        parent_offset: u64,
        offset: u64,
        tag: gimli::DwTag,
    ) -> Self::Context;

    /// The DIE that returned `context` has no further attributes or
    /// children.
    fn end_die(&mut self, context: &Self::Context, offset: u64);

    /// Attribute with an unsigned integer value (addresses, flags, sizes,
    /// section offsets).
    fn attr_unsigned(
        &mut self,
        context: &Self::Context,
        die_offset: u64,
        attr: gimli::DwAt,
        value: u64,
    ) {
        let _ = (context, die_offset, attr, value);
    }

    /// Attribute with a signed integer value.
    fn attr_signed(
        &mut self,
        context: &Self::Context,
        die_offset: u64,
        attr: gimli::DwAt,
        value: i64,
    ) {
        let _ = (context, die_offset, attr, value);
    }

    /// Attribute referencing another DIE, as a `.debug_info` byte offset.
    fn attr_reference(
        &mut self,
        context: &Self::Context,
        die_offset: u64,
        attr: gimli::DwAt,
        reference: u64,
    ) {
        let _ = (context, die_offset, attr, reference);
    }

    /// Attribute carrying a raw byte block (location expressions, opaque
    /// constants).
    fn attr_bytes(
        &mut self,
        context: &Self::Context,
        die_offset: u64,
        attr: gimli::DwAt,
        data: &[u8],
    ) {
        let _ = (context, die_offset, attr, data);
    }

    /// Attribute carrying a string, already resolved through the string
    /// sections.
    fn attr_string(
        &mut self,
        context: &Self::Context,
        die_offset: u64,
        attr: gimli::DwAt,
        value: &str,
    ) {
        let _ = (context, die_offset, attr, value);
    }

    /// One include directory of the current unit's line program.
    fn define_directory(&mut self, context: &Self::Context, name: &str, dir_index: u64) {
        let _ = (context, name, dir_index);
    }

    /// One file table entry of the current unit's line program.
    fn define_file(
        &mut self,
        context: &Self::Context,
        name: &str,
        file_index: u64,
        dir_index: u64,
        mod_time: u64,
        length: u64,
    ) {
        let _ = (context, name, file_index, dir_index, mod_time, length);
    }

    /// One row of the decompressed line table. `length` is the number of
    /// machine-code bytes the row covers, derived from the next row in the
    /// same sequence.
    fn add_line(
        &mut self,
        context: &Self::Context,
        address: u64,
        length: u64,
        file_index: u64,
        line: u64,
        column: u64,
    ) {
        let _ = (context, address, length, file_index, line, column);
    }

    /// A call-frame entry begins. Returning `false` skips the entry.
    fn begin_cfi_entry(&mut self, entry: &CfiEntryInfo) -> bool {
        let _ = entry;
        true
    }

    /// One register-recovery rule, effective from `address` to the next
    /// rule for the same register (or the end of the entry). Returning
    /// `false` aborts the current entry's decode.
    fn add_cfi_rule(&mut self, address: u64, register: CfiRegister, rule: &CfiRule<'_>) -> bool {
        let _ = (address, register, rule);
        true
    }

    /// The current call-frame entry is complete. Returning `false` stops
    /// nothing further for this entry but is propagated for symmetry with
    /// the other two.
    fn end_cfi_entry(&mut self) -> bool {
        true
    }

    /// One `.debug_loc` entry. `is_first` marks the first entry after a
    /// list terminator. An all-ones `low_pc` marks an absolute-address
    /// entry: the address sits in `high_pc` and `expr` is empty.
    fn add_loc_list_entry(
        &mut self,
        offset: u64,
        is_first: bool,
        low_pc: u64,
        high_pc: u64,
        expr: &[u8],
    ) {
        let _ = (offset, is_first, low_pc, high_pc, expr);
    }

    /// One `.debug_ranges` entry. `list_offset` identifies the list the
    /// entry belongs to (the byte offset where the list started), and
    /// `base_address` is the list's running base —
    /// [`BASE_ADDRESS_UNSET`](crate::core::BASE_ADDRESS_UNSET) when no
    /// base-address-selection entry has been seen.
    fn add_range_list_entry(
        &mut self,
        list_offset: u64,
        base_address: u64,
        low_pc: u64,
        high_pc: u64,
    ) {
        let _ = (list_offset, base_address, low_pc, high_pc);
    }
}
