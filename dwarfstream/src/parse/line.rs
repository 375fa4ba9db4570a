//! `.debug_line` adapter
//!
//! Decodes one unit's line-number program and forwards the directory and
//! file tables followed by the decompressed rows, all against the owning
//! unit's context. Row lengths are the address delta to the next row of
//! the same sequence; the end-of-sequence marker row closes the last real
//! row and is not itself forwarded.

use gimli::{AttributeValue, ColumnType, DebugLine, DebugLineStr, DebugStr, EndianSlice, RunTimeEndian};

use crate::core::{section_names, Result};
use crate::elf::SectionMap;
use crate::parse::info::LineRefs;
use crate::visit::DwarfVisitor;

type Slice<'data> = EndianSlice<'data, RunTimeEndian>;

pub(crate) struct LineParser<'data> {
    debug_line: DebugLine<Slice<'data>>,
    debug_str: DebugStr<Slice<'data>>,
    debug_line_str: DebugLineStr<Slice<'data>>,
    present: bool,
}

impl<'data> LineParser<'data> {
    pub(crate) fn new(sections: &SectionMap<'data>) -> LineParser<'data> {
        let endian = sections.endian();
        let data = sections.section(section_names::DEBUG_LINE);
        LineParser {
            debug_line: DebugLine::new(data, endian),
            debug_str: DebugStr::new(sections.section(section_names::DEBUG_STR), endian),
            debug_line_str: DebugLineStr::new(
                sections.section(section_names::DEBUG_LINE_STR),
                endian,
            ),
            present: !data.is_empty(),
        }
    }

    /// Decode the line program `refs` points at, if any.
    pub(crate) fn parse_program<V: DwarfVisitor>(
        &self,
        refs: &LineRefs<'data>,
        address_size: u8,
        context: &V::Context,
        visitor: &mut V,
    ) -> Result<()> {
        let Some(offset) = refs.stmt_list else {
            return Ok(());
        };
        if !self.present {
            return Ok(());
        }

        let program =
            self.debug_line
                .program(offset, address_size, refs.comp_dir, refs.comp_name)?;
        let header = program.header();

        // DWARF 5 numbers directories and files from 0; earlier versions
        // from 1, with slot 0 implicitly the compilation directory/file.
        let index_base = if header.version() >= 5 { 0 } else { 1 };

        for (index, dir) in header.include_directories().iter().enumerate() {
            if let Some(name) = self.resolve_string(dir) {
                visitor.define_directory(
                    context,
                    &name.to_string_lossy(),
                    index as u64 + index_base,
                );
            }
        }
        for (index, file) in header.file_names().iter().enumerate() {
            if let Some(name) = self.resolve_string(&file.path_name()) {
                visitor.define_file(
                    context,
                    &name.to_string_lossy(),
                    index as u64 + index_base,
                    file.directory_index(),
                    file.timestamp(),
                    file.size(),
                );
            }
        }

        let mut rows = program.rows();
        let mut pending: Option<PendingRow> = None;
        while let Some((_, row)) = rows.next_row()? {
            let address = row.address();
            if let Some(prev) = pending.take() {
                visitor.add_line(
                    context,
                    prev.address,
                    address.saturating_sub(prev.address),
                    prev.file,
                    prev.line,
                    prev.column,
                );
            }
            if row.end_sequence() {
                continue;
            }
            pending = Some(PendingRow {
                address,
                file: row.file_index(),
                line: row.line().map(|l| l.get()).unwrap_or(0),
                column: match row.column() {
                    ColumnType::LeftEdge => 0,
                    ColumnType::Column(column) => column.get(),
                },
            });
        }
        // A sequence the producer never closed: emit with zero length.
        if let Some(prev) = pending {
            visitor.add_line(context, prev.address, 0, prev.file, prev.line, prev.column);
        }
        Ok(())
    }

    fn resolve_string(&self, value: &AttributeValue<Slice<'data>>) -> Option<Slice<'data>> {
        match value {
            AttributeValue::String(s) => Some(*s),
            AttributeValue::DebugStrRef(offset) => self.debug_str.get_str(*offset).ok(),
            AttributeValue::DebugLineStrRef(offset) => self.debug_line_str.get_str(*offset).ok(),
            _ => None,
        }
    }
}

struct PendingRow {
    address: u64,
    file: u64,
    line: u64,
    column: u64,
}
