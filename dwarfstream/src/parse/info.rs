//! `.debug_info` adapter
//!
//! Walks the raw entry stream of one compilation unit (abbreviation =
//! entry start, null entry = end of children) and forwards it through the
//! visitor, recovering parentage with [`ParseState`]. Attribute values are
//! classified into the five attribute callbacks, with string forms
//! resolved through `.debug_str`/`.debug_line_str` first.

use gimli::{
    AttributeValue, DebugAbbrev, DebugLineOffset, DebugLineStr, DebugStr, EndianSlice,
    RunTimeEndian, UnitHeader,
};
use tracing::trace;

use crate::core::{section_names, Result};
use crate::elf::SectionMap;
use crate::parse::state::ParseState;
use crate::visit::DwarfVisitor;

type Slice<'data> = EndianSlice<'data, RunTimeEndian>;

/// References the line phase needs, captured off a unit's root DIE.
pub(crate) struct LineRefs<'data> {
    pub(crate) stmt_list: Option<DebugLineOffset<usize>>,
    pub(crate) comp_dir: Option<Slice<'data>>,
    pub(crate) comp_name: Option<Slice<'data>>,
}

pub(crate) struct InfoParser<'data> {
    debug_abbrev: DebugAbbrev<Slice<'data>>,
    debug_str: DebugStr<Slice<'data>>,
    debug_line_str: DebugLineStr<Slice<'data>>,
}

impl<'data> InfoParser<'data> {
    pub(crate) fn new(sections: &SectionMap<'data>) -> InfoParser<'data> {
        let endian = sections.endian();
        InfoParser {
            debug_abbrev: DebugAbbrev::new(sections.section(section_names::DEBUG_ABBREV), endian),
            debug_str: DebugStr::new(sections.section(section_names::DEBUG_STR), endian),
            debug_line_str: DebugLineStr::new(
                sections.section(section_names::DEBUG_LINE_STR),
                endian,
            ),
        }
    }

    /// Forward one unit's DIE tree. `unit_context` is what the visitor
    /// returned from `start_compilation_unit`; it sits at the bottom of
    /// the ancestry stack so the root DIE's parent is the unit itself.
    pub(crate) fn walk_unit<V: DwarfVisitor>(
        &self,
        header: &UnitHeader<Slice<'data>>,
        unit_context: &V::Context,
        unit_offset: u64,
        visitor: &mut V,
    ) -> Result<LineRefs<'data>> {
        let abbreviations = self.debug_abbrev.abbreviations(header.debug_abbrev_offset())?;
        let mut entries = header.entries_raw(&abbreviations, None)?;
        let mut state: ParseState<V::Context> = ParseState::new();
        state.push(unit_context.clone(), unit_offset);

        let mut line_refs = LineRefs {
            stmt_list: None,
            comp_dir: None,
            comp_name: None,
        };

        while !entries.is_empty() {
            let die_offset = unit_offset + entries.next_offset().0 as u64;
            let Some(abbrev) = entries.read_abbreviation()? else {
                // Null entry: the current nesting level is done.
                if state.depth() > 1 {
                    if let Some((context, offset)) = state.pop() {
                        visitor.end_die(&context, offset);
                    }
                }
                continue;
            };

            let is_root = state.depth() == 1;
            let context = {
                let (parent, parent_offset) = state.top().expect("unit context always present");
                visitor.start_die(parent, parent_offset, die_offset, abbrev.tag())
            };

            for spec in abbrev.attributes() {
                let attribute = entries.read_attribute(*spec)?;
                if is_root {
                    self.capture_line_ref(&attribute, &mut line_refs);
                }
                self.forward_attribute(&attribute, &context, die_offset, unit_offset, visitor);
            }

            if abbrev.has_children() {
                state.push(context, die_offset);
            } else {
                visitor.end_die(&context, die_offset);
            }
        }

        // Close anything a truncated unit left open.
        while state.depth() > 1 {
            if let Some((context, offset)) = state.pop() {
                visitor.end_die(&context, offset);
            }
        }

        Ok(line_refs)
    }

    fn capture_line_ref(&self, attribute: &gimli::Attribute<Slice<'data>>, refs: &mut LineRefs<'data>) {
        match attribute.name() {
            gimli::DW_AT_stmt_list => {
                if let AttributeValue::DebugLineRef(offset) = attribute.value() {
                    refs.stmt_list = Some(offset);
                }
            }
            gimli::DW_AT_comp_dir => refs.comp_dir = self.resolve_string(attribute.value()),
            gimli::DW_AT_name => refs.comp_name = self.resolve_string(attribute.value()),
            _ => {}
        }
    }

    fn resolve_string(&self, value: AttributeValue<Slice<'data>>) -> Option<Slice<'data>> {
        match value {
            AttributeValue::String(s) => Some(s),
            AttributeValue::DebugStrRef(offset) => self.debug_str.get_str(offset).ok(),
            AttributeValue::DebugLineStrRef(offset) => self.debug_line_str.get_str(offset).ok(),
            _ => None,
        }
    }

    fn forward_attribute<V: DwarfVisitor>(
        &self,
        attribute: &gimli::Attribute<Slice<'data>>,
        context: &V::Context,
        die_offset: u64,
        unit_offset: u64,
        visitor: &mut V,
    ) {
        let name = attribute.name();
        match attribute.value() {
            AttributeValue::Addr(value) => {
                visitor.attr_unsigned(context, die_offset, name, value)
            }
            AttributeValue::Data1(value) => {
                visitor.attr_unsigned(context, die_offset, name, value as u64)
            }
            AttributeValue::Data2(value) => {
                visitor.attr_unsigned(context, die_offset, name, value as u64)
            }
            AttributeValue::Data4(value) => {
                visitor.attr_unsigned(context, die_offset, name, value as u64)
            }
            AttributeValue::Data8(value) => {
                visitor.attr_unsigned(context, die_offset, name, value)
            }
            AttributeValue::Udata(value) => {
                visitor.attr_unsigned(context, die_offset, name, value)
            }
            AttributeValue::Flag(value) => {
                visitor.attr_unsigned(context, die_offset, name, value as u64)
            }
            AttributeValue::SecOffset(value) => {
                visitor.attr_unsigned(context, die_offset, name, value as u64)
            }
            AttributeValue::Sdata(value) => visitor.attr_signed(context, die_offset, name, value),
            AttributeValue::UnitRef(offset) => visitor.attr_reference(
                context,
                die_offset,
                name,
                unit_offset + offset.0 as u64,
            ),
            AttributeValue::DebugInfoRef(offset) => {
                visitor.attr_reference(context, die_offset, name, offset.0 as u64)
            }
            AttributeValue::Exprloc(expression) => {
                visitor.attr_bytes(context, die_offset, name, expression.0.slice())
            }
            AttributeValue::Block(block) => {
                visitor.attr_bytes(context, die_offset, name, block.slice())
            }
            AttributeValue::String(s) => {
                visitor.attr_string(context, die_offset, name, &s.to_string_lossy())
            }
            AttributeValue::DebugStrRef(offset) => match self.debug_str.get_str(offset) {
                Ok(s) => visitor.attr_string(context, die_offset, name, &s.to_string_lossy()),
                Err(_) => trace!(?name, offset = offset.0, "unresolvable .debug_str reference"),
            },
            AttributeValue::DebugLineStrRef(offset) => match self.debug_line_str.get_str(offset) {
                Ok(s) => visitor.attr_string(context, die_offset, name, &s.to_string_lossy()),
                Err(_) => {
                    trace!(?name, offset = offset.0, "unresolvable .debug_line_str reference")
                }
            },
            AttributeValue::DebugLineRef(offset) => {
                visitor.attr_unsigned(context, die_offset, name, offset.0 as u64)
            }
            AttributeValue::LocationListsRef(offset) => {
                visitor.attr_unsigned(context, die_offset, name, offset.0 as u64)
            }
            AttributeValue::RangeListsRef(offset) => {
                visitor.attr_unsigned(context, die_offset, name, offset.0 as u64)
            }
            AttributeValue::DebugMacinfoRef(offset) => {
                visitor.attr_unsigned(context, die_offset, name, offset.0 as u64)
            }
            AttributeValue::DebugMacroRef(offset) => {
                visitor.attr_unsigned(context, die_offset, name, offset.0 as u64)
            }
            AttributeValue::DebugTypesRef(signature) => {
                visitor.attr_unsigned(context, die_offset, name, signature.0)
            }
            AttributeValue::FileIndex(value) => {
                visitor.attr_unsigned(context, die_offset, name, value)
            }
            AttributeValue::Encoding(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::DecimalSign(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Endianity(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Accessibility(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Visibility(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Virtuality(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Language(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::AddressClass(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0)
            }
            AttributeValue::IdentifierCase(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::CallingConvention(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Inline(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            AttributeValue::Ordering(value) => {
                visitor.attr_unsigned(context, die_offset, name, value.0 as u64)
            }
            other => trace!(?name, ?other, "attribute form not forwarded"),
        }
    }
}
