//! Pipeline orchestrator
//!
//! [`DwarfParser`] owns the section map for one loaded image and runs the
//! extraction phases in a fixed order: compilation units with their line
//! programs, call-frame information, location lists, range lists. Each
//! phase checks its section and is skipped when the image lacks it.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use gimli::{DebugInfo, Format, UnitSectionOffset};
use tracing::{debug, warn};

use crate::core::{section_names, Result, UnitInfo};
use crate::elf::{ElfObject, SectionMap};
use crate::parse::frame::FrameParser;
use crate::parse::info::InfoParser;
use crate::parse::line::LineParser;
use crate::parse::{loclist, ranges};
use crate::visit::DwarfVisitor;

/// Drives the full extraction of one ELF image into one visitor.
pub struct DwarfParser<'data> {
    sections: SectionMap<'data>,
    path: PathBuf,
}

impl<'data> DwarfParser<'data> {
    /// Build the section map for a loaded image. Fails if `elf` has no
    /// image loaded.
    pub fn new(elf: &'data ElfObject) -> Result<DwarfParser<'data>> {
        let mut sections = SectionMap::new();
        elf.parse(&mut sections)?;
        let path = elf.path().map(Path::to_path_buf).unwrap_or_default();
        Ok(DwarfParser { sections, path })
    }

    /// The section map backing this parser.
    pub fn sections(&self) -> &SectionMap<'data> {
        &self.sections
    }

    /// Run every phase, pushing all decoded facts into `visitor`.
    pub fn populate<V: DwarfVisitor>(&self, visitor: &mut V) -> Result<()> {
        self.parse_units(visitor)
            .with_context(|| format!("decoding compilation units of {}", self.path.display()))?;
        self.parse_frame_info(visitor)
            .with_context(|| format!("decoding call-frame information of {}", self.path.display()))?;
        self.parse_loc_lists(visitor)
            .with_context(|| format!("scanning location lists of {}", self.path.display()))?;
        self.parse_range_lists(visitor)
            .with_context(|| format!("scanning range lists of {}", self.path.display()))?;
        Ok(())
    }

    fn parse_units<V: DwarfVisitor>(&self, visitor: &mut V) -> Result<()> {
        let info_data = self.sections.section(section_names::DEBUG_INFO);
        if info_data.is_empty() {
            debug!(path = %self.path.display(), "no .debug_info, skipping unit decode");
            return Ok(());
        }
        let debug_info = DebugInfo::new(info_data, self.sections.endian());
        let info_parser = InfoParser::new(&self.sections);
        let line_parser = LineParser::new(&self.sections);

        // .debug_info is a flat concatenation of self-delimiting units;
        // the iterator advances by each unit's declared length.
        let mut units = debug_info.units();
        while let Some(header) = units.next()? {
            let unit_offset = match header.offset() {
                UnitSectionOffset::DebugInfoOffset(offset) => offset.0 as u64,
                UnitSectionOffset::DebugTypesOffset(_) => continue,
            };
            let unit = UnitInfo {
                offset: unit_offset,
                address_size: header.address_size(),
                offset_size: match header.format() {
                    Format::Dwarf32 => 4,
                    Format::Dwarf64 => 8,
                },
                length: header.unit_length() as u64,
                version: header.version(),
            };
            let context = visitor.start_compilation_unit(&unit);
            let line_refs = info_parser.walk_unit(&header, &context, unit_offset, visitor)?;
            if let Err(error) =
                line_parser.parse_program(&line_refs, header.address_size(), &context, visitor)
            {
                warn!(%error, unit = unit_offset, "skipping undecodable line program");
            }
            // DIE pairs close themselves as the tree is walked; units are
            // closed here, once the line table has been delivered too.
            visitor.end_compilation_unit(&context, unit_offset);
        }
        Ok(())
    }

    fn parse_frame_info<V: DwarfVisitor>(&self, visitor: &mut V) -> Result<()> {
        match FrameParser::new(&self.sections) {
            Some(frame) => frame.parse(visitor),
            None => {
                debug!(path = %self.path.display(), "no .eh_frame, skipping call-frame decode");
                Ok(())
            }
        }
    }

    fn parse_loc_lists<V: DwarfVisitor>(&self, visitor: &mut V) -> Result<()> {
        let data = self.sections.section(section_names::DEBUG_LOC);
        if data.is_empty() {
            return Ok(());
        }
        loclist::scan(
            data,
            self.sections.endian(),
            self.sections.address_size(),
            visitor,
        )
    }

    fn parse_range_lists<V: DwarfVisitor>(&self, visitor: &mut V) -> Result<()> {
        let data = self.sections.section(section_names::DEBUG_RANGES);
        if data.is_empty() {
            return Ok(());
        }
        ranges::scan(
            data,
            self.sections.endian(),
            self.sections.address_size(),
            visitor,
        )
    }
}

/// Load `path`, build the parser, and run every phase into `visitor`.
pub fn parse_elf<V: DwarfVisitor>(path: impl AsRef<Path>, visitor: &mut V) -> Result<()> {
    let mut elf = ElfObject::new();
    elf.load(path)?;
    let parser = DwarfParser::new(&elf)?;
    parser.populate(visitor)
}
