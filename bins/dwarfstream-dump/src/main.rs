//! Textual dump of everything the extraction pipeline produces.
//!
//! The canonical consumer of the visitor boundary: it implements
//! `DwarfVisitor` with the DIE offset as its context token and prints the
//! callback stream as an indented tree plus flat tables for lines,
//! call-frame rules and the two list sections.

use anyhow::Result;
use clap::Parser;
use dwarfstream::{
    CfiEntryInfo, CfiRegister, CfiRule, DwarfParser, DwarfVisitor, ElfObject, UnitInfo,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "dwarfstream-dump")]
#[command(about = "Dump the debug-information stream of an ELF file as text")]
struct Cli {
    /// ELF file to dump
    target: PathBuf,

    /// Print the section table before the stream
    #[arg(long)]
    sections: bool,

    /// Skip the DIE tree and attributes
    #[arg(long)]
    no_dies: bool,

    /// Skip the line tables
    #[arg(long)]
    no_lines: bool,

    /// Skip call-frame information
    #[arg(long)]
    no_cfi: bool,

    /// Skip location and range lists
    #[arg(long)]
    no_lists: bool,
}

struct Dump {
    depth: usize,
    no_dies: bool,
    no_lines: bool,
    no_cfi: bool,
    no_lists: bool,
}

impl Dump {
    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl DwarfVisitor for Dump {
    // The context token is simply the entry's own section offset.
    type Context = u64;

    fn start_compilation_unit(&mut self, unit: &UnitInfo) -> u64 {
        println!(
            "unit <0x{:08x}> version {} address_size {} offset_size {} length 0x{:x}",
            unit.offset, unit.version, unit.address_size, unit.offset_size, unit.length
        );
        self.depth = 1;
        unit.offset
    }

    fn end_compilation_unit(&mut self, context: &u64, _offset: u64) {
        println!("end unit <0x{context:08x}>");
        self.depth = 0;
    }

    fn start_die(&mut self, _parent: &u64, _parent_offset: u64, offset: u64, tag: dwarfstream::DwTag) -> u64 {
        if !self.no_dies {
            println!("{}<0x{offset:08x}> {tag}", self.indent());
        }
        self.depth += 1;
        offset
    }

    fn end_die(&mut self, _context: &u64, _offset: u64) {
        self.depth -= 1;
    }

    fn attr_unsigned(&mut self, _context: &u64, _die: u64, attr: dwarfstream::DwAt, value: u64) {
        if !self.no_dies {
            println!("{}{attr} 0x{value:x}", self.indent());
        }
    }

    fn attr_signed(&mut self, _context: &u64, _die: u64, attr: dwarfstream::DwAt, value: i64) {
        if !self.no_dies {
            println!("{}{attr} {value}", self.indent());
        }
    }

    fn attr_reference(&mut self, _context: &u64, _die: u64, attr: dwarfstream::DwAt, reference: u64) {
        if !self.no_dies {
            println!("{}{attr} -> <0x{reference:08x}>", self.indent());
        }
    }

    fn attr_bytes(&mut self, _context: &u64, _die: u64, attr: dwarfstream::DwAt, data: &[u8]) {
        if !self.no_dies {
            let bytes: Vec<String> = data.iter().map(|b| format!("{b:02x}")).collect();
            println!("{}{attr} [{}]", self.indent(), bytes.join(" "));
        }
    }

    fn attr_string(&mut self, _context: &u64, _die: u64, attr: dwarfstream::DwAt, value: &str) {
        if !self.no_dies {
            println!("{}{attr} {value:?}", self.indent());
        }
    }

    fn define_directory(&mut self, _context: &u64, name: &str, dir_index: u64) {
        if !self.no_lines {
            println!("  dir [{dir_index}] {name:?}");
        }
    }

    fn define_file(
        &mut self,
        _context: &u64,
        name: &str,
        file_index: u64,
        dir_index: u64,
        _mod_time: u64,
        _length: u64,
    ) {
        if !self.no_lines {
            println!("  file [{file_index}] dir {dir_index} {name:?}");
        }
    }

    fn add_line(
        &mut self,
        _context: &u64,
        address: u64,
        length: u64,
        file_index: u64,
        line: u64,
        column: u64,
    ) {
        if !self.no_lines {
            println!("  line 0x{address:x}+0x{length:x} file {file_index} line {line} col {column}");
        }
    }

    fn begin_cfi_entry(&mut self, entry: &CfiEntryInfo) -> bool {
        if self.no_cfi {
            return false;
        }
        println!(
            "cfi <0x{:08x}> 0x{:x}..0x{:x} version {} aug {:?} ra {}",
            entry.offset,
            entry.address,
            entry.address + entry.length,
            entry.version,
            entry.augmentation,
            entry.return_address_register
        );
        true
    }

    fn add_cfi_rule(&mut self, address: u64, register: CfiRegister, rule: &CfiRule<'_>) -> bool {
        let target = match register {
            CfiRegister::Cfa => "cfa".to_string(),
            CfiRegister::Reg(r) => format!("r{r}"),
        };
        println!("  rule 0x{address:x} {target} = {rule:?}");
        true
    }

    fn end_cfi_entry(&mut self) -> bool {
        true
    }

    fn add_loc_list_entry(
        &mut self,
        offset: u64,
        is_first: bool,
        low_pc: u64,
        high_pc: u64,
        expr: &[u8],
    ) {
        if !self.no_lists {
            let first = if is_first { " first" } else { "" };
            println!(
                "loc <0x{offset:08x}>{first} 0x{low_pc:x}..0x{high_pc:x} expr {} bytes",
                expr.len()
            );
        }
    }

    fn add_range_list_entry(&mut self, list_offset: u64, base_address: u64, low_pc: u64, high_pc: u64) {
        if !self.no_lists {
            println!(
                "range <0x{list_offset:08x}> base 0x{base_address:x} 0x{low_pc:x}..0x{high_pc:x}"
            );
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut elf = ElfObject::new();
    elf.load(&cli.target)?;
    info!(target = %cli.target.display(), class = ?elf.class(), "loaded");

    let parser = DwarfParser::new(&elf)?;
    if cli.sections {
        for name in [
            dwarfstream::section_names::DEBUG_INFO,
            dwarfstream::section_names::DEBUG_ABBREV,
            dwarfstream::section_names::DEBUG_STR,
            dwarfstream::section_names::DEBUG_LINE,
            dwarfstream::section_names::DEBUG_LOC,
            dwarfstream::section_names::DEBUG_RANGES,
            dwarfstream::section_names::EH_FRAME,
            dwarfstream::section_names::TEXT,
        ] {
            let data = parser.sections().section(name);
            println!(
                "section {name:<14} {:>8} bytes @ 0x{:x}",
                data.len(),
                parser.sections().load_address(name)
            );
        }
    }

    let mut dump = Dump {
        depth: 0,
        no_dies: cli.no_dies,
        no_lines: cli.no_lines,
        no_cfi: cli.no_cfi,
        no_lists: cli.no_lists,
    };
    parser.populate(&mut dump)?;
    Ok(())
}
