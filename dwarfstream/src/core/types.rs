//! Data types crossing the visitor boundary

/// ELF class, i.e. the pointer width of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    /// Address size in bytes for this class.
    pub fn address_size(self) -> u8 {
        match self {
            Class::Elf32 => 4,
            Class::Elf64 => 8,
        }
    }
}

/// ELF data encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    LittleEndian,
    BigEndian,
}

impl Encoding {
    pub fn is_little(self) -> bool {
        matches!(self, Encoding::LittleEndian)
    }

    /// The run-time endianness handed to the byte readers.
    pub fn run_time_endian(self) -> gimli::RunTimeEndian {
        match self {
            Encoding::LittleEndian => gimli::RunTimeEndian::Little,
            Encoding::BigEndian => gimli::RunTimeEndian::Big,
        }
    }
}

/// ELF object file kind (`e_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Relocatable,
    Executable,
    SharedObject,
    Core,
    Other(u16),
}

impl ObjectKind {
    pub(crate) fn from_e_type(e_type: u16) -> ObjectKind {
        match e_type {
            1 => ObjectKind::Relocatable,
            2 => ObjectKind::Executable,
            3 => ObjectKind::SharedObject,
            4 => ObjectKind::Core,
            other => ObjectKind::Other(other),
        }
    }
}

/// Header facts for one compilation unit, as passed to
/// [`DwarfVisitor::start_compilation_unit`](crate::DwarfVisitor::start_compilation_unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInfo {
    /// Byte offset of the unit header within `.debug_info`.
    pub offset: u64,
    /// Size in bytes of an address on the target.
    pub address_size: u8,
    /// 4 for 32-bit DWARF, 8 for 64-bit DWARF.
    pub offset_size: u8,
    /// The unit's declared length (not counting the length field itself).
    pub length: u64,
    /// DWARF version of the unit.
    pub version: u16,
}

/// Header facts for one call-frame entry (an FDE merged with its CIE).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfiEntryInfo {
    /// Byte offset of the FDE within `.eh_frame`.
    pub offset: u64,
    /// First program-counter address the entry covers.
    pub address: u64,
    /// Number of bytes of machine code covered.
    pub length: u64,
    /// CIE version.
    pub version: u8,
    /// Augmentation letters recorded in the CIE.
    pub augmentation: String,
    /// DWARF register number holding the return address.
    pub return_address_register: u64,
}

/// Target of a call-frame rule: a DWARF-numbered register, or the
/// canonical frame address pseudo-register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfiRegister {
    /// The canonical frame address itself.
    Cfa,
    /// A machine register, by DWARF number.
    Reg(u16),
}

/// One register-recovery rule within a call-frame entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfiRule<'a> {
    /// The register's previous value is unrecoverable.
    Undefined,
    /// The register has not been touched.
    SameValue,
    /// Saved at `base + offset`.
    Offset { base: CfiRegister, offset: i64 },
    /// The previous value *is* `base + offset`.
    ValOffset { base: CfiRegister, offset: i64 },
    /// Saved in another register.
    Register(u16),
    /// Saved at the address this expression evaluates to.
    Expression(&'a [u8]),
    /// The previous value is what this expression evaluates to.
    ValExpression(&'a [u8]),
}

/// Base address of a range list before any base-address-selection entry
/// has been seen (and again after every list terminator).
pub const BASE_ADDRESS_UNSET: u64 = u64::MAX;

/// Section names the pipeline consumes.
pub mod section_names {
    pub const DEBUG_INFO: &str = ".debug_info";
    pub const DEBUG_ABBREV: &str = ".debug_abbrev";
    pub const DEBUG_STR: &str = ".debug_str";
    pub const DEBUG_LINE: &str = ".debug_line";
    pub const DEBUG_LINE_STR: &str = ".debug_line_str";
    pub const DEBUG_LOC: &str = ".debug_loc";
    pub const DEBUG_RANGES: &str = ".debug_ranges";
    pub const EH_FRAME: &str = ".eh_frame";
    pub const TEXT: &str = ".text";
}
