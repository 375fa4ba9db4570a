//! Section discovery for the extraction pipeline
//!
//! [`SectionMap`] is the [`ElfVisitor`] the pipeline plugs into
//! [`ElfObject::parse`](crate::elf::ElfObject::parse): it records every
//! section's data and load address by name and keeps the byte order and
//! address size needed to build the downstream readers.

use std::collections::HashMap;
use std::path::Path;

use gimli::{EndianSlice, RunTimeEndian};

use crate::core::{Class, Encoding};
use crate::elf::ElfVisitor;

/// Name-keyed view of an ELF image's sections. Borrows from the
/// [`ElfObject`](crate::elf::ElfObject) it was populated from.
pub struct SectionMap<'data> {
    sections: HashMap<String, &'data [u8]>,
    load_addresses: HashMap<String, u64>,
    endian: RunTimeEndian,
    address_size: u8,
}

impl<'data> SectionMap<'data> {
    pub fn new() -> SectionMap<'data> {
        SectionMap {
            sections: HashMap::new(),
            load_addresses: HashMap::new(),
            endian: RunTimeEndian::Little,
            address_size: 8,
        }
    }

    /// Section contents by name; empty for sections the image lacks.
    /// Callers treat an empty section as absent.
    pub fn section(&self, name: &str) -> &'data [u8] {
        self.sections.get(name).copied().unwrap_or(&[])
    }

    /// Virtual load address by name; 0 for sections the image lacks.
    pub fn load_address(&self, name: &str) -> u64 {
        self.load_addresses.get(name).copied().unwrap_or(0)
    }

    /// Byte order of the image.
    pub fn endian(&self) -> RunTimeEndian {
        self.endian
    }

    /// Address size of the image in bytes.
    pub fn address_size(&self) -> u8 {
        self.address_size
    }

    /// An endian-correct reader positioned at the start of `name`.
    pub fn reader(&self, name: &str) -> EndianSlice<'data, RunTimeEndian> {
        EndianSlice::new(self.section(name), self.endian)
    }
}

impl<'data> Default for SectionMap<'data> {
    fn default() -> Self {
        SectionMap::new()
    }
}

impl<'data> ElfVisitor<'data> for SectionMap<'data> {
    fn init(&mut self, _path: &Path, _data: &'data [u8], class: Class, encoding: Encoding) {
        self.endian = encoding.run_time_endian();
        self.address_size = class.address_size();
    }

    fn section_headers_start(&mut self, _count: usize) -> bool {
        true
    }

    // Duplicate names overwrite: last header wins.
    fn section_header(
        &mut self,
        name: &str,
        data: &'data [u8],
        virtual_address: u64,
        _sh_type: u32,
        _flags: u64,
        _size: u64,
    ) {
        self.sections.insert(name.to_string(), data);
        self.load_addresses.insert(name.to_string(), virtual_address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sections_are_empty_and_unmapped() {
        let map = SectionMap::new();
        assert!(map.section(".debug_info").is_empty());
        assert_eq!(map.load_address(".debug_info"), 0);
    }

    #[test]
    fn reader_honors_image_byte_order() {
        use gimli::Reader as _;

        let mut map = SectionMap::new();
        map.init(Path::new("x"), &[], Class::Elf64, Encoding::BigEndian);
        let data: &[u8] = &[0x12, 0x34, 0x56, 0x78];
        map.section_header(".debug_info", data, 0, 1, 0, 4);
        let mut reader = map.reader(".debug_info");
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
    }

    #[test]
    fn later_header_wins_on_duplicate_names() {
        let mut map = SectionMap::new();
        map.init(
            Path::new("x"),
            &[],
            Class::Elf32,
            Encoding::BigEndian,
        );
        let first: &[u8] = &[1, 2];
        let second: &[u8] = &[3, 4, 5];
        map.section_header(".text", first, 0x100, 1, 0, 2);
        map.section_header(".text", second, 0x200, 1, 0, 3);
        assert_eq!(map.section(".text"), second);
        assert_eq!(map.load_address(".text"), 0x200);
        assert_eq!(map.address_size(), 4);
        assert_eq!(map.endian(), RunTimeEndian::Big);
    }
}
