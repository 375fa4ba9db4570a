//! Owning, validating view of one ELF file
//!
//! [`ElfObject`] reads a whole file into memory, validates the container
//! header, and walks the section- and program-header tables through the
//! [`ElfVisitor`] interface. Section data handed to the visitor borrows
//! from the object's buffer and is invalidated by `unload`.

use std::path::{Path, PathBuf};

use gimli::{EndianSlice, Reader, RunTimeEndian};
use tracing::warn;

use crate::core::{Class, ElfError, Encoding, ObjectKind};

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;

/// Receiver for one walk over an ELF image's headers.
///
/// `init` is always called first. Section headers are walked only if
/// `section_headers_start` returns `true`, and likewise for program
/// headers; section index 0 is reserved by the format and never reported.
pub trait ElfVisitor<'data> {
    /// Identity of the image: path, raw bytes, class and byte order.
    fn init(&mut self, path: &Path, data: &'data [u8], class: Class, encoding: Encoding);

    /// `count` is the full `e_shnum`, including the reserved index 0.
    fn section_headers_start(&mut self, count: usize) -> bool {
        let _ = count;
        false
    }

    /// One section header. `data` is empty for `SHT_NOBITS` sections and
    /// for headers whose file range is out of bounds; `size` is always the
    /// declared `sh_size`.
    fn section_header(
        &mut self,
        name: &str,
        data: &'data [u8],
        virtual_address: u64,
        sh_type: u32,
        flags: u64,
        size: u64,
    ) {
        let _ = (name, data, virtual_address, sh_type, flags, size);
    }

    fn section_headers_end(&mut self) {}

    fn program_headers_start(&mut self, count: usize) -> bool {
        let _ = count;
        false
    }

    fn program_header(
        &mut self,
        p_type: u32,
        flags: u32,
        offset: u64,
        virtual_address: u64,
        file_size: u64,
        memory_size: u64,
    ) {
        let _ = (p_type, flags, offset, virtual_address, file_size, memory_size);
    }

    fn program_headers_end(&mut self) {}
}

struct Header {
    kind: ObjectKind,
    shoff: u64,
    shentsize: u16,
    shnum: u16,
    shstrndx: u16,
    phoff: u64,
    phentsize: u16,
    phnum: u16,
}

struct Image {
    path: PathBuf,
    data: Vec<u8>,
    class: Class,
    encoding: Encoding,
    header: Header,
}

/// One loaded ELF file, owning its bytes.
#[derive(Default)]
pub struct ElfObject {
    image: Option<Image>,
}

impl ElfObject {
    pub fn new() -> ElfObject {
        ElfObject::default()
    }

    /// Read `path` entirely into memory and validate the container.
    ///
    /// Any previously loaded image is discarded first; on failure the
    /// object is left unloaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ElfError> {
        let path = path.as_ref();
        self.unload();

        let data = std::fs::read(path).map_err(|source| ElfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = validate(path, data)?;
        self.image = Some(image);
        Ok(())
    }

    /// Release the image buffer. Idempotent.
    pub fn unload(&mut self) {
        self.image = None;
    }

    /// Pointer width of the loaded image, `None` when unloaded.
    pub fn class(&self) -> Option<Class> {
        self.image.as_ref().map(|i| i.class)
    }

    /// Byte order of the loaded image, `None` when unloaded.
    pub fn encoding(&self) -> Option<Encoding> {
        self.image.as_ref().map(|i| i.encoding)
    }

    /// Object file kind (`e_type`), `None` when unloaded.
    pub fn object_kind(&self) -> Option<ObjectKind> {
        self.image.as_ref().map(|i| i.header.kind)
    }

    /// Path the image was loaded from, `None` when unloaded.
    pub fn path(&self) -> Option<&Path> {
        self.image.as_ref().map(|i| i.path.as_path())
    }

    /// Walk the loaded image's headers through `visitor`.
    pub fn parse<'data, V: ElfVisitor<'data> + ?Sized>(
        &'data self,
        visitor: &mut V,
    ) -> Result<(), ElfError> {
        let image = self.image.as_ref().ok_or(ElfError::NotLoaded)?;
        image.parse(visitor);
        Ok(())
    }
}

fn validate(path: &Path, data: Vec<u8>) -> Result<Image, ElfError> {
    let fail_short = |len| ElfError::Truncated {
        path: path.to_path_buf(),
        len,
    };
    if data.len() < 16 {
        return Err(fail_short(data.len()));
    }
    if data[..4] != ELF_MAGIC {
        return Err(ElfError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    let class = match data[EI_CLASS] {
        1 => Class::Elf32,
        2 => Class::Elf64,
        class => {
            return Err(ElfError::BadClass {
                path: path.to_path_buf(),
                class,
            })
        }
    };
    let encoding = match data[EI_DATA] {
        1 => Encoding::LittleEndian,
        2 => Encoding::BigEndian,
        encoding => {
            return Err(ElfError::BadEncoding {
                path: path.to_path_buf(),
                encoding,
            })
        }
    };

    let header_len = match class {
        Class::Elf32 => 52,
        Class::Elf64 => 64,
    };
    if data.len() < header_len {
        return Err(fail_short(data.len()));
    }

    let endian = encoding.run_time_endian();
    let header = match class {
        Class::Elf32 => Header {
            kind: ObjectKind::from_e_type(read_u16(&data, 16, endian)),
            phoff: read_u32(&data, 28, endian) as u64,
            shoff: read_u32(&data, 32, endian) as u64,
            phentsize: read_u16(&data, 42, endian),
            phnum: read_u16(&data, 44, endian),
            shentsize: read_u16(&data, 46, endian),
            shnum: read_u16(&data, 48, endian),
            shstrndx: read_u16(&data, 50, endian),
        },
        Class::Elf64 => Header {
            kind: ObjectKind::from_e_type(read_u16(&data, 16, endian)),
            phoff: read_u64(&data, 32, endian),
            shoff: read_u64(&data, 40, endian),
            phentsize: read_u16(&data, 54, endian),
            phnum: read_u16(&data, 56, endian),
            shentsize: read_u16(&data, 58, endian),
            shnum: read_u16(&data, 60, endian),
            shstrndx: read_u16(&data, 62, endian),
        },
    };

    let (want_shentsize, want_phentsize) = match class {
        Class::Elf32 => (40, 32),
        Class::Elf64 => (64, 56),
    };
    if header.shnum > 0 && header.shentsize != want_shentsize {
        return Err(ElfError::HeaderSizeMismatch {
            path: path.to_path_buf(),
            table: "section",
            found: header.shentsize,
            expected: want_shentsize,
        });
    }
    if header.phnum > 0 && header.phentsize != want_phentsize {
        return Err(ElfError::HeaderSizeMismatch {
            path: path.to_path_buf(),
            table: "program",
            found: header.phentsize,
            expected: want_phentsize,
        });
    }

    Ok(Image {
        path: path.to_path_buf(),
        data,
        class,
        encoding,
        header,
    })
}

impl Image {
    fn parse<'data, V: ElfVisitor<'data> + ?Sized>(&'data self, visitor: &mut V) {
        visitor.init(&self.path, &self.data, self.class, self.encoding);
        self.parse_section_headers(visitor);
        self.parse_program_headers(visitor);
    }

    fn parse_section_headers<'data, V: ElfVisitor<'data> + ?Sized>(&'data self, visitor: &mut V) {
        let header = &self.header;
        if header.shnum == 0 || !visitor.section_headers_start(header.shnum as usize) {
            return;
        }

        let strtab = self.section_body(header.shstrndx as usize).unwrap_or(&[]);
        if strtab.is_empty() && header.shnum > 1 {
            warn!(path = %self.path.display(), "missing section-name string table");
        }

        // Index 0 is the reserved null section.
        for index in 1..header.shnum as usize {
            let Some(sh) = self.section_header_at(index) else {
                warn!(path = %self.path.display(), index, "section header out of bounds");
                continue;
            };
            let name = c_string_at(strtab, sh.name_offset as usize);
            let data = self.section_data(&sh);
            visitor.section_header(name, data, sh.addr, sh.sh_type, sh.flags, sh.size);
        }
        visitor.section_headers_end();
    }

    fn parse_program_headers<'data, V: ElfVisitor<'data> + ?Sized>(&'data self, visitor: &mut V) {
        let header = &self.header;
        if header.phnum == 0 || !visitor.program_headers_start(header.phnum as usize) {
            return;
        }
        let endian = self.encoding.run_time_endian();
        for index in 0..header.phnum as usize {
            let start = header.phoff as usize + index * header.phentsize as usize;
            let end = start + header.phentsize as usize;
            if end > self.data.len() {
                warn!(path = %self.path.display(), index, "program header out of bounds");
                continue;
            }
            let raw = &self.data[start..];
            match self.class {
                Class::Elf32 => visitor.program_header(
                    read_u32(raw, 0, endian),
                    read_u32(raw, 24, endian),
                    read_u32(raw, 4, endian) as u64,
                    read_u32(raw, 8, endian) as u64,
                    read_u32(raw, 16, endian) as u64,
                    read_u32(raw, 20, endian) as u64,
                ),
                Class::Elf64 => visitor.program_header(
                    read_u32(raw, 0, endian),
                    read_u32(raw, 4, endian),
                    read_u64(raw, 8, endian),
                    read_u64(raw, 16, endian),
                    read_u64(raw, 32, endian),
                    read_u64(raw, 40, endian),
                ),
            }
        }
        visitor.program_headers_end();
    }

    fn section_header_at(&self, index: usize) -> Option<SectionHeader> {
        let header = &self.header;
        let start = (header.shoff as usize).checked_add(index * header.shentsize as usize)?;
        let end = start.checked_add(header.shentsize as usize)?;
        if end > self.data.len() {
            return None;
        }
        let raw = &self.data[start..];
        let endian = self.encoding.run_time_endian();
        Some(match self.class {
            Class::Elf32 => SectionHeader {
                name_offset: read_u32(raw, 0, endian),
                sh_type: read_u32(raw, 4, endian),
                flags: read_u32(raw, 8, endian) as u64,
                addr: read_u32(raw, 12, endian) as u64,
                offset: read_u32(raw, 16, endian) as u64,
                size: read_u32(raw, 20, endian) as u64,
            },
            Class::Elf64 => SectionHeader {
                name_offset: read_u32(raw, 0, endian),
                sh_type: read_u32(raw, 4, endian),
                flags: read_u64(raw, 8, endian),
                addr: read_u64(raw, 16, endian),
                offset: read_u64(raw, 24, endian),
                size: read_u64(raw, 32, endian),
            },
        })
    }

    fn section_body(&self, index: usize) -> Option<&[u8]> {
        let sh = self.section_header_at(index)?;
        let data = self.section_data(&sh);
        (!data.is_empty()).then_some(data)
    }

    fn section_data(&self, sh: &SectionHeader) -> &[u8] {
        const SHT_NOBITS: u32 = 8;
        if sh.sh_type == SHT_NOBITS {
            return &[];
        }
        let start = sh.offset as usize;
        let Some(end) = start.checked_add(sh.size as usize) else {
            return &[];
        };
        if end > self.data.len() {
            return &[];
        }
        &self.data[start..end]
    }
}

struct SectionHeader {
    name_offset: u32,
    sh_type: u32,
    flags: u64,
    addr: u64,
    offset: u64,
    size: u64,
}

fn c_string_at(strtab: &[u8], offset: usize) -> &str {
    let Some(tail) = strtab.get(offset..) else {
        return "";
    };
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    std::str::from_utf8(&tail[..end]).unwrap_or("")
}

fn read_u16(data: &[u8], offset: usize, endian: RunTimeEndian) -> u16 {
    EndianSlice::new(&data[offset..], endian).read_u16().unwrap_or(0)
}

fn read_u32(data: &[u8], offset: usize, endian: RunTimeEndian) -> u32 {
    EndianSlice::new(&data[offset..], endian).read_u32().unwrap_or(0)
}

fn read_u64(data: &[u8], offset: usize, endian: RunTimeEndian) -> u64 {
    EndianSlice::new(&data[offset..], endian).read_u64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Class, Encoding, ObjectKind};
    use std::io::Write;

    struct ImageBuilder {
        class: Class,
        encoding: Encoding,
        e_type: u16,
        sections: Vec<(String, u32, u64, Vec<u8>)>,
    }

    impl ImageBuilder {
        fn new(class: Class, encoding: Encoding) -> ImageBuilder {
            ImageBuilder {
                class,
                encoding,
                e_type: 2,
                sections: Vec::new(),
            }
        }

        fn e_type(mut self, e_type: u16) -> ImageBuilder {
            self.e_type = e_type;
            self
        }

        fn section(
            mut self,
            name: &str,
            sh_type: u32,
            addr: u64,
            data: Vec<u8>,
        ) -> ImageBuilder {
            self.sections.push((name.to_string(), sh_type, addr, data));
            self
        }

        fn build(self) -> Vec<u8> {
            let is64 = self.class == Class::Elf64;
            let le = self.encoding.is_little();
            let (ehsize, shentsize) = if is64 { (64u64, 64u16) } else { (52, 40) };

            let mut shstrtab = vec![0u8];
            let mut name_offsets = Vec::new();
            for (name, ..) in &self.sections {
                name_offsets.push(shstrtab.len() as u32);
                shstrtab.extend_from_slice(name.as_bytes());
                shstrtab.push(0);
            }
            let strtab_name_off = shstrtab.len() as u32;
            shstrtab.extend_from_slice(b".shstrtab\0");

            // Layout: ehdr | section bodies | shstrtab | section headers.
            let mut bodies = Vec::new();
            let mut offsets = Vec::new();
            let mut cursor = ehsize;
            for (_, _, _, data) in &self.sections {
                offsets.push(cursor);
                bodies.extend_from_slice(data);
                cursor += data.len() as u64;
            }
            let strtab_off = cursor;
            cursor += shstrtab.len() as u64;
            let shoff = cursor;
            let shnum = self.sections.len() as u16 + 2; // null + shstrtab

            let mut out = Vec::new();
            out.extend_from_slice(&[0x7f, b'E', b'L', b'F']);
            out.push(if is64 { 2 } else { 1 });
            out.push(if le { 1 } else { 2 });
            out.push(1); // EI_VERSION
            out.resize(16, 0);
            put_u16(&mut out, le, self.e_type);
            put_u16(&mut out, le, 0x3e); // e_machine
            put_u32(&mut out, le, 1); // e_version
            if is64 {
                put_u64(&mut out, le, 0); // e_entry
                put_u64(&mut out, le, 0); // e_phoff
                put_u64(&mut out, le, shoff);
                put_u32(&mut out, le, 0); // e_flags
                put_u16(&mut out, le, 64); // e_ehsize
                put_u16(&mut out, le, 56); // e_phentsize
                put_u16(&mut out, le, 0); // e_phnum
                put_u16(&mut out, le, shentsize);
                put_u16(&mut out, le, shnum);
                put_u16(&mut out, le, shnum - 1); // e_shstrndx
            } else {
                put_u32(&mut out, le, 0); // e_entry
                put_u32(&mut out, le, 0); // e_phoff
                put_u32(&mut out, le, shoff as u32);
                put_u32(&mut out, le, 0); // e_flags
                put_u16(&mut out, le, 52);
                put_u16(&mut out, le, 32);
                put_u16(&mut out, le, 0);
                put_u16(&mut out, le, shentsize);
                put_u16(&mut out, le, shnum);
                put_u16(&mut out, le, shnum - 1);
            }
            assert_eq!(out.len() as u64, ehsize);
            out.extend_from_slice(&bodies);
            out.extend_from_slice(&shstrtab);

            let mut emit = |name_off: u32, sh_type: u32, addr: u64, off: u64, size: u64| {
                if is64 {
                    put_u32(&mut out, le, name_off);
                    put_u32(&mut out, le, sh_type);
                    put_u64(&mut out, le, 0); // sh_flags
                    put_u64(&mut out, le, addr);
                    put_u64(&mut out, le, off);
                    put_u64(&mut out, le, size);
                    put_u32(&mut out, le, 0); // sh_link
                    put_u32(&mut out, le, 0); // sh_info
                    put_u64(&mut out, le, 1); // sh_addralign
                    put_u64(&mut out, le, 0); // sh_entsize
                } else {
                    put_u32(&mut out, le, name_off);
                    put_u32(&mut out, le, sh_type);
                    put_u32(&mut out, le, 0);
                    put_u32(&mut out, le, addr as u32);
                    put_u32(&mut out, le, off as u32);
                    put_u32(&mut out, le, size as u32);
                    put_u32(&mut out, le, 0);
                    put_u32(&mut out, le, 0);
                    put_u32(&mut out, le, 1);
                    put_u32(&mut out, le, 0);
                }
            };

            emit(0, 0, 0, 0, 0);
            for (i, (_, sh_type, addr, data)) in self.sections.iter().enumerate() {
                emit(name_offsets[i], *sh_type, *addr, offsets[i], data.len() as u64);
            }
            emit(
                strtab_name_off,
                3, // SHT_STRTAB
                0,
                strtab_off,
                shstrtab.len() as u64,
            );
            out
        }
    }

    fn put_u16(out: &mut Vec<u8>, le: bool, v: u16) {
        if le {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn put_u32(out: &mut Vec<u8>, le: bool, v: u32) {
        if le {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn put_u64(out: &mut Vec<u8>, le: bool, v: u64) {
        if le {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[derive(Default)]
    struct Recorder {
        sections: Vec<(String, usize, u64, u64)>,
        program_headers: Vec<(u32, u32, u64, u64, u64, u64)>,
    }

    impl<'data> ElfVisitor<'data> for Recorder {
        fn init(&mut self, _path: &Path, _data: &'data [u8], _class: Class, _encoding: Encoding) {}

        fn section_headers_start(&mut self, _count: usize) -> bool {
            true
        }

        fn section_header(
            &mut self,
            name: &str,
            data: &'data [u8],
            virtual_address: u64,
            _sh_type: u32,
            _flags: u64,
            size: u64,
        ) {
            self.sections
                .push((name.to_string(), data.len(), virtual_address, size));
        }

        fn program_headers_start(&mut self, _count: usize) -> bool {
            true
        }

        fn program_header(
            &mut self,
            p_type: u32,
            flags: u32,
            offset: u64,
            virtual_address: u64,
            file_size: u64,
            memory_size: u64,
        ) {
            self.program_headers.push((
                p_type,
                flags,
                offset,
                virtual_address,
                file_size,
                memory_size,
            ));
        }
    }

    #[test]
    fn load_reads_header_fields() {
        let bytes = ImageBuilder::new(Class::Elf64, Encoding::LittleEndian)
            .e_type(3)
            .section(".text", 1, 0x1000, vec![0x90; 8])
            .build();
        let file = write_temp(&bytes);

        let mut elf = ElfObject::new();
        elf.load(file.path()).unwrap();
        assert_eq!(elf.class(), Some(Class::Elf64));
        assert_eq!(elf.encoding(), Some(Encoding::LittleEndian));
        assert_eq!(elf.object_kind(), Some(ObjectKind::SharedObject));
    }

    #[test]
    fn load_big_endian_32bit() {
        let bytes = ImageBuilder::new(Class::Elf32, Encoding::BigEndian)
            .section(".text", 1, 0x8000, vec![0; 4])
            .build();
        let file = write_temp(&bytes);

        let mut elf = ElfObject::new();
        elf.load(file.path()).unwrap();
        assert_eq!(elf.class(), Some(Class::Elf32));
        assert_eq!(elf.encoding(), Some(Encoding::BigEndian));
        assert_eq!(elf.object_kind(), Some(ObjectKind::Executable));
    }

    #[test]
    fn bad_magic_leaves_object_unloaded() {
        let mut bytes = ImageBuilder::new(Class::Elf64, Encoding::LittleEndian).build();
        bytes[1] = b'X';
        let file = write_temp(&bytes);

        let mut elf = ElfObject::new();
        let err = elf.load(file.path()).unwrap_err();
        assert!(matches!(err, ElfError::BadMagic { .. }));
        assert_eq!(elf.class(), None);
        assert_eq!(elf.encoding(), None);
        assert_eq!(elf.object_kind(), None);
    }

    #[test]
    fn truncated_file_rejected() {
        let file = write_temp(&[0x7f, b'E', b'L', b'F', 2, 1]);
        let mut elf = ElfObject::new();
        assert!(matches!(
            elf.load(file.path()),
            Err(ElfError::Truncated { .. })
        ));
    }

    #[test]
    fn wrong_shentsize_rejected() {
        let mut bytes = ImageBuilder::new(Class::Elf64, Encoding::LittleEndian)
            .section(".text", 1, 0, vec![0; 4])
            .build();
        // e_shentsize lives at offset 58 in the 64-bit header.
        bytes[58] = 63;
        bytes[59] = 0;
        let file = write_temp(&bytes);

        let mut elf = ElfObject::new();
        assert!(matches!(
            elf.load(file.path()),
            Err(ElfError::HeaderSizeMismatch { .. })
        ));
    }

    #[test]
    fn reload_replaces_previous_image() {
        let first = ImageBuilder::new(Class::Elf64, Encoding::LittleEndian).build();
        let second = ImageBuilder::new(Class::Elf32, Encoding::LittleEndian).build();
        let f1 = write_temp(&first);
        let f2 = write_temp(&second);

        let mut elf = ElfObject::new();
        elf.load(f1.path()).unwrap();
        assert_eq!(elf.class(), Some(Class::Elf64));
        elf.load(f2.path()).unwrap();
        assert_eq!(elf.class(), Some(Class::Elf32));
        elf.unload();
        elf.unload();
        assert_eq!(elf.class(), None);
    }

    #[test]
    fn parse_reports_every_section_with_declared_size() {
        let bytes = ImageBuilder::new(Class::Elf64, Encoding::LittleEndian)
            .section(".text", 1, 0x1000, vec![0x90; 16])
            .section(".debug_info", 1, 0, vec![1, 2, 3])
            .build();
        let file = write_temp(&bytes);

        let mut elf = ElfObject::new();
        elf.load(file.path()).unwrap();
        let mut recorder = Recorder::default();
        elf.parse(&mut recorder).unwrap();

        let text = recorder.sections.iter().find(|s| s.0 == ".text").unwrap();
        assert_eq!((text.1, text.2, text.3), (16, 0x1000, 16));
        let info = recorder
            .sections
            .iter()
            .find(|s| s.0 == ".debug_info")
            .unwrap();
        assert_eq!((info.1, info.3), (3, 3));
        // null section (index 0) must not be reported
        assert!(recorder.sections.iter().all(|s| !s.0.is_empty()));
    }

    #[test]
    fn parse_walks_program_headers() {
        // 64-bit header with one PT_LOAD program header and no sections.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1]);
        bytes.resize(16, 0);
        put_u16(&mut bytes, true, 2); // e_type
        put_u16(&mut bytes, true, 0x3e);
        put_u32(&mut bytes, true, 1);
        put_u64(&mut bytes, true, 0); // e_entry
        put_u64(&mut bytes, true, 64); // e_phoff
        put_u64(&mut bytes, true, 0); // e_shoff
        put_u32(&mut bytes, true, 0);
        put_u16(&mut bytes, true, 64); // e_ehsize
        put_u16(&mut bytes, true, 56); // e_phentsize
        put_u16(&mut bytes, true, 1); // e_phnum
        put_u16(&mut bytes, true, 64); // e_shentsize
        put_u16(&mut bytes, true, 0); // e_shnum
        put_u16(&mut bytes, true, 0); // e_shstrndx
        assert_eq!(bytes.len(), 64);
        put_u32(&mut bytes, true, 1); // p_type = PT_LOAD
        put_u32(&mut bytes, true, 5); // p_flags = R+X
        put_u64(&mut bytes, true, 0); // p_offset
        put_u64(&mut bytes, true, 0x40_0000); // p_vaddr
        put_u64(&mut bytes, true, 0x40_0000); // p_paddr
        put_u64(&mut bytes, true, 0x100); // p_filesz
        put_u64(&mut bytes, true, 0x200); // p_memsz
        put_u64(&mut bytes, true, 0x1000); // p_align
        let file = write_temp(&bytes);

        let mut elf = ElfObject::new();
        elf.load(file.path()).unwrap();
        let mut recorder = Recorder::default();
        elf.parse(&mut recorder).unwrap();
        assert_eq!(
            recorder.program_headers,
            vec![(1, 5, 0, 0x40_0000, 0x100, 0x200)]
        );
    }

    #[test]
    fn parse_unloaded_is_an_error() {
        let elf = ElfObject::new();
        let mut recorder = Recorder::default();
        assert!(matches!(elf.parse(&mut recorder), Err(ElfError::NotLoaded)));
    }
}
