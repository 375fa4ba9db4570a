//! ELF container loading and section discovery

pub mod object;
pub mod section_map;

pub use object::{ElfObject, ElfVisitor};
pub use section_map::SectionMap;
