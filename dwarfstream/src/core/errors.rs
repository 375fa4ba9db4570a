//! Error types for the extraction pipeline

use std::path::PathBuf;

/// Errors raised while loading or walking an ELF image.
#[derive(thiserror::Error, Debug)]
pub enum ElfError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: file too short for an ELF header ({len} bytes)")]
    Truncated { path: PathBuf, len: usize },
    #[error("{path}: bad ELF magic")]
    BadMagic { path: PathBuf },
    #[error("{path}: unrecognized ELF class byte {class}")]
    BadClass { path: PathBuf, class: u8 },
    #[error("{path}: unrecognized ELF data-encoding byte {encoding}")]
    BadEncoding { path: PathBuf, encoding: u8 },
    #[error("{path}: {table} header entry size is {found}, expected {expected}")]
    HeaderSizeMismatch {
        path: PathBuf,
        table: &'static str,
        found: u16,
        expected: u16,
    },
    #[error("no ELF image loaded")]
    NotLoaded,
}

/// Errors raised while evaluating a DWARF location expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("operand stack underflow at opcode 0x{opcode:02x} (offset {offset})")]
    StackUnderflow { opcode: u8, offset: usize },
    #[error("unsupported DWARF opcode 0x{opcode:02x} at offset {offset}")]
    UnsupportedOpcode { opcode: u8, offset: usize },
    #[error("DW_OP_pick index {index} exceeds stack depth {depth}")]
    InvalidPick { index: u8, depth: usize },
    #[error("branch target {target} outside expression of {len} bytes")]
    InvalidBranch { target: i64, len: usize },
    #[error("division by zero at offset {offset}")]
    DivisionByZero { offset: usize },
    #[error("expression truncated: {0}")]
    Truncated(#[from] gimli::Error),
}

/// Result type used throughout the library.
pub type Result<T> = anyhow::Result<T>;
