//! `.debug_loc` linear scanner
//!
//! The section is a flat sequence of address pairs. A `{0, 0}` pair
//! terminates the current list and is not forwarded; the next real entry
//! carries `is_first = true`. An all-ones low address is an
//! absolute-address entry: the address sits in the high field and no
//! expression follows. Every other entry carries a 2-byte-length-prefixed
//! DWARF expression.

use gimli::{EndianSlice, Reader, RunTimeEndian};

use crate::core::Result;
use crate::visit::DwarfVisitor;

pub(crate) fn scan<V: DwarfVisitor>(
    data: &[u8],
    endian: RunTimeEndian,
    address_size: u8,
    visitor: &mut V,
) -> Result<()> {
    let all_ones = all_ones_for(address_size);
    let mut reader = EndianSlice::new(data, endian);
    let mut is_first = true;

    while !reader.is_empty() {
        let offset = (data.len() - reader.len()) as u64;
        let low_pc = reader.read_address(address_size)?;
        let high_pc = reader.read_address(address_size)?;

        if low_pc == 0 && high_pc == 0 {
            is_first = true;
            continue;
        }
        if low_pc == all_ones {
            visitor.add_loc_list_entry(offset, is_first, low_pc, high_pc, &[]);
            is_first = false;
            continue;
        }

        let expression_length = reader.read_u16()? as usize;
        let expression = reader.split(expression_length)?;
        visitor.add_loc_list_entry(offset, is_first, low_pc, high_pc, expression.slice());
        is_first = false;
    }
    Ok(())
}

pub(crate) fn all_ones_for(address_size: u8) -> u64 {
    if address_size >= 8 {
        u64::MAX
    } else {
        (1u64 << (address_size as u32 * 8)) - 1
    }
}
