//! `.debug_ranges` linear scanner
//!
//! Same pair encoding as `.debug_loc`, with two differences: an all-ones
//! low address is a base-address-selection entry (it sets the running
//! base for the rest of the list and is not forwarded), and entries carry
//! no expression. Crossing a `{0, 0}` terminator resets the running base
//! to [`BASE_ADDRESS_UNSET`](crate::core::BASE_ADDRESS_UNSET).

use gimli::{EndianSlice, Reader, RunTimeEndian};

use crate::core::{Result, BASE_ADDRESS_UNSET};
use crate::parse::loclist::all_ones_for;
use crate::visit::DwarfVisitor;

pub(crate) fn scan<V: DwarfVisitor>(
    data: &[u8],
    endian: RunTimeEndian,
    address_size: u8,
    visitor: &mut V,
) -> Result<()> {
    let all_ones = all_ones_for(address_size);
    let mut reader = EndianSlice::new(data, endian);
    let mut base_address = BASE_ADDRESS_UNSET;
    let mut list_offset = 0u64;
    let mut at_list_start = true;

    while !reader.is_empty() {
        let offset = (data.len() - reader.len()) as u64;
        if at_list_start {
            list_offset = offset;
            at_list_start = false;
        }
        let low_pc = reader.read_address(address_size)?;
        let high_pc = reader.read_address(address_size)?;

        if low_pc == 0 && high_pc == 0 {
            base_address = BASE_ADDRESS_UNSET;
            at_list_start = true;
            continue;
        }
        if low_pc == all_ones {
            base_address = high_pc;
            continue;
        }
        visitor.add_range_list_entry(list_offset, base_address, low_pc, high_pc);
    }
    Ok(())
}
