use crate::{Error, IconSize, Result, MAX_ICON_DIMENSION};

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const ICON_RESOURCE_TYPE: u16 = 1;

/// Reads the frame sizes listed in an ICO directory, in file order.
pub fn read_directory(bytes: &[u8]) -> Result<Vec<IconSize>> {
    let header = bytes
        .get(..HEADER_LEN)
        .ok_or(Error::Malformed("truncated header"))?;
    if read_u16(header, 0) != 0 || read_u16(header, 2) != ICON_RESOURCE_TYPE {
        return Err(Error::Malformed("not an icon container"));
    }

    let count = usize::from(read_u16(header, 4));
    if count == 0 {
        return Err(Error::Malformed("icon container has no frames"));
    }

    (0..count)
        .map(|index| {
            let start = HEADER_LEN + index * ENTRY_LEN;
            let entry = bytes
                .get(start..start + ENTRY_LEN)
                .ok_or(Error::Malformed("truncated directory entry"))?;
            IconSize::from_dimensions(stored_dimension(entry[0]), stored_dimension(entry[1]))
                .ok_or(Error::Malformed("invalid frame size"))
        })
        .collect()
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

/// A stored zero stands for the maximum dimension.
fn stored_dimension(value: u8) -> u32 {
    match value {
        0 => MAX_ICON_DIMENSION,
        value => u32::from(value),
    }
}
