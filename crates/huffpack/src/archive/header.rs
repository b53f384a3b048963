//! Header serialization: extension metadata, node table, size field

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::tree::Tree;

/// Marks the end of the decimal-digit size field
pub(crate) const SIZE_SENTINEL: u8 = 10;

/// Everything stored ahead of the packed payload
pub(crate) struct Header {
    pub extension: String,
    pub tree: Tree,
    pub original_size: u64,
    /// Bytes this header occupied in the stream
    pub byte_len: u64,
}

pub(crate) fn write_header<W: Write>(
    writer: &mut W,
    extension: &str,
    tree: &Tree,
    original_size: u64,
) -> Result<()> {
    let ext = extension.as_bytes();
    let ext_len = u8::try_from(ext.len()).map_err(|_| Error::ExtensionTooLong(ext.len()))?;
    writer.write_u8(ext_len)?;
    writer.write_all(ext)?;

    writer.write_u16::<BigEndian>(tree.len() as u16)?;
    for (a, b) in tree.node_table() {
        writer.write_u16::<BigEndian>(a)?;
        writer.write_u16::<BigEndian>(b)?;
    }

    for digit in decimal_digits(original_size) {
        writer.write_u8(digit)?;
    }
    writer.write_u8(SIZE_SENTINEL)?;
    Ok(())
}

pub(crate) fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let ext_len = reader.read_u8()?;
    let mut ext = vec![0u8; ext_len as usize];
    reader.read_exact(&mut ext)?;
    let extension = String::from_utf8_lossy(&ext).into_owned();

    let node_count = reader.read_u16::<BigEndian>()?;
    let mut entries = Vec::with_capacity(node_count as usize);
    for _ in 0..node_count {
        let a = reader.read_u16::<BigEndian>()?;
        let b = reader.read_u16::<BigEndian>()?;
        entries.push((a, b));
    }
    let tree = Tree::from_node_table(&entries)?;

    let mut original_size = 0u64;
    let mut size_field_len = 0u64;
    loop {
        let byte = reader.read_u8()?;
        size_field_len += 1;
        match byte {
            SIZE_SENTINEL => break,
            digit @ 0..=9 => {
                original_size = original_size
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(digit)))
                    .ok_or(Error::SizeFieldOverflow)?;
            }
            other => return Err(Error::InvalidSizeDigit(other)),
        }
    }

    let byte_len = 1 + u64::from(ext_len) + 2 + u64::from(node_count) * 4 + size_field_len;
    Ok(Header {
        extension,
        tree,
        original_size,
        byte_len,
    })
}

/// Decimal digits of `n`, most significant first, as raw values 0-9
pub(crate) fn decimal_digits(n: u64) -> Vec<u8> {
    let mut digits = Vec::new();
    let mut rest = n;
    loop {
        digits.push((rest % 10) as u8);
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}
