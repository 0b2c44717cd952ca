//! # Parameter Codec
//!
//! Fixed-layout, big-endian encoding of the params and state words, and the
//! per-family sanitize table used for shape-equality checks.
//!
//! Every decoder is total: any 32-byte pattern decodes to some value, and
//! encoding that value reproduces the original bytes. Semantic validation
//! happens later, in the family validators.

pub mod params;
pub mod sanitize;
pub mod state;

pub use params::*;
pub use sanitize::*;
pub use state::*;

/// Read a big-endian two's complement 24-bit integer
pub fn read_i24(bytes: &[u8], offset: usize) -> i32 {
    let raw = read_u24(bytes, offset);
    // sign-extend bit 23
    ((raw << 8) as i32) >> 8
}

/// Write the low 24 bits of `value` big-endian
pub fn write_i24(bytes: &mut [u8], offset: usize, value: i32) {
    write_u24(bytes, offset, value as u32);
}

pub fn read_u24(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([0, bytes[offset], bytes[offset + 1], bytes[offset + 2]])
}

pub fn write_u24(bytes: &mut [u8], offset: usize, value: u32) {
    let be = value.to_be_bytes();
    bytes[offset..offset + 3].copy_from_slice(&be[1..4]);
}

pub fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

pub fn write_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i24_sign_extension() {
        let mut buf = [0u8; 3];
        for value in [-8_388_608, -443_636, -1, 0, 1, 443_636, 8_388_607] {
            write_i24(&mut buf, 0, value);
            assert_eq!(read_i24(&buf, 0), value);
        }
        assert_eq!(read_i24(&[0xff, 0xff, 0xff], 0), -1);
        assert_eq!(read_i24(&[0x80, 0x00, 0x00], 0), -8_388_608);
    }

    #[test]
    fn test_unsigned_fields_are_big_endian() {
        let mut buf = [0u8; 4];
        write_u32(&mut buf, 0, 0x0102_0304);
        assert_eq!(buf, [1, 2, 3, 4]);
        write_u16(&mut buf, 1, 0xabcd);
        assert_eq!(buf, [1, 0xab, 0xcd, 4]);
        assert_eq!(read_u24(&buf, 1), 0xabcd04);
    }
}
