use bincode::error::DecodeError;

use crate::ColmapError;

/// Sequential little-endian reader over an in-memory buffer.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Decode a fixed-layout value at the current offset.
    pub fn read<T: bincode::Decode<()>>(&mut self) -> Result<T, ColmapError> {
        let (value, num_bytes) =
            bincode::decode_from_slice(&self.buf[self.offset..], super::wire_config()).map_err(
                |err| match err {
                    DecodeError::UnexpectedEnd { additional } => ColmapError::TruncatedBuffer {
                        offset: self.offset,
                        needed: additional,
                    },
                    err => ColmapError::Deserialize(err),
                },
            )?;
        self.offset += num_bytes;
        Ok(value)
    }

    /// Read bytes up to a NUL terminator or the end of the buffer.
    ///
    /// The terminator is consumed but not returned. Each byte becomes the
    /// char of the same code point, so any byte string is kept as is.
    pub fn read_cstr(&mut self) -> String {
        let rest = &self.buf[self.offset..];
        let bytes = match rest.iter().position(|&byte| byte == 0) {
            Some(len) => {
                self.offset += len + 1;
                &rest[..len]
            }
            None => {
                self.offset = self.buf.len();
                rest
            }
        };
        bytes.iter().copied().map(char::from).collect()
    }

    /// Skip `count` entries of `entry_size` bytes each.
    pub fn skip(&mut self, count: u64, entry_size: usize) -> Result<(), ColmapError> {
        let num_bytes = usize::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(entry_size));

        match num_bytes {
            Some(num_bytes) if num_bytes <= self.remaining() => {
                self.offset += num_bytes;
                Ok(())
            }
            Some(num_bytes) => Err(ColmapError::TruncatedBuffer {
                offset: self.offset,
                needed: num_bytes - self.remaining(),
            }),
            None => Err(ColmapError::TruncatedBuffer {
                offset: self.offset,
                needed: usize::MAX,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cstr_terminated() {
        let mut reader = ByteReader::new(b"abc\0def");
        assert_eq!(reader.read_cstr(), "abc");
        assert_eq!(reader.offset(), 4);
        assert_eq!(reader.read_cstr(), "def");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_cstr_keeps_every_byte() {
        let mut reader = ByteReader::new(&[b'a', 0xe9, 0xff, 0]);
        let name = reader.read_cstr();
        assert_eq!(name, "a\u{e9}\u{ff}");
        assert_eq!(name.chars().map(|c| c as u32).collect::<Vec<_>>(), [0x61, 0xe9, 0xff]);
    }

    #[test]
    fn test_read_cstr_empty() {
        let mut reader = ByteReader::new(b"\0");
        assert_eq!(reader.read_cstr(), "");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_truncated() {
        let mut reader = ByteReader::new(&[1, 0, 0]);
        let result = reader.read::<u64>();
        assert!(matches!(
            result,
            Err(ColmapError::TruncatedBuffer { offset: 0, .. })
        ));
    }

    #[test]
    fn test_skip() -> Result<(), ColmapError> {
        let mut reader = ByteReader::new(&[0u8; 10]);
        reader.skip(2, 4)?;
        assert_eq!(reader.remaining(), 2);
        assert!(matches!(
            reader.skip(1, 8),
            Err(ColmapError::TruncatedBuffer {
                offset: 8,
                needed: 6
            })
        ));
        assert!(reader.skip(u64::MAX, 24).is_err());
        Ok(())
    }
}
