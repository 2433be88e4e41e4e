//! # 位流
//!
//! 一个带游标的有序位序列，是帧编解码和像素读写共用的基础结构。
//! 字节内按最高位优先写入，32 位整数按大端序写入。

use crate::error::StegoError;

/// 带读写游标的位序列。
///
/// 写操作在游标位于末尾时追加，否则原地覆盖当前位置；
/// 读操作在剩余位数不足时返回 [`StegoError::Underrun`]，不会补零。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<bool>,
    cursor: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// 游标当前位置。
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// 游标之后尚未读取的位数。
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.cursor
    }

    /// 把游标移回开头，以便读取刚写入的内容。
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }

    pub fn write_bit(&mut self, bit: bool) {
        match self.bits.get_mut(self.cursor) {
            Some(slot) => *slot = bit,
            None => self.bits.push(bit),
        }
        self.cursor += 1;
    }

    pub fn write_bits<I: IntoIterator<Item = bool>>(&mut self, bits: I) {
        bits.into_iter().for_each(|bit| self.write_bit(bit));
    }

    pub fn write_byte(&mut self, byte: u8) {
        (0..8)
            .rev()
            .for_each(|shift| self.write_bit((byte >> shift) & 1 == 1));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        bytes.iter().for_each(|&byte| self.write_byte(byte));
    }

    pub fn write_u32_be(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn read_bit(&mut self) -> Result<bool, StegoError> {
        self.ensure_remaining(1)?;
        let bit = self.bits[self.cursor];
        self.cursor += 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, n: usize) -> Result<Vec<bool>, StegoError> {
        self.ensure_remaining(n)?;
        let bits = self.bits[self.cursor..self.cursor + n].to_vec();
        self.cursor += n;
        Ok(bits)
    }

    pub fn read_byte(&mut self) -> Result<u8, StegoError> {
        self.ensure_remaining(8)?;
        let byte = self.bits[self.cursor..self.cursor + 8]
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
        self.cursor += 8;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, StegoError> {
        // 先整体检查，避免读到一半才失败
        self.ensure_remaining(n.saturating_mul(8))?;
        (0..n).map(|_| self.read_byte()).collect()
    }

    pub fn read_u32_be(&mut self) -> Result<u32, StegoError> {
        self.ensure_remaining(32)?;
        let mut word = [0u8; 4];
        for byte in word.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(u32::from_be_bytes(word))
    }

    fn ensure_remaining(&self, requested: usize) -> Result<(), StegoError> {
        let remaining = self.remaining();
        if requested > remaining {
            return Err(StegoError::Underrun {
                requested,
                remaining,
            });
        }
        Ok(())
    }
}

impl From<Vec<bool>> for BitStream {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits, cursor: 0 }
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_written_msb_first() {
        let mut stream = BitStream::new();
        stream.write_byte(0b1010_0001);

        assert_eq!(
            stream.as_bits(),
            &[true, false, true, false, false, false, false, true]
        );
    }

    #[test]
    fn u32_is_written_big_endian() {
        let mut stream = BitStream::new();
        stream.write_u32_be(0x0102_0304);
        stream.rewind();

        assert_eq!(stream.read_bytes(4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn reads_follow_the_cursor() {
        let mut stream = BitStream::new();
        stream.write_bits([true, false]);
        stream.write_bytes(b"ok");
        stream.write_u32_be(4096);
        stream.rewind();

        assert!(stream.read_bit().unwrap());
        assert_eq!(stream.read_bits(1).unwrap(), vec![false]);
        assert_eq!(stream.read_bytes(2).unwrap(), b"ok".to_vec());
        assert_eq!(stream.read_u32_be().unwrap(), 4096);
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    fn writing_inside_the_stream_overwrites_in_place() {
        let mut stream = BitStream::from(vec![false; 8]);
        stream.write_bit(true);

        assert_eq!(stream.len(), 8);
        assert_eq!(stream.position(), 1);
        assert!(stream.as_bits()[0]);
    }

    #[test]
    fn reading_past_the_end_is_an_underrun() {
        let mut stream = BitStream::from(vec![true; 12]);
        stream.read_byte().unwrap();

        let err = stream.read_byte().unwrap_err();
        assert!(matches!(
            err,
            StegoError::Underrun {
                requested: 8,
                remaining: 4
            }
        ));
        // 失败的读取不移动游标
        assert_eq!(stream.position(), 8);
        assert!(stream.read_u32_be().is_err());
        assert!(stream.read_bits(5).is_err());
        assert_eq!(stream.read_bits(4).unwrap().len(), 4);
        assert!(stream.read_bit().is_err());
    }
}
