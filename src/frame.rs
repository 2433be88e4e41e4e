//! # 帧编解码
//!
//! 位流上的帧格式：
//!
//! ```text
//! [15 bytes] 魔数 "stealth_pngcomp"
//! [ 4 bytes] 载荷位数 (大端序 u32)
//! [ N bytes] 载荷 (gzip 压缩后的 JSON)
//! ```
//!
//! 帧没有校验和，也没有填充；长度字段本身限定了读取范围。

use crate::bitstream::BitStream;
use crate::constants::{HEADER_BITS, MAGIC, MAGIC_BITS};
use crate::error::{FrameDefect, StegoError};
use log::{debug, warn};

/// 将载荷包装成完整的帧位流。
///
/// # Errors
///
/// 当载荷位数超出 `u32` 范围时返回 [`StegoError::PayloadTooLarge`]。
pub fn encode_frame(payload: &[u8]) -> Result<BitStream, StegoError> {
    let length = payload
        .len()
        .checked_mul(8)
        .and_then(|bits| u32::try_from(bits).ok())
        .ok_or(StegoError::PayloadTooLarge {
            bytes: payload.len(),
        })?;

    let mut stream = BitStream::with_capacity(HEADER_BITS + length as usize);
    stream.write_bytes(MAGIC);
    stream.write_u32_be(length);
    stream.write_bytes(payload);

    debug!(
        "encoded frame: {} payload bytes, {} bits total",
        payload.len(),
        stream.len()
    );
    Ok(stream)
}

/// 只检查位流开头是否是魔数，不消耗游标。
///
/// 位流短于魔数时返回 `false`。
pub fn has_magic(bits: &[bool]) -> bool {
    let mut probe: BitStream = bits.iter().take(MAGIC_BITS).copied().collect();
    probe
        .read_bytes(MAGIC.len())
        .is_ok_and(|magic| magic.as_slice() == MAGIC.as_slice())
}

/// 从位流的游标位置解析一帧。
///
/// 魔数不匹配时返回 `Ok(None)`，表示没有隐藏数据；
/// 魔数匹配但长度字段无效时返回 [`StegoError::CorruptFrame`]。
pub fn decode_frame(stream: &mut BitStream) -> Result<Option<Vec<u8>>, StegoError> {
    let Ok(magic) = stream.read_bytes(MAGIC.len()) else {
        debug!("carrier holds {} bits, too short for a magic token", stream.remaining());
        return Ok(None);
    };
    if magic.as_slice() != MAGIC.as_slice() {
        debug!("magic token mismatch, no hidden data");
        return Ok(None);
    }

    let length = stream.read_u32_be().map_err(|_| {
        warn!("magic token found but the length field is truncated");
        FrameDefect::TruncatedHeader {
            available: stream.len(),
        }
    })?;

    if length % 8 != 0 {
        warn!("magic token found but length field {length} is not byte aligned");
        return Err(FrameDefect::MisalignedLength { length }.into());
    }

    let remaining = stream.remaining();
    if length as usize > remaining {
        warn!("magic token found but length field {length} exceeds {remaining} carrier bits");
        return Err(FrameDefect::LengthExceedsCarrier { length, remaining }.into());
    }

    let payload = stream.read_bytes(length as usize / 8)?;
    debug!("decoded frame with {} payload bytes", payload.len());
    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_starts_with_magic_and_bit_length() {
        let mut stream = encode_frame(b"abc").unwrap();
        assert_eq!(stream.len(), HEADER_BITS + 24);

        stream.rewind();
        assert_eq!(stream.read_bytes(15).unwrap(), MAGIC.to_vec());
        assert_eq!(stream.read_u32_be().unwrap(), 24);
        assert_eq!(stream.read_bytes(3).unwrap(), b"abc".to_vec());
    }

    #[test]
    fn decode_ignores_trailing_padding() {
        let mut stream = encode_frame(b"payload").unwrap();
        stream.write_bits(std::iter::repeat_n(false, 100));
        stream.rewind();

        assert_eq!(decode_frame(&mut stream).unwrap(), Some(b"payload".to_vec()));
    }

    #[test]
    fn wrong_magic_is_absent_not_an_error() {
        let mut stream = BitStream::from(vec![false; 512]);
        assert_eq!(decode_frame(&mut stream).unwrap(), None);

        let mut short = BitStream::from(vec![true; 40]);
        assert_eq!(decode_frame(&mut short).unwrap(), None);
    }

    #[test]
    fn has_magic_only_looks_at_the_prefix() {
        let stream = encode_frame(&[0xff; 4]).unwrap();
        assert!(has_magic(stream.as_bits()));
        assert!(has_magic(&stream.as_bits()[..MAGIC_BITS]));
        assert!(!has_magic(&stream.as_bits()[..MAGIC_BITS - 1]));
        assert!(!has_magic(&[false; 200]));
    }

    fn frame_with_length(length: u32, payload_bits: usize) -> BitStream {
        let mut stream = BitStream::new();
        stream.write_bytes(MAGIC);
        stream.write_u32_be(length);
        stream.write_bits(std::iter::repeat_n(true, payload_bits));
        stream.rewind();
        stream
    }

    #[test]
    fn misaligned_length_is_corrupt() {
        let mut stream = frame_with_length(13, 64);
        assert!(matches!(
            decode_frame(&mut stream),
            Err(StegoError::CorruptFrame(FrameDefect::MisalignedLength { length: 13 }))
        ));
    }

    #[test]
    fn oversized_length_is_corrupt() {
        let mut stream = frame_with_length(72, 64);
        assert!(matches!(
            decode_frame(&mut stream),
            Err(StegoError::CorruptFrame(FrameDefect::LengthExceedsCarrier {
                length: 72,
                remaining: 64
            }))
        ));

        let mut stream = frame_with_length(u32::MAX - 7, 64);
        assert!(decode_frame(&mut stream).is_err());
    }

    #[test]
    fn truncated_length_field_is_corrupt() {
        let mut stream = BitStream::new();
        stream.write_bytes(MAGIC);
        stream.write_bytes(&[0, 0]);
        stream.rewind();

        assert!(matches!(
            decode_frame(&mut stream),
            Err(StegoError::CorruptFrame(FrameDefect::TruncatedHeader { available: 136 }))
        ));
    }

    #[test]
    fn empty_payload_round_trips() {
        let mut stream = encode_frame(&[]).unwrap();
        stream.rewind();
        assert_eq!(decode_frame(&mut stream).unwrap(), Some(Vec::new()));
    }
}
