//! # 错误类型
//!
//! [`StegoError`] 覆盖编解码核心的全部失败情况。
//! “图像中没有隐藏数据” 不是错误，由 `Ok(None)` 表示。

use std::io;
use thiserror::Error;

/// 隐写编解码过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 位流中剩余的位数不足以完成本次读取。
    #[error("bit stream underrun: requested {requested} bits, {remaining} remaining")]
    Underrun { requested: usize, remaining: usize },

    /// 魔数匹配，但帧结构已损坏。
    #[error("corrupt frame: {0}")]
    CorruptFrame(FrameDefect),

    /// 载荷的位数超出了 32 位长度字段的表示范围。
    #[error("payload of {bytes} bytes does not fit the 32-bit length field")]
    PayloadTooLarge { bytes: usize },

    /// 图像像素数不足以容纳整个帧。
    #[error("insufficient capacity: frame needs {required} bits, image provides {available}")]
    InsufficientCapacity { required: usize, available: usize },

    /// 文档无法序列化为 JSON。
    #[error("failed to serialize document: {0}")]
    Serialization(#[source] serde_json::Error),

    /// gzip 压缩失败。
    #[error("failed to compress payload: {0}")]
    Compression(#[source] io::Error),

    /// gzip 解压失败。
    #[error("failed to decompress payload: {0}")]
    Decompression(#[source] io::Error),

    /// 解压后的内容不是合法的 JSON 文档。
    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

/// 帧损坏的具体原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameDefect {
    #[error("carrier ends inside the frame header ({available} bits available)")]
    TruncatedHeader { available: usize },

    #[error("length field {length} is not a whole number of bytes")]
    MisalignedLength { length: u32 },

    #[error("length field {length} exceeds the {remaining} bits left in the carrier")]
    LengthExceedsCarrier { length: u32, remaining: usize },
}

impl From<FrameDefect> for StegoError {
    fn from(defect: FrameDefect) -> Self {
        Self::CorruptFrame(defect)
    }
}
