//! # Alpha 通道 LSB 隐写
//!
//! 每个像素的 alpha 通道最低位承载一个位，其余通道保持不变。
//! 像素按列优先顺序遍历：外层 x 从 0 到 width，内层 y 从 0 到 height。
//! 这个顺序是格式的一部分，嵌入和提取必须一致。

use crate::bitstream::BitStream;
use crate::constants::{HEADER_BITS, MAGIC_BITS};
use crate::envelope;
use crate::error::StegoError;
use crate::frame::{decode_frame, encode_frame, has_magic};
use image::RgbaImage;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 图像能承载的总位数，即像素数。
pub fn capacity(image: &RgbaImage) -> usize {
    image.width() as usize * image.height() as usize
}

/// 图像能承载的最大载荷字节数 (扣除帧头)。
pub fn payload_capacity(image: &RgbaImage) -> usize {
    capacity(image).saturating_sub(HEADER_BITS) / 8
}

/// 按列优先顺序逐个产出 alpha 通道的最低位。
pub fn alpha_bits(image: &RgbaImage) -> impl Iterator<Item = bool> + '_ {
    let (width, height) = image.dimensions();
    (0..width).flat_map(move |x| (0..height).map(move |y| image.get_pixel(x, y)[3] & 1 == 1))
}

/// 读取全部像素的 alpha 最低位，长度恒为 `width * height`。
pub fn read_alpha_lsb(image: &RgbaImage) -> BitStream {
    alpha_bits(image).collect()
}

/// 把位流写入 alpha 最低位，不足的部分补零，每个像素都会被写到。
///
/// # Errors
///
/// 位流长于像素数时返回 [`StegoError::InsufficientCapacity`]，此时图像不会被修改。
pub fn write_alpha_lsb(image: &mut RgbaImage, bits: &BitStream) -> Result<(), StegoError> {
    let available = capacity(image);
    if bits.len() > available {
        return Err(StegoError::InsufficientCapacity {
            required: bits.len(),
            available,
        });
    }

    let (width, height) = image.dimensions();
    let mut source = bits.as_bits().iter().copied().chain(std::iter::repeat(false));
    for x in 0..width {
        for y in 0..height {
            let bit = source.next().unwrap_or(false);
            let alpha = &mut image.get_pixel_mut(x, y)[3];
            *alpha = (*alpha & !1) | u8::from(bit);
        }
    }

    Ok(())
}

/// 将文档压缩后嵌入图像，原地修改像素。
///
/// # Errors
///
/// * 帧长度超过像素数时返回 [`StegoError::InsufficientCapacity`]，图像保持不变。
/// * 文档无法序列化或压缩时返回相应错误。
pub fn embed<T: Serialize + ?Sized>(image: &mut RgbaImage, document: &T) -> Result<(), StegoError> {
    let payload = envelope::serialize(document)?;
    let frame = encode_frame(&payload)?;
    debug!(
        "embedding {} frame bits into {}x{} image ({} bits available)",
        frame.len(),
        image.width(),
        image.height(),
        capacity(image)
    );
    write_alpha_lsb(image, &frame)
}

/// 从图像中提取隐藏的文档。
///
/// 只遍历一次像素；魔数不匹配时直接返回 `Ok(None)`。
///
/// # Errors
///
/// 魔数存在但帧损坏、无法解压或不是合法 JSON 时返回相应错误。
pub fn extract<T: DeserializeOwned>(image: &RgbaImage) -> Result<Option<T>, StegoError> {
    let mut bits = read_alpha_lsb(image);
    match decode_frame(&mut bits)? {
        Some(payload) => envelope::deserialize(&payload).map(Some),
        None => Ok(None),
    }
}

/// 只读取前 120 个像素，判断图像是否带有隐写帧。
pub fn probe(image: &RgbaImage) -> bool {
    let prefix: Vec<bool> = alpha_bits(image).take(MAGIC_BITS).collect();
    let found = has_magic(&prefix);
    debug!("probe: magic token {}", if found { "present" } else { "absent" });
    found
}
