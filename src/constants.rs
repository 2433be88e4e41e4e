/// 隐写帧开头的魔数，共 15 个 ASCII 字节。
/// 提取时先比对这串字节，不匹配即视为图像中没有隐藏数据。
pub const MAGIC: &[u8; 15] = b"stealth_pngcomp";

/// 魔数占用的位数 (15 字节 × 8)。
pub const MAGIC_BITS: usize = MAGIC.len() * 8;

/// 长度字段占用的位数。
/// 长度字段是大端序 `u32`，记录的是载荷的 **位数** 而不是字节数。
pub const LENGTH_FIELD_BITS: usize = 32;

/// 帧头 (魔数 + 长度字段) 的总位数。
pub const HEADER_BITS: usize = MAGIC_BITS + LENGTH_FIELD_BITS;

/// 可以安全保存隐写结果的无损格式扩展名。
/// 有损编码会破坏 alpha 通道的最低有效位。
pub const LOSSLESS_EXTENSIONS: &[&str] = &["png", "bmp", "tif", "tiff", "webp", "qoi"];

/// 嵌入命令默认输出文件名的前缀。
pub const EMBED_OUTPUT_PREFIX: &str = "doctored_";

/// 提取命令默认输出文件名的前缀。
pub const EXTRACT_OUTPUT_PREFIX: &str = "recovered_";

/// 生成参数中以 JSON 文本形式嵌套保存的字段名。
pub const COMMENT_FIELD: &str = "Comment";
