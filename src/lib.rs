//! # stealth_png 库
//!
//! 在无损图像 alpha 通道最低有效位中嵌入、提取经 gzip 压缩的 JSON 元数据。
//!
//! ```no_run
//! use serde_json::{Value, json};
//! use stealth_png::steganography::{embed, extract};
//!
//! let mut image = image::open("input.png")?.to_rgba8();
//! embed(&mut image, &json!({"msg": "hi"}))?;
//! let document: Option<Value> = extract(&image)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// 声明库包含的所有模块。

pub mod bitstream;
pub mod cli;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod handler;
pub mod steganography;

pub use error::{FrameDefect, StegoError};
pub use steganography::{embed, extract, probe};
