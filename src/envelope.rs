//! # 压缩与序列化封装
//!
//! 文档 → UTF-8 JSON 文本 → gzip 压缩字节，以及反向过程。
//! 使用 gzip 容器格式，以便与其他工具生成的图像互通。

use crate::error::StegoError;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// 将文档序列化为紧凑 JSON 并进行 gzip 压缩。
pub fn serialize<T: Serialize + ?Sized>(document: &T) -> Result<Vec<u8>, StegoError> {
    let json = serde_json::to_vec(document).map_err(StegoError::Serialization)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(StegoError::Compression)?;
    encoder.finish().map_err(StegoError::Compression)
}

/// 解压 gzip 字节并解析为文档。
///
/// # Errors
///
/// * 解压失败时返回 [`StegoError::Decompression`]。
/// * 解压结果不是合法 JSON 时返回 [`StegoError::MalformedPayload`]。
pub fn deserialize<T: DeserializeOwned>(payload: &[u8]) -> Result<T, StegoError> {
    let mut json = Vec::new();
    GzDecoder::new(payload)
        .read_to_end(&mut json)
        .map_err(StegoError::Decompression)?;

    serde_json::from_slice(&json).map_err(StegoError::MalformedPayload)
}

/// 如果文档顶层的 `field` 是一段 JSON 文本，就原地替换成解析后的值。
///
/// 返回是否发生了替换；字段缺失、不是字符串或不是合法 JSON 时保持原样。
pub fn expand_json_field(document: &mut serde_json::Value, field: &str) -> bool {
    let Some(slot) = document.get_mut(field) else {
        return false;
    };
    let Some(text) = slot.as_str() else {
        return false;
    };
    match serde_json::from_str(text) {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_is_a_gzip_stream() {
        let payload = serialize(&json!({"msg": "hi"})).unwrap();
        assert_eq!(&payload[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn all_json_value_kinds_round_trip() {
        let document = json!({
            "prompt": "masterpiece, 卧槽, ünïcødé",
            "steps": 28,
            "scale": 5.5,
            "seed": 1_234_567_890_123_i64,
            "tiny": 1.0e-300,
            "third": 0.1 + 0.2,
            "negative": -3,
            "flag": true,
            "off": false,
            "none": null,
            "nested": {"deep": {"list": [1, "two", 3.25, null, [false]]}},
            "empty": {},
            "tags": []
        });

        let restored: serde_json::Value = deserialize(&serialize(&document).unwrap()).unwrap();
        assert_eq!(restored, document);
    }

    #[test]
    fn typed_documents_round_trip() {
        #[derive(Debug, PartialEq, Serialize, serde::Deserialize)]
        struct Generation {
            prompt: String,
            steps: u32,
            cfg: f64,
        }

        let generation = Generation {
            prompt: "a cat".into(),
            steps: 20,
            cfg: 7.5,
        };
        let restored: Generation = deserialize(&serialize(&generation).unwrap()).unwrap();
        assert_eq!(restored, generation);
    }

    #[test]
    fn garbage_is_a_decompression_error() {
        let err = deserialize::<serde_json::Value>(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, StegoError::Decompression(_)));
    }

    #[test]
    fn non_json_text_is_malformed() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{not json").unwrap();
        let payload = encoder.finish().unwrap();

        let err = deserialize::<serde_json::Value>(&payload).unwrap_err();
        assert!(matches!(err, StegoError::MalformedPayload(_)));
    }

    #[test]
    fn comment_field_is_expanded_when_it_holds_json() {
        let mut document = json!({"Comment": "{\"steps\": 28, \"sampler\": \"k_euler\"}"});
        assert!(expand_json_field(&mut document, "Comment"));
        assert_eq!(document["Comment"]["steps"], 28);

        let mut plain = json!({"Comment": "just words"});
        assert!(!expand_json_field(&mut plain, "Comment"));
        assert_eq!(plain["Comment"], "just words");

        let mut missing = json!({"Title": "x"});
        assert!(!expand_json_field(&mut missing, "Comment"));
    }
}
