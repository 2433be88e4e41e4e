//! # 命令处理逻辑模块
//!
//! 包含处理 `embed`、`extract` 和 `inspect` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{EmbedArgs, ExtractArgs, InspectArgs};
use crate::constants::{
    COMMENT_FIELD, EMBED_OUTPUT_PREFIX, EXTRACT_OUTPUT_PREFIX, LOSSLESS_EXTENSIONS,
};
use crate::envelope::expand_json_field;
use crate::error::StegoError;
use crate::steganography::{capacity, embed, extract, payload_capacity, probe};
use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use image::{ImageReader, RgbaImage};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// `inspect` 命令收集到的图像信息。
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    pub path: PathBuf,
    pub file_size: u64,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub capacity_bits: usize,
    pub payload_capacity_bytes: usize,
    pub has_hidden_data: bool,
}

impl ImageReport {
    /// 以 MB 为单位、保留两位小数的文件大小。
    pub fn file_size_mb(&self) -> String {
        format!("{:.2} MB", self.file_size as f64 / (1024.0 * 1024.0))
    }
}

/// 处理 'Embed' 命令的执行逻辑。
///
/// 负责检查输出路径、读取图像和 JSON 文档、调用隐写核心函数嵌入文档，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出路径不是无损格式，或目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或 JSON 文件，或 JSON 内容无效。
/// * 图像没有足够的像素来容纳整个帧。
/// * 无法写入到目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, EMBED_OUTPUT_PREFIX, "png"));

    ensure_lossless(&dest)?;
    ensure_writable(&dest, args.force)?;

    let mut picture = load_rgba(&args.image)?;

    let raw = fs::read(&args.json).with_context(|| {
        format!(
            "Unable to read JSON file: {}",
            args.json.to_string_lossy().red().bold()
        )
    })?;
    let document: Value = serde_json::from_slice(&raw).with_context(|| {
        format!(
            "The file {} does not contain a valid JSON document.",
            args.json.to_string_lossy().red().bold()
        )
    })?;

    embed(&mut picture, &document).map_err(|err| match err {
        StegoError::InsufficientCapacity {
            required,
            available,
        } => anyhow!(
            "Not enough space in the image to hide the document. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        other => anyhow::Error::new(other).context("Failed to embed the document into the image."),
    })?;

    picture.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The document has been successfully embedded and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、提取隐藏的 JSON 文档，
/// 然后将其写入目标文件或打印到标准输出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和选项的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有隐藏数据，或帧已损坏。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let dest = (!args.stdout).then(|| {
        args.json
            .clone()
            .unwrap_or_else(|| default_output_path(&args.image, EXTRACT_OUTPUT_PREFIX, "json"))
    });
    if let Some(dest) = &dest {
        ensure_writable(dest, args.force)?;
    }

    let picture = load_rgba(&args.image)?;

    let mut document: Value = extract(&picture)
        .with_context(|| {
            format!(
                "Failed to extract hidden data from '{}'. \nThe embedded frame appears to be corrupted.",
                args.image.to_string_lossy().red().bold()
            )
        })?
        .ok_or_else(|| {
            anyhow!(
                "No hidden data found in image: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    if args.expand_comment {
        expand_json_field(&mut document, COMMENT_FIELD);
    }

    let text = serde_json::to_string_pretty(&document)?;

    match dest {
        None => println!("{text}"),
        Some(dest) => {
            fs::write(&dest, text).with_context(|| {
                format!(
                    "Unable to write to target JSON file: {}",
                    dest.to_string_lossy().red().bold()
                )
            })?;

            println!(
                "The hidden document has been successfully extracted and saved: {}",
                dest.to_string_lossy().green().bold()
            );
        }
    }

    Ok(())
}

/// 处理 'Inspect' 命令的执行逻辑。
pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let report = inspect_image(&args.image)?;

    println!("{:<16}{}", "File:", report.path.to_string_lossy().bold());
    println!("{:<16}{}", "Size:", report.file_size_mb());
    println!("{:<16}{}", "Format:", report.format);
    println!("{:<16}{} x {}", "Dimensions:", report.width, report.height);
    println!("{:<16}{} bits", "Capacity:", report.capacity_bits);
    println!(
        "{:<16}{} bytes",
        "Max payload:", report.payload_capacity_bytes
    );
    let status = if report.has_hidden_data {
        "present".green().bold()
    } else {
        "absent".yellow().bold()
    };
    println!("{:<16}{}", "Hidden data:", status);

    Ok(())
}

/// 收集图像的文件信息、隐写容量，并探测是否带有隐写帧。
pub fn inspect_image(path: &Path) -> Result<ImageReport> {
    let file_size = fs::metadata(path)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .len();

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
    let format = reader
        .format()
        .map_or_else(|| "unknown".to_string(), |format| format!("{format:?}"));
    let picture = reader
        .decode()
        .with_context(|| {
            format!(
                "Unable to decode image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .to_rgba8();

    Ok(ImageReport {
        path: path.to_path_buf(),
        file_size,
        format,
        width: picture.width(),
        height: picture.height(),
        capacity_bits: capacity(&picture),
        payload_capacity_bytes: payload_capacity(&picture),
        has_hidden_data: probe(&picture),
    })
}

/// 打开图像并转换为 RGBA8 像素网格。
fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(picture.to_rgba8())
}

/// 在输入文件旁生成 `<prefix><stem>.<extension>` 形式的默认输出路径。
fn default_output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn ensure_lossless(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    anyhow::ensure!(
        LOSSLESS_EXTENSIONS.contains(&extension.as_str()),
        "Output file {} must use a lossless image format ({}).",
        path.to_string_lossy().red().bold(),
        LOSSLESS_EXTENSIONS.join(", ").green()
    );
    Ok(())
}
