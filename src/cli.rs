//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 在无损图像 alpha 通道的最低有效位中嵌入或提取经 gzip 压缩的 JSON 元数据 (stealth_pngcomp 格式)。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "在无损图像 alpha 通道的最低有效位中嵌入或提取经 gzip 压缩的 JSON 元数据。\n兼容部分图像生成工具使用的 stealth_pngcomp 隐写格式。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：embed (嵌入)、extract (提取) 和 inspect (检查)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将 JSON 文档嵌入图像的 alpha 通道。
    Embed(EmbedArgs),

    /// 从图像的 alpha 通道中提取隐藏的 JSON 文档。
    Extract(ExtractArgs),

    /// 显示图像的基本信息，并检查其中是否带有隐写数据。
    Inspect(InspectArgs),
}

/// 'embed' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// 载体图像文件路径 (PNG, BMP, TIFF, WebP, QOI)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要嵌入的 JSON 文档路径。
    #[arg(short, long)]
    pub json: PathBuf,

    /// 输出图像路径，必须是无损格式。默认为输入图像旁的 `doctored_<name>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 带有隐写数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存提取结果的 JSON 文件路径。默认为图像旁的 `recovered_<name>.json`。
    #[arg(short, long, conflicts_with = "stdout")]
    pub json: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 如果 `Comment` 字段是一段 JSON 文本，将其展开为嵌套对象。
    #[arg(short = 'c', long)]
    pub expand_comment: bool,

    /// 直接打印到标准输出，不写文件。
    #[arg(long)]
    pub stdout: bool,
}

/// 'inspect' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
