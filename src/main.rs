use clap::Parser;

use stealth_png::{
    cli::{Cli, Commands},
    handler::{handle_embed, handle_extract, handle_inspect},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的子命令
/// (`embed`、`extract` 或 `inspect`) 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 默认只输出警告，可通过 RUST_LOG 调整
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Embed(args) => handle_embed(args),
        Commands::Extract(args) => handle_extract(args),
        Commands::Inspect(args) => handle_inspect(args),
    }
}
