mod cli;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use md5_tree::config::Config;
use md5_tree::utils::format_listing;
use md5_tree::TreeDigester;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，输出到 stderr，不干扰摘要列表
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // 加载配置
    let mut config = if let Some(config_path) = &cli.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_or_default()?
    };

    // 命令行参数优先于配置文件
    if cli.recursive {
        config.digest.recursive = true;
    }
    if let Some(workers) = cli.workers {
        config.digest.workers = usize::from(workers);
    }

    let digester = TreeDigester::new(&config.digest);
    let map = digester.digest_all(&cli.path).await?;

    for line in format_listing(&map) {
        println!("{}", line);
    }

    Ok(())
}
