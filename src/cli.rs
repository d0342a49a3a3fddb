use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "md5tree")]
#[command(about = "计算目录下每个普通文件的 MD5 摘要")]
#[command(version)]
pub struct Cli {
    /// 要计算的根目录
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// 递归进入子目录
    #[arg(short, long)]
    pub recursive: bool,

    /// 并发摘要任务数 (覆盖配置文件)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,
}
