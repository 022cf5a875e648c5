//! # Posetrack CLI
//!
//! 追踪 SDK 的命令行示例客户端：等待空闲设备，启动追踪任务，按固定节拍打印位姿。
//!
//! ```bash
//! # 配置 Environment / Placement 编码
//! posetrack-cli config set --environment "1@0,0,2.5|2@1.5,0,2.5" --placement "0,0,0.1;0,0,0,1"
//!
//! # 无限循环：获取设备 -> 打印位姿 -> 会话结束后重新获取（Ctrl-C 退出）
//! posetrack-cli run
//!
//! # 查看设备与标记
//! posetrack-cli devices
//! posetrack-cli markers
//! ```
//!
//! 位姿输出到 stdout，日志输出到 stderr（`RUST_LOG` 控制级别）。

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;

use commands::{ConfigCommand, DevicesCommand, MarkersCommand, RunCommand};
use context::AppContext;

/// Posetrack CLI - 追踪 SDK 命令行工具
#[derive(Parser, Debug)]
#[command(name = "posetrack-cli")]
#[command(about = "Poll a motion-tracking SDK and print pose data", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/posetrack/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 模拟场景文件（TOML，默认使用内置演示场景）
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 获取设备并持续打印位姿
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 列出追踪子系统支持的设备
    Devices {
        #[command(flatten)]
        args: DevicesCommand,
    },

    /// 列出 Environment 中的参考标记
    Markers {
        #[command(flatten)]
        args: MarkersCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志（stderr，避免与位姿输出混在一起）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("posetrack_cli=info".parse()?)
                .add_directive("posetrack_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config, cli.scenario)?;

    match cli.command {
        Commands::Run { args } => args.execute(&ctx),
        Commands::Devices { args } => args.execute(&ctx),
        Commands::Markers { args } => args.execute(&ctx),
        Commands::Config(cmd) => cmd.execute(&ctx),
    }
}
