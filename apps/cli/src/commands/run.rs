//! 追踪命令：获取设备 -> 打印位姿 -> 重新获取

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use posetrack_client::{PoseSource, SessionConfig, StopSignal, Tracker, setup};
use posetrack_tools::SessionSettings;
use tracing::info;

use crate::context::AppContext;

/// 追踪命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 完成指定数量的会话后退出（默认无限循环）
    #[arg(long)]
    pub max_sessions: Option<u64>,

    /// 输出间隔（毫秒，覆盖配置）
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// 外推时长（毫秒，覆盖配置）
    #[arg(long)]
    pub horizon_ms: Option<u64>,

    /// 输出原始位姿（不外推、不应用 Placement）
    #[arg(long)]
    pub raw: bool,

    /// 同时输出惯性数据初始化阶段的读数
    #[arg(long)]
    pub show_initialization: bool,
}

impl RunCommand {
    fn session_config(&self, settings: &SessionSettings) -> SessionConfig {
        SessionConfig {
            horizon: Duration::from_millis(self.horizon_ms.unwrap_or(settings.horizon_ms)),
            interval: Duration::from_millis(self.interval_ms.unwrap_or(settings.interval_ms)),
            skip_initialization: settings.skip_initialization && !self.show_initialization,
            source: if self.raw || settings.raw {
                PoseSource::Raw
            } else {
                PoseSource::Extrapolated
            },
        }
    }

    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        let store = ctx.open_store()?;
        let settings = store.settings();
        let conn = ctx.connect(settings)?;

        let environment = setup::load_environment(&conn.backend, &store).with_context(|| {
            format!(
                "Set one with `posetrack-cli config set --environment <CODE>` ({})",
                ctx.settings_path().display()
            )
        })?;
        let placement = setup::resolve_placement(&conn.backend, &store)
            .context("Invalid placement code")?;

        let stop = StopSignal::new();
        let handler = stop.clone();
        ctrlc::set_handler(move || handler.raise()).context("Failed to install Ctrl-C handler")?;

        let mut tracker = Tracker::new(conn.network, conn.factory, environment, placement)
            .with_session_config(self.session_config(&settings.session));

        info!("Waiting for an idle tracking device (Ctrl-C to exit)");
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let completed = tracker.run(&mut out, &stop, self.max_sessions)?;

        info!("{} session(s) completed", completed);
        Ok(())
    }
}
