//! 配置管理命令
//!
//! 读写配置文件中的 Environment / Placement 编码、网络过滤器与 SDK 日志级别

use anyhow::{Result, bail};
use clap::Subcommand;
use posetrack_backend::SpatialService;
use posetrack_client::setup::{ENVIRONMENT_KEY, PLACEMENT_KEY};
use posetrack_protocol::{DeviceFilter, SdkVerbosity};

use crate::context::AppContext;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// Environment 编码
        #[arg(long)]
        environment: Option<String>,

        /// Placement 编码
        #[arg(long)]
        placement: Option<String>,

        /// 网络过滤器（all-usb 或 vid:pid）
        #[arg(long)]
        filter: Option<String>,

        /// SDK 日志级别（off/error/warn/info/debug/trace）
        #[arg(long)]
        verbosity: Option<String>,
    },

    /// 删除存储的编码
    Unset {
        /// 键名（environment / placement）
        key: String,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Set {
                environment,
                placement,
                filter,
                verbosity,
            } => Self::set_(ctx, environment, placement, filter, verbosity),

            ConfigCommand::Unset { key } => Self::unset_(ctx, &key),

            ConfigCommand::Get { key } => Self::get_(ctx, &key),

            ConfigCommand::Check => Self::check_(ctx),
        }
    }

    fn set_(
        ctx: &AppContext,
        environment: Option<String>,
        placement: Option<String>,
        filter: Option<String>,
        verbosity: Option<String>,
    ) -> Result<()> {
        let mut store = ctx.open_store()?;

        if let Some(code) = environment {
            println!("✅ environment = {}", code);
            store.set(ENVIRONMENT_KEY, code);
        }

        if let Some(code) = placement {
            println!("✅ placement = {}", code);
            store.set(PLACEMENT_KEY, code);
        }

        if let Some(filter) = filter {
            let parsed: DeviceFilter = filter.parse()?;
            println!("✅ network.filter = {}", parsed);
            store.settings_mut().network.filter = parsed.to_string();
        }

        if let Some(verbosity) = verbosity {
            verbosity.parse::<SdkVerbosity>()?;
            println!("✅ sdk.verbosity = {}", verbosity);
            store.settings_mut().sdk.verbosity = verbosity;
        }

        store.save()?;
        Ok(())
    }

    fn unset_(ctx: &AppContext, key: &str) -> Result<()> {
        let mut store = ctx.open_store()?;
        match store.remove(key) {
            Some(_) => {
                store.save()?;
                println!("✅ removed {}", key);
            },
            None => println!("{} was not set", key),
        }
        Ok(())
    }

    fn get_(ctx: &AppContext, key: &str) -> Result<()> {
        let store = ctx.open_store()?;
        let settings = store.settings();

        match key {
            ENVIRONMENT_KEY | PLACEMENT_KEY => {
                println!("{}", store.get(key).unwrap_or("(not set)"));
            },

            "filter" => println!("{}", settings.network.filter),

            "verbosity" => println!("{}", settings.sdk.verbosity),

            "all" => print!("{}", settings.to_toml_string()?),

            other => bail!("Unknown key {:?}", other),
        }

        Ok(())
    }

    fn check_(ctx: &AppContext) -> Result<()> {
        let store = ctx.open_store()?;
        let settings = store.settings();
        let mut problems = 0;

        println!("Settings file: {}", ctx.settings_path().display());

        match settings.filter() {
            Ok(filter) => println!("  filter:      {}", filter),
            Err(e) => {
                problems += 1;
                println!("  filter:      ❌ {}", e);
            },
        }

        match settings.verbosity() {
            Ok(v) => println!("  verbosity:   {:?}", v),
            Err(e) => {
                problems += 1;
                println!("  verbosity:   ❌ {}", e);
            },
        }

        let backend = ctx.load_backend(&Default::default())?;

        match store.get(ENVIRONMENT_KEY).filter(|c| !c.trim().is_empty()) {
            Some(code) => match backend.environment_from_code(code) {
                Ok(env) => println!("  environment: {} marker(s)", env.markers().len()),
                Err(e) => {
                    problems += 1;
                    println!("  environment: ❌ {}", e);
                },
            },
            None => {
                problems += 1;
                println!("  environment: ❌ not set (required)");
            },
        }

        match store.get(PLACEMENT_KEY).filter(|c| !c.trim().is_empty()) {
            Some(code) => match backend.placement_from_code(code) {
                Ok(p) => println!(
                    "  placement:   pos ({}, {}, {}) rot ({}, {}, {}, {})",
                    p.position.x,
                    p.position.y,
                    p.position.z,
                    p.rotation.x,
                    p.rotation.y,
                    p.rotation.z,
                    p.rotation.w
                ),
                Err(e) => {
                    problems += 1;
                    println!("  placement:   ❌ {}", e);
                },
            },
            None => println!("  placement:   not set (identity)"),
        }

        if problems > 0 {
            bail!("{} problem(s) found", problems);
        }
        Ok(())
    }
}
