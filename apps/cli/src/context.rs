//! 命令共享的上下文：配置文件与后端加载

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use posetrack_backend::sim::{SimBackend, SimNetwork, SimScenario, SimSessionFactory};
use posetrack_backend::{NetworkService, TrackingService};
use posetrack_tools::{FileConfigStore, Settings, default_settings_path};
use tracing::debug;

pub struct AppContext {
    settings_path: PathBuf,
    scenario_path: Option<PathBuf>,
}

/// 已加载的后端及其网络
pub struct Connection {
    pub backend: SimBackend,
    pub network: SimNetwork,
    pub factory: SimSessionFactory,
}

impl AppContext {
    pub fn new(settings_path: Option<PathBuf>, scenario_path: Option<PathBuf>) -> Result<Self> {
        let settings_path = match settings_path {
            Some(path) => path,
            None => default_settings_path()?,
        };
        debug!("Using settings file {}", settings_path.display());
        Ok(Self {
            settings_path,
            scenario_path,
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn open_store(&self) -> Result<FileConfigStore> {
        FileConfigStore::open(&self.settings_path)
            .with_context(|| format!("Failed to read {}", self.settings_path.display()))
    }

    fn scenario(&self) -> Result<SimScenario> {
        match &self.scenario_path {
            Some(path) => SimScenario::load(path)
                .with_context(|| format!("Failed to load scenario {}", path.display())),
            None => Ok(SimScenario::default()),
        }
    }

    /// 加载网络/追踪/空间服务（失败即终止）
    pub fn load_backend(&self, settings: &Settings) -> Result<SimBackend> {
        let backend =
            SimBackend::load(self.scenario()?).context("Failed to load the tracking SDK")?;

        let verbosity = settings.verbosity()?;
        NetworkService::set_log_verbosity(&backend, verbosity);
        TrackingService::set_log_verbosity(&backend, verbosity);
        Ok(backend)
    }

    /// 加载后端并创建网络与会话构造器
    pub fn connect(&self, settings: &Settings) -> Result<Connection> {
        let backend = self.load_backend(settings)?;
        let filter = settings.filter()?;
        let network = backend
            .create_network(filter)
            .with_context(|| format!("Failed to create network for {}", filter))?;
        let factory = backend
            .session_factory(&network)
            .context("Failed to create session factory")?;
        Ok(Connection {
            backend,
            network,
            factory,
        })
    }
}
