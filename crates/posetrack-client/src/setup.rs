//! 从本地配置存储构建 Environment 与 Placement
//!
//! - Environment 编码缺失或为空：致命错误（没有空间参考数据无法追踪）
//! - Placement 编码缺失或为空：警告并使用恒等变换
//! - 非空编码原样交给构建服务，结果不做任何变换

use posetrack_backend::{ConfigStore, SpatialService};
use posetrack_protocol::{Environment, Placement};
use tracing::{info, warn};

use crate::error::ClientError;

/// 配置存储中 Environment 编码的键名
pub const ENVIRONMENT_KEY: &str = "environment";
/// 配置存储中 Placement 编码的键名
pub const PLACEMENT_KEY: &str = "placement";

pub fn load_environment<S, C>(spatial: &S, store: &C) -> Result<Environment, ClientError>
where
    S: SpatialService + ?Sized,
    C: ConfigStore + ?Sized,
{
    let code = store.read_string(ENVIRONMENT_KEY, "");
    if code.trim().is_empty() {
        return Err(ClientError::MissingEnvironment);
    }

    let environment = spatial.environment_from_code(&code)?;
    info!(
        "Environment loaded with {} marker(s)",
        spatial.markers(&environment).len()
    );
    Ok(environment)
}

pub fn resolve_placement<S, C>(spatial: &S, store: &C) -> Result<Placement, ClientError>
where
    S: SpatialService + ?Sized,
    C: ConfigStore + ?Sized,
{
    let code = store.read_string(PLACEMENT_KEY, "");
    if code.trim().is_empty() {
        warn!("No placement code configured, using identity placement");
        return Ok(Placement::IDENTITY);
    }

    Ok(spatial.placement_from_code(&code)?)
}
