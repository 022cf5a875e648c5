//! 参考标记列表命令

use anyhow::Result;
use clap::Args;
use posetrack_backend::SpatialService;
use posetrack_client::{format_significant, report::SIGNIFICANT_DIGITS, setup};

use crate::context::AppContext;

/// 参考标记列表命令参数
#[derive(Args, Debug)]
pub struct MarkersCommand {}

impl MarkersCommand {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        let store = ctx.open_store()?;
        let backend = ctx.load_backend(store.settings())?;
        let environment = setup::load_environment(&backend, &store)?;

        let f = |v: f64| format_significant(v, SIGNIFICANT_DIGITS);
        let markers = backend.markers(&environment);
        println!("Environment has {} marker(s):", markers.len());
        for marker in markers {
            let p = marker.position;
            println!("  {:>4}: ({}, {}, {})", marker.id, f(p.x), f(p.y), f(p.z));
        }
        Ok(())
    }
}
