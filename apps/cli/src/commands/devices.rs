//! 设备列表命令

use anyhow::Result;
use clap::Args;
use posetrack_backend::{DeviceNetwork, SessionFactory};
use posetrack_protocol::{DeviceHandle, DeviceProperty, DeviceStatus};
use serde::Serialize;

use crate::context::AppContext;

/// 设备列表命令参数
#[derive(Args, Debug)]
pub struct DevicesCommand {
    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DeviceRow {
    handle: u64,
    status: &'static str,
    serial: Option<String>,
    product: Option<String>,
    firmware: Option<String>,
}

fn describe<N: DeviceNetwork>(network: &N, device: DeviceHandle) -> DeviceRow {
    DeviceRow {
        handle: device.0,
        status: network.device_status(device).label(),
        serial: network.string_property(device, DeviceProperty::SerialNumber),
        product: network.string_property(device, DeviceProperty::ProductName),
        firmware: network.string_property(device, DeviceProperty::FirmwareVersion),
    }
}

impl DevicesCommand {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        let store = ctx.open_store()?;
        let conn = ctx.connect(store.settings())?;

        let rows: Vec<DeviceRow> = conn
            .factory
            .supported_devices()
            .into_iter()
            .map(|device| describe(&conn.network, device))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No supported devices found");
            return Ok(());
        }

        println!("Found {} device(s):", rows.len());
        for row in &rows {
            let idle = if row.status == DeviceStatus::Idle.label() { "*" } else { " " };
            println!(
                " {} #{:04x}  {:<9} {:<12} {} ({})",
                idle,
                row.handle,
                row.status,
                row.serial.as_deref().unwrap_or("-"),
                row.product.as_deref().unwrap_or("-"),
                row.firmware.as_deref().unwrap_or("-"),
            );
        }
        Ok(())
    }
}
