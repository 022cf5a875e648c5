//! 脚本化的假网络
//!
//! 按预设序列返回修订号；每个修订号对应一份设备列表。序列读完后重复最后一个值。

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use posetrack_backend::{BackendError, DeviceNetwork, SessionFactory, TrackingSession};
use posetrack_protocol::{
    DeviceHandle, DeviceProperty, DeviceStatus, Environment, Placement, PoseReading, Revision,
};

pub struct ScriptedNetwork {
    revisions: RefCell<VecDeque<Revision>>,
    current: Cell<Revision>,
    devices: HashMap<Revision, Vec<(DeviceHandle, DeviceStatus)>>,
    enumerations: RefCell<Vec<Revision>>,
}

impl ScriptedNetwork {
    pub fn new(revisions: impl IntoIterator<Item = Revision>) -> Self {
        Self {
            revisions: RefCell::new(revisions.into_iter().collect()),
            current: Cell::new(0),
            devices: HashMap::new(),
            enumerations: RefCell::new(Vec::new()),
        }
    }

    pub fn devices_at(
        mut self,
        revision: Revision,
        devices: Vec<(DeviceHandle, DeviceStatus)>,
    ) -> Self {
        self.devices.insert(revision, devices);
        self
    }

    /// 每次枚举发生时的修订号
    pub fn enumerations(&self) -> Vec<Revision> {
        self.enumerations.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.revisions.borrow().len()
    }

    fn current_devices(&self) -> &[(DeviceHandle, DeviceStatus)] {
        self.devices
            .get(&self.current.get())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl DeviceNetwork for ScriptedNetwork {
    fn revision(&self) -> Revision {
        if let Some(next) = self.revisions.borrow_mut().pop_front() {
            self.current.set(next);
        }
        self.current.get()
    }

    fn device_status(&self, device: DeviceHandle) -> DeviceStatus {
        self.current_devices()
            .iter()
            .find(|(d, _)| *d == device)
            .map(|(_, s)| *s)
            .unwrap_or(DeviceStatus::Unknown)
    }

    fn string_property(&self, device: DeviceHandle, property: DeviceProperty) -> Option<String> {
        match property {
            DeviceProperty::SerialNumber => Some(format!("SN-{}", device.0)),
            _ => None,
        }
    }
}

/// 读取 `readings` 次后结束的会话
pub struct CountingSession {
    pub readings: u32,
}

impl TrackingSession for CountingSession {
    fn is_finished(&self) -> bool {
        self.readings == 0
    }

    fn raw_pose(&mut self) -> PoseReading {
        self.extrapolated_pose(&Placement::IDENTITY, Duration::ZERO)
    }

    fn extrapolated_pose(&mut self, placement: &Placement, _: Duration) -> PoseReading {
        self.readings -= 1;
        PoseReading::new(
            posetrack_protocol::StabilityStage::Stable,
            placement.position,
            placement.rotation,
        )
    }

    fn release(&mut self) {}
}

impl SessionFactory for ScriptedNetwork {
    type Session = CountingSession;

    fn supported_devices(&self) -> Vec<DeviceHandle> {
        self.enumerations.borrow_mut().push(self.current.get());
        self.current_devices().iter().map(|(d, _)| *d).collect()
    }

    fn start(&self, _: DeviceHandle, _: &Environment) -> Result<CountingSession, BackendError> {
        Ok(CountingSession { readings: 3 })
    }
}
