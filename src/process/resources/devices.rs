/*!
 * I/O Device Tokens
 * Named, exclusively held device capabilities
 */

use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Named device with an availability flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceToken {
    pub name: String,
    pub available: bool,
    pub holder: Option<Pid>,
}

impl DeviceToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: true,
            holder: None,
        }
    }
}

/// Why a device request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceDenial {
    Unknown,
    Busy(Pid),
}

/// Device pool, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceToken>,
}

impl DeviceRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            devices: names.into_iter().map(DeviceToken::new).collect(),
        }
    }

    /// Register a device; returns false if the name is taken
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.devices.push(DeviceToken::new(name));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&DeviceToken> {
        self.devices.iter().find(|d| d.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut DeviceToken> {
        self.devices.iter_mut().find(|d| d.name == name)
    }

    /// Hand the device to `pid`
    ///
    /// A request from the current holder succeeds without changing anything.
    pub fn acquire(&mut self, name: &str, pid: Pid) -> Result<(), DeviceDenial> {
        let device = self.get_mut(name).ok_or(DeviceDenial::Unknown)?;
        match device.holder {
            Some(holder) if holder == pid => Ok(()),
            Some(holder) => Err(DeviceDenial::Busy(holder)),
            None => {
                device.available = false;
                device.holder = Some(pid);
                debug!(device = name, pid, "Device acquired");
                Ok(())
            }
        }
    }

    /// Return the device to the pool if `pid` holds it
    pub fn release(&mut self, name: &str, pid: Pid) -> bool {
        match self.get_mut(name) {
            Some(device) if device.holder == Some(pid) => {
                device.available = true;
                device.holder = None;
                debug!(device = name, pid, "Device released");
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceToken> {
        self.devices.iter()
    }

    pub fn snapshot(&self) -> Vec<DeviceToken> {
        self.devices.clone()
    }
}
