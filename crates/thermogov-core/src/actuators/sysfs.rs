//! SysfsCoolingActuator — drives `cooling_device<N>/cur_state` files under
//! the kernel's thermal class directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::actuator::CoolingActuator;
use crate::classifier::CoolingState;
use crate::error::ActuationError;
use crate::zone::DeviceId;

pub const DEFAULT_COOLING_ROOT: &str = "/sys/devices/virtual/thermal";

#[derive(Debug, Clone)]
pub struct SysfsCoolingActuator {
    root: PathBuf,
}

impl SysfsCoolingActuator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/cooling_device<id>/cur_state`.
    pub fn state_path(&self, device: DeviceId) -> PathBuf {
        self.root
            .join(format!("cooling_device{device}"))
            .join("cur_state")
    }
}

impl Default for SysfsCoolingActuator {
    fn default() -> Self {
        Self::new(DEFAULT_COOLING_ROOT)
    }
}

impl CoolingActuator for SysfsCoolingActuator {
    fn apply(&mut self, device: DeviceId, state: CoolingState) -> Result<(), ActuationError> {
        let path = self.state_path(device);
        log::debug!("echo {} > {}", state.sysfs_value(), path.display());

        // Existing attribute only: never create files in the sysfs tree.
        let result = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .and_then(|mut file| file.write_all(state.sysfs_value().as_bytes()));

        result.map_err(|source| ActuationError {
            device,
            path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_device(root: &Path, id: u64) -> PathBuf {
        let dir = root.join(format!("cooling_device{id}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cur_state");
        std::fs::write(&path, "0\n").unwrap();
        path
    }

    #[test]
    fn state_path_layout() {
        let act = SysfsCoolingActuator::default();
        assert_eq!(
            act.state_path(DeviceId(4)),
            PathBuf::from("/sys/devices/virtual/thermal/cooling_device4/cur_state")
        );
    }

    #[test]
    fn writes_one_and_zero() {
        let root = tempfile::tempdir().unwrap();
        let path = fake_device(root.path(), 3);
        let mut act = SysfsCoolingActuator::new(root.path());

        act.apply(DeviceId(3), CoolingState::On).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1");

        act.apply(DeviceId(3), CoolingState::Off).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0");
    }

    #[test]
    fn missing_device_reports_failure() {
        let root = tempfile::tempdir().unwrap();
        let mut act = SysfsCoolingActuator::new(root.path());
        let err = act.apply(DeviceId(6), CoolingState::On).unwrap_err();
        assert_eq!(err.device, DeviceId(6));
        assert!(err.path.ends_with("cooling_device6/cur_state"));
        assert!(!err.path.exists());
    }
}
