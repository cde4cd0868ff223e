//! Built-in cooling-device actuators.

pub mod dry_run;
pub mod sysfs;

pub use dry_run::{DEFAULT_HISTORY, DryRunActuator};
pub use sysfs::SysfsCoolingActuator;
