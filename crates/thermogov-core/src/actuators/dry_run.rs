//! DryRunActuator — logs commands instead of touching hardware.

use std::collections::VecDeque;

use crate::actuator::CoolingActuator;
use crate::classifier::{Command, CoolingState};
use crate::error::ActuationError;
use crate::zone::DeviceId;

/// Commands kept by [`DryRunActuator::new`].
pub const DEFAULT_HISTORY: usize = 256;

/// Logs every command it receives, keeps the most recent ones, and always
/// succeeds.
#[derive(Debug, Clone)]
pub struct DryRunActuator {
    history: usize,
    issued: VecDeque<Command>,
    total: u64,
}

impl Default for DryRunActuator {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl DryRunActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `history` commands; older ones are dropped first.
    pub fn with_history(history: usize) -> Self {
        Self {
            history,
            issued: VecDeque::with_capacity(history.min(DEFAULT_HISTORY)),
            total: 0,
        }
    }

    /// The most recent commands received, oldest first.
    pub fn issued(&self) -> &VecDeque<Command> {
        &self.issued
    }

    /// Number of commands received over the actuator's lifetime.
    pub fn total_issued(&self) -> u64 {
        self.total
    }
}

impl CoolingActuator for DryRunActuator {
    fn apply(&mut self, device: DeviceId, state: CoolingState) -> Result<(), ActuationError> {
        log::info!("[dry-run] cooling device {device} -> {state}");
        self.total += 1;
        if self.history == 0 {
            return Ok(());
        }
        if self.issued.len() == self.history {
            self.issued.pop_front();
        }
        self.issued.push_back(Command { device, state });
        Ok(())
    }
}
