//! Abstract cooling-device actuator trait.

use crate::classifier::CoolingState;
use crate::error::ActuationError;
use crate::zone::DeviceId;

/// Applies an ON/OFF state to a cooling device.
///
/// A call must return in bounded time and report failure rather than block.
/// The governor treats every call independently: one failing device never
/// prevents the remaining devices from being driven.
pub trait CoolingActuator {
    fn apply(&mut self, device: DeviceId, state: CoolingState) -> Result<(), ActuationError>;
}

impl<A: CoolingActuator + ?Sized> CoolingActuator for Box<A> {
    fn apply(&mut self, device: DeviceId, state: CoolingState) -> Result<(), ActuationError> {
        (**self).apply(device, state)
    }
}
