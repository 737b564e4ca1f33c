//! Events that trigger phase transitions

/// What started a generation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerSource {
    /// Both buttons held together
    Chord,
    /// `GEN` received from the host
    Command,
}

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A generation cycle was requested
    Trigger(TriggerSource),
    /// Charging samples finished and the password is ready
    Charged,
    /// Password and grade were sent to the host
    Published,
    /// Settling finished and no button is held
    Released,
}
