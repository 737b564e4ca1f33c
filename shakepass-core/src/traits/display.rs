//! Local status display trait

/// Icons flashed in response to entropy events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    /// Shake gesture mixed in
    Shake,
    /// Loud sound mixed in
    Sound,
}

/// Trait for the device's own display
///
/// The device shows its state locally, independent of whether a host is
/// listening. Drawing is fire-and-forget; failures are the implementation's
/// concern.
pub trait StatusDisplay {
    /// Show the configured password length
    fn show_length(&mut self, length: u8);

    /// Show a freshly generated password
    fn show_password(&mut self, password: &str);

    /// Show the device strength label
    fn show_strength(&mut self, label: &str);

    /// Flash an icon until the next `clear`
    fn show_icon(&mut self, icon: Icon);

    /// Blank the display
    fn clear(&mut self);
}
