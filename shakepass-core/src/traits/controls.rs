//! User input traits

/// The two device buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Left button: length up
    A,
    /// Right button: length down
    B,
}

/// Physical inputs: buttons and the shake gesture
///
/// `was_*` methods report a latched edge and clear it, so an edge that
/// happened between two engine steps is seen exactly once.
pub trait Controls {
    /// Check if the button is currently held
    fn is_pressed(&mut self, button: Button) -> bool;

    /// Check (and clear) whether the button was pressed since the last call
    fn was_pressed(&mut self, button: Button) -> bool;

    /// Check (and clear) whether a shake gesture happened since the last call
    fn was_shaken(&mut self) -> bool;

    /// Both buttons held together
    fn chord_held(&mut self) -> bool {
        self.is_pressed(Button::A) && self.is_pressed(Button::B)
    }

    /// At least one button held
    fn any_held(&mut self) -> bool {
        self.is_pressed(Button::A) || self.is_pressed(Button::B)
    }
}
