//! Tool activation flags.
//!
//! The core only keeps the flags; what a tool does to the hull is a presentation
//! concern of whoever reads them.

/// Which robot tools are currently switched on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolState {
    plasma_torch_active: bool,
    cleaning_head_active: bool,
}

impl ToolState {
    #[inline]
    pub fn plasma_torch_active(&self) -> bool {
        self.plasma_torch_active
    }

    #[inline]
    pub fn cleaning_head_active(&self) -> bool {
        self.cleaning_head_active
    }

    /// Flip the plasma torch and return its new state.
    pub fn toggle_plasma_torch(&mut self) -> bool {
        self.plasma_torch_active = !self.plasma_torch_active;
        log::info!(
            "Cutting {}",
            if self.plasma_torch_active { "enabled" } else { "disabled" }
        );
        self.plasma_torch_active
    }

    /// Flip the cleaning head and return its new state.
    pub fn toggle_cleaning_head(&mut self) -> bool {
        self.cleaning_head_active = !self.cleaning_head_active;
        log::info!(
            "Cleaning {}",
            if self.cleaning_head_active { "enabled" } else { "disabled" }
        );
        self.cleaning_head_active
    }
}
