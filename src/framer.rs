//! Chip-select framing shared by the serial peripherals.
//!
//! A transaction lives from the first byte after selection until the chip is
//! deselected or the master finishes the transmission. The payload `T` is
//! whatever the device decoded from its opening byte; it only exists while a
//! transaction is open, so a data byte can never be processed in `Idle`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase<T> {
    #[default]
    Idle,
    Data(T),
}

#[derive(Debug, Clone)]
pub struct Framer<T> {
    selected: bool,
    phase: Phase<T>,
}

impl<T: Copy> Default for Framer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Framer<T> {
    pub fn new() -> Self {
        Self {
            selected: false,
            phase: Phase::Idle,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn phase(&self) -> Phase<T> {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Records the new chip-select level. Returns true when a deselect ends a
    /// selection; the caller must then finish its transmission.
    pub fn chip_select(&mut self, asserted: bool) -> bool {
        let ended = self.selected && !asserted;
        self.selected = asserted;
        ended
    }

    pub fn open(&mut self, payload: T) {
        self.phase = Phase::Data(payload);
    }

    pub fn update(&mut self, payload: T) {
        debug_assert!(!self.is_idle(), "transaction payload updated while idle");
        self.phase = Phase::Data(payload);
    }

    /// Drops any open transaction, including a partially decoded one.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn reset(&mut self) {
        self.selected = false;
        self.phase = Phase::Idle;
    }

    pub(crate) fn restore(&mut self, selected: bool, phase: Phase<T>) {
        self.selected = selected;
        self.phase = phase;
    }
}
