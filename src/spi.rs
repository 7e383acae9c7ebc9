//! Serial transport contract and a simulated bus master.

use crate::debug_flags;

/// What a bus master needs from a serially addressed peripheral.
pub trait SerialPeripheral: Send {
    fn name(&self) -> &str;

    /// Clocks one byte in and returns the byte shifted out in the same cycle.
    fn transmit(&mut self, data: u8) -> u8;

    /// Ends the current transaction; the next byte opens a new one.
    fn finish_transmission(&mut self);

    fn on_chip_select(&mut self, asserted: bool);

    /// GPIO entry point. Pin 0 carries the active-low chip select.
    fn on_gpio(&mut self, pin: u32, level: bool) {
        log::trace!("{}: GPIO pin {} -> {}", self.name(), pin, level);
        if pin != 0 {
            log::warn!(
                "{}: only chip select on pin 0 is supported, got signal on pin {} with value {}",
                self.name(),
                pin,
                level
            );
            return;
        }
        self.on_chip_select(!level);
    }

    fn reset(&mut self);
}

/// Single-master bus with one chip-select line per attached slave.
#[derive(Default)]
pub struct SpiBus {
    slaves: Vec<Box<dyn SerialPeripheral>>,
    selected: Option<usize>,
}

impl SpiBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a slave and returns its chip-select index.
    pub fn attach(&mut self, device: Box<dyn SerialPeripheral>) -> usize {
        log::debug!("SPI: attaching {} as slave {}", device.name(), self.slaves.len());
        self.slaves.push(device);
        self.slaves.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slaves.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn device(&self, index: usize) -> Option<&dyn SerialPeripheral> {
        self.slaves.get(index).map(|d| d.as_ref())
    }

    pub fn device_mut(&mut self, index: usize) -> Option<&mut (dyn SerialPeripheral + 'static)> {
        self.slaves.get_mut(index).map(|d| d.as_mut())
    }

    /// Asserts chip select for `index`, releasing any other slave first.
    pub fn select(&mut self, index: usize) {
        if index >= self.slaves.len() {
            log::warn!("SPI: select of missing slave {}", index);
            return;
        }
        if self.selected == Some(index) {
            return;
        }
        self.deselect();
        self.slaves[index].on_chip_select(true);
        self.selected = Some(index);
    }

    pub fn deselect(&mut self) {
        if let Some(index) = self.selected.take() {
            self.slaves[index].on_chip_select(false);
        }
    }

    /// One byte cycle with the selected slave. Nothing drives MISO when no
    /// slave is selected, which reads back as 0.
    pub fn exchange(&mut self, data: u8) -> u8 {
        match self.selected {
            Some(index) => {
                let response = self.slaves[index].transmit(data);
                if debug_flags::trace_spi() {
                    log::trace!(
                        "SPI: {} <- 0x{:02X}, -> 0x{:02X}",
                        self.slaves[index].name(),
                        data,
                        response
                    );
                }
                response
            }
            None => {
                log::debug!("SPI: byte 0x{:02X} clocked with no slave selected", data);
                0
            }
        }
    }

    /// Full transaction: select, clock every byte of `tx`, deselect.
    pub fn transfer(&mut self, index: usize, tx: &[u8]) -> Vec<u8> {
        self.select(index);
        if self.selected != Some(index) {
            return vec![0; tx.len()];
        }
        let rx = tx.iter().map(|&b| self.exchange(b)).collect();
        self.deselect();
        rx
    }

    pub fn reset(&mut self) {
        self.selected = None;
        for slave in &mut self.slaves {
            slave.reset();
        }
    }
}
