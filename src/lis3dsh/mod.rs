//! LIS3DSH three-axis accelerometer, SPI slave side.
//!
//! Each transaction opens with one opcode byte: bit 7 selects a read, bits
//! 0..6 address a register. Every following byte reads or writes that same
//! register; the model does not auto-increment the address within a
//! transaction, so burst reads of OUT_X_L..OUT_Z_H need one transaction per
//! register.
//!
//! Acceleration is injected per axis in g and served through the output
//! registers at read time, scaled by the full-scale selection in CTRL_REG5.

pub mod registers;

#[cfg(test)]
mod tests;

use crate::accel;
use crate::debug_flags;
use crate::error::PeripheralResult;
use crate::framer::{Framer, Phase};
use crate::regfile::{AccessWidth, RegisterAccess, RegisterFile};
use crate::snapshot::{SensorSnapshot, TransactionSnapshot};
use crate::spi::SerialPeripheral;

pub use registers::Register;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Decoded opening byte of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub address: u8,
    pub direction: Direction,
}

impl Transaction {
    pub fn decode(opcode: u8) -> Self {
        Self {
            address: opcode & 0x7F,
            direction: if opcode & 0x80 != 0 {
                Direction::Read
            } else {
                Direction::Write
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    const fn index(self) -> usize {
        self as usize
    }

    fn enable_field(self) -> &'static str {
        match self {
            Axis::X => registers::X_AXIS_ENABLE,
            Axis::Y => registers::Y_AXIS_ENABLE,
            Axis::Z => registers::Z_AXIS_ENABLE,
        }
    }

    fn data_available_field(self) -> &'static str {
        match self {
            Axis::X => registers::X_DATA_AVAILABLE,
            Axis::Y => registers::Y_DATA_AVAILABLE,
            Axis::Z => registers::Z_DATA_AVAILABLE,
        }
    }
}

pub struct Lis3dsh {
    registers: RegisterFile,
    framer: Framer<Transaction>,
    acceleration: [f64; 3],
}

impl Default for Lis3dsh {
    fn default() -> Self {
        Self::new()
    }
}

impl Lis3dsh {
    pub const WHO_AM_I: u8 = 0x3F;

    pub fn new() -> Self {
        // STATUS comes up with its reset value (XYZ available) and is only
        // recomputed once CTRL_REG4 or an axis enable changes.
        Self {
            registers: RegisterFile::new("lis3dsh", AccessWidth::Byte, registers::REGISTERS),
            framer: Framer::new(),
            acceleration: [0.0; 3],
        }
    }

    pub fn phase(&self) -> Phase<Transaction> {
        self.framer.phase()
    }

    pub fn is_selected(&self) -> bool {
        self.framer.is_selected()
    }

    pub fn acceleration(&self, axis: Axis) -> f64 {
        self.acceleration[axis.index()]
    }

    /// Injects an acceleration in g. Values the output format cannot hold are
    /// rejected and the previous value is kept.
    pub fn set_acceleration(&mut self, axis: Axis, value: f64) -> PeripheralResult<()> {
        if let Err(e) = accel::check_range(value) {
            log::warn!("lis3dsh: {:?} axis: {}", axis, e);
            return Err(e);
        }
        self.acceleration[axis.index()] = value;
        log::trace!("lis3dsh: acceleration {:?} set to {}", axis, value);
        Ok(())
    }

    pub fn axis_enabled(&self, axis: Axis) -> bool {
        self.registers
            .flag(Register::Control4.offset(), axis.enable_field())
    }

    /// Environment-side enable switch. Resets the axis value to 0 g.
    pub fn set_axis_enabled(&mut self, axis: Axis, enabled: bool) {
        self.acceleration[axis.index()] = 0.0;
        self.registers
            .set_flag(Register::Control4.offset(), axis.enable_field(), enabled);
        log::trace!("lis3dsh: {:?} axis enable set to {}", axis, enabled);
        self.update_data_available();
    }

    pub fn data_rate(&self) -> u8 {
        self.registers
            .field(Register::Control4.offset(), registers::OUTPUT_DATA_RATE) as u8
    }

    pub fn full_scale(&self) -> u8 {
        self.registers
            .field(Register::Control5.offset(), registers::FULL_SCALE) as u8
    }

    /// Current sensitivity in mg/LSB.
    pub fn sensitivity(&self) -> u16 {
        accel::sensitivity(self.full_scale())
    }

    pub fn data_available(&self, axis: Axis) -> bool {
        self.registers
            .flag(Register::Status.offset(), axis.data_available_field())
    }

    pub fn xyz_data_available(&self) -> bool {
        self.registers
            .flag(Register::Status.offset(), registers::XYZ_DATA_AVAILABLE)
    }

    /// Register read as seen by the bus, including computed output registers.
    pub fn read_register(&mut self, address: u8) -> u8 {
        if let Some(value) = self.output_register(address) {
            return value;
        }
        self.registers.read(address as u64) as u8
    }

    pub fn write_register(&mut self, address: u8, value: u8) {
        self.registers.write(address as u64, value as u32);
        self.update_data_available();
    }

    fn output_register(&self, address: u8) -> Option<u8> {
        let (axis, upper) = match Register::from_address(address)? {
            Register::OutXL => (Axis::X, false),
            Register::OutXH => (Axis::X, true),
            Register::OutYL => (Axis::Y, false),
            Register::OutYH => (Axis::Y, true),
            Register::OutZL => (Axis::Z, false),
            Register::OutZH => (Axis::Z, true),
            _ => return None,
        };
        Some(accel::output_byte(
            self.acceleration(axis),
            self.sensitivity(),
            upper,
        ))
    }

    // STATUS data-available bits are derived from CTRL_REG4 only.
    fn update_data_available(&mut self) {
        let status = Register::Status.offset();
        if self.data_rate() == 0 {
            log::debug!("lis3dsh: power-down mode is set");
            self.registers
                .set_flag(status, registers::XYZ_DATA_AVAILABLE, false);
            for axis in Axis::ALL {
                self.registers
                    .set_flag(status, axis.data_available_field(), false);
            }
            return;
        }

        let enabled = Axis::ALL.map(|axis| self.axis_enabled(axis));
        log::trace!(
            "lis3dsh: data available update, X={}, Y={}, Z={}",
            enabled[0],
            enabled[1],
            enabled[2]
        );
        let all = enabled.iter().all(|&e| e);
        self.registers
            .set_flag(status, registers::XYZ_DATA_AVAILABLE, all);
        for axis in Axis::ALL {
            let per_axis = !all && enabled[axis.index()];
            self.registers
                .set_flag(status, axis.data_available_field(), per_axis);
        }
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            registers: self.registers.values(),
            acceleration: self.acceleration,
            chip_selected: self.framer.is_selected(),
            transaction: match self.framer.phase() {
                Phase::Idle => None,
                Phase::Data(t) => Some(TransactionSnapshot {
                    address: t.address,
                    read: t.direction == Direction::Read,
                }),
            },
        }
    }

    pub fn restore(&mut self, snapshot: &SensorSnapshot) {
        self.registers.reset();
        self.registers.restore(&snapshot.registers);
        self.acceleration = snapshot.acceleration;
        let phase = match snapshot.transaction {
            None => Phase::Idle,
            Some(t) => Phase::Data(Transaction {
                address: t.address & 0x7F,
                direction: if t.read {
                    Direction::Read
                } else {
                    Direction::Write
                },
            }),
        };
        self.framer.restore(snapshot.chip_selected, phase);
    }
}

impl SerialPeripheral for Lis3dsh {
    fn name(&self) -> &str {
        "lis3dsh"
    }

    fn transmit(&mut self, data: u8) -> u8 {
        if !self.framer.is_selected() && debug_flags::strict_framing() {
            log::warn!("lis3dsh: byte 0x{:02X} received while not selected, dropped", data);
            debug_assert!(false, "lis3dsh: byte delivered outside a transaction");
            return 0;
        }

        let result = match self.framer.phase() {
            Phase::Idle => {
                let transaction = Transaction::decode(data);
                log::trace!(
                    "lis3dsh: decoded register 0x{:02X}, read = {}",
                    transaction.address,
                    transaction.direction == Direction::Read
                );
                self.framer.open(transaction);
                0
            }
            Phase::Data(Transaction {
                address,
                direction: Direction::Read,
            }) => {
                let value = self.read_register(address);
                log::trace!("lis3dsh: reading register 0x{:02X}", address);
                value
            }
            Phase::Data(Transaction {
                address,
                direction: Direction::Write,
            }) => {
                log::trace!("lis3dsh: writing 0x{:02X} to register 0x{:02X}", data, address);
                self.write_register(address, data);
                0
            }
        };

        if debug_flags::trace_spi() {
            log::trace!("lis3dsh: received byte 0x{:02X}, returning 0x{:02X}", data, result);
        }
        result
    }

    fn finish_transmission(&mut self) {
        log::trace!("lis3dsh: finishing transmission, going idle");
        self.framer.finish();
    }

    fn on_chip_select(&mut self, asserted: bool) {
        if self.framer.chip_select(asserted) {
            self.finish_transmission();
        }
    }

    fn reset(&mut self) {
        self.registers.reset();
        self.framer.reset();
    }
}

/// Memory-mapped view of the register window, used by debuggers and the
/// host simulator's peek/poke path.
impl RegisterAccess for Lis3dsh {
    fn native_width(&self) -> AccessWidth {
        AccessWidth::Byte
    }

    fn read_native(&mut self, offset: u64) -> u32 {
        match u8::try_from(offset) {
            Ok(address) if address <= 0x7F => self.read_register(address) as u32,
            _ => self.registers.read(offset),
        }
    }

    fn write_native(&mut self, offset: u64, value: u32) {
        match u8::try_from(offset) {
            Ok(address) if address <= 0x7F => self.write_register(address, value as u8),
            _ => self.registers.write(offset, value),
        }
    }

    fn view_native(&self, offset: u64) -> u32 {
        u8::try_from(offset)
            .ok()
            .and_then(|address| self.output_register(address))
            .map(u32::from)
            .unwrap_or_else(|| self.registers.view(offset))
    }
}
