//! DA1468x QSPI controller with an attached W25Q80DV-style flash.
//!
//! Firmware talks to the flash through two double-word registers: a write
//! to QSPIC_WRITEDATA issues a command word whose low byte is the flash
//! opcode, and QSPIC_READDATA returns the response to the most recently
//! issued command. The command word is kept until the next write, so any
//! number of reads see the same response.

pub mod registers;


use crate::debug_flags;
use crate::framer::{Framer, Phase};
use crate::regfile::{AccessWidth, RegisterAccess, RegisterFile};
use crate::snapshot::FlashSnapshot;
use crate::spi::SerialPeripheral;

pub use registers::{FlashCommand, FlashStatus};

/// Response returned for ReadID.
pub const READ_ID_RESPONSE: u32 = 0xFFFF_FFFF;

pub struct FlashController {
    registers: RegisterFile,
    status: FlashStatus,
    last_command: u32,
    // Serial side: index of the next response byte.
    framer: Framer<u8>,
}

impl Default for FlashController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashController {
    /// Size of the register window.
    pub const SIZE: u64 = 0x48;

    pub fn new() -> Self {
        Self {
            registers: RegisterFile::new("qspi", AccessWidth::DoubleWord, registers::REGISTERS),
            status: FlashStatus::POWER_ON,
            last_command: 0,
            framer: Framer::new(),
        }
    }

    pub fn status(&self) -> FlashStatus {
        self.status
    }

    /// Environment-side override of the flash status, e.g. to model a part
    /// that powers up with block protection set.
    pub fn set_status(&mut self, status: FlashStatus) {
        self.status = status;
    }

    pub fn last_command(&self) -> u32 {
        self.last_command
    }

    pub fn auto_mode(&self) -> bool {
        self.registers.flag(registers::CTRL_MODE, registers::AUTO_MODE)
    }

    pub fn send_command(&mut self, command: u32) {
        log::trace!("QSPI flash send command = 0x{:X}", command);
        self.last_command = command;
        match FlashCommand::from_word(command) {
            Some(FlashCommand::ReadId) | Some(FlashCommand::ReadStatusRegister) => {}
            Some(FlashCommand::WriteEnable) => {
                self.status.insert(FlashStatus::WEL);
            }
            Some(FlashCommand::ExitContinuousMode) => {
                self.status = FlashStatus::POWER_ON;
            }
            Some(other) => {
                log::warn!(
                    "Unimplemented QSPI flash command {:?} = 0x{:X}",
                    other,
                    command
                );
            }
            None => {
                log::warn!("Unimplemented QSPI flash command = 0x{:X}", command);
            }
        }
    }

    /// Response to the last issued command. Has no side effects.
    pub fn read_data(&self) -> u32 {
        let data = match FlashCommand::from_word(self.last_command) {
            Some(FlashCommand::ReadId) => READ_ID_RESPONSE,
            Some(FlashCommand::ReadStatusRegister) => self.status.bits() as u32,
            _ => 0,
        };
        log::trace!(
            "QSPI flash read command 0x{:X}, data = 0x{:X}",
            self.last_command,
            data
        );
        data
    }

    pub fn read_u32(&mut self, offset: u64) -> u32 {
        self.read_sized(offset, AccessWidth::DoubleWord)
    }

    pub fn write_u32(&mut self, offset: u64, value: u32) {
        self.write_sized(offset, AccessWidth::DoubleWord, value)
    }

    pub fn read_u8(&mut self, offset: u64) -> u8 {
        self.read_sized(offset, AccessWidth::Byte) as u8
    }

    pub fn write_u8(&mut self, offset: u64, value: u8) {
        self.write_sized(offset, AccessWidth::Byte, value as u32)
    }

    pub fn snapshot(&self) -> FlashSnapshot {
        FlashSnapshot {
            registers: self.registers.values(),
            status: self.status.bits(),
            last_command: self.last_command,
            chip_selected: self.framer.is_selected(),
            response_cursor: match self.framer.phase() {
                Phase::Idle => None,
                Phase::Data(cursor) => Some(cursor),
            },
        }
    }

    pub fn restore(&mut self, snapshot: &FlashSnapshot) {
        self.registers.reset();
        self.registers.restore(&snapshot.registers);
        self.status = FlashStatus::from_bits_retain(snapshot.status);
        self.last_command = snapshot.last_command;
        let phase = match snapshot.response_cursor {
            None => Phase::Idle,
            Some(cursor) => Phase::Data(cursor % 4),
        };
        self.framer.restore(snapshot.chip_selected, phase);
    }
}

impl RegisterAccess for FlashController {
    fn native_width(&self) -> AccessWidth {
        AccessWidth::DoubleWord
    }

    fn read_native(&mut self, offset: u64) -> u32 {
        match offset {
            registers::READ_DATA => self.read_data(),
            _ => self.registers.read(offset),
        }
    }

    fn write_native(&mut self, offset: u64, value: u32) {
        self.registers.write(offset, value);
        if offset == registers::WRITE_DATA {
            self.send_command(value);
        }
    }

    fn view_native(&self, offset: u64) -> u32 {
        match offset {
            registers::READ_DATA => self.read_data(),
            _ => self.registers.view(offset),
        }
    }
}

/// Byte-serial access: the opening byte is issued as a command word, every
/// following byte shifts out the next byte of the response word, least
/// significant first.
impl SerialPeripheral for FlashController {
    fn name(&self) -> &str {
        "qspi-flash"
    }

    fn transmit(&mut self, data: u8) -> u8 {
        if !self.framer.is_selected() && debug_flags::strict_framing() {
            log::warn!("qspi-flash: byte 0x{:02X} received while not selected, dropped", data);
            debug_assert!(false, "qspi-flash: byte delivered outside a transaction");
            return 0;
        }

        let result = match self.framer.phase() {
            Phase::Idle => {
                self.send_command(data as u32);
                self.framer.open(0);
                0
            }
            Phase::Data(cursor) => {
                let byte = (self.read_data() >> (cursor as u32 * 8)) as u8;
                self.framer.update((cursor + 1) % 4);
                byte
            }
        };

        if debug_flags::trace_spi() {
            log::trace!("qspi-flash: received byte 0x{:02X}, returning 0x{:02X}", data, result);
        }
        result
    }

    fn finish_transmission(&mut self) {
        log::trace!("qspi-flash: finishing transmission, going idle");
        self.framer.finish();
    }

    fn on_chip_select(&mut self, asserted: bool) {
        if self.framer.chip_select(asserted) {
            self.finish_transmission();
        }
    }

    fn reset(&mut self) {
        self.registers.reset();
        self.status = FlashStatus::POWER_ON;
        self.last_command = 0;
        self.framer.reset();
    }
}
