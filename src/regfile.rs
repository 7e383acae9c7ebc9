//! Declarative register storage shared by the peripheral models.
//!
//! A peripheral describes its register window once, as a static table of
//! [`RegisterDef`]s, and a [`RegisterFile`] interprets that table: it keeps
//! the current value of every register, enforces each field's access mode on
//! bus reads and writes, and restores reset values on [`RegisterFile::reset`].
//! Device-specific behaviour (computed reads, command side effects) stays in
//! the device, which consults the file through [`RegisterFile::field`] and
//! [`RegisterFile::set_field`] without going through the access checks.

use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldMode: u8 {
        const READ = 0b0000_0001;
        const WRITE = 0b0000_0010;
        const READ_TO_CLEAR = 0b0000_0100;
        const WRITE_ONE_TO_CLEAR = 0b0000_1000;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessWidth {
    Byte,
    Word,
    DoubleWord,
}

impl AccessWidth {
    pub const fn bytes(self) -> u64 {
        match self {
            AccessWidth::Byte => 1,
            AccessWidth::Word => 2,
            AccessWidth::DoubleWord => 4,
        }
    }

    pub const fn mask(self) -> u32 {
        match self {
            AccessWidth::Byte => 0xFF,
            AccessWidth::Word => 0xFFFF,
            AccessWidth::DoubleWord => 0xFFFF_FFFF,
        }
    }
}

#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub shift: u8,
    pub width: u8,
    pub mode: FieldMode,
}

impl FieldDef {
    pub const fn new(name: &'static str, shift: u8, width: u8, mode: FieldMode) -> Self {
        Self {
            name,
            shift,
            width,
            mode,
        }
    }

    pub const fn flag(name: &'static str, bit: u8, mode: FieldMode) -> Self {
        Self::new(name, bit, 1, mode)
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        let ones = if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        };
        ones << self.shift
    }
}

#[derive(Debug)]
pub struct RegisterDef {
    pub offset: u64,
    pub name: &'static str,
    pub reset: u32,
    pub fields: &'static [FieldDef],
}

impl RegisterDef {
    fn mask_where(&self, pred: impl Fn(FieldMode) -> bool) -> u32 {
        self.fields
            .iter()
            .filter(|f| pred(f.mode))
            .fold(0, |acc, f| acc | f.mask())
    }

    fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    // Bits not claimed by any field are reserved: they keep their reset value.
    fn reserved_mask(&self) -> u32 {
        !self.mask_where(|_| true)
    }

    fn readable_mask(&self) -> u32 {
        self.mask_where(|m| m.intersects(FieldMode::READ | FieldMode::READ_TO_CLEAR))
            | self.reserved_mask()
    }
}

/// Native-width access plus the narrowing/widening translation built on it.
///
/// Narrow accesses address a lane inside the naturally aligned native
/// register; a narrow write merges into the side-effect free view of that
/// register before issuing a native write. Wide accesses are split into
/// consecutive native accesses, least significant first.
pub trait RegisterAccess {
    fn native_width(&self) -> AccessWidth;
    fn read_native(&mut self, offset: u64) -> u32;
    fn write_native(&mut self, offset: u64, value: u32);
    /// Readable value without read side effects.
    fn view_native(&self, offset: u64) -> u32;

    fn read_sized(&mut self, offset: u64, width: AccessWidth) -> u32 {
        let native = self.native_width().bytes();
        let access = width.bytes();
        if access == native {
            self.read_native(offset) & width.mask()
        } else if access < native {
            let lane = offset % native;
            let word = self.read_native(offset - lane);
            (word >> (lane * 8)) & width.mask()
        } else {
            let mut value = 0u32;
            for i in 0..access / native {
                let part = self.read_native(offset + i * native);
                value |= part << (i * native * 8);
            }
            value
        }
    }

    fn write_sized(&mut self, offset: u64, width: AccessWidth, value: u32) {
        let native_width = self.native_width();
        let native = native_width.bytes();
        let access = width.bytes();
        let value = value & width.mask();
        if access == native {
            self.write_native(offset, value);
        } else if access < native {
            let lane = offset % native;
            let aligned = offset - lane;
            let shift = lane * 8;
            let merged =
                (self.view_native(aligned) & !(width.mask() << shift)) | (value << shift);
            self.write_native(aligned, merged & native_width.mask());
        } else {
            for i in 0..access / native {
                let part = (value >> (i * native * 8)) & native_width.mask();
                self.write_native(offset + i * native, part);
            }
        }
    }
}

#[derive(Debug)]
struct Slot {
    def: &'static RegisterDef,
    value: u32,
}

#[derive(Debug)]
pub struct RegisterFile {
    name: &'static str,
    width: AccessWidth,
    registers: BTreeMap<u64, Slot>,
}

impl RegisterFile {
    pub fn new(name: &'static str, width: AccessWidth, defs: &'static [RegisterDef]) -> Self {
        let mut registers = BTreeMap::new();
        for def in defs {
            debug_assert!(
                def.fields.iter().all(|f| f.mask() & !width.mask() == 0),
                "{name}: {} has a field beyond the register width",
                def.name
            );
            let previous = registers.insert(
                def.offset,
                Slot {
                    def,
                    value: def.reset & width.mask(),
                },
            );
            debug_assert!(
                previous.is_none(),
                "{name}: duplicate register offset 0x{:X}",
                def.offset
            );
        }
        Self {
            name,
            width,
            registers,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Span of the window in bytes.
    pub fn size(&self) -> u64 {
        self.registers
            .keys()
            .next_back()
            .map(|last| last + self.width.bytes())
            .unwrap_or(0)
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.registers.contains_key(&offset)
    }

    pub fn reset(&mut self) {
        let mask = self.width.mask();
        for slot in self.registers.values_mut() {
            slot.value = slot.def.reset & mask;
        }
    }

    /// Bus read: only readable bits are returned, read-to-clear fields are cleared.
    pub fn read(&mut self, offset: u64) -> u32 {
        let Some(slot) = self.registers.get_mut(&offset) else {
            log::debug!("{}: read from unmapped offset 0x{:X}, returning 0", self.name, offset);
            return 0;
        };
        let value = slot.value & slot.def.readable_mask();
        let clear = slot.def.mask_where(|m| m.contains(FieldMode::READ_TO_CLEAR));
        slot.value &= !clear;
        value
    }

    /// Bus write: writable fields take the new bits, write-one-to-clear fields
    /// clear where a one is written, everything else is left alone.
    pub fn write(&mut self, offset: u64, value: u32) {
        let Some(slot) = self.registers.get_mut(&offset) else {
            log::debug!(
                "{}: write of 0x{:X} to unmapped offset 0x{:X} dropped",
                self.name,
                value,
                offset
            );
            return;
        };
        let writable = slot.def.mask_where(|m| m.contains(FieldMode::WRITE));
        let w1c = slot.def.mask_where(|m| m.contains(FieldMode::WRITE_ONE_TO_CLEAR));
        let mut next = (slot.value & !writable) | (value & writable);
        next &= !(value & w1c);
        if next == slot.value && value & !writable & !w1c != 0 {
            log::debug!(
                "{}: write of 0x{:X} to {} touched only read-only bits",
                self.name,
                value,
                slot.def.name
            );
        }
        slot.value = next & self.width.mask();
    }

    pub fn view(&self, offset: u64) -> u32 {
        self.registers
            .get(&offset)
            .map(|slot| slot.value & slot.def.readable_mask())
            .unwrap_or(0)
    }

    /// Device-side read of a named field, ignoring access modes.
    pub fn field(&self, offset: u64, name: &str) -> u32 {
        match self.lookup(offset, name) {
            Some((slot, field)) => (slot.value & field.mask()) >> field.shift,
            None => 0,
        }
    }

    /// Device-side update of a named field, ignoring access modes.
    pub fn set_field(&mut self, offset: u64, name: &str, value: u32) {
        let Some(field) = self.lookup(offset, name).map(|(_, field)| field) else {
            return;
        };
        if let Some(slot) = self.registers.get_mut(&offset) {
            let mask = field.mask();
            slot.value = (slot.value & !mask) | ((value << field.shift) & mask);
        }
    }

    pub fn flag(&self, offset: u64, name: &str) -> bool {
        self.field(offset, name) != 0
    }

    pub fn set_flag(&mut self, offset: u64, name: &str, value: bool) {
        self.set_field(offset, name, value as u32);
    }

    /// Raw stored values in offset order, for snapshots.
    pub fn values(&self) -> Vec<(u64, u32)> {
        self.registers
            .iter()
            .map(|(offset, slot)| (*offset, slot.value))
            .collect()
    }

    pub fn restore(&mut self, values: &[(u64, u32)]) {
        let mask = self.width.mask();
        for (offset, value) in values {
            match self.registers.get_mut(offset) {
                Some(slot) => slot.value = value & mask,
                None => log::warn!(
                    "{}: snapshot carries unknown offset 0x{:X}, skipped",
                    self.name,
                    offset
                ),
            }
        }
    }

    fn lookup(&self, offset: u64, name: &str) -> Option<(&Slot, &'static FieldDef)> {
        let slot = self.registers.get(&offset)?;
        match slot.def.field(name) {
            Some(field) => Some((slot, field)),
            None => {
                log::error!(
                    "{}: register {} has no field named {}",
                    self.name,
                    slot.def.name,
                    name
                );
                None
            }
        }
    }
}

impl RegisterAccess for RegisterFile {
    fn native_width(&self) -> AccessWidth {
        self.width
    }

    fn read_native(&mut self, offset: u64) -> u32 {
        self.read(offset)
    }

    fn write_native(&mut self, offset: u64, value: u32) {
        self.write(offset, value)
    }

    fn view_native(&self, offset: u64) -> u32 {
        self.view(offset)
    }
}
