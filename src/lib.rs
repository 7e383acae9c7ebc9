//! Register-level models of serially addressed peripherals for a hardware
//! simulator: an LIS3DSH accelerometer on SPI and a DA1468x QSPI controller
//! driving a W25Q-style flash.

pub mod accel;
pub mod debug_flags;
pub mod error;
pub mod framer;
pub mod lis3dsh;
pub mod qspi;
pub mod regfile;
pub mod snapshot;
pub mod spi;

pub use error::{PeripheralError, PeripheralResult};
pub use lis3dsh::{Axis, Lis3dsh};
pub use qspi::{FlashCommand, FlashController, FlashStatus};
pub use spi::{SerialPeripheral, SpiBus};

/// Installs an `env_logger` backend configured from `RUST_LOG`.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(cfg!(test))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{PeripheralSnapshot, SnapshotFile};

    #[test]
    fn bus_reaches_both_peripherals() {
        init_logging();
        let mut bus = SpiBus::new();
        let sensor = bus.attach(Box::new(Lis3dsh::new()));
        let flash = bus.attach(Box::new(FlashController::new()));
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.device(flash).map(|d| d.name()), Some("qspi-flash"));

        assert_eq!(bus.transfer(sensor, &[0x8F, 0x00]), vec![0x00, 0x3F]);
        assert_eq!(bus.transfer(flash, &[0x9F, 0x00, 0x00]), vec![0x00, 0xFF, 0xFF]);

        bus.transfer(flash, &[0x06]);
        assert_eq!(bus.transfer(flash, &[0x05, 0x00]), vec![0x00, 0x02]);

        // Control4 write through the bus, then read it back
        bus.transfer(sensor, &[0x20, 0x97]);
        assert_eq!(bus.transfer(sensor, &[0xA0, 0x00]), vec![0x00, 0x97]);
        assert_eq!(bus.transfer(sensor, &[0xA7, 0x00]), vec![0x00, 0x08]);
    }

    #[test]
    fn switching_slaves_aborts_the_open_transaction() {
        let mut bus = SpiBus::new();
        let sensor = bus.attach(Box::new(Lis3dsh::new()));
        let flash = bus.attach(Box::new(FlashController::new()));

        bus.select(sensor);
        bus.exchange(0x20);
        bus.select(flash);
        bus.exchange(0x9F);
        bus.select(sensor);
        // opcode again: read WHO_AM_I, not a Control4 write
        assert_eq!(bus.exchange(0x8F), 0x00);
        assert_eq!(bus.exchange(0x00), 0x3F);
        bus.deselect();
        assert_eq!(bus.transfer(sensor, &[0xA0, 0x00]), vec![0x00, 0x43]);
    }

    #[test]
    fn bus_reset_resets_every_slave() {
        let mut bus = SpiBus::new();
        let sensor = bus.attach(Box::new(Lis3dsh::new()));
        bus.transfer(sensor, &[0x20, 0x00]);
        bus.select(sensor);
        bus.reset();
        assert_eq!(bus.selected(), None);
        assert_eq!(bus.transfer(sensor, &[0xA0, 0x00]), vec![0x00, 0x43]);
    }

    #[test]
    fn snapshot_file_carries_both_devices() {
        let mut sensor = Lis3dsh::new();
        sensor.set_acceleration(Axis::Z, -9.0).unwrap();
        let mut flash = FlashController::new();
        flash.send_command(0x06);

        let mut file = SnapshotFile::new();
        file.push("accel", PeripheralSnapshot::Sensor(sensor.snapshot()));
        file.push("flash", PeripheralSnapshot::Flash(flash.snapshot()));
        let bytes = file.to_bytes().unwrap();
        let loaded = SnapshotFile::from_bytes(&bytes).unwrap();

        let mut sensor2 = Lis3dsh::new();
        let mut flash2 = FlashController::new();
        match loaded.get("accel") {
            Some(PeripheralSnapshot::Sensor(s)) => sensor2.restore(s),
            other => panic!("unexpected entry: {other:?}"),
        }
        match loaded.get("flash") {
            Some(PeripheralSnapshot::Flash(s)) => flash2.restore(s),
            other => panic!("unexpected entry: {other:?}"),
        }
        assert_eq!(sensor2.acceleration(Axis::Z), -9.0);
        assert_eq!(flash2.status(), FlashStatus::WEL);
    }
}
