use super::*;
use crate::regfile::{AccessWidth, RegisterAccess};

const READ: u8 = 0x80;

fn write_reg(dev: &mut Lis3dsh, address: u8, value: u8) {
    dev.on_chip_select(true);
    assert_eq!(dev.transmit(address & 0x7F), 0);
    assert_eq!(dev.transmit(value), 0);
    dev.on_chip_select(false);
}

fn read_reg(dev: &mut Lis3dsh, address: u8) -> u8 {
    dev.on_chip_select(true);
    assert_eq!(dev.transmit(READ | address), 0);
    let value = dev.transmit(0x00);
    dev.on_chip_select(false);
    value
}

#[test]
fn who_am_i_reads_fixed_id() {
    let mut dev = Lis3dsh::new();
    assert_eq!(read_reg(&mut dev, Register::WhoAmI.address()), Lis3dsh::WHO_AM_I);
    write_reg(&mut dev, Register::WhoAmI.address(), 0x00);
    assert_eq!(read_reg(&mut dev, Register::WhoAmI.address()), 0x3F);
}

#[test]
fn opcode_byte_decodes_address_and_direction() {
    assert_eq!(
        Transaction::decode(0xA0),
        Transaction {
            address: 0x20,
            direction: Direction::Read
        }
    );
    assert_eq!(
        Transaction::decode(0x7F),
        Transaction {
            address: 0x7F,
            direction: Direction::Write
        }
    );
}

#[test]
fn control_registers_read_back_every_value() {
    let mut dev = Lis3dsh::new();
    for reg in [Register::Control4, Register::Control5] {
        for value in 0..=u8::MAX {
            write_reg(&mut dev, reg.address(), value);
            assert_eq!(read_reg(&mut dev, reg.address()), value, "{reg:?} <- 0x{value:02X}");
        }
    }
}

#[test]
fn repeated_data_bytes_hit_the_same_register() {
    let mut dev = Lis3dsh::new();
    dev.on_chip_select(true);
    dev.transmit(Register::Control4.address());
    dev.transmit(0x10);
    dev.transmit(0x77);
    dev.on_chip_select(false);
    assert_eq!(read_reg(&mut dev, Register::Control4.address()), 0x77);
    assert_eq!(read_reg(&mut dev, Register::Control5.address()), 0x00);

    dev.on_chip_select(true);
    dev.transmit(READ | Register::WhoAmI.address());
    assert_eq!(dev.transmit(0), 0x3F);
    assert_eq!(dev.transmit(0), 0x3F);
    assert_eq!(dev.transmit(0), 0x3F);
    dev.on_chip_select(false);
}

#[test]
fn deselect_mid_transaction_restarts_decoding() {
    let mut dev = Lis3dsh::new();
    dev.on_chip_select(true);
    dev.transmit(Register::Control4.address());
    assert!(matches!(dev.phase(), Phase::Data(_)));
    dev.on_chip_select(false);
    assert_eq!(dev.phase(), Phase::Idle);

    // the next byte is an opcode again, not a Control4 write
    dev.on_chip_select(true);
    assert_eq!(dev.transmit(READ | Register::WhoAmI.address()), 0);
    assert_eq!(dev.transmit(0), 0x3F);
    dev.on_chip_select(false);
    assert_eq!(read_reg(&mut dev, Register::Control4.address()), 0x43);
}

#[test]
fn finish_transmission_returns_to_idle() {
    let mut dev = Lis3dsh::new();
    dev.on_chip_select(true);
    dev.transmit(READ | Register::Control5.address());
    dev.finish_transmission();
    assert_eq!(dev.phase(), Phase::Idle);
    assert_eq!(dev.transmit(READ | Register::WhoAmI.address()), 0);
    assert_eq!(dev.transmit(0), 0x3F);
}

#[test]
fn gpio_chip_select_is_active_low() {
    let mut dev = Lis3dsh::new();
    dev.on_gpio(0, false);
    assert!(dev.is_selected());
    dev.transmit(Register::Control4.address());

    dev.on_gpio(1, true);
    assert!(matches!(dev.phase(), Phase::Data(_)), "pin 1 is not chip select");

    dev.on_gpio(0, true);
    assert!(!dev.is_selected());
    assert_eq!(dev.phase(), Phase::Idle);
}

#[test]
fn status_has_reset_value_until_first_write() {
    let mut dev = Lis3dsh::new();
    assert_eq!(read_reg(&mut dev, Register::Status.address()), 0x08);
    assert_eq!(read_reg(&mut dev, Register::Control4.address()), 0x43);
}

#[test]
fn all_axes_enabled_sets_combined_flag_only() {
    let mut dev = Lis3dsh::new();
    write_reg(&mut dev, Register::Control4.address(), 0x67);
    assert!(dev.xyz_data_available());
    for axis in Axis::ALL {
        assert!(!dev.data_available(axis));
    }
    assert_eq!(read_reg(&mut dev, Register::Status.address()), 0x08);

    // rate 0 is power-down
    write_reg(&mut dev, Register::Control4.address(), 0x07);
    assert!(!dev.xyz_data_available());
    for axis in Axis::ALL {
        assert!(!dev.data_available(axis));
    }
    assert_eq!(read_reg(&mut dev, Register::Status.address()), 0x00);
}

#[test]
fn partial_enables_set_per_axis_flags() {
    let mut dev = Lis3dsh::new();
    write_reg(&mut dev, Register::Control4.address(), 0x15);
    assert!(dev.data_available(Axis::X));
    assert!(!dev.data_available(Axis::Y));
    assert!(dev.data_available(Axis::Z));
    assert!(!dev.xyz_data_available());
    assert_eq!(read_reg(&mut dev, Register::Status.address()), 0x05);
}

#[test]
fn status_is_not_writable_over_spi() {
    let mut dev = Lis3dsh::new();
    write_reg(&mut dev, Register::Control4.address(), 0x11);
    write_reg(&mut dev, Register::Status.address(), 0xFF);
    assert_eq!(read_reg(&mut dev, Register::Status.address()), 0x01);
}

#[test]
fn unmapped_addresses_read_zero_and_ignore_writes() {
    let mut dev = Lis3dsh::new();
    write_reg(&mut dev, 0x10, 0xAA);
    assert_eq!(read_reg(&mut dev, 0x10), 0x00);
    assert_eq!(read_reg(&mut dev, 0x7F), 0x00);
}

#[test]
fn output_registers_encode_acceleration() {
    let mut dev = Lis3dsh::new();
    dev.set_acceleration(Axis::X, 1.0).unwrap();
    dev.set_acceleration(Axis::Y, -1.0).unwrap();
    assert_eq!(dev.sensitivity(), 2);

    assert_eq!(read_reg(&mut dev, Register::OutXL.address()), 0x43);
    assert_eq!(read_reg(&mut dev, Register::OutXH.address()), 0x03);
    assert_eq!(read_reg(&mut dev, Register::OutYL.address()), 0xBD);
    assert_eq!(read_reg(&mut dev, Register::OutYH.address()), 0xFC);
    assert_eq!(read_reg(&mut dev, Register::OutZL.address()), 0x00);
    assert_eq!(read_reg(&mut dev, Register::OutZH.address()), 0x00);

    let raw = i16::from_le_bytes([
        read_reg(&mut dev, Register::OutXL.address()),
        read_reg(&mut dev, Register::OutXH.address()),
    ]);
    let decoded = accel::decode(raw, dev.sensitivity());
    assert!((decoded - 1.0).abs() < 0.002);
}

#[test]
fn output_registers_follow_full_scale() {
    let mut dev = Lis3dsh::new();
    dev.set_acceleration(Axis::Z, 1.0).unwrap();
    write_reg(&mut dev, Register::Control5.address(), 4 << 3);
    assert_eq!(dev.full_scale(), 4);
    assert_eq!(dev.sensitivity(), 16);
    assert_eq!(read_reg(&mut dev, Register::OutZL.address()), 104);
    assert_eq!(read_reg(&mut dev, Register::OutZH.address()), 0);

    // reserved selector: no sensitivity, outputs read zero
    write_reg(&mut dev, Register::Control5.address(), 6 << 3);
    assert_eq!(dev.sensitivity(), 0);
    assert_eq!(read_reg(&mut dev, Register::OutZL.address()), 0);
}

#[test]
fn output_registers_ignore_writes() {
    let mut dev = Lis3dsh::new();
    dev.set_acceleration(Axis::X, 2.0).unwrap();
    let before = read_reg(&mut dev, Register::OutXL.address());
    write_reg(&mut dev, Register::OutXL.address(), 0x00);
    assert_eq!(read_reg(&mut dev, Register::OutXL.address()), before);
}

#[test]
fn out_of_range_acceleration_is_rejected() {
    let mut dev = Lis3dsh::new();
    dev.set_acceleration(Axis::X, 1.0).unwrap();
    assert!(dev.set_acceleration(Axis::X, 25.0).is_err());
    assert!(dev.set_acceleration(Axis::X, -19.01).is_err());
    assert_eq!(dev.acceleration(Axis::X), 1.0);
}

#[test]
fn stimulus_enable_updates_flags_and_clears_value() {
    let mut dev = Lis3dsh::new();
    dev.set_acceleration(Axis::X, 3.0).unwrap();
    dev.set_axis_enabled(Axis::Z, true);
    assert!(dev.axis_enabled(Axis::Z));
    assert!(dev.xyz_data_available());

    dev.set_axis_enabled(Axis::X, false);
    assert_eq!(dev.acceleration(Axis::X), 0.0);
    assert!(!dev.xyz_data_available());
    assert!(!dev.data_available(Axis::X));
    assert!(dev.data_available(Axis::Y));
    assert!(dev.data_available(Axis::Z));
    assert_eq!(read_reg(&mut dev, Register::Control4.address()), 0x46);
}

#[test]
fn reset_restores_registers_and_idles() {
    let mut dev = Lis3dsh::new();
    write_reg(&mut dev, Register::Control4.address(), 0x00);
    dev.on_chip_select(true);
    dev.transmit(Register::Control5.address());
    dev.reset();
    assert!(!dev.is_selected());
    assert_eq!(dev.phase(), Phase::Idle);
    assert_eq!(read_reg(&mut dev, Register::Control4.address()), 0x43);
    assert_eq!(read_reg(&mut dev, Register::Status.address()), 0x08);
}

#[test]
fn snapshot_restores_registers_values_and_transaction() {
    let mut dev = Lis3dsh::new();
    write_reg(&mut dev, Register::Control5.address(), 1 << 3);
    dev.set_acceleration(Axis::Y, -4.0).unwrap();
    dev.on_chip_select(true);
    dev.transmit(READ | Register::OutYH.address());
    let snapshot = dev.snapshot();

    let mut other = Lis3dsh::new();
    other.restore(&snapshot);
    assert_eq!(other.sensitivity(), 4);
    assert_eq!(other.acceleration(Axis::Y), -4.0);
    assert!(other.is_selected());
    // the restored transaction keeps reading OUT_Y_H
    assert_eq!(other.transmit(0), dev.transmit(0));
    assert_eq!(other.snapshot(), dev.snapshot());
}

#[test]
fn memory_mapped_view_returns_computed_outputs() {
    let mut dev = Lis3dsh::new();
    dev.set_acceleration(Axis::X, 1.0).unwrap();
    assert_eq!(
        dev.read_sized(Register::OutXL.offset(), AccessWidth::Word),
        0x0343
    );
    dev.write_sized(Register::Control4.offset(), AccessWidth::Byte, 0x17);
    assert!(dev.xyz_data_available());
    assert_eq!(dev.read_native(0x1_0000), 0);
}
