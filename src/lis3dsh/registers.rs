use crate::regfile::{FieldDef, FieldMode, RegisterDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    // Reserved: 0x00 - 0x0B
    WhoAmI = 0x0F,
    Control4 = 0x20,
    Control5 = 0x24,
    Status = 0x27,
    OutXL = 0x28,
    OutXH = 0x29,
    OutYL = 0x2A,
    OutYH = 0x2B,
    OutZL = 0x2C,
    OutZH = 0x2D,
}

impl Register {
    pub fn from_address(address: u8) -> Option<Self> {
        Some(match address {
            0x0F => Register::WhoAmI,
            0x20 => Register::Control4,
            0x24 => Register::Control5,
            0x27 => Register::Status,
            0x28 => Register::OutXL,
            0x29 => Register::OutXH,
            0x2A => Register::OutYL,
            0x2B => Register::OutYH,
            0x2C => Register::OutZL,
            0x2D => Register::OutZH,
            _ => return None,
        })
    }

    pub const fn address(self) -> u8 {
        self as u8
    }

    pub const fn offset(self) -> u64 {
        self as u64
    }
}

pub const X_AXIS_ENABLE: &str = "X_AXIS_ENABLE";
pub const Y_AXIS_ENABLE: &str = "Y_AXIS_ENABLE";
pub const Z_AXIS_ENABLE: &str = "Z_AXIS_ENABLE";
pub const OUTPUT_DATA_RATE: &str = "OUTPUT_DATA_RATE";
pub const FULL_SCALE: &str = "FSCALE";
pub const X_DATA_AVAILABLE: &str = "X_DATA_AVAILABLE";
pub const Y_DATA_AVAILABLE: &str = "Y_DATA_AVAILABLE";
pub const Z_DATA_AVAILABLE: &str = "Z_DATA_AVAILABLE";
pub const XYZ_DATA_AVAILABLE: &str = "ZYX_DATA_AVAILABLE";

const RO: FieldMode = FieldMode::READ;
const RW: FieldMode = FieldMode::READ_WRITE;

pub static REGISTERS: &[RegisterDef] = &[
    RegisterDef {
        offset: Register::WhoAmI.offset(),
        name: "WHO_AM_I",
        reset: 0x3F,
        fields: &[FieldDef::new("WHO_AM_I", 0, 8, RO)],
    },
    RegisterDef {
        offset: Register::Control4.offset(),
        name: "CTRL_REG4",
        reset: 0x43,
        fields: &[
            FieldDef::flag(X_AXIS_ENABLE, 0, RW),
            FieldDef::flag(Y_AXIS_ENABLE, 1, RW),
            FieldDef::flag(Z_AXIS_ENABLE, 2, RW),
            FieldDef::flag("BDU", 3, RW),
            FieldDef::new(OUTPUT_DATA_RATE, 4, 4, RW),
        ],
    },
    RegisterDef {
        offset: Register::Control5.offset(),
        name: "CTRL_REG5",
        reset: 0x00,
        fields: &[
            FieldDef::flag("SIM", 0, RW),
            FieldDef::new("ST", 1, 2, RW),
            FieldDef::new(FULL_SCALE, 3, 3, RW),
            FieldDef::new("BW", 6, 2, RW),
        ],
    },
    RegisterDef {
        offset: Register::Status.offset(),
        name: "STATUS",
        reset: 0x08,
        fields: &[
            FieldDef::flag(X_DATA_AVAILABLE, 0, RO),
            FieldDef::flag(Y_DATA_AVAILABLE, 1, RO),
            FieldDef::flag(Z_DATA_AVAILABLE, 2, RO),
            FieldDef::flag(XYZ_DATA_AVAILABLE, 3, RO),
            FieldDef::flag("X_DATA_OVERRUN", 4, RO),
            FieldDef::flag("Y_DATA_OVERRUN", 5, RO),
            FieldDef::flag("Z_DATA_OVERRUN", 6, RO),
            FieldDef::flag("ZYX_DATA_OVERRUN", 7, RO),
        ],
    },
    // Output registers are placeholders; reads are served from the axis values.
    RegisterDef {
        offset: Register::OutXL.offset(),
        name: "OUT_X_L",
        reset: 0,
        fields: &[FieldDef::new("X_ACCEL_DATA[7:0]", 0, 8, RO)],
    },
    RegisterDef {
        offset: Register::OutXH.offset(),
        name: "OUT_X_H",
        reset: 0,
        fields: &[FieldDef::new("X_ACCEL_DATA[15:8]", 0, 8, RO)],
    },
    RegisterDef {
        offset: Register::OutYL.offset(),
        name: "OUT_Y_L",
        reset: 0,
        fields: &[FieldDef::new("Y_ACCEL_DATA[7:0]", 0, 8, RO)],
    },
    RegisterDef {
        offset: Register::OutYH.offset(),
        name: "OUT_Y_H",
        reset: 0,
        fields: &[FieldDef::new("Y_ACCEL_DATA[15:8]", 0, 8, RO)],
    },
    RegisterDef {
        offset: Register::OutZL.offset(),
        name: "OUT_Z_L",
        reset: 0,
        fields: &[FieldDef::new("Z_ACCEL_DATA[7:0]", 0, 8, RO)],
    },
    RegisterDef {
        offset: Register::OutZH.offset(),
        name: "OUT_Z_H",
        reset: 0,
        fields: &[FieldDef::new("Z_ACCEL_DATA[15:8]", 0, 8, RO)],
    },
];
