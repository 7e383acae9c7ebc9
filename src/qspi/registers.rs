use bitflags::bitflags;

use crate::regfile::{FieldDef, FieldMode, RegisterDef};

pub const CTRL_BUS: u64 = 0x00;
pub const CTRL_MODE: u64 = 0x04;
pub const RECV_DATA: u64 = 0x08;
pub const BURST_CMD_A: u64 = 0x0C;
pub const BURST_CMD_B: u64 = 0x10;
pub const STATUS: u64 = 0x14;
pub const WRITE_DATA: u64 = 0x18;
pub const READ_DATA: u64 = 0x1C;
pub const ERASE_CMD_A: u64 = 0x28;
pub const ERASE_CMD_B: u64 = 0x2C;
pub const BURST_BREAK: u64 = 0x30;
pub const STATUS_CMD: u64 = 0x34;
pub const UCODE_START: u64 = 0x40;
pub const UCODE_1: u64 = 0x44;

pub const AUTO_MODE: &str = "QSPIC_AUTO_MD";

bitflags! {
    /// Status register 1 of the attached W25Q80DV flash.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FlashStatus: u8 {
        const BUSY = 0b00000001;
        const WEL = 0b00000010;
        const BP0 = 0b00000100;
        const BP1 = 0b00001000;
        const BP2 = 0b00010000;
        const BLOCK_PROTECT = Self::BP0.bits() | Self::BP1.bits() | Self::BP2.bits();
        const TB = 0b00100000;
        const SEC = 0b01000000;
        const SRP0 = 0b10000000;
    }
}

impl FlashStatus {
    pub const POWER_ON: FlashStatus = FlashStatus::empty();

    pub fn block_protect(self) -> u8 {
        (self & FlashStatus::BLOCK_PROTECT).bits() >> 2
    }
}

/// W25Q opcodes the controller can forward. Only a handful are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FlashCommand {
    WriteStatusRegister = 0x01,
    PageProgram = 0x02,
    Read = 0x03,
    WriteDisable = 0x04,
    ReadStatusRegister = 0x05,
    WriteEnable = 0x06,
    FastRead = 0x0B,
    WriteStatusRegister2 = 0x31,
    QuadPageProgram = 0x32,
    ReadStatusRegister2 = 0x35,
    BulkErase = 0x60,
    ReadId = 0x9F,
    ChipErase = 0xC7,
    SectorErase = 0xD8,
    ExitContinuousMode = 0xFF,
}

impl FlashCommand {
    const ALL: [FlashCommand; 15] = [
        FlashCommand::WriteStatusRegister,
        FlashCommand::PageProgram,
        FlashCommand::Read,
        FlashCommand::WriteDisable,
        FlashCommand::ReadStatusRegister,
        FlashCommand::WriteEnable,
        FlashCommand::FastRead,
        FlashCommand::WriteStatusRegister2,
        FlashCommand::QuadPageProgram,
        FlashCommand::ReadStatusRegister2,
        FlashCommand::BulkErase,
        FlashCommand::ReadId,
        FlashCommand::ChipErase,
        FlashCommand::SectorErase,
        FlashCommand::ExitContinuousMode,
    ];

    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.opcode() == opcode)
    }

    /// Opcode carried in the low byte of a command word.
    pub fn from_word(word: u32) -> Option<Self> {
        Self::from_opcode((word & 0xFF) as u8)
    }

    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

const RW: FieldMode = FieldMode::READ_WRITE;
const RO: FieldMode = FieldMode::READ;
const WO: FieldMode = FieldMode::WRITE;

pub static REGISTERS: &[RegisterDef] = &[
    RegisterDef {
        offset: CTRL_BUS,
        name: "QSPIC_CTRLBUS_REG",
        reset: 0x0,
        fields: &[
            FieldDef::flag("QSPIC_SET_SINGLE", 0, RW),
            FieldDef::flag("QSPIC_SET_DUAL", 1, RW),
            FieldDef::flag("QSPIC_SET_QUAD", 2, RW),
            FieldDef::flag("QSPIC_EN_CS", 3, RW),
            FieldDef::flag("QSPIC_DIS_CS", 4, RW),
        ],
    },
    RegisterDef {
        offset: CTRL_MODE,
        name: "QSPIC_CTRLMODE_REG",
        reset: 0x0,
        fields: &[
            FieldDef::flag(AUTO_MODE, 0, RW),
            FieldDef::flag("QSPIC_CLK_MD", 1, RW),
            FieldDef::flag("QSPIC_IO2_OEN", 2, RW),
            FieldDef::flag("QSPIC_IO3_OEN", 3, RW),
            FieldDef::flag("QSPIC_IO2_DAT", 4, RW),
            FieldDef::flag("QSPIC_IO3_DAT", 5, RW),
            FieldDef::flag("QSPIC_HRDY_MD", 6, RW),
            FieldDef::flag("QSPIC_RXD_NEG", 7, RW),
            FieldDef::flag("QSPIC_RPIPE_EN", 8, RW),
            FieldDef::new("QSPIC_PCLK_MD", 9, 3, RW),
            FieldDef::flag("QSPIC_FORCENSEQ_EN", 12, RW),
            FieldDef::flag("QSPIC_USE_32BA", 13, RW),
        ],
    },
    RegisterDef {
        offset: RECV_DATA,
        name: "QSPIC_RECVDATA_REG",
        reset: 0x0,
        fields: &[FieldDef::new("RECVDATA", 0, 32, RW)],
    },
    RegisterDef {
        offset: BURST_CMD_A,
        name: "QSPIC_BURSTCMDA_REG",
        reset: 0x0,
        fields: &[
            FieldDef::new("QSPIC_INST", 0, 8, RW),
            FieldDef::new("QSPIC_INST_WB", 8, 8, RW),
            FieldDef::new("QSPIC_EXT_BYTE", 16, 8, RW),
            FieldDef::new("QSPIC_INST_TX_MD", 24, 2, RW),
            FieldDef::new("QSPIC_ADR_TX_MD", 26, 2, RW),
            FieldDef::new("QSPIC_EXT_TX_MD", 28, 2, RW),
            FieldDef::new("QSPIC_DMY_TX_MD", 30, 2, RW),
        ],
    },
    RegisterDef {
        offset: BURST_CMD_B,
        name: "QSPIC_BURSTCMDB_REG",
        reset: 0x0,
        fields: &[
            FieldDef::new("QSPIC_DAT_RX_MD", 0, 2, RW),
            FieldDef::flag("QSPIC_EXT_BYTE_EN", 2, RW),
            FieldDef::flag("QSPIC_EXT_HJF_DS", 3, RW),
            FieldDef::new("QSPIC_DMY_NUM", 4, 2, RW),
            FieldDef::flag("QSPIC_INST_MD", 6, RW),
            FieldDef::flag("QSPIC_WRAP_MD", 7, RW),
            FieldDef::new("QSPIC_WRAP_LEN", 8, 2, RW),
            FieldDef::new("QSPIC_WRAP_SIZE", 10, 2, RW),
            FieldDef::new("QSPIC_CS_HIGH_MIN", 12, 3, RW),
            FieldDef::flag("QSPIC_DMY_FORCE", 15, RW),
        ],
    },
    RegisterDef {
        offset: STATUS,
        name: "QSPIC_STATUS_REG",
        reset: 0x0,
        fields: &[FieldDef::flag("QSPIC_BUSY", 0, RO)],
    },
    RegisterDef {
        offset: WRITE_DATA,
        name: "QSPIC_WRITEDATA",
        reset: 0x0,
        fields: &[FieldDef::new("QSPIC_WRITEDATA", 0, 32, WO)],
    },
    // Served by the command interpreter.
    RegisterDef {
        offset: READ_DATA,
        name: "QSPIC_READDATA",
        reset: 0x0,
        fields: &[FieldDef::new("QSPIC_READDATA", 0, 32, RO)],
    },
    RegisterDef {
        offset: ERASE_CMD_A,
        name: "QSPIC_ERASECMDA_REG",
        reset: 0x0,
        fields: &[
            FieldDef::new("QSPIC_ERS_INST", 0, 8, RW),
            FieldDef::new("QSPIC_WEN_INST", 8, 8, RW),
            FieldDef::new("QSPIC_SUS_INST", 16, 8, RW),
            FieldDef::new("QSPIC_RES_INST", 24, 8, RW),
        ],
    },
    RegisterDef {
        offset: ERASE_CMD_B,
        name: "QSPIC_ERASECMDB_REG",
        reset: 0x0,
        fields: &[
            FieldDef::new("QSPIC_ERS_TX_MD", 0, 2, RW),
            FieldDef::new("QSPIC_WEN_TX_MD", 2, 2, RW),
            FieldDef::new("QSPIC_SUS_TX_MD", 4, 2, RW),
            FieldDef::new("QSPIC_RES_TX_MD", 6, 2, RW),
            FieldDef::new("QSPIC_EAD_TX_MD", 8, 2, RW),
            FieldDef::new("QSPIC_ERS_CS_HI", 10, 5, RW),
            FieldDef::new("QSPIC_ERSRES_HLD", 16, 4, RW),
            FieldDef::new("QSPIC_RESSUS_DLY", 24, 6, RW),
        ],
    },
    RegisterDef {
        offset: BURST_BREAK,
        name: "QSPIC_BURSTBRK_REG",
        reset: 0x0,
        fields: &[
            FieldDef::new("QSPIC_BRK_WRD", 0, 16, RW),
            FieldDef::flag("QSPIC_BRK_EN", 16, RW),
            FieldDef::flag("QSPIC_BRK_SZ", 17, RW),
            FieldDef::new("QSPIC_BRK_TX_MD", 18, 2, RW),
            FieldDef::flag("QSPIC_SEC_HF_DS", 20, RW),
        ],
    },
    RegisterDef {
        offset: STATUS_CMD,
        name: "QSPIC_STATUSCMD_REG",
        reset: 0x0,
        fields: &[
            FieldDef::new("QSPIC_RSTAT_INST", 0, 8, RW),
            FieldDef::new("QSPIC_RSTAT_TX_MD", 8, 2, RW),
            FieldDef::new("QSPIC_RSTAT_RX_MD", 10, 2, RW),
            FieldDef::new("QSPIC_BUSY_POS", 12, 3, RW),
            FieldDef::flag("QSPIC_BUSY_VAL", 15, RW),
            FieldDef::new("QSPIC_RESSTS_DLY", 16, 6, RW),
            FieldDef::flag("QSPIC_STSDLY_SEL", 22, RW),
        ],
    },
    RegisterDef {
        offset: UCODE_START,
        name: "QSPIC_UCODE_START",
        reset: 0x5500_0025,
        fields: &[
            FieldDef::flag("CMD_VALID", 0, RW),
            FieldDef::new("CMD_TX_MD", 1, 2, RW),
            FieldDef::new("CMD_NBYTES", 3, 5, RW),
            FieldDef::new("CMD_WT_CNT_LS", 8, 8, RW),
            FieldDef::new("CMD_WT_CNT_MS", 16, 8, RW),
            FieldDef::new("CMD_BYTE1", 24, 8, RW),
        ],
    },
    RegisterDef {
        offset: UCODE_1,
        name: "QSPIC_UCODE_1",
        reset: 0x5555_5555,
        fields: &[
            FieldDef::new("CMD_BYTE2", 0, 8, RW),
            FieldDef::new("CMD_BYTE3", 8, 8, RW),
            FieldDef::new("CMD_BYTE4", 16, 8, RW),
            FieldDef::new("CMD_BYTE5", 24, 8, RW),
        ],
    },
];
