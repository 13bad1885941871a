//! GPIO / peripheral assignments for the Raspberry Pi station board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding line numbers or bus addresses.

// ---------------------------------------------------------------------------
// Stepper driver (STEP/DIR driver board, BCM numbering)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = west, LOW = east.
pub const STEPPER_DIR_LINE: u32 = 20;
/// Digital output: one rising edge per step.
pub const STEPPER_STEP_LINE: u32 = 21;
/// Digital output: driver enable, active LOW.
pub const STEPPER_ENABLE_LINE: u32 = 16;

/// Consumer label shown in `gpioinfo`.
pub const GPIO_CONSUMER: &str = "heliostat";

// ---------------------------------------------------------------------------
// Sensors: I2C bus 1 (7-bit addresses)
// ---------------------------------------------------------------------------

/// BME280 temperature / pressure / humidity (SDO low).
pub const BME280_ADDR: u8 = 0x76;
/// TSL2591 visible + IR light.
pub const TSL2591_ADDR: u8 = 0x29;
/// LTR390 UV.
pub const LTR390_ADDR: u8 = 0x53;
/// ICM20948 9-DoF IMU (AD0 low).
pub const ICM20948_ADDR: u8 = 0x68;
/// SGP40 VOC.
pub const SGP40_ADDR: u8 = 0x59;
