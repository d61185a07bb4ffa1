//! AK4619 register map and control-port framing constants.
//!
//! Reference: AKM AK4619VN datasheet, control register map. All registers
//! are one byte wide and individually addressable; 0x0C is a gap in the
//! map. Several registers form logical groups (the two interface-format
//! bytes, the two mic-gain bytes, the four-byte ADC and DAC volume blocks)
//! that the driver accesses as ordered sequences of single-byte
//! transactions.

/// Power management: RSTN (bit 0), PMDA1/2 (bits 1:2), PMAD1/2 (bits 4:5).
pub const REG_POWER_MANAGEMENT: u8 = 0x00;
/// Audio interface format byte A: TDM (7), DCF (6:4), DSL (3:2), BCKP (1),
/// SDOPH (0).
pub const REG_AUDIO_IF_FORMAT_A: u8 = 0x01;
/// Audio interface format byte B: SLOT (4), DIDL (3:2), DODL (1:0).
pub const REG_AUDIO_IF_FORMAT_B: u8 = 0x02;
/// System clock setting: FS (2:0).
pub const REG_SYSTEM_CLOCK: u8 = 0x03;
/// Mic amp gain byte A: ADC1 left/right gain nibbles.
pub const REG_MIC_AMP_GAIN_A: u8 = 0x04;
/// Mic amp gain byte B: ADC2 left/right gain nibbles.
pub const REG_MIC_AMP_GAIN_B: u8 = 0x05;
/// ADC1 left digital volume.
pub const REG_ADC1_L_VOLUME: u8 = 0x06;
/// ADC1 right digital volume.
pub const REG_ADC1_R_VOLUME: u8 = 0x07;
/// ADC2 left digital volume.
pub const REG_ADC2_L_VOLUME: u8 = 0x08;
/// ADC2 right digital volume.
pub const REG_ADC2_R_VOLUME: u8 = 0x09;
/// ADC digital filter setting: one 3-bit filter field per ADC.
pub const REG_ADC_DIGITAL_FILTER: u8 = 0x0A;
/// ADC analog input setting: one 2-bit topology field per channel.
pub const REG_ADC_ANALOG_INPUT: u8 = 0x0B;
/// ADC mute and HPF control: ATSPAD (7), soft mutes (5:4), HPF disables
/// (2:1).
pub const REG_ADC_MUTE_HPF: u8 = 0x0D;
/// DAC1 left digital volume.
pub const REG_DAC1_L_VOLUME: u8 = 0x0E;
/// DAC1 right digital volume.
pub const REG_DAC1_R_VOLUME: u8 = 0x0F;
/// DAC2 left digital volume.
pub const REG_DAC2_L_VOLUME: u8 = 0x10;
/// DAC2 right digital volume.
pub const REG_DAC2_R_VOLUME: u8 = 0x11;
/// DAC input select: one 2-bit source field per DAC.
pub const REG_DAC_INPUT_SELECT: u8 = 0x12;
/// DAC de-emphasis: one 2-bit mode field per DAC.
pub const REG_DAC_DEEMPHASIS: u8 = 0x13;
/// DAC mute and filter: ATSPDA (7), soft mutes (5:4), roll-off filters
/// (3:0).
pub const REG_DAC_MUTE_FILTER: u8 = 0x14;

/// Highest valid register address. Addresses beyond it are rejected before
/// any bus traffic; the 0x0C gap is not checked, matching the device's
/// tolerance of it.
pub const REG_LAST: u8 = REG_DAC_MUTE_FILTER;

/// 7-bit I2C device address with the A0 strap at GND; A0 at VDD adds one.
pub const I2C_DEVICE_ADDRESS: u8 = 0b001_0000;

/// SPI command byte opening a register write frame.
pub const SPI_CMD_WRITE: u8 = 0xC3;
/// SPI command byte opening a register read frame.
pub const SPI_CMD_READ: u8 = 0x43;
/// Bus-activation sequence the device requires once before any SPI
/// register traffic.
pub const SPI_ACTIVATE_FRAME: [u8; 4] = [0xDE, 0xAD, 0xDA, 0x7A];

/// Power management value enabling all four converters in normal operation.
pub const PM_ALL_CONVERTERS_ON: u8 = 0b0011_0111;
/// Interface format pair for TDM-128 I2S slave operation, 32-bit ADC
/// slots, 24-bit DAC slots.
pub const IF_FORMAT_TDM128_I2S: [u8; 2] = [0b1010_1100, 0b0001_1100];
/// DAC mute/filter value: sharp roll-off on both DACs, unmuted.
pub const DAC_SHARP_ROLL_OFF: u8 = 0b0000_0000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_addresses_match_datasheet() {
        assert_eq!(REG_POWER_MANAGEMENT, 0x00);
        assert_eq!(REG_AUDIO_IF_FORMAT_A, 0x01);
        assert_eq!(REG_AUDIO_IF_FORMAT_B, 0x02);
        assert_eq!(REG_SYSTEM_CLOCK, 0x03);
        assert_eq!(REG_MIC_AMP_GAIN_A, 0x04);
        assert_eq!(REG_ADC1_L_VOLUME, 0x06);
        assert_eq!(REG_ADC_MUTE_HPF, 0x0D);
        assert_eq!(REG_DAC1_L_VOLUME, 0x0E);
        assert_eq!(REG_DAC_MUTE_FILTER, 0x14);
    }

    #[test]
    fn volume_blocks_are_contiguous() {
        assert_eq!(REG_ADC1_R_VOLUME, REG_ADC1_L_VOLUME + 1);
        assert_eq!(REG_ADC2_L_VOLUME, REG_ADC1_L_VOLUME + 2);
        assert_eq!(REG_ADC2_R_VOLUME, REG_ADC1_L_VOLUME + 3);
        assert_eq!(REG_DAC1_R_VOLUME, REG_DAC1_L_VOLUME + 1);
        assert_eq!(REG_DAC2_L_VOLUME, REG_DAC1_L_VOLUME + 2);
        assert_eq!(REG_DAC2_R_VOLUME, REG_DAC1_L_VOLUME + 3);
    }

    #[test]
    fn address_0x0c_is_a_gap() {
        let named = [
            REG_POWER_MANAGEMENT,
            REG_AUDIO_IF_FORMAT_A,
            REG_AUDIO_IF_FORMAT_B,
            REG_SYSTEM_CLOCK,
            REG_MIC_AMP_GAIN_A,
            REG_MIC_AMP_GAIN_B,
            REG_ADC1_L_VOLUME,
            REG_ADC1_R_VOLUME,
            REG_ADC2_L_VOLUME,
            REG_ADC2_R_VOLUME,
            REG_ADC_DIGITAL_FILTER,
            REG_ADC_ANALOG_INPUT,
            REG_ADC_MUTE_HPF,
            REG_DAC1_L_VOLUME,
            REG_DAC1_R_VOLUME,
            REG_DAC2_L_VOLUME,
            REG_DAC2_R_VOLUME,
            REG_DAC_INPUT_SELECT,
            REG_DAC_DEEMPHASIS,
            REG_DAC_MUTE_FILTER,
        ];
        assert_eq!(named.len(), 20);
        assert!(!named.contains(&0x0C));
        for addr in named {
            assert!(addr <= REG_LAST);
        }
    }

    #[test]
    fn bring_up_power_value_covers_all_converters() {
        // RSTN + PMDA1 + PMDA2 + PMAD1 + PMAD2
        assert_eq!(
            PM_ALL_CONVERTERS_ON,
            1 | (1 << 1) | (1 << 2) | (1 << 4) | (1 << 5)
        );
    }
}
