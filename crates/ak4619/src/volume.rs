//! Digital volume unit conversion.
//!
//! The volume registers count attenuation in 0.5 dB steps downward from a
//! converter-specific 0 dB reference: code 48 on the ADC side (+24 dB max),
//! code 24 on the DAC side (+12 dB max). Conversion is pure arithmetic; no
//! bus traffic.

use crate::types::ConverterKind;

/// Digital volume setting that fully mutes a converter.
pub const MUTE_DB: f32 = -115.5;

/// ADC volume code at the 0 dB reference.
const ADC_ZERO_DB_CODE: i32 = 48;
/// DAC volume code at the 0 dB reference.
const DAC_ZERO_DB_CODE: i32 = 24;

/// Convert a volume in dB to the device's 8-bit volume code.
///
/// Out-of-scale values saturate at `0x00` (maximum gain) and `0xFF`
/// (maximum attenuation) instead of wrapping.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=255 first
pub fn db_to_code(kind: ConverterKind, volume_db: f32) -> u8 {
    let steps = round_to_steps(volume_db);
    let code = match kind {
        ConverterKind::Adc => ADC_ZERO_DB_CODE - steps,
        ConverterKind::Dac => DAC_ZERO_DB_CODE - steps,
    };
    code.clamp(0, 255) as u8
}

/// `dB x 2` rounded to the nearest whole step, halves away from zero.
/// `f32::round` lives in std, not core.
#[allow(clippy::cast_possible_truncation)]
fn round_to_steps(volume_db: f32) -> i32 {
    let scaled = volume_db * 2.0;
    if scaled >= 0.0 {
        (scaled + 0.5) as i32
    } else {
        (scaled - 0.5) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_reference_points() {
        assert_eq!(db_to_code(ConverterKind::Adc, 0.0), 48);
        assert_eq!(db_to_code(ConverterKind::Adc, 24.0), 0);
        assert_eq!(db_to_code(ConverterKind::Adc, -104.0), 255);
    }

    #[test]
    fn dac_reference_points() {
        assert_eq!(db_to_code(ConverterKind::Dac, 0.0), 24);
        assert_eq!(db_to_code(ConverterKind::Dac, 12.0), 0);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        assert_eq!(db_to_code(ConverterKind::Adc, 1000.0), 0);
        assert_eq!(db_to_code(ConverterKind::Adc, -1000.0), 255);
        assert_eq!(db_to_code(ConverterKind::Dac, 1000.0), 0);
        assert_eq!(db_to_code(ConverterKind::Dac, -1000.0), 255);
    }

    #[test]
    fn mute_level_hits_the_dac_floor_exactly() {
        assert_eq!(db_to_code(ConverterKind::Dac, MUTE_DB), 255);
    }

    #[test]
    fn half_db_steps_round_to_nearest() {
        assert_eq!(db_to_code(ConverterKind::Adc, -0.5), 49);
        assert_eq!(db_to_code(ConverterKind::Adc, 0.5), 47);
        // 0.3 dB is closer to the 0.5 dB step than to 0.
        assert_eq!(db_to_code(ConverterKind::Adc, 0.3), 47);
        assert_eq!(db_to_code(ConverterKind::Adc, 0.2), 48);
    }
}
