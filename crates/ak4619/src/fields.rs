//! Bit-field accessors.
//!
//! One get/set pair per semantic setting. Every setter is read-modify-write
//! on the containing register (or register group): the current contents are
//! read, only the field's bits replaced, and the whole byte written back,
//! so unrelated settings sharing the register are preserved bit for bit.
//! Selector combinations outside a field's legal range are rejected before
//! any bus traffic. Getters mask and shift the field out; bit patterns the
//! datasheet leaves undefined report [`Error::OutOfRange`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::{I2cPort, SpiPort};
use crate::driver::Ak4619;
use crate::types::{
    AdcChannel, AnalogInputMode, AudioInterfaceFormat, BclkEdge, Converter, DacInputSource,
    DcBlockingFilter, DeemphasisMode, DigitalFilter, MicGain, PowerMode, ResetMode, SdoutMode,
    SlotStart, SoftMute, SystemClock, TdmMode, VolumeTransition, WordLength,
};
use crate::Error;

/// Replace `width` bits of `byte` at `shift` with `field`.
const fn merge(byte: u8, shift: u8, width_mask: u8, field: u8) -> u8 {
    (byte & !(width_mask << shift)) | (field << shift)
}

/// Extract `width` bits of `byte` at `shift`.
const fn extract(byte: u8, shift: u8, width_mask: u8) -> u8 {
    (byte >> shift) & width_mask
}

/// PMAD bits sit at 4..=5, PMDA bits at 1..=2.
const fn power_bit(converter: Converter) -> u8 {
    match converter {
        Converter::Adc1 => 4,
        Converter::Adc2 => 5,
        Converter::Dac1 => 1,
        Converter::Dac2 => 2,
    }
}

/// Soft mute bits sit at 4 (first converter of a side) and 5 (second).
const fn soft_mute_bit(converter: Converter) -> u8 {
    (converter as u8 % 2) + 4
}

impl<I2C, SPI, NCS, D> Ak4619<I2C, SPI, NCS, D>
where
    I2C: I2cPort,
    SPI: SpiPort,
    NCS: OutputPin,
    D: DelayNs,
{
    /// Set the power state of one converter.
    pub fn set_power_mode(&mut self, converter: Converter, mode: PowerMode) -> Result<(), Error> {
        let current = self.read_power_management()?;
        let value = merge(current, power_bit(converter), 0b1, mode as u8);
        self.write_power_management(value)
    }

    /// Power state of one converter.
    pub fn power_mode(&mut self, converter: Converter) -> Result<PowerMode, Error> {
        let value = self.read_power_management()?;
        PowerMode::from_bits(extract(value, power_bit(converter), 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the chip reset state (RSTN).
    pub fn set_reset_mode(&mut self, mode: ResetMode) -> Result<(), Error> {
        let current = self.read_power_management()?;
        let value = merge(current, 0, 0b1, mode as u8);
        self.write_power_management(value)
    }

    /// Chip reset state (RSTN).
    pub fn reset_mode(&mut self) -> Result<ResetMode, Error> {
        let value = self.read_power_management()?;
        ResetMode::from_bits(extract(value, 0, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set stereo or TDM framing.
    pub fn set_tdm_mode(&mut self, mode: TdmMode) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[0] = merge(value[0], 7, 0b1, mode as u8);
        self.write_audio_interface_format(value)
    }

    /// Stereo or TDM framing.
    pub fn tdm_mode(&mut self) -> Result<TdmMode, Error> {
        let value = self.read_audio_interface_format()?;
        TdmMode::from_bits(extract(value[0], 7, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the audio interface data format (DCF).
    pub fn set_audio_format(&mut self, format: AudioInterfaceFormat) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[0] = merge(value[0], 4, 0b111, format as u8);
        self.write_audio_interface_format(value)
    }

    /// Audio interface data format (DCF).
    pub fn audio_format(&mut self) -> Result<AudioInterfaceFormat, Error> {
        let value = self.read_audio_interface_format()?;
        AudioInterfaceFormat::from_bits(extract(value[0], 4, 0b111)).ok_or(Error::OutOfRange)
    }

    /// Set the TDM slot length (DSL).
    pub fn set_slot_length(&mut self, length: WordLength) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[0] = merge(value[0], 2, 0b11, length as u8);
        self.write_audio_interface_format(value)
    }

    /// TDM slot length (DSL).
    pub fn slot_length(&mut self) -> Result<WordLength, Error> {
        let value = self.read_audio_interface_format()?;
        WordLength::from_bits(extract(value[0], 2, 0b11)).ok_or(Error::OutOfRange)
    }

    /// Set the BICK latch edge (BCKP).
    pub fn set_bclk_edge(&mut self, edge: BclkEdge) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[0] = merge(value[0], 1, 0b1, edge as u8);
        self.write_audio_interface_format(value)
    }

    /// BICK latch edge (BCKP).
    pub fn bclk_edge(&mut self) -> Result<BclkEdge, Error> {
        let value = self.read_audio_interface_format()?;
        BclkEdge::from_bits(extract(value[0], 1, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the SDOUT drive timing (SDOPH).
    pub fn set_sdout_mode(&mut self, mode: SdoutMode) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[0] = merge(value[0], 0, 0b1, mode as u8);
        self.write_audio_interface_format(value)
    }

    /// SDOUT drive timing (SDOPH).
    pub fn sdout_mode(&mut self) -> Result<SdoutMode, Error> {
        let value = self.read_audio_interface_format()?;
        SdoutMode::from_bits(extract(value[0], 0, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the TDM slot start basis (SLOT).
    pub fn set_slot_start(&mut self, start: SlotStart) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[1] = merge(value[1], 4, 0b1, start as u8);
        self.write_audio_interface_format(value)
    }

    /// TDM slot start basis (SLOT).
    pub fn slot_start(&mut self) -> Result<SlotStart, Error> {
        let value = self.read_audio_interface_format()?;
        SlotStart::from_bits(extract(value[1], 4, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the ADC output word length (DIDL).
    pub fn set_adc_word_length(&mut self, length: WordLength) -> Result<(), Error> {
        let mut value = self.read_audio_interface_format()?;
        value[1] = merge(value[1], 2, 0b11, length as u8);
        self.write_audio_interface_format(value)
    }

    /// ADC output word length (DIDL).
    pub fn adc_word_length(&mut self) -> Result<WordLength, Error> {
        let value = self.read_audio_interface_format()?;
        WordLength::from_bits(extract(value[1], 2, 0b11)).ok_or(Error::OutOfRange)
    }

    /// Set the DAC input word length (DODL). The DAC data path has no
    /// 32-bit mode.
    pub fn set_dac_word_length(&mut self, length: WordLength) -> Result<(), Error> {
        if matches!(length, WordLength::Bits32) {
            return Err(Error::OutOfRange);
        }
        let mut value = self.read_audio_interface_format()?;
        value[1] = merge(value[1], 0, 0b11, length as u8);
        self.write_audio_interface_format(value)
    }

    /// DAC input word length (DODL).
    pub fn dac_word_length(&mut self) -> Result<WordLength, Error> {
        let value = self.read_audio_interface_format()?;
        WordLength::from_bits(extract(value[1], 0, 0b11)).ok_or(Error::OutOfRange)
    }

    /// Set the system clock rate pairing (FS).
    pub fn set_system_clock_mode(&mut self, clock: SystemClock) -> Result<(), Error> {
        let current = self.read_system_clock()?;
        let value = merge(current, 0, 0b111, clock as u8);
        self.write_system_clock(value)
    }

    /// System clock rate pairing (FS).
    pub fn system_clock_mode(&mut self) -> Result<SystemClock, Error> {
        let value = self.read_system_clock()?;
        SystemClock::from_bits(extract(value, 0, 0b111)).ok_or(Error::OutOfRange)
    }

    /// Set the ADC digital volume ramp speed (ATSPAD).
    pub fn set_adc_volume_transition(&mut self, time: VolumeTransition) -> Result<(), Error> {
        let current = self.read_adc_mute_hpf()?;
        let value = merge(current, 7, 0b1, time as u8);
        self.write_adc_mute_hpf(value)
    }

    /// ADC digital volume ramp speed (ATSPAD).
    pub fn adc_volume_transition(&mut self) -> Result<VolumeTransition, Error> {
        let value = self.read_adc_mute_hpf()?;
        VolumeTransition::from_bits(extract(value, 7, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the DAC digital volume ramp speed (ATSPDA).
    pub fn set_dac_volume_transition(&mut self, time: VolumeTransition) -> Result<(), Error> {
        let current = self.read_dac_mute_filter()?;
        let value = merge(current, 7, 0b1, time as u8);
        self.write_dac_mute_filter(value)
    }

    /// DAC digital volume ramp speed (ATSPDA).
    pub fn dac_volume_transition(&mut self) -> Result<VolumeTransition, Error> {
        let value = self.read_dac_mute_filter()?;
        VolumeTransition::from_bits(extract(value, 7, 0b1)).ok_or(Error::OutOfRange)
    }

    /// Set the soft mute state of one converter. ADC mutes live in 0x0D,
    /// DAC mutes in 0x14.
    pub fn set_soft_mute(&mut self, converter: Converter, mute: SoftMute) -> Result<(), Error> {
        let current = if converter.is_adc() {
            self.read_adc_mute_hpf()?
        } else {
            self.read_dac_mute_filter()?
        };
        let value = merge(current, soft_mute_bit(converter), 0b1, mute as u8);
        if converter.is_adc() {
            self.write_adc_mute_hpf(value)
        } else {
            self.write_dac_mute_filter(value)
        }
    }

    /// Soft mute state of one converter.
    pub fn soft_mute(&mut self, converter: Converter) -> Result<SoftMute, Error> {
        let value = if converter.is_adc() {
            self.read_adc_mute_hpf()?
        } else {
            self.read_dac_mute_filter()?
        };
        SoftMute::from_bits(extract(value, soft_mute_bit(converter), 0b1))
            .ok_or(Error::OutOfRange)
    }

    /// Set the DC-blocking (high-pass) filter of one ADC. DAC converters
    /// are rejected.
    pub fn set_dc_blocking_filter(
        &mut self,
        converter: Converter,
        filter: DcBlockingFilter,
    ) -> Result<(), Error> {
        if !converter.is_adc() {
            return Err(Error::OutOfRange);
        }
        let current = self.read_adc_mute_hpf()?;
        let value = merge(current, converter as u8 + 1, 0b1, filter as u8);
        self.write_adc_mute_hpf(value)
    }

    /// DC-blocking (high-pass) filter state of one ADC.
    pub fn dc_blocking_filter(&mut self, converter: Converter) -> Result<DcBlockingFilter, Error> {
        if !converter.is_adc() {
            return Err(Error::OutOfRange);
        }
        let value = self.read_adc_mute_hpf()?;
        DcBlockingFilter::from_bits(extract(value, converter as u8 + 1, 0b1))
            .ok_or(Error::OutOfRange)
    }

    /// Set the serial data source of one DAC. ADC converters are rejected.
    pub fn set_dac_input_source(
        &mut self,
        converter: Converter,
        source: DacInputSource,
    ) -> Result<(), Error> {
        if converter.is_adc() {
            return Err(Error::OutOfRange);
        }
        let current = self.read_dac_input_select()?;
        let value = merge(current, converter as u8 * 2, 0b11, source as u8);
        self.write_dac_input_select(value)
    }

    /// Serial data source of one DAC.
    pub fn dac_input_source(&mut self, converter: Converter) -> Result<DacInputSource, Error> {
        if converter.is_adc() {
            return Err(Error::OutOfRange);
        }
        let value = self.read_dac_input_select()?;
        DacInputSource::from_bits(extract(value, converter as u8 * 2, 0b11))
            .ok_or(Error::OutOfRange)
    }

    /// Set the de-emphasis filter of one DAC. ADC converters are rejected.
    pub fn set_dac_deemphasis_mode(
        &mut self,
        converter: Converter,
        mode: DeemphasisMode,
    ) -> Result<(), Error> {
        if converter.is_adc() {
            return Err(Error::OutOfRange);
        }
        let current = self.read_dac_deemphasis()?;
        let value = merge(current, converter as u8 * 2, 0b11, mode as u8);
        self.write_dac_deemphasis(value)
    }

    /// De-emphasis filter of one DAC.
    pub fn dac_deemphasis_mode(&mut self, converter: Converter) -> Result<DeemphasisMode, Error> {
        if converter.is_adc() {
            return Err(Error::OutOfRange);
        }
        let value = self.read_dac_deemphasis()?;
        DeemphasisMode::from_bits(extract(value, converter as u8 * 2, 0b11))
            .ok_or(Error::OutOfRange)
    }

    /// Set the mic amp gain of one ADC channel. The gain nibbles pack two
    /// channels per byte, left in the low nibble.
    pub fn set_mic_gain(&mut self, channel: AdcChannel, gain: MicGain) -> Result<(), Error> {
        let mut value = self.read_mic_amp_gain()?;
        let index = (channel as u8 / 2) as usize;
        let shift = (channel as u8 % 2) * 4;
        value[index] = merge(value[index], shift, 0b1111, gain as u8);
        self.write_mic_amp_gain(value)
    }

    /// Mic amp gain of one ADC channel.
    pub fn mic_gain(&mut self, channel: AdcChannel) -> Result<MicGain, Error> {
        let value = self.read_mic_amp_gain()?;
        let index = (channel as u8 / 2) as usize;
        let shift = (channel as u8 % 2) * 4;
        MicGain::from_bits(extract(value[index], shift, 0b1111)).ok_or(Error::OutOfRange)
    }

    /// Set the left/right digital volume pair of one converter. The
    /// containing four-byte block is rewritten whole, with the sibling
    /// converter's pair read back and preserved.
    pub fn set_digital_volume(
        &mut self,
        converter: Converter,
        volume: [u8; 2],
    ) -> Result<(), Error> {
        let mut block = if converter.is_adc() {
            self.read_adc_digital_volume()?
        } else {
            self.read_dac_digital_volume()?
        };
        let base = (converter as u8 % 2) as usize * 2;
        block[base] = volume[0];
        block[base + 1] = volume[1];
        if converter.is_adc() {
            self.write_adc_digital_volume(block)
        } else {
            self.write_dac_digital_volume(block)
        }
    }

    /// Left/right digital volume pair of one converter.
    pub fn digital_volume(&mut self, converter: Converter) -> Result<[u8; 2], Error> {
        let block = if converter.is_adc() {
            self.read_adc_digital_volume()?
        } else {
            self.read_dac_digital_volume()?
        };
        let base = (converter as u8 % 2) as usize * 2;
        Ok([block[base], block[base + 1]])
    }

    /// Set the anti-aliasing/roll-off filter of one converter. The ADC
    /// fields are three bits wide in 0x0A; the DAC fields are two bits in
    /// 0x14 and do not implement the voice filter.
    pub fn set_anti_aliasing_filter(
        &mut self,
        converter: Converter,
        filter: DigitalFilter,
    ) -> Result<(), Error> {
        if converter.is_adc() {
            let current = self.read_adc_digital_filter()?;
            let value = merge(current, converter as u8 * 4, 0b111, filter as u8);
            self.write_adc_digital_filter(value)
        } else {
            if matches!(filter, DigitalFilter::Voice) {
                return Err(Error::OutOfRange);
            }
            let current = self.read_dac_mute_filter()?;
            let value = merge(current, (converter as u8 - 2) * 2, 0b11, filter as u8);
            self.write_dac_mute_filter(value)
        }
    }

    /// Anti-aliasing/roll-off filter of one converter.
    pub fn anti_aliasing_filter(&mut self, converter: Converter) -> Result<DigitalFilter, Error> {
        if converter.is_adc() {
            let value = self.read_adc_digital_filter()?;
            DigitalFilter::from_bits(extract(value, converter as u8 * 4, 0b111))
                .ok_or(Error::OutOfRange)
        } else {
            let value = self.read_dac_mute_filter()?;
            DigitalFilter::from_bits(extract(value, (converter as u8 - 2) * 2, 0b11))
                .ok_or(Error::OutOfRange)
        }
    }

    /// Set the analog input topology of one ADC channel.
    pub fn set_adc_input_mode(
        &mut self,
        channel: AdcChannel,
        mode: AnalogInputMode,
    ) -> Result<(), Error> {
        let current = self.read_adc_analog_input()?;
        let value = merge(current, channel as u8 * 2, 0b11, mode as u8);
        self.write_adc_analog_input(value)
    }

    /// Analog input topology of one ADC channel.
    pub fn adc_input_mode(&mut self, channel: AdcChannel) -> Result<AnalogInputMode, Error> {
        let value = self.read_adc_analog_input()?;
        AnalogInputMode::from_bits(extract(value, channel as u8 * 2, 0b11))
            .ok_or(Error::OutOfRange)
    }
}
