//! Device handle and whole-register accessors.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::{I2cPort, SpiPort};
use crate::registers::{
    REG_ADC1_L_VOLUME, REG_ADC_ANALOG_INPUT, REG_ADC_DIGITAL_FILTER, REG_ADC_MUTE_HPF,
    REG_AUDIO_IF_FORMAT_A, REG_DAC1_L_VOLUME, REG_DAC_DEEMPHASIS, REG_DAC_INPUT_SELECT,
    REG_DAC_MUTE_FILTER, REG_MIC_AMP_GAIN_A, REG_POWER_MANAGEMENT, REG_SYSTEM_CLOCK,
};
use crate::transport::{Interface, NoPort, A0};
use crate::Error;

/// One AK4619 bound to its control transport.
///
/// The handle drives the control port only; the audio data path never
/// passes through it. Register contents are not cached: every get issues a
/// live bus read and every set a live bus write, so two handles on one bus
/// observe each other's writes (and torn multi-byte state if the caller
/// interleaves them).
pub struct Ak4619<I2C, SPI, NCS, D> {
    interface: Interface<I2C, SPI, NCS>,
    delay: D,
}

impl<I2C, SPI, NCS, D> Ak4619<I2C, SPI, NCS, D> {
    /// Create a handle over an already-selected transport binding.
    ///
    /// The binding is fixed for the handle's lifetime; a handle built over
    /// [`Interface::Uninit`] fails every register operation.
    pub fn new(interface: Interface<I2C, SPI, NCS>, delay: D) -> Self {
        Self { interface, delay }
    }

    #[cfg(test)]
    pub(crate) fn interface(&self) -> &Interface<I2C, SPI, NCS> {
        &self.interface
    }

    #[cfg(test)]
    pub(crate) fn interface_mut(&mut self) -> &mut Interface<I2C, SPI, NCS> {
        &mut self.interface
    }
}

impl<SPI, NCS, D> Ak4619<NoPort, SPI, NCS, D> {
    /// Create a handle bound to SPI with a dedicated chip-select pin.
    pub fn new_spi(port: SPI, ncs: NCS, delay: D) -> Self {
        Self::new(Interface::Spi { port, ncs }, delay)
    }
}

impl<I2C, D> Ak4619<I2C, NoPort, NoPort, D> {
    /// Create a handle bound to I2C at the address selected by `a0`.
    pub fn new_i2c(port: I2C, a0: A0, delay: D) -> Self {
        Self::new(Interface::I2c { port, a0 }, delay)
    }
}

impl<I2C, SPI, NCS, D> Ak4619<I2C, SPI, NCS, D>
where
    I2C: I2cPort,
    SPI: SpiPort,
    NCS: OutputPin,
    D: DelayNs,
{
    /// Run the transport activation the device needs before register
    /// traffic: the SPI bus-activation frame on SPI handles, nothing on
    /// I2C handles.
    pub fn init(&mut self) -> Result<(), Error> {
        match self.interface {
            Interface::Spi { .. } => {}
            Interface::I2c { .. } => return Ok(()),
            Interface::Uninit => return Err(Error::NotBound),
        }
        self.activate_spi()
    }

    /// Send the SPI bus-activation frame.
    pub fn activate_spi(&mut self) -> Result<(), Error> {
        self.interface.activate_spi(&mut self.delay)
    }

    /// Read one register byte.
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        self.interface.read_register(&mut self.delay, register)
    }

    /// Write one register byte.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.interface.write_register(&mut self.delay, register, value)
    }

    /// Ordered single-byte reads at consecutive addresses. Aborts on the
    /// first failing byte, leaving earlier bytes filled in.
    fn read_sequence(&mut self, first: u8, value: &mut [u8]) -> Result<(), Error> {
        for (offset, byte) in value.iter_mut().enumerate() {
            *byte = self.read_register(first + offset as u8)?;
        }
        Ok(())
    }

    /// Ordered single-byte writes at consecutive addresses. Aborts on the
    /// first failing byte; bytes already written are not rolled back.
    fn write_sequence(&mut self, first: u8, value: &[u8]) -> Result<(), Error> {
        for (offset, byte) in value.iter().enumerate() {
            self.write_register(first + offset as u8, *byte)?;
        }
        Ok(())
    }

    fn read_pair(&mut self, first: u8) -> Result<[u8; 2], Error> {
        let mut value = [0u8; 2];
        self.read_sequence(first, &mut value)?;
        Ok(value)
    }

    fn read_quad(&mut self, first: u8) -> Result<[u8; 4], Error> {
        let mut value = [0u8; 4];
        self.read_sequence(first, &mut value)?;
        Ok(value)
    }

    /// Read the power management register (0x00).
    pub fn read_power_management(&mut self) -> Result<u8, Error> {
        self.read_register(REG_POWER_MANAGEMENT)
    }

    /// Write the power management register (0x00).
    pub fn write_power_management(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_POWER_MANAGEMENT, value)
    }

    /// Read the audio interface format pair (0x01-0x02).
    pub fn read_audio_interface_format(&mut self) -> Result<[u8; 2], Error> {
        self.read_pair(REG_AUDIO_IF_FORMAT_A)
    }

    /// Write the audio interface format pair (0x01-0x02).
    pub fn write_audio_interface_format(&mut self, value: [u8; 2]) -> Result<(), Error> {
        self.write_sequence(REG_AUDIO_IF_FORMAT_A, &value)
    }

    /// Read the system clock setting register (0x03).
    pub fn read_system_clock(&mut self) -> Result<u8, Error> {
        self.read_register(REG_SYSTEM_CLOCK)
    }

    /// Write the system clock setting register (0x03).
    pub fn write_system_clock(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_SYSTEM_CLOCK, value)
    }

    /// Read the mic amp gain pair (0x04-0x05).
    pub fn read_mic_amp_gain(&mut self) -> Result<[u8; 2], Error> {
        self.read_pair(REG_MIC_AMP_GAIN_A)
    }

    /// Write the mic amp gain pair (0x04-0x05).
    pub fn write_mic_amp_gain(&mut self, value: [u8; 2]) -> Result<(), Error> {
        self.write_sequence(REG_MIC_AMP_GAIN_A, &value)
    }

    /// Read the four ADC digital volume bytes (0x06-0x09).
    pub fn read_adc_digital_volume(&mut self) -> Result<[u8; 4], Error> {
        self.read_quad(REG_ADC1_L_VOLUME)
    }

    /// Write the four ADC digital volume bytes (0x06-0x09).
    pub fn write_adc_digital_volume(&mut self, value: [u8; 4]) -> Result<(), Error> {
        self.write_sequence(REG_ADC1_L_VOLUME, &value)
    }

    /// Read the ADC digital filter register (0x0A).
    pub fn read_adc_digital_filter(&mut self) -> Result<u8, Error> {
        self.read_register(REG_ADC_DIGITAL_FILTER)
    }

    /// Write the ADC digital filter register (0x0A).
    pub fn write_adc_digital_filter(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_ADC_DIGITAL_FILTER, value)
    }

    /// Read the ADC analog input setting register (0x0B).
    pub fn read_adc_analog_input(&mut self) -> Result<u8, Error> {
        self.read_register(REG_ADC_ANALOG_INPUT)
    }

    /// Write the ADC analog input setting register (0x0B).
    pub fn write_adc_analog_input(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_ADC_ANALOG_INPUT, value)
    }

    /// Read the ADC mute and HPF control register (0x0D).
    pub fn read_adc_mute_hpf(&mut self) -> Result<u8, Error> {
        self.read_register(REG_ADC_MUTE_HPF)
    }

    /// Write the ADC mute and HPF control register (0x0D).
    pub fn write_adc_mute_hpf(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_ADC_MUTE_HPF, value)
    }

    /// Read the four DAC digital volume bytes (0x0E-0x11).
    pub fn read_dac_digital_volume(&mut self) -> Result<[u8; 4], Error> {
        self.read_quad(REG_DAC1_L_VOLUME)
    }

    /// Write the four DAC digital volume bytes (0x0E-0x11).
    pub fn write_dac_digital_volume(&mut self, value: [u8; 4]) -> Result<(), Error> {
        self.write_sequence(REG_DAC1_L_VOLUME, &value)
    }

    /// Read the DAC input select register (0x12).
    pub fn read_dac_input_select(&mut self) -> Result<u8, Error> {
        self.read_register(REG_DAC_INPUT_SELECT)
    }

    /// Write the DAC input select register (0x12).
    pub fn write_dac_input_select(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_DAC_INPUT_SELECT, value)
    }

    /// Read the DAC de-emphasis register (0x13).
    pub fn read_dac_deemphasis(&mut self) -> Result<u8, Error> {
        self.read_register(REG_DAC_DEEMPHASIS)
    }

    /// Write the DAC de-emphasis register (0x13).
    pub fn write_dac_deemphasis(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_DAC_DEEMPHASIS, value)
    }

    /// Read the DAC mute and filter register (0x14).
    pub fn read_dac_mute_filter(&mut self) -> Result<u8, Error> {
        self.read_register(REG_DAC_MUTE_FILTER)
    }

    /// Write the DAC mute and filter register (0x14).
    pub fn write_dac_mute_filter(&mut self, value: u8) -> Result<(), Error> {
        self.write_register(REG_DAC_MUTE_FILTER, value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::bus::BusError;

    /// Scripted SPI port (one outcome per transaction, `Ok` past the end)
    /// recording every attempted frame.
    struct SpiScript {
        outcomes: Vec<Result<(), BusError>>,
        cursor: usize,
        frames: Vec<Vec<u8>>,
        read_back: u8,
    }

    impl SpiScript {
        fn ok() -> Self {
            Self::with(Vec::new())
        }

        fn with(outcomes: Vec<Result<(), BusError>>) -> Self {
            Self {
                outcomes,
                cursor: 0,
                frames: Vec::new(),
                read_back: 0,
            }
        }

        fn next_outcome(&mut self) -> Result<(), BusError> {
            let outcome = self.outcomes.get(self.cursor).copied().unwrap_or(Ok(()));
            self.cursor += 1;
            outcome
        }
    }

    impl SpiPort for SpiScript {
        fn transmit(&mut self, frame: &[u8]) -> Result<(), BusError> {
            self.frames.push(frame.to_vec());
            self.next_outcome()
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), BusError> {
            self.frames.push(write.to_vec());
            let outcome = self.next_outcome();
            if outcome.is_ok() {
                if let Some(last) = read.last_mut() {
                    *last = self.read_back;
                }
            }
            outcome
        }
    }

    #[derive(Default)]
    struct PinLog {
        levels: Vec<bool>,
    }

    impl embedded_hal::digital::ErrorType for PinLog {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for PinLog {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Recording I2C port answering every read with `read_back`.
    struct I2cLog {
        transactions: Vec<(u8, u8, Option<u8>)>,
        read_back: u8,
    }

    impl I2cLog {
        fn new() -> Self {
            Self {
                transactions: Vec::new(),
                read_back: 0,
            }
        }
    }

    impl I2cPort for I2cLog {
        fn mem_write(&mut self, address: u8, register: u8, value: u8) -> Result<(), BusError> {
            self.transactions.push((address, register, Some(value)));
            Ok(())
        }

        fn mem_read(&mut self, address: u8, register: u8) -> Result<u8, BusError> {
            self.transactions.push((address, register, None));
            Ok(self.read_back)
        }
    }

    fn spi_codec(script: SpiScript) -> Ak4619<NoPort, SpiScript, PinLog, NoDelay> {
        Ak4619::new_spi(script, PinLog::default(), NoDelay)
    }

    fn frames(codec: Ak4619<NoPort, SpiScript, PinLog, NoDelay>) -> Vec<Vec<u8>> {
        match codec.interface {
            Interface::Spi { port, .. } => port.frames,
            _ => unreachable!(),
        }
    }

    #[test]
    fn init_activates_spi_handles() {
        let mut codec = spi_codec(SpiScript::ok());
        codec.init().unwrap();
        assert_eq!(frames(codec), vec![vec![0xDE, 0xAD, 0xDA, 0x7A]]);
    }

    #[test]
    fn init_is_a_no_op_on_i2c_handles() {
        let mut codec = Ak4619::new_i2c(I2cLog::new(), A0::Gnd, NoDelay);
        codec.init().unwrap();
        match codec.interface {
            Interface::I2c { port, .. } => assert!(port.transactions.is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn init_fails_on_an_unbound_handle() {
        let mut codec: Ak4619<NoPort, NoPort, NoPort, NoDelay> =
            Ak4619::new(Interface::Uninit, NoDelay);
        assert_eq!(codec.init(), Err(Error::NotBound));
    }

    #[test]
    fn format_pair_writes_consecutive_addresses_in_order() {
        let mut codec = spi_codec(SpiScript::ok());
        codec
            .write_audio_interface_format([0xAC, 0x1C])
            .unwrap();
        assert_eq!(
            frames(codec),
            vec![vec![0xC3, 0x00, 0x01, 0xAC], vec![0xC3, 0x00, 0x02, 0x1C]]
        );
    }

    #[test]
    fn volume_quad_walks_all_four_addresses() {
        let mut codec = spi_codec(SpiScript::ok());
        codec
            .write_dac_digital_volume([0x18, 0x19, 0x1A, 0x1B])
            .unwrap();
        assert_eq!(
            frames(codec),
            vec![
                vec![0xC3, 0x00, 0x0E, 0x18],
                vec![0xC3, 0x00, 0x0F, 0x19],
                vec![0xC3, 0x00, 0x10, 0x1A],
                vec![0xC3, 0x00, 0x11, 0x1B],
            ]
        );
    }

    #[test]
    fn multi_byte_write_aborts_after_first_failure() {
        // First byte goes through, the second hits a hard fault: the write
        // reports failure and the remaining bytes never reach the bus.
        let mut codec = spi_codec(SpiScript::with(vec![Ok(()), Err(BusError::Fault)]));
        assert_eq!(
            codec.write_adc_digital_volume([1, 2, 3, 4]),
            Err(Error::Communication)
        );
        let sent = frames(codec);
        assert_eq!(
            sent,
            vec![vec![0xC3, 0x00, 0x06, 1], vec![0xC3, 0x00, 0x07, 2]]
        );
    }

    #[test]
    fn multi_byte_read_aborts_after_first_failure() {
        let mut codec = spi_codec(SpiScript::with(vec![Ok(()), Err(BusError::Fault)]));
        assert_eq!(codec.read_mic_amp_gain(), Err(Error::Communication));
        assert_eq!(frames(codec).len(), 2);
    }

    #[test]
    fn accessors_dispatch_to_the_bound_transport() {
        let mut codec = Ak4619::new_i2c(I2cLog::new(), A0::Vdd, NoDelay);
        codec.write_power_management(0x37).unwrap();
        codec.read_dac_mute_filter().unwrap();
        match codec.interface {
            Interface::I2c { port, .. } => {
                assert_eq!(
                    port.transactions,
                    vec![(0x11, 0x00, Some(0x37)), (0x11, 0x14, None)]
                );
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn raw_register_access_validates_the_address() {
        let mut codec = spi_codec(SpiScript::ok());
        assert_eq!(codec.write_register(0x20, 0), Err(Error::InvalidRegister));
        assert!(frames(codec).is_empty());
    }
}
