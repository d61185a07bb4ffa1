//! Codec array topology and the fixed bring-up sequence.

use ak4619::registers::{DAC_SHARP_ROLL_OFF, IF_FORMAT_TDM128_I2S, PM_ALL_CONVERTERS_ON};
use ak4619::{Ak4619, AnalogInputMode, NoPort, SpiPort};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

/// Number of codec slots the bank can hold.
pub const MAX_CODECS: usize = 8;
/// Number of power-rail enable pins the bank can hold.
pub const MAX_RAILS: usize = 2;
/// Codec slots covered by each power rail, in slot order.
pub const RAIL_GROUP: usize = 4;
/// Settling time after raising the power rails, in milliseconds.
pub const POWER_SETTLE_MS: u32 = 100;

/// Step of the per-codec bring-up sequence, for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpStep {
    /// SPI bus activation.
    Activate,
    /// Power management write (all converters on).
    PowerManagement,
    /// Audio interface format pair write (TDM-128 I2S).
    InterfaceFormat,
    /// Analog input mode write.
    AnalogInput,
    /// DAC mute/filter write (sharp roll-off, unmuted).
    DacMuteFilter,
}

/// Bank status for configuration and bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BankError {
    /// More slots or rails than the bank supports.
    Capacity,
    /// A power-rail enable pin failed to drive.
    Rail,
    /// One codec failed during bring-up; codecs after it were not touched.
    BringUp {
        /// Index of the failing codec slot.
        index: u8,
        /// Bring-up step that failed.
        step: BringUpStep,
        /// Driver status reported by that step.
        cause: ak4619::Error,
    },
}

impl core::fmt::Display for BankError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Capacity => write!(f, "codec bank capacity exceeded"),
            Self::Rail => write!(f, "power rail enable pin fault"),
            Self::BringUp { index, step, cause } => {
                let step = match step {
                    BringUpStep::Activate => "bus activation",
                    BringUpStep::PowerManagement => "power management",
                    BringUpStep::InterfaceFormat => "interface format",
                    BringUpStep::AnalogInput => "analog input mode",
                    BringUpStep::DacMuteFilter => "DAC mute/filter",
                };
                write!(f, "codec {index} failed at {step}: {cause}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BankError {}

/// Per-codec topology entry: the dedicated chip-select line and the analog
/// input wiring shared by that codec's four channels.
pub struct CodecSlot<NCS> {
    ncs: NCS,
    input_mode: AnalogInputMode,
}

impl<NCS> CodecSlot<NCS> {
    /// Describe one wired codec position.
    pub fn new(ncs: NCS, input_mode: AnalogInputMode) -> Self {
        Self { ncs, input_mode }
    }
}

/// A bank of codecs on one shared SPI bus.
///
/// Slots and rails are registered in board order; slot `n` is powered by
/// rail `n / RAIL_GROUP`. The bank takes no locks; `&mut self` serializes
/// bus access, which the chip-select framing requires.
pub struct CodecBank<SPI, NCS, EN, D> {
    spi: SPI,
    rails: Vec<EN, MAX_RAILS>,
    slots: Vec<CodecSlot<NCS>, MAX_CODECS>,
    delay: D,
}

impl<SPI, NCS, EN, D> CodecBank<SPI, NCS, EN, D> {
    /// Create an empty bank over a shared SPI bus.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self {
            spi,
            rails: Vec::new(),
            slots: Vec::new(),
            delay,
        }
    }

    /// Register the power-rail enable pin for the next group of
    /// [`RAIL_GROUP`] slots.
    pub fn add_rail(&mut self, pin: EN) -> Result<(), BankError> {
        self.rails.push(pin).map_err(|_| BankError::Capacity)
    }

    /// Register the next codec slot from the board configuration list.
    pub fn add_slot(&mut self, slot: CodecSlot<NCS>) -> Result<(), BankError> {
        self.slots.push(slot).map_err(|_| BankError::Capacity)
    }

    /// Number of registered codec slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no codec slots are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<SPI, NCS, EN, D> CodecBank<SPI, NCS, EN, D>
where
    SPI: SpiPort,
    NCS: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    /// Power and configure every registered codec, in slot order.
    ///
    /// Raises each rail whose group contains at least one slot, waits
    /// [`POWER_SETTLE_MS`], clocks one idle byte with no codec selected,
    /// then runs the per-codec sequence: bus activation, power management
    /// (all four converters on), interface format (TDM-128 I2S), analog
    /// input mode (the slot's topology on all four channels), DAC
    /// mute/filter (sharp roll-off, unmuted). The first failure aborts the
    /// whole bring-up; codecs after the failing one are never touched.
    pub fn bring_up(&mut self) -> Result<(), BankError> {
        let Self {
            spi,
            rails,
            slots,
            delay,
        } = self;

        for (group, rail) in rails.iter_mut().enumerate() {
            if group * RAIL_GROUP < slots.len() {
                rail.set_high().map_err(|_| BankError::Rail)?;
            }
        }
        delay.delay_ms(POWER_SETTLE_MS);

        // One idle byte with no codec selected settles the bus lines after
        // power-up. Nothing is listening, so the outcome is ignored.
        let _ = spi.transmit(&[0x00]);

        for (index, slot) in slots.iter_mut().enumerate() {
            let input = replicate(slot.input_mode);
            let mut codec = Ak4619::new_spi(&mut *spi, &mut slot.ncs, &mut *delay);
            codec.init().map_err(fail(index, BringUpStep::Activate))?;
            codec
                .write_power_management(PM_ALL_CONVERTERS_ON)
                .map_err(fail(index, BringUpStep::PowerManagement))?;
            codec
                .write_audio_interface_format(IF_FORMAT_TDM128_I2S)
                .map_err(fail(index, BringUpStep::InterfaceFormat))?;
            codec
                .write_adc_analog_input(input)
                .map_err(fail(index, BringUpStep::AnalogInput))?;
            codec
                .write_dac_mute_filter(DAC_SHARP_ROLL_OFF)
                .map_err(fail(index, BringUpStep::DacMuteFilter))?;
            #[cfg(feature = "defmt")]
            defmt::debug!("codec {}: configured", index);
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("codec bank: {} codecs up", slots.len());
        Ok(())
    }

    /// Borrow a driver handle for the codec in `slot`, for register access
    /// after bring-up (volume, mutes, filters).
    pub fn codec(
        &mut self,
        slot: usize,
    ) -> Option<Ak4619<NoPort, &mut SPI, &mut NCS, &mut D>> {
        let entry = self.slots.get_mut(slot)?;
        Some(Ak4619::new_spi(
            &mut self.spi,
            &mut entry.ncs,
            &mut self.delay,
        ))
    }
}

/// The slot's topology replicated across all four 2-bit channel lanes of
/// the analog input register.
const fn replicate(mode: AnalogInputMode) -> u8 {
    let bits = mode as u8;
    bits | bits << 2 | bits << 4 | bits << 6
}

#[allow(clippy::cast_possible_truncation)] // slot indices are bounded by MAX_CODECS
fn fail(index: usize, step: BringUpStep) -> impl FnOnce(ak4619::Error) -> BankError {
    move |cause| BankError::BringUp {
        index: index as u8,
        step,
        cause,
    }
}
