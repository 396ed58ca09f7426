//! LoRaWAN device region definitions (eg: EU868, US915, etc).
use lora_modulation::{Bandwidth, BaseBandModulationParams, CodingRate, SpreadingFactor};
use lorawan::{
    parser::CfList,
    types::{ChannelMask, DataRateRange},
};
use rand_core::RngCore;

use crate::mac::{Frame, Window};
pub(crate) mod bands;
pub(crate) mod constants;
pub(crate) use crate::radio::*;
use constants::*;
// For backward compatibility
pub use lorawan::types::DR;

#[cfg(not(any(
    feature = "region-as923",
    feature = "region-eu433",
    feature = "region-eu868",
    feature = "region-in865",
    feature = "region-cn779",
    feature = "region-kr920",
    feature = "region-au915",
    feature = "region-us915"
)))]
compile_error!("You must enable at least one region! eg: `region-eu868`, `region-us915`...");

#[cfg(any(
    feature = "region-as923",
    feature = "region-cn779",
    feature = "region-eu433",
    feature = "region-eu868",
    feature = "region-in865",
    feature = "region-kr920"
))]
mod dynamic_channel_plans;
#[cfg(feature = "region-as923")]
pub(crate) use dynamic_channel_plans::AS923;
#[cfg(feature = "region-cn779")]
pub(crate) use dynamic_channel_plans::CN779;
#[cfg(feature = "region-eu433")]
pub(crate) use dynamic_channel_plans::EU433;
#[cfg(feature = "region-eu868")]
pub(crate) use dynamic_channel_plans::EU868;
#[cfg(feature = "region-in865")]
pub(crate) use dynamic_channel_plans::IN865;
#[cfg(feature = "region-kr920")]
pub(crate) use dynamic_channel_plans::KR920;

#[cfg(any(feature = "region-us915", feature = "region-au915"))]
mod fixed_channel_plans;
#[cfg(any(feature = "region-us915", feature = "region-au915"))]
pub use fixed_channel_plans::Subband;
#[cfg(feature = "region-au915")]
pub use fixed_channel_plans::AU915;
#[cfg(feature = "region-us915")]
pub use fixed_channel_plans::US915;

pub(crate) trait ChannelRegion {
    fn datarates() -> &'static [Option<Datarate>; NUM_DATARATES as usize];

    fn get_max_payload_length(datarate: DR, repeater_compatible: bool, dwell_time: bool) -> u8 {
        let Some(Some(dr)) = Self::datarates().get(datarate as usize) else {
            return 0;
        };
        let max_size = if dwell_time {
            dr.max_mac_payload_size_with_dwell_time
        } else {
            dr.max_mac_payload_size
        };
        if repeater_compatible && max_size > 230 {
            230
        } else {
            max_size
        }
    }

    fn tx_power_adjust(pw: u8) -> Option<u8>;
}

#[derive(Clone)]
/// Contains LoRaWAN region-specific configuration; is required for creating a LoRaWAN Device.
///
/// Generally constructed using the [`Region`] enum, unless You need to do region-specific
/// fine-tuning, like for example [`US915`] or [`AU915`].
pub struct Configuration {
    state: State,
    pub(crate) band: bands::Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Regions supported by this crate: AS923, AU915, CN779, EU868, EU433, IN865, KR920, US915.
///
/// Each region is individually feature-gated (eg: `region-eu868`), however, by default, all
/// implemented regions are enabled. `CN470` and the `US915` hybrid (dwell-time) channel plan have
/// no channel-plan struct backing them in this crate and are not represented in this enum at all;
/// a caller requesting one of them via [`crate::mib`]'s numeric region codes gets back
/// `Status::RegionNotSupported` instead.
pub enum Region {
    #[cfg(feature = "region-as923")]
    AS923,
    #[cfg(feature = "region-au915")]
    AU915,
    #[cfg(feature = "region-cn779")]
    CN779,
    #[cfg(feature = "region-eu868")]
    EU868,
    #[cfg(feature = "region-eu433")]
    EU433,
    #[cfg(feature = "region-in865")]
    IN865,
    #[cfg(feature = "region-kr920")]
    KR920,
    #[cfg(feature = "region-us915")]
    US915,
}

#[derive(Clone)]
enum State {
    #[cfg(feature = "region-as923")]
    AS923(AS923),
    #[cfg(feature = "region-au915")]
    AU915(AU915),
    #[cfg(feature = "region-cn779")]
    CN779(CN779),
    #[cfg(feature = "region-eu868")]
    EU868(EU868),
    #[cfg(feature = "region-eu433")]
    EU433(EU433),
    #[cfg(feature = "region-in865")]
    IN865(IN865),
    #[cfg(feature = "region-kr920")]
    KR920(KR920),
    #[cfg(feature = "region-us915")]
    US915(US915),
}

impl State {
    pub fn new(region: Region) -> State {
        match region {
            #[cfg(feature = "region-as923")]
            Region::AS923 => State::AS923(AS923::new_as923()),
            #[cfg(feature = "region-au915")]
            Region::AU915 => State::AU915(AU915::default()),
            #[cfg(feature = "region-cn779")]
            Region::CN779 => State::CN779(CN779::new_cn779()),
            #[cfg(feature = "region-eu868")]
            Region::EU868 => State::EU868(EU868::new_eu868()),
            #[cfg(feature = "region-eu433")]
            Region::EU433 => State::EU433(EU433::new_eu433()),
            #[cfg(feature = "region-in865")]
            Region::IN865 => State::IN865(IN865::new_in865()),
            #[cfg(feature = "region-kr920")]
            Region::KR920 => State::KR920(KR920::new_kr920()),
            #[cfg(feature = "region-us915")]
            Region::US915 => State::US915(US915::default()),
        }
    }

    #[allow(dead_code)]
    pub fn region(&self) -> Region {
        match self {
            #[cfg(feature = "region-as923")]
            Self::AS923(_) => Region::AS923,
            #[cfg(feature = "region-au915")]
            Self::AU915(_) => Region::AU915,
            #[cfg(feature = "region-cn779")]
            Self::CN779(_) => Region::CN779,
            #[cfg(feature = "region-eu433")]
            Self::EU433(_) => Region::EU433,
            #[cfg(feature = "region-eu868")]
            Self::EU868(_) => Region::EU868,
            #[cfg(feature = "region-in865")]
            Self::IN865(_) => Region::IN865,
            #[cfg(feature = "region-kr920")]
            Self::KR920(_) => Region::KR920,
            #[cfg(feature = "region-us915")]
            Self::US915(_) => Region::US915,
        }
    }

    /// Duty-cycle denominator for this region's shared ISM band, if any (eg: `Some(100)` for a
    /// 1% band). `None` means no duty-cycle restriction applies (eg: US915, AU915).
    pub fn duty_cycle_denom(&self) -> Option<u16> {
        match self {
            #[cfg(feature = "region-as923")]
            Self::AS923(_) => Some(100),
            #[cfg(feature = "region-au915")]
            Self::AU915(_) => None,
            #[cfg(feature = "region-cn779")]
            Self::CN779(_) => Some(100),
            #[cfg(feature = "region-eu433")]
            Self::EU433(_) => Some(100),
            #[cfg(feature = "region-eu868")]
            Self::EU868(_) => Some(100),
            #[cfg(feature = "region-in865")]
            Self::IN865(_) => None,
            #[cfg(feature = "region-kr920")]
            Self::KR920(_) => None,
            #[cfg(feature = "region-us915")]
            Self::US915(_) => None,
        }
    }
}

/// This datarate type is used internally for defining [`Bandwidth`]/[`SpreadingFactor`] per
/// region.
#[derive(Debug, Clone)]
pub(crate) struct Datarate {
    pub(crate) bandwidth: Bandwidth,
    pub(crate) spreading_factor: SpreadingFactor,
    max_mac_payload_size: u8,
    max_mac_payload_size_with_dwell_time: u8,
}
macro_rules! mut_region_dispatch {
  ($s:expr, $t:tt) => {
      match &mut $s.state {
        #[cfg(feature = "region-as923")]
        State::AS923(state) => state.$t(),
        #[cfg(feature = "region-au915")]
        State::AU915(state) => state.0.$t(),
        #[cfg(feature = "region-cn779")]
        State::CN779(state) => state.$t(),
        #[cfg(feature = "region-eu868")]
        State::EU868(state) => state.$t(),
        #[cfg(feature = "region-eu433")]
        State::EU433(state) => state.$t(),
        #[cfg(feature = "region-in865")]
        State::IN865(state) => state.$t(),
        #[cfg(feature = "region-kr920")]
        State::KR920(state) => state.$t(),
        #[cfg(feature = "region-us915")]
        State::US915(state) => state.0.$t(),
    }
  };
  ($s:expr, $t:tt, $($arg:tt)*) => {
      match &mut $s.state {
        #[cfg(feature = "region-as923")]
        State::AS923(state) => state.$t($($arg)*),
        #[cfg(feature = "region-au915")]
        State::AU915(state) => state.0.$t($($arg)*),
        #[cfg(feature = "region-cn779")]
        State::CN779(state) => state.$t($($arg)*),
        #[cfg(feature = "region-eu868")]
        State::EU868(state) => state.$t($($arg)*),
        #[cfg(feature = "region-eu433")]
        State::EU433(state) => state.$t($($arg)*),
        #[cfg(feature = "region-in865")]
        State::IN865(state) => state.$t($($arg)*),
        #[cfg(feature = "region-kr920")]
        State::KR920(state) => state.$t($($arg)*),
        #[cfg(feature = "region-us915")]
        State::US915(state) => state.0.$t($($arg)*),
    }
  };
}

macro_rules! region_dispatch {
  ($s:expr, $t:tt) => {
      match &$s.state {
        #[cfg(feature = "region-as923")]
        State::AS923(state) => state.$t(),
        #[cfg(feature = "region-au915")]
        State::AU915(state) => state.0.$t(),
        #[cfg(feature = "region-cn779")]
        State::CN779(state) => state.$t(),
        #[cfg(feature = "region-eu868")]
        State::EU868(state) => state.$t(),
        #[cfg(feature = "region-eu433")]
        State::EU433(state) => state.$t(),
        #[cfg(feature = "region-in865")]
        State::IN865(state) => state.$t(),
        #[cfg(feature = "region-kr920")]
        State::KR920(state) => state.$t(),
        #[cfg(feature = "region-us915")]
        State::US915(state) => state.0.$t(),
    }
  };
  ($s:expr, $t:tt, $($arg:tt)*) => {
      match &$s.state {
        #[cfg(feature = "region-as923")]
        State::AS923(state) => state.$t($($arg)*),
        #[cfg(feature = "region-au915")]
        State::AU915(state) => state.0.$t($($arg)*),
        #[cfg(feature = "region-cn779")]
        State::CN779(state) => state.$t($($arg)*),
        #[cfg(feature = "region-eu868")]
        State::EU868(state) => state.$t($($arg)*),
        #[cfg(feature = "region-eu433")]
        State::EU433(state) => state.$t($($arg)*),
        #[cfg(feature = "region-in865")]
        State::IN865(state) => state.$t($($arg)*),
        #[cfg(feature = "region-kr920")]
        State::KR920(state) => state.$t($($arg)*),
        #[cfg(feature = "region-us915")]
        State::US915(state) => state.0.$t($($arg)*),
    }
  };
}

macro_rules! region_static_dispatch {
  ($s:expr, $t:tt) => {
      match &$s.state {
        #[cfg(feature = "region-as923")]
        State::AS923(_) => dynamic_channel_plans::AS923::$t(),
        #[cfg(feature = "region-au915")]
        State::AU915(_) => fixed_channel_plans::AU915::$t(),
        #[cfg(feature = "region-cn779")]
        State::CN779(_) => dynamic_channel_plans::CN779::$t(),
        #[cfg(feature = "region-eu868")]
        State::EU868(_) => dynamic_channel_plans::EU868::$t(),
        #[cfg(feature = "region-eu433")]
        State::EU433(_) => dynamic_channel_plans::EU433::$t(),
        #[cfg(feature = "region-in865")]
        State::IN865(_) => dynamic_channel_plans::IN865::$t(),
        #[cfg(feature = "region-kr920")]
        State::KR920(_) => dynamic_channel_plans::KR920::$t(),
        #[cfg(feature = "region-us915")]
        State::US915(_) => fixed_channel_plans::US915::$t(),
    }
  };
  ($s:expr, $t:tt, $($arg:tt)*) => {
      match &$s.state {
        #[cfg(feature = "region-as923")]
        State::AS923(_) => dynamic_channel_plans::AS923::$t($($arg)*),
        #[cfg(feature = "region-au915")]
        State::AU915(_) => fixed_channel_plans::AU915::$t($($arg)*),
        #[cfg(feature = "region-cn779")]
        State::CN779(_) => dynamic_channel_plans::CN779::$t($($arg)*),
        #[cfg(feature = "region-eu868")]
        State::EU868(_) => dynamic_channel_plans::EU868::$t($($arg)*),
        #[cfg(feature = "region-eu433")]
        State::EU433(_) => dynamic_channel_plans::EU433::$t($($arg)*),
        #[cfg(feature = "region-in865")]
        State::IN865(_) => dynamic_channel_plans::IN865::$t($($arg)*),
        #[cfg(feature = "region-kr920")]
        State::KR920(_) => dynamic_channel_plans::KR920::$t($($arg)*),
        #[cfg(feature = "region-us915")]
        State::US915(_) => fixed_channel_plans::US915::$t($($arg)*),
    }
  };
}

impl Configuration {
    pub fn new(region: Region) -> Configuration {
        let denom = State::new(region).duty_cycle_denom();
        Configuration::with_state(State::new(region), denom)
    }

    fn with_state(state: State, duty_cycle_denom: Option<u16>) -> Configuration {
        Configuration { state, band: bands::Band::new(duty_cycle_denom) }
    }

    pub fn get_max_payload_length(
        &self,
        datarate: DR,
        repeater_compatible: bool,
        dwell_time: bool,
    ) -> u8 {
        region_static_dispatch!(
            self,
            get_max_payload_length,
            datarate,
            repeater_compatible,
            dwell_time
        )
    }

    pub(crate) fn create_tx_config<RNG: RngCore>(
        &mut self,
        rng: &mut RNG,
        datarate: DR,
        tx_power_index: u8,
        frame: &Frame,
    ) -> TxConfig {
        let (dr, frequency) = self.get_tx_dr_and_frequency(rng, datarate, frame);
        let pw = self
            .check_tx_power(tx_power_index)
            .and_then(core::convert::identity)
            // Falls back to the region's default power index if an out-of-range value ever
            // slips through (LinkADRReq validation should prevent this).
            .unwrap_or_else(|| self.check_tx_power(0).and_then(core::convert::identity).unwrap());
        TxConfig {
            pw: pw as i8,
            rf: RfConfig {
                frequency,
                bb: BaseBandModulationParams::new(
                    dr.spreading_factor,
                    dr.bandwidth,
                    self.get_coding_rate(),
                ),
            },
        }
    }

    pub(crate) fn get_datarate(&self, dr: u8) -> Option<&Datarate> {
        region_dispatch!(self, get_datarate, dr)
    }

    pub(crate) fn check_tx_power(&self, tx_power: u8) -> Option<Option<u8>> {
        region_dispatch!(self, check_tx_power, tx_power).map(Some)
    }

    fn get_tx_dr_and_frequency<RNG: RngCore>(
        &mut self,
        rng: &mut RNG,
        datarate: DR,
        frame: &Frame,
    ) -> (Datarate, u32) {
        mut_region_dispatch!(self, get_tx_dr_and_frequency, rng, datarate, frame)
    }

    pub(crate) fn process_join_accept<T: AsRef<[u8]>, C>(
        &mut self,
        join_accept: &DecryptedJoinAcceptPayload<T, C>,
    ) {
        mut_region_dispatch!(self, process_join_accept, join_accept)
    }

    pub(crate) fn channel_mask_get(&self) -> ChannelMask<9> {
        region_dispatch!(self, channel_mask_get)
    }

    pub(crate) fn channel_mask_set(&mut self, channel_mask: ChannelMask<9>) {
        mut_region_dispatch!(self, channel_mask_set, channel_mask)
    }

    pub(crate) fn channel_mask_update(
        &self,
        channel_mask: &mut ChannelMask<9>,
        ch_mask_ctl: u8,
        ch_mask: ChannelMask<2>,
    ) {
        region_dispatch!(self, channel_mask_update, channel_mask, ch_mask_ctl, ch_mask)
    }

    pub(crate) fn channel_mask_validate(
        &self,
        channel_mask: &ChannelMask<9>,
        dr: Option<DR>,
    ) -> bool {
        region_dispatch!(self, channel_mask_validate, channel_mask, dr)
    }

    pub(crate) fn get_rx_frequency(&self, frame: &Frame, window: &Window) -> u32 {
        region_dispatch!(self, get_rx_frequency, frame, window)
    }

    /// Resolves the radio configuration for a single-shot RX1/RX2 window for the given uplink
    /// datarate and frame type (join vs data).
    pub(crate) fn get_rx_config(&self, tx_datarate: DR, frame: &Frame, window: &Window) -> RfConfig {
        let dr = region_dispatch!(self, get_rx_datarate, tx_datarate, frame, window);
        RfConfig {
            frequency: self.get_rx_frequency(frame, window),
            bb: BaseBandModulationParams::new(dr.spreading_factor, dr.bandwidth, self.get_coding_rate()),
        }
    }

    /// Resolves the radio configuration for the continuous Class C RX window, which always
    /// listens on the RX2 frequency/datarate.
    pub(crate) fn get_rxc_config(&self, tx_datarate: DR) -> RfConfig {
        self.get_rx_config(tx_datarate, &Frame::Data, &Window::_2)
    }

    pub(crate) fn get_default_datarate(&self) -> DR {
        region_dispatch!(self, get_default_datarate)
    }

    pub(crate) fn get_coding_rate(&self) -> CodingRate {
        region_dispatch!(self, get_coding_rate)
    }

    pub(crate) fn frequency_valid(&self, f: u32) -> bool {
        region_dispatch!(self, frequency_valid, f)
    }

    #[allow(dead_code)]
    pub(crate) fn get_current_region(&self) -> super::region::Region {
        self.state.region()
    }

    pub(crate) fn has_fixed_channel_plan(&self) -> bool {
        region_dispatch!(self, has_fixed_channel_plan)
    }

    pub(crate) fn channel_dl_update(&mut self, index: u8, freq: u32) -> (bool, bool) {
        mut_region_dispatch!(self, channel_dl_update, index, freq)
    }

    pub(crate) fn handle_new_channel(
        &mut self,
        index: u8,
        freq: u32,
        data_rates: Option<DataRateRange>,
    ) -> (bool, bool) {
        mut_region_dispatch!(self, handle_new_channel, index, freq, data_rates)
    }

    pub(crate) fn rx1_dr_offset_validate(&self, value: u8) -> Option<u8> {
        region_dispatch!(self, rx1_dr_offset_validate, value)
    }

    pub(crate) fn set_rx1_dr_offset(&mut self, offset: u8) {
        mut_region_dispatch!(self, set_rx1_dr_offset, offset)
    }

    pub(crate) fn set_rx2_datarate(&mut self, dr: u8) {
        mut_region_dispatch!(self, set_rx2_datarate, dr)
    }

    pub(crate) fn rx1_dr_offset(&self) -> u8 {
        region_dispatch!(self, rx1_dr_offset)
    }

    pub(crate) fn rx2_datarate(&self) -> u8 {
        region_dispatch!(self, rx2_datarate)
    }
}

macro_rules! from_region {
    ($r:tt) => {
        impl From<$r> for Configuration {
            fn from(region: $r) -> Configuration {
                let state = State::$r(region);
                let denom = state.duty_cycle_denom();
                Configuration::with_state(state, denom)
            }
        }
    };
}

#[cfg(feature = "region-as923")]
from_region!(AS923);
#[cfg(feature = "region-cn779")]
from_region!(CN779);
#[cfg(feature = "region-in865")]
from_region!(IN865);
#[cfg(feature = "region-au915")]
from_region!(AU915);
#[cfg(feature = "region-eu868")]
from_region!(EU868);
#[cfg(feature = "region-eu433")]
from_region!(EU433);
#[cfg(feature = "region-kr920")]
from_region!(KR920);
#[cfg(feature = "region-us915")]
from_region!(US915);

use lorawan::parser::DecryptedJoinAcceptPayload;

pub(crate) trait RegionHandler {
    fn process_join_accept<T: AsRef<[u8]>, C>(
        &mut self,
        join_accept: &DecryptedJoinAcceptPayload<T, C>,
    );

    fn channel_mask_get(&self) -> ChannelMask<9>;
    fn channel_mask_set(&mut self, channel_mask: ChannelMask<9>);

    fn channel_mask_update(
        &self,
        channel_mask: &mut ChannelMask<9>,
        ch_mask_ctl: u8,
        ch_mask: ChannelMask<2>,
    );

    fn channel_mask_validate(&self, channel_mask: &ChannelMask<9>, dr: Option<DR>) -> bool;

    fn channel_dl_update(&mut self, index: u8, freq: u32) -> (bool, bool);

    fn handle_new_channel(
        &mut self,
        index: u8,
        freq: u32,
        data_rates: Option<DataRateRange>,
    ) -> (bool, bool);

    fn get_datarate(&self, dr: u8) -> Option<&Datarate>;

    fn get_default_datarate(&self) -> DR {
        DR::_0
    }

    fn get_tx_dr_and_frequency<RNG: RngCore>(
        &mut self,
        rng: &mut RNG,
        datarate: DR,
        frame: &Frame,
    ) -> (Datarate, u32);

    fn get_rx_datarate(&self, datarate: DR, frame: &Frame, window: &Window) -> Datarate;
    fn get_rx_frequency(&self, frame: &Frame, window: &Window) -> u32;
    fn get_coding_rate(&self) -> CodingRate {
        DEFAULT_CODING_RATE
    }

    fn check_tx_power(&self, tx_power: u8) -> Option<u8>;

    fn frequency_valid(&self, freq: u32) -> bool;

    /// Whether region supports modifying channel plan
    /// with `NewChannelReq`/`DlSettingsReq` MAC commands
    fn has_fixed_channel_plan(&self) -> bool;

    fn rx1_dr_offset_validate(&self, value: u8) -> Option<u8>;

    /// Applies `Rx1DROffset` from a join-accept DLSettings byte or a `RXParamSetupReq`.
    /// Fixed channel plans resolve RX1 from a static per-region table and ignore this.
    fn set_rx1_dr_offset(&mut self, _offset: u8) {}

    /// Applies `RX2 DataRate` from a join-accept DLSettings byte or a `RXParamSetupReq`.
    fn set_rx2_datarate(&mut self, _dr: u8) {}

    /// Live `Rx1DrOffset` value. Fixed channel plans ignore `set_rx1_dr_offset`, so they
    /// report the fixed `0`.
    fn rx1_dr_offset(&self) -> u8 {
        0
    }

    /// Live `Rx2ChannelDatarate` value. Fixed channel plans derive RX2 from a static table, so
    /// they report the fixed `0`.
    fn rx2_datarate(&self) -> u8 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "region-eu868")]
    fn test_dynamic_region_frequency_range() {
        let r = Configuration::new(Region::EU868);
        assert!(r.frequency_valid(863_000_000));
        assert!(r.frequency_valid(868_000_000));
        assert!(r.frequency_valid(870_000_000));

        assert!(!r.frequency_valid(862_900_000));
        assert!(!r.frequency_valid(870_000_001));

        // Invalid in default eu868 frequency range, but valid in some areas
        assert!(!r.frequency_valid(872_000_000));
    }

    #[test]
    #[cfg(feature = "region-au915")]
    fn test_fixed_au915_frequency_range() {
        let r = Configuration::new(Region::AU915);
        assert!(r.frequency_valid(915_000_000));
        assert!(r.frequency_valid(928_000_000));

        assert!(!r.frequency_valid(902_900_000));
        assert!(!r.frequency_valid(930_000_001));
    }

    #[test]
    #[cfg(feature = "region-us915")]
    fn test_fixed_us915_frequency_range() {
        let r = Configuration::new(Region::US915);
        assert!(r.frequency_valid(902_000_000));
        assert!(r.frequency_valid(915_000_000));
        assert!(r.frequency_valid(928_000_000));

        assert!(!r.frequency_valid(901_900_000));
        assert!(!r.frequency_valid(928_000_001));
    }

    #[test]
    #[cfg(feature = "region-eu868")]
    fn eu868_carries_a_one_percent_duty_cycle_band() {
        let r = Configuration::new(Region::EU868);
        assert_eq!(r.band.duty_cycle_denom(), Some(100));
    }

    #[test]
    #[cfg(feature = "region-us915")]
    fn us915_has_no_duty_cycle_band() {
        let r = Configuration::new(Region::US915);
        assert_eq!(r.band.duty_cycle_denom(), None);
    }
}
