/// KR920 region support (920.9..923.3 MHz)
///
/// KR920 end-devices operate under a conducted-power limit rather than the EIRP limits used by
/// most other regions; `tx_power_adjust` bakes in the 14 dBm cap from the regional parameters.
use super::*;

const JOIN_CHANNELS: [u32; 3] = [922_100_000, 922_300_000, 922_500_000];
const MAX_EIRP: u8 = 14;

pub(crate) type KR920 = DynamicChannelPlan<3, KR920Region>;

impl KR920 {
    pub(crate) fn new_kr920() -> Self {
        DynamicChannelPlan::new(kr920_default_freq)
    }
}

fn kr920_default_freq(f: u32) -> bool {
    (920_900_000..=923_300_000).contains(&f)
}

#[derive(Default, Clone)]
#[allow(clippy::upper_case_acronyms)]
pub struct KR920Region;

impl ChannelRegion for KR920Region {
    fn datarates() -> &'static [Option<Datarate>; NUM_DATARATES as usize] {
        &DATARATES
    }

    fn tx_power_adjust(pw: u8) -> Option<u8> {
        match pw {
            0..=6 => Some(MAX_EIRP - (2 * pw)),
            _ => None,
        }
    }
}

impl DynamicChannelRegion<3> for KR920Region {
    fn join_channels() -> [u32; 3] {
        JOIN_CHANNELS
    }

    fn get_default_rx2() -> u32 {
        921_900_000
    }
}

use super::{Bandwidth, Datarate, SpreadingFactor};

pub(crate) const DATARATES: [Option<Datarate>; NUM_DATARATES as usize] = [
    Some(Datarate {
        spreading_factor: SpreadingFactor::_12,
        bandwidth: Bandwidth::_125KHz,
        max_mac_payload_size: 59,
        max_mac_payload_size_with_dwell_time: 59,
    }),
    Some(Datarate {
        spreading_factor: SpreadingFactor::_11,
        bandwidth: Bandwidth::_125KHz,
        max_mac_payload_size: 59,
        max_mac_payload_size_with_dwell_time: 59,
    }),
    Some(Datarate {
        spreading_factor: SpreadingFactor::_10,
        bandwidth: Bandwidth::_125KHz,
        max_mac_payload_size: 59,
        max_mac_payload_size_with_dwell_time: 59,
    }),
    Some(Datarate {
        spreading_factor: SpreadingFactor::_9,
        bandwidth: Bandwidth::_125KHz,
        max_mac_payload_size: 123,
        max_mac_payload_size_with_dwell_time: 123,
    }),
    Some(Datarate {
        spreading_factor: SpreadingFactor::_8,
        bandwidth: Bandwidth::_125KHz,
        max_mac_payload_size: 250,
        max_mac_payload_size_with_dwell_time: 250,
    }),
    Some(Datarate {
        spreading_factor: SpreadingFactor::_7,
        bandwidth: Bandwidth::_125KHz,
        max_mac_payload_size: 250,
        max_mac_payload_size_with_dwell_time: 250,
    }),
    // DR6..DR14: RFU in this band
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
];
