use super::TimestampMs;
pub use crate::radio::*;
pub use ::lora_modulation::{Bandwidth, CodingRate, SpreadingFactor};

#[derive(Debug)]
pub enum Event<'a, R>
where
    R: PhyRxTx,
{
    TxRequest(TxConfig, &'a [u8]),
    RxRequest(RfConfig),
    CancelRx,
    Phy(R::PhyEvent),
}

#[derive(Debug)]
pub enum Response<R>
where
    R: PhyRxTx,
{
    Idle,
    Txing,
    Rxing,
    TxDone(TimestampMs),
    RxDone(RxQuality),
    Phy(R::PhyResponse),
}

use core::fmt;

/// Coarse radio activity reported by `PhyRxTx::get_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioStatus {
    Idle,
    RxRunning,
    TxRunning,
}

pub trait PhyRxTx {
    type PhyEvent: fmt::Debug;
    type PhyError: fmt::Debug;
    type PhyResponse: fmt::Debug;

    /// Board-specific antenna gain and power loss in dBi.
    const ANTENNA_GAIN: i8 = 0;

    /// Maximum power (dBm) that the radio is able to output. When preparing instructions for radio,
    /// the value of maximum power will be used as an upper bound.
    const MAX_RADIO_POWER: u8;

    fn get_mut_radio(&mut self) -> &mut Self;

    // we require mutability so we may decrypt in place
    fn get_received_packet(&mut self) -> &mut [u8];
    fn handle_event(&mut self, event: Event<Self>) -> Result<Response<Self>, Self::PhyError>
    where
        Self: Sized;

    /// Time on air, in ms, for a LoRa payload of `pkt_len` bytes at `rf`. Used
    /// by duty-cycle back-off (`CalcBackOff`) and the 3000 ms TX timeout.
    fn time_on_air(&self, rf: RfConfig, pkt_len: usize) -> u32;

    /// Draws a random 32-bit value from the radio's RNG. Backs join-nonce
    /// generation and uniform channel selection (`NextChannel`).
    fn random(&mut self) -> u32;

    /// Verifies a frequency is synthesizable by the radio, independent of
    /// whether the region plan allows it. Default accepts any frequency for
    /// radios that don't expose a cheaper check.
    fn check_rf_frequency(&mut self, _freq_hz: u32) -> bool {
        true
    }

    fn get_status(&self) -> RadioStatus {
        RadioStatus::Idle
    }

    /// Emits an unmodulated carrier for certification testing.
    fn set_tx_continuous_wave(
        &mut self,
        freq_hz: u32,
        power_dbm: i8,
        timeout_ms: u32,
    ) -> Result<(), Self::PhyError>;
}
