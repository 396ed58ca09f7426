//! Tracks which MAC command answers the next uplink(s) must carry.
//!
//! Per LoRaWAN v1.0.2 §5, `RXParamSetupAns`, `RXTimingSetupAns` and `DlChannelAns` are "sticky":
//! once queued they ride along on every uplink until a downlink is received (any downlink, not
//! necessarily one carrying a fresh request of the same kind), since that's the network's only
//! signal that an earlier uplink got through. Every other answer is one-shot: it's included once,
//! then dropped regardless of whether the network actually received it.
use heapless::Vec;
use lorawan::maccommands::{
    DevStatusAnsPayload, DlChannelAnsPayload, DutyCycleAnsPayload, LinkADRAnsPayload,
    NewChannelAnsPayload, RXParamSetupAnsPayload, RXTimingSetupAnsPayload, TXParamSetupAnsPayload,
    UplinkMacCommand,
};

#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uplink {
    // one-shot answers: sent once, then cleared unconditionally
    adr_ans: AdrAns,
    duty_cycle_ans: bool,
    new_channel_ans: Option<NewChannelAckBits>,
    tx_param_setup_ans: bool,
    dev_status_ans: bool,

    // sticky answers: resent on every uplink until any downlink arrives
    rx_param_setup_ans: Option<RxParamAckBits>,
    rx_timing_setup_ans: bool,
    dl_channel_ans: Option<DlChannelAckBits>,

    confirmed: bool,
}

// multiple LinkADRAns may be due per downlink (a single LinkADRReq downlink may batch several
// requests), so we track how many are pending alongside the ack bits shared across the batch.
#[derive(Default, Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct AdrAns {
    count: u8,
    power_ack: bool,
    data_rate_ack: bool,
    channel_mask_ack: bool,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct NewChannelAckBits {
    channel_freq_ack: bool,
    data_rate_ack: bool,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct RxParamAckBits {
    rx1_dr_offset_ack: bool,
    rx2_data_rate_ack: bool,
    channel_ack: bool,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct DlChannelAckBits {
    channel_freq_ack: bool,
    uplink_freq_ack: bool,
}

impl Uplink {
    pub fn set_downlink_confirmation(&mut self) {
        self.confirmed = true;
    }

    pub fn clear_downlink_confirmation(&mut self) {
        self.confirmed = false;
    }

    pub fn confirms_downlink(&self) -> bool {
        self.confirmed
    }

    pub(crate) fn ack_link_adr(&mut self, power_ack: bool, data_rate_ack: bool, channel_mask_ack: bool) {
        self.adr_ans.count += 1;
        // A batch of LinkADRReq in one downlink all get answered with the same ack bits: a
        // device honors every request in the batch atomically or none at all (LoRaWAN v1.0.2
        // §5.2).
        self.adr_ans.power_ack = power_ack;
        self.adr_ans.data_rate_ack = data_rate_ack;
        self.adr_ans.channel_mask_ack = channel_mask_ack;
    }

    pub(crate) fn ack_duty_cycle(&mut self) {
        self.duty_cycle_ans = true;
    }

    pub(crate) fn ack_new_channel(&mut self, channel_freq_ack: bool, data_rate_ack: bool) {
        self.new_channel_ans = Some(NewChannelAckBits { channel_freq_ack, data_rate_ack });
    }

    pub(crate) fn ack_tx_param_setup(&mut self) {
        self.tx_param_setup_ans = true;
    }

    /// We don't currently sample real battery/SNR telemetry, so `DevStatusAns` always reports
    /// the spec's "unmeasurable" sentinel pair (battery `255`, margin `0`) rather than fabricate
    /// numbers.
    pub(crate) fn ack_dev_status(&mut self) {
        self.dev_status_ans = true;
    }

    pub(crate) fn ack_rx_param_setup(
        &mut self,
        rx1_dr_offset_ack: bool,
        rx2_data_rate_ack: bool,
        channel_ack: bool,
    ) {
        self.rx_param_setup_ans =
            Some(RxParamAckBits { rx1_dr_offset_ack, rx2_data_rate_ack, channel_ack });
    }

    pub(crate) fn ack_rx_timing_setup(&mut self) {
        self.rx_timing_setup_ans = true;
    }

    pub(crate) fn ack_dl_channel(&mut self, channel_freq_ack: bool, uplink_freq_ack: bool) {
        self.dl_channel_ans = Some(DlChannelAckBits { channel_freq_ack, uplink_freq_ack });
    }

    /// Any downlink, whether or not it carried a mac command we recognize, tells us the network
    /// received our last uplink (and whatever sticky answers it carried) -- so we can stop
    /// repeating them.
    pub(crate) fn clear_sticky_on_downlink(&mut self) {
        self.rx_param_setup_ans = None;
        self.rx_timing_setup_ans = false;
        self.dl_channel_ans = None;
    }

    pub fn get_cmds(&mut self, macs: &mut Vec<UplinkMacCommand, 8>) {
        // sticky answers first, left in place for the next uplink
        if let Some(bits) = self.rx_param_setup_ans {
            let byte: &'static [u8; 1] = match (bits.rx1_dr_offset_ack, bits.rx2_data_rate_ack, bits.channel_ack) {
                (true, true, true) => &[0b111],
                (true, true, false) => &[0b011],
                (true, false, true) => &[0b101],
                (true, false, false) => &[0b001],
                (false, true, true) => &[0b110],
                (false, true, false) => &[0b010],
                (false, false, true) => &[0b100],
                (false, false, false) => &[0b000],
            };
            let _ =
                macs.push(UplinkMacCommand::RXParamSetupAns(RXParamSetupAnsPayload::new(byte).unwrap()));
        }
        if self.rx_timing_setup_ans {
            let _ = macs.push(UplinkMacCommand::RXTimingSetupAns(RXTimingSetupAnsPayload::new(&[])));
        }
        if let Some(bits) = self.dl_channel_ans {
            let byte: &'static [u8; 1] = match (bits.channel_freq_ack, bits.uplink_freq_ack) {
                (true, true) => &[0b11],
                (true, false) => &[0b01],
                (false, true) => &[0b10],
                (false, false) => &[0b00],
            };
            let _ = macs.push(UplinkMacCommand::DlChannelAns(DlChannelAnsPayload::new(byte).unwrap()));
        }

        // one-shot answers, drained after being queued
        for _ in 0..self.adr_ans.count {
            let byte: &'static [u8; 1] =
                match (self.adr_ans.power_ack, self.adr_ans.data_rate_ack, self.adr_ans.channel_mask_ack) {
                    (true, true, true) => &[0b111],
                    (true, true, false) => &[0b011],
                    (true, false, true) => &[0b101],
                    (true, false, false) => &[0b001],
                    (false, true, true) => &[0b110],
                    (false, true, false) => &[0b010],
                    (false, false, true) => &[0b100],
                    (false, false, false) => &[0b000],
                };
            let _ = macs.push(UplinkMacCommand::LinkADRAns(LinkADRAnsPayload::new(byte).unwrap()));
        }
        self.adr_ans = AdrAns::default();

        if self.duty_cycle_ans {
            let _ = macs.push(UplinkMacCommand::DutyCycleAns(DutyCycleAnsPayload::new(&[])));
        }
        self.duty_cycle_ans = false;

        if let Some(bits) = self.new_channel_ans.take() {
            let byte: &'static [u8; 1] = match (bits.channel_freq_ack, bits.data_rate_ack) {
                (true, true) => &[0b11],
                (true, false) => &[0b01],
                (false, true) => &[0b10],
                (false, false) => &[0b00],
            };
            let _ = macs.push(UplinkMacCommand::NewChannelAns(NewChannelAnsPayload::new(byte).unwrap()));
        }

        if self.tx_param_setup_ans {
            let _ = macs.push(UplinkMacCommand::TXParamSetupAns(TXParamSetupAnsPayload::new(&[])));
        }
        self.tx_param_setup_ans = false;

        if self.dev_status_ans {
            let _ =
                macs.push(UplinkMacCommand::DevStatusAns(DevStatusAnsPayload::new(&[255, 0]).unwrap()));
        }
        self.dev_status_ans = false;
    }
}
