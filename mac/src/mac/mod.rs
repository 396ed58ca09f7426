//! LoRaWAN MAC layer implementation written as a non-async state machine (leveraged by `async_device` and `scheduler`).
//! Manages state internally while providing client with transmit and receive frequencies, while writing to and
//! decrypting from send and receive buffers.

use crate::{
    radio::{self, RadioBuffer, RfConfig, RxConfig, RxMode},
    region, AppSKey, Downlink, NewSKey,
};
use heapless::Vec;
use lorawan::{self, keys::CryptoFactory};
use lorawan::{maccommands::DownlinkMacCommand, parser::DevAddr};

pub type FcntDown = u32;
pub type FcntUp = u32;

mod session;
use rand_core::RngCore;
pub use session::{Session, SessionKeys};

mod otaa;
pub use otaa::NetworkCredentials;

use crate::scheduler;

pub(crate) mod uplink;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Frame {
    Join,
    Data,
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Window {
    _1,
    _2,
}

#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
/// LoRaWAN Session and Network Configurations
pub struct Configuration {
    pub(crate) data_rate: region::DR,
    /// Index into the region's TX power table; applied via `LinkADRReq`.
    pub(crate) tx_power_index: u8,
    pub(crate) adr_enable: bool,
    pub(crate) public_network: bool,
    pub(crate) repeater_support: bool,
    pub(crate) device_class: crate::mib::DeviceClass,
    pub(crate) rx1_delay: u32,
    pub(crate) join_accept_delay1: u32,
    pub(crate) join_accept_delay2: u32,
}

impl Configuration {
    fn handle_downlink_macs(
        &mut self,
        region: &mut region::Configuration,
        uplink: &mut uplink::Uplink,
        cmds: lorawan::maccommands::MacCommandIterator<DownlinkMacCommand>,
    ) {
        for cmd in cmds {
            match cmd {
                DownlinkMacCommand::LinkCheckAns(_) => {
                    // Surfaced by the network in response to our own LinkCheckReq; nothing to
                    // acknowledge and no MAC state to update here.
                }
                DownlinkMacCommand::LinkADRReq(payload) => {
                    let requested_dr = payload.data_rate();
                    let requested_power = payload.tx_power();
                    let mut mask = region.channel_mask_get();
                    region.channel_mask_update(
                        &mut mask,
                        payload.redundancy().channel_mask_control(),
                        payload.channel_mask(),
                    );

                    // 0xF in either field means "keep the current value" (LoRaWAN v1.0.2 §5.2).
                    let data_rate_ack = requested_dr == 0xF
                        || region.get_datarate(requested_dr).is_some();
                    let effective_dr = if requested_dr == 0xF {
                        Some(self.data_rate)
                    } else {
                        region::DR::try_from(requested_dr).ok()
                    };
                    let channel_mask_ack = region.channel_mask_validate(&mask, effective_dr);
                    let power_ack = requested_power == 0xF
                        || region.check_tx_power(requested_power).flatten().is_some();

                    if channel_mask_ack {
                        region.channel_mask_set(mask);
                    }
                    if data_rate_ack {
                        if let Some(dr) = effective_dr {
                            self.data_rate = dr;
                        }
                    }
                    if power_ack && requested_power != 0xF {
                        self.tx_power_index = requested_power;
                    }
                    uplink.ack_link_adr(power_ack, data_rate_ack, channel_mask_ack);
                }
                DownlinkMacCommand::DutyCycleReq(_payload) => {
                    // The duty-cycle band enforced on-device is fixed per region; the network
                    // can only ask for something stricter than what we already apply.
                    uplink.ack_duty_cycle();
                }
                DownlinkMacCommand::RXParamSetupReq(payload) => {
                    let dl_settings = payload.dl_settings();
                    let rx1_dr_offset_ack =
                        region.rx1_dr_offset_validate(dl_settings.rx1_dr_offset()).is_some();
                    let rx2_data_rate_ack =
                        region.get_datarate(dl_settings.rx2_data_rate()).is_some();
                    let channel_ack = region.frequency_valid(payload.frequency().value());

                    if rx1_dr_offset_ack {
                        region.set_rx1_dr_offset(dl_settings.rx1_dr_offset());
                    }
                    if rx2_data_rate_ack {
                        region.set_rx2_datarate(dl_settings.rx2_data_rate());
                    }
                    uplink.ack_rx_param_setup(rx1_dr_offset_ack, rx2_data_rate_ack, channel_ack);
                }
                DownlinkMacCommand::DevStatusReq(_payload) => {
                    uplink.ack_dev_status();
                }
                DownlinkMacCommand::NewChannelReq(payload) => {
                    let (channel_freq_ack, data_rate_ack) = region.handle_new_channel(
                        payload.channel_index(),
                        payload.frequency().value(),
                        Some(payload.data_rate_range()),
                    );
                    uplink.ack_new_channel(channel_freq_ack, data_rate_ack);
                }
                DownlinkMacCommand::RXTimingSetupReq(payload) => {
                    self.rx1_delay = del_to_delay_ms(payload.delay());
                    uplink.ack_rx_timing_setup();
                }
                DownlinkMacCommand::TXParamSetupReq(_payload) => {
                    // Dwell-time/max-EIRP limits from this command only apply to regions we
                    // don't model dwell time for yet; ack unconditionally per the common case.
                    uplink.ack_tx_param_setup();
                }
                DownlinkMacCommand::DlChannelReq(payload) => {
                    let (channel_freq_ack, uplink_freq_ack) =
                        region.channel_dl_update(payload.channel_index(), payload.frequency().value());
                    uplink.ack_dl_channel(channel_freq_ack, uplink_freq_ack);
                }
                DownlinkMacCommand::DeviceTimeAns(_payload) => {
                    // Answers our own DeviceTimeReq; no MIB surface wired up to stash it yet.
                }
            }
        }
    }
}

pub(crate) struct Mac {
    pub configuration: Configuration,
    pub region: region::Configuration,
    board_eirp: BoardEirp,
    state: State,
}

struct BoardEirp {
    max_power: u8,
    antenna_gain: i8,
}

#[allow(clippy::large_enum_variant)]
enum State {
    Joined(Session),
    Otaa(otaa::Otaa),
    Unjoined,
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error {
    NotJoined,
    InvalidResponse(Response),
}

pub struct SendData<'a> {
    pub data: &'a [u8],
    pub fport: u8,
    pub confirmed: bool,
}

pub(crate) type Result<T = ()> = core::result::Result<T, Error>;

impl Mac {
    pub(crate) fn new(region: region::Configuration, max_power: u8, antenna_gain: i8) -> Self {
        let data_rate = region.get_default_datarate();
        Self {
            board_eirp: BoardEirp { max_power, antenna_gain },
            region,
            state: State::Unjoined,
            configuration: Configuration {
                data_rate,
                tx_power_index: 0,
                adr_enable: true,
                public_network: true,
                repeater_support: false,
                device_class: crate::mib::DeviceClass::A,
                rx1_delay: region::constants::RECEIVE_DELAY1,
                join_accept_delay1: region::constants::JOIN_ACCEPT_DELAY1,
                join_accept_delay2: region::constants::JOIN_ACCEPT_DELAY2,
            },
        }
    }

    /// Prepare the radio buffer with transmitting a join request frame and provides the radio
    /// configuration for the transmission.
    pub(crate) fn join_otaa<C: CryptoFactory + Default, RNG: RngCore, const N: usize>(
        &mut self,
        rng: &mut RNG,
        credentials: NetworkCredentials,
        buf: &mut RadioBuffer<N>,
    ) -> (radio::TxConfig, u16) {
        let mut otaa = otaa::Otaa::new(credentials);
        let dev_nonce = otaa.prepare_buffer::<C, RNG, N>(rng, buf);
        self.state = State::Otaa(otaa);
        let mut tx_config =
            self.region.create_tx_config(
                rng,
                self.configuration.data_rate,
                self.configuration.tx_power_index,
                &Frame::Join,
            );
        tx_config.adjust_power(self.board_eirp.max_power, self.board_eirp.antenna_gain);
        (tx_config, dev_nonce)
    }

    /// Join via ABP. This does not transmit a join request frame, but instead sets the session.
    pub(crate) fn join_abp(
        &mut self,
        newskey: NewSKey,
        appskey: AppSKey,
        devaddr: DevAddr<[u8; 4]>,
    ) {
        self.state = State::Joined(Session::new(newskey, appskey, devaddr));
    }

    /// Join via ABP. This does not transmit a join request frame, but instead sets the session.
    pub(crate) fn set_session(&mut self, session: Session) {
        self.state = State::Joined(session);
    }

    /// Prepare the radio buffer for transmitting a data frame and provide the radio configuration
    /// for the transmission. Returns an error if the device is not joined.
    pub(crate) fn send<C: CryptoFactory + Default, RNG: RngCore, const N: usize>(
        &mut self,
        rng: &mut RNG,
        buf: &mut RadioBuffer<N>,
        send_data: &SendData,
    ) -> Result<(radio::TxConfig, FcntUp)> {
        let fcnt = match &mut self.state {
            State::Joined(ref mut session) => Ok(session.prepare_buffer::<C, N>(send_data, buf)),
            State::Otaa(_) => Err(Error::NotJoined),
            State::Unjoined => Err(Error::NotJoined),
        }?;
        let mut tx_config =
            self.region.create_tx_config(
                rng,
                self.configuration.data_rate,
                self.configuration.tx_power_index,
                &Frame::Data,
            );
        tx_config.adjust_power(self.board_eirp.max_power, self.board_eirp.antenna_gain);
        Ok((tx_config, fcnt))
    }

    pub(crate) fn get_rx_delay(&self, frame: &Frame, window: &Window) -> u32 {
        match frame {
            Frame::Join => match window {
                Window::_1 => self.configuration.join_accept_delay1,
                Window::_2 => self.configuration.join_accept_delay2,
            },
            Frame::Data => match window {
                Window::_1 => self.configuration.rx1_delay,
                // RECEIVE_DELAY2 is not configurable. LoRaWAN 1.0.3 Section 5.7:
                // "The second reception slot opens one second after the first reception slot."
                Window::_2 => self.configuration.rx1_delay + 1000,
            },
        }
    }

    /// Gets the radio configuration and timing for a given frame type and window.
    pub(crate) fn get_rx_parameters_legacy(
        &mut self,
        frame: &Frame,
        window: &Window,
    ) -> (RfConfig, u32) {
        (
            self.region.get_rx_config(self.configuration.data_rate, frame, window),
            self.get_rx_delay(frame, window),
        )
    }

    /// Handles a received RF frame. Returns None is unparseable, fails decryption, or fails MIC
    /// verification. Upon successful join, provides Response::JoinSuccess. Upon successful data
    /// rx, provides Response::DownlinkReceived. User must take the downlink from vec for
    /// application data.
    pub(crate) fn handle_rx<C: CryptoFactory + Default, const N: usize, const D: usize>(
        &mut self,
        buf: &mut RadioBuffer<N>,
        dl: &mut Vec<Downlink, D>,
    ) -> Response {
        match &mut self.state {
            State::Joined(ref mut session) => session.handle_rx::<C, N, D>(
                &mut self.region,
                &mut self.configuration,
                buf,
                dl,
                false,
            ),
            State::Otaa(ref mut otaa) => {
                if let Some(session) =
                    otaa.handle_rx::<C, N>(&mut self.region, &mut self.configuration, buf)
                {
                    self.state = State::Joined(session);
                    Response::JoinSuccess
                } else {
                    Response::NoUpdate
                }
            }
            State::Unjoined => Response::NoUpdate,
        }
    }

    /// Handles a received RF frame during RXC window. Returns None if unparseable, fails decryption,
    /// or fails MIC verification. Upon successful data rx, provides Response::DownlinkReceived.
    /// User must later call `take_downlink()` on the device to get the application data.
    pub(crate) fn handle_rxc<C: CryptoFactory + Default, const N: usize, const D: usize>(
        &mut self,
        buf: &mut RadioBuffer<N>,
        dl: &mut Vec<Downlink, D>,
    ) -> Result<Response> {
        match &mut self.state {
            State::Joined(ref mut session) => Ok(session.handle_rx::<C, N, D>(
                &mut self.region,
                &mut self.configuration,
                buf,
                dl,
                true,
            )),
            State::Otaa(_) => Err(Error::NotJoined),
            State::Unjoined => Err(Error::NotJoined),
        }
    }

    pub(crate) fn rx2_complete(&mut self) -> Response {
        match &mut self.state {
            State::Joined(session) => session.rx2_complete(),
            State::Otaa(otaa) => otaa.rx2_complete(),
            State::Unjoined => Response::NoUpdate,
        }
    }

    /// Confirmed-uplink retry ladder (LoRaWAN v1.0.2 §18.4): called when RX2 closes with no ACK.
    /// Steps the datarate down every other try and re-sends the already-prepared buffer. Returns
    /// `None` once the session isn't confirmed or `MAX_ACK_RETRIES` tries have been made, in which
    /// case the caller falls back to `rx2_complete`.
    pub(crate) fn ack_retry<RNG: RngCore>(&mut self, rng: &mut RNG) -> Option<radio::TxConfig> {
        let session = match &mut self.state {
            State::Joined(session) if session.confirmed => session,
            _ => return None,
        };
        session.ack_retries += 1;
        if session.ack_retries >= region::constants::MAX_ACK_RETRIES {
            return None;
        }
        let try_num = session.ack_retries + 1;
        let steps = (try_num - 1) / 2;
        let dr = self.configuration.data_rate.offset_sub(steps);
        let mut tx_config =
            self.region.create_tx_config(rng, dr, self.configuration.tx_power_index, &Frame::Data);
        tx_config.adjust_power(self.board_eirp.max_power, self.board_eirp.antenna_gain);
        Some(tx_config)
    }

    pub(crate) fn get_session_keys(&self) -> Option<SessionKeys> {
        match &self.state {
            State::Joined(session) => session.get_session_keys(),
            State::Otaa(_) => None,
            State::Unjoined => None,
        }
    }

    pub(crate) fn get_session(&self) -> Option<&Session> {
        match &self.state {
            State::Joined(session) => Some(session),
            State::Otaa(_) => None,
            State::Unjoined => None,
        }
    }

    pub(crate) fn is_joined(&self) -> bool {
        matches!(&self.state, State::Joined(_))
    }

    pub(crate) fn get_fcnt_up(&self) -> Option<FcntUp> {
        match &self.state {
            State::Joined(session) => Some(session.fcnt_up),
            State::Otaa(_) => None,
            State::Unjoined => None,
        }
    }

    pub(crate) fn get_rx_config(&self, buffer_ms: u32, frame: &Frame, window: &Window) -> RxConfig {
        RxConfig {
            rf: self.region.get_rx_config(self.configuration.data_rate, frame, window),
            mode: RxMode::Single { ms: buffer_ms },
        }
    }

    pub(crate) fn get_rxc_config(&self) -> RxConfig {
        RxConfig {
            rf: self.region.get_rxc_config(self.configuration.data_rate),
            mode: RxMode::Continuous,
        }
    }

    pub(crate) fn get_antenna_gain(&self) -> i8 {
        self.board_eirp.antenna_gain
    }

    pub(crate) fn set_antenna_gain(&mut self, gain: i8) {
        self.board_eirp.antenna_gain = gain;
    }
}

#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[derive(Debug)]
pub enum Response {
    NoAck,
    SessionExpired,
    DownlinkReceived(FcntDown),
    /// Same FCntDown as an already-accepted downlink: the network resent it because our ACK
    /// was lost. The ack bit was re-armed for the next uplink, but the payload was not
    /// re-indicated and MAC commands were not reprocessed.
    DownlinkRepeated(FcntDown),
    NoJoinAccept,
    JoinSuccess,
    NoUpdate,
    RxComplete,
    /// A frame addressed to us failed MIC validation.
    MicFailed,
    /// A received data frame's DevAddr doesn't match our session.
    AddressFail,
    /// The gap between a received FCntDown and our last accepted one exceeds `MAX_FCNT_GAP`;
    /// the frame is dropped rather than risk accepting a replayed/forged counter.
    DownlinkTooManyFramesLoss,
}

impl From<Response> for scheduler::Response {
    fn from(r: Response) -> Self {
        match r {
            Response::SessionExpired => scheduler::Response::SessionExpired,
            Response::DownlinkReceived(fcnt) => scheduler::Response::DownlinkReceived(fcnt),
            Response::DownlinkRepeated(fcnt) => scheduler::Response::DownlinkRepeated(fcnt),
            Response::NoAck => scheduler::Response::NoAck,
            Response::NoJoinAccept => scheduler::Response::NoJoinAccept,
            Response::JoinSuccess => scheduler::Response::JoinSuccess,
            Response::NoUpdate => scheduler::Response::NoUpdate,
            Response::RxComplete => scheduler::Response::RxComplete,
            Response::MicFailed => scheduler::Response::MicFailed,
            Response::AddressFail => scheduler::Response::AddressFail,
            Response::DownlinkTooManyFramesLoss => scheduler::Response::DownlinkTooManyFramesLoss,
        }
    }
}

fn del_to_delay_ms(del: u8) -> u32 {
    match del {
        2..=15 => del as u32 * 1000,
        _ => region::constants::RECEIVE_DELAY1,
    }
}
