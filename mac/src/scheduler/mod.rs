//! A non-blocking LoRaWAN device implementation which uses an explicitly defined state machine
//! for driving the protocol state against pin and timer events. Depends on a non-async radio
//! implementation.
use super::radio::RadioBuffer;
use super::*;
use crate::scheduler::radio::PhyRxTx;
use mac::{Mac, SendData};

pub(crate) mod state;

pub mod radio;
#[cfg(test)]
mod test;

type TimestampMs = u32;

pub struct Device<R, C, RNG, const N: usize, const D: usize = 1>
where
    R: PhyRxTx + Timings,
    C: CryptoFactory + Default,
    RNG: RngCore,
{
    state: State,
    shared: Shared<R, RNG, N, D>,
    crypto: PhantomData<C>,
}

impl<R, C, RNG, const N: usize, const D: usize> Device<R, C, RNG, N, D>
where
    R: PhyRxTx + Timings,
    C: CryptoFactory + Default,
    RNG: RngCore,
{
    pub fn new(region: region::Configuration, radio: R, rng: RNG) -> Device<R, C, RNG, N, D> {
        Device {
            crypto: PhantomData,
            state: State::default(),
            shared: Shared {
                radio,
                rng,
                tx_buffer: RadioBuffer::new(),
                mac: Mac::new(region, R::MAX_RADIO_POWER, R::ANTENNA_GAIN),
                downlink: Vec::new(),
            },
        }
    }

    pub fn join(&mut self, join_mode: JoinMode) -> Result<Response, Error<R>> {
        match join_mode {
            JoinMode::OTAA { deveui, appeui, appkey } => {
                self.handle_event(Event::Join(NetworkCredentials::new(appeui, deveui, appkey)))
            }
            JoinMode::ABP { devaddr, appskey, newskey } => {
                self.shared.mac.join_abp(newskey, appskey, devaddr);
                Ok(Response::JoinSuccess)
            }
        }
    }

    pub fn get_radio(&mut self) -> &mut R {
        &mut self.shared.radio
    }

    pub fn get_datarate(&mut self) -> region::DR {
        self.shared.mac.configuration.data_rate
    }

    pub fn set_datarate(&mut self, datarate: region::DR) {
        self.shared.mac.configuration.data_rate = datarate
    }

    /// Applies a managed attribute. Returns `Status::Busy` if the attribute affects TX and a
    /// TX cycle is currently running (spec §4.8).
    pub fn mib_set(&mut self, attr: mib::MibAttribute) -> mib::Status {
        if mib::is_read_only(&attr) {
            return mib::Status::ServiceUnknown;
        }
        if mib::affects_tx(&attr) && !matches!(&self.state, State::Idle(_)) {
            return mib::Status::Busy;
        }
        // Handled ahead of the `config` borrow below since it lives on `self.shared.mac`
        // directly rather than on `self.shared.mac.configuration`.
        if let mib::MibAttribute::AntennaGain(gain) = attr {
            self.shared.mac.set_antenna_gain(gain);
            return mib::Status::Ok;
        }
        let config = &mut self.shared.mac.configuration;
        match attr {
            mib::MibAttribute::AdrEnable(v) => config.adr_enable = v,
            mib::MibAttribute::PublicNetwork(v) => config.public_network = v,
            mib::MibAttribute::RepeaterSupport(v) => config.repeater_support = v,
            mib::MibAttribute::DeviceClass(v) => config.device_class = v,
            mib::MibAttribute::ChannelsDatarate(dr) => {
                if self.shared.mac.region.get_datarate(dr as u8).is_none() {
                    return mib::Status::DatarateInvalid;
                }
                config.data_rate = dr;
            }
            mib::MibAttribute::ChannelsTxPower(pw) => {
                if self.shared.mac.region.check_tx_power(pw).flatten().is_none() {
                    return mib::Status::ParameterInvalid;
                }
                config.tx_power_index = pw;
            }
            mib::MibAttribute::Rx1DrOffset(offset) => {
                match self.shared.mac.region.rx1_dr_offset_validate(offset) {
                    Some(_) => self.shared.mac.region.set_rx1_dr_offset(offset),
                    None => return mib::Status::ParameterInvalid,
                }
            }
            mib::MibAttribute::Rx2ChannelDatarate(dr) => {
                if self.shared.mac.region.get_datarate(dr).is_none() {
                    return mib::Status::DatarateInvalid;
                }
                self.shared.mac.region.set_rx2_datarate(dr);
            }
            mib::MibAttribute::ReceiveDelay1(ms) => config.rx1_delay = ms,
            mib::MibAttribute::JoinAcceptDelay1(ms) => config.join_accept_delay1 = ms,
            mib::MibAttribute::JoinAcceptDelay2(ms) => config.join_accept_delay2 = ms,
            mib::MibAttribute::AntennaGain(_) => unreachable!("handled above"),
            mib::MibAttribute::DevAddr(_)
            | mib::MibAttribute::NwkSKey(_)
            | mib::MibAttribute::AppSKey(_)
            | mib::MibAttribute::ChannelsMask(_) => unreachable!("rejected by is_read_only above"),
        }
        mib::Status::Ok
    }

    /// Reads a managed attribute's live value.
    pub fn mib_get(&self, tag: mib::MibTag) -> mib::MibAttribute {
        let config = &self.shared.mac.configuration;
        match tag {
            mib::MibTag::AdrEnable => mib::MibAttribute::AdrEnable(config.adr_enable),
            mib::MibTag::PublicNetwork => mib::MibAttribute::PublicNetwork(config.public_network),
            mib::MibTag::RepeaterSupport => {
                mib::MibAttribute::RepeaterSupport(config.repeater_support)
            }
            mib::MibTag::DeviceClass => mib::MibAttribute::DeviceClass(config.device_class),
            mib::MibTag::ChannelsDatarate => mib::MibAttribute::ChannelsDatarate(config.data_rate),
            mib::MibTag::ChannelsTxPower => mib::MibAttribute::ChannelsTxPower(config.tx_power_index),
            mib::MibTag::Rx1DrOffset => {
                mib::MibAttribute::Rx1DrOffset(self.shared.mac.region.rx1_dr_offset())
            }
            mib::MibTag::Rx2ChannelDatarate => {
                mib::MibAttribute::Rx2ChannelDatarate(self.shared.mac.region.rx2_datarate())
            }
            mib::MibTag::ReceiveDelay1 => mib::MibAttribute::ReceiveDelay1(config.rx1_delay),
            mib::MibTag::JoinAcceptDelay1 => {
                mib::MibAttribute::JoinAcceptDelay1(config.join_accept_delay1)
            }
            mib::MibTag::JoinAcceptDelay2 => {
                mib::MibAttribute::JoinAcceptDelay2(config.join_accept_delay2)
            }
            mib::MibTag::AntennaGain => mib::MibAttribute::AntennaGain(self.shared.mac.get_antenna_gain()),
            mib::MibTag::DevAddr => {
                mib::MibAttribute::DevAddr(self.shared.mac.get_session().map(|s| *s.devaddr()))
            }
            mib::MibTag::NwkSKey => {
                mib::MibAttribute::NwkSKey(self.shared.mac.get_session().map(|s| *s.newskey()))
            }
            mib::MibTag::AppSKey => {
                mib::MibAttribute::AppSKey(self.shared.mac.get_session().map(|s| *s.appskey()))
            }
            mib::MibTag::ChannelsMask => {
                let mask = self.shared.mac.region.channel_mask_get();
                let mut bytes = [0u8; 9];
                for (i, b) in bytes.iter_mut().enumerate() {
                    *b = mask.get_index(i);
                }
                mib::MibAttribute::ChannelsMask(bytes)
            }
        }
    }

    pub fn ready_to_send_data(&self) -> bool {
        matches!(&self.state, State::Idle(_)) && self.shared.mac.is_joined()
    }

    pub fn send(&mut self, data: &[u8], fport: u8, confirmed: bool) -> Result<Response, Error<R>> {
        self.handle_event(Event::SendDataRequest(SendData { data, fport, confirmed }))
    }

    pub fn get_fcnt_up(&self) -> Option<u32> {
        self.shared.mac.get_fcnt_up()
    }

    pub fn get_session(&self) -> Option<&mac::Session> {
        self.shared.mac.get_session()
    }

    pub fn set_session(&mut self, s: mac::Session) {
        self.shared.mac.set_session(s)
    }

    pub fn get_session_keys(&self) -> Option<mac::SessionKeys> {
        self.shared.mac.get_session_keys()
    }

    pub fn take_downlink(&mut self) -> Option<Downlink> {
        self.shared.downlink.pop()
    }

    pub fn handle_event(&mut self, event: Event<R>) -> Result<Response, Error<R>> {
        let (new_state, result) = self.state.handle_event::<R, C, RNG, N, D>(
            &mut self.shared.mac,
            &mut self.shared.radio,
            &mut self.shared.rng,
            &mut self.shared.tx_buffer,
            &mut self.shared.downlink,
            event,
        );
        self.state = new_state;
        result
    }
}

pub(crate) struct Shared<R: PhyRxTx + Timings, RNG: RngCore, const N: usize, const D: usize> {
    pub(crate) radio: R,
    pub(crate) rng: RNG,
    pub(crate) tx_buffer: RadioBuffer<N>,
    pub(crate) mac: Mac,
    pub(crate) downlink: Vec<Downlink, D>,
}

#[derive(Debug)]
pub enum Response {
    NoUpdate,
    TimeoutRequest(TimestampMs),
    JoinRequestSending,
    JoinSuccess,
    NoJoinAccept,
    UplinkSending(mac::FcntUp),
    DownlinkReceived(mac::FcntDown),
    /// Same FCntDown as an already-accepted downlink; ack bit re-armed, nothing re-indicated.
    DownlinkRepeated(mac::FcntDown),
    NoAck,
    ReadyToSend,
    SessionExpired,
    RxComplete,
    /// MCPS-Indication Status=MIC_FAIL: a frame addressed to us failed MIC validation.
    MicFailed,
    /// MCPS-Indication Status=ADDRESS_FAIL: a received frame's DevAddr doesn't match ours.
    AddressFail,
    /// MCPS-Indication Status=DOWNLINK_TOO_MANY_FRAMES_LOSS: the FCntDown gap exceeds
    /// `MAX_FCNT_GAP`.
    DownlinkTooManyFramesLoss,
}

#[derive(Debug)]
pub enum Error<R: PhyRxTx> {
    Radio(R::PhyError),
    State(state::Error),
    Mac(mac::Error),
}

impl<R: PhyRxTx> From<mac::Error> for Error<R> {
    fn from(mac_error: mac::Error) -> Error<R> {
        Error::Mac(mac_error)
    }
}

pub enum Event<'a, R>
where
    R: PhyRxTx,
{
    Join(NetworkCredentials),
    SendDataRequest(SendData<'a>),
    RadioEvent(radio::Event<'a, R>),
    TimeoutFired,
}

impl<'a, R> core::fmt::Debug for Event<'a, R>
where
    R: PhyRxTx,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let event = match self {
            Event::Join(_) => "Join",
            Event::SendDataRequest(_) => "SendDataRequest",
            Event::RadioEvent(_) => "RadioEvent",
            Event::TimeoutFired => "TimeoutFired",
        };
        write!(f, "lorawan_device::Event::{event}")
    }
}
