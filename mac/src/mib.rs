//! Get/Set surface for managed MAC attributes, plus the flat `Status` taxonomy shared by
//! attribute access and TX requests.
//!
//! Mirrors LoRaMac-node's `MibRequestConfirm`: one enum carries the attribute tag and, for
//! Set, the value to apply; Get returns the live value straight off session/region state
//! rather than a cached copy.
use crate::region;
use crate::{AppSKey, NewSKey};
use lorawan::parser::DevAddr;

/// Flat status taxonomy returned by the synchronous Set/attribute/TX surface. No nested
/// error types -- a caller matches on this directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Status {
    Ok,
    Busy,
    ServiceUnknown,
    ParameterInvalid,
    FrequencyInvalid,
    DatarateInvalid,
    FreqAndDrInvalid,
    NoNetworkJoined,
    LengthError,
    DeviceOff,
    RegionNotSupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceClass {
    A,
    /// Treated as an alias of Class A: no ping-slot/beacon scheduling is implemented.
    B,
    C,
}

/// One managed attribute, carrying the value to apply for a Set. A handful of attributes
/// (session keys, DevAddr, the channel mask) are Get-only: reachable from `MibAttribute` so
/// `mib_get` can answer with them, but rejected by `mib_set` with `Status::ServiceUnknown`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MibAttribute {
    AdrEnable(bool),
    PublicNetwork(bool),
    RepeaterSupport(bool),
    DeviceClass(DeviceClass),
    ChannelsDatarate(region::DR),
    ChannelsTxPower(u8),
    Rx1DrOffset(u8),
    Rx2ChannelDatarate(u8),
    ReceiveDelay1(u32),
    JoinAcceptDelay1(u32),
    JoinAcceptDelay2(u32),
    AntennaGain(i8),
    /// Get-only: live session DevAddr, `None` when not joined.
    DevAddr(Option<DevAddr<[u8; 4]>>),
    /// Get-only: live session NwkSKey, `None` when not joined.
    NwkSKey(Option<NewSKey>),
    /// Get-only: live session AppSKey, `None` when not joined.
    AppSKey(Option<AppSKey>),
    /// Get-only: the region's current enabled-channel bitmask, one bit per channel, banked into
    /// 9 bytes the same way `ChannelMask<9>` is (LoRaWAN v1.0.2 §5.2).
    ChannelsMask([u8; 9]),
}

/// Tag identifying an attribute for Get, without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MibTag {
    AdrEnable,
    PublicNetwork,
    RepeaterSupport,
    DeviceClass,
    ChannelsDatarate,
    ChannelsTxPower,
    Rx1DrOffset,
    Rx2ChannelDatarate,
    ReceiveDelay1,
    JoinAcceptDelay1,
    JoinAcceptDelay2,
    AntennaGain,
    DevAddr,
    NwkSKey,
    AppSKey,
    ChannelsMask,
}

/// Which MibAttribute variants also require the TX cycle be idle (spec §4.8: "BUSY if a TX
/// cycle is running and the attribute affects TX").
pub(crate) fn affects_tx(attr: &MibAttribute) -> bool {
    matches!(
        attr,
        MibAttribute::ChannelsDatarate(_)
            | MibAttribute::ChannelsTxPower(_)
            | MibAttribute::Rx1DrOffset(_)
            | MibAttribute::Rx2ChannelDatarate(_)
            | MibAttribute::AntennaGain(_)
    )
}

/// Attributes only `mib_get` can answer; `mib_set` rejects them with `Status::ServiceUnknown`.
pub(crate) fn is_read_only(attr: &MibAttribute) -> bool {
    matches!(
        attr,
        MibAttribute::DevAddr(_)
            | MibAttribute::NwkSKey(_)
            | MibAttribute::AppSKey(_)
            | MibAttribute::ChannelsMask(_)
    )
}
