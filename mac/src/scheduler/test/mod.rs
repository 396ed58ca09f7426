use super::*;
mod util;
use crate::test_util::*;
use util::*;

use crate::mib;

#[test]
fn test_join_rx1() {
    let mut device = test_device();
    let response = device.join(get_otaa_credentials()).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(5000)));
    // send a timeout for beginning of window
    let response = device.handle_event(Event::TimeoutFired).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(5100)));
    device.get_radio().set_rxtx_handler(handle_join_request::<0>);
    // send a radio event to let the radio device indicate a packet was received
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::JoinSuccess));
    assert!(device.get_session_keys().is_some());
}

#[test]
fn test_join_rx2() {
    let mut device = test_device();
    device.get_radio().set_rxtx_handler(handle_join_request::<1>);
    let response = device.join(get_otaa_credentials()).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(5000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(5100)));
    // send a timeout for end of rx1
    let response = device.handle_event(Event::TimeoutFired).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(6000)));
    // send a timeout for beginning of rx2
    let response = device.handle_event(Event::TimeoutFired).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(6100)));
    // send a radio event to let the radio device indicate a packet was received
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::JoinSuccess));
    assert!(device.get_session_keys().is_some());
}

#[test]
fn test_unconfirmed_uplink_no_downlink() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let response = device.send(&[0; 1], 1, false).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
    assert!(matches!(response, Response::TimeoutRequest(1100)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // end Rx1
    assert!(matches!(response, Response::TimeoutRequest(2000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx2
    assert!(matches!(response, Response::TimeoutRequest(2100)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // end Rx2
    assert!(matches!(response, Response::RxComplete));
    // an unconfirmed send always consumes exactly one fcnt slot
    assert_eq!(device.get_fcnt_up(), Some(1));
}

#[test]
fn test_confirmed_uplink_retry_ladder_then_no_ack() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let dr_before = device.get_datarate();
    let response = device.send(&[0; 1], 1, true).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    // drive every try of the retry ladder to exhaustion: each try is RX1-open, RX1-close
    // (the radio never answers, so RX1 always times out into RX2), RX2-open, RX2-close,
    // which either starts another try or ends the cycle.
    for _ in 0..region::constants::MAX_ACK_RETRIES {
        let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
        assert!(matches!(response, Response::TimeoutRequest(_)));
        let response = device.handle_event(Event::TimeoutFired).unwrap(); // end Rx1
        assert!(matches!(response, Response::TimeoutRequest(_)));
        let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx2
        assert!(matches!(response, Response::TimeoutRequest(_)));
        let response = device.handle_event(Event::TimeoutFired).unwrap(); // end Rx2
        match response {
            Response::NoAck => break,
            Response::TimeoutRequest(_) => {}
            other => panic!("unexpected response mid-ladder: {other:?}"),
        }
    }
    // retries step the datarate down but never below DR0
    assert!((device.get_datarate() as u8) <= dr_before as u8);
    // the whole retry cycle for one confirmed uplink only ever consumes one fcnt slot
    assert_eq!(device.get_fcnt_up(), Some(1));
}

#[test]
fn test_confirmed_uplink_with_ack_rx1() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let response = device.send(&[0; 1], 1, true).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
    assert!(matches!(response, Response::TimeoutRequest(1100)));
    device.get_radio().set_rxtx_handler(handle_data_uplink_with_link_adr_req::<0, 0>);
    // send a radio event to let the radio device indicate a packet was received
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::DownlinkReceived(0)));
}

#[test]
fn test_link_adr_ans() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let response = device.send(&[0; 1], 1, true).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
    assert!(matches!(response, Response::TimeoutRequest(1100)));
    device.get_radio().set_rxtx_handler(handle_data_uplink_with_link_adr_req::<0, 0>);
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::DownlinkReceived(0)));
    // send another uplink which should carry the LinkAdrAns
    let response = device.send(&[0; 1], 1, true).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
    assert!(matches!(response, Response::TimeoutRequest(1100)));
    device.get_radio().set_rxtx_handler(handle_data_uplink_with_link_adr_ans);
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::DownlinkReceived(1)));
}

#[test]
fn test_downlink_bad_mic_does_not_advance_fcnt_down() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let response = device.send(&[0; 1], 1, false).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
    assert!(matches!(response, Response::TimeoutRequest(1100)));
    device.get_radio().set_rxtx_handler(class_c_downlink_bad_mic::<1>);
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::MicFailed));
    // a rejected frame never touches fcnt_down, and the RX window stays open for the real downlink
    assert_eq!(device.get_session().unwrap().fcnt_down, 0);
}

#[test]
fn test_rx1_timeout_rx2_success_unconfirmed_downlink() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let response = device.send(&[0; 1], 1, false).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));
    // RX1 elapses with no preamble: drive straight through its window via timeouts only
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx1
    assert!(matches!(response, Response::TimeoutRequest(1100)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // end Rx1
    assert!(matches!(response, Response::TimeoutRequest(2000)));
    let response = device.handle_event(Event::TimeoutFired).unwrap(); // begin Rx2
    assert!(matches!(response, Response::TimeoutRequest(2100)));
    device.get_radio().set_rxtx_handler(class_c_downlink::<0>);
    let response = device.handle_event(Event::RadioEvent(radio::Event::Phy(()))).unwrap();
    assert!(matches!(response, Response::DownlinkReceived(0)));
}

#[test]
fn test_mib_get_set_roundtrip() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();

    assert_eq!(device.mib_set(mib::MibAttribute::AdrEnable(false)), mib::Status::Ok);
    assert!(matches!(
        device.mib_get(mib::MibTag::AdrEnable),
        mib::MibAttribute::AdrEnable(false)
    ));

    assert_eq!(
        device.mib_set(mib::MibAttribute::ChannelsTxPower(1)),
        mib::Status::Ok
    );
    assert!(matches!(
        device.mib_get(mib::MibTag::ChannelsTxPower),
        mib::MibAttribute::ChannelsTxPower(1)
    ));
}

#[test]
fn test_mib_set_rejects_out_of_range_datarate() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();

    let status = device.mib_set(mib::MibAttribute::Rx1DrOffset(0xF));
    assert_eq!(status, mib::Status::ParameterInvalid);
}

#[test]
fn test_mib_set_busy_while_tx_in_flight() {
    let mut device = test_device();
    device.join(get_abp_credentials()).unwrap();
    let response = device.send(&[0; 1], 1, true).unwrap();
    assert!(matches!(response, Response::TimeoutRequest(1000)));

    // a TX cycle is running, so attributes that affect TX must be refused with Busy
    let status = device.mib_set(mib::MibAttribute::ChannelsDatarate(device.get_datarate()));
    assert_eq!(status, mib::Status::Busy);
}
