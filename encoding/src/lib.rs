// Copyright (c) 2017,2018,2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

//! Wire format for a LoRaWAN v1.0.2 end-device: MHDR/FHDR/FRMPayload framing,
//! MAC command (de)serialization, and the AES-128 CMAC/CTR crypto primitives
//! built on top of it. Carries no knowledge of timers, radios, or regions —
//! that lives in the `mac` crate.
#![no_std]
#![allow(clippy::upper_case_acronyms)]
pub mod creator;
pub mod keys;
pub mod maccommandcreator;
pub mod maccommands;
pub mod parser;
pub mod types;

#[cfg(feature = "default-crypto")]
pub mod default_crypto;

mod securityhelpers;
