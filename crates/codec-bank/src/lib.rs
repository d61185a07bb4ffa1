//! Bring-up layer for a bank of AK4619 codecs on one shared SPI bus.
//!
//! A board carries up to eight codecs, each with its own active-low
//! chip-select line, powered in groups of four behind enable rails. This
//! crate owns that topology: the slot list is built at runtime from the
//! board configuration, and [`CodecBank::bring_up`] walks it in index
//! order, putting every codec into the fixed TDM-128 I2S operating mode
//! the audio path expects.
//!
//! The driver crate ([`ak4619`]) stays transport-agnostic; the bank is
//! SPI-only because that is how the codec array is wired.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::doc_markdown)] // register names and hex values in doc comments

mod bank;

pub use bank::{
    BankError, BringUpStep, CodecBank, CodecSlot, MAX_CODECS, MAX_RAILS, POWER_SETTLE_MS,
    RAIL_GROUP,
};
