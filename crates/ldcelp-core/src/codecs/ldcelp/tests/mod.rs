//! LD-CELP Test Modules
//!
//! Codec-level suites; unit tests for the individual stages live next to
//! the code they cover.

pub mod utils;

mod decoder_tests;
mod encoder_tests;
mod property_tests;
