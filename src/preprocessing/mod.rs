//! Audio preprocessing modules
//!
//! Channel mixing (multi-channel to mono) applied while decoding.

pub mod channel_mixer;
