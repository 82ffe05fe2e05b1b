//! Grain data model for media grain comparison.
//!
//! A grain is a timestamped chunk of audio, video, coded or event essence
//! plus metadata. This crate provides the types the comparison engine
//! reads: the common grain header, type-specific bodies, payload formats
//! and lazily-loaded payload bytes.
//!
//! # Key Types
//!
//! - [`Grain`] / [`GrainBody`] / [`GrainType`] -- A grain and its type-specific fields
//! - [`AudioFormat`] / [`VideoFormat`] -- Payload formats with decode parameters
//! - [`Timestamp`] / [`TimeOffset`] / [`Rational`] -- Temporal values
//! - [`Payload`] -- Payload bytes, resident or loaded once on first access
//! - [`FrameInfo`] -- ADTS frame header of an AAC payload

pub mod adts;
pub mod error;
pub mod format;
pub mod grain;
pub mod payload;
pub mod temporal;

pub use adts::{adts_frames, FrameInfo};
pub use error::TypeError;
pub use format::{AudioFormat, SampleLayout, SampleType, VideoFormat, VideoLayout};
pub use grain::{
    AudioBody, CodedAudioBody, CodedVideoBody, EventBody, Grain, GrainBody, GrainType, TimeLabel,
    VideoBody, VideoComponent,
};
pub use payload::Payload;
pub use temporal::{Rational, TimeOffset, Timestamp};
