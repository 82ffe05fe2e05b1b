//! Payload format descriptors for audio and video grains.
//!
//! The formats carry just enough structure for a consumer to decode a raw
//! payload: sample width and channel arrangement for audio, value width,
//! bit depth, packing and chroma subsampling for video.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Numeric representation of a single PCM sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleType {
    S16,
    S24,
    S32,
    Float,
    Double,
}

impl SampleType {
    /// Bytes occupied by one sample in the payload.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::S16 => 2,
            Self::S24 => 3,
            Self::S32 | Self::Float => 4,
            Self::Double => 8,
        }
    }
}

/// How channels are arranged in an uncompressed audio payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleLayout {
    /// One plane per channel, planes stored back to back.
    Planes,
    /// One plane per pair of channels, each plane interleaving its pair.
    Pairs,
    /// All channels interleaved in a single plane.
    Interleaved,
}

/// Audio payload format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioFormat {
    S16Planes,
    S16Pairs,
    S16Interleaved,
    S24Planes,
    S24Pairs,
    S24Interleaved,
    S32Planes,
    S32Pairs,
    S32Interleaved,
    FloatPlanes,
    FloatPairs,
    FloatInterleaved,
    DoublePlanes,
    DoublePairs,
    DoubleInterleaved,
    Mp1,
    Aac,
    Opus,
    Invalid,
}

impl AudioFormat {
    /// Sample representation, or `None` for coded and invalid formats.
    pub fn sample_type(&self) -> Option<SampleType> {
        use AudioFormat::*;
        match self {
            S16Planes | S16Pairs | S16Interleaved => Some(SampleType::S16),
            S24Planes | S24Pairs | S24Interleaved => Some(SampleType::S24),
            S32Planes | S32Pairs | S32Interleaved => Some(SampleType::S32),
            FloatPlanes | FloatPairs | FloatInterleaved => Some(SampleType::Float),
            DoublePlanes | DoublePairs | DoubleInterleaved => Some(SampleType::Double),
            Mp1 | Aac | Opus | Invalid => None,
        }
    }

    /// Channel arrangement, or `None` for coded and invalid formats.
    pub fn layout(&self) -> Option<SampleLayout> {
        use AudioFormat::*;
        match self {
            S16Planes | S24Planes | S32Planes | FloatPlanes | DoublePlanes => {
                Some(SampleLayout::Planes)
            }
            S16Pairs | S24Pairs | S32Pairs | FloatPairs | DoublePairs => Some(SampleLayout::Pairs),
            S16Interleaved | S24Interleaved | S32Interleaved | FloatInterleaved
            | DoubleInterleaved => Some(SampleLayout::Interleaved),
            Mp1 | Aac | Opus | Invalid => None,
        }
    }

    /// Bytes per sample for PCM formats.
    pub fn bytes_per_sample(&self) -> Option<usize> {
        self.sample_type().map(|t| t.bytes_per_sample())
    }

    /// Returns `true` for compressed formats.
    pub fn is_coded(&self) -> bool {
        matches!(self, Self::Mp1 | Self::Aac | Self::Opus)
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// Video payload format.
///
/// Planar formats are named `<type>_<subsampling>[_<depth>BIT]`, where the
/// value type is the storage width of each component value.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoFormat {
    U8_444,
    U8_422,
    U8_420,
    S16_444_10BIT,
    S16_422_10BIT,
    S16_420_10BIT,
    S16_444_12BIT,
    S16_422_12BIT,
    S16_420_12BIT,
    S16_444,
    S16_422,
    S16_420,
    S32_444,
    S32_422,
    S32_420,
    Uyvy,
    Yuyv,
    Ayuv,
    V210,
    V216,
    Rgb,
    Rgbx,
    Rgba,
    H264,
    Mpeg2,
    Vc2,
    Jpeg,
    Unknown,
}

impl VideoFormat {
    /// Storage width of a single component value in bytes.
    ///
    /// For `V210` this is the width of the 32-bit packing word.
    pub fn bytes_per_value(&self) -> usize {
        use VideoFormat::*;
        match self {
            S16_444_10BIT | S16_422_10BIT | S16_420_10BIT | S16_444_12BIT | S16_422_12BIT
            | S16_420_12BIT | S16_444 | S16_422 | S16_420 | V216 => 2,
            S32_444 | S32_422 | S32_420 | V210 => 4,
            _ => 1,
        }
    }

    /// Significant bits per component value.
    pub fn bit_depth(&self) -> u32 {
        use VideoFormat::*;
        match self {
            S16_444_10BIT | S16_422_10BIT | S16_420_10BIT | V210 => 10,
            S16_444_12BIT | S16_422_12BIT | S16_420_12BIT => 12,
            S16_444 | S16_422 | S16_420 | V216 => 16,
            S32_444 | S32_422 | S32_420 => 32,
            _ => 8,
        }
    }

    pub fn is_packed(&self) -> bool {
        use VideoFormat::*;
        matches!(self, Uyvy | Yuyv | Ayuv | V210 | V216 | Rgb | Rgbx | Rgba)
    }

    pub fn is_compressed(&self) -> bool {
        use VideoFormat::*;
        matches!(self, H264 | Mpeg2 | Vc2 | Jpeg)
    }

    /// Horizontal and vertical chroma shift for planar formats.
    pub fn subsampling(&self) -> Option<(u32, u32)> {
        use VideoFormat::*;
        match self {
            U8_444 | S16_444_10BIT | S16_444_12BIT | S16_444 | S32_444 => Some((0, 0)),
            U8_422 | S16_422_10BIT | S16_422_12BIT | S16_422 | S32_422 => Some((1, 0)),
            U8_420 | S16_420_10BIT | S16_420_12BIT | S16_420 | S32_420 => Some((1, 1)),
            _ => None,
        }
    }

    pub fn is_planar(&self) -> bool {
        self.subsampling().is_some()
    }
}

/// Field arrangement of a video frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoLayout {
    #[default]
    FullFrame,
    SeparateFields,
    SingleField,
    Mixed,
    Unknown,
}
