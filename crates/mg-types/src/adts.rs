//! ADTS (Audio Data Transport Stream) frame headers for AAC payloads.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Size of an ADTS header without CRC.
pub const ADTS_HEADER_LEN: usize = 7;

const SAMPLE_RATES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// Parameters of a single ADTS frame, read from its fixed header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// Total frame length in bytes, header included.
    pub frame_size: usize,
    /// MPEG-4 audio object type (profile + 1).
    pub object_type: u8,
    pub sample_rate: u32,
    pub channel_count: u8,
}

impl FrameInfo {
    /// Parse the fixed header at the start of `header`.
    pub fn parse(header: &[u8]) -> Result<Self, TypeError> {
        if header.len() < ADTS_HEADER_LEN {
            return Err(TypeError::MalformedHeader(format!(
                "ADTS header needs {ADTS_HEADER_LEN} bytes, have {}",
                header.len()
            )));
        }
        if header[0] != 0xFF || header[1] & 0xF0 != 0xF0 {
            return Err(TypeError::MalformedHeader(format!(
                "bad ADTS sync word {:02x}{:02x}",
                header[0], header[1]
            )));
        }

        let object_type = ((header[2] >> 6) & 0x03) + 1;
        let rate_index = usize::from((header[2] >> 2) & 0x0F);
        let sample_rate = *SAMPLE_RATES.get(rate_index).ok_or_else(|| {
            TypeError::MalformedHeader(format!("reserved sample rate index {rate_index}"))
        })?;
        let channel_count = ((header[2] & 0x01) << 2) | (header[3] >> 6);
        let frame_size = (usize::from(header[3] & 0x03) << 11)
            | (usize::from(header[4]) << 3)
            | (usize::from(header[5]) >> 5);

        if frame_size < ADTS_HEADER_LEN {
            return Err(TypeError::MalformedHeader(format!(
                "frame length {frame_size} shorter than header"
            )));
        }

        Ok(Self {
            frame_size,
            object_type,
            sample_rate,
            channel_count,
        })
    }

    /// Encode this frame's fixed header (no CRC, buffer fullness 0x7FF).
    pub fn to_header(&self) -> [u8; ADTS_HEADER_LEN] {
        let rate_index = SAMPLE_RATES
            .iter()
            .position(|r| *r == self.sample_rate)
            .unwrap_or(0x0F) as u8;
        let profile = self.object_type.saturating_sub(1) & 0x03;
        let len = self.frame_size;
        [
            0xFF,
            0xF1,
            (profile << 6) | (rate_index << 2) | ((self.channel_count >> 2) & 0x01),
            ((self.channel_count & 0x03) << 6) | ((len >> 11) as u8 & 0x03),
            (len >> 3) as u8,
            (((len & 0x07) as u8) << 5) | 0x1F,
            0xFC,
        ]
    }
}

/// Iterate over the ADTS frames of a payload.
///
/// Yields an error and stops at the first malformed or truncated frame.
pub fn adts_frames(data: &[u8]) -> AdtsFrames<'_> {
    AdtsFrames {
        data,
        pos: 0,
        failed: false,
    }
}

/// Iterator returned by [`adts_frames`].
pub struct AdtsFrames<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl Iterator for AdtsFrames<'_> {
    type Item = Result<FrameInfo, TypeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let parsed = FrameInfo::parse(rest).and_then(|info| {
            if info.frame_size > rest.len() {
                Err(TypeError::MalformedHeader(format!(
                    "frame at offset {} claims {} bytes, {} remain",
                    self.pos,
                    info.frame_size,
                    rest.len()
                )))
            } else {
                Ok(info)
            }
        });
        match &parsed {
            Ok(info) => self.pos += info.frame_size,
            Err(_) => self.failed = true,
        }
        Some(parsed)
    }
}
