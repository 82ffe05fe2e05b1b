use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::format::{AudioFormat, VideoFormat, VideoLayout};
use crate::payload::Payload;
use crate::temporal::{Rational, Timestamp};

// ---------------------------------------------------------------------------
// GrainType
// ---------------------------------------------------------------------------

/// The kind of essence a grain carries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainType {
    Empty,
    Event,
    Audio,
    Video,
    CodedAudio,
    CodedVideo,
    Other(String),
}

impl fmt::Display for GrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Event => write!(f, "event"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
            Self::CodedAudio => write!(f, "coded_audio"),
            Self::CodedVideo => write!(f, "coded_video"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TimeLabel
// ---------------------------------------------------------------------------

/// A named timecode attached to a grain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLabel {
    pub tag: String,
    /// Frames since midnight.
    pub count: u64,
    pub rate: Rational,
    pub drop_frame: bool,
}

impl TimeLabel {
    pub fn new(tag: impl Into<String>, count: u64, rate: Rational) -> Self {
        Self {
            tag: tag.into(),
            count,
            rate,
            drop_frame: false,
        }
    }

    /// The label as a name → value mapping.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("tag".into(), json!(self.tag));
        map.insert("count".into(), json!(self.count));
        map.insert("rate".into(), json!(self.rate.to_string()));
        map.insert("drop_frame".into(), json!(self.drop_frame));
        map
    }
}

// ---------------------------------------------------------------------------
// Type-specific bodies
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBody {
    pub event_type: String,
    pub topic: String,
    pub event_data: Map<String, Value>,
}

impl EventBody {
    /// The serialised form whose size determines the grain length.
    pub fn to_json(&self) -> Value {
        json!({
            "type": self.event_type,
            "topic": self.topic,
            "data": self.event_data,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioBody {
    pub format: AudioFormat,
    /// Samples per channel.
    pub samples: u64,
    pub channels: u32,
    pub sample_rate: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodedAudioBody {
    pub format: AudioFormat,
    pub samples: u64,
    pub channels: u32,
    pub sample_rate: u32,
    pub priming: u32,
    pub remainder: u32,
}

/// Geometry of one plane of a planar video payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoComponent {
    pub width: usize,
    pub height: usize,
    /// Bytes per row.
    pub stride: usize,
    /// Byte offset of the plane within the payload.
    pub offset: usize,
    /// Plane size in bytes.
    pub length: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoBody {
    pub format: VideoFormat,
    pub width: usize,
    pub height: usize,
    pub layout: VideoLayout,
    /// Plane geometry; empty for packed and compressed formats.
    pub components: Vec<VideoComponent>,
}

impl VideoBody {
    /// Create a body with tightly packed plane geometry derived from the
    /// format's value width and chroma subsampling.
    pub fn new(format: VideoFormat, width: usize, height: usize, layout: VideoLayout) -> Self {
        let mut components = Vec::new();
        if let Some((h_shift, v_shift)) = format.subsampling() {
            let bpv = format.bytes_per_value();
            let mut offset = 0;
            for plane in 0..3 {
                let (w, h) = if plane == 0 {
                    (width, height)
                } else {
                    (
                        (width + (1 << h_shift) - 1) >> h_shift,
                        (height + (1 << v_shift) - 1) >> v_shift,
                    )
                };
                let stride = w * bpv;
                let length = stride * h;
                components.push(VideoComponent {
                    width: w,
                    height: h,
                    stride,
                    offset,
                    length,
                });
                offset += length;
            }
        }
        Self {
            format,
            width,
            height,
            layout,
            components,
        }
    }

    /// Total payload size implied by the plane geometry.
    pub fn planar_size(&self) -> usize {
        self.components.iter().map(|c| c.length).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodedVideoBody {
    pub format: VideoFormat,
    pub coded_width: usize,
    pub coded_height: usize,
    pub origin_width: usize,
    pub origin_height: usize,
    pub is_key_frame: bool,
    pub temporal_offset: i64,
    pub layout: VideoLayout,
    /// Byte offsets of coded units within the payload.
    pub unit_offsets: Option<Vec<u32>>,
}

/// The type-specific part of a grain.
#[derive(Clone, Debug, PartialEq)]
pub enum GrainBody {
    Empty,
    Event(EventBody),
    Audio(AudioBody),
    Video(VideoBody),
    CodedAudio(CodedAudioBody),
    CodedVideo(CodedVideoBody),
    /// A grain type this model has no fields for.
    Other(String),
}

// ---------------------------------------------------------------------------
// Grain
// ---------------------------------------------------------------------------

/// A timestamped unit of media essence plus its metadata.
#[derive(Clone, Debug)]
pub struct Grain {
    pub source_id: Uuid,
    pub flow_id: Uuid,
    pub origin_timestamp: Timestamp,
    pub sync_timestamp: Timestamp,
    pub creation_timestamp: Timestamp,
    pub rate: Rational,
    pub duration: Rational,
    pub timelabels: Vec<TimeLabel>,
    pub data: Option<Payload>,
    pub body: GrainBody,
}

impl Grain {
    /// Create a grain with zero timestamps, rate and duration and no payload.
    pub fn new(source_id: Uuid, flow_id: Uuid, body: GrainBody) -> Self {
        Self {
            source_id,
            flow_id,
            origin_timestamp: Timestamp::zero(),
            sync_timestamp: Timestamp::zero(),
            creation_timestamp: Timestamp::zero(),
            rate: Rational::zero(),
            duration: Rational::zero(),
            timelabels: Vec::new(),
            data: None,
            body,
        }
    }

    /// Attach a payload, replacing any existing one.
    pub fn with_data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn grain_type(&self) -> GrainType {
        match &self.body {
            GrainBody::Empty => GrainType::Empty,
            GrainBody::Event(_) => GrainType::Event,
            GrainBody::Audio(_) => GrainType::Audio,
            GrainBody::Video(_) => GrainType::Video,
            GrainBody::CodedAudio(_) => GrainType::CodedAudio,
            GrainBody::CodedVideo(_) => GrainType::CodedVideo,
            GrainBody::Other(name) => GrainType::Other(name.clone()),
        }
    }

    /// Payload length in bytes.
    ///
    /// Event grains report the size of their serialised event body.
    pub fn length(&self) -> usize {
        match &self.body {
            GrainBody::Event(event) => serde_json::to_vec(&event.to_json()).map_or(0, |v| v.len()),
            _ => self.data.as_ref().map_or(0, Payload::len),
        }
    }
}
