//! Comparison of a single pair of grains.
//!
//! The metadata common to every grain is compared first, then the
//! type-specific fields and payload. Default exclusions are applied through
//! an overlay of the caller's options that only this grain's subtree sees.

use mg_types::{adts_frames, AudioFormat, Grain, GrainBody};
use serde_json::{Map, Value};
use tracing::debug;

use crate::binary::{binary_node, Annotate, WordSpec};
use crate::node::{difference, equality, failing, mapping, ordered};
use crate::options::{ComparisonOption, OptionKind, OptionSet};
use crate::psnr::psnr_node;
use crate::result::{all_pass, ComparisonNode, ResultKind, Site};

const EVENT_PAYLOAD_FIELDS: [&str; 3] = ["event_type", "topic", "event_data"];

/// Compare two grains at `site`.
pub(crate) fn grain_node(site: Site<'_>, a: &Grain, b: &Grain) -> ComparisonNode {
    let options = overlay(&site, a, b);
    let inner = site.with_options(&options);

    let mut children = vec![
        equality(inner.field("grain_type"), &a.grain_type(), &b.grain_type()),
        equality(inner.field("source_id"), &a.source_id, &b.source_id),
        equality(inner.field("flow_id"), &a.flow_id, &b.flow_id),
        difference(
            inner.field("origin_timestamp"),
            &a.origin_timestamp,
            &b.origin_timestamp,
        ),
        difference(inner.field("sync_timestamp"), &a.sync_timestamp, &b.sync_timestamp),
        difference(
            inner.field("creation_timestamp"),
            &a.creation_timestamp,
            &b.creation_timestamp,
        ),
        equality(inner.field("rate"), &a.rate, &b.rate),
        equality(inner.field("duration"), &a.duration, &b.duration),
        equality(inner.field("length"), &a.length(), &b.length()),
    ];
    let labels_a: Vec<Map<String, Value>> = a.timelabels.iter().map(|l| l.to_mapping()).collect();
    let labels_b: Vec<Map<String, Value>> = b.timelabels.iter().map(|l| l.to_mapping()).collect();
    children.push(ordered(inner.field("timelabels"), &labels_a, &labels_b, mapping));

    body_children(&inner, a, b, &mut children);

    let equal = all_pass(&children);
    debug!(
        identifier = %site.identifier,
        equal,
        failing = children.iter().filter(|c| !c.passes()).count(),
        "compared grains"
    );
    let msg = if equal { "Grains match" } else { "Grains do not match" };
    site.node(ResultKind::Grain, equal, msg, children)
}

/// The caller's options plus the exclusions implied by these two grains.
fn overlay(site: &Site<'_>, a: &Grain, b: &Grain) -> OptionSet {
    let mut options = site.options.clone();
    let mut exclude = |field: &str| {
        let path = site.field(field).identifier;
        if !options.excludes(&path) {
            options = options.with(ComparisonOption::at(path, OptionKind::Exclude));
        }
    };

    if !site.options.includes(&site.field("creation_timestamp").identifier) {
        exclude("creation_timestamp");
    }
    let payload_mismatch = match (&a.body, &b.body) {
        (GrainBody::Audio(x), GrainBody::Audio(y)) => x.format != y.format,
        (GrainBody::CodedAudio(x), GrainBody::CodedAudio(y)) => x.format != y.format,
        (GrainBody::Video(x), GrainBody::Video(y)) => x.format != y.format,
        (GrainBody::CodedVideo(x), GrainBody::CodedVideo(y)) => x.format != y.format,
        _ => a.grain_type() != b.grain_type(),
    };
    if payload_mismatch {
        exclude("data");
    }
    if matches!(a.body, GrainBody::Event(_))
        && EVENT_PAYLOAD_FIELDS
            .iter()
            .any(|f| site.options.excludes(&site.field(f).identifier))
    {
        exclude("length");
    }
    options
}

fn body_children(site: &Site<'_>, a: &Grain, b: &Grain, children: &mut Vec<ComparisonNode>) {
    let data = || site.field("data");
    match (&a.body, &b.body) {
        (x, y) if std::mem::discriminant(x) != std::mem::discriminant(y) => {
            children.push(failing(data(), "grain types do not match"));
        }
        (GrainBody::Other(x), GrainBody::Other(y)) if x != y => {
            children.push(failing(data(), "grain types do not match"));
        }
        (GrainBody::Event(x), GrainBody::Event(y)) => {
            children.push(equality(site.field("event_type"), &x.event_type, &y.event_type));
            children.push(equality(site.field("topic"), &x.topic, &y.topic));
            children.push(mapping(site.field("event_data"), &x.event_data, &y.event_data));
        }
        (GrainBody::Audio(x), GrainBody::Audio(y)) => {
            children.push(equality(site.field("format"), &x.format, &y.format));
            children.push(equality(site.field("samples"), &x.samples, &y.samples));
            children.push(equality(site.field("channels"), &x.channels, &y.channels));
            children.push(equality(site.field("sample_rate"), &x.sample_rate, &y.sample_rate));
            children.push(if x.format != y.format {
                failing(data(), "payload formats do not match")
            } else {
                raw_data(site, a, b, &WordSpec::for_audio(x.format))
            });
        }
        (GrainBody::CodedAudio(x), GrainBody::CodedAudio(y)) => {
            children.push(equality(site.field("format"), &x.format, &y.format));
            children.push(equality(site.field("samples"), &x.samples, &y.samples));
            children.push(equality(site.field("channels"), &x.channels, &y.channels));
            children.push(equality(site.field("sample_rate"), &x.sample_rate, &y.sample_rate));
            children.push(equality(site.field("priming"), &x.priming, &y.priming));
            children.push(equality(site.field("remainder"), &x.remainder, &y.remainder));
            children.push(if x.format != y.format {
                failing(data(), "payload formats do not match")
            } else {
                let annotate =
                    (x.format == AudioFormat::Aac).then_some(adts_frame_counts as Annotate);
                binary_node(data(), a.data.as_ref(), b.data.as_ref(), &WordSpec::U8, annotate)
            });
        }
        (GrainBody::Video(x), GrainBody::Video(y)) => {
            children.push(equality(site.field("format"), &x.format, &y.format));
            children.push(equality(site.field("width"), &x.width, &y.width));
            children.push(equality(site.field("height"), &x.height, &y.height));
            children.push(equality(site.field("layout"), &x.layout, &y.layout));
            children.push(if x.format != y.format {
                failing(data(), "payload formats do not match")
            } else {
                raw_data(site, a, b, &WordSpec::for_video(x.format))
            });
        }
        (GrainBody::CodedVideo(x), GrainBody::CodedVideo(y)) => {
            children.push(equality(site.field("format"), &x.format, &y.format));
            children.push(equality(site.field("coded_width"), &x.coded_width, &y.coded_width));
            children.push(equality(site.field("coded_height"), &x.coded_height, &y.coded_height));
            children.push(equality(site.field("origin_width"), &x.origin_width, &y.origin_width));
            children.push(equality(
                site.field("origin_height"),
                &x.origin_height,
                &y.origin_height,
            ));
            children.push(equality(site.field("is_key_frame"), &x.is_key_frame, &y.is_key_frame));
            children.push(equality(
                site.field("temporal_offset"),
                &x.temporal_offset,
                &y.temporal_offset,
            ));
            children.push(equality(site.field("layout"), &x.layout, &y.layout));
            children.push(ordered(
                site.field("unit_offsets"),
                x.unit_offsets.as_deref().unwrap_or_default(),
                y.unit_offsets.as_deref().unwrap_or_default(),
                |s, p, q| difference(s, p, q),
            ));
            children.push(if x.format != y.format {
                failing(data(), "payload formats do not match")
            } else {
                binary_node(data(), a.data.as_ref(), b.data.as_ref(), &WordSpec::U8, None)
            });
        }
        _ => {
            children.push(binary_node(
                data(),
                a.data.as_ref(),
                b.data.as_ref(),
                &WordSpec::U8,
                None,
            ));
        }
    }
}

/// PSNR when a threshold option names the payload, otherwise a sample diff.
fn raw_data(site: &Site<'_>, a: &Grain, b: &Grain, spec: &WordSpec) -> ComparisonNode {
    let data = site.field("data");
    if data.options.psnr_predicates(&data.identifier).next().is_some() {
        psnr_node(data, a, b)
    } else {
        binary_node(data, a.data.as_ref(), b.data.as_ref(), spec, None)
    }
}

fn adts_frame_counts(a: &[u8], b: &[u8]) -> Option<String> {
    let count = |data: &[u8]| adts_frames(data).collect::<Result<Vec<_>, _>>().ok().map(|f| f.len());
    Some(format!("ADTS frames: {} in a, {} in b", count(a)?, count(b)?))
}

#[cfg(test)]
mod tests {
    use mg_types::{
        AudioBody, CodedAudioBody, CodedVideoBody, EventBody, FrameInfo, Rational, TimeLabel,
        Timestamp, VideoBody, VideoFormat, VideoLayout,
    };
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::options::{exclude, include, psnr};
    use crate::result::{ContainerKey, DiffSettings};

    fn compare(a: &Grain, b: &Grain, options: &[ComparisonOption]) -> ComparisonNode {
        let options = OptionSet::new(options.iter().cloned());
        let settings = DiffSettings::default();
        grain_node(Site::root(&options, &settings), a, b)
    }

    fn base(body: GrainBody) -> Grain {
        let mut g = Grain::new(Uuid::from_u128(0x51), Uuid::from_u128(0xF1), body);
        g.origin_timestamp = Timestamp::new(417_798_915, 0);
        g.sync_timestamp = g.origin_timestamp;
        g.creation_timestamp = Timestamp::new(1_700_000_000, 5);
        g.rate = Rational::new(25, 1);
        g.duration = Rational::new(1, 25);
        g.timelabels = vec![TimeLabel::new("tmcd", 10, Rational::new(25, 1))];
        g
    }

    fn audio(format: AudioFormat, data: Vec<u8>) -> Grain {
        base(GrainBody::Audio(AudioBody {
            format,
            samples: (data.len() / 4) as u64,
            channels: 2,
            sample_rate: 48_000,
        }))
        .with_data(data)
    }

    fn event(data: Value) -> Grain {
        let Value::Object(event_data) = data else {
            panic!("event data must be an object");
        };
        base(GrainBody::Event(EventBody {
            event_type: "urn:x-nmos:format:data.event".into(),
            topic: "/".into(),
            event_data,
        }))
    }

    #[test]
    fn identical_grains_match() {
        let g = audio(AudioFormat::S16Interleaved, (0..64).collect());
        let result = compare(&g, &g, &[include("creation_timestamp").unwrap()]);
        assert!(result.is_equal(), "{}", result.message());
        assert!(result.failing_fields().is_empty());
        assert_eq!(result.message(), "Grains match");
    }

    #[test]
    fn creation_timestamp_is_excluded_by_default() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let mut b = a.clone();
        b.creation_timestamp = Timestamp::new(1_800_000_000, 0);

        let result = compare(&a, &b, &[]);
        assert!(result.is_equal());
        assert!(result.field("creation_timestamp").unwrap().excluded());
        assert_eq!(result.failing_fields(), vec!["creation_timestamp"]);

        let result = compare(&a, &b, &[include("creation_timestamp").unwrap()]);
        assert!(!result.is_equal());
    }

    #[test]
    fn exclusion_is_sound_and_complete() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let mut b = a.clone();
        b.flow_id = Uuid::from_u128(0xF2);

        let result = compare(&a, &b, &[exclude("flow_id").unwrap()]);
        assert!(result.is_equal());
        let flow = result.field("flow_id").unwrap();
        assert!(!flow.is_equal());
        assert!(flow.excluded());

        b.rate = Rational::new(50, 1);
        let result = compare(&a, &b, &[exclude("flow_id").unwrap()]);
        assert!(!result.is_equal());
        assert!(result.failing_fields().contains(&"rate"));
        assert_eq!(
            result.message(),
            format!(
                "Grains do not match: (<IGNORING: {}>; a.rate != b.rate: 25/1 != 50/1)",
                result.field("flow_id").unwrap().message()
            )
        );
    }

    #[test]
    fn grain_type_mismatch_fails_data() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let b = base(GrainBody::Empty).with_data(vec![0u8; 8]);
        let result = compare(&a, &b, &[]);
        assert!(!result.is_equal());
        let data = result.field("data").unwrap();
        assert_eq!(data.kind(), &ResultKind::Failing);
        assert!(data.excluded());
        assert!(data.message().contains("grain types do not match"));
        assert!(result.field("grain_type").is_ok_and(|n| !n.is_equal()));
        assert!(result.field("format").is_err());
    }

    #[test]
    fn format_mismatch_fails_closed() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let b = audio(AudioFormat::S32Interleaved, vec![1; 8]);
        let result = compare(&a, &b, &[exclude("format").unwrap()]);
        let data = result.field("data").unwrap();
        assert_eq!(data.kind(), &ResultKind::Failing);
        assert!(data.excluded());
        assert!(result.is_equal(), "{}", result.message());
    }

    #[test]
    fn payload_difference_is_reported() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let mut bytes = vec![0u8; 8];
        bytes[2] = 1;
        let b = audio(AudioFormat::S16Interleaved, bytes);
        let result = compare(&a, &b, &[]);
        assert!(!result.is_equal());
        assert_eq!(result.failing_fields(), vec!["data"]);
        let data = result.field("data").unwrap();
        assert!(matches!(data.kind(), ResultKind::BinaryData { diff: Some(_) }));
        assert!(data.message().contains("first difference at sample 1"));
    }

    #[test]
    fn psnr_option_switches_data_comparison() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let result = compare(&a, &a, &[psnr("data").unwrap().ge(vec![30.0, 30.0])]);
        assert!(result.is_equal());
        assert!(matches!(
            result.field("data").unwrap().kind(),
            ResultKind::Psnr { values: Some(_) }
        ));
    }

    #[test]
    fn excluded_event_fields_exclude_length() {
        let a = event(json!({"path": "/a", "value": 1}));
        let b = event(json!({"path": "/a", "value": 1000}));
        let result = compare(&a, &b, &[]);
        assert!(!result.is_equal());
        assert!(result.failing_fields().contains(&"length"));

        let result = compare(&a, &b, &[exclude("event_data").unwrap()]);
        assert!(result.is_equal(), "{}", result.message());
        assert!(result.field("length").unwrap().excluded());
    }

    #[test]
    fn event_data_is_keyed() {
        let a = event(json!({"path": "/a", "value": 1}));
        let b = event(json!({"path": "/b", "value": 1}));
        let result = compare(&a, &b, &[exclude("event_data['path']").unwrap()]);
        assert!(result.is_equal(), "{}", result.message());
        let data = result.field("event_data").unwrap();
        assert!(data.get("path").unwrap().excluded());
    }

    #[test]
    fn timelabels_compare_per_label() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let mut b = a.clone();
        b.timelabels[0].count = 11;

        let result = compare(&a, &b, &[]);
        assert_eq!(result.failing_fields(), vec!["timelabels"]);
        let label = result.field("timelabels").unwrap().get(0usize).unwrap();
        assert_eq!(label.failing_keys(), vec![&ContainerKey::from("count")]);

        let result = compare(&a, &b, &[exclude("timelabels[0]['count']").unwrap()]);
        assert!(result.is_equal(), "{}", result.message());
    }

    #[test]
    fn extra_timelabels_are_b_only() {
        let a = audio(AudioFormat::S16Interleaved, vec![0; 8]);
        let mut b = a.clone();
        b.timelabels.push(TimeLabel::new("ltc", 0, Rational::new(25, 1)));

        let result = compare(&a, &b, &[]);
        let labels = result.field("timelabels").unwrap();
        assert!(!labels.is_equal());
        assert_eq!(labels.get(1usize).unwrap().kind(), &ResultKind::BOnly);
        assert!(compare(&a, &b, &[exclude("timelabels").unwrap()]).is_equal());

        let surplus_only = compare(&a, &b, &[exclude("timelabels[1]").unwrap()]);
        assert!(!surplus_only.is_equal());
        let result = compare(
            &a,
            &b,
            &[exclude("timelabels[1]").unwrap(), exclude("len(timelabels)").unwrap()],
        );
        assert!(result.is_equal(), "{}", result.message());
        let labels = result.field("timelabels").unwrap();
        assert!(labels.is_equal());
        assert!(labels.children()[0].excluded());
    }

    #[test]
    fn coded_video_unit_offsets() {
        let body = CodedVideoBody {
            format: VideoFormat::H264,
            coded_width: 1920,
            coded_height: 1088,
            origin_width: 1920,
            origin_height: 1080,
            is_key_frame: true,
            temporal_offset: 0,
            layout: VideoLayout::FullFrame,
            unit_offsets: Some(vec![0, 16, 64]),
        };
        let a = base(GrainBody::CodedVideo(body.clone())).with_data(vec![7u8; 80]);
        let mut b_body = body;
        b_body.unit_offsets = Some(vec![0, 16, 65]);
        let b = base(GrainBody::CodedVideo(b_body)).with_data(vec![7u8; 80]);

        let result = compare(&a, &b, &[]);
        assert_eq!(result.failing_fields(), vec!["unit_offsets"]);
        let offsets = result.field("unit_offsets").unwrap();
        assert_eq!(
            offsets.get(2usize).unwrap().kind(),
            &ResultKind::Difference {
                difference: crate::options::DiffValue::Integer(-1)
            }
        );
    }

    #[test]
    fn aac_mismatch_reports_frame_counts() {
        let frame = |fill: u8, size: usize| {
            let info = FrameInfo {
                frame_size: size,
                object_type: 2,
                sample_rate: 48_000,
                channel_count: 2,
            };
            let mut bytes = info.to_header().to_vec();
            bytes.resize(size, fill);
            bytes
        };
        let coded = |data: Vec<u8>| {
            base(GrainBody::CodedAudio(CodedAudioBody {
                format: AudioFormat::Aac,
                samples: 1024,
                channels: 2,
                sample_rate: 48_000,
                priming: 0,
                remainder: 0,
            }))
            .with_data(data)
        };
        let a = coded([frame(1, 20), frame(1, 20)].concat());
        let b = coded(frame(2, 40));
        let result = compare(&a, &b, &[exclude("length").unwrap()]);
        let data = result.field("data").unwrap();
        assert!(!data.is_equal());
        assert!(data.message().ends_with("ADTS frames: 2 in a, 1 in b"), "{}", data.message());
    }

    #[test]
    fn video_grains_decode_by_format() {
        let body = VideoBody::new(VideoFormat::S16_422_10BIT, 4, 2, VideoLayout::FullFrame);
        let size = body.planar_size();
        let a = base(GrainBody::Video(body.clone())).with_data(vec![0u8; size]);
        let mut bytes = vec![0u8; size];
        bytes[3] = 2;
        let b = base(GrainBody::Video(body)).with_data(bytes);
        let result = compare(&a, &b, &[]);
        assert!(result
            .field("data")
            .unwrap()
            .message()
            .contains("first difference at sample 1"));
    }
}
