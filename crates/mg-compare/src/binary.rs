//! Format-aware payload diff.
//!
//! Payload bytes are decoded into samples according to a [`WordSpec`] and
//! the two sample sequences are diffed with the `similar` crate (Myers
//! algorithm). The result records the similarity ratio, the first point of
//! divergence and a bounded list of rendered edit operations.

use std::fmt;
use std::ops::Range;
use std::time::{Duration, Instant};

use mg_types::{AudioFormat, Payload, VideoFormat};
use similar::{Algorithm, DiffTag};
use tracing::{trace, warn};

use crate::error::{CompareError, CompareResult};
use crate::result::{ComparisonNode, ResultKind, Site};

/// Values shown per side in a rendered edit operation.
const MAX_RENDERED_VALUES: usize = 8;

// ---------------------------------------------------------------------------
// WordSpec
// ---------------------------------------------------------------------------

/// Byte order of the words in a payload buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    fn is_little(self) -> bool {
        match self {
            Self::Native => cfg!(target_endian = "little"),
            Self::Little => true,
            Self::Big => false,
        }
    }
}

/// How a single word is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordCode {
    Signed,
    Unsigned,
    Float,
}

/// How to decode a payload buffer into samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordSpec {
    word_size: usize,
    code: WordCode,
    byte_order: ByteOrder,
    words_per_sample: usize,
    force_signed: bool,
}

impl WordSpec {
    pub const U8: Self = Self::single(1, WordCode::Unsigned);
    pub const U16: Self = Self::single(2, WordCode::Unsigned);
    pub const U32: Self = Self::single(4, WordCode::Unsigned);
    pub const S16: Self = Self::single(2, WordCode::Signed);
    pub const S32: Self = Self::single(4, WordCode::Signed);
    pub const F32: Self = Self::single(4, WordCode::Float);
    pub const F64: Self = Self::single(8, WordCode::Float);
    /// Three unsigned bytes assembled into one signed 24-bit sample.
    pub const S24: Self = Self {
        word_size: 1,
        code: WordCode::Unsigned,
        byte_order: ByteOrder::Native,
        words_per_sample: 3,
        force_signed: true,
    };

    const fn single(word_size: usize, code: WordCode) -> Self {
        Self {
            word_size,
            code,
            byte_order: ByteOrder::Native,
            words_per_sample: 1,
            force_signed: false,
        }
    }

    /// A single-word spec. Integer words may be 1, 2, 4 or 8 bytes, float
    /// words 4 or 8.
    pub fn new(word_size: usize, code: WordCode) -> CompareResult<Self> {
        let valid = match code {
            WordCode::Float => matches!(word_size, 4 | 8),
            WordCode::Signed | WordCode::Unsigned => matches!(word_size, 1 | 2 | 4 | 8),
        };
        if !valid {
            return Err(CompareError::InvalidWordSpec(format!(
                "{word_size}-byte {code:?} words are not supported"
            )));
        }
        Ok(Self::single(word_size, code))
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Assemble `words_per_sample` integer words into each sample,
    /// optionally treating the assembled value as two's complement.
    pub fn grouped(mut self, words_per_sample: usize, force_signed: bool) -> CompareResult<Self> {
        if words_per_sample == 0
            || self.code == WordCode::Float
            || self.word_size * words_per_sample > 8
        {
            return Err(CompareError::InvalidWordSpec(format!(
                "cannot group {words_per_sample} {}-byte {:?} words",
                self.word_size, self.code
            )));
        }
        self.words_per_sample = words_per_sample;
        self.force_signed = force_signed;
        Ok(self)
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    /// Bytes consumed per decoded sample.
    pub fn sample_size(&self) -> usize {
        self.word_size * self.words_per_sample
    }

    /// The decode scheme for a raw or coded audio format.
    pub fn for_audio(format: AudioFormat) -> Self {
        use mg_types::SampleType;
        match format.sample_type() {
            Some(SampleType::S16) => Self::S16,
            Some(SampleType::S24) => Self::S24,
            Some(SampleType::S32) => Self::S32,
            Some(SampleType::Float) => Self::F32,
            Some(SampleType::Double) => Self::F64,
            None => Self::U8,
        }
    }

    /// The decode scheme for a video format.
    pub fn for_video(format: VideoFormat) -> Self {
        match format {
            VideoFormat::V210 => Self::U32,
            VideoFormat::V216 => Self::U16,
            f if f.is_compressed() || f.is_packed() => Self::U8,
            f => match f.bytes_per_value() {
                2 => Self::U16,
                4 => Self::U32,
                _ => Self::U8,
            },
        }
    }

    /// Decode `data` into samples.
    ///
    /// Bytes left over after the last whole sample are appended as
    /// individual unsigned values.
    pub fn decode(&self, data: &[u8]) -> Vec<Sample> {
        let size = self.sample_size();
        let mut chunks = data.chunks_exact(size);
        let mut samples: Vec<Sample> = chunks.by_ref().map(|c| self.decode_sample(c)).collect();
        samples.extend(chunks.remainder().iter().map(|&b| Sample::Int(i64::from(b))));
        samples
    }

    fn decode_sample(&self, chunk: &[u8]) -> Sample {
        if self.words_per_sample == 1 {
            return match self.code {
                WordCode::Float if self.word_size == 4 => {
                    Sample::F32(self.read_word(chunk) as u32)
                }
                WordCode::Float => Sample::F64(self.read_word(chunk)),
                WordCode::Signed => {
                    Sample::Int(sign_extend(self.read_word(chunk), 8 * self.word_size))
                }
                WordCode::Unsigned => Sample::Int(self.read_word(chunk) as i64),
            };
        }
        let mut words: Vec<u64> = chunk
            .chunks_exact(self.word_size)
            .map(|w| self.read_word(w))
            .collect();
        if self.byte_order.is_little() {
            words.reverse();
        }
        let bits = 8 * self.word_size;
        let value = words
            .into_iter()
            .fold(0u64, |acc, w| if bits == 64 { w } else { (acc << bits) | w });
        let total_bits = 8 * self.sample_size();
        if self.force_signed || self.code == WordCode::Signed {
            Sample::Int(sign_extend(value, total_bits))
        } else {
            Sample::Int(value as i64)
        }
    }

    fn read_word(&self, word: &[u8]) -> u64 {
        let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
        if self.byte_order.is_little() {
            word.iter().rev().fold(0, fold)
        } else {
            word.iter().fold(0, fold)
        }
    }
}

fn sign_extend(value: u64, bits: usize) -> i64 {
    if bits >= 64 {
        return value as i64;
    }
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One decoded payload sample.
///
/// Floats are held by bit pattern, so equality and ordering are bitwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sample {
    Int(i64),
    F32(u32),
    F64(u64),
}

impl Sample {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => v as f64,
            Self::F32(bits) => f64::from(f32::from_bits(bits)),
            Self::F64(bits) => f64::from_bits(bits),
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(v) => write!(f, "{v}"),
            Self::F32(bits) => write!(f, "{:?}", f32::from_bits(bits)),
            Self::F64(bits) => write!(f, "{:?}", f64::from_bits(bits)),
        }
    }
}

// ---------------------------------------------------------------------------
// BinaryDiff
// ---------------------------------------------------------------------------

/// Where two sample sequences first diverge.
#[derive(Clone, Debug, PartialEq)]
pub enum FirstDifference {
    /// Both sides have a sample at `index` and they differ.
    Values { index: usize, a: Sample, b: Sample },
    /// `a` has `count` extra samples from `index`, starting with `first`.
    ExtraInA { index: usize, count: usize, first: Sample },
    /// `b` has `count` extra samples from `index`, starting with `first`.
    ExtraInB { index: usize, count: usize, first: Sample },
}

impl fmt::Display for FirstDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values { index, a, b } => {
                write!(f, "first difference at sample {index}: {a} != {b}")
            }
            Self::ExtraInA { index, count, first } => {
                write!(f, "a has {count} extra samples from {index}, starting with {first}")
            }
            Self::ExtraInB { index, count, first } => {
                write!(f, "b has {count} extra samples from {index}, starting with {first}")
            }
        }
    }
}

/// One edit operation between the two sample sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOp {
    pub tag: DiffTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// The diff of two decoded payloads.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryDiff {
    /// Similarity in `[0, 1]`; `1.0` for identical sequences.
    pub ratio: f32,
    pub a_len: usize,
    pub b_len: usize,
    pub first_difference: Option<FirstDifference>,
    pub ops: Vec<EditOp>,
    rendered: Vec<String>,
}

impl BinaryDiff {
    /// Diff two sample sequences, giving up on an optimal edit script once
    /// `deadline` passes.
    pub fn compute(
        a: &[Sample],
        b: &[Sample],
        deadline: Option<Duration>,
        max_rendered_ops: usize,
    ) -> Self {
        if a == b {
            return Self {
                ratio: 1.0,
                a_len: a.len(),
                b_len: b.len(),
                first_difference: None,
                ops: Vec::new(),
                rendered: Vec::new(),
            };
        }

        let until = deadline.map(|d| Instant::now() + d);
        let diff_ops = similar::capture_diff_slices_deadline(Algorithm::Myers, a, b, until);
        if until.is_some_and(|t| Instant::now() > t) {
            warn!(a = a.len(), b = b.len(), "payload diff deadline expired, edit script is approximate");
        }
        let ratio = similar::get_diff_ratio(&diff_ops, a.len(), b.len());
        let ops: Vec<EditOp> = diff_ops
            .iter()
            .map(|op| {
                let (tag, a, b) = op.as_tag_tuple();
                EditOp { tag, a, b }
            })
            .collect();
        trace!(ops = ops.len(), ratio, "diffed payload samples");

        let first_difference = ops
            .iter()
            .find(|op| op.tag != DiffTag::Equal)
            .and_then(|op| first_difference(a, b, op.a.start, op.b.start));

        let mut rendered: Vec<String> = ops
            .iter()
            .take(max_rendered_ops)
            .map(|op| render_op(op, a, b))
            .collect();
        if ops.len() > max_rendered_ops {
            rendered.push("etc ...".into());
        }

        Self {
            ratio,
            a_len: a.len(),
            b_len: b.len(),
            first_difference,
            ops,
            rendered,
        }
    }

    /// `true` when the sequences are identical.
    pub fn is_equal(&self) -> bool {
        self.first_difference.is_none()
    }

    /// Rendered edit operations, at most the configured number plus an
    /// `etc ...` marker.
    pub fn op_lines(&self) -> &[String] {
        &self.rendered
    }
}

fn first_difference(a: &[Sample], b: &[Sample], i: usize, j: usize) -> Option<FirstDifference> {
    match (a.get(i), b.get(j)) {
        (Some(&x), Some(&y)) => Some(FirstDifference::Values { index: i, a: x, b: y }),
        (Some(&x), None) => Some(FirstDifference::ExtraInA {
            index: i,
            count: a.len() - i,
            first: x,
        }),
        (None, Some(&y)) => Some(FirstDifference::ExtraInB {
            index: j,
            count: b.len() - j,
            first: y,
        }),
        (None, None) => None,
    }
}

fn render_op(op: &EditOp, a: &[Sample], b: &[Sample]) -> String {
    let tag = match op.tag {
        DiffTag::Equal => "equal",
        DiffTag::Delete => "delete",
        DiffTag::Insert => "insert",
        DiffTag::Replace => "replace",
    };
    format!(
        "{tag} a[{}:{}] --> b[{}:{}]: {} --> {}",
        op.a.start,
        op.a.end,
        op.b.start,
        op.b.end,
        render_values(&a[op.a.clone()]),
        render_values(&b[op.b.clone()]),
    )
}

fn render_values(values: &[Sample]) -> String {
    let shown: Vec<String> = values
        .iter()
        .take(MAX_RENDERED_VALUES)
        .map(ToString::to_string)
        .collect();
    if values.len() > MAX_RENDERED_VALUES {
        format!("[{}, ...]", shown.join(", "))
    } else {
        format!("[{}]", shown.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Extra context appended to a failing binary node's message.
pub(crate) type Annotate = fn(&[u8], &[u8]) -> Option<String>;

/// Compare two optional payloads decoded with `spec`.
pub(crate) fn binary_node(
    site: Site<'_>,
    a: Option<&Payload>,
    b: Option<&Payload>,
    spec: &WordSpec,
    annotate: Option<Annotate>,
) -> ComparisonNode {
    let (pa, pb) = (site.path("a"), site.path("b"));
    let no_diff = || ResultKind::BinaryData { diff: None };
    if site.excluded() {
        return site.node(no_diff(), false, format!("{pa}, {pb}: payload comparison skipped, excluded"), Vec::new());
    }
    let (a, b) = match (a, b) {
        (None, None) => {
            return site.node(no_diff(), true, format!("{pa} and {pb} both have no payload"), Vec::new());
        }
        (Some(_), None) => {
            return site.node(no_diff(), false, format!("{pb} has no payload, {pa} does"), Vec::new());
        }
        (None, Some(_)) => {
            return site.node(no_diff(), false, format!("{pa} has no payload, {pb} does"), Vec::new());
        }
        (Some(a), Some(b)) => (a, b),
    };
    let loaded = a.materialize().and_then(|x| Ok((x, b.materialize()?)));
    let (bytes_a, bytes_b) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            return site.node(no_diff(), false, format!("{pa}, {pb}: {e}"), Vec::new());
        }
    };

    let samples_a = spec.decode(&bytes_a);
    let samples_b = spec.decode(&bytes_b);
    let diff = BinaryDiff::compute(
        &samples_a,
        &samples_b,
        site.settings.deadline,
        site.settings.max_rendered_ops,
    );
    let equal = diff.is_equal();
    let mut msg = match &diff.first_difference {
        None => format!("{pa} == {pb}: {} samples match", diff.a_len),
        Some(first) => format!("{pa} != {pb}: {first} (similarity {:.3})", diff.ratio),
    };
    if !equal {
        if let Some(note) = annotate.and_then(|f| f(&bytes_a, &bytes_b)) {
            msg = format!("{msg}, {note}");
        }
    }
    site.node(ResultKind::BinaryData { diff: Some(diff) }, equal, msg, Vec::new())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::options::{exclude, OptionSet};
    use crate::result::DiffSettings;

    fn ints(samples: &[Sample]) -> Vec<i64> {
        samples
            .iter()
            .map(|s| match s {
                Sample::Int(v) => *v,
                other => panic!("expected an integer sample, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn word_spec_rejects_unsupported_sizes() {
        assert!(WordSpec::new(3, WordCode::Signed).is_err());
        assert!(WordSpec::new(2, WordCode::Float).is_err());
        assert_eq!(WordSpec::new(2, WordCode::Signed).unwrap(), WordSpec::S16);
        assert!(WordSpec::U8.grouped(9, false).is_err());
        assert!(WordSpec::F32.grouped(2, false).is_err());
    }

    #[test]
    fn format_word_selection() {
        assert_eq!(WordSpec::for_audio(AudioFormat::S16Interleaved), WordSpec::S16);
        assert_eq!(WordSpec::for_audio(AudioFormat::S24Planes), WordSpec::S24);
        assert_eq!(WordSpec::for_audio(AudioFormat::DoublePairs), WordSpec::F64);
        assert_eq!(WordSpec::for_audio(AudioFormat::Aac), WordSpec::U8);
        assert_eq!(WordSpec::for_video(VideoFormat::V210), WordSpec::U32);
        assert_eq!(WordSpec::for_video(VideoFormat::V216), WordSpec::U16);
        assert_eq!(WordSpec::for_video(VideoFormat::Uyvy), WordSpec::U8);
        assert_eq!(WordSpec::for_video(VideoFormat::H264), WordSpec::U8);
        assert_eq!(WordSpec::for_video(VideoFormat::S16_420_10BIT), WordSpec::U16);
        assert_eq!(WordSpec::for_video(VideoFormat::S32_444), WordSpec::U32);
        assert_eq!(WordSpec::for_video(VideoFormat::U8_422), WordSpec::U8);
    }

    #[test]
    fn s24_assembles_and_sign_corrects() {
        let little = WordSpec::S24.with_byte_order(ByteOrder::Little);
        let data = [0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x80, 0x56, 0x34, 0x12];
        assert_eq!(ints(&little.decode(&data)), vec![-1, -8_388_607, 0x123456]);
        let big = WordSpec::S24.with_byte_order(ByteOrder::Big);
        assert_eq!(ints(&big.decode(&[0x12, 0x34, 0x56])), vec![0x123456]);
    }

    #[test]
    fn trailing_bytes_are_kept() {
        let spec = WordSpec::S16.with_byte_order(ByteOrder::Little);
        assert_eq!(ints(&spec.decode(&[0x01, 0x00, 0x07])), vec![1, 7]);
    }

    #[test]
    fn floats_compare_bitwise() {
        let spec = WordSpec::F32.with_byte_order(ByteOrder::Little);
        let pos = spec.decode(&0.0f32.to_le_bytes());
        let neg = spec.decode(&(-0.0f32).to_le_bytes());
        assert_ne!(pos, neg);
        let nan = spec.decode(&f32::NAN.to_le_bytes());
        assert_eq!(nan, nan.clone());
    }

    #[test]
    fn identical_sequences_have_unit_ratio() {
        let samples: Vec<Sample> = (0..10).map(Sample::Int).collect();
        let diff = BinaryDiff::compute(&samples, &samples, None, 5);
        assert!(diff.is_equal());
        assert_eq!(diff.ratio, 1.0);
        assert!(diff.op_lines().is_empty());
    }

    #[test]
    fn first_difference_reports_values() {
        let a: Vec<Sample> = [1, 2, 3, 4, 5].into_iter().map(Sample::Int).collect();
        let b: Vec<Sample> = [1, 2, 9, 4, 5].into_iter().map(Sample::Int).collect();
        let diff = BinaryDiff::compute(&a, &b, None, 5);
        assert!(!diff.is_equal());
        assert!(diff.ratio < 1.0);
        assert_eq!(
            diff.first_difference,
            Some(FirstDifference::Values {
                index: 2,
                a: Sample::Int(3),
                b: Sample::Int(9)
            })
        );
        assert!(diff.op_lines().iter().any(|l| l.starts_with("replace a[2:3] --> b[2:3]: [3] --> [9]")));
    }

    #[test]
    fn first_difference_reports_extra_tail() {
        let a: Vec<Sample> = [1, 2, 3, 4].into_iter().map(Sample::Int).collect();
        let b: Vec<Sample> = [1, 2].into_iter().map(Sample::Int).collect();
        let diff = BinaryDiff::compute(&a, &b, None, 5);
        assert_eq!(
            diff.first_difference,
            Some(FirstDifference::ExtraInA {
                index: 2,
                count: 2,
                first: Sample::Int(3)
            })
        );
    }

    #[test]
    fn rendering_is_bounded() {
        let a: Vec<Sample> = (0..40).map(Sample::Int).collect();
        let b: Vec<Sample> = (0..40).map(|n| Sample::Int(if n % 4 == 0 { -n } else { n })).collect();
        let diff = BinaryDiff::compute(&a, &b, None, 5);
        assert!(diff.ops.len() > 5);
        assert_eq!(diff.op_lines().len(), 6);
        assert_eq!(diff.op_lines()[5], "etc ...");
    }

    #[test]
    fn node_handles_missing_and_excluded_payloads() {
        let settings = DiffSettings::default();
        let none = OptionSet::default();
        let site = || Site::root(&none, &settings).field("data");
        let payload = Payload::loaded(vec![1u8, 2, 3]);

        assert!(binary_node(site(), None, None, &WordSpec::U8, None).is_equal());
        let one_sided = binary_node(site(), Some(&payload), None, &WordSpec::U8, None);
        assert!(!one_sided.is_equal());
        assert!(one_sided.message().contains("no payload"));

        let excluded = OptionSet::new([exclude("data").unwrap()]);
        let node = binary_node(
            Site::root(&excluded, &settings).field("data"),
            Some(&payload),
            Some(&payload),
            &WordSpec::U8,
            None,
        );
        assert!(!node.is_equal());
        assert!(node.excluded());
        assert_eq!(node.kind(), &ResultKind::BinaryData { diff: None });
    }

    #[test]
    fn node_renders_edit_ops() {
        let settings = DiffSettings::default();
        let none = OptionSet::default();
        let a = Payload::loaded(vec![1u8, 2, 3]);
        let b = Payload::loaded(vec![1u8, 5, 3]);
        let node = binary_node(
            Site::root(&none, &settings).field("data"),
            Some(&a),
            Some(&b),
            &WordSpec::U8,
            None,
        );
        assert!(!node.is_equal());
        assert!(node.message().contains("first difference at sample 1: 2 != 5"));
        let text = node.to_string();
        assert!(text.starts_with("✗ a.data != b.data"));
        assert!(text.contains("replace a[1:2] --> b[1:2]: [2] --> [5]"));
    }

    fn spec_strategy() -> impl Strategy<Value = (WordSpec, usize, bool)> {
        let orders = prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)];
        let specs = prop_oneof![
            Just((WordSpec::U8, 8, false)),
            Just((WordSpec::U16, 16, false)),
            Just((WordSpec::U32, 32, false)),
            Just((WordSpec::S16, 16, true)),
            Just((WordSpec::S32, 32, true)),
            Just((WordSpec::S24, 24, true)),
        ];
        (specs, orders)
            .prop_map(|((spec, bits, signed), order)| (spec.with_byte_order(order), bits, signed))
    }

    fn encode(value: i64, bytes: usize, little: bool) -> Vec<u8> {
        let raw = (value as u64).to_be_bytes();
        let mut out = raw[8 - bytes..].to_vec();
        if little {
            out.reverse();
        }
        out
    }

    proptest! {
        #[test]
        fn decode_reproduces_encoded_integers(
            (spec, bits, signed) in spec_strategy(),
            raw in proptest::collection::vec(any::<i64>(), 0..64),
        ) {
            let values: Vec<i64> = raw
                .iter()
                .map(|v| {
                    let masked = (*v as u64) & ((1u64 << bits) - 1);
                    if signed { sign_extend(masked, bits) } else { masked as i64 }
                })
                .collect();
            let little = spec.byte_order.is_little();
            let bytes: Vec<u8> = values
                .iter()
                .flat_map(|v| encode(*v, bits / 8, little))
                .collect();
            prop_assert_eq!(ints(&spec.decode(&bytes)), values);
        }

        #[test]
        fn decode_reproduces_float_bit_patterns(
            little in any::<bool>(),
            singles in proptest::collection::vec(any::<u32>(), 0..32),
            doubles in proptest::collection::vec(any::<u64>(), 0..32),
        ) {
            let order = if little { ByteOrder::Little } else { ByteOrder::Big };
            let to_bytes32 = |b: &u32| if little { b.to_le_bytes() } else { b.to_be_bytes() };
            let to_bytes64 = |b: &u64| if little { b.to_le_bytes() } else { b.to_be_bytes() };

            let bytes: Vec<u8> = singles.iter().flat_map(to_bytes32).collect();
            let decoded = WordSpec::F32.with_byte_order(order).decode(&bytes);
            prop_assert_eq!(decoded, singles.iter().map(|&b| Sample::F32(b)).collect::<Vec<_>>());

            let bytes: Vec<u8> = doubles.iter().flat_map(to_bytes64).collect();
            let decoded = WordSpec::F64.with_byte_order(order).decode(&bytes);
            prop_assert_eq!(decoded, doubles.iter().map(|&b| Sample::F64(b)).collect::<Vec<_>>());
        }
    }
}
