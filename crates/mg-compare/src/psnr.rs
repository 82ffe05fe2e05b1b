//! Per-channel peak signal-to-noise ratio of raw audio and planar video
//! payloads.
//!
//! `PSNR_c = 10 * log10(peak^2 / MSE_c)`, positive infinity when channel
//! `c` is identical on both sides.

use mg_types::{
    AudioBody, AudioFormat, Grain, GrainBody, SampleLayout, SampleType, VideoBody, VideoComponent,
};

use crate::binary::WordSpec;
use crate::error::{CompareError, CompareResult};
use crate::result::{ComparisonNode, ResultKind, Site};

/// Compute the PSNR of each channel of `b` against `a`.
///
/// Audio channels are returned in channel order, video components in plane
/// order. Grain types or formats without a PSNR definition yield
/// [`CompareError::UnsupportedPsnr`]; payloads that do not fit their
/// metadata yield [`CompareError::PsnrInput`].
pub fn compute_psnr(a: &Grain, b: &Grain) -> CompareResult<Vec<f64>> {
    match (&a.body, &b.body) {
        (GrainBody::Audio(x), GrainBody::Audio(y)) => {
            if x.format != y.format {
                return Err(CompareError::UnsupportedPsnr(format!(
                    "audio formats differ: {:?} and {:?}",
                    x.format, y.format
                )));
            }
            if (x.channels, x.samples) != (y.channels, y.samples) {
                return Err(CompareError::PsnrInput(format!(
                    "audio shapes differ: {}x{} and {}x{}",
                    x.channels, x.samples, y.channels, y.samples
                )));
            }
            audio_psnr(x, &payload(a)?, &payload(b)?)
        }
        (GrainBody::Video(x), GrainBody::Video(y)) => {
            if x.format != y.format {
                return Err(CompareError::UnsupportedPsnr(format!(
                    "video formats differ: {:?} and {:?}",
                    x.format, y.format
                )));
            }
            if x.components != y.components {
                return Err(CompareError::PsnrInput("video plane geometry differs".into()));
            }
            video_psnr(x, &payload(a)?, &payload(b)?)
        }
        _ => Err(CompareError::UnsupportedPsnr(format!(
            "PSNR is not defined for {} and {} grains",
            a.grain_type(),
            b.grain_type()
        ))),
    }
}

fn payload(grain: &Grain) -> CompareResult<bytes::Bytes> {
    let data = grain
        .data
        .as_ref()
        .ok_or_else(|| CompareError::PsnrInput("grain has no payload".into()))?;
    data.materialize()
        .map_err(|e| CompareError::PsnrInput(e.to_string()))
}

fn audio_peak(sample_type: SampleType) -> f64 {
    match sample_type {
        SampleType::S16 => 32_768.0,
        SampleType::S24 => 8_388_608.0,
        SampleType::S32 => 2_147_483_648.0,
        SampleType::Float | SampleType::Double => 1.0,
    }
}

fn audio_psnr(body: &AudioBody, a: &[u8], b: &[u8]) -> CompareResult<Vec<f64>> {
    let (Some(sample_type), Some(layout)) = (body.format.sample_type(), body.format.layout())
    else {
        return Err(unsupported_audio(body.format));
    };
    let spec = WordSpec::for_audio(body.format);
    let channels = body.channels as usize;
    let samples = usize::try_from(body.samples)
        .map_err(|_| CompareError::PsnrInput(format!("{} samples per channel", body.samples)))?;
    let needed_bytes = channels
        .checked_mul(samples)
        .and_then(|n| n.checked_mul(spec.sample_size()))
        .ok_or_else(|| {
            CompareError::PsnrInput(format!(
                "{channels} channels of {samples} samples overflow the address space"
            ))
        })?;
    let decode = |data: &[u8]| -> CompareResult<Vec<f64>> {
        if data.len() < needed_bytes {
            return Err(CompareError::PsnrInput(format!(
                "payload holds {} bytes, {channels} channels of {samples} samples need {needed_bytes}",
                data.len(),
            )));
        }
        Ok(spec.decode(data).iter().map(|s| s.as_f64()).collect())
    };
    let (va, vb) = (decode(a)?, decode(b)?);
    let peak = audio_peak(sample_type);

    Ok((0..channels)
        .map(|c| {
            let index = |i: usize| match layout {
                SampleLayout::Interleaved => i * channels + c,
                SampleLayout::Planes => c * samples + i,
                SampleLayout::Pairs => {
                    let plane = c / 2;
                    let width = (channels - 2 * plane).min(2);
                    plane * 2 * samples + i * width + c % 2
                }
            };
            psnr((0..samples).map(|i| (va[index(i)], vb[index(i)])), peak)
        })
        .collect())
}

fn unsupported_audio(format: AudioFormat) -> CompareError {
    CompareError::UnsupportedPsnr(format!("PSNR is not defined for {format:?} audio"))
}

fn video_psnr(body: &VideoBody, a: &[u8], b: &[u8]) -> CompareResult<Vec<f64>> {
    if !body.format.is_planar() || body.components.is_empty() {
        return Err(CompareError::UnsupportedPsnr(format!(
            "PSNR is not defined for {:?} video",
            body.format
        )));
    }
    let spec = WordSpec::for_video(body.format);
    let peak = ((1u64 << body.format.bit_depth()) - 1) as f64;
    body.components
        .iter()
        .map(|component| {
            let va = plane_values(component, a, &spec)?;
            let vb = plane_values(component, b, &spec)?;
            Ok(psnr(va.into_iter().zip(vb), peak))
        })
        .collect()
}

fn plane_values(component: &VideoComponent, data: &[u8], spec: &WordSpec) -> CompareResult<Vec<f64>> {
    let outside = |row: usize| {
        CompareError::PsnrInput(format!(
            "plane row {row} lies outside the {}-byte payload",
            data.len()
        ))
    };
    let row_bytes = component
        .width
        .checked_mul(spec.sample_size())
        .ok_or_else(|| outside(0))?;
    let mut values = Vec::new();
    for row in 0..component.height {
        let bytes = row
            .checked_mul(component.stride)
            .and_then(|n| n.checked_add(component.offset))
            .and_then(|start| Some(start..start.checked_add(row_bytes)?))
            .and_then(|range| data.get(range))
            .ok_or_else(|| outside(row))?;
        values.extend(spec.decode(bytes).iter().map(|s| s.as_f64()));
    }
    Ok(values)
}

fn psnr(pairs: impl Iterator<Item = (f64, f64)>, peak: f64) -> f64 {
    let (sum, count) = pairs.fold((0.0f64, 0usize), |(sum, n), (x, y)| {
        let d = if x.to_bits() == y.to_bits() { 0.0 } else { x - y };
        (sum + d * d, n + 1)
    });
    if count == 0 || sum == 0.0 {
        return f64::INFINITY;
    }
    let mse = sum / count as f64;
    10.0 * (peak * peak / mse).log10()
}

/// Compare the payloads of two grains by PSNR against the threshold
/// options at this site.
pub(crate) fn psnr_node(site: Site<'_>, a: &Grain, b: &Grain) -> ComparisonNode {
    let label = format!("PSNR({}, {})", site.path("a"), site.path("b"));
    if site.excluded() {
        let msg = format!("{label} not computed, excluded");
        return site.node(ResultKind::Psnr { values: None }, false, msg, Vec::new());
    }
    let values = match compute_psnr(a, b) {
        Ok(values) => values,
        Err(e) => {
            let msg = format!("{label} could not be computed: {e}");
            return site.node(ResultKind::Psnr { values: None }, false, msg, Vec::new());
        }
    };
    let predicates: Vec<_> = site.options.psnr_predicates(&site.identifier).collect();
    let (equal, expectation) = if predicates.is_empty() {
        (values.iter().all(|v| v.is_infinite()), "all infinite".to_string())
    } else {
        let text: Vec<String> = predicates.iter().map(ToString::to_string).collect();
        (predicates.iter().all(|p| p.holds(&values)), text.join(" and "))
    };
    let msg = if equal {
        format!("{label} = {values:?}, as expected ({expectation})")
    } else {
        format!("{label} = {values:?}, expected {expectation}")
    };
    site.node(ResultKind::Psnr { values: Some(values) }, equal, msg, Vec::new())
}
