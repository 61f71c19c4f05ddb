//! Configuration resolver.
//!
//! [`resolve`] validates a mode against the source and LUT formats and
//! freezes everything the per-frame path needs into a [`ResolvedConfig`]:
//! which `(clip, plane)` feeds which compositor slot of which destination
//! plane, the output format, the write routine and the in-place
//! candidates. It never touches pixels.
//!
//! # Validation order
//!
//! 1. one to three sources
//! 2. equal source bit depths, at most 16 bits
//! 3. LUT is a single unsubsampled row
//! 4. LUT width is exactly `(2^bits)^d` for some `d` in 1..=3
//! 5. mode checks: LUT dimensionality, LUT plane count, source count,
//!    equal resolutions, packed layouts, subsampling
//! 6. output format derivation
//!
//! The first failing check wins.
//!
//! # Output format
//!
//! The output has the first source's dimensions and the LUT's bit depth.
//! Its color family is the LUT's, except when subsampled sources are mapped
//! plane by plane through a YUV LUT: then the output keeps the sources'
//! subsampling, or derives it from the clip sizes when three single-plane
//! clips are combined (mode 1 with three clips).

use crate::mapper::{self, MapFn, RoutineKind};
use crate::{ApplyError, ApplyOptions, ApplyResult, Mode};
use lutmap_core::{BitDepth, ColorFamily, FrameFormat, PixelType, SampleWidth, Subsampling};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// One compositor input: plane `plane` of source clip `clip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Source clip index.
    pub clip: usize,
    /// Plane within that clip.
    pub plane: usize,
}

impl Slot {
    const fn new(clip: usize, plane: usize) -> Self {
        Self { clip, plane }
    }
}

/// Plan for one destination plane (or the single packed buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneMap {
    /// Destination plane index.
    pub plane: usize,
    /// LUT plane read for this destination plane.
    pub lut_channel: usize,
    /// Width in pixels.
    pub width: u32,
    /// Height in rows.
    pub height: u32,
    /// Compositor inputs, least significant first.
    pub slots: Vec<Slot>,
}

/// Write routine chosen at resolve time.
#[derive(Clone, Copy)]
pub struct Routine {
    kind: RoutineKind,
    source: SampleWidth,
    dest: SampleWidth,
    func: MapFn,
}

impl Routine {
    /// Routine family.
    pub fn kind(&self) -> RoutineKind {
        self.kind
    }

    /// Source sample storage.
    pub fn source_width(&self) -> SampleWidth {
        self.source
    }

    /// Destination sample storage.
    pub fn dest_width(&self) -> SampleWidth {
        self.dest
    }

    pub(crate) fn func(&self) -> MapFn {
        self.func
    }
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routine")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("dest", &self.dest)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{}, {}>", self.kind, self.source, self.dest)
    }
}

/// Frozen plan produced by [`resolve`].
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    mode: Mode,
    num_clips: usize,
    source_planes: usize,
    source_depth: BitDepth,
    lut_dimensions: u32,
    output: FrameFormat,
    planes: Vec<PlaneMap>,
    routine: Routine,
    in_place_candidates: Vec<usize>,
}

impl ResolvedConfig {
    /// Requested mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Samples combined per index.
    pub fn arity(&self) -> usize {
        self.mode.arity()
    }

    /// Number of source clips.
    pub fn num_clips(&self) -> usize {
        self.num_clips
    }

    /// Planes used from each source clip.
    pub fn source_planes(&self) -> usize {
        self.source_planes
    }

    /// Shared source bit depth.
    pub fn source_depth(&self) -> BitDepth {
        self.source_depth
    }

    /// LUT dimensionality derived from its width.
    pub fn lut_dimensions(&self) -> u32 {
        self.lut_dimensions
    }

    /// Output frame format.
    pub fn output(&self) -> &FrameFormat {
        &self.output
    }

    /// Mapped destination planes. A fourth (alpha) plane is never mapped.
    pub fn planes(&self) -> &[PlaneMap] {
        &self.planes
    }

    /// Selected write routine.
    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    /// Source clips that may be overwritten in place, in preference order.
    pub fn in_place_candidates(&self) -> &[usize] {
        &self.in_place_candidates
    }
}

impl std::fmt::Display for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {} clip(s) x {} plane(s) at {}, {}D LUT",
            self.mode, self.num_clips, self.source_planes, self.source_depth, self.lut_dimensions
        )?;
        writeln!(f, "output:  {}", self.output)?;
        writeln!(f, "routine: {}", self.routine)?;
        for pm in &self.planes {
            let slots: Vec<String> = pm
                .slots
                .iter()
                .map(|s| format!("clip{}.p{}", s.clip, s.plane))
                .collect();
            writeln!(
                f,
                "  plane {} ({}x{}) <- lut[{}][{}]",
                pm.plane,
                pm.width,
                pm.height,
                pm.lut_channel,
                slots.join(" + ")
            )?;
        }
        match self.in_place_candidates.as_slice() {
            [] => write!(f, "in-place: no"),
            c => write!(f, "in-place: clips {c:?}"),
        }
    }
}

// ============================================================================
// Source conditions
// ============================================================================

struct Sources<'a> {
    formats: &'a [FrameFormat],
    mode: Mode,
}

impl Sources<'_> {
    fn count(&self) -> usize {
        self.formats.len()
    }

    fn first(&self) -> &FrameFormat {
        &self.formats[0]
    }

    fn same_resolution(&self) -> bool {
        let dims = self.first().dimensions();
        self.formats.iter().all(|f| f.dimensions() == dims)
    }

    fn any_subsampled(&self) -> bool {
        self.formats.iter().any(|f| f.pixel_type().subsampling().is_subsampled())
    }

    fn any_packed(&self) -> bool {
        self.formats.iter().any(|f| f.family().is_packed())
    }

    fn require_count(&self) -> ApplyResult<()> {
        let allowed = self.mode.source_counts();
        if allowed.contains(&self.count()) {
            return Ok(());
        }
        let expected = match allowed {
            [n] => format!("exactly {n}"),
            _ => "either 1 or 3".to_string(),
        };
        Err(ApplyError::config(format!(
            "{} needs {expected} source clip(s), got {}",
            self.mode,
            self.count()
        )))
    }

    fn require_same_resolution(&self) -> ApplyResult<()> {
        if self.same_resolution() {
            return Ok(());
        }
        Err(ApplyError::mismatch(format!(
            "{} requires all source clips to have the same resolution",
            self.mode
        )))
    }

    fn require_planar(&self) -> ApplyResult<()> {
        if self.any_packed() {
            return Err(ApplyError::colorspace(format!(
                "{} doesn't support source clips with a packed format",
                self.mode
            )));
        }
        Ok(())
    }
}

fn lut_dimensions(bits: u32, width: u32) -> Option<u32> {
    (1..=3u32).find(|&d| (u64::from(width)) == 1u64 << (bits * d))
}

// ============================================================================
// Resolver
// ============================================================================

/// Validates a mode against the given formats and plans the mapping.
///
/// `sources` are the formats of the 1..=3 source clips in order; `lut` is
/// the format of the LUT frame.
///
/// # Errors
///
/// - [`ApplyError::Configuration`] for unsupported mode, dimensionality,
///   bit depth or plane-count combinations
/// - [`ApplyError::FormatMismatch`] for disagreeing bit depths or
///   resolutions, and for underivable output subsampling
/// - [`ApplyError::UnsupportedColorspace`] for packed layouts the mode
///   cannot read or write
///
/// # Example
///
/// ```rust
/// use lutmap_core::FrameFormat;
/// use lutmap_ops::{resolve, ApplyOptions, Mode};
///
/// let src: FrameFormat = "y8:1440x1080".parse().unwrap();
/// let lut: FrameFormat = "rgbp10:65536".parse().unwrap();
/// let cfg = resolve(Mode::Map2D, &[src, src], &lut, &ApplyOptions::default()).unwrap();
/// assert_eq!(cfg.output().to_string(), "rgbp10:1440x1080");
/// assert_eq!(cfg.planes().len(), 3);
/// ```
pub fn resolve(
    mode: Mode,
    sources: &[FrameFormat],
    lut: &FrameFormat,
    options: &ApplyOptions,
) -> ApplyResult<ResolvedConfig> {
    if !(1..=3).contains(&sources.len()) {
        return Err(ApplyError::config(format!(
            "from 1 to 3 source clips must be provided, got {}",
            sources.len()
        )));
    }
    let src = Sources { formats: sources, mode };

    let source_depth = src.first().bit_depth();
    if let Some(other) = sources.iter().find(|f| f.bit_depth() != source_depth) {
        return Err(ApplyError::mismatch(format!(
            "all source clips must have the same bit depth ({source_depth} vs {})",
            other.bit_depth()
        )));
    }
    let bits = source_depth.bits();
    if bits > 16 {
        return Err(ApplyError::config(format!(
            "source clips must have a bit depth of 8, 10, 12, 14 or 16, got {bits}"
        )));
    }

    if lut.pixel_type().subsampling().is_subsampled() {
        return Err(ApplyError::config("the LUT clip can not be subsampled"));
    }
    if lut.height() != 1 {
        return Err(ApplyError::config(format!(
            "the LUT clip must be a single row, got a height of {}",
            lut.height()
        )));
    }
    let base = 1u64 << bits;
    let dims = lut_dimensions(bits, lut.width()).ok_or_else(|| {
        ApplyError::config(format!(
            "the LUT clip was expected to have a width of {base}, {} or {} pixels \
             for a source bit depth of {bits}, got {}",
            base * base,
            base * base * base,
            lut.width()
        ))
    })?;

    let lut_family = lut.family();
    let lut_planes = lut_family.channels();
    // planes actually used from each clip; packed sources count as one
    let mut planes_used = sources.iter().map(|f| f.plane_count()).min().unwrap_or(1).min(3);

    if dims != mode.lut_dimensions() {
        return Err(ApplyError::config(format!(
            "{mode} requires a {}D LUT clip, but got a {dims}D one instead",
            mode.lut_dimensions()
        )));
    }
    if mode.is_expanding() && lut_planes < 3 {
        return Err(ApplyError::colorspace(format!(
            "in {mode}, the LUT clip cannot have only 1 plane (Y)"
        )));
    }
    src.require_count()?;

    let c = src.count();
    let output_type = match mode {
        Mode::Map1D => {
            src.require_planar()?;
            require_planar_lut(mode, lut_family)?;
            if lut_planes == 1 {
                if c != 1 {
                    return Err(ApplyError::config(format!(
                        "in {mode}, when the LUT clip is Y, there can only be 1 source clip, got {c}"
                    )));
                }
                planes_used = 1;
                lut.pixel_type()
            } else {
                if c == 3 {
                    // each clip stands in for one plane
                    planes_used = 1;
                }
                derive_output(&src, planes_used, lut)?
            }
        }
        Mode::Expand1D => {
            src.require_planar()?;
            if lut_family.is_yuv() {
                return Err(ApplyError::colorspace(format!(
                    "{mode} doesn't support YUV destination formats"
                )));
            }
            planes_used = 1;
            lut.pixel_type()
        }
        Mode::Map2D => {
            src.require_same_resolution()?;
            src.require_planar()?;
            require_planar_lut(mode, lut_family)?;
            if lut_planes == 1 {
                planes_used = 1;
                lut.pixel_type()
            } else {
                derive_output(&src, planes_used, lut)?
            }
        }
        Mode::Expand2D => {
            src.require_same_resolution()?;
            src.require_planar()?;
            require_planar_lut(mode, lut_family)?;
            planes_used = 1;
            lut.pixel_type()
        }
        Mode::Map3D => {
            if c == 1 && src.any_subsampled() {
                return Err(ApplyError::config(format!(
                    "in {mode}, when there is only one source clip, it cannot be subsampled"
                )));
            }
            src.require_same_resolution()?;
            src.require_planar()?;
            require_planar_lut(mode, lut_family)?;
            if c == 1 && planes_used < 3 {
                return Err(ApplyError::config(format!(
                    "in {mode}, when there is only one source clip, it needs 3 planes, got {planes_used}"
                )));
            }
            if lut_planes == 1 {
                if c == 3 {
                    planes_used = 1;
                }
                lut.pixel_type()
            } else if c == 1 || planes_used == 1 {
                lut.pixel_type()
            } else {
                derive_output(&src, planes_used, lut)?
            }
        }
        Mode::Expand3D => {
            src.require_same_resolution()?;
            src.require_planar()?;
            require_planar_lut(mode, lut_family)?;
            if c == 1 {
                if planes_used < 3 {
                    return Err(ApplyError::config(format!(
                        "in {mode}, when there is only one source clip, it cannot have only one plane (Y)"
                    )));
                }
                if src.any_subsampled() {
                    return Err(ApplyError::config(format!(
                        "in {mode}, when there is only one source clip, it cannot be subsampled"
                    )));
                }
            } else {
                planes_used = 1;
            }
            lut.pixel_type()
        }
    };

    let (w, h) = src.first().dimensions();
    let output = FrameFormat::new(output_type, w, h)?;

    let kind = if output.family().is_packed() {
        RoutineKind::Packed
    } else if mode.is_expanding() {
        RoutineKind::Shared
    } else {
        RoutineKind::PerPlane
    };
    let planes = plan_planes(mode, kind, c, planes_used, &output);
    check_geometry(sources, &planes)?;

    let source_width = source_depth.storage();
    let dest_width = output.bit_depth().storage();
    let func = mapper::select(kind, source_width, dest_width).ok_or_else(|| {
        ApplyError::config(format!(
            "no write routine for {source_width} sources into {dest_width} destinations"
        ))
    })?;
    let routine = Routine {
        kind,
        source: source_width,
        dest: dest_width,
        func,
    };

    let in_place_candidates = if options.in_place && kind == RoutineKind::PerPlane {
        (0..c)
            .filter(|&clip| sources[clip] == output)
            .filter(|&clip| {
                planes
                    .iter()
                    .all(|pm| pm.slots.iter().all(|s| s.clip != clip || s.plane == pm.plane))
            })
            .collect()
    } else {
        Vec::new()
    };

    let config = ResolvedConfig {
        mode,
        num_clips: c,
        source_planes: planes_used,
        source_depth,
        lut_dimensions: dims,
        output,
        planes,
        routine,
        in_place_candidates,
    };
    debug!(
        mode = mode.number(),
        clips = c,
        output = %config.output,
        routine = %config.routine,
        in_place = ?config.in_place_candidates,
        "resolved LUT configuration"
    );
    Ok(config)
}

fn require_planar_lut(mode: Mode, family: ColorFamily) -> ApplyResult<()> {
    if family.is_packed() {
        return Err(ApplyError::colorspace(format!(
            "{mode} doesn't support a packed destination format"
        )));
    }
    Ok(())
}

/// Output pixel type for a multi-plane LUT applied plane by plane.
fn derive_output(src: &Sources<'_>, planes_used: usize, lut: &FrameFormat) -> ApplyResult<PixelType> {
    let lut_type = lut.pixel_type();
    let depth = lut.bit_depth();
    let yuv_family = if lut.family().has_alpha() {
        ColorFamily::Yuva
    } else {
        ColorFamily::Yuv
    };

    if src.count() == 3 && planes_used == 1 {
        if src.same_resolution() {
            return Ok(lut_type);
        }
        if lut.family().is_rgb() {
            return Err(ApplyError::mismatch(
                "the LUT clip is RGB, so all source clips must have the same resolution",
            ));
        }
        let (u, v) = (&src.formats[1], &src.formats[2]);
        if u.dimensions() != v.dimensions() {
            return Err(ApplyError::mismatch(
                "the 2nd and 3rd source clips, which will be taken as U and V planes, \
                 must have the same resolution",
            ));
        }
        let sub = Subsampling::from_sizes(src.first().dimensions(), u.dimensions()).map_err(|_| {
            ApplyError::mismatch(format!(
                "could not produce a subsampled color format from {}x{} luma and {}x{} chroma clips",
                src.first().width(),
                src.first().height(),
                u.width(),
                u.height()
            ))
        })?;
        return Ok(PixelType::new(yuv_family, depth, sub)?);
    }

    // every clip must share the first clip's plane geometry
    let first = src.first();
    for f in &src.formats[1..] {
        for p in 0..planes_used {
            if f.plane_width(p) != first.plane_width(p) || f.plane_height(p) != first.plane_height(p) {
                return Err(ApplyError::mismatch(
                    "in order to produce a subsampled output, all source clips must have the same subsampling ratio",
                ));
            }
        }
    }

    let sub = first.pixel_type().subsampling();
    if planes_used == 1 || !sub.is_subsampled() {
        return Ok(lut_type);
    }
    if lut.family().is_rgb() {
        return Err(ApplyError::mismatch(
            "can't use all the planes of a subsampled YUV source when the LUT clip is RGB",
        ));
    }
    Ok(PixelType::new(yuv_family, depth, sub)?)
}

fn plan_planes(mode: Mode, kind: RoutineKind, clips: usize, planes_used: usize, output: &FrameFormat) -> Vec<PlaneMap> {
    if kind == RoutineKind::Packed {
        return vec![PlaneMap {
            plane: 0,
            lut_channel: 0,
            width: output.width(),
            height: output.height(),
            slots: vec![Slot::new(0, 0)],
        }];
    }

    let mapped = output.plane_count().min(3);
    (0..mapped)
        .map(|p| {
            // single-plane sources feed every destination plane from plane 0
            let pp = if planes_used == 1 { 0 } else { p };
            let slots = match (mode, clips) {
                (Mode::Map1D, 3) => vec![Slot::new(p, 0)],
                (Mode::Map1D, _) => vec![Slot::new(0, pp)],
                (Mode::Map2D, _) => vec![Slot::new(0, pp), Slot::new(1, pp)],
                (Mode::Map3D, 1) | (Mode::Expand3D, 1) => {
                    vec![Slot::new(0, 0), Slot::new(0, 1), Slot::new(0, 2)]
                }
                (Mode::Map3D, _) => vec![Slot::new(0, pp), Slot::new(1, pp), Slot::new(2, pp)],
                (Mode::Expand1D, _) => vec![Slot::new(0, 0)],
                (Mode::Expand2D, _) => vec![Slot::new(0, 0), Slot::new(1, 0)],
                (Mode::Expand3D, _) => vec![Slot::new(0, 0), Slot::new(1, 0), Slot::new(2, 0)],
            };
            PlaneMap {
                plane: p,
                lut_channel: p,
                width: output.plane_width(p),
                height: output.plane_height(p),
                slots,
            }
        })
        .collect()
}

fn check_geometry(sources: &[FrameFormat], planes: &[PlaneMap]) -> ApplyResult<()> {
    for pm in planes {
        for s in &pm.slots {
            let f = &sources[s.clip];
            let (w, h) = (f.plane_width(s.plane), f.plane_height(s.plane));
            if s.plane >= f.plane_count() || w != pm.width || h != pm.height {
                return Err(ApplyError::mismatch(format!(
                    "destination plane {} is {}x{} but reads plane {} of clip {} ({f}), which is {w}x{h}",
                    pm.plane, pm.width, pm.height, s.plane, s.clip
                )));
            }
        }
    }
    Ok(())
}
