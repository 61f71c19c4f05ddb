//! Pixel mapper.
//!
//! Three routine families write a destination frame from source frames and
//! a LUT frame, following the [`PlaneMap`]s of a resolved configuration:
//!
//! - [`RoutineKind::PerPlane`] - each destination plane composes its own
//!   index and reads its own LUT plane
//! - [`RoutineKind::Shared`] - one index per pixel, written through the
//!   first three LUT planes
//! - [`RoutineKind::Packed`] - one index per pixel, written as interleaved
//!   BGR(A) from a packed LUT, bottom row first; alpha is left untouched
//!
//! Each family is monomorphized over the source and destination sample
//! types. [`select`] picks the instance once; frames then only go through
//! the stored [`MapFn`].
//!
//! Rows are independent, so with the `parallel` feature they are processed
//! with rayon.
//!
//! # In-place writes
//!
//! A source frame can double as the destination. Its entry in
//! [`MapJob::sources`] is then `None` and the per-plane routine reads that
//! clip's samples from a copy of the destination row taken before the row
//! is overwritten.

use crate::composite::{composite1, composite2, composite3};
use crate::resolve::PlaneMap;
use lutmap_core::{Error, Frame, Result, Sample, SampleWidth};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Routine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    /// Per destination plane index and LUT plane.
    PerPlane,
    /// One index per pixel, three planar outputs.
    Shared,
    /// One index per pixel, one interleaved output.
    Packed,
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RoutineKind::PerPlane => "per_plane",
            RoutineKind::Shared => "shared",
            RoutineKind::Packed => "packed",
        })
    }
}

/// Inputs of one frame.
#[derive(Debug, Clone, Copy)]
pub struct MapJob<'a> {
    /// Destination plane plans.
    pub planes: &'a [PlaneMap],
    /// Source bit depth in bits.
    pub bits: u32,
    /// LUT frame.
    pub lut: &'a Frame,
    /// Source frames by clip index; `None` marks the clip being overwritten.
    pub sources: &'a [Option<&'a Frame>],
}

/// Monomorphized write routine.
pub type MapFn = for<'a> fn(&MapJob<'a>, &mut Frame) -> Result<()>;

/// Picks the routine instance for a `(source, destination)` width pair.
///
/// Returns `None` for 32-bit sources, which cannot index a table.
pub fn select(kind: RoutineKind, source: SampleWidth, dest: SampleWidth) -> Option<MapFn> {
    match (source, dest) {
        (SampleWidth::U8, SampleWidth::U8) => Some(routine::<u8, u8>(kind)),
        (SampleWidth::U8, SampleWidth::U16) => Some(routine::<u8, u16>(kind)),
        (SampleWidth::U8, SampleWidth::U32) => Some(routine::<u8, u32>(kind)),
        (SampleWidth::U16, SampleWidth::U8) => Some(routine::<u16, u8>(kind)),
        (SampleWidth::U16, SampleWidth::U16) => Some(routine::<u16, u16>(kind)),
        (SampleWidth::U16, SampleWidth::U32) => Some(routine::<u16, u32>(kind)),
        (SampleWidth::U32, _) => None,
    }
}

fn routine<S: Sample, D: Sample>(kind: RoutineKind) -> MapFn {
    match kind {
        RoutineKind::PerPlane => map_per_plane::<S, D>,
        RoutineKind::Shared => map_shared::<S, D>,
        RoutineKind::Packed => map_packed::<S, D>,
    }
}

// ============================================================================
// Row kernels
// ============================================================================

#[inline]
fn lookup_row<S: Sample, D: Sample>(inputs: &[&[S]], bits: u32, lut: &[D], out: &mut [D]) {
    let mask = (1u32 << bits) - 1;
    match *inputs {
        [a] => {
            for (o, &a) in out.iter_mut().zip(a) {
                *o = lut[composite1(a.to_u32(), mask)];
            }
        }
        [a, b] => {
            for ((o, &a), &b) in out.iter_mut().zip(a).zip(b) {
                *o = lut[composite2(a.to_u32(), b.to_u32(), bits, mask)];
            }
        }
        [a, b, c] => {
            for (((o, &a), &b), &c) in out.iter_mut().zip(a).zip(b).zip(c) {
                *o = lut[composite3(a.to_u32(), b.to_u32(), c.to_u32(), bits, mask)];
            }
        }
        _ => {}
    }
}

#[inline]
fn index_at<S: Sample>(inputs: &[&[S]], x: usize, bits: u32, mask: u32) -> usize {
    match *inputs {
        [a] => composite1(a[x].to_u32(), mask),
        [a, b] => composite2(a[x].to_u32(), b[x].to_u32(), bits, mask),
        [a, b, c] => composite3(a[x].to_u32(), b[x].to_u32(), c[x].to_u32(), bits, mask),
        _ => 0,
    }
}

/// Typed view of one source plane.
#[derive(Clone, Copy)]
struct PlaneView<'a, S> {
    data: &'a [S],
    stride: usize,
}

impl<'a, S> PlaneView<'a, S> {
    #[inline]
    fn row(&self, y: usize, width: usize) -> &'a [S] {
        &self.data[y * self.stride..y * self.stride + width]
    }
}

fn source_view<'a, S: Sample>(sources: &[Option<&'a Frame>], clip: usize, plane: usize) -> Result<Option<PlaneView<'a, S>>> {
    let slot = sources
        .get(clip)
        .ok_or_else(|| Error::other(format!("no source frame for clip {clip}")))?;
    match *slot {
        Some(frame) => {
            let p = frame.plane(plane)?;
            Ok(Some(PlaneView {
                data: p.samples::<S>()?,
                stride: p.stride(),
            }))
        }
        None => Ok(None),
    }
}

fn lut_plane<D: Sample>(lut: &Frame, channel: usize) -> Result<&[D]> {
    lut.plane(channel)?.samples::<D>()
}

/// The last row may stop right after its last sample.
fn check_rows(len: usize, stride: usize, width: usize, height: usize) -> Result<()> {
    let expected = match height {
        0 => 0,
        h => stride * (h - 1) + width,
    };
    if width > stride || expected > len {
        return Err(Error::BufferSize { expected, got: len });
    }
    Ok(())
}

// ============================================================================
// Row iteration
// ============================================================================

#[cfg(feature = "parallel")]
fn for_each_row<D, F>(out: &mut [D], stride: usize, height: usize, f: F)
where
    D: Send,
    F: Fn(usize, &mut [D]) + Send + Sync,
{
    out.par_chunks_mut(stride)
        .take(height)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(not(feature = "parallel"))]
fn for_each_row<D, F>(out: &mut [D], stride: usize, height: usize, f: F)
where
    F: Fn(usize, &mut [D]),
{
    out.chunks_mut(stride)
        .take(height)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(feature = "parallel")]
fn for_each_row3<D, F>(out: [(&mut [D], usize); 3], height: usize, f: F)
where
    D: Send,
    F: Fn(usize, [&mut [D]; 3]) + Send + Sync,
{
    let [(a, sa), (b, sb), (c, sc)] = out;
    a.par_chunks_mut(sa)
        .zip(b.par_chunks_mut(sb))
        .zip(c.par_chunks_mut(sc))
        .take(height)
        .enumerate()
        .for_each(|(y, ((a, b), c))| f(y, [a, b, c]));
}

#[cfg(not(feature = "parallel"))]
fn for_each_row3<D, F>(out: [(&mut [D], usize); 3], height: usize, f: F)
where
    F: Fn(usize, [&mut [D]; 3]),
{
    let [(a, sa), (b, sb), (c, sc)] = out;
    a.chunks_mut(sa)
        .zip(b.chunks_mut(sb))
        .zip(c.chunks_mut(sc))
        .take(height)
        .enumerate()
        .for_each(|(y, ((a, b), c))| f(y, [a, b, c]));
}

// ============================================================================
// Routines
// ============================================================================

/// Per-plane routine: destination plane `p` = `lut[p][index(slots of p)]`.
fn map_per_plane<S: Sample, D: Sample>(job: &MapJob<'_>, dst: &mut Frame) -> Result<()> {
    for pm in job.planes {
        let lut = lut_plane::<D>(job.lut, pm.lut_channel)?;
        let views = pm
            .slots
            .iter()
            .map(|s| source_view::<S>(job.sources, s.clip, s.plane))
            .collect::<Result<Vec<_>>>()?;
        let (w, h) = (pm.width as usize, pm.height as usize);
        for v in views.iter().flatten() {
            check_rows(v.data.len(), v.stride, w, h)?;
        }
        let own = views.iter().any(Option::is_none);

        let plane = dst.plane_mut(pm.plane)?;
        let stride = plane.stride();
        let out = plane.samples_mut::<D>()?;
        check_rows(out.len(), stride, w, h)?;
        trace!(plane = pm.plane, slots = pm.slots.len(), in_place = own, "mapping plane");

        for_each_row(out, stride, h, |y, row| {
            let row = &mut row[..w];
            // source samples of the overwritten clip, read before the row is written
            let saved: Vec<S> = if own {
                row.iter().map(|d| S::from_u32(d.to_u32())).collect()
            } else {
                Vec::new()
            };
            let mut inputs: [&[S]; 3] = [&[]; 3];
            for (i, v) in views.iter().enumerate() {
                inputs[i] = match v {
                    Some(v) => v.row(y, w),
                    None => saved.as_slice(),
                };
            }
            lookup_row(&inputs[..views.len()], job.bits, lut, row);
        });
    }
    Ok(())
}

/// Shared routine: one index per pixel, destination planes 0..3 =
/// `lut[0..3][index]`.
fn map_shared<S: Sample, D: Sample>(job: &MapJob<'_>, dst: &mut Frame) -> Result<()> {
    let Some(first) = job.planes.first() else {
        return Ok(());
    };
    let (w, h) = (first.width as usize, first.height as usize);
    let views = first
        .slots
        .iter()
        .map(|s| {
            source_view::<S>(job.sources, s.clip, s.plane)?
                .ok_or_else(|| Error::other("shared routine cannot write in place"))
        })
        .collect::<Result<Vec<_>>>()?;
    for v in &views {
        check_rows(v.data.len(), v.stride, w, h)?;
    }
    let luts = [
        lut_plane::<D>(job.lut, 0)?,
        lut_plane::<D>(job.lut, 1)?,
        lut_plane::<D>(job.lut, 2)?,
    ];

    let [p0, p1, p2, ..] = dst.planes_mut() else {
        return Err(Error::other("shared routine needs three destination planes"));
    };
    let strides = [p0.stride(), p1.stride(), p2.stride()];
    let out = [
        (p0.samples_mut::<D>()?, strides[0]),
        (p1.samples_mut::<D>()?, strides[1]),
        (p2.samples_mut::<D>()?, strides[2]),
    ];
    for (o, s) in &out {
        check_rows(o.len(), *s, w, h)?;
    }
    trace!(slots = views.len(), "mapping shared index into three planes");

    let mask = (1u32 << job.bits) - 1;
    for_each_row3(out, h, |y, [a, b, c]| {
        let mut inputs: [&[S]; 3] = [&[]; 3];
        for (i, v) in views.iter().enumerate() {
            inputs[i] = v.row(y, w);
        }
        let inputs = &inputs[..views.len()];
        for x in 0..w {
            let idx = index_at(inputs, x, job.bits, mask);
            a[x] = luts[0][idx];
            b[x] = luts[1][idx];
            c[x] = luts[2][idx];
        }
    });
    Ok(())
}

/// Packed routine: BGR(A) destination from a packed LUT, bottom row first.
///
/// Memory row `y` of the destination is written from source row
/// `height - 1 - y`. Channels 0..3 are `lut[index * channels + c]`; a
/// fourth channel keeps whatever the destination already holds.
fn map_packed<S: Sample, D: Sample>(job: &MapJob<'_>, dst: &mut Frame) -> Result<()> {
    let Some(pm) = job.planes.first() else {
        return Ok(());
    };
    let slot = pm.slots.first().ok_or_else(|| Error::other("packed routine without a source slot"))?;
    let src = source_view::<S>(job.sources, slot.clip, slot.plane)?
        .ok_or_else(|| Error::other("packed routine cannot write in place"))?;
    let (w, h) = (pm.width as usize, pm.height as usize);
    check_rows(src.data.len(), src.stride, w, h)?;

    let channels = dst.format().family().channels();
    let lut = lut_plane::<D>(job.lut, 0)?;
    let plane = dst.plane_mut(0)?;
    let stride = plane.stride();
    let out = plane.samples_mut::<D>()?;
    check_rows(out.len(), stride, w * channels, h)?;
    trace!(channels, rows = h, "mapping packed destination bottom-up");

    let mask = (1u32 << job.bits) - 1;
    for_each_row(out, stride, h, |y, row| {
        let src_row = src.row(h - 1 - y, w);
        for (px, &s) in row[..w * channels].chunks_exact_mut(channels).zip(src_row) {
            let base = composite1(s.to_u32(), mask) * channels;
            px[..3].copy_from_slice(&lut[base..base + 3]);
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Slot;
    use lutmap_core::{FrameFormat, Plane, SampleBuf};

    fn ff(s: &str) -> FrameFormat {
        s.parse().unwrap()
    }

    fn ramp_lut_u8(invert: bool) -> Frame {
        let data: Vec<u8> = (0..=255u8).map(|v| if invert { 255 - v } else { v }).collect();
        Frame::from_planes(ff("y8:256"), vec![Plane::from_vec(256, 1, data).unwrap()]).unwrap()
    }

    fn plane_map(w: u32, h: u32, slots: Vec<Slot>) -> Vec<PlaneMap> {
        vec![PlaneMap {
            plane: 0,
            lut_channel: 0,
            width: w,
            height: h,
            slots,
        }]
    }

    #[test]
    fn test_select_covers_integer_sources() {
        for kind in [RoutineKind::PerPlane, RoutineKind::Shared, RoutineKind::Packed] {
            for s in [SampleWidth::U8, SampleWidth::U16] {
                for d in [SampleWidth::U8, SampleWidth::U16, SampleWidth::U32] {
                    assert!(select(kind, s, d).is_some());
                }
            }
            assert!(select(kind, SampleWidth::U32, SampleWidth::U8).is_none());
        }
    }

    #[test]
    fn test_per_plane_invert() {
        let mut src = Frame::new(ff("y8:4x2"));
        for x in 0..4 {
            src.set_sample(0, x, 1, 10 * x as u32);
        }
        let lut = ramp_lut_u8(true);
        let planes = plane_map(4, 2, vec![Slot { clip: 0, plane: 0 }]);
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        let mut dst = Frame::new(ff("y8:4x2"));
        map_per_plane::<u8, u8>(&job, &mut dst).unwrap();
        assert_eq!(dst.sample(0, 0, 0), Some(255));
        assert_eq!(dst.sample(0, 3, 1), Some(225));
    }

    #[test]
    fn test_per_plane_in_place_reads_before_write() {
        let mut frame = Frame::new(ff("y8:3x1"));
        frame.set_sample(0, 0, 0, 1);
        frame.set_sample(0, 1, 0, 2);
        frame.set_sample(0, 2, 0, 3);
        let lut = ramp_lut_u8(true);
        let planes = plane_map(3, 1, vec![Slot { clip: 0, plane: 0 }]);
        let sources: [Option<&Frame>; 1] = [None];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        map_per_plane::<u8, u8>(&job, &mut frame).unwrap();
        assert_eq!(frame.plane(0).unwrap().samples::<u8>().unwrap(), &[254, 253, 252]);
    }

    #[test]
    fn test_per_plane_two_slots_u16_to_u8() {
        // 2D table whose entries are the high digit of the index
        let mut a = Frame::new(ff("y8:2x1"));
        let mut b = Frame::new(ff("y8:2x1"));
        a.set_sample(0, 1, 0, 0x34);
        b.set_sample(0, 1, 0, 0x12);
        let data: Vec<u8> = (0..65536u32).map(|x| (x >> 8) as u8).collect();
        let lut = Frame::from_planes(ff("y8:65536"), vec![Plane::from_vec(65536, 1, data).unwrap()]).unwrap();
        let planes = plane_map(2, 1, vec![Slot { clip: 0, plane: 0 }, Slot { clip: 1, plane: 0 }]);
        let sources = [Some(&a), Some(&b)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        let mut dst = Frame::new(ff("y8:2x1"));
        map_per_plane::<u8, u8>(&job, &mut dst).unwrap();
        assert_eq!(dst.sample(0, 1, 0), Some(0x12));
    }

    #[test]
    fn test_packed_bottom_up() {
        // 4x2 source, row 0 = 0..4, row 1 = 10..14
        let mut src = Frame::new(ff("y8:4x2"));
        for x in 0..4 {
            src.set_sample(0, x, 0, x as u32);
            src.set_sample(0, x, 1, 10 + x as u32);
        }
        // packed LUT: entry s = (s, s+1, s+2)
        let data: Vec<u8> = (0..256u32).flat_map(|s| [s as u8, (s + 1) as u8, (s + 2) as u8]).collect();
        let lut = Frame::from_planes(ff("rgb24:256"), vec![Plane::from_vec(768, 1, data).unwrap()]).unwrap();
        let planes = plane_map(4, 2, vec![Slot { clip: 0, plane: 0 }]);
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        let mut dst = Frame::new(ff("rgb24:4x2"));
        map_packed::<u8, u8>(&job, &mut dst).unwrap();
        let out = dst.plane(0).unwrap().samples::<u8>().unwrap();
        assert_eq!(&out[..6], &[10, 11, 12, 11, 12, 13]);
        assert_eq!(&out[12..15], &[0, 1, 2]);
    }

    #[test]
    fn test_packed_keeps_alpha() {
        let src = Frame::new(ff("y8:1x1"));
        let data: Vec<u8> = (0..256u32).flat_map(|_| [7u8, 8, 9, 0]).collect();
        let lut = Frame::from_planes(ff("rgba32:256"), vec![Plane::from_vec(1024, 1, data).unwrap()]).unwrap();
        let planes = plane_map(1, 1, vec![Slot { clip: 0, plane: 0 }]);
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        let mut dst = Frame::new(ff("rgba32:1x1"));
        dst.set_sample(0, 3, 0, 200);
        map_packed::<u8, u8>(&job, &mut dst).unwrap();
        assert_eq!(dst.plane(0).unwrap().samples::<u8>().unwrap(), &[7, 8, 9, 200]);
    }

    #[test]
    fn test_shared_writes_three_planes() {
        let mut src = Frame::new(ff("y8:2x1"));
        src.set_sample(0, 1, 0, 5);
        let mut lut = Frame::new(ff("rgbp16:256"));
        for s in 0..256 {
            lut.set_sample(0, s, 0, s as u32 * 2);
            lut.set_sample(1, s, 0, s as u32 * 3);
            lut.set_sample(2, s, 0, 1000);
        }
        let planes: Vec<PlaneMap> = (0..3)
            .map(|p| PlaneMap {
                plane: p,
                lut_channel: p,
                width: 2,
                height: 1,
                slots: vec![Slot { clip: 0, plane: 0 }],
            })
            .collect();
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        let mut dst = Frame::new(ff("rgbp16:2x1"));
        map_shared::<u8, u16>(&job, &mut dst).unwrap();
        assert_eq!(dst.sample(0, 1, 0), Some(10));
        assert_eq!(dst.sample(1, 1, 0), Some(15));
        assert_eq!(dst.sample(2, 0, 0), Some(1000));
    }

    /// `rows` laid out `stride` samples apart, gaps filled with `pad`.
    fn padded(format: &str, stride: usize, rows: &[&[u8]], pad: u8) -> Frame {
        let width = rows[0].len();
        let mut data = vec![pad; stride * (rows.len() - 1) + width];
        for (y, row) in rows.iter().enumerate() {
            data[y * stride..y * stride + width].copy_from_slice(row);
        }
        let plane = Plane::with_stride(width, stride, rows.len(), SampleBuf::U8(data.into())).unwrap();
        Frame::from_planes(ff(format), vec![plane]).unwrap()
    }

    #[test]
    fn test_per_plane_padded_rows() {
        let src = padded("y8:3x2", 5, &[&[1, 2, 3], &[4, 5, 6]], 0xee);
        let mut dst = padded("y8:3x2", 4, &[&[0, 0, 0], &[0, 0, 0]], 0xaa);
        let lut = ramp_lut_u8(true);
        let planes = plane_map(3, 2, vec![Slot { clip: 0, plane: 0 }]);
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        map_per_plane::<u8, u8>(&job, &mut dst).unwrap();
        assert_eq!(
            dst.plane(0).unwrap().samples::<u8>().unwrap(),
            &[254, 253, 252, 0xaa, 251, 250, 249]
        );
    }

    #[test]
    fn test_per_plane_in_place_padded() {
        let mut frame = padded("y8:2x2", 3, &[&[10, 20], &[30, 40]], 0xee);
        let lut = ramp_lut_u8(true);
        let planes = plane_map(2, 2, vec![Slot { clip: 0, plane: 0 }]);
        let sources: [Option<&Frame>; 1] = [None];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        map_per_plane::<u8, u8>(&job, &mut frame).unwrap();
        assert_eq!(frame.plane(0).unwrap().samples::<u8>().unwrap(), &[245, 235, 0xee, 225, 215]);
    }

    #[test]
    fn test_shared_padded_rows() {
        let src = padded("y8:2x2", 4, &[&[1, 2], &[3, 4]], 0xee);
        let mut lut = Frame::new(ff("rgbp8:256"));
        for s in 0..256 {
            lut.set_sample(0, s, 0, s as u32);
            lut.set_sample(1, s, 0, s as u32 + 100);
            lut.set_sample(2, s, 0, s as u32 + 200);
        }
        let dst_plane = |stride: usize| {
            Plane::with_stride(2, stride, 2, SampleBuf::U8(vec![0xaa; stride + 2].into())).unwrap()
        };
        let mut dst = Frame::from_planes(ff("rgbp8:2x2"), vec![dst_plane(2), dst_plane(3), dst_plane(5)]).unwrap();
        let planes: Vec<PlaneMap> = (0..3)
            .map(|p| PlaneMap {
                plane: p,
                lut_channel: p,
                width: 2,
                height: 2,
                slots: vec![Slot { clip: 0, plane: 0 }],
            })
            .collect();
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        map_shared::<u8, u8>(&job, &mut dst).unwrap();
        assert_eq!(dst.plane(0).unwrap().samples::<u8>().unwrap(), &[1, 2, 3, 4]);
        assert_eq!(dst.plane(1).unwrap().samples::<u8>().unwrap(), &[101, 102, 0xaa, 103, 104]);
        assert_eq!(dst.sample(2, 1, 1), Some(204));
        assert_eq!(dst.plane(2).unwrap().samples::<u8>().unwrap()[2..5], [0xaa; 3]);
    }

    #[test]
    fn test_packed_padded_rows() {
        let src = padded("y8:2x2", 3, &[&[1, 2], &[3, 4]], 0xee);
        let data: Vec<u8> = (0..256u32).flat_map(|s| [s as u8, (s + 1) as u8, (s + 2) as u8]).collect();
        let lut = Frame::from_planes(ff("rgb24:256"), vec![Plane::from_vec(768, 1, data).unwrap()]).unwrap();
        let plane = Plane::with_stride(6, 8, 2, SampleBuf::U8(vec![0xaa; 14].into())).unwrap();
        let mut dst = Frame::from_planes(ff("rgb24:2x2"), vec![plane]).unwrap();
        let planes = plane_map(2, 2, vec![Slot { clip: 0, plane: 0 }]);
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        map_packed::<u8, u8>(&job, &mut dst).unwrap();
        assert_eq!(
            dst.plane(0).unwrap().samples::<u8>().unwrap(),
            &[3, 4, 5, 4, 5, 6, 0xaa, 0xaa, 1, 2, 3, 2, 3, 4]
        );
    }

    #[test]
    fn test_short_buffer_is_error() {
        assert!(check_rows(7, 4, 3, 2).is_ok());
        assert!(matches!(check_rows(6, 4, 3, 2), Err(Error::BufferSize { expected: 7, got: 6 })));
        assert!(check_rows(8, 2, 3, 1).is_err());
    }

    #[test]
    fn test_wrong_sample_width_is_error() {
        let src = Frame::new(ff("y16:2x1"));
        let lut = ramp_lut_u8(false);
        let planes = plane_map(2, 1, vec![Slot { clip: 0, plane: 0 }]);
        let sources = [Some(&src)];
        let job = MapJob { planes: &planes, bits: 8, lut: &lut, sources: &sources };
        let mut dst = Frame::new(ff("y8:2x1"));
        assert!(map_per_plane::<u8, u8>(&job, &mut dst).is_err());
    }
}
