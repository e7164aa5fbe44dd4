use crate::model::Field;
use rayon::prelude::*;

/// Bytes per field slot: 15 rendered characters plus one filler byte
/// (a space, or a newline after the last field of a point).
pub const COL_WIDTH: usize = 16;
const NUM_WIDTH: usize = 15;
const PRECISION: usize = 11;
const FIELDS_PER_POINT: usize = 5;

/// Bytes produced for one owned i-plane, closing newline included.
pub fn chars_per_plane(nj: usize, nk: usize) -> usize {
    (nj - 2) * (nk - 2) * FIELDS_PER_POINT * COL_WIDTH + 1
}

/// Bytes produced for one rank's share of one snapshot.
pub fn snapshot_len(ni: usize, nj: usize, nk: usize) -> usize {
    chars_per_plane(nj, nk) * (ni - 2)
}

/// Fixed-point rendering, zero-padded on the left to the 15-byte field
/// width. Values are expected to fit; wider output would break the
/// byte-offset layout of the shared file.
fn format_value(value: f64) -> String {
    format!("{:0w$.p$}", value, w = NUM_WIDTH, p = PRECISION)
}

/// Renders one owned i-plane: one 80-byte record per interior (j,k) point
/// in row-major order, then one newline closing the plane block.
fn format_plane(field: &Field, i: usize, t: f64, dx: f64, ioffset: usize) -> String {
    let (nj, nk) = (field.nj(), field.nk());
    let values = field.plane(i);
    let mut plane = String::with_capacity(chars_per_plane(nj, nk));
    let x = (ioffset + i) as f64 * dx;
    for j in 1..nj - 1 {
        let y = j as f64 * dx;
        for k in 1..nk - 1 {
            let z = k as f64 * dx;
            plane.push_str(&format_value(t));
            plane.push(' ');
            plane.push_str(&format_value(x));
            plane.push(' ');
            plane.push_str(&format_value(y));
            plane.push(' ');
            plane.push_str(&format_value(z));
            plane.push(' ');
            plane.push_str(&format_value(values[j * nk + k]));
            plane.push('\n');
        }
    }
    plane.push('\n');
    plane
}

/// Formats all owned interior planes in order.
pub fn format_snapshot(field: &Field, t: f64, dx: f64, ioffset: usize) -> String {
    let mut out = String::with_capacity(snapshot_len(field.ni(), field.nj(), field.nk()));
    for i in 1..field.ni() - 1 {
        out.push_str(&format_plane(field, i, t, dx, ioffset));
    }
    out
}

/// Plane-parallel variant: each i-plane is formatted into its own buffer
/// with no cross-plane dependency, then the buffers are joined in plane
/// order. The result is byte-identical to `format_snapshot` for any
/// thread count.
pub fn format_snapshot_hybrid(field: &Field, t: f64, dx: f64, ioffset: usize) -> String {
    let planes: Vec<String> = (1..field.ni() - 1)
        .into_par_iter()
        .map(|i| format_plane(field, i, t, dx, ioffset))
        .collect();
    let mut out = String::with_capacity(snapshot_len(field.ni(), field.nj(), field.nk()));
    for plane in &planes {
        out.push_str(plane);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::interior_planes;
    use float_cmp::approx_eq;

    const RECORD_LEN: usize = FIELDS_PER_POINT * COL_WIDTH;

    fn filled(ni: usize, nj: usize, nk: usize, offset: usize) -> Field {
        let mut field = Field::zeros(ni, nj, nk);
        for i in 0..ni {
            for j in 0..nj {
                for k in 0..nk {
                    field[(i, j, k)] =
                        (offset + i) as f64 * 0.01 + j as f64 * 0.001 + k as f64 * 0.0001;
                }
            }
        }
        field
    }

    #[test]
    fn every_point_occupies_exactly_eighty_bytes() {
        let field = filled(4, 4, 4, 0);
        let text = format_snapshot(&field, 0.5, 0.1, 0);
        assert_eq!(text.len(), snapshot_len(4, 4, 4));
        let bytes = text.as_bytes();
        // First record: four space-padded slots, then a newline slot.
        for f in 0..FIELDS_PER_POINT - 1 {
            assert_eq!(bytes[f * COL_WIDTH + NUM_WIDTH], b' ');
        }
        assert_eq!(bytes[RECORD_LEN - 1], b'\n');
        // A 4x4x4 slab owns two planes of four points each; the plane
        // block closes with its own newline.
        assert_eq!(bytes[4 * RECORD_LEN], b'\n');
        assert_eq!(chars_per_plane(4, 4), 4 * RECORD_LEN + 1);
    }

    #[test]
    fn rendered_values_are_fifteen_bytes() {
        assert_eq!(format_value(0.0).len(), NUM_WIDTH);
        assert_eq!(format_value(1.0), "001.00000000000");
        assert_eq!(format_value(12.5), "012.50000000000");
    }

    #[test]
    fn record_round_trips_within_declared_precision() {
        let mut field = Field::zeros(3, 3, 3);
        field[(1, 1, 1)] = 0.987654321987;
        let t = 1.25;
        let dx = 0.375;
        let ioffset = 4;
        let text = format_snapshot(&field, t, dx, ioffset);
        let record = &text[..RECORD_LEN];
        let parsed: Vec<f64> = (0..FIELDS_PER_POINT)
            .map(|f| {
                record[f * COL_WIDTH..f * COL_WIDTH + NUM_WIDTH]
                    .parse()
                    .unwrap()
            })
            .collect();
        let expected = [t, 5.0 * dx, dx, dx, 0.987654321987];
        for (got, want) in parsed.iter().zip(expected.iter()) {
            assert!(
                approx_eq!(f64, *got, *want, epsilon = 1e-11),
                "got {} want {}",
                got,
                want
            );
        }
    }

    #[test]
    fn hybrid_output_matches_sequential_for_any_pool_size() {
        let field = filled(6, 5, 5, 0);
        let sequential = format_snapshot(&field, 0.25, 0.2, 3);
        for threads in [1, 2, 4] {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap();
            let hybrid = pool.install(|| format_snapshot_hybrid(&field, 0.25, 0.2, 3));
            assert_eq!(sequential, hybrid, "threads={}", threads);
        }
    }

    #[test]
    fn rank_buffers_concatenate_to_the_single_rank_snapshot() {
        let points = 10usize;
        let size = 3usize;
        let t = 0.5;
        let dx = 1.0 / 9.0;
        let global = filled(points, points, points, 0);
        let whole = format_snapshot(&global, t, dx, 0);

        let mut concatenated = String::new();
        let mut ioffset = 0usize;
        for rank in 0..size {
            let owned = interior_planes(points, size, rank);
            // Rebuild the rank's slab from the global field: local plane l
            // corresponds to global plane ioffset + l.
            let mut slab = Field::zeros(owned + 2, points, points);
            for l in 0..owned + 2 {
                for j in 0..points {
                    for k in 0..points {
                        slab[(l, j, k)] = global[(ioffset + l, j, k)];
                    }
                }
            }
            let part = format_snapshot(&slab, t, dx, ioffset);
            assert_eq!(part.len(), snapshot_len(owned + 2, points, points));
            concatenated.push_str(&part);
            ioffset += owned;
        }
        assert_eq!(concatenated, whole);
    }
}
