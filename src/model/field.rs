use std::ops::{Index, IndexMut};

/// Slab-shaped scalar field, stored i-major so that one i-plane is a
/// contiguous run of nj*nk values.
#[derive(Debug, Clone)]
pub struct Field {
    ni: usize,
    nj: usize,
    nk: usize,
    data: Vec<f64>,
}

/// Disjoint views of the four planes involved in one halo exchange.
pub struct HaloParts<'a> {
    pub guard_left: &'a mut [f64],
    pub send_left: &'a [f64],
    pub send_right: &'a [f64],
    pub guard_right: &'a mut [f64],
}

impl Field {
    pub fn zeros(ni: usize, nj: usize, nk: usize) -> Self {
        Self {
            ni,
            nj,
            nk,
            data: vec![0.0; ni * nj * nk],
        }
    }

    pub fn ni(&self) -> usize {
        self.ni
    }

    pub fn nj(&self) -> usize {
        self.nj
    }

    pub fn nk(&self) -> usize {
        self.nk
    }

    fn plane_len(&self) -> usize {
        self.nj * self.nk
    }

    pub fn plane(&self, i: usize) -> &[f64] {
        let s = self.plane_len();
        &self.data[i * s..(i + 1) * s]
    }

    /// Splits the buffer into the two guard planes (mutable, written by the
    /// exchange) and the two edge interior planes (read-only, sent to the
    /// neighbors). Requires ni >= 3.
    pub fn halo_parts(&mut self) -> HaloParts<'_> {
        let s = self.plane_len();
        let interior_len = (self.ni - 2) * s;
        let (guard_left, rest) = self.data.split_at_mut(s);
        let (interior, guard_right) = rest.split_at_mut(interior_len);
        HaloParts {
            guard_left,
            send_left: &interior[..s],
            send_right: &interior[interior_len - s..],
            guard_right,
        }
    }
}

impl Index<(usize, usize, usize)> for Field {
    type Output = f64;

    fn index(&self, (i, j, k): (usize, usize, usize)) -> &f64 {
        &self.data[(i * self.nj + j) * self.nk + k]
    }
}

impl IndexMut<(usize, usize, usize)> for Field {
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut f64 {
        &mut self.data[(i * self.nj + j) * self.nk + k]
    }
}
