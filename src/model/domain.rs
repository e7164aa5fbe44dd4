use crate::error::{Error, Result};
use mpi::collective::SystemOperation;
use mpi::topology::Rank;
use mpi::traits::*;

/// Identity of the slab adjacent to one of ours on the decomposed axis.
/// `Boundary` marks a physical end of the domain; no halo is exchanged there
/// and the stamped Dirichlet value persists in the guard plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    Rank(Rank),
    Boundary,
}

/// One rank's share of the global grid: a contiguous range of i-planes
/// (plus two guard planes), with the j and k axes held in full.
#[derive(Debug, Clone)]
pub struct Domain {
    pub ni: usize,
    pub nj: usize,
    pub nk: usize,
    pub ioffset: usize,
    pub left: Neighbor,
    pub right: Neighbor,
}

/// Balanced share of the N-2 interior planes owned by `rank`; lower ranks
/// absorb any remainder, so shares differ by at most one plane.
pub fn interior_planes(points: usize, size: usize, rank: usize) -> usize {
    let interior = points - 2;
    (rank + 1) * interior / size - rank * interior / size
}

pub fn neighbors(rank: Rank, size: Rank) -> (Neighbor, Neighbor) {
    let left = if rank == 0 {
        Neighbor::Boundary
    } else {
        Neighbor::Rank(rank - 1)
    };
    let right = if rank == size - 1 {
        Neighbor::Boundary
    } else {
        Neighbor::Rank(rank + 1)
    };
    (left, right)
}

impl Domain {
    pub fn decompose(comm: &impl Communicator, points: i32) -> Result<Self> {
        let rank = comm.rank();
        let size = comm.size();
        if points < 3 {
            return Err(Error::invalid_domain(
                size,
                points,
                "the grid needs at least one interior plane",
            ));
        }
        let owned = interior_planes(points as usize, size as usize, rank as usize);
        let ni = owned + 2;
        if ni < 3 {
            return Err(Error::invalid_domain(
                size,
                points,
                "too many processes for the size of the system",
            ));
        }
        // Exclusive prefix sum of the interior counts; MPI leaves the
        // result on rank 0 undefined, so it is pinned to zero here.
        let mut ioffset: i32 = 0;
        comm.exclusive_scan_into(&(owned as i32), &mut ioffset, SystemOperation::sum());
        if rank == 0 {
            ioffset = 0;
        }
        let (left, right) = neighbors(rank, size);
        Ok(Self {
            ni,
            nj: points as usize,
            nk: points as usize,
            ioffset: ioffset as usize,
            left,
            right,
        })
    }

    pub fn owned_planes(&self) -> usize {
        self.ni - 2
    }
}
