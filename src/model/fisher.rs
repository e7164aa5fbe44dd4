use super::domain::{Domain, Neighbor};
use super::field::{Field, HaloParts};
use super::parameters::Parameters;
use crate::error::Result;
use crate::output;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

/// Explicit solver for the KPP-Fisher equation on one slab of the grid.
pub struct Fisher<'a> {
    comm: &'a SimpleCommunicator,
    pub domain: Domain,
    pub params: Parameters,
    current: Field,
    previous: Field,
    filename: String,
    hybrid_output: bool,
}

/// Stamps the Dirichlet value on every physical boundary plane of the slab:
/// the extreme i-faces where no neighbor exists, and all j/k extreme planes
/// (those axes are replicated in full on every rank). The stencil never
/// touches these planes, so one stamp lasts for the whole run.
pub fn apply_boundaries(field: &mut Field, domain: &Domain, amplitude: f64) {
    let (ni, nj, nk) = (field.ni(), field.nj(), field.nk());
    for j in 0..nj {
        for k in 0..nk {
            if domain.left == Neighbor::Boundary {
                field[(0, j, k)] = amplitude;
            }
            if domain.right == Neighbor::Boundary {
                field[(ni - 1, j, k)] = amplitude;
            }
        }
    }
    for i in 0..ni {
        for k in 0..nk {
            field[(i, 0, k)] = amplitude;
            field[(i, nj - 1, k)] = amplitude;
        }
    }
    for i in 0..ni {
        for j in 0..nj {
            field[(i, j, 0)] = amplitude;
            field[(i, j, nk - 1)] = amplitude;
        }
    }
}

fn diffuse(current: &mut Field, previous: &Field, alpha: f64) {
    let (ni, nj, nk) = (current.ni(), current.nj(), current.nk());
    for i in 1..ni - 1 {
        for j in 1..nj - 1 {
            for k in 1..nk - 1 {
                current[(i, j, k)] = previous[(i, j, k)]
                    + alpha
                        * (previous[(i - 1, j, k)]
                            + previous[(i + 1, j, k)]
                            + previous[(i, j - 1, k)]
                            + previous[(i, j + 1, k)]
                            + previous[(i, j, k - 1)]
                            + previous[(i, j, k + 1)]
                            - 6.0 * previous[(i, j, k)]);
            }
        }
    }
}

fn react(current: &mut Field, previous: &Field, deltat: f64) {
    let (ni, nj, nk) = (current.ni(), current.nj(), current.nk());
    for i in 1..ni - 1 {
        for j in 1..nj - 1 {
            for k in 1..nk - 1 {
                let u = previous[(i, j, k)];
                current[(i, j, k)] += deltat * u * (1.0 - u);
            }
        }
    }
}

/// One explicit Euler step with operator splitting: swap the buffers so the
/// stencil reads the prior step's values, diffuse, then react.
pub fn advance(current: &mut Field, previous: &mut Field, alpha: f64, deltat: f64) {
    std::mem::swap(current, previous);
    diffuse(current, previous, alpha);
    react(current, previous, deltat);
}

impl<'a> Fisher<'a> {
    pub fn new(
        comm: &'a SimpleCommunicator,
        domain: Domain,
        params: Parameters,
        filename: String,
        hybrid_output: bool,
    ) -> Self {
        let mut current = Field::zeros(domain.ni, domain.nj, domain.nk);
        let mut previous = Field::zeros(domain.ni, domain.nj, domain.nk);
        apply_boundaries(&mut current, &domain, params.amplitude);
        apply_boundaries(&mut previous, &domain, params.amplitude);
        Self {
            comm,
            domain,
            params,
            current,
            previous,
            filename,
            hybrid_output,
        }
    }

    /// Refreshes both guard planes from the adjacent slabs. Sends go out
    /// nonblocking before the blocking receives, so adjacent ranks cannot
    /// deadlock; a Boundary neighbor turns that half into a no-op. Must
    /// complete before the stencil reads any guard value.
    fn halo_exchange(&mut self) {
        let comm = self.comm;
        let (left, right) = (self.domain.left, self.domain.right);
        let HaloParts {
            guard_left,
            send_left,
            send_right,
            guard_right,
        } = self.current.halo_parts();
        mpi::request::scope(|scope| {
            let to_left = match left {
                Neighbor::Rank(r) => {
                    Some(comm.process_at_rank(r).immediate_send(scope, send_left))
                }
                Neighbor::Boundary => None,
            };
            let to_right = match right {
                Neighbor::Rank(r) => {
                    Some(comm.process_at_rank(r).immediate_send(scope, send_right))
                }
                Neighbor::Boundary => None,
            };
            if let Neighbor::Rank(r) = left {
                let _ = comm.process_at_rank(r).receive_into(guard_left);
            }
            if let Neighbor::Rank(r) = right {
                let _ = comm.process_at_rank(r).receive_into(guard_right);
            }
            if let Some(request) = to_left {
                request.wait_without_status();
            }
            if let Some(request) = to_right {
                request.wait_without_status();
            }
        });
    }

    /// Runs the full step loop. Snapshots are written before the step they
    /// precede, so each records the field as of the time stamp it carries.
    pub fn run(&mut self) -> Result<()> {
        let nsteps = self.params.nsteps();
        let interval = self.params.snapshot_interval();
        let dx = self.params.dx();
        let alpha = self.params.alpha();
        let deltat = self.params.deltat;
        if self.comm.rank() == 0 {
            eprintln!("#alpha {}", alpha);
        }
        for s in 0..=nsteps {
            if s % interval == 0 {
                output::write_snapshot(
                    self.comm,
                    &self.domain,
                    s as f64 * deltat,
                    dx,
                    &self.current,
                    &self.filename,
                    self.hybrid_output,
                )?;
            }
            self.halo_exchange();
            advance(&mut self.current, &mut self.previous, alpha, deltat);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn single_slab(points: usize) -> Domain {
        Domain {
            ni: points,
            nj: points,
            nk: points,
            ioffset: 0,
            left: Neighbor::Boundary,
            right: Neighbor::Boundary,
        }
    }

    fn boundary_pair(points: usize, amplitude: f64) -> (Field, Field) {
        let domain = single_slab(points);
        let mut current = Field::zeros(points, points, points);
        let mut previous = Field::zeros(points, points, points);
        apply_boundaries(&mut current, &domain, amplitude);
        apply_boundaries(&mut previous, &domain, amplitude);
        (current, previous)
    }

    #[test]
    fn boundary_planes_are_stamped_and_interior_is_zero() {
        let (field, _) = boundary_pair(5, 1.0);
        assert_eq!(field[(0, 2, 2)], 1.0);
        assert_eq!(field[(4, 2, 2)], 1.0);
        assert_eq!(field[(2, 0, 2)], 1.0);
        assert_eq!(field[(2, 4, 2)], 1.0);
        assert_eq!(field[(2, 2, 0)], 1.0);
        assert_eq!(field[(2, 2, 4)], 1.0);
        assert_eq!(field[(2, 2, 2)], 0.0);
        assert_eq!(field[(1, 2, 2)], 0.0);
    }

    #[test]
    fn interior_ranks_do_not_stamp_i_faces() {
        let domain = Domain {
            ni: 4,
            nj: 10,
            nk: 10,
            ioffset: 3,
            left: Neighbor::Rank(0),
            right: Neighbor::Rank(2),
        };
        let mut field = Field::zeros(4, 10, 10);
        apply_boundaries(&mut field, &domain, 1.0);
        assert_eq!(field[(0, 5, 5)], 0.0);
        assert_eq!(field[(3, 5, 5)], 0.0);
        assert_eq!(field[(0, 0, 5)], 1.0);
        assert_eq!(field[(2, 5, 9)], 1.0);
    }

    #[test]
    fn one_step_diffuses_alpha_a_into_face_adjacent_cells() {
        let alpha = 0.05;
        let deltat = 0.001;
        let (mut current, mut previous) = boundary_pair(5, 1.0);
        advance(&mut current, &mut previous, alpha, deltat);
        // One boundary face (i=0) feeds this cell; the reaction term at
        // u=0 contributes nothing.
        assert!(approx_eq!(f64, current[(1, 2, 2)], alpha, epsilon = 1e-15));
        // The center cell sees only zero neighbors.
        assert_eq!(current[(2, 2, 2)], 0.0);
        // A cell next to both a j and a k face receives two contributions.
        assert!(approx_eq!(
            f64,
            current[(2, 1, 1)],
            2.0 * alpha,
            epsilon = 1e-15
        ));
    }

    #[test]
    fn guard_planes_keep_the_stamped_value_across_steps() {
        let (mut current, mut previous) = boundary_pair(5, 1.0);
        for _ in 0..4 {
            advance(&mut current, &mut previous, 0.05, 0.001);
        }
        for j in 0..5 {
            for k in 0..5 {
                assert_eq!(current[(0, j, k)], 1.0);
                assert_eq!(current[(4, j, k)], 1.0);
            }
        }
        for i in 0..5 {
            for k in 0..5 {
                assert_eq!(current[(i, 0, k)], 1.0);
                assert_eq!(current[(i, 4, k)], 1.0);
            }
        }
    }

    #[test]
    fn reaction_follows_the_logistic_term() {
        let points = 5;
        let domain = single_slab(points);
        let mut current = Field::zeros(points, points, points);
        let mut previous = Field::zeros(points, points, points);
        apply_boundaries(&mut current, &domain, 0.0);
        apply_boundaries(&mut previous, &domain, 0.0);
        current[(2, 2, 2)] = 0.5;
        let deltat = 0.01;
        // alpha = 0 isolates the reaction; neighbors of the seeded cell
        // still pick up nothing because diffusion is switched off.
        advance(&mut current, &mut previous, 0.0, deltat);
        assert!(approx_eq!(
            f64,
            current[(2, 2, 2)],
            0.5 + deltat * 0.5 * 0.5,
            epsilon = 1e-15
        ));
    }
}
