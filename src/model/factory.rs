use super::{Domain, Fisher, Parameters};
use crate::config::Config;
use crate::error::Result;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

pub struct FisherFactory;

impl FisherFactory {
    /// Validates the parameters, decomposes the grid across the
    /// communicator and builds the solver. Validation runs identically on
    /// every rank, so a bad configuration fails everywhere at once instead
    /// of leaving survivors blocked in the decomposition scan.
    pub fn create<'a>(comm: &'a SimpleCommunicator, config: &Config) -> Result<Fisher<'a>> {
        let params = Parameters::from_config(config);
        params.validate()?;
        if config.check_stability() {
            params.check_stability()?;
        }
        if comm.rank() == 0 {
            params.warn();
        }
        let domain = Domain::decompose(comm, params.points)?;
        if config.verbose() {
            eprintln!(
                "# rank {}: {} interior planes at global offset {}",
                comm.rank(),
                domain.owned_planes(),
                domain.ioffset
            );
        }
        Ok(Fisher::new(
            comm,
            domain,
            params,
            config.filename(),
            config.hybrid_output(),
        ))
    }
}
