mod cli;
mod config;
mod error;
mod model;
mod output;

use config::Config;
use model::FisherFactory;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

fn main() {
    let universe = match mpi::initialize() {
        Some(universe) => universe,
        None => {
            eprintln!("Error: MPI could not be initialized");
            std::process::exit(1);
        }
    };
    let world = universe.world();

    world.barrier();
    let start = std::time::Instant::now();

    let config = match config::broadcast(&world) {
        Ok(Some(config)) => config,
        Ok(None) => return, // help or version output, nothing to simulate
        Err(e) => {
            if world.rank() == config::ROOT {
                eprintln!("Error: {}", e);
            }
            world.abort(2);
        }
    };

    if let Err(e) = run(&world, &config) {
        eprintln!("Error: {}", e);
        // Aborting tears down every rank; exiting locally would leave the
        // others blocked in the next collective call.
        world.abort(1);
    }

    if world.rank() == config::ROOT {
        eprintln!("Total time: {:.3} s", start.elapsed().as_secs_f64());
    }
}

fn run(world: &SimpleCommunicator, config: &Config) -> error::Result<()> {
    if world.rank() == config::ROOT {
        println!(
            "#P {}\n#L {}\n#A {}\n#N {}\n#T {}\n#D {}\n#F {}",
            config.snapshots(),
            config.length(),
            config.amplitude(),
            config.points(),
            config.time(),
            config.deltat(),
            config.filename()
        );
    }
    let mut solver = FisherFactory::create(world, config)?;
    solver.run()
}
