use crate::cli::Cli;
use crate::error::{Error, Result};
use clap::error::ErrorKind;
use clap::Parser;
use mpi::topology::Rank;
use mpi::traits::*;

pub const ROOT: Rank = 0;

const FILENAME_CAPACITY: usize = 128;

/// Fixed-layout parameter record, identical on every rank after one broadcast.
#[derive(Equivalence, Clone, Copy)]
pub struct Config {
    snapshots: i32,
    points: i32,
    hybrid_output: i32,
    check_stability: i32,
    verbose: i32,
    length: f64,
    amplitude: f64,
    time: f64,
    deltat: f64,
    filename: [u8; FILENAME_CAPACITY],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshots: 0,
            points: 0,
            hybrid_output: 0,
            check_stability: 0,
            verbose: 0,
            length: 0.0,
            amplitude: 0.0,
            time: 0.0,
            deltat: 0.0,
            filename: [0; FILENAME_CAPACITY],
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let bytes = cli.filename.as_bytes();
        if bytes.is_empty() {
            return Err(Error::invalid_parameters("Output file name must not be empty"));
        }
        if bytes.len() >= FILENAME_CAPACITY {
            return Err(Error::invalid_parameters(&format!(
                "Output file name exceeds {} bytes",
                FILENAME_CAPACITY - 1
            )));
        }
        let mut filename = [0u8; FILENAME_CAPACITY];
        filename[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            snapshots: cli.snapshots,
            points: cli.points,
            hybrid_output: cli.hybrid_output as i32,
            check_stability: cli.check_stability as i32,
            verbose: cli.verbose as i32,
            length: cli.length,
            amplitude: cli.amplitude,
            time: cli.time,
            deltat: cli.deltat,
            filename,
        })
    }

    pub fn snapshots(&self) -> i32 {
        self.snapshots
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn deltat(&self) -> f64 {
        self.deltat
    }

    pub fn hybrid_output(&self) -> bool {
        self.hybrid_output != 0
    }

    pub fn check_stability(&self) -> bool {
        self.check_stability != 0
    }

    pub fn verbose(&self) -> bool {
        self.verbose != 0
    }

    pub fn filename(&self) -> String {
        let end = self
            .filename
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FILENAME_CAPACITY);
        String::from_utf8_lossy(&self.filename[..end]).into_owned()
    }
}

/// Parses the command line on the root rank and broadcasts the resulting
/// record. Returns `None` when help or version output was requested, so all
/// ranks can exit cleanly together.
pub fn broadcast(comm: &impl Communicator) -> Result<Option<Config>> {
    let rank = comm.rank();
    let mut status: i32 = 0;
    let mut config = Config::default();
    if rank == ROOT {
        match Cli::try_parse() {
            Ok(cli) => match Config::from_cli(&cli) {
                Ok(c) => config = c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    status = 2;
                }
            },
            Err(e) if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion => {
                let _ = e.print();
                status = 1;
            }
            Err(e) => {
                let _ = e.print();
                status = 2;
            }
        }
    }
    comm.process_at_rank(ROOT).broadcast_into(&mut status);
    match status {
        0 => {
            comm.process_at_rank(ROOT).broadcast_into(&mut config);
            Ok(Some(config))
        }
        1 => Ok(None),
        _ => Err(Error::invalid_parameters("could not read the command line")),
    }
}
