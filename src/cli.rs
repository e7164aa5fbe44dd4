use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "MPI solver for the 3D KPP-Fisher reaction-diffusion equation"
)]
pub struct Cli {
    // Grid and domain settings
    /// Number of grid points per axis
    #[arg(short = 'N', long, default_value = "100")]
    pub points: i32,
    /// Length of the domain interval
    #[arg(short = 'L', long, default_value = "10.0")]
    pub length: f64,
    /// Boundary driving amplitude
    #[arg(short = 'A', long, default_value = "1.0")]
    pub amplitude: f64,

    // Simulation settings
    /// Time to simulate
    #[arg(short = 'T', long, default_value = "1.0")]
    pub time: f64,
    /// Time step
    #[arg(short = 'D', long, default_value = "0.001")]
    pub deltat: f64,
    /// Number of snapshots to output
    #[arg(short = 'P', long, default_value = "10")]
    pub snapshots: i32,

    // I/O settings
    /// Output file
    #[arg(short = 'F', long, default_value = "output.dat")]
    pub filename: String,
    /// Format snapshot planes with a thread pool
    #[arg(long)]
    pub hybrid_output: bool,

    /// Check the explicit-Euler stability bound before running
    #[arg(long)]
    pub check_stability: bool,
    #[arg(long)]
    pub verbose: bool,
}
