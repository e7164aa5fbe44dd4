mod domain;
mod factory;
mod field;
mod fisher;
mod parameters;

pub use domain::{interior_planes, Domain, Neighbor};
pub use factory::FisherFactory;
pub use field::Field;
pub use fisher::{apply_boundaries, Fisher};
pub use parameters::Parameters;
