pub mod ebm;
pub mod rbm;
pub mod spin_pair;

pub use ebm::*;
pub use rbm::*;
pub use spin_pair::*;
