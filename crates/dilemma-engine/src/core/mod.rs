pub use self::{grid::*, seed::*, strategy::*};

pub(crate) mod grid;
pub(crate) mod seed;
pub(crate) mod strategy;
