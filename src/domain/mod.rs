mod expense;
mod money;
mod participant;
mod settlement;
mod trip;

pub use expense::*;
pub use money::*;
pub use participant::*;
pub use settlement::*;
pub use trip::*;
