mod repository;
mod sample;

pub use repository::*;
pub use sample::*;
