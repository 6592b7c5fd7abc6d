pub mod eula;
pub mod properties;

pub use eula::accept_eula;
pub use properties::{write_difficulty, Difficulty};
