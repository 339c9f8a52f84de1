pub mod doctor;
pub mod enums;
pub mod gallery;
pub mod patient;
pub mod schedule;
pub mod visit;

pub use doctor::*;
pub use enums::*;
pub use gallery::*;
pub use patient::*;
pub use schedule::*;
pub use visit::*;
