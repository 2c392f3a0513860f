pub mod bot;
pub mod camera;
pub mod clock;
pub mod command;
pub mod logging;
pub mod outcome;
pub mod regeneration;

pub use bot::*;
pub use camera::*;
pub use clock::*;
pub use command::*;
pub use logging::*;
pub use outcome::*;
pub use regeneration::*;
