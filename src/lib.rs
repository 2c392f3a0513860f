//! Root Wars: hex-grid territory control with a naive opponent.
//!
//! The `simulation` module is the whole game core. Presentation (the terminal
//! front end) lives in the binary and only talks to the core through
//! [`simulation::TickInput`] and [`simulation::SessionSnapshot`].

pub mod simulation;
