//! Exhibit command-line front end
//!
//! Library half of the `exhibit` binary: the exhibit record layer and
//! store configuration resolution, kept here so they can be tested
//! without spawning the binary.

pub mod exhibits;
pub mod settings;

pub use exhibits::{Choice, Exhibit, Exhibits, NewExhibit};
