//! Trial engines for vestibular and visual self-motion experiments.
//!
//! The host renders the scene and samples the hand controller; this crate
//! decides what to show, moves the observer through each trial and writes
//! response and head-tracking files.

pub mod conditions;
pub mod config;
pub mod dialog;
pub mod error;
pub mod input;
pub mod kinematics;
pub mod menu;
pub mod recording;
pub mod scene;
pub mod session;
pub mod tasks;

pub use config::SessionConfig;
pub use error::{HomebaseError, Result};
pub use session::{HostFrame, Session, SessionStatus};
