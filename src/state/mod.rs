//! State module for tracking pipeline progress
//!
//! The pipeline moves through three stages. Each stage is tracked per topic
//! (except the topic list itself) and is re-enterable from its predecessor's
//! checkpoint.

mod stage_state;

pub use stage_state::{Stage, StageState};
