//! Controller layer: UI events, reducer-style state transitions, and command
//! orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
