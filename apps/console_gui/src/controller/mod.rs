//! Controller layer: UI events, reducer-driven workflow transitions, and
//! command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
