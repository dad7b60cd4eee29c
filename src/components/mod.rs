//! Reusable view components.

pub mod thought_cloud;
