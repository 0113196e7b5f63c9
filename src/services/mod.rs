pub mod catalog;
pub mod effort;
pub mod fatigue;
