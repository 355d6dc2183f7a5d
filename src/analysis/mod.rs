pub mod filters;
pub mod keywords;
pub mod overview;
pub mod priority;
pub mod workflow;
