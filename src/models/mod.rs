pub mod account;
pub mod analysis;
pub mod dashboard;
pub mod facets;
pub mod issue;
