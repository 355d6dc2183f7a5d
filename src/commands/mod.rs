pub mod accounts;
pub mod contact;
pub mod issues;
pub mod seed;
pub mod settings;
pub mod workflow;
