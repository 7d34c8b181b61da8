pub mod bundles;
pub mod handlers;
pub mod report;
