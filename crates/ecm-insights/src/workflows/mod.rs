pub mod extraction;
pub mod portfolio;
