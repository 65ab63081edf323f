// Domain layer - Chart configuration model and pure algorithms
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod edit;
pub mod entity;
pub mod format;
pub mod modal;
pub mod render;
pub mod template;
