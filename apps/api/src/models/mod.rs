pub mod coverage;
pub mod resume;
