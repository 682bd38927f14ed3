// Heuristic résumé and job-description analysis.
// Every stage is pure and synchronous; handlers move work onto blocking threads.

pub mod contact;
pub mod content_selector;
pub mod coverage;
pub mod education;
pub mod experience;
pub mod fit_scoring;
pub mod handlers;
pub mod jd_parser;
pub mod lexicon;
pub mod period;
pub mod pipeline;
pub mod skills;
pub mod text;
