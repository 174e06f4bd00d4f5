//! Data models for transcripts and course plans

pub mod course;
pub mod grade;
pub mod semester;

pub use course::{identity_of, CourseRecord};
pub use grade::{GradeEffect, GradeLabel};
pub use semester::{DegreeSummary, ParsedTranscript, Semester};
