// src/plan/mod.rs
// =============================================================================
// This module reads the curriculum: which majors exist per year and which
// courses each major's plan contains.
//
// The data comes from an external command-line tool (`hoa` by default):
//   hoa plans              -> "plan_id year major_code major_name" per line
//   hoa courses <plan_id>  -> "course_code course_name" per line
//
// Rust concepts:
// - tokio::process: running a child process without blocking the runtime
// - HashSet: filtering courses down to repositories we know about
// =============================================================================

mod source;

pub use source::{load_plans, Course, Plan, PlanLoad};
