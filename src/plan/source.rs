// src/plan/source.rs
// =============================================================================
// Runs the course-plan command and parses its line-oriented output.
//
// How it works:
// 1. `<cmd> plans` once, to list every plan
// 2. `<cmd> courses <plan_id>` per plan, several at a time
// 3. Keep only courses that have a repository in repos_list.txt
//
// A plan whose course listing fails is left out of the result and its id
// is reported back to the caller; it does not stop the other plans.
// =============================================================================

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tokio::process::Command;
use tracing::{debug, warn};

/// One course inside a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub code: String,
    pub name: String,
}

/// A major's curriculum for one enrolment year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub plan_id: String,
    pub year: String,
    pub major_code: String,
    pub major_name: String,
    pub courses: Vec<Course>,
}

impl Plan {
    /// Drops courses that have no repository.
    pub fn retain_known(&mut self, known_repos: &HashSet<String>) {
        self.courses.retain(|course| known_repos.contains(&course.code));
    }
}

/// Result of loading every plan
#[derive(Debug, Default)]
pub struct PlanLoad {
    pub plans: Vec<Plan>,
    /// Plan ids whose course listing could not be read
    pub failed: Vec<String>,
}

/// Lists all plans and their (known) courses.
///
/// Failing to list plans at all is fatal; failing one plan's courses is not.
pub async fn load_plans(
    command: &str,
    known_repos: &HashSet<String>,
    concurrency: usize,
) -> Result<PlanLoad> {
    let output = run_command(command, &["plans"]).await?;
    let plans: Vec<Plan> = output.lines().filter_map(parse_plan_line).collect();

    debug!(count = plans.len(), "listed plans");

    let results: Vec<(Plan, Result<Vec<Course>>)> = stream::iter(plans)
        .map(|plan| async move {
            let courses = list_courses(command, &plan.plan_id).await;
            (plan, courses)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut load = PlanLoad::default();
    for (mut plan, courses) in results {
        match courses {
            Ok(courses) => {
                plan.courses = courses;
                plan.retain_known(known_repos);
                load.plans.push(plan);
            }
            Err(e) => {
                // No pages and no manifests for a plan we could not read
                warn!(
                    plan = %plan.plan_id,
                    error = %format!("{:#}", e),
                    "failed to list courses"
                );
                load.failed.push(plan.plan_id);
            }
        }
    }

    // buffer_unordered finishes in any order; keep output stable
    load.plans.sort_by(|a, b| a.plan_id.cmp(&b.plan_id));
    load.failed.sort();
    Ok(load)
}

async fn list_courses(command: &str, plan_id: &str) -> Result<Vec<Course>> {
    let output = run_command(command, &["courses", plan_id]).await?;
    Ok(output.lines().filter_map(parse_course_line).collect())
}

async fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .with_context(|| format!("failed to run `{} {}`", program, args.join(" ")))?;

    if !output.status.success() {
        bail!(
            "`{} {}` exited with {}: {}",
            program,
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    String::from_utf8(output.stdout)
        .with_context(|| format!("`{} {}` printed invalid UTF-8", program, args.join(" ")))
}

// "plan_id year major_code major name..." -> Plan
//
// The major name is everything after the third field, so names with
// spaces survive.
fn parse_plan_line(line: &str) -> Option<Plan> {
    let mut fields = line.split_whitespace();
    let plan_id = fields.next()?;
    let year = fields.next()?;
    let major_code = fields.next()?;
    let major_name = fields.collect::<Vec<_>>().join(" ");

    if major_name.is_empty() {
        warn!(line, "skipping malformed plan line");
        return None;
    }

    Some(Plan {
        plan_id: plan_id.to_string(),
        year: year.to_string(),
        major_code: major_code.to_string(),
        major_name,
        courses: Vec::new(),
    })
}

// "course_code course name..." -> Course
fn parse_course_line(line: &str) -> Option<Course> {
    let mut fields = line.split_whitespace();
    let code = fields.next()?;
    let name = fields.collect::<Vec<_>>().join(" ");

    if name.is_empty() {
        warn!(line, "skipping malformed course line");
        return None;
    }

    Some(Course {
        code: code.to_string(),
        name,
    })
}
