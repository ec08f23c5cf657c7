// src/summary.rs
// =============================================================================
// Run summary: how many items were processed, modified and skipped.
//
// A build is expected to end with some skips (a repo without a README, a
// plan the CLI could not list). That is partial success, not failure, so
// the summary only reports; it never decides the exit code.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

/// One skipped item and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    pub item: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub modified: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skips: Vec<Skip>,
}

impl RunSummary {
    pub fn record_processed(&mut self, modified: bool) {
        self.processed += 1;
        if modified {
            self.modified += 1;
        }
    }

    pub fn record_skip(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.skipped += 1;
        self.skips.push(Skip {
            item: item.into(),
            reason: reason.into(),
        });
    }
}

/// Prints the summary either as a table or JSON
pub fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_table(summary);
    }
    Ok(())
}

fn print_table(summary: &RunSummary) {
    if !summary.skips.is_empty() {
        println!("{:<40} {:<60}", "SKIPPED", "REASON");
        println!("{}", "=".repeat(100));

        for skip in &summary.skips {
            // Truncate long reasons (on a char boundary) for display
            let reason = if skip.reason.chars().count() > 57 {
                format!("{}...", skip.reason.chars().take(57).collect::<String>())
            } else {
                skip.reason.clone()
            };
            println!("{:<40} {:<60}", skip.item, reason);
        }

        println!();
    }

    println!("📊 Summary:");
    println!("   ✅ Processed: {}", summary.processed);
    println!("   ✏️  Modified: {}", summary.modified);
    println!("   ⏭️  Skipped: {}", summary.skipped);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut summary = RunSummary::default();
        summary.record_processed(true);
        summary.record_processed(false);
        summary.record_skip("COMP1001", "README not found");

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.modified, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skips[0].item, "COMP1001");
    }

    #[test]
    fn test_json_shape() {
        let summary = RunSummary::default();
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["processed"], 0);
        assert!(value.get("skips").is_none());
    }
}
