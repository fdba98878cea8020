//! Pull request title and body for a batch picked onto its own branch.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::state::BatchResult;
use crate::core::plan::BatchPlan;
use crate::core::types::Group;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("hardcoded pattern must be valid"));

const UNKNOWN: &str = "unknown";

/// Values available to PR title and body templates
#[derive(Debug, Clone)]
pub struct PrSummary<'a> {
    pub emoji: &'a str,
    /// Groups that got at least one commit applied, in plan order
    pub picked: Vec<&'a Group>,
    pub total_selected: usize,
    pub commit_count: usize,
    pub commit_skipped: usize,
    pub source_branch: Option<&'a str>,
    pub target_branch: Option<&'a str>,
    pub owner: Option<&'a str>,
    pub repo: Option<&'a str>,
    pub now: DateTime<Utc>,
}

impl<'a> PrSummary<'a> {
    /// Summarise a finished batch. Picked groups come from the result's
    /// group tracking; without it no group is listed.
    pub fn from_result(
        emoji: &'a str,
        plan: &'a BatchPlan,
        result: &BatchResult,
        now: DateTime<Utc>,
    ) -> Self {
        let picked_ids = result.groups_with_applied_commits.as_deref().unwrap_or(&[]);
        let picked = plan
            .groups
            .iter()
            .filter(|g| picked_ids.contains(&g.id))
            .collect();
        Self {
            emoji,
            picked,
            total_selected: plan.groups.len(),
            commit_count: result.applied_count,
            commit_skipped: result.skipped_count,
            source_branch: None,
            target_branch: None,
            owner: None,
            repo: None,
            now,
        }
    }

    fn pr_list(&self) -> String {
        self.picked
            .iter()
            .map(|g| {
                format!(
                    "- #{}: {} (@{})",
                    g.id,
                    g.title,
                    g.author.as_deref().unwrap_or(UNKNOWN)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn pr_list_plain(&self) -> String {
        self.picked
            .iter()
            .map(|g| format!("#{}", g.id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn value(&self, name: &str) -> Option<String> {
        let value = match name {
            "emoji" => self.emoji.to_string(),
            "prCount" => self.picked.len().to_string(),
            "totalSelected" => self.total_selected.to_string(),
            "commitCount" => self.commit_count.to_string(),
            "commitSkipped" => self.commit_skipped.to_string(),
            "sourceBranch" => self.source_branch.unwrap_or(UNKNOWN).to_string(),
            "targetBranch" => self.target_branch.unwrap_or(UNKNOWN).to_string(),
            "owner" => self.owner.unwrap_or(UNKNOWN).to_string(),
            "repo" => self.repo.unwrap_or(UNKNOWN).to_string(),
            "date" => self.now.format("%Y-%m-%d").to_string(),
            "timestamp" => self.now.timestamp().to_string(),
            "prList" => self.pr_list(),
            "prListPlain" => self.pr_list_plain(),
            _ => return None,
        };
        Some(value)
    }

    /// Substitute `{{name}}` placeholders; unknown names are left as written
    pub fn render_template(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                self.value(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    pub fn title(&self, template: Option<&str>) -> String {
        match template {
            Some(template) => self.render_template(template),
            None => {
                let count = self.picked.len();
                format!(
                    "{} {} PR{} ({} selected)",
                    self.emoji,
                    count,
                    if count == 1 { "" } else { "s" },
                    self.total_selected
                )
            }
        }
    }

    pub fn body(&self, template: Option<&str>) -> String {
        if let Some(template) = template {
            return self.render_template(template);
        }

        let mut body = format!("## {} Summary\n\n", self.emoji);
        if !self.picked.is_empty() {
            body.push_str("Cherry-picked commits from the following pull requests:\n\n");
            body.push_str(&self.pr_list());
            body.push_str("\n\n");
        }
        body.push_str("### Statistics\n\n");
        body.push_str(&format!("- **Total PRs selected**: {}\n", self.total_selected));
        body.push_str(&format!("- **PRs with picked commits**: {}\n", self.picked.len()));
        body.push_str(&format!("- **Commits cherry-picked**: {}\n", self.commit_count));
        body.push_str(&format!("- **Commits skipped**: {}\n", self.commit_skipped));
        body
    }
}

/// Name for a fresh pick branch, e.g. `prpick/auto-2024-05-01T09-30-00`
pub fn pr_branch_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}/auto-{}", prefix, now.format("%Y-%m-%dT%H-%M-%S"))
}
