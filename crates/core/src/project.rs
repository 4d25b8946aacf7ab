//! Project lifecycle rules, deadline helpers, and progress-log analytics.
//!
//! A project's status is driven by the progress percentage submitted with
//! each update: 0 means `planning`, 100 means `completed`, anything in
//! between means `in_progress`. Completion is sticky and stamps
//! `actual_end_date` exactly once. `on_hold` is never derived; it only
//! arrives through an explicit edit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on_hold",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "planning" => Ok(ProjectStatus::Planning),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "on_hold" => Ok(ProjectStatus::OnHold),
            other => Err(CoreError::Validation(format!(
                "Invalid project status '{other}'. Must be one of: planning, in_progress, completed, on_hold"
            ))),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ProjectPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectPriority::Low => "low",
            ProjectPriority::Medium => "medium",
            ProjectPriority::High => "high",
            ProjectPriority::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Individual,
    Team,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Individual => "individual",
            ProjectType::Team => "team",
        }
    }
}

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

/// Smallest accepted progress value.
pub const MIN_PROGRESS: i32 = 0;
/// Largest accepted progress value.
pub const MAX_PROGRESS: i32 = 100;

/// Reject progress values outside `0..=100`.
pub fn validate_progress(progress: i32) -> Result<(), CoreError> {
    if !(MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        return Err(CoreError::Validation(format!(
            "progress_percentage must be between {MIN_PROGRESS} and {MAX_PROGRESS}, got {progress}"
        )));
    }
    Ok(())
}

/// Status implied by a newly submitted progress value.
pub fn derive_project_status(progress: i32, previous: ProjectStatus) -> ProjectStatus {
    match progress {
        MIN_PROGRESS => ProjectStatus::Planning,
        MAX_PROGRESS => ProjectStatus::Completed,
        _ if previous == ProjectStatus::Completed => ProjectStatus::Completed,
        _ => ProjectStatus::InProgress,
    }
}

/// Result of applying a progress update to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTransition {
    pub status: ProjectStatus,
    pub actual_end_date: Option<Date>,
}

/// Compute the new status and end date after a progress submission.
///
/// `actual_end_date` is stamped with today only on the first transition
/// into `completed`. An existing end date is never overwritten.
pub fn apply_progress_update(
    progress: i32,
    previous_status: ProjectStatus,
    previous_end_date: Option<Date>,
    now: Timestamp,
) -> Result<ProgressTransition, CoreError> {
    validate_progress(progress)?;

    let status = derive_project_status(progress, previous_status);
    let actual_end_date = match previous_end_date {
        Some(existing) => Some(existing),
        None if status == ProjectStatus::Completed
            && previous_status != ProjectStatus::Completed =>
        {
            Some(now.date_naive())
        }
        None => None,
    };

    Ok(ProgressTransition {
        status,
        actual_end_date,
    })
}

/// Validate a status set by hand on a project edit.
///
/// Completion is terminal. `on_hold` and `completed` may be set at any
/// other time; `planning` and `in_progress` only when they agree with the
/// recorded progress.
pub fn check_manual_status(
    current: ProjectStatus,
    requested: ProjectStatus,
    progress: i32,
) -> Result<ProjectStatus, CoreError> {
    if current == ProjectStatus::Completed && requested != ProjectStatus::Completed {
        return Err(CoreError::Validation(format!(
            "A completed project cannot move back to {requested}"
        )));
    }
    match requested {
        ProjectStatus::OnHold | ProjectStatus::Completed => Ok(requested),
        ProjectStatus::Planning | ProjectStatus::InProgress => {
            let implied = derive_project_status(progress, current);
            if implied != requested {
                return Err(CoreError::Validation(format!(
                    "Status {requested} contradicts recorded progress of {progress}%"
                )));
            }
            Ok(requested)
        }
    }
}

/// Read-side view of a completed project: progress pinned to 100 and an end
/// date always present.
///
/// Returns `(progress, actual_end_date)`. Projects that are not completed
/// are returned unchanged.
pub fn normalize_completed(
    status: ProjectStatus,
    progress: i32,
    actual_end_date: Option<Date>,
    now: Timestamp,
) -> (i32, Option<Date>) {
    if status != ProjectStatus::Completed {
        return (progress, actual_end_date);
    }
    (
        MAX_PROGRESS,
        actual_end_date.or_else(|| Some(now.date_naive())),
    )
}

/// Validate that a project's expected end falls after its start.
pub fn validate_schedule(start_date: Date, expected_end_date: Date) -> Result<(), CoreError> {
    if expected_end_date <= start_date {
        return Err(CoreError::Validation(
            "expected_end_date must be after start_date".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

/// Signed whole days from today until the expected end (negative when late).
pub fn days_remaining(expected_end_date: Date, now: Timestamp) -> i64 {
    (expected_end_date - now.date_naive()).num_days()
}

/// A project is overdue when its expected end has passed and it is not completed.
pub fn is_overdue(status: ProjectStatus, expected_end_date: Date, now: Timestamp) -> bool {
    status != ProjectStatus::Completed && now.date_naive() > expected_end_date
}

/// Per-status counts for a supervisor's project list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub planning: usize,
    pub on_hold: usize,
    pub overdue: usize,
}

impl ProjectStats {
    pub fn record(&mut self, status: ProjectStatus, overdue: bool) {
        self.total += 1;
        match status {
            ProjectStatus::Completed => self.completed += 1,
            ProjectStatus::InProgress => self.in_progress += 1,
            ProjectStatus::Planning => self.planning += 1,
            ProjectStatus::OnHold => self.on_hold += 1,
        }
        if overdue {
            self.overdue += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Analytics over the progress log
// ---------------------------------------------------------------------------

/// The fields of a project update the analytics need.
#[derive(Debug, Clone, Copy)]
pub struct UpdateRecord<'a> {
    pub created_at: Timestamp,
    pub progress_percentage: i32,
    pub progress_description: &'a str,
    pub challenges_faced: Option<&'a str>,
    pub resources_needed: Option<&'a str>,
    pub accepted_resources: Option<&'a str>,
}

/// How many top challenges the analytics report.
pub const TOP_CHALLENGES: usize = 5;

/// Split a comma-separated free-text field into trimmed, non-empty items.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateFrequency {
    /// Mean whole days between consecutive updates; 0 with fewer than two.
    pub average_days: f64,
    pub last_update: Option<Timestamp>,
}

pub fn update_frequency(updates: &[UpdateRecord<'_>]) -> UpdateFrequency {
    let mut dates: Vec<Timestamp> = updates.iter().map(|u| u.created_at).collect();
    dates.sort();

    let gaps: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days().abs())
        .collect();

    let average_days = if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().sum::<i64>() as f64 / gaps.len() as f64
    };

    UpdateFrequency {
        average_days,
        last_update: dates.last().copied(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: Date,
    pub progress: i32,
    pub description: String,
}

/// Progress values in submission order.
pub fn progress_timeline(updates: &[UpdateRecord<'_>]) -> Vec<TimelinePoint> {
    let mut sorted: Vec<&UpdateRecord<'_>> = updates.iter().collect();
    sorted.sort_by_key(|u| u.created_at);
    sorted
        .into_iter()
        .map(|u| TimelinePoint {
            date: u.created_at.date_naive(),
            progress: u.progress_percentage,
            description: u.progress_description.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Count occurrences, most frequent first. Ties keep first-seen order.
fn count_by(items: impl IntoIterator<Item = String>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|c| c.label == item) {
            Some(existing) => existing.count += 1,
            None => counts.push(LabelCount {
                label: item,
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The most frequently reported challenges, capped at [`TOP_CHALLENGES`].
pub fn common_challenges(updates: &[UpdateRecord<'_>]) -> Vec<LabelCount> {
    let mut counts = count_by(updates.iter().flat_map(|u| split_list(u.challenges_faced)));
    counts.truncate(TOP_CHALLENGES);
    counts
}

/// Every requested resource with its request count.
pub fn resource_requests(updates: &[UpdateRecord<'_>]) -> Vec<LabelCount> {
    count_by(updates.iter().flat_map(|u| split_list(u.resources_needed)))
}

/// Resources requested in some update but not accepted in that same update.
///
/// Unique, in first-requested order.
pub fn unresolved_resources(updates: &[UpdateRecord<'_>]) -> Vec<String> {
    let mut unresolved: Vec<String> = Vec::new();
    for update in updates {
        let accepted = split_list(update.accepted_resources);
        for resource in split_list(update.resources_needed) {
            if !accepted.contains(&resource) && !unresolved.contains(&resource) {
                unresolved.push(resource);
            }
        }
    }
    unresolved
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    use super::*;

    const ALL_STATUSES: [ProjectStatus; 4] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    fn record(days: i64, challenges: Option<&'static str>) -> UpdateRecord<'static> {
        UpdateRecord {
            created_at: now() + Duration::days(days),
            progress_percentage: 10 * days as i32,
            progress_description: "worked on it",
            challenges_faced: challenges,
            resources_needed: None,
            accepted_resources: None,
        }
    }

    #[test]
    fn zero_progress_is_planning_from_any_status() {
        for previous in ALL_STATUSES {
            assert_eq!(derive_project_status(0, previous), ProjectStatus::Planning);
        }
    }

    #[test]
    fn full_progress_is_completed_from_any_status() {
        for previous in ALL_STATUSES {
            assert_eq!(derive_project_status(100, previous), ProjectStatus::Completed);
        }
    }

    #[test]
    fn completion_is_sticky_for_partial_progress() {
        assert_eq!(
            derive_project_status(50, ProjectStatus::Completed),
            ProjectStatus::Completed
        );
        assert_eq!(
            derive_project_status(50, ProjectStatus::Planning),
            ProjectStatus::InProgress
        );
        assert_eq!(
            derive_project_status(50, ProjectStatus::OnHold),
            ProjectStatus::InProgress
        );
    }

    #[test]
    fn first_completion_stamps_end_date() {
        let t = apply_progress_update(100, ProjectStatus::InProgress, None, now()).unwrap();
        assert_eq!(t.status, ProjectStatus::Completed);
        assert_eq!(t.actual_end_date, Some(now().date_naive()));
    }

    #[test]
    fn planning_has_no_end_date() {
        let t = apply_progress_update(0, ProjectStatus::Planning, None, now()).unwrap();
        assert_eq!(t.status, ProjectStatus::Planning);
        assert_eq!(t.actual_end_date, None);
    }

    #[test]
    fn existing_end_date_is_kept() {
        let earlier = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let t =
            apply_progress_update(100, ProjectStatus::Completed, Some(earlier), now()).unwrap();
        assert_eq!(t.actual_end_date, Some(earlier));

        let t = apply_progress_update(60, ProjectStatus::Completed, Some(earlier), now()).unwrap();
        assert_eq!(t.status, ProjectStatus::Completed);
        assert_eq!(t.actual_end_date, Some(earlier));
    }

    #[test]
    fn completed_project_rejects_manual_reopen() {
        for requested in [
            ProjectStatus::Planning,
            ProjectStatus::InProgress,
            ProjectStatus::OnHold,
        ] {
            assert_matches!(
                check_manual_status(ProjectStatus::Completed, requested, 100),
                Err(CoreError::Validation(_))
            );
        }
        assert_matches!(
            check_manual_status(ProjectStatus::Completed, ProjectStatus::Completed, 100),
            Ok(ProjectStatus::Completed)
        );
    }

    #[test]
    fn manual_status_must_agree_with_progress() {
        assert_matches!(
            check_manual_status(ProjectStatus::InProgress, ProjectStatus::Planning, 40),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            check_manual_status(ProjectStatus::Planning, ProjectStatus::InProgress, 0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            check_manual_status(ProjectStatus::OnHold, ProjectStatus::InProgress, 40),
            Ok(ProjectStatus::InProgress)
        );
        assert_matches!(
            check_manual_status(ProjectStatus::OnHold, ProjectStatus::Planning, 0),
            Ok(ProjectStatus::Planning)
        );
    }

    #[test]
    fn hold_and_completion_can_be_set_by_hand() {
        for progress in [0, 40] {
            assert_matches!(
                check_manual_status(ProjectStatus::InProgress, ProjectStatus::OnHold, progress),
                Ok(ProjectStatus::OnHold)
            );
            assert_matches!(
                check_manual_status(ProjectStatus::Planning, ProjectStatus::Completed, progress),
                Ok(ProjectStatus::Completed)
            );
        }
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        assert_matches!(
            apply_progress_update(101, ProjectStatus::Planning, None, now()),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_progress(-1), Err(CoreError::Validation(_)));
        assert_matches!(validate_progress(0), Ok(()));
        assert_matches!(validate_progress(100), Ok(()));
    }

    #[test]
    fn normalize_pins_completed_projects() {
        let (progress, end) = normalize_completed(ProjectStatus::Completed, 80, None, now());
        assert_eq!(progress, 100);
        assert_eq!(end, Some(now().date_naive()));

        let (progress, end) = normalize_completed(ProjectStatus::InProgress, 80, None, now());
        assert_eq!(progress, 80);
        assert_eq!(end, None);
    }

    #[test]
    fn schedule_requires_end_after_start() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(validate_schedule(start, start).is_err());
        assert!(validate_schedule(start, start + Duration::days(1)).is_ok());
    }

    #[test]
    fn overdue_ignores_completed_projects() {
        let past = now().date_naive() - Duration::days(3);
        assert!(is_overdue(ProjectStatus::InProgress, past, now()));
        assert!(!is_overdue(ProjectStatus::Completed, past, now()));
        assert_eq!(days_remaining(past, now()), -3);
    }

    #[test]
    fn stats_count_each_status() {
        let mut stats = ProjectStats::default();
        stats.record(ProjectStatus::Completed, false);
        stats.record(ProjectStatus::InProgress, true);
        stats.record(ProjectStatus::InProgress, false);
        stats.record(ProjectStatus::OnHold, false);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.planning, 0);
    }

    #[test]
    fn frequency_averages_gaps() {
        let updates = [record(4, None), record(0, None), record(1, None)];
        let freq = update_frequency(&updates);
        assert_eq!(freq.average_days, 2.0);
        assert_eq!(freq.last_update, Some(now() + Duration::days(4)));
    }

    #[test]
    fn frequency_of_single_update_is_zero() {
        let freq = update_frequency(&[record(0, None)]);
        assert_eq!(freq.average_days, 0.0);
        assert_eq!(update_frequency(&[]).last_update, None);
    }

    #[test]
    fn timeline_is_chronological() {
        let updates = [record(2, None), record(1, None)];
        let points = progress_timeline(&updates);
        assert_eq!(points[0].progress, 10);
        assert_eq!(points[1].progress, 20);
    }

    #[test]
    fn challenges_are_trimmed_counted_and_capped() {
        let updates = [
            record(0, Some("time, budget ,scope")),
            record(1, Some("budget,people,time")),
            record(2, Some("budget, tooling, hardware,, ")),
        ];
        let top = common_challenges(&updates);
        assert_eq!(top.len(), TOP_CHALLENGES);
        assert_eq!(top[0].label, "budget");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].label, "time");
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn unresolved_resources_subtract_accepted() {
        let mut a = record(0, None);
        a.resources_needed = Some("GPU, lab access");
        a.accepted_resources = Some("lab access");
        let mut b = record(1, None);
        b.resources_needed = Some("GPU,dataset");
        let updates = [a, b];

        assert_eq!(unresolved_resources(&updates), vec!["GPU", "dataset"]);
        let requests = resource_requests(&updates);
        assert_eq!(requests[0].label, "GPU");
        assert_eq!(requests[0].count, 2);
    }

    #[test]
    fn status_strings_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(ProjectStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ProjectStatus::parse("archived").is_err());
    }
}
