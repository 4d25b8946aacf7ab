//! Dashboard report aggregation.
//!
//! The `db` crate runs the grouping queries and hands back plain snapshots;
//! this module turns them into the report shapes the API returns. Reports
//! are rebuilt on every request.

use chrono::Datelike;
use serde::Serialize;

use crate::types::Timestamp;

/// Chart colours assigned to distribution slices, cycled in order.
pub const PALETTE: [&str; 9] = [
    "#4c1d95", "#5b21b6", "#6d28d9", "#7c3aed", "#8b5cf6", "#a78bfa", "#c4b5fd", "#ddd6fe",
    "#ede9fe",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const ADMIN_REPORT_TITLE: &str = "System Overview";

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Integer percentage rounded half up. Zero when `total` is zero.
pub fn percentage(part: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (part * 200 + total) / (total * 2)
}

/// Plain ratio. Zero when `total` is zero.
pub fn ratio(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    part as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub label: String,
    pub value: i64,
    pub color: &'static str,
}

/// Label/value slices ordered by value descending, then label.
pub fn distribution(rows: &[(String, i64)]) -> Vec<DistributionEntry> {
    let mut sorted: Vec<&(String, i64)> = rows.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| DistributionEntry {
            label: label.clone(),
            value: *value,
            color: PALETTE[i % PALETTE.len()],
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub count: i64,
}

/// Twelve buckets, January through December, zero-filled.
///
/// `rows` holds `(month number 1..=12, count)` pairs; out-of-range months
/// are ignored and repeated months are summed.
pub fn monthly_series(rows: &[(i32, i64)]) -> Vec<MonthlyPoint> {
    let mut counts = [0i64; 12];
    for &(month, count) in rows {
        if (1..=12).contains(&month) {
            counts[(month - 1) as usize] += count;
        }
    }
    MONTH_NAMES
        .iter()
        .zip(counts)
        .map(|(month, count)| MonthlyPoint { month, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Admin report
// ---------------------------------------------------------------------------

/// Raw counts for the system-wide report. Month rows cover the current year.
#[derive(Debug, Clone, Default)]
pub struct AdminSnapshot {
    pub total_users: i64,
    pub total_students: i64,
    pub total_universities: i64,
    pub total_events: i64,
    pub total_certificates: i64,
    pub participation_by_month: Vec<(i32, i64)>,
    pub students_by_university: Vec<(String, i64)>,
    pub students_by_level: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminReport {
    pub title: &'static str,
    pub year: i32,
    pub generated_at: Timestamp,
    pub total_users: i64,
    pub total_students: i64,
    pub total_universities: i64,
    pub total_events: i64,
    pub total_certificates: i64,
    pub event_participation: Vec<MonthlyPoint>,
    pub university_distribution: Vec<DistributionEntry>,
    pub student_levels: Vec<DistributionEntry>,
}

pub fn admin_report(snapshot: &AdminSnapshot, now: Timestamp) -> AdminReport {
    AdminReport {
        title: ADMIN_REPORT_TITLE,
        year: now.year(),
        generated_at: now,
        total_users: snapshot.total_users,
        total_students: snapshot.total_students,
        total_universities: snapshot.total_universities,
        total_events: snapshot.total_events,
        total_certificates: snapshot.total_certificates,
        event_participation: monthly_series(&snapshot.participation_by_month),
        university_distribution: distribution(&snapshot.students_by_university),
        student_levels: distribution(&snapshot.students_by_level),
    }
}

// ---------------------------------------------------------------------------
// University report
// ---------------------------------------------------------------------------

/// Raw counts for one university, matched on the student profile's
/// `university` field.
#[derive(Debug, Clone, Default)]
pub struct UniversitySnapshot {
    pub total_students: i64,
    /// Distinct students with at least one enrollment.
    pub active_students: i64,
    /// Distinct events this university's students enrolled in.
    pub total_events: i64,
    pub certificates_awarded: i64,
    pub students_by_faculty: Vec<(String, i64)>,
    pub enrollments_by_month: Vec<(i32, i64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniversityReport {
    pub university: String,
    pub year: i32,
    pub generated_at: Timestamp,
    pub total_students: i64,
    pub active_students: i64,
    pub total_events: i64,
    pub certificates_awarded: i64,
    pub active_percentage: i64,
    pub certificates_per_active_student: f64,
    pub faculty_distribution: Vec<DistributionEntry>,
    pub monthly_events: Vec<MonthlyPoint>,
}

pub fn university_report(
    university: &str,
    snapshot: &UniversitySnapshot,
    now: Timestamp,
) -> UniversityReport {
    UniversityReport {
        university: university.to_string(),
        year: now.year(),
        generated_at: now,
        total_students: snapshot.total_students,
        active_students: snapshot.active_students,
        total_events: snapshot.total_events,
        certificates_awarded: snapshot.certificates_awarded,
        active_percentage: percentage(snapshot.active_students, snapshot.total_students),
        certificates_per_active_student: ratio(
            snapshot.certificates_awarded,
            snapshot.active_students,
        ),
        faculty_distribution: distribution(&snapshot.students_by_faculty),
        monthly_events: monthly_series(&snapshot.enrollments_by_month),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 8, 20, 0, 0, 0).unwrap()
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn zero_totals_do_not_divide() {
        assert_eq!(percentage(3, 0), 0);
        assert_eq!(ratio(3, 0), 0.0);
    }

    #[test]
    fn distribution_orders_and_cycles_palette() {
        let rows: Vec<(String, i64)> = (0..11).map(|i| (format!("u{i:02}"), 1)).collect();
        let mut rows = rows;
        rows.push(("top".to_string(), 9));

        let slices = distribution(&rows);
        assert_eq!(slices[0].label, "top");
        assert_eq!(slices[0].color, PALETTE[0]);
        assert_eq!(slices[1].label, "u00");
        assert_eq!(slices[9].color, PALETTE[0]);
        assert_eq!(slices[10].color, PALETTE[1]);
    }

    #[test]
    fn monthly_series_is_zero_filled() {
        let series = monthly_series(&[(3, 4), (3, 1), (12, 2), (13, 99)]);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].count, 0);
        assert_eq!(series[2].month, "March");
        assert_eq!(series[2].count, 5);
        assert_eq!(series[11].count, 2);
    }

    #[test]
    fn university_report_derives_rates() {
        let snapshot = UniversitySnapshot {
            total_students: 40,
            active_students: 10,
            total_events: 6,
            certificates_awarded: 15,
            ..Default::default()
        };
        let report = university_report("UMP", &snapshot, now());
        assert_eq!(report.active_percentage, 25);
        assert_eq!(report.certificates_per_active_student, 1.5);
        assert_eq!(report.year, 2025);
        assert_eq!(report.monthly_events.len(), 12);
    }

    #[test]
    fn empty_university_report_is_all_zero() {
        let report = university_report("Nowhere", &UniversitySnapshot::default(), now());
        assert_eq!(report.active_percentage, 0);
        assert_eq!(report.certificates_per_active_student, 0.0);
        assert!(report.faculty_distribution.is_empty());
    }

    #[test]
    fn admin_report_carries_totals() {
        let snapshot = AdminSnapshot {
            total_users: 12,
            total_students: 8,
            participation_by_month: vec![(8, 3)],
            students_by_university: vec![("UMP".into(), 5), ("UTM".into(), 3)],
            ..Default::default()
        };
        let report = admin_report(&snapshot, now());
        assert_eq!(report.title, "System Overview");
        assert_eq!(report.total_users, 12);
        assert_eq!(report.event_participation[7].count, 3);
        assert_eq!(report.university_distribution[0].label, "UMP");
    }
}
