//! Client-side search over already fetched listings
//!
//! Matching is a case-insensitive substring test. An empty query keeps
//! everything.

use crate::models::{AttendanceRecord, Employee, TimeOffRequest};

/// Which attendance listing a record came from; decides the searched column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceView {
    /// One day, every employee: search by employee name
    AdminDay,
    /// One employee, one month: search by date
    MyMonth,
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

fn retain<'a, T>(items: &'a [T], query: &str, pred: impl Fn(&T, &str) -> bool) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| pred(item, &needle)).collect()
}

pub fn employees<'a>(items: &'a [Employee], query: &str) -> Vec<&'a Employee> {
    retain(items, query, |e, q| contains(Some(&e.full_name), q))
}

pub fn attendance<'a>(
    items: &'a [AttendanceRecord],
    view: AttendanceView,
    query: &str,
) -> Vec<&'a AttendanceRecord> {
    retain(items, query, |r, q| match view {
        AttendanceView::AdminDay => contains(r.employee_name.as_deref(), q),
        AttendanceView::MyMonth => contains(r.date.as_deref(), q),
    })
}

pub fn time_off<'a>(items: &'a [TimeOffRequest], query: &str) -> Vec<&'a TimeOffRequest> {
    retain(items, query, |r, q| {
        contains(r.employee_name.as_deref(), q) || contains(Some(&r.timeoff_type_name), q)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresenceStatus;

    fn record(name: Option<&str>, date: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            id: "x".to_string(),
            employee_name: name.map(str::to_string),
            date: date.map(str::to_string),
            check_in: "09:00".to_string(),
            check_out: "18:00".to_string(),
            work_hours: "09:00".to_string(),
            extra_hours: "01:00".to_string(),
            status: PresenceStatus::Present,
        }
    }

    fn request(name: &str, kind: &str) -> TimeOffRequest {
        serde_json::from_value(serde_json::json!({
            "id": "t",
            "employee_id": null,
            "employee_name": name,
            "timeoff_type_name": kind,
            "timeoff_type_code": "X",
            "start_date": "2025-01-01",
            "end_date": "2025-01-02",
            "allocation_days": "2.0",
            "status": "PENDING",
            "approved_by_name": null,
            "rejection_reason": null,
            "attachment_url": null,
            "created_at": "",
            "updated_at": ""
        }))
        .unwrap()
    }

    #[test]
    fn test_attendance_column_depends_on_view() {
        let rows = vec![
            record(Some("Ann Lee"), None),
            record(Some("Raj Patel"), None),
        ];
        let hits = attendance(&rows, AttendanceView::AdminDay, "ANN");
        assert_eq!(hits.len(), 1);
        assert!(attendance(&rows, AttendanceView::MyMonth, "ann").is_empty());

        let month = vec![record(None, Some("03/02/2025")), record(None, Some("04/02/2025"))];
        assert_eq!(attendance(&month, AttendanceView::MyMonth, "04/").len(), 1);
    }

    #[test]
    fn test_empty_query_keeps_all() {
        let rows = vec![request("Ann", "Sick Leave"), request("Raj", "Paid Time Off")];
        assert_eq!(time_off(&rows, "  ").len(), 2);
    }

    #[test]
    fn test_time_off_matches_name_or_type() {
        let rows = vec![request("Ann", "Sick Leave"), request("Raj", "Paid Time Off")];
        assert_eq!(time_off(&rows, "sick").len(), 1);
        assert_eq!(time_off(&rows, "raj").len(), 1);
        assert!(time_off(&rows, "unpaid").is_empty());
    }
}
