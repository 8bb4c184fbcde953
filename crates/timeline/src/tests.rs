//! Tests for the timeline crate.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

    use crate::calculator::{compute_occurrences, day_snapshot, Occurrence};
    use crate::error::TimelineError;
    use crate::loader::{load_activities, LoadStatus};
    use crate::planner::plan_triggers;
    use crate::schema::{ActivityDefinition, ActivitySet, DayRule, RawActivity};

    /// Helper to build a validated definition without going through JSON.
    fn make_activity(
        name: &str,
        days: DayRule,
        times: &[(u32, u32)],
        duration_minutes: Option<i64>,
    ) -> ActivityDefinition {
        let mut start_times: Vec<NaiveTime> = times
            .iter()
            .map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
            .collect();
        start_times.sort();
        start_times.dedup();
        ActivityDefinition {
            name: name.to_string(),
            days,
            start_times,
            duration: duration_minutes.map(Duration::minutes),
        }
    }

    fn fridays() -> DayRule {
        DayRule::Days([Weekday::Fri].into_iter().collect())
    }

    /// 2026-02-20 is a Friday.
    fn friday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 20)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    // -- schema validation -------------------------------------------------

    #[test]
    fn day_rule_everyday_sentinel_matches_all() {
        let rule = DayRule::parse(&["Everyday".to_string()]).unwrap();
        assert!(rule.matches(Weekday::Mon));
        assert!(rule.matches(Weekday::Sun));
    }

    #[test]
    fn day_rule_unknown_token_rejected() {
        let err = DayRule::parse(&["Funday".to_string()]).unwrap_err();
        assert!(matches!(err, TimelineError::Validation(_)));
    }

    #[test]
    fn day_rule_empty_rejected() {
        assert!(DayRule::parse(&[]).is_err());
    }

    #[test]
    fn from_raw_sorts_and_dedups_start_times() {
        let raw = RawActivity {
            days: vec!["Friday".to_string()],
            start_times: vec!["20:30".to_string(), "20:00".to_string(), "20:00".to_string()],
            duration_minutes: Some(10),
        };
        let def = ActivityDefinition::from_raw("A", &raw).unwrap();
        assert_eq!(
            def.start_times,
            vec![
                NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(20, 30, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn from_raw_rejects_unparsable_time() {
        let raw = RawActivity {
            days: vec!["Friday".to_string()],
            start_times: vec!["25:99".to_string()],
            duration_minutes: None,
        };
        assert!(ActivityDefinition::from_raw("A", &raw).is_err());
    }

    #[test]
    fn from_raw_rejects_empty_start_times() {
        let raw = RawActivity {
            days: vec!["Friday".to_string()],
            start_times: vec![],
            duration_minutes: None,
        };
        assert!(ActivityDefinition::from_raw("A", &raw).is_err());
    }

    #[test]
    fn from_raw_rejects_non_positive_duration() {
        let raw = RawActivity {
            days: vec!["Friday".to_string()],
            start_times: vec!["20:00".to_string()],
            duration_minutes: Some(0),
        };
        assert!(ActivityDefinition::from_raw("A", &raw).is_err());
    }

    // -- loader ------------------------------------------------------------

    #[test]
    fn loader_skips_malformed_entry_keeps_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Good": {{"days": ["Friday"], "start_times": ["20:00"], "duration_minutes": 10}},
                "Bad": {{"days": ["Funday"], "start_times": ["20:00"]}}
            }}"#
        )
        .unwrap();

        let (set, results) = load_activities(file.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("Good").is_some());
        assert_eq!(results.len(), 2);
        let bad = results.iter().find(|r| r.name == "Bad").unwrap();
        assert!(matches!(bad.status, LoadStatus::Failed { .. }));
    }

    #[test]
    fn loader_whole_file_parse_error_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_activities(file.path()).unwrap_err();
        assert!(matches!(err, TimelineError::Parse(_)));
    }

    // -- calculator --------------------------------------------------------

    #[test]
    fn occurrence_active_within_half_open_window() {
        // A on Friday at 20:00 and 20:30, duration 10m; reference 20:05
        // falls in [20:00, 20:10) so the first occurrence is active.
        let set = ActivitySet::new([make_activity(
            "A",
            fridays(),
            &[(20, 0), (20, 30)],
            Some(10),
        )]);
        let occ = compute_occurrences(&set, friday_at(20, 5));

        assert_eq!(occ.len(), 2);
        assert_eq!(occ[0].start, friday_at(20, 0));
        assert!(occ[0].is_active_now);
        assert!(!occ[0].is_last_of_day);
        assert_eq!(occ[1].start, friday_at(20, 30));
        assert!(!occ[1].is_active_now);
        assert!(occ[1].is_last_of_day);
    }

    #[test]
    fn occurrence_inactive_at_window_end() {
        let set = ActivitySet::new([make_activity("A", fridays(), &[(20, 0)], Some(10))]);
        let occ = compute_occurrences(&set, friday_at(20, 10));
        assert!(!occ[0].is_active_now);
    }

    #[test]
    fn zero_duration_occurrence_never_active() {
        let set = ActivitySet::new([make_activity("A", fridays(), &[(20, 0)], None)]);
        let occ = compute_occurrences(&set, friday_at(20, 0));
        assert_eq!(occ[0].start, occ[0].end);
        assert!(!occ[0].is_active_now);
    }

    #[test]
    fn occurrences_sorted_with_name_tie_break() {
        let set = ActivitySet::new([
            make_activity("Zeta", fridays(), &[(10, 0)], None),
            make_activity("Alpha", fridays(), &[(10, 0), (9, 0)], None),
        ]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        let order: Vec<(&str, NaiveDateTime)> =
            occ.iter().map(|o| (o.activity.as_str(), o.start)).collect();
        assert_eq!(
            order,
            vec![
                ("Alpha", friday_at(9, 0)),
                ("Alpha", friday_at(10, 0)),
                ("Zeta", friday_at(10, 0)),
            ]
        );
    }

    #[test]
    fn last_of_day_marked_once_per_activity() {
        let set = ActivitySet::new([
            make_activity("A", fridays(), &[(9, 0), (12, 0), (20, 0)], None),
            make_activity("B", DayRule::Everyday, &[(12, 0)], None),
        ]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        for name in ["A", "B"] {
            let last: Vec<&Occurrence> = occ
                .iter()
                .filter(|o| o.activity == name && o.is_last_of_day)
                .collect();
            assert_eq!(last.len(), 1, "exactly one last-of-day for {name}");
        }
        let a_last = occ.iter().find(|o| o.activity == "A" && o.is_last_of_day);
        assert_eq!(a_last.unwrap().start, friday_at(20, 0));
    }

    #[test]
    fn weekday_filter_excludes_other_days() {
        let saturdays = DayRule::Days([Weekday::Sat].into_iter().collect());
        let set = ActivitySet::new([
            make_activity("SatOnly", saturdays, &[(10, 0)], None),
            make_activity("Daily", DayRule::Everyday, &[(11, 0)], None),
        ]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].activity, "Daily");
    }

    #[test]
    fn empty_day_yields_empty_snapshot() {
        let saturdays = DayRule::Days([Weekday::Sat].into_iter().collect());
        let set = ActivitySet::new([make_activity("SatOnly", saturdays, &[(10, 0)], None)]);
        let snapshot = day_snapshot(&set, friday_at(8, 0));
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.date, friday_at(8, 0).date());
    }

    // -- planner -----------------------------------------------------------

    #[test]
    fn simultaneous_activities_merge_into_one_trigger() {
        let set = ActivitySet::new([
            make_activity("A", fridays(), &[(10, 0)], None),
            make_activity("B", fridays(), &[(10, 0)], None),
        ]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        let plan = plan_triggers(&occ, Duration::minutes(10));

        assert_eq!(plan.len(), 1);
        let names = plan.get(&friday_at(9, 50)).unwrap();
        assert_eq!(names, &vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn plan_preserves_all_names_without_duplication() {
        let set = ActivitySet::new([
            make_activity("A", fridays(), &[(10, 0), (12, 0)], None),
            make_activity("B", fridays(), &[(10, 0)], None),
            make_activity("C", fridays(), &[(15, 30)], None),
        ]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        let plan = plan_triggers(&occ, Duration::minutes(10));

        let mut all_names: Vec<String> = plan.values().flatten().cloned().collect();
        all_names.sort();
        assert_eq!(all_names, vec!["A", "A", "B", "C"]);
        // One entry per distinct trigger instant.
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn duplicate_activity_at_same_trigger_collapses() {
        // Constructed directly: duplicate start times that survived to the
        // occurrence list must not produce duplicate names in one entry.
        let occ = vec![
            Occurrence {
                activity: "A".to_string(),
                start: friday_at(10, 0),
                end: friday_at(10, 0),
                is_active_now: false,
                is_last_of_day: false,
            },
            Occurrence {
                activity: "A".to_string(),
                start: friday_at(10, 0),
                end: friday_at(10, 0),
                is_active_now: false,
                is_last_of_day: true,
            },
        ];
        let plan = plan_triggers(&occ, Duration::minutes(10));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.get(&friday_at(9, 50)).unwrap(), &vec!["A".to_string()]);
    }

    #[test]
    fn zero_lead_triggers_at_start() {
        let set = ActivitySet::new([make_activity("A", fridays(), &[(10, 0)], None)]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        let plan = plan_triggers(&occ, Duration::zero());
        assert!(plan.contains_key(&friday_at(10, 0)));
    }

    #[test]
    fn plan_iterates_in_non_decreasing_trigger_order() {
        let set = ActivitySet::new([
            make_activity("A", fridays(), &[(9, 0), (18, 0)], None),
            make_activity("B", fridays(), &[(12, 0)], None),
        ]);
        let occ = compute_occurrences(&set, friday_at(8, 0));
        let plan = plan_triggers(&occ, Duration::minutes(10));

        let instants: Vec<NaiveDateTime> = plan.keys().copied().collect();
        let mut sorted = instants.clone();
        sorted.sort();
        assert_eq!(instants, sorted);
    }

    #[test]
    fn past_triggers_retained_in_plan() {
        // Planner keeps past triggers; skipping is the scheduler's call.
        let set = ActivitySet::new([make_activity("A", fridays(), &[(8, 0)], None)]);
        let occ = compute_occurrences(&set, friday_at(20, 0));
        let plan = plan_triggers(&occ, Duration::minutes(10));
        assert!(plan.contains_key(&friday_at(7, 50)));
    }
}
