use caredash_lib::analysis::filters::{compute_statistics, filter_issues};
use caredash_lib::analysis::priority::{compute_priority, ESCALATION_THRESHOLD};
use caredash_lib::models::facets::{FacetSelection, PriorityFilter, StatusFilter};
use caredash_lib::models::issue::{
    Channel, Issue, IssueStatus, ManualCategorization, Priority, RegionType, WorkflowStatus,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn workflow() -> impl Strategy<Value = WorkflowStatus> {
    prop_oneof![
        Just(WorkflowStatus::New),
        Just(WorkflowStatus::Analyzed),
        Just(WorkflowStatus::Catalyzed),
        Just(WorkflowStatus::Other),
    ]
}

fn channel() -> impl Strategy<Value = Channel> {
    prop_oneof![Just(Channel::Email), Just(Channel::Call), Just(Channel::Ticket)]
}

fn region_type() -> impl Strategy<Value = RegionType> {
    prop_oneof![
        Just(RegionType::Division),
        Just(RegionType::DivisionalGroup),
        Just(RegionType::Msa),
        Just(RegionType::Gsa),
    ]
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("technical"),
        Just("billing"),
        Just("compliance"),
        Just("patient billing"),
        Just("general"),
        Just("data"),
    ]
    .prop_map(str::to_string)
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("urgent"),
            Just("HIPAA"),
            Just("slow"),
            Just("portal"),
            Just("Billing"),
            Just("timeout"),
            Just("crash"),
            Just("staff"),
        ],
        0..6,
    )
    .prop_map(|words| words.join(" "))
}

prop_compose! {
    fn issue()(
        id in 0u32..10_000,
        declared in prop_oneof![
            Just("critical"),
            Just("high"),
            Just("medium"),
            Just("low"),
            Just("p2"),
        ],
        solved in any::<bool>(),
        workflow in workflow(),
        age in 0i64..60,
        category in category(),
        manual in prop::option::of(category()),
        channel in channel(),
        region in prop::option::of((region_type(), prop_oneof![Just("North"), Just("South")])),
        title in text(),
        description in text(),
    ) -> Issue {
        let now = fixed_now();
        Issue {
            id: format!("ISS-{id}"),
            account_id: "pg-1".to_string(),
            title,
            description,
            declared_priority: declared.to_string(),
            status: if solved { IssueStatus::Solved } else { IssueStatus::Unsolved },
            workflow_status: workflow,
            created_at: now - Duration::days(age),
            solved_at: solved.then_some(now),
            category,
            channel,
            region_type: region.map(|(t, _)| t),
            region_name: region.map(|(_, n)| n.to_string()),
            manual_categorization: manual.map(|category_type| ManualCategorization {
                category_type,
                reason: "Reviewed with the practice manager".to_string(),
                priority: Priority::Medium,
                categorized_by: "csm".to_string(),
                categorized_at: now,
            }),
            resolution: None,
            opportunity: None,
            activity: Vec::new(),
        }
    }
}

prop_compose! {
    fn facets()(
        priority in prop_oneof![
            Just(PriorityFilter::All),
            Just(PriorityFilter::Critical),
            Just(PriorityFilter::High),
            Just(PriorityFilter::Medium),
            Just(PriorityFilter::Low),
            Just(PriorityFilter::Solved),
            Just(PriorityFilter::Unsolved),
        ],
        status in prop_oneof![
            Just(StatusFilter::All),
            Just(StatusFilter::New),
            Just(StatusFilter::Analyzed),
            Just(StatusFilter::Catalyzed),
            Just(StatusFilter::Resolved),
        ],
        region_type in prop::option::of(region_type()),
        category in prop::option::of(category()),
        channel in prop::option::of(channel()),
    ) -> FacetSelection {
        FacetSelection {
            priority,
            region_type,
            region_name: None,
            category,
            channel,
            status,
        }
    }
}

proptest! {
    #[test]
    fn prop_bucket_counts_always_add_up(
        issues in prop::collection::vec(issue(), 0..40),
        facets in facets(),
    ) {
        let stats = compute_statistics(&issues, &facets, fixed_now());
        prop_assert_eq!(stats.total_issues, stats.solved_issues + stats.unsolved_issues);
        prop_assert_eq!(
            stats.unsolved_issues,
            stats.new_issues + stats.analyzed_issues + stats.catalyzed_issues
        );
        let tiers = stats.by_tier;
        prop_assert_eq!(tiers.critical + tiers.high + tiers.medium + tiers.low, stats.total_issues);
    }

    #[test]
    fn prop_statistics_ignore_status_facet(
        issues in prop::collection::vec(issue(), 0..40),
        facets in facets(),
    ) {
        let with_status = compute_statistics(&issues, &facets, fixed_now());
        let without = compute_statistics(&issues, &facets.without_status(), fixed_now());
        prop_assert_eq!(with_status, without);
    }

    #[test]
    fn prop_status_buckets_partition_the_filtered_set(
        issues in prop::collection::vec(issue(), 0..40),
        facets in facets(),
    ) {
        let base = facets.without_status();
        let stats = compute_statistics(&issues, &base, fixed_now());
        let count = |status: StatusFilter| {
            filter_issues(&issues, &FacetSelection { status, ..base.clone() }, fixed_now()).len()
        };

        prop_assert_eq!(count(StatusFilter::All), stats.total_issues);
        prop_assert_eq!(count(StatusFilter::New), stats.new_issues);
        prop_assert_eq!(count(StatusFilter::Analyzed), stats.analyzed_issues);
        prop_assert_eq!(count(StatusFilter::Catalyzed), stats.catalyzed_issues);
        prop_assert_eq!(count(StatusFilter::Resolved), stats.solved_issues);
    }

    #[test]
    fn prop_tier_and_escalation_agree_with_score(item in issue()) {
        let first = compute_priority(&item, fixed_now());
        prop_assert_eq!(&first, &compute_priority(&item, fixed_now()));
        prop_assert_eq!(first.escalated, first.score >= ESCALATION_THRESHOLD);
        prop_assert_eq!(first.tier == Priority::Critical, first.escalated);
        prop_assert!(first.score >= 25.0);
    }

    #[test]
    fn prop_category_facet_matches_effective_category(
        issues in prop::collection::vec(issue(), 0..40),
        wanted in category(),
    ) {
        let facets = FacetSelection { category: Some(wanted.clone()), ..FacetSelection::default() };
        for scored in filter_issues(&issues, &facets, fixed_now()) {
            prop_assert_eq!(scored.issue.effective_category(), wanted.as_str());
        }
    }
}
