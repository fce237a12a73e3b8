//! Property-based tests for cost identity and progress calculation.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fabrika_shared::types::{ProjectId, TaskId, TenantId};

use super::service::{CostComponent, ProjectService};
use super::types::{CostBreakdown, Task, TaskStatus};

/// Strategy for positive decimal amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a cost component.
fn component_strategy() -> impl Strategy<Value = CostComponent> {
    prop_oneof![
        Just(CostComponent::Materials),
        Just(CostComponent::Labor),
        Just(CostComponent::Overhead),
    ]
}

/// Strategy for a task with an optional hour estimate.
fn task_strategy() -> impl Strategy<Value = Task> {
    (
        prop_oneof![
            Just(TaskStatus::Todo),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Done)
        ],
        prop::option::of(1i64..200i64),
    )
        .prop_map(|(status, hours)| Task {
            id: TaskId::new(),
            tenant_id: TenantId::new(),
            project_id: ProjectId::new(),
            name: "task".to_string(),
            status,
            estimated_hours: hours.map(Decimal::from),
            created_at: Utc::now(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Cost identity survives any delta sequence**
    ///
    /// *For any* sequence of component deltas, `actual_cost` equals the sum
    /// of the three component costs after every single application.
    #[test]
    fn prop_cost_identity_holds(
        deltas in prop::collection::vec((component_strategy(), amount_strategy()), 1..50),
    ) {
        let mut costs = CostBreakdown::default();

        for (component, delta) in deltas {
            ProjectService::apply_cost_delta(&mut costs, component, delta);
            prop_assert!(costs.is_consistent(), "identity broken: {costs:?}");
        }
    }

    /// **Progress is always within [0, 100]**
    ///
    /// *For any* non-empty task list, the percentage is between 0 and 100.
    #[test]
    fn prop_progress_bounded(tasks in prop::collection::vec(task_strategy(), 1..30)) {
        let pct = ProjectService::progress_percent(&tasks).unwrap();
        prop_assert!(pct >= Decimal::ZERO);
        prop_assert!(pct <= Decimal::ONE_HUNDRED);
    }

    /// **Progress extremes**
    ///
    /// *For any* task list, all-done yields 100 and none-done yields 0.
    #[test]
    fn prop_progress_extremes(tasks in prop::collection::vec(task_strategy(), 1..30)) {
        let all_done: Vec<Task> = tasks
            .iter()
            .map(|t| Task { status: TaskStatus::Done, ..t.clone() })
            .collect();
        prop_assert_eq!(
            ProjectService::progress_percent(&all_done),
            Some(Decimal::ONE_HUNDRED)
        );

        let none_done: Vec<Task> = tasks
            .iter()
            .map(|t| Task { status: TaskStatus::Todo, ..t.clone() })
            .collect();
        prop_assert_eq!(ProjectService::progress_percent(&none_done), Some(Decimal::ZERO));
    }
}
