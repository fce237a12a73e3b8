//! Work order repository tests.

use std::sync::Arc;

use rust_decimal_macros::dec;

use fabrika_core::timeline::TimelineEventKind;
use fabrika_core::work_order::{WorkOrderError, WorkOrderStatus};
use fabrika_shared::types::RawMaterialId;

use super::project::CreateProjectInput;
use super::testing::{FailingCollectionStore, TestHarness, harness, harness_with};
use super::work_order::{CreateWorkOrderInput, MaterialRequirement, WorkOrderRepositoryError};
use super::collections;

/// Creates a project plus a work order with one material line
/// (required 10 @ unit cost 5) and a labor rate of 15.
async fn project_with_order(
    h: &TestHarness,
) -> (
    fabrika_shared::types::ProjectId,
    fabrika_shared::types::WorkOrderId,
    RawMaterialId,
) {
    let project = h
        .projects
        .create(
            &h.ctx,
            CreateProjectInput {
                name: "garden fence".to_string(),
                sales_price: dec!(1000),
                estimated_cost: dec!(600),
            },
        )
        .await
        .unwrap();

    let material = RawMaterialId::new();
    let order = h
        .work_orders
        .create(
            &h.ctx,
            CreateWorkOrderInput {
                project_id: project.id,
                name: "welding".to_string(),
                materials: vec![MaterialRequirement {
                    raw_material_id: material,
                    quantity_required: dec!(10),
                    unit_cost: dec!(5),
                }],
                labor_cost_per_hour: dec!(15),
            },
        )
        .await
        .unwrap();

    (project.id, order.id, material)
}

#[tokio::test]
async fn test_consumption_rolls_up_to_project() {
    let h = harness();
    let (project_id, order_id, material) = project_with_order(&h).await;

    let order = h
        .work_orders
        .record_material_consumption(&h.ctx, order_id, material, dec!(4))
        .await
        .unwrap();
    assert_eq!(order.materials[0].quantity_used, dec!(4));
    assert_eq!(order.materials[0].total_cost, dec!(20));
    assert_eq!(order.actual_cost, dec!(20));

    // Cumulative consumption up to exactly the requirement succeeds.
    let order = h
        .work_orders
        .record_material_consumption(&h.ctx, order_id, material, dec!(6))
        .await
        .unwrap();
    assert_eq!(order.materials[0].quantity_used, dec!(10));
    assert_eq!(order.materials[0].total_cost, dec!(50));
    assert_eq!(order.actual_cost, dec!(50));

    let project = h.projects.get(project_id).await.unwrap().unwrap();
    assert_eq!(project.costs.materials_cost, dec!(50));
    assert_eq!(project.costs.actual_cost, dec!(50));
    assert!(project.costs.is_consistent());
}

#[tokio::test]
async fn test_overrun_rejected_and_nothing_changes() {
    let h = harness();
    let (project_id, order_id, material) = project_with_order(&h).await;

    h.work_orders
        .record_material_consumption(&h.ctx, order_id, material, dec!(10))
        .await
        .unwrap();

    let order_before = h.work_orders.get(order_id).await.unwrap().unwrap();
    let project_before = h.projects.get(project_id).await.unwrap().unwrap();

    // The line is exhausted: any further positive consumption fails whole.
    let err = h
        .work_orders
        .record_material_consumption(&h.ctx, order_id, material, dec!(0.5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkOrderRepositoryError::Domain(WorkOrderError::QuantityOverrun { .. })
    ));

    let order_after = h.work_orders.get(order_id).await.unwrap().unwrap();
    assert_eq!(order_after.materials[0].quantity_used, order_before.materials[0].quantity_used);
    assert_eq!(order_after.actual_cost, order_before.actual_cost);

    let project_after = h.projects.get(project_id).await.unwrap().unwrap();
    assert_eq!(project_after.costs.materials_cost, project_before.costs.materials_cost);
    assert_eq!(project_after.costs.actual_cost, project_before.costs.actual_cost);
}

#[tokio::test]
async fn test_unknown_material_line_fails() {
    let h = harness();
    let (_, order_id, _) = project_with_order(&h).await;

    let err = h
        .work_orders
        .record_material_consumption(&h.ctx, order_id, RawMaterialId::new(), dec!(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkOrderRepositoryError::Domain(WorkOrderError::MaterialNotFound { .. })
    ));
}

#[tokio::test]
async fn test_labor_hours_roll_up_to_project() {
    let h = harness();
    let (project_id, order_id, _) = project_with_order(&h).await;

    let order = h
        .work_orders
        .record_labor_hours(&h.ctx, order_id, dec!(10), Some("night shift".to_string()))
        .await
        .unwrap();
    assert_eq!(order.labor_hours, dec!(10));
    assert_eq!(order.actual_cost, dec!(150));

    let project = h.projects.get(project_id).await.unwrap().unwrap();
    assert_eq!(project.costs.labor_cost, dec!(150));
    assert_eq!(project.costs.actual_cost, dec!(150));
    assert!(project.costs.is_consistent());
}

#[rstest::rstest]
#[case::zero(dec!(0))]
#[case::negative(dec!(-1))]
#[case::above_session_cap(dec!(24.5))]
#[tokio::test]
async fn test_labor_hours_validation(#[case] bad: rust_decimal::Decimal) {
    let h = harness();
    let (_, order_id, _) = project_with_order(&h).await;

    let err = h
        .work_orders
        .record_labor_hours(&h.ctx, order_id, bad, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkOrderRepositoryError::Domain(_)), "hours {bad}");
}

#[tokio::test]
async fn test_status_transitions_stamp_dates() {
    let h = harness();
    let (_, order_id, _) = project_with_order(&h).await;

    let order = h
        .work_orders
        .change_status(&h.ctx, order_id, WorkOrderStatus::InProgress, None)
        .await
        .unwrap();
    let started = order.actual_start_date.expect("start stamped");

    // Pausing and resuming must not restamp the start.
    h.work_orders
        .change_status(&h.ctx, order_id, WorkOrderStatus::Paused, None)
        .await
        .unwrap();
    let order = h
        .work_orders
        .change_status(&h.ctx, order_id, WorkOrderStatus::InProgress, None)
        .await
        .unwrap();
    assert_eq!(order.actual_start_date, Some(started));

    let order = h
        .work_orders
        .change_status(&h.ctx, order_id, WorkOrderStatus::Completed, None)
        .await
        .unwrap();
    assert!(order.actual_end_date.is_some());
    assert_eq!(order.progress_percent, dec!(100));

    // Completed is terminal.
    let err = h
        .work_orders
        .change_status(&h.ctx, order_id, WorkOrderStatus::Pending, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkOrderRepositoryError::Domain(WorkOrderError::TerminalStatus { .. })
    ));
}

#[tokio::test]
async fn test_mutations_append_timeline_entries() {
    let h = harness();
    let (project_id, order_id, material) = project_with_order(&h).await;

    h.work_orders
        .record_material_consumption(&h.ctx, order_id, material, dec!(2))
        .await
        .unwrap();
    h.work_orders
        .record_labor_hours(&h.ctx, order_id, dec!(3), None)
        .await
        .unwrap();
    h.work_orders
        .change_status(&h.ctx, order_id, WorkOrderStatus::InProgress, None)
        .await
        .unwrap();

    let entries = h.timeline.for_project(&h.ctx, project_id).await.unwrap();
    let kinds: Vec<TimelineEventKind> = entries.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&TimelineEventKind::MaterialConsumed));
    assert!(kinds.contains(&TimelineEventKind::LaborLogged));
    assert!(kinds.contains(&TimelineEventKind::StatusChange));
}

#[tokio::test]
async fn test_timeline_failure_never_blocks_the_mutation() {
    // Every append into the timeline collection fails; the financial
    // mutation must still commit.
    let h = harness_with(Arc::new(FailingCollectionStore::new(
        collections::PROJECT_TIMELINE,
    )));
    let (project_id, order_id, material) = project_with_order(&h).await;

    let order = h
        .work_orders
        .record_material_consumption(&h.ctx, order_id, material, dec!(4))
        .await
        .unwrap();
    assert_eq!(order.materials[0].quantity_used, dec!(4));

    let project = h.projects.get(project_id).await.unwrap().unwrap();
    assert_eq!(project.costs.materials_cost, dec!(20));
    assert_eq!(project.costs.actual_cost, dec!(20));
}
