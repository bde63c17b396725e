//! 命令和查询处理器测试

mod support;

use cost_center::application::{
    CreateCostCenterCommand, DeleteCostCenterCommand, GetCostCenterQuery, ListCostCentersQuery,
    ListParentCandidatesQuery, UpdateCostCenterCommand,
};
use cost_center::domain::{CostCenterId, CostCenterRepository};
use pms_errors::AppError;
use support::{TestContext, fields};

fn delete(id: CostCenterId) -> DeleteCostCenterCommand {
    DeleteCostCenterCommand { id }
}

// ============ Create ============

#[tokio::test]
async fn test_create_defaults() {
    let ctx = TestContext::new();
    let center = ctx.create("Operaciones", Some("CC-001"), None).await.unwrap();

    assert_eq!(center.id(), CostCenterId(1));
    assert_eq!(center.code(), Some("CC-001"));
    assert!(center.is_active());
    assert!(center.is_root());
}

#[tokio::test]
async fn test_create_duplicate_code_is_conflict() {
    let ctx = TestContext::new();
    ctx.create("Operaciones", Some("CC-001"), None).await.unwrap();

    let err = ctx.create("Cocina", Some("CC-001"), None).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("CC-001")));

    ctx.create("Cocina", Some("CC-002"), None).await.unwrap();
}

#[tokio::test]
async fn test_create_duplicate_code_of_inactive_is_conflict() {
    let ctx = TestContext::new();
    let bar = ctx.create("Bar", Some("CC-009"), None).await.unwrap();
    let cmd = UpdateCostCenterCommand::parse(bar.id(), &fields("Bar", "CC-009", ""), None).unwrap();
    let bar = ctx.commands.handle_update(cmd).await.unwrap();
    assert!(!bar.is_active());

    let err = ctx.create("Bar Piscina", Some("CC-009"), None).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_create_duplicate_name_is_conflict_on_name() {
    let ctx = TestContext::new();
    ctx.create("Recepción", None, None).await.unwrap();

    let err = ctx.create("Recepción", None, None).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("name")));

    // 精确匹配，大小写不同视为不同名称
    ctx.create("recepción", None, None).await.unwrap();
}

#[tokio::test]
async fn test_create_with_missing_parent_is_not_found() {
    let ctx = TestContext::new();
    let err = ctx
        .create("Cocina", None, Some(CostCenterId(7)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(ctx.repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_blank_parent_is_root() {
    let ctx = TestContext::new();
    let cmd = CreateCostCenterCommand::parse(&fields("Spa", "", "  ")).unwrap();
    let center = ctx.commands.handle_create(cmd).await.unwrap();
    assert!(center.is_root());
    assert_eq!(center.code(), None);
}

// ============ Update ============

#[tokio::test]
async fn test_update_code_unique_excluding_self() {
    let ctx = TestContext::new();
    let bar = ctx.create("Bar", Some("CC-001"), None).await.unwrap();
    let spa = ctx.create("Spa", Some("CC-002"), None).await.unwrap();

    // 保留自己的编码
    let cmd = UpdateCostCenterCommand::parse(bar.id(), &fields("Bar Central", "CC-001", ""), Some("true"))
        .unwrap();
    let updated = ctx.commands.handle_update(cmd).await.unwrap();
    assert_eq!(updated.name(), "Bar Central");

    let cmd = UpdateCostCenterCommand::parse(spa.id(), &fields("Spa", "CC-001", ""), Some("true"))
        .unwrap();
    let err = ctx.commands.handle_update(cmd).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("CC-001")));
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let ctx = TestContext::new();
    let cmd = UpdateCostCenterCommand::parse(CostCenterId(3), &fields("Spa", "", ""), Some("true"))
        .unwrap();
    let err = ctx.commands.handle_update(cmd).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============ Delete ============

#[tokio::test]
async fn test_delete_blocked_by_children_then_succeeds() {
    let ctx = TestContext::new();
    let operaciones = ctx.create("Operaciones", None, None).await.unwrap();
    let cocina = ctx
        .create("Cocina", None, Some(operaciones.id()))
        .await
        .unwrap();

    let err = ctx.commands.handle_delete(delete(operaciones.id())).await.unwrap_err();
    assert!(matches!(err, AppError::ReferentialIntegrity(ref msg) if msg.contains("child")));

    ctx.commands.handle_delete(delete(cocina.id())).await.unwrap();
    ctx.commands.handle_delete(delete(operaciones.id())).await.unwrap();
    assert!(ctx.repo.find_by_id(operaciones.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_after_reassigning_children() {
    let ctx = TestContext::new();
    let old_parent = ctx.create("Antiguo", None, None).await.unwrap();
    let new_parent = ctx.create("Nuevo", None, None).await.unwrap();
    let child = ctx.create("Hijo", None, Some(old_parent.id())).await.unwrap();

    assert!(ctx.commands.handle_delete(delete(old_parent.id())).await.is_err());

    ctx.set_parent(child.id(), "Hijo", Some(new_parent.id())).await.unwrap();
    ctx.commands.handle_delete(delete(old_parent.id())).await.unwrap();
}

#[tokio::test]
async fn test_delete_blocked_by_products_reports_count() {
    let ctx = TestContext::new();
    let cocina = ctx.create("Cocina", None, None).await.unwrap();
    let first = ctx.repo.add_product(Some(cocina.id())).await;
    let second = ctx.repo.add_product(Some(cocina.id())).await;
    ctx.repo.add_product(Some(cocina.id())).await;
    ctx.repo.add_product(None).await;

    let err = ctx.commands.handle_delete(delete(cocina.id())).await.unwrap_err();
    assert!(matches!(err, AppError::ReferentialIntegrity(ref msg) if msg.contains("3 associated products")));

    ctx.repo.set_product_cost_center(first, None).await;
    ctx.repo.set_product_cost_center(second, None).await;
    let err = ctx.commands.handle_delete(delete(cocina.id())).await.unwrap_err();
    assert!(err.to_string().contains("1 associated products"));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let ctx = TestContext::new();
    let err = ctx.commands.handle_delete(delete(CostCenterId(5))).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============ Queries ============

#[tokio::test]
async fn test_list_second_page_of_fifteen() {
    let ctx = TestContext::new();
    for i in 1..=15 {
        ctx.create(&format!("Centro {i:02}"), None, None).await.unwrap();
    }

    let page = ctx
        .queries
        .handle_list(ListCostCentersQuery::new(2, 10))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 15);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.items[0].cost_center.name(), "Centro 11");
}

#[tokio::test]
async fn test_list_large_page_size_is_not_capped() {
    let ctx = TestContext::new();
    for i in 1..=150 {
        ctx.create(&format!("Centro {i:03}"), None, None).await.unwrap();
    }

    let page = ctx
        .queries
        .handle_list(ListCostCentersQuery::new(1, 200))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 150);
    assert_eq!(page.total, 150);
    assert_eq!(page.page_size, 200);
    assert_eq!(page.total_pages(), 1);
}

#[tokio::test]
async fn test_list_annotates_parent_children_and_products() {
    let ctx = TestContext::new();
    let operaciones = ctx.create("Operaciones", Some("CC-001"), None).await.unwrap();
    ctx.create("Spa", None, Some(operaciones.id())).await.unwrap();
    let cocina = ctx.create("Cocina", None, Some(operaciones.id())).await.unwrap();
    ctx.repo.add_product(Some(operaciones.id())).await;
    ctx.repo.add_product(Some(operaciones.id())).await;

    let page = ctx
        .queries
        .handle_list(ListCostCentersQuery::default())
        .await
        .unwrap();
    let names: Vec<&str> = page.items.iter().map(|i| i.cost_center.name()).collect();
    assert_eq!(names, vec!["Cocina", "Operaciones", "Spa"]);

    let root = &page.items[1];
    assert!(root.parent.is_none());
    assert_eq!(root.counts.children, 2);
    assert_eq!(root.counts.products, 2);
    assert_eq!(root.counts.sales, 0);
    assert_eq!(root.counts.permissions, 0);
    assert_eq!(root.children[0].id, cocina.id());

    let parent = page.items[0].parent.as_ref().unwrap();
    assert_eq!(parent.name, "Operaciones");
    assert_eq!(parent.code.as_deref(), Some("CC-001"));
}

#[tokio::test]
async fn test_get_includes_parent() {
    let ctx = TestContext::new();
    let operaciones = ctx.create("Operaciones", None, None).await.unwrap();
    let cocina = ctx.create("Cocina", None, Some(operaciones.id())).await.unwrap();

    let detail = ctx
        .queries
        .handle_get(GetCostCenterQuery { id: cocina.id() })
        .await
        .unwrap();
    assert_eq!(detail.cost_center.name(), "Cocina");
    assert_eq!(detail.parent.unwrap().id, operaciones.id());

    let err = ctx
        .queries
        .handle_get(GetCostCenterQuery { id: CostCenterId(99) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_parent_candidates_and_active() {
    let ctx = TestContext::new();
    let bar = ctx.create("Bar", None, None).await.unwrap();
    let spa = ctx.create("Spa", None, None).await.unwrap();
    let cmd = UpdateCostCenterCommand::parse(spa.id(), &fields("Spa", "", ""), Some("false")).unwrap();
    ctx.commands.handle_update(cmd).await.unwrap();

    let candidates = ctx
        .queries
        .handle_parent_candidates(ListParentCandidatesQuery { exclude_id: Some(bar.id()) })
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, spa.id());

    let active = ctx.queries.handle_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, bar.id());

    assert_eq!(ctx.queries.handle_all().await.unwrap().len(), 2);
}
