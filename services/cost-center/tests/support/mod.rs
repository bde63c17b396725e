//! 集成测试共用工具

#![allow(dead_code)]

use std::sync::Arc;

use cost_center::application::{
    CostCenterCommandHandler, CostCenterFields, CostCenterQueryHandler, CreateCostCenterCommand,
    UpdateCostCenterCommand,
};
use cost_center::domain::{CostCenter, CostCenterId};
use cost_center::infrastructure::persistence::InMemoryCostCenterRepository;
use pms_errors::AppResult;

pub struct TestContext {
    pub repo: Arc<InMemoryCostCenterRepository>,
    pub commands: CostCenterCommandHandler<InMemoryCostCenterRepository>,
    pub queries: CostCenterQueryHandler<InMemoryCostCenterRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryCostCenterRepository::new());
        Self {
            commands: CostCenterCommandHandler::new(repo.clone()),
            queries: CostCenterQueryHandler::new(repo.clone()),
            repo,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        code: Option<&str>,
        parent: Option<CostCenterId>,
    ) -> AppResult<CostCenter> {
        let cmd = CreateCostCenterCommand::parse(&fields(
            name,
            code.unwrap_or_default(),
            &parent.map(|id| id.to_string()).unwrap_or_default(),
        ))?;
        self.commands.handle_create(cmd).await
    }

    pub async fn set_parent(
        &self,
        id: CostCenterId,
        name: &str,
        parent: Option<CostCenterId>,
    ) -> AppResult<CostCenter> {
        let cmd = UpdateCostCenterCommand::parse(
            id,
            &fields(name, "", &parent.map(|p| p.to_string()).unwrap_or_default()),
            Some("true"),
        )?;
        self.commands.handle_update(cmd).await
    }
}

pub fn fields(name: &str, code: &str, parent_id: &str) -> CostCenterFields {
    CostCenterFields {
        name: Some(name.to_string()),
        description: None,
        code: Some(code.to_string()),
        parent_id: Some(parent_id.to_string()),
    }
}
