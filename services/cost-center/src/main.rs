//! 成本中心服务入口

use std::sync::Arc;

use cost_center::api::cost_center_routes;
use cost_center::infrastructure::persistence::{PostgresCostCenterRepository, migrations};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    pms_bootstrap::run("config", &migrations(), |infra| async move {
        let repo = Arc::new(PostgresCostCenterRepository::new(infra.postgres_pool()));
        Ok(cost_center_routes(repo))
    })
    .await
}
