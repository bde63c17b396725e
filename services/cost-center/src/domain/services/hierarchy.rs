//! 层级规则
//!
//! 环检测和树形重建

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::domain::entities::{CostCenter, CostCenterNode};
use crate::domain::repositories::{CostCenterRepository, RepositoryResult};
use crate::domain::value_objects::CostCenterId;

/// 判断把 `candidate_parent` 设为 `child` 的父级是否会形成环
///
/// 从候选父级沿父级链向上遍历，每一步读取一次存储：
/// - 遇到 `child` 说明候选父级是它的后代，会形成环
/// - 到达根节点或不存在的节点则不会形成环
///
/// 没有深度上限。`candidate_parent == child` 也返回 true，
/// 但调用方应在此之前以校验错误拒绝。
pub async fn would_create_cycle<R>(
    repo: &R,
    child: CostCenterId,
    candidate_parent: CostCenterId,
) -> RepositoryResult<bool>
where
    R: CostCenterRepository + ?Sized,
{
    let mut visited = HashSet::new();
    let mut current = Some(candidate_parent);

    while let Some(id) = current {
        if id == child {
            return Ok(true);
        }
        // 已有数据中存在不经过 child 的环，继续遍历不会终止
        if !visited.insert(id) {
            warn!(
                child = %child,
                candidate_parent = %candidate_parent,
                looped_at = %id,
                "Existing parent chain already contains a cycle"
            );
            return Ok(false);
        }
        current = repo.find_parent_id(id).await?;
    }

    Ok(false)
}

/// 把平铺的成本中心列表重建为树
///
/// 父级不在列表中（或指向自身）的节点作为根节点，同级按名称升序。
/// 已有数据中的环会导致一组节点都无法从根到达，此时把其中 ID 最小的节点提升为根。
pub fn build_tree(centers: Vec<CostCenter>) -> Vec<CostCenterNode> {
    let known: HashSet<CostCenterId> = centers.iter().map(CostCenter::id).collect();

    let mut roots = Vec::new();
    let mut children_of: HashMap<CostCenterId, Vec<CostCenter>> = HashMap::new();
    for center in centers {
        match center.parent_id() {
            Some(parent) if parent != center.id() && known.contains(&parent) => {
                children_of.entry(parent).or_default().push(center);
            }
            _ => roots.push(center),
        }
    }

    let mut tree: Vec<CostCenterNode> = roots
        .into_iter()
        .map(|root| attach_children(root, &mut children_of))
        .collect();

    // 剩余节点只可能属于环
    while !children_of.is_empty() {
        let mut leftovers: BTreeMap<CostCenterId, CostCenter> = children_of
            .drain()
            .flat_map(|(_, list)| list)
            .map(|center| (center.id(), center))
            .collect();
        let Some((_, promoted)) = leftovers.pop_first() else {
            break;
        };
        warn!(id = %promoted.id(), "Cost center is part of a parent cycle, shown as root");
        for center in leftovers.into_values() {
            if let Some(parent) = center.parent_id() {
                children_of.entry(parent).or_default().push(center);
            }
        }
        tree.push(attach_children(promoted, &mut children_of));
    }

    sort_nodes(&mut tree);
    tree
}

fn attach_children(
    center: CostCenter,
    children_of: &mut HashMap<CostCenterId, Vec<CostCenter>>,
) -> CostCenterNode {
    let mut children: Vec<CostCenterNode> = children_of
        .remove(&center.id())
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_children(child, children_of))
        .collect();
    sort_nodes(&mut children);

    CostCenterNode {
        cost_center: center,
        children,
    }
}

fn sort_nodes(nodes: &mut [CostCenterNode]) {
    nodes.sort_by(|a, b| {
        a.cost_center
            .name()
            .cmp(b.cost_center.name())
            .then_with(|| a.cost_center.id().cmp(&b.cost_center.id()))
    });
}
