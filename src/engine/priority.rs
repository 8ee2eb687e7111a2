// ==========================================
// 货物装载摆放系统 - 优先级排序引擎
// ==========================================
// 职责: 决定物品的处理顺序
// 规则: priority 降序；同优先级保持到达顺序（稳定排序）
// ==========================================

use crate::domain::cargo::Item;
use std::cmp::Ordering;

// ==========================================
// PrioritySorter - 优先级排序引擎
// ==========================================
pub struct PrioritySorter {
    // 无状态引擎,不需要注入依赖
}

impl PrioritySorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 返回按处理顺序排列的物品引用
    pub fn sort<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        let mut ordered: Vec<&Item> = items.iter().collect();
        // sort_by 为稳定排序
        ordered.sort_by(|a, b| self.compare(a, b));
        ordered
    }

    /// 比较两个物品的处理先后
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        b.priority.cmp(&a.priority)
    }
}

impl Default for PrioritySorter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, priority: i32) -> Item {
        Item {
            item_id: id.to_string(),
            name: id.to_string(),
            width: 1.0,
            depth: 1.0,
            height: 1.0,
            mass: 1.0,
            priority,
            expiry_date: None,
            usage_limit: 0,
            preferred_zone: "A".to_string(),
        }
    }

    #[test]
    fn test_descending_priority() {
        let items = vec![item("low", 10), item("high", 90), item("mid", 50)];
        let ids: Vec<&str> = PrioritySorter::new()
            .sort(&items)
            .iter()
            .map(|i| i.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let items = vec![item("a", 50), item("b", 70), item("c", 50), item("d", 50)];
        let ids: Vec<&str> = PrioritySorter::new()
            .sort(&items)
            .iter()
            .map(|i| i.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }
}
