//! Reshaping of wire records into display rows

use sensei_admin_core::{NodePage, NodeRecord, NodeRole, NodeStatus};

use crate::tui::types::row::{DisplayRow, ACTIONS_MARKER};

/// Characters kept on each side of a truncated pubkey
pub const PUBKEY_KEEP: usize = 10;

const ELLIPSIS: &str = "...";

/// One page of display rows together with its pagination metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub rows: Vec<DisplayRow>,
    pub has_more: bool,
    pub total: u64,
}

/// Keep the first and last `keep` characters of `s`, joined by `...`.
///
/// Strings no longer than `2 * keep + 3` characters are returned unchanged,
/// so applying the function to its own output is a no-op.
pub fn truncate_middle(s: &str, keep: usize) -> String {
    let len = s.chars().count();
    if len <= keep * 2 + ELLIPSIS.len() {
        return s.to_string();
    }

    let head: String = s.chars().take(keep).collect();
    let tail: String = s.chars().skip(len - keep).collect();
    format!("{}{}{}", head, ELLIPSIS, tail)
}

/// Build the display row for a single record.
pub fn to_display_row(record: &NodeRecord) -> DisplayRow {
    DisplayRow {
        pubkey: record.pubkey.clone(),
        alias: record.alias.clone(),
        username: record.username.clone(),
        role: NodeRole::from_code(record.role),
        status: NodeStatus::from_code(record.status),
        listen_addr: record.listen_addr.clone(),
        listen_port: record.listen_port,
        connection_info: format!(
            "{}@{}:{}",
            truncate_middle(&record.pubkey, PUBKEY_KEEP),
            record.listen_addr,
            record.listen_port
        ),
        actions: ACTIONS_MARKER,
    }
}

/// Transform a fetched page, preserving row order.
pub fn transform_page(page: &NodePage) -> ResultPage {
    ResultPage {
        rows: page.nodes.iter().map(to_display_row).collect(),
        has_more: page.pagination.has_more,
        total: page.pagination.total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sensei_admin_core::PaginationMeta;

    #[test]
    fn test_truncate_long_pubkey() {
        let pubkey = "02abcdef0123456789aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa9876543210fedcba";
        assert_eq!(truncate_middle(pubkey, 10), "02abcdef01...3210fedcba");
    }

    #[test]
    fn test_truncate_threshold() {
        let exact = "a".repeat(23);
        assert_eq!(truncate_middle(&exact, 10), exact);

        let over = format!("{}{}", "a".repeat(10), "b".repeat(14));
        assert_eq!(truncate_middle(&over, 10), "aaaaaaaaaa...bbbbbbbbbb");
    }

    #[test]
    fn test_row_decodes_codes_and_formats_connection() {
        let record = NodeRecord::new(
            "02".to_string() + &"f".repeat(64),
            "carol-node",
            "carol",
            NodeRole::Child,
            NodeStatus::Stopped,
            "10.0.0.7",
            9737,
        );

        let row = to_display_row(&record);

        assert_eq!(row.role_label(), "Child");
        assert_eq!(row.status_label(), "Stopped");
        assert_eq!(row.connection_info, "02ffffffff...ffffffffff@10.0.0.7:9737");
        assert_eq!(row.full_connection_string(), record.connection_string());
        assert_eq!(row.actions, "Action");
    }

    #[test]
    fn test_page_keeps_order_and_pagination() {
        let page = NodePage {
            nodes: vec![
                NodeRecord::new("b", "b", "b", NodeRole::Child, NodeStatus::Running, "h", 1),
                NodeRecord::new("a", "a", "a", NodeRole::Sensei, NodeStatus::Running, "h", 2),
            ],
            pagination: PaginationMeta {
                has_more: true,
                total: 9,
            },
        };

        let result = transform_page(&page);

        let keys: Vec<&str> = result.rows.iter().map(|r| r.pubkey.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert!(result.has_more);
        assert_eq!(result.total, 9);
    }

    proptest! {
        #[test]
        fn prop_truncate_is_idempotent(s in "\\PC{0,80}", keep in 1usize..16) {
            let once = truncate_middle(&s, keep);
            prop_assert_eq!(truncate_middle(&once, keep), once.clone());
            prop_assert!(once.chars().count() <= s.chars().count().max(keep * 2 + 3));
        }

        #[test]
        fn prop_transform_is_deterministic(
            pubkey in "[0-9a-f]{0,66}",
            role in 0u8..4,
            status in 0u8..4,
            port in any::<u16>(),
        ) {
            let mut record = NodeRecord::new(
                pubkey, "alias", "user", NodeRole::Child, NodeStatus::Running, "127.0.0.1", port,
            );
            record.role = role;
            record.status = status;

            prop_assert_eq!(to_display_row(&record), to_display_row(&record));
        }
    }
}
