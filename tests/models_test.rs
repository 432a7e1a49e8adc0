//! Deserialization tests against captured backlog service responses.

use kebubbi::models::PaymentStatus;
use kebubbi::models::order::Order;
use kebubbi::models::stats::CompletedStats;

const OPEN_ORDERS_JSON: &str = include_str!("fixtures/open_orders.json");
const COMPLETED_TODAY_JSON: &str = include_str!("fixtures/completed_today.json");
const COMPLETED_TOTAL_JSON: &str = include_str!("fixtures/completed_total.json");
const COMPLETED_LIST_JSON: &str = include_str!("fixtures/completed_list.json");

#[test]
fn test_open_orders_deserialize() {
    let orders: Vec<Order> =
        serde_json::from_str(OPEN_ORDERS_JSON).expect("Failed to deserialize open orders");

    assert_eq!(orders.len(), 2);

    let first = &orders[0];
    assert_eq!(first.id, 101);
    assert_eq!(first.waiter, "Roman");
    assert_eq!(first.customer_label(), Some("Table 4"));
    assert_eq!(first.payment_status, PaymentStatus::Unpaid);
    assert!(first.completed_at.is_none());
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].note.as_deref(), Some("no onion"));
    assert!(first.items[0].wants_drink());
    assert!(!first.items[1].wants_drink());

    let second = &orders[1];
    assert_eq!(second.custom_id.as_deref(), Some("A-7"));
    assert_eq!(second.payment_status, PaymentStatus::Paid);
    // Blank customer names carry no label.
    assert_eq!(second.customer_label(), None);
    assert!(second.items[0].is_entree());
}

#[test]
fn test_today_stats_deserialize() {
    let stats: CompletedStats =
        serde_json::from_str(COMPLETED_TODAY_JSON).expect("Failed to deserialize today stats");

    assert_eq!(stats.count, 17);
    assert_eq!(stats.avg_minutes, 8.4);
}

#[test]
fn test_total_stats_deserialize() {
    let stats: CompletedStats =
        serde_json::from_str(COMPLETED_TOTAL_JSON).expect("Failed to deserialize total stats");

    assert_eq!(stats.count, 243);
    assert_eq!(stats.avg_minutes, 9.1);
}

#[test]
fn test_completed_list_deserializes_with_completion_fields() {
    let orders: Vec<Order> =
        serde_json::from_str(COMPLETED_LIST_JSON).expect("Failed to deserialize completed list");

    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.id, 95);
    assert_eq!(order.completed_at.as_deref(), Some("2025-08-25 11:49:12"));
    assert_eq!(order.duration_minutes, Some(9.2));
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}
