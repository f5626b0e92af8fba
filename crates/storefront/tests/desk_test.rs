use std::time::Duration;
use storefront::desk::{Catalog, DeskSchedule, SettlementPolicy};
use storefront::lifecycle::StoreSystem;
use storefront::model::{CreateOrderRequest, OrderItemRequest, OrderStatus, UserId};
use storefront::OrderError;

fn schedule(policy: SettlementPolicy) -> DeskSchedule {
    DeskSchedule {
        processing_delay: Duration::from_millis(1_000),
        settlement_delay: Duration::from_millis(2_000),
        policy,
    }
}

fn request(lines: &[(u64, u32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| OrderItemRequest {
                product_id,
                quantity,
            })
            .collect(),
    }
}

async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Pattern: real desk and processor, observed only through the desk client.
#[tokio::test(start_paused = true)]
async fn test_processor_advances_orders_on_schedule() {
    let system = StoreSystem::new(schedule(SettlementPolicy::Alternate));
    let desk = system.desk.clone();

    let first = desk.place(request(&[(1, 2)])).await.unwrap();
    let second = desk.place(request(&[(3, 1), (4, 1)])).await.unwrap();
    assert_eq!(first.status, OrderStatus::Pending);
    assert_eq!(first.total, 3198.0);
    assert_eq!(second.total, 1278.0);
    assert_eq!(second.items[1].product_name.as_deref(), Some("Arc A770"));

    advance_ms(1_010).await;
    assert_eq!(desk.get(first.id).await.unwrap().status, OrderStatus::Processing);
    assert_eq!(desk.get(second.id).await.unwrap().status, OrderStatus::Processing);

    advance_ms(2_000).await;
    assert_eq!(desk.get(first.id).await.unwrap().status, OrderStatus::Completed);
    assert_eq!(desk.get(second.id).await.unwrap().status, OrderStatus::Expired);

    system.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_list_is_scoped_to_user_and_newest_first() {
    let system = StoreSystem::new(schedule(SettlementPolicy::Complete));
    let alice = system.desk.as_user(UserId(1));
    let bob = system.desk.as_user(UserId(2));

    let a1 = alice.place(request(&[(1, 1)])).await.unwrap();
    let b1 = bob.place(request(&[(2, 1)])).await.unwrap();
    let a2 = alice.place(request(&[(4, 3)])).await.unwrap();

    let ids: Vec<_> = alice.list().await.unwrap().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![a2.id, a1.id]);
    assert_eq!(
        bob.get(a1.id).await,
        Err(OrderError::NotFound(format!("order {}", a1.id)))
    );
    assert_eq!(bob.get(b1.id).await.unwrap().user_id, UserId(2));

    system.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_place_rejects_invalid_orders() {
    let system = StoreSystem::with_catalog(schedule(SettlementPolicy::Complete), Catalog::demo());
    let desk = system.desk.clone();

    assert!(matches!(
        desk.place(request(&[])).await,
        Err(OrderError::Validation(_))
    ));
    assert!(matches!(
        desk.place(request(&[(1, 0)])).await,
        Err(OrderError::Validation(_))
    ));
    assert_eq!(
        desk.place(request(&[(99, 1)])).await,
        Err(OrderError::NotFound("product 99".to_string()))
    );
    assert!(desk.list().await.unwrap().is_empty());

    system.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_offline_desk_refuses_customer_requests() {
    let system = StoreSystem::new(schedule(SettlementPolicy::Complete));
    let desk = system.desk.clone();
    let order = desk.place(request(&[(2, 1)])).await.unwrap();

    desk.set_offline(true).await.unwrap();
    assert!(matches!(desk.get(order.id).await, Err(OrderError::Unavailable(_))));
    assert!(matches!(desk.list().await, Err(OrderError::Unavailable(_))));

    // The server keeps working while customers cannot reach it.
    advance_ms(3_010).await;
    desk.set_offline(false).await.unwrap();
    assert_eq!(desk.get(order.id).await.unwrap().status, OrderStatus::Completed);

    system.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_desk() {
    let system = StoreSystem::new(schedule(SettlementPolicy::Complete));
    let desk = system.desk.clone();
    desk.place(request(&[(1, 1)])).await.unwrap();

    system.shutdown().await;
    assert!(matches!(
        desk.list().await,
        Err(OrderError::DeskCommunication(_))
    ));
}
