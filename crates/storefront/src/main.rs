//! # Storefront Demo
//!
//! Places two orders and watches them settle through both views:
//!
//! 1. Start the [`StoreSystem`] (order desk and processor).
//! 2. Mount the [`OrdersPage`]; it loads the (empty) list and stays idle.
//! 3. Place two orders from the page. Each is folded into the list, which arms polling.
//! 4. Mount an [`OrderDetail`] for the first order and wait for it to settle.
//! 5. Wait for the list to go quiet, print it, and shut everything down.
//!
//! ```bash
//! RUST_LOG=info cargo run -p storefront
//! STORE_SETTLEMENT_DELAY_MS=2000 ORDER_SYNC_INTERVAL_MS=500 RUST_LOG=debug cargo run -p storefront
//! ```

use status_sync::PollConfig;
use storefront::lifecycle::{setup_tracing, DeskSchedule, StoreSystem};
use storefront::model::{OrderItemRequest, UserId};
use storefront::views::{OrderDetail, OrdersPage};
use tracing::{info, info_span, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = PollConfig::from_env().map_err(|e| e.to_string())?;
    let schedule = DeskSchedule::from_env().map_err(|e| e.to_string())?;
    info!(
        interval_ms = config.interval().as_millis() as u64,
        ?schedule,
        "Starting storefront demo"
    );

    let system = StoreSystem::new(schedule);
    let client = system.client_for(UserId(1));

    let mut page = OrdersPage::open(client.clone(), config);
    page.subscribe()
        .wait_for(|s| s.loaded)
        .await
        .map_err(|e| e.to_string())?;
    info!(orders = page.orders().len(), polling = page.is_polling(), "Orders page loaded");

    let first = page
        .create_order(vec![OrderItemRequest {
            product_id: 1,
            quantity: 2,
        }])
        .instrument(info_span!("place_order"))
        .await
        .map_err(|e| e.to_string())?;
    let second = page
        .create_order(vec![
            OrderItemRequest {
                product_id: 3,
                quantity: 1,
            },
            OrderItemRequest {
                product_id: 4,
                quantity: 1,
            },
        ])
        .instrument(info_span!("place_order"))
        .await
        .map_err(|e| e.to_string())?;
    info!(first = %first.id, second = %second.id, polling = page.is_polling(), "Orders placed");

    let mut detail = OrderDetail::open(client, first, config);
    let settled = detail
        .wait_until_settled()
        .instrument(info_span!("order_detail"))
        .await;
    info!(order_id = %settled.id, status = %settled.status, "Detail view settled");
    for banner in detail.take_banners() {
        info!(order_id = %banner.order_id, "{}", banner.message);
    }

    page.subscribe()
        .wait_for(|s| !s.armed)
        .await
        .map_err(|e| e.to_string())?;
    for banner in page.take_banners() {
        info!(order_id = %banner.order_id, "{}", banner.message);
    }
    println!("{}", page.render());

    detail.close().await;
    page.close().await;
    system.shutdown().await;
    Ok(())
}
