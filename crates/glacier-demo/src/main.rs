//! Demo: several gated actions dispatched at once, released in reverse
//! order, applied in dispatch order.

use glacier_config::StoreSettings;
use glacier_store::{
    Action, ActivityTracker, Observer, Outcome, Store, StoreHandle, StoreOptions,
};
use std::sync::Arc;
use std::time::Duration;

mod logger;

#[derive(Debug, Clone, Default)]
struct Ledger {
    entries: Vec<String>,
    total: i64,
}

/// Action that waits `delay` before booking `amount`, returning the new total
fn book(label: &'static str, amount: i64, delay: Duration) -> Action<Ledger, i64> {
    Action::new(label, move |mut ledger: Ledger| async move {
        tokio::time::sleep(delay).await;
        if ledger.total + amount < 0 {
            anyhow::bail!("{} would overdraw the ledger ({})", label, ledger.total);
        }
        ledger.total += amount;
        ledger.entries.push(format!("{label}: {amount:+}"));
        let total = ledger.total;
        Ok(Outcome::StateWith(ledger, total))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init()?;
    let settings = StoreSettings::load();
    logger::apply_settings_level(&settings.log_level);

    log::info!("Starting glacier-demo");

    let tracker = ActivityTracker::new();
    let options = StoreOptions::from_settings(&settings)
        .default_tracker(Arc::new(tracker.clone()));
    let store = Store::with_options(Ledger::default(), options)?;

    let _subscription = store
        .subscribe(Observer::new(|ledger: &Ledger| {
            log::info!("Ledger total is now {}", ledger.total);
        }))
        .map_err(|e| log::info!("Notifications off: {}", e))
        .ok();

    // Later dispatches finish their own work sooner
    let dispatched = vec![
        store.dispatch(book("deposit", 100, Duration::from_millis(30))),
        store.dispatch(book("rent", -80, Duration::from_millis(20))),
        store.dispatch(book("groceries", -50, Duration::from_millis(10))),
        store.dispatch(book("salary", 200, Duration::from_millis(0))),
    ];
    log::info!("{} actions in flight", tracker.pending());

    for pending in dispatched {
        let id = pending.id();
        match pending.await {
            Ok(total) => log::info!("Dispatch #{} settled, total {:?}", id, total),
            Err(e) => log::warn!("Dispatch #{} failed: {:#}", id, e),
        }
    }
    tracker.wait_idle().await;

    let ledger = store.state();
    for entry in &ledger.entries {
        println!("{entry}");
    }
    println!("total: {}", ledger.total);

    log::info!("Exiting glacier-demo");
    Ok(())
}
