use pos_core::ledger::{BucketFilter, summarize};
use pos_core::{Config, Store, setup_environment};

fn main() -> anyhow::Result<()> {
    // 1. Environment (.env, then config, then logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config)?;

    // 2. Open the store snapshot
    let path = config.snapshot_path();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "No snapshot found, nothing to report");
        return Ok(());
    }
    let store = Store::open(&path, config.checkout_settings())?;

    // 3. Ledger report
    println!("Ledger report: {}", path.display());
    for filter in [BucketFilter::Efectivo, BucketFilter::Digital, BucketFilter::Todos] {
        println!("  {:<10} {:>12.2}", filter.label(), store.balance(filter));
    }

    let summary = summarize(store.cash_movements());
    println!("By category:");
    for (category, totals) in &summary.by_category {
        println!(
            "  {:<20} in {:>10.2}  out {:>10.2}  net {:>10.2}",
            category, totals.income, totals.expense, totals.net
        );
    }

    tracing::info!(
        sales = store.sales().len(),
        movements = store.cash_movements().len(),
        "Ledger report printed"
    );
    Ok(())
}
