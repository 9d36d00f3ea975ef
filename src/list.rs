use anyhow::Result;

use crate::config::Config;
use crate::layout::Layout;
use crate::models::ItemSummary;
use crate::reindex::summarize_item;

/// Summaries of all open items, in index order. Read-only.
pub async fn collect_items(
    layout: &Layout,
    config: &Config,
    include_next: bool,
) -> Result<Vec<ItemSummary>> {
    let mut items = Vec::new();
    for dir_name in layout.list_item_dirs()? {
        let item = layout.load_item(&dir_name).await;
        items.push(summarize_item(&item, &config.headings, include_next));
    }
    Ok(items)
}

pub async fn list_items(layout: &Layout, config: &Config, include_next: bool) -> Result<()> {
    let items = collect_items(layout, config, include_next).await?;

    if items.is_empty() {
        println!("No open work items in {}", layout.open_dir().display());
        return Ok(());
    }

    println!("{:<10} {:<10} {:<40} TITLE", "PLAN", "BUILD", "ITEM");
    for item in &items {
        println!(
            "{:<10} {:<10} {:<40} {}",
            item.plan_status, item.build_status, item.dir_name, item.title
        );
        if let Some(next) = &item.next_action {
            println!("{:<21} next: {}", "", next);
        }
    }

    Ok(())
}
