//! Interactive-ish demo: build a grouped store, drive the view through a
//! few mutations, and print what a presentation layer would see.
//!
//! ```sh
//! cargo run -p gridkit-engine --bin grouping_demo
//! ```

use anyhow::Result;
use gridkit_engine::{GroupedView, GroupingConfig, ViewEvent};
use gridkit_model::{GrouperSpec, MemoryStore, Record, RecordId};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

fn print_view(label: &str, view: &GroupedView<MemoryStore>) {
    println!("-- {label} ({} visible / {} total)", view.len(), view.total_len());
    view.each(|record| match record.placeholder_of() {
        Some(key) => println!("   [+] {key}"),
        None => println!("       {} {:?}", record.id(), record.get("total")),
    });
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    info!("Starting grouping demo");

    let mut store = MemoryStore::new("orders").with_grouper(GrouperSpec::new("status"));
    store.insert_all(vec![
        Record::new("o1").with_field("status", "open").with_field("total", 10),
        Record::new("o2").with_field("status", "open").with_field("total", 20),
        Record::new("o3").with_field("status", "shipped").with_field("total", 30),
        Record::new("o4").with_field("status", "done").with_field("total", 40),
    ])?;
    let store = Rc::new(RefCell::new(store));

    let mut view = GroupedView::new(store.clone(), GroupingConfig::new().with_summary(true));
    view.subscribe(|event| match event {
        ViewEvent::Replace {
            index,
            removed,
            added,
        } => info!(
            "event: replace @{} -{} +{}",
            index,
            removed.len(),
            added.len()
        ),
        other => info!("event: {:?}", other),
    });

    print_view("initial", &view);

    view.collapse_group("open");
    print_view("after collapse(open)", &view);

    let event = store
        .borrow_mut()
        .set_field(&RecordId::from("o1"), "total", 11)?;
    view.notify(event);

    let event = store
        .borrow_mut()
        .insert(Record::new("o5").with_field("status", "shipped").with_field("total", 50))?;
    view.notify(event);
    print_view("after insert(o5)", &view);

    view.expand_group("open");
    print_view("after expand(open)", &view);

    info!("Demo complete");
    Ok(())
}
