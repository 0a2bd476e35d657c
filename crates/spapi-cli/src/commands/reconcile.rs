//! Reconcile command implementation.

use serde_json::json;
use spapi_canonical::{ContentHasher, PartitionId};
use spapi_journal::WriteOptions;
use spapi_sync::{FileStateStore, JournalEventPublisher, Reconciler, RecordKeys};
use tracing::debug;

use crate::input;

pub struct ReconcileArgs {
    pub input: Option<String>,
    pub partition: String,
    pub state: String,
    pub journal: String,
    pub key_field: String,
    pub ordering_field: String,
    pub deep: bool,
    pub json: bool,
}

pub fn run(args: ReconcileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let partition = PartitionId::parse(args.partition.as_str())
        .map_err(|e| format!("Invalid partition: {}", e))?;
    let records = input::records_from_value(input::read_json(args.input.as_deref())?)?;
    debug!(partition = %partition, records = records.len(), "reconciling input batch");

    let store = FileStateStore::open(&args.state)?;
    let publisher = JournalEventPublisher::open(&args.journal, WriteOptions::default())?;
    let keys = RecordKeys::new(args.key_field, args.ordering_field);
    let mut reconciler = Reconciler::with_keys(store, publisher, keys)
        .with_hasher(ContentHasher::new(super::profile(args.deep)));

    let report = reconciler.reconcile(&partition, records)?;
    let (_, publisher) = reconciler.into_parts();
    publisher.finish()?;

    let watermark = report.watermark.as_ref().map(|w| w.as_str().to_string());
    if args.json {
        let out = json!({
            "partition": partition.as_str(),
            "first_sync": report.first_sync,
            "created": report.created,
            "updated": report.updated,
            "unchanged": report.unchanged,
            "watermark": watermark,
            "watermark_advanced": report.watermark_advanced,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if report.first_sync {
        println!(
            "{}: initialized, watermark {}",
            partition,
            watermark.unwrap_or_default()
        );
    } else {
        println!(
            "{}: {} created, {} updated, {} unchanged, watermark {}{}",
            partition,
            report.created,
            report.updated,
            report.unchanged,
            watermark.unwrap_or_else(|| "-".to_string()),
            if report.watermark_advanced { " (advanced)" } else { "" }
        );
    }
    Ok(())
}
