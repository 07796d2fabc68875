//! # List Subcommand
//!
//! Tenant-scoped listings rendered as fixed-width tables. Timestamps go
//! through the shared date-safe formatter, so absent values render as a
//! placeholder instead of `null`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use edl_core::{format_timestamp, DateFormat, TenantId};
use edl_service::LedgerService;
use edl_state::{AuditEvent, CanonicalEntity, Decision, DynEvidence, WorkItem};
use edl_store::LedgerStore;

use crate::config::DEFAULT_SNAPSHOT;

/// Arguments for the list subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum)]
    pub what: ListKind,

    /// Tenant slug.
    #[arg(long)]
    pub tenant: String,

    /// Snapshot file backing the store.
    #[arg(long, default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,
}

/// Listable record families.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ListKind {
    Evidence,
    WorkItems,
    Entities,
    Decisions,
    Audit,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let tenant = TenantId::new(&args.tenant)?;
    let store = Arc::new(LedgerStore::with_snapshot(&args.snapshot)?);
    let service = LedgerService::new(store);

    match args.what {
        ListKind::Evidence => {
            let mut records = service.list_sealed_evidence(&tenant)?;
            records.extend(service.list_evidence_drafts(&tenant)?);
            print_evidence(&records);
        }
        ListKind::WorkItems => print_work_items(&service.list_work_items(&tenant)?),
        ListKind::Entities => print_entities(&service.list_entities(&tenant)?),
        ListKind::Decisions => print_decisions(&service.list_decisions(&tenant)?),
        ListKind::Audit => print_audit(&service.list_audit(&tenant)?),
    }
    Ok(())
}

fn print_evidence(records: &[DynEvidence]) {
    println!(
        "{:<14} {:<17} {:<18} {:<20} {:<10}",
        "DISPLAY ID", "DATASET", "STATUS", "SOURCE", "SEALED"
    );
    for record in records {
        println!(
            "{:<14} {:<17} {:<18} {:<20} {:<10}",
            record.display_id.as_str(),
            record.dataset.as_str(),
            record.status.name(),
            clip(&record.source_system, 20),
            format_timestamp(record.sealed_at.as_ref(), DateFormat::Date),
        );
    }
    println!("{} records", records.len());
}

fn print_work_items(items: &[WorkItem]) {
    println!(
        "{:<14} {:<11} {:<12} {:<9} {:<24} {}",
        "DISPLAY ID", "TYPE", "STATUS", "PRIORITY", "OWNER", "TITLE"
    );
    for item in items {
        println!(
            "{:<14} {:<11} {:<12} {:<9} {:<24} {}",
            item.display_id.as_str(),
            item.item_type.as_str(),
            item.status.as_str(),
            item.priority.as_str(),
            clip(&item.owner, 24),
            clip(&item.title, 48),
        );
    }
    println!("{} work items", items.len());
}

fn print_entities(entities: &[CanonicalEntity]) {
    println!(
        "{:<34} {:<9} {:<9} {:<16} {:>9} {:>11}",
        "NAME", "KIND", "MAPPING", "READINESS", "CONFLICTS", "QUARANTINED"
    );
    for entity in entities {
        println!(
            "{:<34} {:<9} {:<9} {:<16} {:>9} {:>11}",
            clip(&entity.display_name, 34),
            entity.kind.as_str(),
            entity.mapping_status.as_str(),
            entity.readiness().as_str(),
            entity.open_conflict_count,
            entity.quarantined_evidence_count,
        );
    }
    println!("{} entities", entities.len());
}

fn print_decisions(decisions: &[Decision]) {
    println!(
        "{:<18} {:<26} {:<30} {:<10}",
        "OUTCOME", "REASON CODE", "ACTOR", "DECIDED"
    );
    for decision in decisions {
        println!(
            "{:<18} {:<26} {:<30} {:<10}",
            decision.outcome.as_str(),
            clip(&decision.reason_code, 26),
            clip(&decision.actor, 30),
            format_timestamp(Some(&decision.decided_at), DateFormat::Date),
        );
    }
    println!("{} decisions", decisions.len());
}

fn print_audit(events: &[AuditEvent]) {
    println!(
        "{:>4} {:<22} {:<12} {:<28} {:<16}",
        "SEQ", "EVENT", "OBJECT", "ACTOR", "AT"
    );
    for event in events {
        println!(
            "{:>4} {:<22} {:<12} {:<28} {:<16}",
            event.sequence,
            event.event_type.as_str(),
            event.object_type.as_str(),
            clip(&event.actor, 28),
            format_timestamp(Some(&event.occurred_at), DateFormat::Full),
        );
    }
    println!("{} audit events", events.len());
}

/// Clip to `max` characters, ending clipped text with an ellipsis.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}
