//! Apply command
//!
//! Usage: nestattr apply --config <CONFIG> --association <NAME> --input <JSON>
//!        [--fixture <JSON>] [--unloaded] [--save] [--log <dev|prod>]
//!        [--trace-id <ID>]

use clap::Args;
use nestattr_core::logging_facility::{self, Profile};
use nestattr_core::memory::{HasMany, MemoryStore};
use nestattr_core::{
    assign_nested_attributes, AssociationRef, ExError, ExErrorKind, Record,
    ReconciliationRequest,
};
use nestattr_core_types::{RequestContext, TraceId};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use super::{load_registry, read_file, serialization_error};

const OP: &str = "apply";

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// TOML declaration file
    #[arg(long)]
    pub config: PathBuf,

    /// Declared association to reconcile
    #[arg(long)]
    pub association: String,

    /// Nested input (JSON map of maps, or list of maps)
    #[arg(long)]
    pub input: PathBuf,

    /// Existing children (JSON array of objects, each with an `id`)
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Leave the association unloaded so referenced ids are fetched
    #[arg(long)]
    pub unloaded: bool,

    /// Save after reconciling (drops children marked for destruction)
    #[arg(long)]
    pub save: bool,

    /// Log to stderr with the given profile
    #[arg(long)]
    pub log: Option<Profile>,

    /// Trace id to attach to log events and errors
    #[arg(long)]
    pub trace_id: Option<String>,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> Result<(), ExError> {
    if let Some(profile) = args.log {
        logging_facility::init(profile);
    }

    let mut context = RequestContext::new();
    if let Some(trace_id) = args.trace_id {
        context = context.with_trace_id(TraceId::from_string(trace_id));
    }

    let registry = load_registry(OP, &args.config)?;
    let input = read_json(&args.input)?;
    let existing = match &args.fixture {
        Some(path) => read_fixture(path)?,
        None => Vec::new(),
    };

    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    if !existing.is_empty() {
        let parent_id = store.persist_owner(&mut parent);
        store.seed(&args.association, &parent_id, existing);
    }

    let mut children = HasMany::new(&mut store, &mut parent, args.association.as_str());
    if !args.unloaded {
        children.load();
    }

    let request = ReconciliationRequest::new(&args.association, &input).with_context(context);
    let report = assign_nested_attributes(&registry, &request, AssociationRef::Many(&mut children))
        .map_err(|e| correlated(e.into(), &request.context))?;

    if args.save {
        let summary = children.save();
        tracing::info!(
            association = args.association.as_str(),
            inserted = summary.inserted as u64,
            updated = summary.updated as u64,
            deleted = summary.deleted as u64,
            "saved"
        );
    }

    let output = json!({
        "outcomes": report.outcomes,
        "children": children.records(),
    });
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| serialization_error(OP, "cannot render output", e))?;
    println!("{}", rendered);

    Ok(())
}

fn correlated(err: ExError, context: &RequestContext) -> ExError {
    let err = err.with_op(OP).with_request_id(context.request_id.clone());
    match &context.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}

fn read_json(path: &Path) -> Result<Value, ExError> {
    let src = read_file(OP, path)?;
    serde_json::from_str(&src)
        .map_err(|e| serialization_error(OP, &format!("invalid JSON in {}", path.display()), e))
}

fn read_fixture(path: &Path) -> Result<Vec<Record>, ExError> {
    let rows: Vec<Record> = serde_json::from_value(read_json(path)?)
        .map_err(|e| serialization_error(OP, "fixture must be an array of objects", e))?;
    if let Some(index) = rows.iter().position(|row| row.id.is_none()) {
        return Err(ExError::new(ExErrorKind::Serialization)
            .with_op(OP)
            .with_message(format!("fixture row {} has no id", index)));
    }
    Ok(rows)
}
