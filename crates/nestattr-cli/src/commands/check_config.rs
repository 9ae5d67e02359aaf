//! Check-config command
//!
//! Usage: nestattr check-config <CONFIG>

use clap::Args;
use nestattr_core::ExError;
use std::path::PathBuf;

use super::load_registry;

const OP: &str = "check_config";

#[derive(Debug, Args)]
pub struct CheckConfigArgs {
    /// TOML file with one table per association
    pub config: PathBuf,
}

/// Execute check-config command
pub fn execute(args: CheckConfigArgs) -> Result<(), ExError> {
    let registry = load_registry(OP, &args.config)?;
    let names = registry.association_names();

    println!(
        "✓ {}: {} association(s) declared",
        args.config.display(),
        names.len()
    );
    for name in names {
        let options = registry.get(name).map_err(|e| ExError::from(e).with_op(OP))?;
        println!(
            "  {}: allow_destroy={} update_only={} reject_if={} destroy_if={} limit={}",
            name,
            options.allow_destroy(),
            options.update_only(),
            describe(options.reject_if()),
            describe(options.destroy_if()),
            describe(options.limit()),
        );
    }

    Ok(())
}

fn describe<T: std::fmt::Debug>(option: Option<&T>) -> String {
    option.map_or_else(|| "none".to_string(), |value| format!("{:?}", value))
}
