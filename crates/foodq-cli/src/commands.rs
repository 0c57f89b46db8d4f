use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use foodq_model::UnknownSentinel;
use foodq_standards::SchemaRegistry;
use indicatif::{ProgressBar, ProgressStyle};

use foodq_cli::config::{ConfigOverrides, load_config};
use foodq_cli::pipeline::{CheckRequest, CheckRun, run_check, standards_config};
use foodq_cli::summary::fields_table;

use crate::cli::{CheckArgs, FieldsArgs, SentinelArg};

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let schema = SchemaRegistry::load(&standards_config(args.schema.as_deref()))
        .context("load schema")?;
    println!("{}", fields_table(&schema));
    println!("{} fields, fingerprint {}", schema.len(), schema.fingerprint());
    Ok(())
}

pub fn run_check_command(args: &CheckArgs) -> Result<CheckRun> {
    let config = load_config(args.config.as_deref())?;
    let config = overrides(args).apply(config);
    let request = CheckRequest {
        input: args.input.clone(),
        schema: args.schema.clone(),
        output: args.output.clone(),
        violations: args.violations.clone(),
        config,
    };
    let progress = progress_bar();
    run_check(&request, &progress)
}

fn overrides(args: &CheckArgs) -> ConfigOverrides {
    ConfigOverrides {
        allow_duplicate_ids: args.allow_duplicate_ids,
        unknown_sentinel: args.unknown_sentinel.map(|sentinel| match sentinel {
            SentinelArg::Zero => UnknownSentinel::Zero,
            SentinelArg::Empty => UnknownSentinel::Empty,
        }),
        lenient_numeric: args.lenient_numeric,
        strict: args.strict,
        pass_through_unknown: args.pass_through_unknown,
        derive_log_fields: args.derive_log_fields,
    }
}

fn progress_bar() -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {wide_bar} {pos}/{len} records")
    {
        bar.set_style(style);
    }
    bar
}
