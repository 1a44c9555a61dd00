mod cli;
mod input;
mod logging;
mod signals;
mod sink;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use futures_util::StreamExt;
use hunter_core::{parse_domain_list, WorkPlan};
use hunter_engine::{Dispatcher, ReqwestProber, RunControl};
use hunter_logging::hunter_info;

use crate::cli::Cli;
use crate::sink::ConsoleSink;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(logging::level_for(cli.debug), cli.log_file.as_deref());

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let domains = parse_domain_list(&cli.domains)?;

    let addresses = tokio::select! {
        loaded = input::load_addresses(&cli.ip_list_file) => loaded?,
        _ = tokio::signal::ctrl_c() => {
            println!("{}", signals::interrupted_notice());
            return Ok(ExitCode::from(signals::INTERRUPTED_EXIT_CODE as u8));
        }
    };

    let plan = WorkPlan::new(addresses, domains);
    let prober = ReqwestProber::new(cli.to_settings()).context("cannot set up the http client")?;
    let control = RunControl::new();
    let dispatcher =
        Dispatcher::new(Arc::new(prober), control.clone()).with_concurrency(cli.threads);

    hunter_info!(
        "probing {} address(es) for {} domain(s), {} request(s) at a time, {:?} mode",
        plan.addresses.len(),
        plan.domains.len(),
        dispatcher.concurrency(),
        cli.mode
    );

    let mut sink = ConsoleSink::new(plan.total(), cli.verbose);
    let listener = signals::spawn(control, sink.bar().clone());

    let mut reports = dispatcher.run(plan);
    while let Some(report) = reports.next().await {
        sink.record(&report);
    }

    listener.abort();
    let summary = sink.finish();
    println!("{}", sink::summary_line(&summary));
    println!("{}", "Finished processing and exiting.".green());
    Ok(ExitCode::SUCCESS)
}
