//! `results` command: run a navigation payload through the search controller.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use carefinder_core::{AppConfig, NavigationPayload, RadiusMiles, ReturnPayload};
use carefinder_geocode::{AddressResolver, NominatimClient};
use carefinder_search::{ControllerOptions, RankedEntry, SearchContext, SearchController};
use serde::Serialize;

use crate::terminal_map::TerminalMap;

#[derive(Debug)]
pub(crate) struct ResultsArgs {
    pub(crate) file: PathBuf,
    pub(crate) address: Option<String>,
    pub(crate) radius: Option<u32>,
    pub(crate) provider: Option<String>,
    pub(crate) plan: Option<String>,
    pub(crate) select: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultsReport<'a> {
    search_context: &'a SearchContext,
    results: Vec<RankedEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    map: &'a TerminalMap,
    return_payload: ReturnPayload,
}

pub(crate) fn load_payload(path: &std::path::Path) -> anyhow::Result<NavigationPayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse payload {}", path.display()))
}

/// Applies the requested edits in the order a user would make them, then
/// prints the resulting view as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the payload cannot be loaded, an option is out of
/// range for the catalog or radius domain, or the address cannot be
/// submitted. An address that does not resolve is reported in `message`
/// and leaves the center unchanged.
pub(crate) async fn run_results(config: &AppConfig, args: ResultsArgs) -> anyhow::Result<()> {
    let payload = load_payload(&args.file)?;
    let client = NominatimClient::from_app_config(config)?;
    let resolver = Arc::new(AddressResolver::new(client.clone(), client));
    let options = ControllerOptions::from_app_config(config)?;

    let mut controller =
        SearchController::new(payload, resolver, TerminalMap::default(), options);
    if controller.is_loading() {
        tracing::warn!("payload is still marked as loading; results may be incomplete");
    }

    if let Some(miles) = args.radius {
        controller.set_radius(RadiusMiles::new(miles)?);
    }
    if let Some(provider) = args.provider.as_deref() {
        controller.set_provider(provider)?;
    }
    if let Some(plan) = args.plan.as_deref() {
        controller.set_plan(plan)?;
    }
    if let Some(address) = args.address {
        controller.edit_address(address);
        controller.submit_address()?;
        controller.pump().await;
    }
    if let Some(index) = args.select {
        controller.select_result(index)?;
    }

    let report = ResultsReport {
        search_context: controller.context(),
        results: controller.ranked_entries(),
        message: controller.status().text(),
        map: controller.map(),
        return_payload: controller.return_payload(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
