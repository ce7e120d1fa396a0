use carefinder_core::AppConfig;
use carefinder_geocode::{AddressResolver, NominatimClient};

/// Prints one line per street-level suggestion for `query`.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built. Lookup
/// failures print nothing, the same as an empty answer.
pub(crate) async fn run_suggest(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let client = NominatimClient::from_app_config(config)?;
    let resolver = AddressResolver::new(client.clone(), client);

    let suggestions = resolver.fetch_suggestions(query).await;
    if suggestions.is_empty() {
        eprintln!("No street-level matches for \"{query}\"");
        return Ok(());
    }

    for (index, suggestion) in suggestions.iter().enumerate() {
        println!(
            "{index:>2}  {}  ({}, {})",
            suggestion.short_display_name, suggestion.lat, suggestion.lon
        );
    }
    Ok(())
}
