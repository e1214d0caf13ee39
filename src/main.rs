use anyhow::Context;

use wikivault::config::VaultConfig;
use wikivault::demo_seeder;
use wikivault::storage::paths;
use wikivault::vault::Vault;

/// Maintenance entry point: opens (or creates) the vault named by the
/// environment, seeds the demo course, and prints what a public viewer
/// would see. The real presentation layer lives elsewhere and talks to
/// the same `Vault` API.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wikivault=info".into()),
        )
        .init();

    let config = VaultConfig::from_env();
    tracing::info!("Opening vault at {}", config.root.display());

    let vault = Vault::open(config);
    let course = demo_seeder::seed_demo_course(&vault).context("demo seeding failed")?;

    let pages = vault
        .visible_pages(&course, false)
        .context("failed to list pages")?;

    println!("{course}: {} page(s)", pages.len());
    for page in &pages {
        let commit = vault
            .latest_commit(page)
            .map(|id| id.to_string())
            .unwrap_or_else(|_| "(no history)".to_string());
        println!("  {:<40} {} @ {}", paths::page_url(page), page.display_title(), commit);
    }

    Ok(())
}
