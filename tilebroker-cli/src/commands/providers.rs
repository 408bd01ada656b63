//! `tilebroker providers`: list configured providers.

use tilebroker::config::ConfigFile;
use tilebroker::provider::{ProviderRegistry, ProviderSummary};

pub fn run(config: &ConfigFile) {
    let registry = ProviderRegistry::from_config(&config.providers);
    print!("{}", render(&registry.summaries()));
}

fn render(summaries: &[ProviderSummary]) -> String {
    if summaries.is_empty() {
        return "No providers configured.\n".to_string();
    }

    let mut out = format!("{:<16} {:<6} {:<10} {}\n", "PROVIDER", "THEME", "CREDENTIAL", "BASE URL");
    for summary in summaries {
        out.push_str(&format!(
            "{:<16} {:<6} {:<10} {}\n",
            summary.name.as_str(),
            summary.theme.as_str(),
            if summary.has_credential { "set" } else { "missing" },
            summary.base_url
        ));
    }
    out
}
