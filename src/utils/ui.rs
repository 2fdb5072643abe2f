use crate::core::manager::AssetManager;
use crate::core::models::BuildConfig;
use colored::*;
use std::time::Instant;

pub struct AssetTubeUI {
    start_time: Instant,
}

impl AssetTubeUI {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn show_banner(&self) {
        println!("\n  {} {}", "ASSETTUBE".bright_cyan().bold(), env!("CARGO_PKG_VERSION").bright_white());
        println!();
    }

    /// Logical name -> URL table, Vite style
    pub fn show_mappings(&self, manager: &AssetManager) {
        for name in manager.asset_names() {
            let url = manager.asset_path(name).unwrap_or_default();
            match manager.integrity(name) {
                Some(integrity) => println!(
                    "  {} {} {} {}",
                    name.bright_white(),
                    "→".bright_black(),
                    url.bright_cyan(),
                    format!("({})", short_integrity(&integrity)).bright_black()
                ),
                None => println!(
                    "  {} {} {}",
                    name.bright_white(),
                    "→".bright_black(),
                    url.bright_cyan()
                ),
            }
        }

        println!();
        println!(
            "  {} {} assets in {}",
            "✓".bright_green(),
            manager.len().to_string().bright_cyan().bold(),
            format!("{:.0}ms", self.start_time.elapsed().as_secs_f64() * 1000.0)
                .bright_white()
                .bold()
        );
    }

    pub fn show_entries(&self, config: &BuildConfig) {
        for (name, source) in &config.entries {
            println!(
                "  {} {} {}",
                name.bright_cyan(),
                "←".bright_black(),
                source.bright_white()
            );
        }
        let kinds: Vec<String> = config.plugins.kinds().iter().map(|k| k.to_string()).collect();
        println!("  {} {}", "plugins:".bright_black(), kinds.join(" → "));
    }
}

fn short_integrity(integrity: &str) -> String {
    match integrity.split_once('-') {
        Some((algo, digest)) if digest.len() > 12 => format!("{}-{}…", algo, &digest[..12]),
        _ => integrity.to_string(),
    }
}

impl Default for AssetTubeUI {
    fn default() -> Self {
        Self::new()
    }
}
