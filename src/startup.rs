// Startup module - banner and module status
//
// Printed once before the server starts taking requests.

use petmatch::config::{Config, Features, VERSION};
use petmatch::store::seed::{DEMO_CLIENT_EMAIL, DEMO_PASSWORD, DEMO_SHELTER_EMAIL};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Module loading result for display
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

fn get_module_status(config: &Config) -> Vec<ModuleStatus> {
    let Features {
        journal,
        seed_catalog,
    } = &config.features;

    vec![
        ModuleStatus {
            name: "api",
            enabled: true,
            description: "JSON routes under /api",
        },
        ModuleStatus {
            name: "journal",
            enabled: *journal,
            description: "JSONL activity log",
        },
        ModuleStatus {
            name: "seed",
            enabled: *seed_catalog,
            description: "Demo catalog and accounts",
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file_enabled,
            description: "Rotating trace files",
        },
    ]
}

/// Print the startup banner and module status
pub fn print_startup(config: &Config) {
    use colors::*;

    println!();
    println!("  {BOLD}{MAGENTA}PetMatch{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Pet adoption matching service{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    println!("  {DIM}Loading modules...{RESET}");
    for module in get_module_status(config) {
        let (icon, style) = if module.enabled {
            (format!("{GREEN}✓{RESET}"), "")
        } else {
            (format!("{DIM}○{RESET}"), DIM)
        };
        println!(
            "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
            module.name, module.description
        );
    }
    println!();

    if config.features.seed_catalog {
        println!("  {DIM}Demo shelter:{RESET} {DEMO_SHELTER_EMAIL} / {DEMO_PASSWORD}");
        println!("  {DIM}Demo client:{RESET}  {DEMO_CLIENT_EMAIL} / {DEMO_PASSWORD}");
        println!();
    }

    println!(
        "  {MAGENTA}▸{RESET} API listening on {BOLD}http://{}{RESET}",
        config.bind_addr
    );
    println!("  {DIM}Press Ctrl+C to stop{RESET}");
    println!();
}

/// Same information as structured log lines, for file logs
pub fn log_startup(config: &Config) {
    tracing::info!("PetMatch v{} starting", VERSION);
    for module in get_module_status(config) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }
    tracing::info!("▸ Listening on {}", config.bind_addr);
}
