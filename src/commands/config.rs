use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Dojo Configuration".bold());
            println!();

            println!("{}:", "paths".cyan());
            println!("  state: {}", config.paths.state.display());
            println!("  output: {}", config.paths.output.display());
            println!();

            println!("{}:", "allocation".cyan());
            println!("  strategy: {:?}", config.allocation.strategy);
            match config.allocation.seed {
                Some(seed) => println!("  seed: {}", seed),
                None => println!("  seed: {}", "(random)".dimmed()),
            }
            println!("  autosave: {}", config.allocation.autosave);
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "paths.state" => Some(config.paths.state.display().to_string()),
        "paths.output" => Some(config.paths.output.display().to_string()),
        "allocation.seed" => Some(
            config
                .allocation
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string()),
        ),
        "allocation.strategy" => Some(format!("{:?}", config.allocation.strategy).to_lowercase()),
        "allocation.autosave" => Some(config.allocation.autosave.to_string()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            eyre::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_keys() {
        let config = Config::default();
        assert_eq!(lookup("allocation.autosave", &config).as_deref(), Some("true"));
        assert_eq!(lookup("allocation.seed", &config).as_deref(), Some("none"));
        assert_eq!(lookup("allocation.strategy", &config).as_deref(), Some("random"));
        assert_eq!(lookup("log-level", &config).as_deref(), Some("info"));
        assert!(lookup("paths.plugins", &config).is_none());
    }
}
