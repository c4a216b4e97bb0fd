use anyhow::{Context, Result};
use skrytki_etl::config::{self, KEYS};
use skrytki_etl::Config;
use toml_edit::{value, DocumentMut};

/// Keys whose values are integers in the config file.
const INTEGER_KEYS: &[&str] = &["pool_size", "request_timeout_ms", "default_limit"];

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    for key in KEYS {
        println!("  {key}: {}", config.get(key).unwrap_or_default());
    }

    println!("\nPriority: CLI args > ENV vars (SKRYTKI_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or the whole file when no key is given.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        match config.get(&key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!(
                "Unknown config key: {key}\n\nValid keys: {}",
                KEYS.join(", ")
            ),
        }
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'skrytki config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included).
pub fn set_config(key: &str, new_value: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, new_value)?;
    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {key} = {new_value}");
    println!("  in {}", config_path.display());

    Ok(())
}

/// Return `contents` with `key` set to `new_value`.
fn set_value(contents: &str, key: &str, new_value: &str) -> Result<String> {
    if !KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key: {key}\n\nValid keys: {}",
            KEYS.join(", ")
        );
    }

    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    if INTEGER_KEYS.contains(&key) {
        let n: i64 = new_value
            .parse()
            .with_context(|| format!("{key} must be a whole number, got {new_value:?}"))?;
        if n <= 0 {
            anyhow::bail!("{key} must be positive, got {n}");
        }
        doc[key] = value(n);
    } else {
        doc[key] = value(new_value);
    }

    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure skrytki.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
