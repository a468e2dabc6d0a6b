//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_DEPFILE: &str = r#"# dtrac depfile

[analyzer]
# Class map produced by the parser (relative to this file)
class_map = "class-map.json"

# Output format: text, compact, json, dot
# formatter = "text"

# Layer definitions
# A class belongs to a layer if any of the layer's collectors matches it.

[[layers]]
name = "Controller"
[[layers.collectors]]
type = "className"
regex = "^App\\\\Controller\\\\"

[[layers]]
name = "Service"
[[layers.collectors]]
type = "className"
regex = "^App\\\\Service\\\\"

[[layers]]
name = "Repository"
[[layers.collectors]]
type = "bool/or"
collectors = [
    { type = "className", regex = "^App\\\\Repository\\\\" },
    { type = "implements", interface = "App\\Repository\\RepositoryInterface" },
]

# Ruleset: which layers each layer may depend on.
# A layer may always depend on itself; everything else is forbidden.

[ruleset]
Controller = ["Service"]
Service = ["Repository"]
Repository = []
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let depfile_path = Path::new("depfile.toml");

    if depfile_path.exists() && !force {
        bail!(
            "Depfile already exists at {}. Use --force to overwrite.",
            depfile_path.display()
        );
    }

    std::fs::write(depfile_path, DEFAULT_DEPFILE)?;

    println!("Created depfile.toml");
    println!("\nNext steps:");
    println!("  1. Edit [[layers]] and [ruleset] for your project");
    println!("  2. Run: dtrac analyze");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtrac_core::{CollectorFactory, Depfile};

    #[test]
    fn template_is_a_valid_depfile() {
        let depfile = Depfile::parse(DEFAULT_DEPFILE).unwrap();
        depfile
            .validate(&CollectorFactory::with_builtins())
            .unwrap();
        assert_eq!(depfile.layers.len(), 3);
    }
}
