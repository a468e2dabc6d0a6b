//! Layers command: shows which layers a class resolves to.

use anyhow::{Context, Result};
use dtrac_core::{ClassMap, ClassNameLayerResolver, CollectorFactory, LayerResolver};
use std::path::Path;

use crate::depfile_loader;

/// Runs the layers command.
pub fn run(
    class: &str,
    path: &Path,
    class_map: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let loaded = depfile_loader::load(path, config)?;
    let factory = CollectorFactory::with_builtins();
    loaded.depfile.validate(&factory).with_context(|| {
        format!("Invalid {} depfile: {}", loaded.origin, loaded.path.display())
    })?;

    let class_map_path = loaded.class_map_path(class_map);
    let class_map = ClassMap::from_file(&class_map_path)
        .with_context(|| format!("Failed to load class map: {}", class_map_path.display()))?;

    if !class_map.contains(class) {
        println!("{class} is not in the class map");
        return Ok(());
    }

    let resolver = ClassNameLayerResolver::new(&loaded.depfile.layers, &class_map, factory)?;
    let layers = resolver.layers_for_class(class)?;

    if layers.is_empty() {
        println!("{class} belongs to no layer");
    } else {
        for layer in layers {
            println!("{layer}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DEPFILE: &str = r#"
[[layers]]
name = "Domain"
[[layers.collectors]]
type = "className"
regex = "^App\\\\Domain\\\\"
"#;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("depfile.toml"), DEPFILE).unwrap();
        fs::write(
            dir.path().join("class-map.json"),
            r#"{"classes": [{"name": "App\\Domain\\User"}]}"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn resolves_against_the_default_class_map() {
        let dir = project();
        let config = dir.path().join("depfile.toml");
        run("App\\Domain\\User", dir.path(), None, Some(&config)).unwrap();
        run("App\\Unknown", dir.path(), None, Some(&config)).unwrap();
    }

    #[test]
    fn missing_class_map_is_an_error() {
        let dir = project();
        let config = dir.path().join("depfile.toml");
        let missing = dir.path().join("nope.json");

        let err = run("App\\Domain\\User", dir.path(), Some(&missing), Some(&config)).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
