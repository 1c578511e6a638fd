//! List command - shows the registered templates

use color_eyre::eyre::Result;
use formgen_generator::TemplateRegistry;

/// Run the list command.
pub fn run() -> Result<()> {
    let registry = formgen_templates::registry();
    for line in lines(&registry) {
        println!("{line}");
    }
    Ok(())
}

/// One `key -> file` line per registry entry, in build order.
fn lines(registry: &TemplateRegistry) -> Vec<String> {
    let width = registry.keys().map(str::len).max().unwrap_or(0);
    registry
        .iter()
        .map(|(key, unit)| format!("{key:<width$}  {}", unit.file_name()))
        .collect()
}
