use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

use hb_core::CubeType;

use super::OutputFormat;

pub fn run(path: Option<&Path>, format: OutputFormat) -> Result<(), String> {
    let terrain = super::load_terrain(path)?;
    let source = path.map_or_else(|| "demo terrain".to_string(), |p| p.display().to_string());
    let size = (terrain.nb_x(), terrain.nb_y(), terrain.nb_z());
    let connected = terrain.connected_count();
    let valid = terrain.valid_cubes().len();

    match format {
        OutputFormat::Json => {
            let counts: serde_json::Map<_, _> = CubeType::ALL
                .iter()
                .map(|kind| (kind.to_string(), json!(terrain.count(*kind))))
                .collect();
            let report = json!({
                "source": source,
                "size": [size.0, size.1, size.2],
                "cubes": counts,
                "connected": connected,
                "valid_positions": valid,
            });
            let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{text}");
        }
        OutputFormat::Table => {
            println!(
                "  {} {}",
                "Terrain".bold(),
                format!("({source})").dimmed()
            );
            println!("  Size: {} x {} x {}", size.0, size.1, size.2);
            println!();

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Cube type", "Code", "Count"]);
            for kind in CubeType::ALL {
                table.add_row(vec![
                    kind.to_string(),
                    kind.code().to_string(),
                    terrain.count(kind).to_string(),
                ]);
            }
            println!("{table}");
            println!();

            let solid: usize = CubeType::ALL
                .iter()
                .filter(|k| k.is_solid())
                .map(|k| terrain.count(*k))
                .sum();
            println!("  {connected} of {solid} solid cubes connected to the border");
            if solid > connected {
                println!(
                    "  {} {} solid cubes float free of the border",
                    "WARN".yellow().bold(),
                    solid - connected
                );
            }
            println!("  {valid} valid unit positions");
        }
    }
    Ok(())
}
