use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

use hb_simulation::{SimConfig, SimEventKind, Unit, World};

use super::OutputFormat;

/// Knobs for one simulation run.
pub struct RunOptions {
    pub ticks: u64,
    pub dt: f64,
    pub seed: u64,
    pub units: usize,
    pub show_events: bool,
}

pub fn run(terrain: Option<&Path>, opts: &RunOptions, format: OutputFormat) -> Result<(), String> {
    let terrain = super::load_terrain(terrain)?;
    let config = SimConfig::default().with_seed(opts.seed);
    let mut world = World::new(terrain, config);

    for _ in 0..opts.units {
        world
            .spawn_unit(true)
            .map_err(|e| format!("cannot spawn unit: {e}"))?;
    }
    for _ in 0..opts.ticks {
        world
            .advance_time(opts.dt)
            .map_err(|e| format!("simulation error: {e}"))?;
    }

    match format {
        OutputFormat::Table => print_table(&world, opts),
        OutputFormat::Json => print_json(&world, opts)?,
    }
    Ok(())
}

fn print_table(world: &World, opts: &RunOptions) {
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} ticks, dt={}, seed={})",
            opts.ticks, opts.dt, opts.seed
        )
        .dimmed()
    );
    println!(
        "  {} units alive, {} factions, {} events logged",
        world.units().count(),
        world.active_factions().len(),
        world.events().len()
    );
    println!("  Elapsed game time: {:.1}", world.clock().elapsed());
    println!();

    if opts.show_events {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in world.events().events() {
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if world.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<_> = world
            .events()
            .events()
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::UnitDied { .. } | SimEventKind::CaveIn { .. }
                )
            })
            .collect();
        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in notable {
                match event.kind {
                    SimEventKind::UnitDied { .. } => {
                        println!("  {}     {}", "DEATH".red().bold(), event.description);
                    }
                    _ => println!("  {}  {}", "CAVE-IN".yellow().bold(), event.description),
                }
            }
            println!();
        }
    }

    println!("  {}", "Unit Status".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Unit", "Faction", "Activity", "HP", "Stamina", "XP", "Position", "Carrying",
    ]);
    for unit in world.units() {
        table.add_row(vec![
            unit.name().to_string(),
            unit.faction().map_or_else(|| "--".into(), |f| f.to_string()),
            unit.activity().to_string(),
            format_pool(unit.hitpoints(), unit.max_hitpoints()),
            format_pool(unit.stamina(), unit.max_stamina()),
            unit.experience().to_string(),
            format_position(unit),
            unit.carried_object()
                .map_or_else(|| "--".into(), |o| o.kind().to_string()),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} boulders, {} logs lying around",
        world.boulders().len(),
        world.logs().len()
    );
}

fn print_json(world: &World, opts: &RunOptions) -> Result<(), String> {
    let units: Vec<_> = world
        .units()
        .map(|u| {
            json!({
                "id": u.id().0,
                "name": u.name(),
                "faction": u.faction().map(|f| f.0),
                "activity": u.activity(),
                "hitpoints": u.hitpoints(),
                "stamina": u.stamina(),
                "experience": u.experience(),
                "position": u.position(),
                "carrying": u.carried_object().map(|o| o.kind()),
            })
        })
        .collect();
    let factions: Vec<_> = world
        .active_factions()
        .into_iter()
        .map(|f| json!({ "id": f.id().0, "members": f.len() }))
        .collect();
    let report = json!({
        "ticks": opts.ticks,
        "dt": opts.dt,
        "seed": opts.seed,
        "elapsed": world.clock().elapsed(),
        "units": units,
        "factions": factions,
        "boulders": world.boulders().len(),
        "logs": world.logs().len(),
        "events": world.events().len(),
    });
    let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::UnitDied { .. } => description.red().bold(),
        SimEventKind::CaveIn { .. } | SimEventKind::TickFailed { .. } => description.yellow(),
        SimEventKind::Attack { .. } | SimEventKind::Fell { .. } => description.red(),
        SimEventKind::WorkCompleted { .. } | SimEventKind::CubeDestroyed { .. } => {
            description.cyan()
        }
        SimEventKind::UnitSpawned { .. } | SimEventKind::FactionCreated { .. } => {
            description.green()
        }
        SimEventKind::ObjectSpawned { .. } => description.blue(),
    }
}

fn format_pool(current: u32, max: u32) -> String {
    let text = format!("{current}/{max}");
    if current * 4 <= max {
        text.red().to_string()
    } else if current * 2 <= max {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

fn format_position(unit: &Unit) -> String {
    let p = unit.position();
    let label = format!("({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
    if unit.is_falling() {
        format!("{label} {}", "falling".yellow())
    } else {
        label
    }
}
