//! Formatting functions for terminal output.
//!
//! Summaries are built as plain strings first so they can be tested; the
//! `display_*` functions add styling and print.

use console::style;

use crate::boundary::{ParseWarning, ReleaseWarning};
use crate::domain::MapData;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_warning(warning: &ParseWarning) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), warning);
}

pub fn display_release_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), warning);
}

fn count<T>(items: &Option<Vec<T>>) -> usize {
    items.as_ref().map_or(0, Vec::len)
}

/// Plain-text summary lines for a decoded map.
pub fn summarize_map(map: &MapData) -> Vec<String> {
    let mut lines = Vec::new();
    let header = &map.header;
    lines.push(format!(
        "Map #{} (sequence {}), format {}.{}{}",
        header.map_index,
        header.map_sequence,
        header.major_version,
        header.minor_version,
        if map.is_valid { "" } else { " [no digest]" }
    ));

    match &map.image {
        Some(image) if !image.is_empty() => lines.push(format!(
            "Image: {}x{} at ({}, {})",
            image.width, image.height, image.left, image.top
        )),
        _ => lines.push("Image: none".to_string()),
    }

    if let Some(position) = &map.vacuum_position {
        let room = map
            .vacuum_room
            .map(|r| format!(", room {}", r))
            .unwrap_or_default();
        lines.push(format!("Vacuum: ({}, {}){}", position.x, position.y, room));
    }
    if let Some(charger) = &map.charger {
        lines.push(format!("Charger: ({}, {})", charger.x, charger.y));
    }

    if let Some(rooms) = &map.rooms {
        let numbers: Vec<String> = rooms.keys().map(|n| n.to_string()).collect();
        lines.push(format!("Rooms: {} [{}]", rooms.len(), numbers.join(", ")));
    }
    if let Some(path) = &map.path {
        lines.push(format!("Path points: {}", path.len()));
    }
    if let Some(mop) = &map.mop_path {
        lines.push(format!(
            "Mop path: {} points in {} segments",
            mop.len(),
            mop.paths.len()
        ));
    }

    let obstacles = count(&map.obstacles)
        + count(&map.ignored_obstacles)
        + count(&map.obstacles_with_photo)
        + count(&map.ignored_obstacles_with_photo);
    let restricted = count(&map.no_go_areas)
        + count(&map.no_mopping_areas)
        + count(&map.no_carpet_areas)
        + count(&map.walls);
    lines.push(format!(
        "Zones: {}, restrictions: {}, obstacles: {}",
        count(&map.zones),
        restricted,
        obstacles
    ));

    if let Some(carpets) = &map.carpet_map {
        lines.push(format!("Carpet pixels: {}", carpets.len()));
    }
    lines
}

/// Print a decoded map summary followed by its warnings.
pub fn display_map_summary(map: &MapData) {
    let mut lines = summarize_map(map).into_iter();
    if let Some(title) = lines.next() {
        println!("\n{}", style(title).bold());
    }
    for line in lines {
        println!("  {}", line);
    }
    for warning in &map.warnings {
        display_warning(warning);
    }
}
