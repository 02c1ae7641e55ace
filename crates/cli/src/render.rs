//! Plain-text rendering of catalog views.

use std::fmt::Write;

use pokedex_core::compose::{total_pages, ComposedPage};
use pokedex_core::favorites::FavoritesStore;
use pokedex_core::naming::{
    format_height, format_id, format_name, format_stat_name, format_weight, type_color,
};
use pokedex_core::pagination::{can_go_next, can_go_previous, visible_pages, PageSlot};
use pokedex_core::types::Entry;
use pokedex_core::view::{Action, EmptyState, ErrorState};
use pokedex_pokeapi::catalog::{CatalogView, ViewOutcome};

const STAT_BAR_WIDTH: u32 = 20;

/// The list view: cards, pagination, or the empty/error state.
pub fn view(view: &CatalogView, favorites: &FavoritesStore, page_size: usize) -> String {
    let mut out = String::new();
    let location = view.filter.to_query();
    let _ = writeln!(out, "Location: ?{location}");
    if view.filter.has_active_filters() {
        let _ = writeln!(out, "Sorted by {} [Clear All]", view.filter.sort.label());
    }

    match &view.outcome {
        ViewOutcome::Results(page) => {
            for entry in &page.entries {
                out.push_str(&card(entry, favorites.contains(entry.id)));
                out.push('\n');
            }
            out.push_str(&pagination(page, page_size));
        }
        ViewOutcome::NoMatch { state, .. } | ViewOutcome::Empty { state, .. } => {
            out.push_str(&empty(state));
        }
        ViewOutcome::Failed { state, .. } => out.push_str(&error(state)),
    }
    out
}

/// One line per entry: number, name, types, favorite marker.
pub fn card(entry: &Entry, favorite: bool) -> String {
    let types: Vec<String> = entry.types.iter().map(|t| format!("[{}]", format_name(t))).collect();
    format!(
        "{:<6} {:<16} {:<22} {}",
        format_id(entry.id),
        format_name(&entry.name),
        types.join(" "),
        if favorite { "♥" } else { "♡" }
    )
    .trim_end()
    .to_string()
}

/// Result count and, when there is more than one page, "Page X of Y"
/// with the page window.
pub fn pagination(page: &ComposedPage, page_size: usize) -> String {
    let pages = page_count(page, page_size);
    let mut out = String::new();
    match page.upstream_count {
        Some(count) => {
            let _ = writeln!(out, "{count} Pokémon");
        }
        None => {
            let _ = writeln!(out, "{} result(s)", page.total_items);
        }
    }
    if pages <= 1 {
        return out;
    }

    let slots: Vec<String> = visible_pages(page.page, pages)
        .into_iter()
        .map(|slot| match slot {
            PageSlot::Page(n) if n == page.page => format!("[{n}]"),
            PageSlot::Page(n) => n.to_string(),
            PageSlot::Gap => "…".to_string(),
        })
        .collect();
    let _ = writeln!(
        out,
        "{} Page {} of {pages}: {} {}",
        if can_go_previous(page.page) { "<" } else { " " },
        page.page,
        slots.join(" "),
        if can_go_next(page.page, pages) { ">" } else { " " },
    );
    out
}

/// Pages reachable from `page`: the upstream total for the default
/// listing, the composed total otherwise.
pub fn page_count(page: &ComposedPage, page_size: usize) -> u32 {
    match page.upstream_count {
        Some(count) => total_pages(count as usize, page_size),
        None => page.total_pages,
    }
}

/// The detail view of a single entry.
pub fn detail(entry: &Entry, favorite: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}{}",
        format_id(entry.id),
        format_name(&entry.name),
        if favorite { " ♥" } else { "" }
    );
    let types: Vec<String> = entry
        .types
        .iter()
        .map(|t| format!("{} ({})", format_name(t), type_color(t)))
        .collect();
    let _ = writeln!(out, "Types:   {}", types.join(", "));
    let _ = writeln!(out, "Height:  {}", format_height(entry.height));
    let _ = writeln!(out, "Weight:  {}", format_weight(entry.weight));
    if let Some(xp) = entry.base_experience {
        let _ = writeln!(out, "Base XP: {xp}");
    }

    if !entry.stats.is_empty() {
        let _ = writeln!(out, "Stats:");
        let max = entry.max_stat().max(1);
        for stat in &entry.stats {
            let filled = (stat.value * STAT_BAR_WIDTH).div_ceil(max) as usize;
            let _ = writeln!(
                out,
                "  {:<12} {:>3} {}",
                format_stat_name(&stat.name),
                stat.value,
                "█".repeat(filled.min(STAT_BAR_WIDTH as usize))
            );
        }
        let _ = writeln!(out, "  {:<12} {:>3}", "Total", entry.total_stats());
    }

    if !entry.abilities.is_empty() {
        let abilities: Vec<String> = entry
            .abilities
            .iter()
            .map(|a| {
                let name = format_name(&a.name);
                if a.hidden {
                    format!("{name} (hidden)")
                } else {
                    name
                }
            })
            .collect();
        let _ = writeln!(out, "Abilities ({}): {}", abilities.len(), abilities.join(", "));
    }
    let _ = writeln!(out, "Artwork: {}", entry.image_url());
    out.push_str(&adjacent(entry));
    out
}

/// Links to the neighbouring entries in dex order.
pub fn adjacent(entry: &Entry) -> String {
    let next = format!("Next: {}", format_id(entry.next_id()));
    match entry.previous_id() {
        Some(previous) => format!("Previous: {}  {next}\n", format_id(previous)),
        None => format!("{next}\n"),
    }
}

pub fn error(state: &ErrorState) -> String {
    titled(&state.title, &state.message, &state.actions)
}

pub fn empty(state: &EmptyState) -> String {
    titled(&state.title, &state.message, &state.actions)
}

fn titled(title: &str, message: &str, actions: &[Action]) -> String {
    let labels: Vec<String> = actions.iter().map(|a| format!("[{}]", a.label())).collect();
    format!("{title}\n{message}\n{}\n", labels.join(" "))
}
