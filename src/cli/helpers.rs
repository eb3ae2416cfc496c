//! Shared plumbing for the command modules: project/store opening,
//! query-to-entity resolution, and small display utilities.

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::project::Project;
use crate::core::store::YamlStore;

/// Locate the project, honoring an explicit `--project` root
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let result = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    result.map_err(|e| miette::miette!("{}", e))
}

/// Locate the project and open its entity store
pub fn open_store(global: &GlobalOpts) -> Result<(Project, YamlStore)> {
    let project = open_project(global)?;
    let store = YamlStore::new(project.root());
    Ok((project, store))
}

/// Resolve a query against a loaded collection
///
/// Matches, in order: exact id, case-insensitive label, unique id prefix.
pub fn resolve_entity<T: Entity>(items: Vec<T>, query: &str, noun: &str) -> Result<T> {
    resolve_entity_with(items, query, noun, |_| None)
}

/// Same as [`resolve_entity`] with an extra per-entity key (e.g. a shelf code)
pub fn resolve_entity_with<T: Entity>(
    mut items: Vec<T>,
    query: &str,
    noun: &str,
    alt_key: impl Fn(&T) -> Option<&str>,
) -> Result<T> {
    if let Some(pos) = items.iter().position(|i| i.id().to_string() == query) {
        return Ok(items.swap_remove(pos));
    }
    if let Some(pos) = items
        .iter()
        .position(|i| alt_key(i).is_some_and(|k| k.eq_ignore_ascii_case(query)))
    {
        return Ok(items.swap_remove(pos));
    }
    if let Some(pos) = items
        .iter()
        .position(|i| i.label().eq_ignore_ascii_case(query))
    {
        return Ok(items.swap_remove(pos));
    }

    let upper = query.to_uppercase();
    let matched: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, i)| i.id().to_string().starts_with(&upper))
        .map(|(n, _)| n)
        .collect();

    match matched.len() {
        1 => Ok(items.swap_remove(matched[0])),
        0 => Err(miette::miette!("No {} found matching '{}'", noun, query)),
        n => Err(miette::miette!(
            "'{}' is ambiguous: {} {}s match",
            query,
            n,
            noun
        )),
    }
}

/// Shorten an EntityId for column display: over 16 chars becomes the
/// first 13 plus "..."
pub fn format_short_id(id: &EntityId) -> String {
    let full = id.to_string();
    match full.len() {
        0..=16 => full,
        _ => format!("{}...", &full[..13]),
    }
}

/// Cap a string at `max_len` characters, marking the cut with "..."
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Quote a CSV field when it holds a comma, quote, or newline (RFC 4180)
pub fn escape_csv(s: &str) -> String {
    if s.chars().any(|c| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
