//! Where the list of result items lives inside the initial-state JSON.
//!
//! The layout is undocumented and differs between full result pages and
//! continuation responses. Each known layout is one accessor; none of them is
//! treated as the canonical one.

use serde_json::Value;

type ItemPath = for<'a> fn(&'a Value) -> Option<Vec<&'a Value>>;

/// Known item-list layouts, tried in order until one yields items.
pub const ITEM_PATHS: &[(&str, ItemPath)] = &[
    ("two_column_search_results", two_column_search_results),
    ("top_level_contents", top_level_contents),
    ("continuation_commands", continuation_commands),
];

/// Find result items using the first layout that yields a non-empty list.
pub fn find_items(data: &Value) -> (Option<&'static str>, Vec<&Value>) {
    for (name, path) in ITEM_PATHS {
        if let Some(items) = path(data) {
            if !items.is_empty() {
                return (Some(*name), items);
            }
        }
    }
    (None, Vec::new())
}

/// `contents.twoColumnSearchResultsRenderer.primaryContents.sectionListRenderer.contents[*]`
pub fn two_column_search_results(data: &Value) -> Option<Vec<&Value>> {
    let sections = data
        .get("contents")?
        .get("twoColumnSearchResultsRenderer")?
        .get("primaryContents")?
        .get("sectionListRenderer")?
        .get("contents")?
        .as_array()?;
    Some(flatten_sections(sections))
}

/// A bare top-level `contents` array.
pub fn top_level_contents(data: &Value) -> Option<Vec<&Value>> {
    let entries = data.get("contents")?.as_array()?;
    Some(flatten_sections(entries))
}

/// `onResponseReceivedCommands[*].<append|reload>.continuationItems[*]`
pub fn continuation_commands(data: &Value) -> Option<Vec<&Value>> {
    let commands = data.get("onResponseReceivedCommands")?.as_array()?;
    let mut items = Vec::new();
    for command in commands {
        let continuation = command
            .get("appendContinuationItemsAction")
            .or_else(|| command.get("reloadContinuationItemsCommand"))
            .and_then(|action| action.get("continuationItems"))
            .and_then(Value::as_array);
        if let Some(entries) = continuation {
            items.extend(flatten_sections(entries));
        }
    }
    Some(items)
}

/// Expand `itemSectionRenderer` wrappers into their items; keep other entries as-is.
fn flatten_sections(entries: &[Value]) -> Vec<&Value> {
    let mut out = Vec::new();
    for entry in entries {
        match entry
            .get("itemSectionRenderer")
            .and_then(|s| s.get("contents"))
            .and_then(Value::as_array)
        {
            Some(inner) => out.extend(inner.iter()),
            None => out.push(entry),
        }
    }
    out
}
