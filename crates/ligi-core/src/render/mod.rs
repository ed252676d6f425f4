//! Renderers for the master tag index and per-tag index files, local and
//! global. Shared between both: the bullet-list parsing helpers used to
//! read back what was rendered in a previous run.

pub mod global;
pub mod local;

/// Extract the `- <entry>` lines under a `## <heading>` section, stopping at
/// the next blank line, the next `##` heading, or EOF. Used to read back
/// `## Files` (per-tag) and `## Repositories` (registry) sections.
pub(crate) fn extract_bullet_section(content: &str, heading: &str) -> Vec<String> {
    let marker = format!("## {heading}");
    let mut lines = content.lines();
    let mut found = false;
    for line in lines.by_ref() {
        if line.trim() == marker {
            found = true;
            break;
        }
    }
    if !found {
        return Vec::new();
    }

    let mut entries = Vec::new();
    let mut started = false;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            if started {
                break;
            }
            continue; // skip the blank line between the heading and the list
        }
        if trimmed.starts_with("##") {
            break;
        }
        started = true;
        if let Some(rest) = trimmed.strip_prefix("- ") {
            entries.push(rest.trim().to_string());
        }
    }
    entries
}

/// Extract tag names from `## Tags` bullet lines of the form
/// `- [<tag>](tags/<tag>.md)`.
pub(crate) fn extract_master_tags(content: &str) -> Vec<String> {
    extract_bullet_section(content, "Tags")
        .into_iter()
        .filter_map(|line| {
            let start = line.find('[')?;
            let end = line[start + 1..].find(']')? + start + 1;
            Some(line[start + 1..end].to_string())
        })
        .collect()
}
