use std::collections::BTreeSet;

/// Add every requested tag, returns whether the set changed
pub fn assign(tags: &mut BTreeSet<String>, requested: &BTreeSet<String>) -> bool {
    let before = tags.len();
    tags.extend(requested.iter().cloned());
    tags.len() != before
}

/// Requested tags that are not present
pub fn missing(tags: &BTreeSet<String>, requested: &BTreeSet<String>) -> BTreeSet<String> {
    requested.difference(tags).cloned().collect()
}

/// Remove all requested tags or none of them
///
/// On failure the set is left untouched and the missing tags are returned.
pub fn remove(
    tags: &mut BTreeSet<String>,
    requested: &BTreeSet<String>,
) -> Result<(), BTreeSet<String>> {
    let missing = missing(tags, requested);
    if !missing.is_empty() {
        return Err(missing);
    }

    tags.retain(|tag| !requested.contains(tag));
    Ok(())
}
