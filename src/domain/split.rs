//! Greedy packing of list items into length-limited messages.

/// Separator placed between items inside one message.
pub const ITEM_SEPARATOR: &str = ", ";

/// Length a link is counted as once the channel shortens it.
pub const LINK_WEIGHT: usize = 23;

/// Length of `text` as a link-shortening channel counts it.
///
/// Every space-separated `http://` or `https://` word counts as
/// [`LINK_WEIGHT`]; everything else counts in characters.
#[must_use]
pub fn weighted_length(text: &str) -> usize {
    let spaces = text.matches(' ').count();
    let words: usize = text
        .split(' ')
        .map(|word| {
            if word.starts_with("http://") || word.starts_with("https://") {
                LINK_WEIGHT
            } else {
                word.chars().count()
            }
        })
        .sum();
    words + spaces
}

/// Pack `items` into groups whose joined text fits within `limit` characters.
///
/// Items are taken in order and appended to the current group until the
/// next item (plus [`ITEM_SEPARATOR`]) would push the group past `limit`,
/// at which point a new group is started. An item is never split; an item
/// longer than `limit` on its own becomes a group by itself.
///
/// Lengths are counted in characters, not bytes.
#[must_use]
pub fn pack_items<S: AsRef<str>>(items: &[S], limit: usize) -> Vec<String> {
    let separator_len = ITEM_SEPARATOR.chars().count();
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for item in items {
        let item = item.as_ref();
        let item_len = item.chars().count();

        if current.is_empty() {
            current.push_str(item);
            current_len = item_len;
            continue;
        }

        if current_len + separator_len + item_len > limit {
            groups.push(std::mem::take(&mut current));
            current.push_str(item);
            current_len = item_len;
        } else {
            current.push_str(ITEM_SEPARATOR);
            current.push_str(item);
            current_len += separator_len + item_len;
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}
