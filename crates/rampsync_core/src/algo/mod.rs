//! Order-preserving removal driven by element index.


/// Moves every element whose index does not satisfy `remove` to the front of
/// `items`, keeping their relative order.
///
/// Runs in a single pass. Elements at and after the returned length are the
/// removed ones in an unspecified order; callers truncate them away.
///
/// # Returns
/// Number of kept elements.
pub fn stable_remove_if_by_index<T, F>(items: &mut [T], mut remove: F) -> usize
where
    F: FnMut(usize) -> bool,
{
    let Some(first_removed) = (0..items.len()).find(|&index| remove(index)) else {
        return items.len();
    };

    let mut write = first_removed;
    for read in first_removed + 1..items.len() {
        if !remove(read) {
            items.swap(write, read);
            write += 1;
        }
    }
    write
}

/// Removes the elements whose index satisfies `remove` from `items`.
///
/// # Returns
/// Number of removed elements.
pub fn remove_by_index<T, F>(items: &mut Vec<T>, remove: F) -> usize
where
    F: FnMut(usize) -> bool,
{
    let old_len = items.len();
    let new_len = stable_remove_if_by_index(items.as_mut_slice(), remove);
    items.truncate(new_len);
    old_len - new_len
}
