//! Search-term view over the collection.

use rolodex_core::Person;

use crate::store::CollectionStore;

/// Records whose name or email contains `term`, ignoring case, in collection order.
///
/// An empty term yields every record. The iterator borrows the store, so it is
/// rebuilt whenever the store or the term changes.
pub fn filtered<'a>(
    store: &'a CollectionStore,
    term: &str,
) -> impl Iterator<Item = &'a Person> + use<'a> {
    let needle = term.to_lowercase();
    store.iter().filter(move |person| matches_needle(person, &needle))
}

fn matches_needle(person: &Person, needle: &str) -> bool {
    needle.is_empty()
        || person.name().to_lowercase().contains(needle)
        || person.email().to_lowercase().contains(needle)
}
