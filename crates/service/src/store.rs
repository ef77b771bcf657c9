//! The client-side copy of the remote person collection.

use rolodex_core::{Person, PersonId, StoreError, StoreResult};

/// Ordered records keyed by id.
///
/// Only confirmed server results are applied here. Insertion order is kept;
/// new records go to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStore {
    persons: Vec<Person>,
}

impl CollectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole sequence with a fetched list.
    ///
    /// A repeated id keeps its first occurrence; later copies are dropped with a warning.
    pub fn load(&mut self, persons: Vec<Person>) {
        let mut kept: Vec<Person> = Vec::with_capacity(persons.len());
        for person in persons {
            if kept.iter().any(|p| p.id == person.id) {
                tracing::warn!(id = %person.id, "fetched list repeats a person id, keeping first");
                continue;
            }
            kept.push(person);
        }
        self.persons = kept;
    }

    /// Appends a newly created record.
    pub fn append(&mut self, person: Person) -> StoreResult<()> {
        if self.contains(person.id) {
            return Err(StoreError::DuplicateId { id: person.id });
        }
        self.persons.push(person);
        Ok(())
    }

    /// Overwrites the entry for `id` in place, keeping its position.
    pub fn replace(&mut self, id: PersonId, person: Person) -> StoreResult<()> {
        if person.id != id && self.contains(person.id) {
            return Err(StoreError::DuplicateId { id: person.id });
        }
        let slot = self.position(id).ok_or(StoreError::NotFound { id })?;
        self.persons[slot] = person;
        Ok(())
    }

    /// Deletes the entry for `id` and returns it.
    pub fn remove(&mut self, id: PersonId) -> StoreResult<Person> {
        let slot = self.position(id).ok_or(StoreError::NotFound { id })?;
        Ok(self.persons.remove(slot))
    }

    #[must_use]
    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: PersonId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.persons.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Person] {
        &self.persons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    fn position(&self, id: PersonId) -> Option<usize> {
        self.persons.iter().position(|p| p.id == id)
    }
}

impl<'a> IntoIterator for &'a CollectionStore {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
