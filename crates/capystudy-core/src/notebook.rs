//! Notes grouped into folders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{keys, Store};

pub const DEFAULT_NOTE_COLOR: &str = "#fef3c7";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub folder_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

fn seeded_folders() -> Vec<Folder> {
    vec![
        Folder {
            id: "1".into(),
            name: "General".into(),
        },
        Folder {
            id: "2".into(),
            name: "Math".into(),
        },
    ]
}

pub struct Notebook<'s> {
    store: &'s Store,
    notes: Vec<Note>,
    folders: Vec<Folder>,
}

impl<'s> Notebook<'s> {
    pub fn load(store: &'s Store) -> Self {
        Self {
            notes: store.read_or_default(keys::NOTES),
            folders: store.read_or(keys::NOTE_FOLDERS, seeded_folders),
            store,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Add an empty note at the top of the list.
    pub fn create_note(&mut self, folder_id: &str, color: Option<&str>) -> &Note {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            folder_id: folder_id.to_string(),
            title: String::new(),
            content: String::new(),
            updated_at: Utc::now(),
            color: color.unwrap_or(DEFAULT_NOTE_COLOR).to_string(),
        };
        self.notes.insert(0, note);
        self.save_notes();
        &self.notes[0]
    }

    /// Returns false if no note has that id.
    pub fn update_note(&mut self, id: &str, field: NoteField, value: &str) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        match field {
            NoteField::Title => note.title = value.to_string(),
            NoteField::Content => note.content = value.to_string(),
        }
        note.updated_at = Utc::now();
        self.save_notes();
        true
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        let removed = self.notes.len() != before;
        if removed {
            self.save_notes();
        }
        removed
    }

    /// Returns `None` for a blank name.
    pub fn create_folder(&mut self, name: &str) -> Option<&Folder> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.folders.push(Folder {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        });
        self.store.write(keys::NOTE_FOLDERS, &self.folders);
        self.folders.last()
    }

    pub fn notes_in(&self, folder_id: &str) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.folder_id == folder_id).collect()
    }

    /// Case-insensitive match on title or content, across all folders.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&needle) || n.content.to_lowercase().contains(&needle))
            .collect()
    }

    fn save_notes(&self) {
        self.store.write(keys::NOTES, &self.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_folders() {
        let store = Store::in_memory();
        let book = Notebook::load(&store);
        let names: Vec<&str> = book.folders().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["General", "Math"]);
        assert!(book.notes().is_empty());
    }

    #[test]
    fn new_notes_are_prepended() {
        let store = Store::in_memory();
        let mut book = Notebook::load(&store);
        let first = book.create_note("1", None).id.clone();
        let second = book.create_note("1", Some("#dbeafe")).id.clone();
        assert_eq!(book.notes()[0].id, second);
        assert_eq!(book.notes()[1].id, first);
        assert_eq!(book.notes()[1].color, DEFAULT_NOTE_COLOR);
        assert_eq!(Notebook::load(&store).notes().len(), 2);
    }

    #[test]
    fn update_stamps_time() {
        let store = Store::in_memory();
        let mut book = Notebook::load(&store);
        let note = book.create_note("2", None).clone();
        assert!(book.update_note(&note.id, NoteField::Title, "Derivatives"));
        assert!(book.update_note(&note.id, NoteField::Content, "d/dx x^2 = 2x"));
        assert!(!book.update_note("nope", NoteField::Title, "x"));

        let stored = Notebook::load(&store);
        let updated = stored.note(&note.id).unwrap();
        assert_eq!(updated.title, "Derivatives");
        assert!(updated.updated_at >= note.updated_at);
    }

    #[test]
    fn blank_folder_name_is_ignored() {
        let store = Store::in_memory();
        let mut book = Notebook::load(&store);
        assert!(book.create_folder("   ").is_none());
        assert_eq!(book.create_folder(" Physics ").unwrap().name, "Physics");
        assert_eq!(Notebook::load(&store).folders().len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_across_folders() {
        let store = Store::in_memory();
        let mut book = Notebook::load(&store);
        let a = book.create_note("1", None).id.clone();
        let b = book.create_note("2", None).id.clone();
        book.update_note(&a, NoteField::Title, "Photosynthesis");
        book.update_note(&b, NoteField::Content, "the PHOTON is a particle");

        assert_eq!(book.search("photo").len(), 2);
        assert_eq!(book.search("synth").len(), 1);
        assert_eq!(book.notes_in("2").len(), 1);
    }

    #[test]
    fn delete_note() {
        let store = Store::in_memory();
        let mut book = Notebook::load(&store);
        let id = book.create_note("1", None).id.clone();
        assert!(book.delete_note(&id));
        assert!(!book.delete_note(&id));
        assert!(Notebook::load(&store).notes().is_empty());
    }
}
