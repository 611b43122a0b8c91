use capystudy_core::notebook::{Note, NoteField};
use capystudy_core::Notebook;
use clap::Subcommand;

use crate::common::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum NotesAction {
    /// List notes in a folder
    List {
        #[arg(long, default_value = "1")]
        folder: String,
        #[arg(long)]
        json: bool,
    },
    /// Print one note
    Show { id: String },
    /// Create a note
    New {
        #[arg(long, default_value = "1")]
        folder: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Change a note's title and/or content
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: String },
    /// Search all notes by title or content
    Search { query: String },
    /// List folders
    Folders,
    /// Create a folder
    Folder { name: String },
}

fn print_note_line(note: &Note) {
    let title = if note.title.is_empty() { "(untitled)" } else { note.title.as_str() };
    println!("{:<36}  {}  {}", note.id, note.updated_at.format("%Y-%m-%d %H:%M"), title);
}

fn apply_edits(book: &mut Notebook<'_>, id: &str, title: Option<String>, content: Option<String>) -> CliResult {
    for (field, value) in [(NoteField::Title, title), (NoteField::Content, content)] {
        if let Some(value) = value {
            if !book.update_note(id, field, &value) {
                return Err(format!("no note with id '{id}'").into());
            }
        }
    }
    Ok(())
}

pub fn run(action: NotesAction) -> CliResult {
    let store = open_store()?;
    let mut book = Notebook::load(&store);

    match action {
        NotesAction::List { folder, json } => {
            let notes = book.notes_in(&folder);
            if json {
                return print_json(&notes);
            }
            notes.into_iter().for_each(print_note_line);
        }
        NotesAction::Show { id } => {
            let note = book.note(&id).ok_or_else(|| format!("no note with id '{id}'"))?;
            println!("{}\n\n{}", note.title, note.content);
        }
        NotesAction::New {
            folder,
            color,
            title,
            content,
        } => {
            let id = book.create_note(&folder, color.as_deref()).id.clone();
            apply_edits(&mut book, &id, title, content)?;
            println!("Note created: {id}");
        }
        NotesAction::Edit { id, title, content } => {
            apply_edits(&mut book, &id, title, content)?;
            println!("Note saved: {id}");
        }
        NotesAction::Delete { id } => {
            if !book.delete_note(&id) {
                return Err(format!("no note with id '{id}'").into());
            }
            println!("Note deleted: {id}");
        }
        NotesAction::Search { query } => book.search(&query).into_iter().for_each(print_note_line),
        NotesAction::Folders => {
            for folder in book.folders() {
                println!("{:<36}  {}", folder.id, folder.name);
            }
        }
        NotesAction::Folder { name } => match book.create_folder(&name) {
            Some(folder) => println!("Folder created: {} ({})", folder.name, folder.id),
            None => println!("Folder name is empty, nothing created"),
        },
    }
    Ok(())
}
