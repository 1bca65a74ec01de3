use crate::error::{DomainError, DomainResult};
use crate::identifiers::{RecordId, UserId};
use crate::timestamp::{lenient_option, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;

fn validate_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationError(format!(
            "{field} cannot be empty"
        )));
    }
    if value.len() > max {
        return Err(DomainError::ValidationError(format!(
            "{field} too long (max {max} characters)"
        )));
    }
    Ok(())
}

/// A single to-do item, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
    pub owner: UserId,
    #[serde(default, deserialize_with = "lenient_option")]
    pub created_at: Option<Timestamp>,
}

impl Task {
    pub fn new(title: String, owner: UserId) -> DomainResult<Self> {
        Self::validate_title(&title)?;
        Ok(Self {
            id: RecordId::new(),
            title: title.trim().to_string(),
            completed: false,
            owner,
            created_at: Some(Timestamp::now()),
        })
    }

    pub fn validate_title(title: &str) -> DomainResult<()> {
        validate_text("Title", title, MAX_TITLE_LEN)
    }

    /// Local calendar day the task was created on. `None` when the stored
    /// timestamp was absent or unreadable; such tasks never feed a streak.
    pub fn created_day(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.local_day())
    }
}

/// A note embedded in a folder. Notes have no lifecycle of their own;
/// deleting the folder discards them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub timestamp: Option<Timestamp>,
}

impl Note {
    pub fn new(title: String, content: String) -> DomainResult<Self> {
        Self::validate_title(&title)?;
        Ok(Self {
            id: RecordId::new(),
            title: title.trim().to_string(),
            content,
            timestamp: Some(Timestamp::now()),
        })
    }

    pub fn validate_title(title: &str) -> DomainResult<()> {
        validate_text("Note title", title, MAX_TITLE_LEN)
    }
}

/// A named collection of embedded notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub owner: UserId,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub updated_at: Option<Timestamp>,
}

impl Folder {
    pub fn new(name: String, description: String, owner: UserId) -> DomainResult<Self> {
        validate_text("Folder name", &name, MAX_TITLE_LEN)?;
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::ValidationError(format!(
                "Description too long (max {MAX_DESCRIPTION_LEN} characters)"
            )));
        }
        Ok(Self {
            id: RecordId::new(),
            name: name.trim().to_string(),
            description,
            owner,
            notes: Vec::new(),
            created_at: Some(Timestamp::now()),
            updated_at: None,
        })
    }

    pub fn rename(&mut self, name: String, description: String) -> DomainResult<()> {
        validate_text("Folder name", &name, MAX_TITLE_LEN)?;
        self.name = name.trim().to_string();
        self.description = description;
        self.touch();
        Ok(())
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
        self.touch();
    }

    /// Replaces the note with the same id. The old entry is removed and the
    /// updated one appended, so an edited note moves to the end of the list.
    pub fn replace_note(&mut self, note: Note) -> DomainResult<()> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != note.id);
        if self.notes.len() == before {
            return Err(DomainError::NoteNotFound(note.id.to_string()));
        }
        self.notes.push(note);
        self.touch();
        Ok(())
    }

    pub fn remove_note(&mut self, note_id: &RecordId) -> DomainResult<Note> {
        let pos = self
            .notes
            .iter()
            .position(|n| &n.id == note_id)
            .ok_or_else(|| DomainError::NoteNotFound(note_id.to_string()))?;
        let removed = self.notes.remove(pos);
        self.touch();
        Ok(removed)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Timestamp::now());
    }
}

/// One calendar entry: a subject at a time of day on a calendar date.
/// The time of day is free text ("14:30", "after lunch"); only the date
/// participates in indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: RecordId,
    pub subject: String,
    pub time: String,
    pub date: NaiveDate,
    pub owner: UserId,
    #[serde(default, deserialize_with = "lenient_option")]
    pub created_at: Option<Timestamp>,
}

impl Schedule {
    pub fn new(subject: String, time: String, date: NaiveDate, owner: UserId) -> DomainResult<Self> {
        validate_text("Subject", &subject, MAX_TITLE_LEN)?;
        validate_text("Time", &time, MAX_TITLE_LEN)?;
        Ok(Self {
            id: RecordId::new(),
            subject: subject.trim().to_string(),
            time: time.trim().to_string(),
            date,
            owner,
            created_at: Some(Timestamp::now()),
        })
    }
}

/// Display profile for one user. Image fields are opaque references to an
/// external host; this service never touches image bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub owner: UserId,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub created_at: Option<Timestamp>,
}

impl UserProfile {
    pub fn new(owner: UserId, username: String, email: Option<String>) -> Self {
        let username = if username.trim().is_empty() {
            "User".to_string()
        } else {
            username.trim().to_string()
        };
        Self {
            owner,
            username,
            bio: "Tell us about yourself...".to_string(),
            email,
            profile_url: None,
            cover_url: None,
            created_at: Some(Timestamp::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::from_string("user-1".to_string()).unwrap()
    }

    #[test]
    fn task_rejects_blank_title() {
        assert!(Task::new("   ".to_string(), owner()).is_err());
        assert!(Task::new("a".repeat(201), owner()).is_err());
        let task = Task::new("  Buy milk  ".to_string(), owner()).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert!(task.created_at.is_some());
    }

    #[test]
    fn folder_note_lifecycle() {
        let mut folder = Folder::new("Ideas".to_string(), String::new(), owner()).unwrap();
        let a = Note::new("First".to_string(), "alpha".to_string()).unwrap();
        let b = Note::new("Second".to_string(), "beta".to_string()).unwrap();
        folder.add_note(a.clone());
        folder.add_note(b.clone());
        assert_eq!(folder.notes.len(), 2);

        // Editing moves the note to the end of the list.
        let mut edited = a.clone();
        edited.content = "alpha v2".to_string();
        folder.replace_note(edited).unwrap();
        assert_eq!(folder.notes[0].id, b.id);
        assert_eq!(folder.notes[1].content, "alpha v2");

        let removed = folder.remove_note(&b.id).unwrap();
        assert_eq!(removed.id, b.id);
        assert_eq!(folder.notes.len(), 1);
        assert!(folder.updated_at.is_some());
    }

    #[test]
    fn replace_unknown_note_is_an_error() {
        let mut folder = Folder::new("Ideas".to_string(), String::new(), owner()).unwrap();
        let stray = Note::new("Stray".to_string(), String::new()).unwrap();
        assert_eq!(
            folder.replace_note(stray.clone()).unwrap_err(),
            DomainError::NoteNotFound(stray.id.to_string())
        );
        assert!(folder.remove_note(&stray.id).is_err());
    }

    #[test]
    fn folder_deserializes_without_notes_field() {
        let json = format!(
            r#"{{"id":"{}","name":"N","description":"","owner":"u","created_at":1756300000000}}"#,
            RecordId::new()
        );
        let folder: Folder = serde_json::from_str(&json).unwrap();
        assert!(folder.notes.is_empty());
        assert!(folder.created_at.is_some());
    }

    #[test]
    fn profile_defaults() {
        let p = UserProfile::new(owner(), "  ".to_string(), None);
        assert_eq!(p.username, "User");
        assert_eq!(p.bio, "Tell us about yourself...");
    }
}
