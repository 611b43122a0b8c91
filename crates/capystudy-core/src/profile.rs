//! User profile, settings and the local login flag.
//!
//! Login is a local convenience flag, not authentication: any well-formed
//! email or phone number is accepted and stored on the profile.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::storage::{keys, Batch, Store};
use crate::streak::StudyStreak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    DarkMode,
    Reminders,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub reminders: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(flatten)]
    pub streak: StudyStreak,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Student Capy".into(),
            email: String::new(),
            phone: String::new(),
            avatar: "https://picsum.photos/200".into(),
            banner: None,
            settings: Settings::default(),
            streak: StudyStreak::default(),
        }
    }
}

impl UserProfile {
    pub fn contact(&self, kind: ContactKind) -> &str {
        match kind {
            ContactKind::Email => &self.email,
            ContactKind::Phone => &self.phone,
        }
    }

    fn contact_mut(&mut self, kind: ContactKind) -> &mut String {
        match kind {
            ContactKind::Email => &mut self.email,
            ContactKind::Phone => &mut self.phone,
        }
    }
}

/// Check a login/bind identifier.
///
/// # Errors
/// Blank input, an email without `@`, or a phone number with characters
/// other than digits, whitespace, `-` and `+`.
pub fn validate_contact(kind: ContactKind, identifier: &str) -> Result<String, ValidationError> {
    let value = identifier.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    match kind {
        ContactKind::Email if !value.contains('@') => Err(ValidationError::InvalidEmail),
        ContactKind::Phone
            if !value
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '+') =>
        {
            Err(ValidationError::InvalidPhone)
        }
        _ => Ok(value.to_string()),
    }
}

/// The stored profile plus the login flag.
pub struct Account<'s> {
    store: &'s Store,
    profile: UserProfile,
    logged_in: bool,
}

impl<'s> Account<'s> {
    pub fn load(store: &'s Store) -> Self {
        Self {
            profile: store.read_or_default(keys::USER_PROFILE),
            logged_in: store.read_or(keys::LOGGED_IN, || false),
            store,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Validate the identifier, store it on the profile and set the login flag.
    pub fn login(&mut self, kind: ContactKind, identifier: &str) -> Result<(), ValidationError> {
        let value = validate_contact(kind, identifier)?;
        *self.profile.contact_mut(kind) = value;
        self.logged_in = true;

        let mut batch = Batch::new();
        batch
            .put(keys::USER_PROFILE, &self.profile)
            .put(keys::LOGGED_IN, &true);
        self.store.commit(batch);
        tracing::info!(?kind, "logged in");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
        self.store.write(keys::LOGGED_IN, &false);
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        self.profile.name = name.to_string();
        self.save();
        Ok(())
    }

    pub fn bind(&mut self, kind: ContactKind, identifier: &str) -> Result<(), ValidationError> {
        let value = validate_contact(kind, identifier)?;
        *self.profile.contact_mut(kind) = value;
        self.save();
        Ok(())
    }

    /// Clear a contact method. Unbinding the last one is allowed.
    pub fn unbind(&mut self, kind: ContactKind) {
        self.profile.contact_mut(kind).clear();
        self.save();
    }

    /// Flip a setting and return its new value.
    pub fn toggle(&mut self, setting: Setting) -> bool {
        let flag = match setting {
            Setting::DarkMode => &mut self.profile.settings.dark_mode,
            Setting::Reminders => &mut self.profile.settings.reminders,
        };
        *flag = !*flag;
        let value = *flag;
        self.save();
        value
    }

    /// Read an image file and store it as the avatar `data:` URL.
    pub async fn set_avatar_from_file(&mut self, path: &Path) -> Result<(), CoreError> {
        self.profile.avatar = read_data_url(path).await?;
        self.save();
        Ok(())
    }

    /// Read an image file and store it as the banner `data:` URL.
    pub async fn set_banner_from_file(&mut self, path: &Path) -> Result<(), CoreError> {
        self.profile.banner = Some(read_data_url(path).await?);
        self.save();
        Ok(())
    }

    fn save(&self) {
        self.store.write(keys::USER_PROFILE, &self.profile);
    }
}

/// Encode a file as a base64 `data:` URL, with the media type taken from
/// its extension.
pub async fn read_data_url(path: &Path) -> Result<String, CoreError> {
    let bytes = tokio::fs::read(path).await?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn login_validation() {
        assert_eq!(
            validate_contact(ContactKind::Email, "  "),
            Err(ValidationError::EmptyIdentifier)
        );
        assert_eq!(
            validate_contact(ContactKind::Email, "capy.example.com"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_contact(ContactKind::Phone, "555-CAPY"),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            validate_contact(ContactKind::Phone, "+1 555-0100").as_deref(),
            Ok("+1 555-0100")
        );
        assert_eq!(
            validate_contact(ContactKind::Email, " capy@example.com ").as_deref(),
            Ok("capy@example.com")
        );
    }

    #[test]
    fn invalid_login_mutates_nothing() {
        let mem = MemoryStore::new();
        let store = Store::new(mem.clone());
        let mut account = Account::load(&store);
        assert!(account.login(ContactKind::Email, "nope").is_err());
        assert!(!account.is_logged_in());
        assert!(mem.is_empty());
    }

    #[test]
    fn login_persists_flag_and_identifier() {
        let store = Store::in_memory();
        Account::load(&store)
            .login(ContactKind::Email, "capy@example.com")
            .unwrap();

        let reloaded = Account::load(&store);
        assert!(reloaded.is_logged_in());
        assert_eq!(reloaded.profile().email, "capy@example.com");
    }

    #[test]
    fn logout_clears_flag_only() {
        let store = Store::in_memory();
        let mut account = Account::load(&store);
        account.login(ContactKind::Phone, "555 0100").unwrap();
        account.logout();

        let reloaded = Account::load(&store);
        assert!(!reloaded.is_logged_in());
        assert_eq!(reloaded.profile().phone, "555 0100");
    }

    #[test]
    fn toggle_and_unbind() {
        let store = Store::in_memory();
        let mut account = Account::load(&store);
        assert!(account.toggle(Setting::DarkMode));
        assert!(!account.toggle(Setting::DarkMode));
        assert!(account.toggle(Setting::Reminders));
        account.bind(ContactKind::Email, "a@b.c").unwrap();
        account.unbind(ContactKind::Email);

        let reloaded = Account::load(&store);
        assert!(reloaded.profile().settings.reminders);
        assert!(!reloaded.profile().settings.dark_mode);
        assert_eq!(reloaded.profile().contact(ContactKind::Email), "");
    }

    #[test]
    fn rename_rejects_blank() {
        let store = Store::in_memory();
        let mut account = Account::load(&store);
        assert!(account.rename(" ").is_err());
        account.rename("Capy").unwrap();
        assert_eq!(Account::load(&store).profile().name, "Capy");
    }

    #[test]
    fn profile_record_flattens_streak() {
        let json = serde_json::to_value(UserProfile::default()).unwrap();
        assert_eq!(json["streak"], 5);
        assert!(json["lastStudyDate"].is_string());
        assert!(json.get("banner").is_none());
    }

    #[test]
    fn profile_without_streak_fields_keeps_its_data() {
        let mem = MemoryStore::new();
        mem.set(
            keys::USER_PROFILE,
            r#"{"name":"Alice","email":"a@b.c","settings":{"darkMode":true}}"#,
        )
        .unwrap();
        let store = Store::new(mem);

        let account = Account::load(&store);
        let profile = account.profile();
        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.email, "a@b.c");
        assert!(profile.settings.dark_mode);
        assert_eq!(profile.streak, StudyStreak::default());
    }

    #[tokio::test]
    async fn avatar_is_stored_as_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capy.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let store = Store::in_memory();
        let mut account = Account::load(&store);
        account.set_avatar_from_file(&path).await.unwrap();
        assert_eq!(account.profile().avatar, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn missing_avatar_file_is_an_error() {
        let store = Store::in_memory();
        let mut account = Account::load(&store);
        let before = account.profile().avatar.clone();
        assert!(account
            .set_avatar_from_file(Path::new("/definitely/not/here.png"))
            .await
            .is_err());
        assert_eq!(account.profile().avatar, before);
    }
}
