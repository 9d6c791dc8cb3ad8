//! Domain types shared by the API client and the routine reconciler.
//!
//! Field names follow the backend's camelCase JSON. Everything the server
//! may omit carries `#[serde(default)]` so partially filled payloads decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Server-assigned routine identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineId(pub i64);

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for RoutineId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Account identifier of a parent or child.
///
/// The backend sends these as strings in some payloads and as integers in
/// others; both decode into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Day a routine is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn all() -> &'static [DayOfWeek] {
        &[
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
            DayOfWeek::Sunday => "SUNDAY",
        };
        f.write_str(name)
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DayOfWeek::all()
            .iter()
            .copied()
            .find(|day| {
                let full = day.to_string().to_ascii_lowercase();
                lower == full || (lower.len() == 3 && full.starts_with(&lower))
            })
            .ok_or_else(|| format!("unknown day '{s}'; expected monday..sunday"))
    }
}

/// Mood a child can report. Serialized as the backend's `moodTypeName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Sick,
}

impl Emotion {
    /// Wire name sent as `moodTypeName`.
    pub fn wire_name(self) -> &'static str {
        match self {
            Emotion::Happy => "HAPPY",
            Emotion::Sad => "SAD",
            Emotion::Angry => "ANGRY",
            Emotion::Sick => "SICK",
        }
    }

    /// Label shown on the child's mood picker.
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "좋아요",
            Emotion::Sad => "슬퍼요",
            Emotion::Angry => "화나요",
            Emotion::Sick => "아파요",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "happy" => return Ok(Emotion::Happy),
            "sad" => return Ok(Emotion::Sad),
            "angry" => return Ok(Emotion::Angry),
            "sick" => return Ok(Emotion::Sick),
            _ => {}
        }
        [Emotion::Happy, Emotion::Sad, Emotion::Angry, Emotion::Sick]
            .into_iter()
            .find(|e| e.label() == trimmed)
            .ok_or_else(|| format!("unknown emotion '{s}'; expected happy, sad, angry, sick"))
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Explicit `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of a child's routine list.
///
/// `id == None` means the item has not been created on the server yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RoutineId>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_account: UserId,
}

impl RoutineItem {
    /// A not-yet-created item owned by `owner`.
    pub fn new(title: impl Into<String>, owner: UserId) -> Self {
        Self {
            id: None,
            title: title.into(),
            time: String::new(),
            day_of_week: None,
            owner_account: owner,
        }
    }

    pub fn with_id(mut self, id: impl Into<RoutineId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// A child registered under the logged-in parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChildInfo {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_year: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_month: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unique_id: String,
    /// Account id used to address the child's routines and logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl ChildInfo {
    /// Names of the fields that must be filled before the child can be created.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("name", &self.name),
            ("birthYear", &self.birth_year),
            ("birthMonth", &self.birth_month),
            ("birthDay", &self.birth_day),
            ("uniqueId", &self.unique_id),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }
}

/// Completion record for a routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineLog {
    pub routine_id: RoutineId,
    pub user_id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
}

impl RoutineLog {
    /// A routine counts as completed if any of its logs says so.
    pub fn is_completed(logs: &[RoutineLog], routine: RoutineId) -> bool {
        logs.iter()
            .any(|log| log.routine_id == routine && log.is_completed)
    }
}

/// Mood report posted by a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    pub mood_type_name: Emotion,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
