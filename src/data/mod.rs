//=========================================================================
// Dialogue Document Model
//=========================================================================
//
// Typed model of the remote dialogue document and its lenient parser.
//
// The document carries three arrays:
//   dialogue: [{name, text}]
//   emojies:  [{name, url}]
//   avatars:  [{name, url, position: "left"|"right"}]
//
// Parsing is lenient at the record level: a record missing a required
// field is skipped with a warning and the rest of the document is kept.
// Only a structurally unparseable document is an error, and the caller
// (the dialogue scene) maps that to its built-in sample set.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;
use serde::Deserialize;
use thiserror::Error;

//=== DialogueError =======================================================

/// Failure to make any sense of a dialogue document.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// The document is not the expected JSON shape at all.
    #[error("malformed dialogue document: {0}")]
    Json(#[from] serde_json::Error),
}

//=== SpeakerSide =========================================================

/// Which side of the stage a speaker's avatar occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerSide {
    Left,
    Right,
}

impl SpeakerSide {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

//=== Records =============================================================

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

/// A named emoji image referenced from dialogue text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiAsset {
    pub name: String,
    pub url: String,
}

/// A speaker's avatar image and stage side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarProfile {
    pub name: String,
    pub url: String,
    pub side: SpeakerSide,
}

//=== DialogueDocument ====================================================

/// The validated document: well-formed records only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueDocument {
    pub lines: Vec<DialogueLine>,
    pub emoji: Vec<EmojiAsset>,
    pub avatars: Vec<AvatarProfile>,
}

//--- Raw Wire Shapes ------------------------------------------------------
//
// Every field is optional at the wire level; validation decides which
// records survive.

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    dialogue: Vec<RawLine>,
    #[serde(default)]
    emojies: Vec<RawEmoji>,
    #[serde(default)]
    avatars: Vec<RawAvatar>,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    name: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEmoji {
    name: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAvatar {
    name: Option<String>,
    url: Option<String>,
    position: Option<String>,
}

impl DialogueDocument {
    /// Parses the raw JSON text, skipping malformed records.
    pub fn from_json(raw: &str) -> Result<Self, DialogueError> {
        let doc: RawDocument = serde_json::from_str(raw)?;

        let lines = doc
            .dialogue
            .into_iter()
            .filter_map(|record| match (record.name, record.text) {
                (Some(speaker), Some(text)) => Some(DialogueLine { speaker, text }),
                (name, _) => {
                    warn!("Skipping dialogue record with missing fields (name: {name:?})");
                    None
                }
            })
            .collect();

        let emoji = doc
            .emojies
            .into_iter()
            .filter_map(|record| match (record.name, record.url) {
                (Some(name), Some(url)) => Some(EmojiAsset { name, url }),
                (name, _) => {
                    warn!("Skipping emoji record with missing fields (name: {name:?})");
                    None
                }
            })
            .collect();

        let avatars = doc
            .avatars
            .into_iter()
            .filter_map(|record| {
                let (Some(name), Some(url), Some(position)) =
                    (record.name, record.url, record.position)
                else {
                    warn!("Skipping avatar record with missing fields");
                    return None;
                };
                let Some(side) = SpeakerSide::parse(&position) else {
                    warn!("Skipping avatar '{name}' with unknown position '{position}'");
                    return None;
                };
                Some(AvatarProfile { name, url, side })
            })
            .collect();

        Ok(Self { lines, emoji, avatars })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
