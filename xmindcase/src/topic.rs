//! serde shapes of the outline document's JSON payload.
//!
//! An outline document is a zip container. `content.json` holds an array of sheets, each
//! with one root topic; topics nest through `children.attached`. Only the fields the
//! engine reads or writes are modeled; unknown keys are ignored on read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Zip entry holding the sheet array.
pub const CONTENT_ENTRY: &str = "content.json";
/// Zip entry listing the container's files.
pub const MANIFEST_ENTRY: &str = "manifest.json";
/// Zip entry holding document metadata.
pub const METADATA_ENTRY: &str = "metadata.json";

/// Structure class the editor uses for a right-facing logic chart.
pub const LOGIC_RIGHT_STRUCTURE: &str = "org.xmind.ui.logic.right";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub title: String,
    pub root_topic: Topic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Notes>,
    /// Plain-string note written by some generators instead of `notes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

impl Topic {
    /// Attached child topics, in document order.
    pub fn attached(&self) -> &[Self] {
        self.children
            .as_ref()
            .map(|children| children.attached.as_slice())
            .unwrap_or_default()
    }

    /// Note text, preferring the structured `notes.plain.content` form.
    pub fn note_text(&self) -> Option<&str> {
        self.notes
            .as_ref()
            .and_then(|notes| notes.plain.as_ref())
            .map(|plain| plain.content.as_str())
            .or(self.note.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Set `children.attached`, dropping the key when there are none.
    pub fn set_attached(&mut self, attached: Vec<Self>) {
        self.children = if attached.is_empty() {
            None
        } else {
            Some(Children { attached })
        };
    }

    /// Set `notes.plain.content`, dropping the key for blank text.
    pub fn set_note(&mut self, text: &str) {
        self.notes = if text.trim().is_empty() {
            None
        } else {
            Some(Notes {
                plain: Some(PlainNote {
                    content: text.to_string(),
                }),
            })
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Children {
    #[serde(default)]
    pub attached: Vec<Topic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub marker_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<PlainNote>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainNote {
    #[serde(default)]
    pub content: String,
}

/// `manifest.json`: the container's file list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "file-entries")]
    pub file_entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn for_entries<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            file_entries: names
                .into_iter()
                .map(|name| {
                    (
                        name.to_string(),
                        ManifestEntry {
                            full_path: name.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "full-path")]
    pub full_path: String,
}
