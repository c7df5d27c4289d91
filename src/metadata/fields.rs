use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One named structured value inside a complex property.
pub type PropertyMap = BTreeMap<String, String>;

/// Name of the complex property holding lyrics.
pub const LYRICS_PROPERTY: &str = "LYRICS";

/// A chapter as carried in the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    /// Element identifier, unique within the chapter list
    pub id: String,
    pub start_time_ms: u32,
    pub end_time_ms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChapterRecord {
    /// Number of map entries this record occupies on the wire.
    pub fn field_count(&self) -> u32 {
        if self.has_title() {
            4
        } else {
            3
        }
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Lyrics with their description and language. Empty strings mean unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LyricsRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
}

impl LyricsRecord {
    pub fn from_property_map(map: &PropertyMap) -> Self {
        let field = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            text: field("text"),
            description: field("description"),
            language: field("language"),
        }
    }

    pub fn into_property_map(self) -> PropertyMap {
        PropertyMap::from([
            ("text".to_string(), self.text),
            ("description".to_string(), self.description),
            ("language".to_string(), self.language),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_field_count() {
        let mut chapter = ChapterRecord {
            id: "chp1".to_string(),
            start_time_ms: 0,
            end_time_ms: 1000,
            title: None,
        };
        assert_eq!(chapter.field_count(), 3);

        chapter.title = Some(String::new());
        assert_eq!(chapter.field_count(), 3);

        chapter.title = Some("Intro".to_string());
        assert_eq!(chapter.field_count(), 4);
    }

    #[test]
    fn test_lyrics_missing_keys_default_to_empty() {
        let map = PropertyMap::from([("text".to_string(), "la la".to_string())]);
        let record = LyricsRecord::from_property_map(&map);
        assert_eq!(record.text, "la la");
        assert_eq!(record.description, "");
        assert_eq!(record.language, "");
    }

    #[test]
    fn test_lyrics_property_map_has_all_keys() {
        let map = LyricsRecord::default().into_property_map();
        assert_eq!(map.len(), 3);
        assert!(map.contains_key("language"));
    }
}
