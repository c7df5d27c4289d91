use std::fmt::Write;
use tagwire::metadata::{ChapterRecord, LyricsRecord};
use tagwire::{TagSnapshot, TagUpdate};

/// A single field change
#[derive(Debug, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// Compute what applying `update` would change relative to `current`
pub fn compute_changes(current: &TagSnapshot, update: &TagUpdate) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if let Some(chapters) = &update.chapters {
        check_list(
            &mut changes,
            "chapter",
            &current.chapters,
            chapters,
            describe_chapter,
        );
    }
    if let Some(lyrics) = &update.lyrics {
        check_list(&mut changes, "lyrics", &current.lyrics, lyrics, describe_lyrics);
    }

    changes
}

fn check_list<T: PartialEq>(
    changes: &mut Vec<FieldChange>,
    field: &str,
    old: &[T],
    new: &[T],
    describe: fn(&T) -> String,
) {
    for i in 0..old.len().max(new.len()) {
        let (old_item, new_item) = (old.get(i), new.get(i));
        if old_item == new_item {
            continue;
        }
        changes.push(FieldChange {
            field: format!("{}[{}]", field, i),
            old_value: old_item.map_or("(empty)".to_string(), describe),
            new_value: new_item.map_or("(empty)".to_string(), describe),
        });
    }
}

fn describe_chapter(chapter: &ChapterRecord) -> String {
    let span = format!(
        "{}-{}",
        format_timestamp(chapter.start_time_ms),
        format_timestamp(chapter.end_time_ms)
    );
    match chapter.title.as_deref() {
        Some(title) if !title.is_empty() => format!("{} {} {}", chapter.id, span, title),
        _ => format!("{} {}", chapter.id, span),
    }
}

fn describe_lyrics(lyrics: &LyricsRecord) -> String {
    let mut out = String::new();
    if !lyrics.language.is_empty() {
        out.push_str(&format!("[{}] ", lyrics.language));
    }
    if !lyrics.description.is_empty() {
        out.push_str(&format!("{}: ", lyrics.description));
    }
    out.push_str(&lyrics.text);
    out
}

/// Milliseconds as `H:MM:SS.mmm`
pub fn format_timestamp(ms: u32) -> String {
    let millis = ms % 1000;
    let seconds = ms / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60,
        millis
    )
}

/// Format changes as a side-by-side diff table
pub fn format_diff(file_path: &str, changes: &[FieldChange]) -> String {
    if changes.is_empty() {
        return "No changes detected.".to_string();
    }

    let mut output = String::new();

    writeln!(output, "Changes to {}:", file_path).unwrap();
    writeln!(output).unwrap();

    // Calculate column widths
    let field_width = changes
        .iter()
        .map(|c| c.field.len())
        .max()
        .unwrap_or(10)
        .max(10);
    let value_width = 32;

    writeln!(
        output,
        "  {:width$} | {:vw$} | {:vw$}",
        "Field",
        "Current",
        "New",
        width = field_width,
        vw = value_width
    )
    .unwrap();

    writeln!(
        output,
        " {:->width$}-+-{:->vw$}-+-{:->vw$}",
        "",
        "",
        "",
        width = field_width + 1,
        vw = value_width
    )
    .unwrap();

    for change in changes {
        let old_display = truncate_value(&change.old_value, value_width);
        let new_display = truncate_value(&change.new_value, value_width);

        writeln!(
            output,
            "  {:width$} | {:vw$} | {:vw$}",
            change.field,
            old_display,
            new_display,
            width = field_width,
            vw = value_width
        )
        .unwrap();
    }

    output
}

/// Truncate a value to fit in the column width
fn truncate_value(value: &str, max_width: usize) -> String {
    // Replace newlines with spaces for display
    let single_line = value.replace('\n', " ");

    let char_count = single_line.chars().count();

    if char_count <= max_width {
        single_line
    } else {
        let truncated: String = single_line.chars().take(max_width - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: &str, start: u32, end: u32, title: Option<&str>) -> ChapterRecord {
        ChapterRecord {
            id: id.to_string(),
            start_time_ms: start,
            end_time_ms: end,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_compute_changes_empty_update() {
        let current = TagSnapshot {
            chapters: vec![chapter("c0", 0, 1000, None)],
            ..Default::default()
        };

        let changes = compute_changes(&current, &TagUpdate::default());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_compute_changes_with_changes() {
        let current = TagSnapshot {
            chapters: vec![
                chapter("c0", 0, 1000, Some("Intro")),
                chapter("c1", 1000, 2000, None),
            ],
            ..Default::default()
        };
        let update = TagUpdate {
            chapters: Some(vec![
                chapter("c0", 0, 1000, Some("Intro")),
                chapter("c1", 1000, 2500, Some("Main")),
                chapter("c2", 2500, 3000, None),
            ]),
            lyrics: None,
        };

        let changes = compute_changes(&current, &update);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "chapter[1]");
        assert_eq!(changes[0].old_value, "c1 0:00:01.000-0:00:02.000");
        assert_eq!(changes[0].new_value, "c1 0:00:01.000-0:00:02.500 Main");
        assert_eq!(changes[1].field, "chapter[2]");
        assert_eq!(changes[1].old_value, "(empty)");
    }

    #[test]
    fn test_removed_lyrics_show_as_empty() {
        let current = TagSnapshot {
            lyrics: vec![LyricsRecord {
                text: "la la".to_string(),
                description: "chorus".to_string(),
                language: "eng".to_string(),
            }],
            ..Default::default()
        };
        let update = TagUpdate {
            chapters: None,
            lyrics: Some(Vec::new()),
        };

        let changes = compute_changes(&current, &update);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value, "[eng] chorus: la la");
        assert_eq!(changes[0].new_value, "(empty)");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0:00:00.000");
        assert_eq!(format_timestamp(5_000), "0:00:05.000");
        assert_eq!(format_timestamp(3_723_045), "1:02:03.045");
    }

    #[test]
    fn test_format_diff_empty() {
        let output = format_diff("song.mp3", &[]);
        assert_eq!(output, "No changes detected.");
    }

    #[test]
    fn test_format_diff_with_changes() {
        let changes = vec![FieldChange {
            field: "chapter[0]".to_string(),
            old_value: "Old".to_string(),
            new_value: "New".to_string(),
        }];

        let output = format_diff("song.mp3", &changes);
        assert!(output.contains("Changes to song.mp3:"));
        assert!(output.contains("chapter[0]"));
        assert!(output.contains("Old"));
        assert!(output.contains("New"));
    }

    #[test]
    fn test_truncate_value_with_multibyte_utf8() {
        // '•' is a 3-byte UTF-8 character
        let value = "NATIONAL BESTSELLER • The definitive history of everything";

        let result = super::truncate_value(value, 32);
        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), 32);
    }
}
