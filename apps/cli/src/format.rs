use vidnote_core::{NoteIndex, VideoNote};

/// Format one note as a markdown-ish block
pub fn format_note_readable(note: &VideoNote) -> String {
    let mut output = String::new();
    output.push_str(&format!("### [{}] {}\n\n", note.start_time, note.title));
    output.push_str(&format!("{}\n\n", note.description));
    output.push_str(&format!("<{}>\n\n", note.url));
    output
}

pub fn format_index_readable(index: &NoteIndex) -> String {
    if index.is_empty() {
        return "No notes saved yet.\n".to_string();
    }

    let mut output = String::new();
    for (video_id, notes) in index {
        output.push_str(&format!("## {} ({} notes)\n\n", video_id, notes.len()));
        for note in notes {
            output.push_str(&format_note_readable(note));
        }
    }
    output
}
