use crate::domain::{EntryKind, MediaKind};
use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Formats a byte count with binary units (e.g. "1.5 KB")
pub fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if size < 1024 {
        return format!("{} B", size);
    }

    let mut value = size as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Formats a modification time in local time
pub fn format_modified(modified: SystemTime) -> String {
    let local: DateTime<Local> = modified.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// Icon shown in the first column of a row
pub fn entry_icon(kind: EntryKind, media: MediaKind) -> &'static str {
    match kind {
        EntryKind::ParentLink => "↰",
        EntryKind::Directory => "▸",
        EntryKind::File => match media {
            MediaKind::Audio => "♪",
            MediaKind::Video => "▶",
            MediaKind::Image => "▣",
            MediaKind::Folder | MediaKind::Other => "·",
        },
    }
}

/// Human readable classification for the details pane
pub fn media_label(media: MediaKind) -> &'static str {
    match media {
        MediaKind::Folder => "Folder",
        MediaKind::Audio => "Audio",
        MediaKind::Video => "Video",
        MediaKind::Image => "Image",
        MediaKind::Other => "File",
    }
}
