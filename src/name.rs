//! Display and export names derived from timelapse folder names.
//!
//! Folder names look like `MAPNAME_LEVEL_SUB_TIMELAPSE` (in progress) or
//! `MAPNAME_LEVEL_SUB_TIMELAPSE-COMP` (complete).  The last token is a
//! category suffix and never part of the label.

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None        => String::new(),
    }
}

/// Human-readable label, e.g. `"Mapname: Level - Sub"`.
///
/// Names with fewer than three `_` tokens are returned unchanged.
pub fn process_name(raw_name: &str, is_complete: bool) -> String {
    let parts: Vec<&str> = raw_name.split('_').collect();
    if parts.len() < 3 {
        return raw_name.to_owned();
    }

    let mut out = capitalize(parts[0]);
    out.push(':');
    if !is_complete {
        out.push_str(" [In Progress]");
    }
    for (i, part) in parts.iter().enumerate().take(parts.len() - 1).skip(1) {
        if i == 2 {
            out.push_str(" -");
        }
        out.push(' ');
        out.push_str(&capitalize(part));
    }
    out
}

/// Best-effort folder label from a single save file name, for inputs that
/// arrive without their folder.  `MAP_LEVEL_TIMELAPSE_12.sav` gives
/// `MAP_LEVEL_TIMELAPSE`; `MAP_LEVEL_TIMELAPSE-COMP_0-100.sav` gives
/// `MAP_LEVEL_TIMELAPSE-COMP`.
pub fn guess_folder_name(file_name: &str) -> String {
    let base = crate::index::base_name(file_name);
    let mut parts: Vec<&str> = base.split('_').collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
        parts.pop();
    }
    if parts.len() > 1 && parts.last() == Some(&"0-100") {
        parts.pop();
    }
    parts.join("_")
}

/// File-system safe stem: lower-cased, anything outside `[a-z0-9_-]`
/// replaced by `_`.
pub fn export_name(raw_name: &str) -> String {
    raw_name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

/// `"{base}_{index:04}.jpg"`
pub fn frame_file_name(base: &str, index: usize) -> String {
    format!("{base}_{index:04}.jpg")
}
