//! High-level [`load_timelapse`] API, the entry point for embedding callers.
//!
//! ```no_run
//! use pwtimelapse::timelapse::{load_timelapse, RawFileEntry};
//!
//! let files = vec![RawFileEntry::new("SUBURBAN_BACKGARDEN_TIMELAPSE_0.sav", std::fs::read("f0.sav")?)];
//! let tl = load_timelapse(&files, "SUBURBAN_BACKGARDEN_TIMELAPSE", None)?;
//! println!("{}: {} frames", tl.name, tl.frames.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Layouts
//! A save folder is **complete** iff any file name ends (case-insensitively)
//! with `0-100.sav`; that one file holds every frame.  Otherwise the folder
//! is **in progress** and holds one file per frame.  See [`crate::header`]
//! for the byte layouts.
//!
//! # Duplicate first sub-frame
//! The first sub-frame of a complete save is a copy of its final frame and
//! is always discarded.  This is a property of the game's writer, not of the
//! container: if a future game version stops writing the copy, the drop
//! becomes wrong.  [`LoadOptions::verify_duplicate`] logs a warning when the
//! dropped record does not match the last frame.

use serde::Serialize;
use thiserror::Error;

use crate::codec::{get_codec, CodecError, CodecId};
use crate::frame::{decode_in_progress_frame, SubFrameIter, SubFrameRef};
use crate::header::{FrameHeader, SaveHeader, SAVE_HEADER_SIZE};
use crate::index::FrameIndex;
use crate::name::process_name;
use crate::perf::decode_ordered;
use crate::progress::{ProgressFn, ProgressSink};

/// Suffix that marks the single file of a complete save.
pub const COMPLETE_SUFFIX: &str = "0-100.sav";

/// Upper bound on the zstd output buffer reserved up front from the
/// header's declared size.  The buffer still grows past this if needed.
const MAX_PREALLOC: usize = 256 * 1024 * 1024;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum LoadError {
    /// Detection saw a complete save but no file carries the suffix.
    #[error("Could not find a file ending in {expected} in complete save")]
    FormatNotRecognized { expected: &'static str },
    #[error("{file}{}: {source}", frame_suffix(.frame))]
    Codec {
        file:   String,
        /// Sub-frame index within a complete save.
        frame:  Option<usize>,
        #[source]
        source: CodecError,
    },
}

fn frame_suffix(frame: &Option<usize>) -> String {
    frame.map(|i| format!(" (sub-frame {i})")).unwrap_or_default()
}

impl LoadError {
    fn codec(file: &str, frame: Option<usize>, source: CodecError) -> Self {
        LoadError::Codec { file: file.to_owned(), frame, source }
    }
}

// ── Input / output types ──────────────────────────────────────────────────────

/// One `.sav` file supplied by the caller.
#[derive(Debug, Clone)]
pub struct RawFileEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl RawFileEntry {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self { name: name.into(), data }
    }
}

/// A decoded timelapse.  `frames` is in playback order; each element is a
/// standalone JPEG image.
#[derive(Debug, Clone)]
pub struct TimeLapse {
    pub name:        String,
    pub raw_name:    String,
    pub is_complete: bool,
    /// Reference only; every JPEG carries its own dimensions.
    pub width:       u32,
    pub height:      u32,
    pub frames:      Vec<Vec<u8>>,
}

/// Serializable description of a [`TimeLapse`] without the frame bytes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimeLapseSummary {
    pub name:        String,
    pub raw_name:    String,
    pub is_complete: bool,
    pub width:       u32,
    pub height:      u32,
    pub frame_count: usize,
    pub frame_sizes: Vec<usize>,
    pub total_bytes: usize,
}

impl TimeLapse {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn summary(&self) -> TimeLapseSummary {
        let frame_sizes: Vec<usize> = self.frames.iter().map(Vec::len).collect();
        TimeLapseSummary {
            name:        self.name.clone(),
            raw_name:    self.raw_name.clone(),
            is_complete: self.is_complete,
            width:       self.width,
            height:      self.height,
            frame_count: self.frames.len(),
            total_bytes: frame_sizes.iter().sum(),
            frame_sizes,
        }
    }
}

// ── LoadOptions ───────────────────────────────────────────────────────────────

/// Configuration for [`load_timelapse_with`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Decode frames on the Rayon pool (needs the `parallel` feature).
    pub parallel:         bool,
    /// Hash the dropped first sub-frame of a complete save and warn if it
    /// differs from the final frame.
    pub verify_duplicate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            parallel:         false,
            verify_duplicate: true,
        }
    }
}

// ── Format detection ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Complete,
    InProgress,
}

/// Case-insensitive `0-100.sav` suffix test shared by detection and lookup.
pub fn is_complete_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(COMPLETE_SUFFIX)
}

pub fn is_complete_save<S: AsRef<str>>(file_names: &[S]) -> bool {
    file_names.iter().any(|n| is_complete_file_name(n.as_ref()))
}

pub fn detect_kind(files: &[RawFileEntry]) -> SaveKind {
    if files.iter().any(|f| is_complete_file_name(&f.name)) {
        SaveKind::Complete
    } else {
        SaveKind::InProgress
    }
}

// ── Loader facade ─────────────────────────────────────────────────────────────

/// Detect the layout of `files` and decode every frame.
pub fn load_timelapse(
    files:        &[RawFileEntry],
    folder_label: &str,
    progress:     Option<&mut ProgressFn<'_>>,
) -> Result<TimeLapse, LoadError> {
    load_timelapse_with(files, folder_label, &LoadOptions::default(), progress)
}

pub fn load_timelapse_with(
    files:        &[RawFileEntry],
    folder_label: &str,
    opts:         &LoadOptions,
    progress:     Option<&mut ProgressFn<'_>>,
) -> Result<TimeLapse, LoadError> {
    let kind = detect_kind(files);
    tracing::debug!(?kind, files = files.len(), label = folder_label, "detected save layout");
    parse(kind, files, folder_label, opts, &mut ProgressSink::new(progress))
}

/// Decode `files` as the given layout.
pub fn parse(
    kind:         SaveKind,
    files:        &[RawFileEntry],
    folder_label: &str,
    opts:         &LoadOptions,
    progress:     &mut ProgressSink<'_>,
) -> Result<TimeLapse, LoadError> {
    match kind {
        SaveKind::Complete => {
            let main = files
                .iter()
                .find(|f| is_complete_file_name(&f.name))
                .ok_or(LoadError::FormatNotRecognized { expected: COMPLETE_SUFFIX })?;
            load_complete(main, folder_label, opts, progress)
        }
        SaveKind::InProgress => load_in_progress(files, folder_label, opts, progress),
    }
}

// ── In-progress layout ────────────────────────────────────────────────────────

pub fn load_in_progress(
    files:        &[RawFileEntry],
    folder_label: &str,
    opts:         &LoadOptions,
    progress:     &mut ProgressSink<'_>,
) -> Result<TimeLapse, LoadError> {
    let index = FrameIndex::build(files.iter().map(|f| f.name.as_str()));
    for name in &index.skipped {
        tracing::warn!(file = %name, "no numeric frame suffix; not a frame file, skipping");
    }

    let ordered: Vec<&RawFileEntry> = index.positions().map(|p| &files[p]).collect();
    let total = ordered.len();

    let width_height = match ordered.first() {
        Some(f) => {
            let h = FrameHeader::parse_at(&f.data, 0).map_err(|e| LoadError::codec(&f.name, None, e))?;
            (h.width, h.height)
        }
        None => (0, 0),
    };

    let frames = decode_ordered(
        &ordered,
        opts.parallel,
        |f| {
            decode_in_progress_frame(&f.data)
                .map(|(_, jpeg)| jpeg)
                .map_err(|e| LoadError::codec(&f.name, None, e))
        },
        |i| {
            tracing::debug!(frame = i, file = %ordered[i].name, "decoded in-progress frame");
            progress.report(i + 1, total);
        },
    )?;

    tracing::info!(label = folder_label, frames = frames.len(), "loaded in-progress timelapse");
    Ok(TimeLapse {
        name:        process_name(folder_label, false),
        raw_name:    folder_label.to_owned(),
        is_complete: false,
        width:       width_height.0,
        height:      width_height.1,
        frames,
    })
}

// ── Complete layout ───────────────────────────────────────────────────────────

pub fn load_complete(
    file:         &RawFileEntry,
    folder_label: &str,
    opts:         &LoadOptions,
    progress:     &mut ProgressSink<'_>,
) -> Result<TimeLapse, LoadError> {
    let header = SaveHeader::parse(&file.data).map_err(|e| LoadError::codec(&file.name, None, e))?;
    let payload = &file.data[SAVE_HEADER_SIZE..];

    let hint = usize::try_from(header.uncompressed_size).unwrap_or(0).min(MAX_PREALLOC);
    let decompressed = get_codec(CodecId::Zstd)
        .decompress(payload, hint)
        .map_err(|e| LoadError::codec(&file.name, None, e))?;

    if i64::try_from(decompressed.len()).map_or(true, |n| n != header.uncompressed_size) {
        tracing::warn!(
            file = %file.name,
            expected = header.uncompressed_size,
            actual = decompressed.len(),
            "zstd decompressed size mismatch"
        );
    }

    let subs: Vec<SubFrameRef> = SubFrameIter::new(&decompressed)
        .enumerate()
        .map(|(i, r)| r.map_err(|e| LoadError::codec(&file.name, Some(i), e)))
        .collect::<Result<_, _>>()?;

    // Kept-frame count after sub-frame `i` is `i`: sub-frame 0 is dropped.
    let decoded = decode_ordered(
        &subs,
        opts.parallel,
        |sub| {
            sub.decode(&decompressed)
                .map_err(|e| LoadError::codec(&file.name, Some(sub.index), e))
        },
        |i| {
            tracing::debug!(sub_frame = i, "decoded complete-save sub-frame");
            progress.report(i, 0);
        },
    )?;

    let mut decoded = decoded.into_iter();
    let duplicate = decoded.next();
    let frames: Vec<Vec<u8>> = decoded.collect();

    if opts.verify_duplicate {
        if let (Some(dup), Some(last)) = (&duplicate, frames.last()) {
            if blake3::hash(dup) != blake3::hash(last) {
                tracing::warn!(
                    file = %file.name,
                    "first sub-frame differs from final frame; dropping it anyway"
                );
            }
        }
    }

    tracing::info!(
        label = folder_label,
        sub_frames = subs.len(),
        frames = frames.len(),
        width = header.width,
        height = header.height,
        "loaded complete timelapse"
    );
    Ok(TimeLapse {
        name:        process_name(folder_label, true),
        raw_name:    folder_label.to_owned(),
        is_complete: true,
        width:       header.width,
        height:      header.height,
        frames,
    })
}
