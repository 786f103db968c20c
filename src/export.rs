//! JPEG sequence export.
//!
//! Frames are already JPEG files, so exporting is a matter of choosing which
//! frames to keep and naming them `<export name>_<NNNN>.jpg`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::name::{export_name, frame_file_name};
use crate::timelapse::TimeLapse;

/// Configuration for [`export_jpegs`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Evenly thin the sequence down to this many frames.  `None` keeps all.
    pub frame_count: Option<usize>,
}

/// Pick `count` frames spread evenly over `frames`, always ending on the
/// final frame.  Returns every frame when `count` covers them all.
pub fn select_frame_subset<T>(frames: &[T], count: usize) -> Vec<&T> {
    let total = frames.len();
    if count >= total {
        return frames.iter().collect();
    }
    (0..count)
        .map(|i| {
            if i == count - 1 {
                &frames[total - 1]
            } else {
                &frames[i * total / count]
            }
        })
        .collect()
}

/// Write the (optionally thinned) frames of `timelapse` into `dest`,
/// creating it if necessary.  Returns the written paths in frame order.
pub fn export_jpegs<P: AsRef<Path>>(
    timelapse: &TimeLapse,
    dest:      P,
    opts:      &ExportOptions,
) -> io::Result<Vec<PathBuf>> {
    let dest = dest.as_ref();
    if !dest.exists() { fs::create_dir_all(dest)?; }

    let frames = match opts.frame_count {
        Some(n) => select_frame_subset(&timelapse.frames, n),
        None    => timelapse.frames.iter().collect(),
    };
    let base = export_name(&timelapse.raw_name);

    let mut written = Vec::with_capacity(frames.len());
    for (i, jpeg) in frames.into_iter().enumerate() {
        let path = dest.join(frame_file_name(&base, i));
        fs::write(&path, jpeg)?;
        written.push(path);
    }
    tracing::info!(dest = %dest.display(), frames = written.len(), "exported JPEG sequence");
    Ok(written)
}
