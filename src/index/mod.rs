//! Playback order for in-progress saves.
//!
//! An in-progress save is a folder of `<label>_<n>.sav` files, one per
//! captured frame.  Order is given by `n` compared numerically, so
//! `_2` < `_10`.  Files whose trailing token is not a number are not frames
//! and are left out of the index.

/// One frame file placed in playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameIndexRecord {
    /// Numeric suffix parsed from the file name.
    pub number:   i64,
    /// Position of the file in the caller's input list.
    pub position: usize,
    pub name:     String,
}

#[derive(Debug, Clone, Default)]
pub struct FrameIndex {
    /// Ascending by `number`; ties keep input order.
    pub records: Vec<FrameIndexRecord>,
    /// Names that carried no numeric suffix.
    pub skipped: Vec<String>,
}

impl FrameIndex {
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut idx = FrameIndex::default();
        for (position, name) in names.into_iter().enumerate() {
            match frame_number(name) {
                Some(number) => idx.records.push(FrameIndexRecord {
                    number,
                    position,
                    name: name.to_owned(),
                }),
                None => idx.skipped.push(name.to_owned()),
            }
        }
        idx.records.sort_by_key(|r| r.number);
        idx
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Input positions in playback order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.position)
    }
}

/// Strip any directory part and a case-insensitive `.sav` extension.
pub fn base_name(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file.len().checked_sub(4) {
        Some(cut) if file.is_char_boundary(cut) && file[cut..].eq_ignore_ascii_case(".sav") => &file[..cut],
        _ => file,
    }
}

/// Numeric suffix of a frame file name: the last `_`-separated token of the
/// base name, read as a decimal integer.
///
/// Reading is lenient in the same way as a leading-prefix parse: surrounding
/// whitespace and an optional sign are accepted, and trailing non-digits
/// after at least one digit are ignored (`"7b"` reads as 7).  A token with
/// no leading digits yields `None`.  Digit runs too long for `i64` saturate,
/// so such a file still sorts after every representable frame number.
pub fn frame_number(name: &str) -> Option<i64> {
    let token = base_name(name).rsplit('_').next()?.trim_start();
    let (negative, digits) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _    => (false, token),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Only overflow can fail here: `digits[..end]` is all ASCII digits.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
