//! Single-range `bytes=` handling (RFC 7233).
//!
//! Ranges are resolved against the file size at evaluation time, so the
//! serving code only ever sees concrete inclusive offsets.

/// Inclusive byte range, already clamped to the file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes covered (a resolved range is never empty)
    pub const fn byte_count(self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of evaluating a Range header against a file
#[derive(Debug, Clone, Copy)]
pub enum RangeOutcome {
    /// Serve the whole file: no Range header, or one this server ignores
    Full,
    /// Serve the given slice with 206
    Partial(ByteRange),
    /// Nothing in the requested range exists; answer 416
    Unsatisfiable,
}

/// Evaluate a Range header against a file of `size` bytes
///
/// Single `bytes=` ranges only. Multi-range requests and malformed
/// specs degrade to the full body rather than an error, which is what
/// browsers expect from a server that ignores Range.
///
/// # Examples
/// ```
/// use dupgate::http::range::{evaluate_range, RangeOutcome};
///
/// assert!(matches!(
///     evaluate_range(Some("bytes=0-99"), 1000),
///     RangeOutcome::Partial(_)
/// ));
/// assert!(matches!(evaluate_range(None, 1000), RangeOutcome::Full));
/// assert!(matches!(
///     evaluate_range(Some("bytes=5000-"), 1000),
///     RangeOutcome::Unsatisfiable
/// ));
/// ```
pub fn evaluate_range(header: Option<&str>, size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    // No multipart/byteranges support
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((from, to)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    resolve(from.trim(), to.trim(), size).unwrap_or(RangeOutcome::Full)
}

/// Resolve one `from-to` spec; `None` means malformed (serve full body)
fn resolve(from: &str, to: &str, size: usize) -> Option<RangeOutcome> {
    // Suffix form "-N": the final N bytes
    if from.is_empty() {
        let suffix = to.parse::<usize>().ok()?;
        if suffix == 0 || size == 0 {
            return Some(RangeOutcome::Unsatisfiable);
        }
        return Some(RangeOutcome::Partial(ByteRange {
            start: size.saturating_sub(suffix),
            end: size - 1,
        }));
    }

    let start = from.parse::<usize>().ok()?;
    if start >= size {
        return Some(RangeOutcome::Unsatisfiable);
    }
    let end = if to.is_empty() {
        size - 1
    } else {
        to.parse::<usize>().ok()?.min(size - 1)
    };
    if start > end {
        return Some(RangeOutcome::Unsatisfiable);
    }
    Some(RangeOutcome::Partial(ByteRange { start, end }))
}
