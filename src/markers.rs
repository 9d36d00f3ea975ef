//! Marker regions: the only part of a target document the engine rewrites.
//!
//! A region is delimited by two literal comment lines. Splicing replaces the
//! text strictly between them and keeps the markers and everything outside
//! them byte-for-byte.

/// A start/end sentinel pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPair {
    pub start: &'static str,
    pub end: &'static str,
}

/// Active work index in the protocol `README.md`.
pub const ACTIVE_WORK_INDEX: MarkerPair = MarkerPair {
    start: "<!-- ACTIVE_WORK_INDEX_START -->",
    end: "<!-- ACTIVE_WORK_INDEX_END -->",
};

/// Per-item build file index in `build.md`.
pub const BUILD_FILE_INDEX: MarkerPair = MarkerPair {
    start: "<!-- BUILD_FILE_INDEX_START -->",
    end: "<!-- BUILD_FILE_INDEX_END -->",
};

/// Why a splice could not be performed. The input text is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    MissingStart(&'static str),
    MissingEnd(&'static str),
    /// The first end marker occurs before the first start marker.
    OutOfOrder,
}

impl std::fmt::Display for SpliceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpliceError::MissingStart(marker) => write!(f, "start marker {} not found", marker),
            SpliceError::MissingEnd(marker) => write!(f, "end marker {} not found", marker),
            SpliceError::OutOfOrder => write!(f, "end marker precedes start marker"),
        }
    }
}

impl std::error::Error for SpliceError {}

impl MarkerPair {
    /// Whether both markers occur, in order.
    pub fn is_present_in(&self, text: &str) -> bool {
        self.locate(text).is_ok()
    }

    fn locate(&self, text: &str) -> Result<(usize, usize), SpliceError> {
        let start = text
            .find(self.start)
            .ok_or(SpliceError::MissingStart(self.start))?;
        let end = text
            .find(self.end)
            .ok_or(SpliceError::MissingEnd(self.end))?;
        if end < start {
            return Err(SpliceError::OutOfOrder);
        }
        Ok((start, end))
    }

    /// Return `text` with the region between the markers replaced by
    /// `"\n" + block + "\n"`.
    pub fn splice(&self, text: &str, block: &str) -> Result<String, SpliceError> {
        let (start, end) = self.locate(text)?;
        let head = &text[..start + self.start.len()];
        let tail = &text[end..];

        let mut out = String::with_capacity(head.len() + block.len() + tail.len() + 2);
        out.push_str(head);
        out.push('\n');
        out.push_str(block);
        out.push('\n');
        out.push_str(tail);
        Ok(out)
    }

    /// Current content strictly between the markers, if both are present.
    pub fn region<'a>(&self, text: &'a str) -> Option<&'a str> {
        let (start, end) = self.locate(text).ok()?;
        text.get(start + self.start.len()..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: MarkerPair = ACTIVE_WORK_INDEX;

    #[test]
    fn splice_replaces_only_the_region() {
        let text = "# Readme\n\n<!-- ACTIVE_WORK_INDEX_START -->\nold table\n<!-- ACTIVE_WORK_INDEX_END -->\n\nfooter\n";
        let out = PAIR.splice(text, "| Path | Description |").unwrap();
        assert_eq!(
            out,
            "# Readme\n\n<!-- ACTIVE_WORK_INDEX_START -->\n| Path | Description |\n<!-- ACTIVE_WORK_INDEX_END -->\n\nfooter\n"
        );
        assert_eq!(PAIR.region(&out), Some("\n| Path | Description |\n"));
    }

    #[test]
    fn splice_is_idempotent() {
        let text = "a <!-- ACTIVE_WORK_INDEX_START --><!-- ACTIVE_WORK_INDEX_END --> b";
        let once = PAIR.splice(text, "x").unwrap();
        let twice = PAIR.splice(&once, "x").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn splice_fails_without_markers() {
        let text = "no markers here\n<!-- ACTIVE_WORK_INDEX_END -->\n";
        assert_eq!(
            PAIR.splice(text, "x"),
            Err(SpliceError::MissingStart(PAIR.start))
        );
        let text = "<!-- ACTIVE_WORK_INDEX_START -->\n";
        assert_eq!(PAIR.splice(text, "x"), Err(SpliceError::MissingEnd(PAIR.end)));
        assert!(!PAIR.is_present_in(text));
    }

    #[test]
    fn splice_fails_when_out_of_order() {
        let text = "<!-- ACTIVE_WORK_INDEX_END -->\n<!-- ACTIVE_WORK_INDEX_START -->\n";
        assert_eq!(PAIR.splice(text, "x"), Err(SpliceError::OutOfOrder));
        assert_eq!(PAIR.region(text), None);
    }

    #[test]
    fn pairs_do_not_cross_match() {
        let text = "<!-- BUILD_FILE_INDEX_START -->\n<!-- BUILD_FILE_INDEX_END -->\n";
        assert!(BUILD_FILE_INDEX.is_present_in(text));
        assert!(!ACTIVE_WORK_INDEX.is_present_in(text));
    }
}
