/// Line terminator recorded for every line of a config document.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, Default)]
pub enum LineEnding {
    /// CarriageReturn followed by LineFeed.
    Crlf,

    /// U+000A -- LineFeed
    #[default]
    Lf,

    /// U+000D -- CarriageReturn
    Cr,
}

impl LineEnding {
    #[inline]
    pub const fn byte_len(&self) -> usize {
        match self {
            Self::Crlf => 2,
            _ => 1,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
            Self::Cr => "\r",
        }
    }

    /// Detect the terminator starting at `bytes[0]`, if any.
    #[inline]
    pub fn detect(bytes: &[u8]) -> Option<LineEnding> {
        match bytes {
            [b'\r', b'\n', ..] => Some(LineEnding::Crlf),
            [b'\r', ..] => Some(LineEnding::Cr),
            [b'\n', ..] => Some(LineEnding::Lf),
            _ => None,
        }
    }
}

/// Tally of terminators seen in a document, used to pick one style for
/// normalisation and for newly appended lines.
#[derive(Debug, Default, Clone)]
pub struct LineEndingStats {
    counts: [usize; 3],
    first: Option<LineEnding>,
}

impl LineEndingStats {
    pub fn record(&mut self, ending: LineEnding) {
        self.counts[Self::slot(ending)] += 1;
        if self.first.is_none() {
            self.first = Some(ending);
        }
    }

    /// Number of distinct styles seen.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Most frequent style; ties go to the style seen first.
    pub fn dominant(&self) -> Option<LineEnding> {
        let first = self.first?;
        let mut best = first;
        for ending in [LineEnding::Crlf, LineEnding::Lf, LineEnding::Cr] {
            if self.counts[Self::slot(ending)] > self.counts[Self::slot(best)] {
                best = ending;
            }
        }
        Some(best)
    }

    fn slot(ending: LineEnding) -> usize {
        match ending {
            LineEnding::Crlf => 0,
            LineEnding::Lf => 1,
            LineEnding::Cr => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_crlf_over_cr() {
        assert_eq!(LineEnding::detect(b"\r\nx"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::detect(b"\rx"), Some(LineEnding::Cr));
        assert_eq!(LineEnding::detect(b"\n"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::detect(b"x\n"), None);
        assert_eq!(LineEnding::detect(b""), None);
    }

    #[test]
    fn dominant_is_most_frequent() {
        let mut stats = LineEndingStats::default();
        stats.record(LineEnding::Lf);
        stats.record(LineEnding::Crlf);
        stats.record(LineEnding::Crlf);
        assert_eq!(stats.distinct(), 2);
        assert_eq!(stats.dominant(), Some(LineEnding::Crlf));
    }

    #[test]
    fn dominant_tie_goes_to_first_seen() {
        let mut stats = LineEndingStats::default();
        stats.record(LineEnding::Cr);
        stats.record(LineEnding::Lf);
        assert_eq!(stats.dominant(), Some(LineEnding::Cr));
    }

    #[test]
    fn empty_stats_have_no_dominant() {
        let stats = LineEndingStats::default();
        assert_eq!(stats.distinct(), 0);
        assert_eq!(stats.dominant(), None);
    }
}
