//! Comment filtering for raw stylesheet text.
//!
//! The filter removes every `/* ... */` span and keeps the inner text of the
//! first comment aside as the stylesheet banner (typically a license header),
//! so it can be written back on top of the purged output.

/// Stylesheet text with its comments removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredCss {
    /// The stylesheet without any comment span
    pub clean: String,

    /// Trimmed inner text of the first comment, empty when there was none
    pub banner: String,
}

/// State of the comment scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Copying stylesheet text
    Normal,
    /// The last copied character was a `/` that may open a comment
    SawSlash,
    /// Inside a comment
    InComment,
    /// Inside a comment, right after a `*`
    MaybeEnd,
}

/// Remove all comments from `css`, capturing the first one as the banner.
///
/// Unterminated comments run to the end of the input and are dropped, banner
/// included. A `/` or `*` that does not form a comment delimiter is kept.
pub fn filter_comments(css: &str) -> FilteredCss {
    let mut clean = String::with_capacity(css.len());
    let mut banner = String::new();
    let mut state = ScanState::Normal;
    let mut first_closed = false;
    let mut capturing = false;

    for c in css.chars() {
        state = match (state, c) {
            (ScanState::Normal, '/') | (ScanState::SawSlash, '/') => {
                clean.push(c);
                ScanState::SawSlash
            }
            (ScanState::SawSlash, '*') => {
                // Retract the opening slash
                clean.pop();
                capturing = !first_closed;
                ScanState::InComment
            }
            (ScanState::Normal, _) | (ScanState::SawSlash, _) => {
                clean.push(c);
                ScanState::Normal
            }
            (ScanState::InComment, '*') => ScanState::MaybeEnd,
            (ScanState::InComment, _) => {
                if capturing {
                    banner.push(c);
                }
                ScanState::InComment
            }
            (ScanState::MaybeEnd, '/') => {
                first_closed = true;
                capturing = false;
                // A slash left in front of the comment may still open another one
                if clean.ends_with('/') {
                    ScanState::SawSlash
                } else {
                    ScanState::Normal
                }
            }
            (ScanState::MaybeEnd, '*') => {
                if capturing {
                    banner.push('*');
                }
                ScanState::MaybeEnd
            }
            (ScanState::MaybeEnd, _) => {
                if capturing {
                    banner.push('*');
                    banner.push(c);
                }
                ScanState::InComment
            }
        };
    }

    if matches!(state, ScanState::InComment | ScanState::MaybeEnd) && capturing {
        banner.clear();
    }

    FilteredCss {
        clean,
        banner: banner.trim().to_string(),
    }
}

/// Remove all comments from `css`, discarding the banner
pub fn strip_comments(css: &str) -> String {
    filter_comments(css).clean
}
