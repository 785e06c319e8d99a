//! Result ordering.

use crate::discovery::CanonicalLiveStream;
use std::cmp::Ordering;

/// Whether `text` contains a Hangul syllable or jamo.
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{AC00}'..='\u{D7A3}' // syllables
            | '\u{1100}'..='\u{11FF}' // jamo
            | '\u{3130}'..='\u{318F}') // compatibility jamo
    })
}

fn has_local_script(stream: &CanonicalLiveStream) -> bool {
    contains_hangul(&stream.title) || contains_hangul(&stream.channel_title)
}

/// Ordering of two streams; `Less` means `a` ranks higher.
///
/// Criteria, in order: primary category is `default_category`, Hangul in the
/// title or channel title, higher viewer count (missing counts as 0).
pub fn compare(a: &CanonicalLiveStream, b: &CanonicalLiveStream, default_category: &str) -> Ordering {
    let in_default = |s: &CanonicalLiveStream| s.primary_category_id.as_deref() == Some(default_category);

    in_default(b)
        .cmp(&in_default(a))
        .then_with(|| has_local_script(b).cmp(&has_local_script(a)))
        .then_with(|| b.viewer_count.unwrap_or(0).cmp(&a.viewer_count.unwrap_or(0)))
}

/// Sort `streams` best first. Ties keep their input order.
pub fn rank(mut streams: Vec<CanonicalLiveStream>, default_category: &str) -> Vec<CanonicalLiveStream> {
    streams.sort_by(|a, b| compare(a, b, default_category));
    streams
}
