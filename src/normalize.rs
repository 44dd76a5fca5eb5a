// WHY: PDF/Word extraction injects zero-width code points, soft wraps, and
// "&"/"&amp;" spelling variants that defeat exact automaton matching.
// Normalization builds a cleaned view plus a per-byte map back to source
// offsets, so fallback matches land on exact original spans.

/// Zero-width and soft-hyphen code points stripped during normalization
const ZERO_WIDTH: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}', '\u{00AD}'];

pub fn is_zero_width(ch: char) -> bool {
    ZERO_WIDTH.contains(&ch)
}

/// A transformed copy of a source text where every byte of the transformed
/// view knows the source byte range it came from.
#[derive(Debug, Clone)]
pub struct MappedText {
    pub text: String,
    spans: Vec<(usize, usize)>,
}

impl MappedText {
    /// Map a half-open byte range of the transformed view back to a source
    /// byte range. Returns `None` for empty or out-of-bounds ranges.
    pub fn original_span(&self, beg: usize, end: usize) -> Option<(usize, usize)> {
        if beg >= end || end > self.spans.len() {
            return None;
        }
        Some((self.spans[beg].0, self.spans[end - 1].1))
    }

    fn push_mapped(&mut self, ch: char, span: (usize, usize)) {
        let before = self.text.len();
        self.text.push(ch);
        for _ in before..self.text.len() {
            self.spans.push(span);
        }
    }

    /// Push a space, collapsing runs: a space directly after another space is
    /// dropped so whitespace runs map to the first source position only.
    fn push_space(&mut self, span: (usize, usize)) {
        if !self.text.ends_with(' ') {
            self.push_mapped(' ', span);
        }
    }
}

/// Lowercase a text while tracking source offsets.
///
/// Lowercasing is done per character because a handful of code points expand
/// or change byte length under case folding; automaton match offsets must
/// still resolve to exact source spans.
pub fn fold_case(text: &str) -> MappedText {
    let mut mapped = MappedText {
        text: String::with_capacity(text.len()),
        spans: Vec::with_capacity(text.len()),
    };
    for (idx, ch) in text.char_indices() {
        let span = (idx, idx + ch.len_utf8());
        for folded in ch.to_lowercase() {
            mapped.push_mapped(folded, span);
        }
    }
    mapped
}

/// Build the normalized view used by the fallback matcher.
///
/// One pass applying, in order per character: zero-width/soft-hyphen removal,
/// `&`/`&amp;` to ` en ` expansion, whitespace-run collapse, lowercasing.
pub fn normalize(text: &str) -> MappedText {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut mapped = MappedText {
        text: String::with_capacity(text.len()),
        spans: Vec::with_capacity(text.len()),
    };

    let mut i = 0;
    while i < chars.len() {
        let (idx, ch) = chars[i];
        let char_end = idx + ch.len_utf8();

        if is_zero_width(ch) {
            i += 1;
            continue;
        }

        if ch == '&' {
            // "&amp;" left behind by HTML-ish exports collapses to the same token
            let entity_ref = chars[i + 1..]
                .iter()
                .take(4)
                .map(|(_, c)| *c)
                .collect::<String>();
            let (consumed, end) = if entity_ref.eq_ignore_ascii_case("amp;") {
                (5, chars[i + 4].0 + 1)
            } else {
                (1, char_end)
            };
            let span = (idx, end);
            mapped.push_space(span);
            mapped.push_mapped('e', span);
            mapped.push_mapped('n', span);
            mapped.push_space(span);
            i += consumed;
            continue;
        }

        if ch.is_whitespace() {
            mapped.push_space((idx, char_end));
            i += 1;
            continue;
        }

        let span = (idx, char_end);
        for folded in ch.to_lowercase() {
            mapped.push_mapped(folded, span);
        }
        i += 1;
    }

    mapped
}

/// Normalized form of an entity literal, trimmed for substring search
pub fn normalize_entity(text: &str) -> String {
    normalize(text).text.trim().to_string()
}
