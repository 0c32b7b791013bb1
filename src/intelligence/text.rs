//! Small text helpers shared by the enrichment passes.

/// Title-case a string: an alphabetic char is uppercased when the previous
/// char is non-alphabetic, lowercased otherwise.
///
/// "next friday" → "Next Friday", "ASAP" → "Asap".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}
