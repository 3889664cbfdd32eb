/// Deterministic text canonicalization, applied to every
/// user query and to every fragment at insertion time:
///
/// 1. lowercase (Unicode simple case-fold via `str::to_lowercase`);
/// 2. delete apostrophes outright — they are elided, not replaced with a
///    space (`"a'f"` becomes `"af"`, not `"a f"`);
/// 3. replace every remaining character outside `[0-9a-zA-Z]` with a space;
/// 4. collapse runs of whitespace to one space;
/// 5. strip leading/trailing spaces.
///
/// Steps 2–5 run in a single pass; the leading-space case is handled by
/// starting the "last char was a space" flag as `true`, and the trailing
/// case by popping a dangling space off the end once the pass completes.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_space = true;

    for ch in lowered.chars() {
        if ch == '\'' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}
