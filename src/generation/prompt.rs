// src/generation/prompt.rs
//! Tone catalog and prompt rendering. Pure functions, no I/O.

/// Tone keys shown in the selector, each mapping to the Georgian descriptor
/// substituted into the prompt. Order is the display order.
pub const TONES: &[(&str, &str)] = &[
    ("პროფესიონალური", "პროფესიონალური"),
    ("მეგობრული", "მეგობრული"),
    ("სასწრაფო", "სასწრაფო და დამარწმუნებელი"),
    ("ელეგანტური", "მაღალი კლასის და ელეგანტური"),
    ("ყოველდღიური/უბრალო", "უბრალო, ყოველდღიური"),
];

pub fn default_tone_key() -> &'static str {
    TONES[0].0
}

/// Looks up the descriptor for a tone key. Unknown keys fall back to the key
/// text itself; tone selection must never fail a generation run.
pub fn tone_descriptor(tone_key: &str) -> &str {
    TONES
        .iter()
        .find(|(key, _)| *key == tone_key)
        .map(|(_, descriptor)| *descriptor)
        .unwrap_or(tone_key)
}

/// Renders the user message sent to the generation service. Deterministic:
/// the same inputs always produce the same prompt.
pub fn build_prompt(name: &str, description: &str, tone_key: &str) -> String {
    let tone = tone_descriptor(tone_key);
    format!(
        "დაწერე {tone} სარეკლამო ტექსტი შემდეგი პროდუქტისთვის.\n\n\
         პროდუქტის სახელი: {name}\n\
         პროდუქტის აღწერა: {description}\n\n\
         რეკლამა უნდა იყოს ქართულ ენაზე, მოკლე, გამორჩეული და დამაჯერებელი. \
         დააბრუნე მხოლოდ სარეკლამო ტექსტი, ყოველგვარი განმარტების გარეშე."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tone_resolves_to_descriptor() {
        assert_eq!(tone_descriptor("სასწრაფო"), "სასწრაფო და დამარწმუნებელი");
    }

    #[test]
    fn unknown_tone_falls_back_to_key_text() {
        assert_eq!(tone_descriptor("sarcastic"), "sarcastic");
    }

    #[test]
    fn prompt_contains_all_fields() {
        let prompt = build_prompt("საპონი", "ხელნაკეთი საპონი ლავანდით", "ელეგანტური");
        assert!(prompt.contains("საპონი"));
        assert!(prompt.contains("ხელნაკეთი საპონი ლავანდით"));
        assert!(prompt.contains("მაღალი კლასის და ელეგანტური"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt("A", "B", "მეგობრული");
        let b = build_prompt("A", "B", "მეგობრული");
        assert_eq!(a, b);
    }
}
