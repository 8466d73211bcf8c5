//! Lyrics generator
//!
//! Song layout is fixed: title, verse, chorus, verse, chorus, bridge,
//! chorus. The chorus is written once and repeated verbatim. Lines come from
//! templates filled with words from the mood's theme and verb lists; within
//! one template every `{theme}` gets the same word, and so does every
//! `{verb}`.

use museai_common::{Customization, Mood};
use rand::Rng;

use crate::pick;

pub const VERSE_1: &str = "[Verse 1]";
pub const VERSE_2: &str = "[Verse 2]";
pub const CHORUS: &str = "[Chorus]";
pub const BRIDGE: &str = "[Bridge]";

const VERSE_LINES: usize = 4;
const BRIDGE_LINES: usize = 2;

const LINE_TEMPLATES: &[&str] = &[
    "In the {theme}, I {verb}",
    "When the {theme} calls, we {verb}",
    "Through the {theme}, I'll {verb}",
    "Let the {theme} {verb} tonight",
    "We {verb} like {theme}",
    "Can you feel the {theme}? We {verb}",
    "Every {theme} makes me {verb}",
    "{theme} and {theme}, we {verb}",
];

const CHORUS_TEMPLATES: &[&str] = &[
    "Oh, {theme}, {theme}\nWe {verb} and {verb}\n{theme} forever\nTogether we {verb}",
    "{theme} in my heart\n{verb}ing from the start\nNever apart\nWe {verb} and {verb}",
    "Can't stop the {theme}\nWe {verb} all night\n{theme} feels so right\nWe {verb} into the light",
];

const TITLE_NOUNS: &[&str] = &["Dreams", "Nights", "Days", "Hearts", "Souls"];

/// Theme words for a mood
pub fn themes(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &["sunshine", "dancing", "love", "summer", "freedom", "joy", "laughter"],
        Mood::Sad => &["rain", "tears", "goodbye", "alone", "memories", "lost", "broken"],
        Mood::Energetic => &["fire", "running", "alive", "power", "thunder", "wild", "unstoppable"],
        Mood::Calm => &["peace", "silence", "stars", "ocean", "dream", "gentle", "whisper"],
        Mood::Romantic => &["heart", "forever", "together", "kiss", "soul", "destiny", "passion"],
        Mood::Dark => &["shadow", "night", "storm", "chaos", "abyss", "fear", "darkness"],
        Mood::Uplifting => &["rise", "hope", "believe", "dream", "courage", "light", "wings"],
    }
}

/// Verbs for a mood
pub fn verbs(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &["dance", "shine", "smile", "celebrate", "fly", "sing", "laugh"],
        Mood::Sad => &["cry", "fall", "fade", "break", "miss", "lose", "wander"],
        Mood::Energetic => &["run", "jump", "shout", "fight", "burn", "explode", "race"],
        Mood::Calm => &["breathe", "float", "drift", "rest", "sleep", "glide", "flow"],
        Mood::Romantic => &["love", "hold", "kiss", "embrace", "cherish", "adore", "yearn"],
        Mood::Dark => &["crawl", "hide", "haunt", "consume", "fall", "sink", "spiral"],
        Mood::Uplifting => &["rise", "soar", "climb", "reach", "grow", "shine", "overcome"],
    }
}

struct WordBank {
    themes: &'static [&'static str],
    verbs: &'static [&'static str],
}

impl WordBank {
    fn fill<R: Rng + ?Sized>(&self, template: &str, rng: &mut R) -> String {
        let theme = pick(rng, self.themes);
        let verb = pick(rng, self.verbs);
        template.replace("{theme}", theme).replace("{verb}", verb)
    }

    fn lines<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        (0..count)
            .map(|_| {
                let template = pick(rng, LINE_TEMPLATES);
                self.fill(template, rng)
            })
            .collect()
    }
}

/// Generate lyrics for the customization's mood
pub fn generate<R: Rng + ?Sized>(customization: &Customization, rng: &mut R) -> String {
    let bank = WordBank {
        themes: themes(customization.mood),
        verbs: verbs(customization.mood),
    };

    let title = format!(
        "{} {}",
        capitalize(pick::<&str, R>(rng, bank.themes)),
        pick(rng, TITLE_NOUNS)
    );

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("=== {} ===\n", title));

    parts.push(VERSE_1.to_string());
    parts.extend(bank.lines(VERSE_LINES, rng));
    parts.push(String::new());

    let chorus_template = pick(rng, CHORUS_TEMPLATES);
    let chorus = bank.fill(chorus_template, rng);
    parts.push(CHORUS.to_string());
    parts.push(chorus.clone());
    parts.push(String::new());

    parts.push(VERSE_2.to_string());
    parts.extend(bank.lines(VERSE_LINES, rng));
    parts.push(String::new());

    parts.push(CHORUS.to_string());
    parts.push(chorus.clone());
    parts.push(String::new());

    parts.push(BRIDGE.to_string());
    parts.extend(bank.lines(BRIDGE_LINES, rng));
    parts.push(String::new());

    parts.push(CHORUS.to_string());
    parts.push(chorus);

    parts.join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(mood: Mood, seed: u64) -> String {
        let custom = Customization::default().with_mood(mood);
        generate(&custom, &mut StdRng::seed_from_u64(seed))
    }

    fn section_body<'a>(lyrics: &'a str, header: &str, occurrence: usize) -> Vec<&'a str> {
        let lines: Vec<&str> = lyrics.lines().collect();
        let start = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == header)
            .nth(occurrence)
            .map(|(i, _)| i + 1)
            .expect("section present");
        lines[start..]
            .iter()
            .take_while(|l| !l.is_empty())
            .copied()
            .collect()
    }

    #[test]
    fn test_sections_in_order() {
        let lyrics = sample(Mood::Happy, 3);
        let v1 = lyrics.find(VERSE_1).unwrap();
        let c1 = lyrics.find(CHORUS).unwrap();
        let v2 = lyrics.find(VERSE_2).unwrap();
        let bridge = lyrics.find(BRIDGE).unwrap();
        assert!(v1 < c1 && c1 < v2 && v2 < bridge);
        assert_eq!(lyrics.matches(CHORUS).count(), 3);
    }

    #[test]
    fn test_title_line() {
        let lyrics = sample(Mood::Sad, 11);
        let first = lyrics.lines().next().unwrap();
        assert!(first.starts_with("=== ") && first.ends_with(" ==="));
        let title = &first[4..first.len() - 4];
        let mut words = title.split(' ');
        let theme = words.next().unwrap();
        assert!(themes(Mood::Sad)
            .iter()
            .any(|t| capitalize(t) == theme));
        assert!(TITLE_NOUNS.contains(&words.next().unwrap()));
        // blank line between title and first verse
        assert_eq!(lyrics.lines().nth(1), Some(""));
    }

    #[test]
    fn test_section_lengths() {
        let lyrics = sample(Mood::Energetic, 5);
        assert_eq!(section_body(&lyrics, VERSE_1, 0).len(), 4);
        assert_eq!(section_body(&lyrics, VERSE_2, 0).len(), 4);
        assert_eq!(section_body(&lyrics, BRIDGE, 0).len(), 2);
    }

    #[test]
    fn test_chorus_repeats_verbatim() {
        for seed in 0..20 {
            let lyrics = sample(Mood::Romantic, seed);
            let first = section_body(&lyrics, CHORUS, 0);
            assert_eq!(first.len(), 4);
            assert_eq!(first, section_body(&lyrics, CHORUS, 1));
            assert_eq!(first, section_body(&lyrics, CHORUS, 2));
        }
    }

    #[test]
    fn test_uses_mood_vocabulary() {
        let lyrics = sample(Mood::Dark, 9);
        let verse = section_body(&lyrics, VERSE_1, 0);
        for line in verse {
            assert!(
                verbs(Mood::Dark).iter().any(|v| line.contains(v)),
                "no dark verb in {:?}",
                line
            );
            assert!(!line.contains("{theme}") && !line.contains("{verb}"));
        }
    }

    #[test]
    fn test_placeholders_share_one_word() {
        let bank = WordBank {
            themes: themes(Mood::Calm),
            verbs: verbs(Mood::Calm),
        };
        let mut rng = StdRng::seed_from_u64(2);
        let line = bank.fill("{theme} and {theme}, we {verb}", &mut rng);
        let (left, rest) = line.split_once(" and ").unwrap();
        let (right, _) = rest.split_once(", we ").unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("sunshine"), "Sunshine");
        assert_eq!(capitalize(""), "");
    }
}
