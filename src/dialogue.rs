//! Multi-speaker comedic dialogues.
//!
//! [`generate_dialogue`] asks the language model when one is configured and
//! falls back to [`generate_fallback_dialogue`] otherwise, or on any failure.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm::TextModel;
use crate::random::RandomSource;
use crate::rules::{KeywordRule, first_match};

/// Fewest characters a dialogue can have.
pub const MIN_CHARACTERS: u8 = 2;
/// Most characters a dialogue can have.
pub const MAX_CHARACTERS: u8 = 4;

/// Speaker labels only run from `Person A` to `Person C`.
pub const MAX_SPEAKER_LABELS: u8 = 3;

/// Comedy style. Unrecognized names fall back to [`DialogueStyle::Funny`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueStyle {
    /// Classic humor and jokes
    #[default]
    Funny,
    /// Witty and sassy responses
    Sarcastic,
    /// Sweet and heartwarming
    Wholesome,
    /// Over-the-top reactions
    Dramatic,
    /// Everyday struggles
    Relatable,
    /// Pure unhinged energy
    Chaotic,
}

impl DialogueStyle {
    /// Every style, in the order the UI offers them.
    pub const ALL: [DialogueStyle; 6] = [
        Self::Funny,
        Self::Sarcastic,
        Self::Wholesome,
        Self::Dramatic,
        Self::Relatable,
        Self::Chaotic,
    ];

    /// Parses a style name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// The wire name, eg `sarcastic`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Funny => "funny",
            Self::Sarcastic => "sarcastic",
            Self::Wholesome => "wholesome",
            Self::Dramatic => "dramatic",
            Self::Relatable => "relatable",
            Self::Chaotic => "chaotic",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Funny => {
                "Create a HILARIOUS dialogue with perfect comedic timing, unexpected punchlines, and absurd reactions. Use internet slang, memes, and modern references."
            }
            Self::Sarcastic => {
                "Make it devastatingly sarcastic with cutting wit, eye-rolling moments, and savage comebacks that would make Gordon Ramsay proud."
            }
            Self::Wholesome => {
                "Create heartwarming dialogue that's still funny but makes you go 'aww' - like a golden retriever telling jokes."
            }
            Self::Dramatic => {
                "Go FULL Shakespeare meets reality TV drama - over-the-top reactions, dramatic declarations, and theatrical breakdowns."
            }
            Self::Relatable => {
                "Make it so relatable it hurts - the kind of dialogue that makes people go 'I FELT THAT' and screenshot it immediately."
            }
            Self::Chaotic => {
                "Pure unhinged energy - nonsensical escalations, non sequiturs, and characters who completely lose the plot mid-sentence."
            }
        }
    }
}

/// How hard the jokes lean. Unrecognized names fall back to
/// [`Tone::Exaggerated`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Light and gentle humor
    Subtle,
    /// Balanced comedy level
    Moderate,
    /// Maximum chaos mode
    #[default]
    Exaggerated,
}

impl Tone {
    /// Every tone, gentlest first.
    pub const ALL: [Tone; 3] = [Self::Subtle, Self::Moderate, Self::Exaggerated];

    /// Parses a tone name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// The wire name, eg `subtle`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subtle => "subtle",
            Self::Moderate => "moderate",
            Self::Exaggerated => "exaggerated",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Subtle => "Keep the humor clever and understated - like a British comedy",
            Self::Moderate => "Balance the humor - funny but not completely unhinged",
            Self::Exaggerated => {
                "GO ABSOLUTELY WILD - maximum chaos, dramatic reactions, and complete over-the-top responses that break reality"
            }
        }
    }
}

/// Settings as the browser sends them: any field may be missing or the wrong
/// type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDialogueSettings {
    /// Style name
    #[serde(default)]
    pub style: Option<Value>,
    /// Tone name
    #[serde(default)]
    pub tone: Option<Value>,
    /// Number of characters. The browser UI calls this `characters`.
    #[serde(default, alias = "characters")]
    pub character_count: Option<Value>,
    /// Whether to ask for emojis
    #[serde(default)]
    pub use_emojis: Option<Value>,
}

/// Validated per-request dialogue settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueSettings {
    /// Comedy style
    pub style: DialogueStyle,
    /// Comedy intensity
    pub tone: Tone,
    /// Between [`MIN_CHARACTERS`] and [`MAX_CHARACTERS`]
    pub character_count: u8,
    /// Whether to ask for emojis
    pub use_emojis: bool,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            style: DialogueStyle::Funny,
            tone: Tone::Exaggerated,
            character_count: MIN_CHARACTERS,
            use_emojis: true,
        }
    }
}

impl DialogueSettings {
    /// Builds settings, replacing anything out of range with its default.
    /// A character count outside 2..=4 becomes 2.
    pub fn new(style: &str, tone: &str, character_count: i64, use_emojis: bool) -> Self {
        let character_count = u8::try_from(character_count)
            .ok()
            .filter(|count| (MIN_CHARACTERS..=MAX_CHARACTERS).contains(count))
            .unwrap_or(MIN_CHARACTERS);
        Self {
            style: DialogueStyle::parse(style),
            tone: Tone::parse(tone),
            character_count,
            use_emojis,
        }
    }

    /// Speaker labels for this many characters: `Person A`, `Person B`, ...,
    /// never more than [`MAX_SPEAKER_LABELS`].
    pub fn speaker_labels(&self) -> Vec<String> {
        (b'A'..)
            .take(usize::from(self.character_count.min(MAX_SPEAKER_LABELS)))
            .map(|letter| format!("Person {}", char::from(letter)))
            .collect()
    }
}

impl From<RawDialogueSettings> for DialogueSettings {
    fn from(raw: RawDialogueSettings) -> Self {
        let text = |value: Option<Value>| match value {
            Some(Value::String(text)) => text,
            _ => String::new(),
        };
        let character_count = raw
            .character_count
            .and_then(|value| {
                value.as_i64().or_else(|| {
                    value
                        .as_f64()
                        .filter(|count| count.fract() == 0.0)
                        .map(|count| count as i64)
                })
            })
            .unwrap_or(i64::from(MIN_CHARACTERS));
        let use_emojis = raw
            .use_emojis
            .and_then(|value| value.as_bool())
            .unwrap_or(true);
        Self::new(
            &text(raw.style),
            &text(raw.tone),
            character_count,
            use_emojis,
        )
    }
}

/// A generated dialogue.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueResult {
    /// One `Person X: ...` turn per line
    pub dialogue: String,
    /// Speaker labels in order of first appearance
    pub characters: Vec<String>,
    /// The style that was asked for
    pub style: String,
    /// True when the language model wrote it
    pub ai_generated: bool,
}

impl DialogueResult {
    fn new(dialogue: String, settings: &DialogueSettings, ai_generated: bool) -> Self {
        Self {
            characters: extract_characters(&dialogue),
            dialogue,
            style: settings.style.as_str().to_string(),
            ai_generated,
        }
    }
}

#[allow(clippy::expect_used)] // literal pattern
static SPEAKER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Person [A-C]|[A-C]):").expect("speaker pattern compiles")
});

/// Speaker labels found at the start of lines, de-duplicated, in order of
/// first appearance.
pub fn extract_characters(dialogue: &str) -> Vec<String> {
    let mut characters: Vec<String> = Vec::new();
    for line in dialogue.lines() {
        if let Some(label) = SPEAKER_PREFIX
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|label| label.as_str())
            && !characters.iter().any(|known| known == label)
        {
            characters.push(label.to_string());
        }
    }
    characters
}

static DIALOGUE_RULES: [KeywordRule<&str>; 10] = [
    KeywordRule {
        keywords: &["exam", "test", "postpone", "delay"],
        outcome: "Person A: I pulled an all-nighter studying for this exam! My brain is FRIED 🧠
Person B: Bestie... check your email
Person A: *opens email* IT GOT POSTPONED?!
Person B: Your sacrifice has been rejected by the academic gods 💀
Person A: I'm about to have my villain origin story",
    },
    KeywordRule {
        keywords: &["assignment", "deadline", "submit", "11:59"],
        outcome: "Person A: SUBMITTED AT 11:59:59 PM! 🏃‍♂️💨
Person B: You really said \"I choose violence\" with that timing
Person A: I live for the ADRENALINE, the CHAOS, the—
Person B: The heart attack your professor just had? 💀
Person A: ...Worth it. Main character energy only 💅",
    },
    KeywordRule {
        keywords: &["wifi", "internet", "down", "connection"],
        outcome: "Person A: WiFi died during my MOST IMPORTANT video call 📡
Person B: Time to switch to mobile data!
Person A: *checks data usage* I've used 47GB this month...
Person B: RIP to your bank account 💸
Person A: Guess I'll just ✨disappear✨ from society now",
    },
    KeywordRule {
        keywords: &["bug", "fix", "code", "programming"],
        outcome: "Person A: I FIXED THE BUG! I'm basically a coding god now 🐛⚡
Person B: Slay bestie! How many new bugs did you accidentally create?
Person A: ...Let's not talk about that 👀
Person B: It's giving \"one step forward, three steps back\" energy
Person A: I'm in my debugging era and it's NOT cute 😭",
    },
    KeywordRule {
        keywords: &["coffee", "morning", "wake"],
        outcome: "Person A: I literally cannot function without coffee ☕
Person B: Bestie... it's 4 PM
Person A: Your point being? Coffee is a lifestyle, not a time
Person B: You're basically 80% caffeine at this point 💀
Person A: And I'm THRIVING. Don't fix what ain't broken ✨",
    },
    KeywordRule {
        keywords: &["meeting", "email", "could"],
        outcome: "Person A: This meeting could have been an email. PERIODT. 📧
Person B: But then how would we waste 2 hours of our lives?
Person A: You're right, where else would I practice my \"interested face\"? 😐
Person B: It's giving corporate theater vibes
Person A: I deserve an Oscar for my performance today 🏆",
    },
    KeywordRule {
        keywords: &["friday", "deploy", "production"],
        outcome: "Person A: Let's deploy to production on Friday! YOLO! 🚀
Person B: Are you trying to speedrun ruining our weekend?
Person A: I live for the CHAOS, the DRAMA, the—
Person B: The 3 AM emergency calls? 📞💀
Person A: ...Maybe Monday deployment hits different 👀",
    },
    KeywordRule {
        keywords: &["monday", "morning", "work"],
        outcome: "Person A: Monday morning again... why does time work like this? 😵‍💫
Person B: It's giving \"Groundhog Day\" but make it WORSE
Person A: I need a vacation from my vacation planning
Person B: That's some next-level procrastination energy 💀
Person A: I'm not procrastinating, I'm ✨strategically delaying✨",
    },
    KeywordRule {
        keywords: &["social", "media", "post", "instagram"],
        outcome: "Person A: I spent 2 hours editing this Instagram post 📸
Person B: For a picture of your LUNCH?
Person A: It's called ✨aesthetic✨ bestie, look it up
Person B: The sandwich doesn't need a whole photoshoot 💀
Person A: Every meal is a main character moment when you're ME",
    },
    KeywordRule {
        keywords: &["netflix", "watch", "series", "binge"],
        outcome: "Person A: I finished the entire series in one sitting 📺
Person B: That's like... 12 hours straight
Person A: I regret NOTHING. My couch and I are soulmates now
Person B: It's giving \"no life\" energy but make it cozy 💀
Person A: Don't judge my lifestyle choices, I'm THRIVING ✨",
    },
];

/// Number of generic dialogues the unmatched path chooses between.
pub const GENERIC_DIALOGUE_COUNT: usize = 3;

fn generic_dialogue(index: usize, description: &str) -> String {
    match index % GENERIC_DIALOGUE_COUNT {
        0 => format!(
            "Person A: {description}? That's some main character energy right there ✨
Person B: Bestie, that's not the flex you think it is 💀
Person A: I'm living my truth and it's CHAOTIC
Person B: Your truth needs better life choices 😭"
        ),
        1 => format!(
            "Person A: So... {description} happened to me today 🤡
Person B: It's giving \"why does this always happen to ME\" vibes
Person A: I'm the main character in a comedy show apparently
Person B: More like a reality TV disaster 💀
Person A: At least I'm entertaining! ✨"
        ),
        _ => format!(
            "Person A: {description} and I don't know how to feel about it 😵‍💫
Person B: That's some serious plot twist energy
Person A: My life is basically a Netflix series at this point
Person B: Yeah but it's the kind that gets cancelled after one season 💀
Person A: RUDE but... accurate 😭"
        ),
    }
}

/// Rule-based dialogue.
///
/// The first keyword rule that matches returns its canned dialogue verbatim;
/// otherwise `random` picks one of the generic dialogues with the description
/// dropped in as-is.
pub fn generate_fallback_dialogue(
    description: &str,
    settings: &DialogueSettings,
    random: &dyn RandomSource,
) -> DialogueResult {
    let dialogue = match first_match(&DIALOGUE_RULES, description) {
        Some(canned) => (*canned).to_string(),
        None => generic_dialogue(random.pick_index(GENERIC_DIALOGUE_COUNT), description),
    };
    DialogueResult::new(dialogue, settings, false)
}

/// System instruction for the language model, built from `settings`.
pub fn dialogue_system_prompt(settings: &DialogueSettings) -> String {
    let labels = settings.speaker_labels();
    let speakers = labels.join(", ");
    let emojis = if settings.use_emojis {
        "Use emojis strategically for maximum impact 🔥💀😭"
    } else {
        "No emojis but make it extra funny with words"
    };
    format!(
        r#"You are the ULTIMATE meme dialogue generator - a comedy genius who creates viral-worthy conversations that people screenshot and share immediately.

COMEDY RULES:
1. Use PERFECT comedic timing with setup → punchline structure
2. Include internet culture, Gen Z/Millennial references, and current memes
3. Add unexpected plot twists and absurd escalations
4. Use modern slang: "no cap", "fr fr", "bestie", "periodt", "slay", "it's giving...", "main character energy"
5. Include relatable struggles: adulting, social media, technology fails, existential dread
6. Add dramatic pauses with "..." for comedic effect
7. Use ALL CAPS for emphasis and dramatic reactions
8. Include self-aware humor and meta-commentary
9. Reference popular culture: Netflix shows, TikTok trends, Twitter drama
10. End with unexpected wisdom or complete chaos

FORMAT: Create a conversation between exactly {count} characters: {speakers}
- Start every line with the speaker label followed by a colon, eg "Person A: ..."
- Each line should be quotable and shareable
- Build up to a hilarious climax
- {emojis}

Style: {style}
Tone: {tone}

VIRAL EXAMPLES:
Person A: Bro I studied for 8 hours straight for this exam 📚
Person B: That's some main character energy right there
Person A: *checks email* ...It got postponed
Person B: Your character development just got CANCELLED 💀
Person A: I'm filing a complaint with the universe's customer service"#,
        count = labels.len(),
        style = settings.style.instruction(),
        tone = settings.tone.instruction(),
    )
}

/// User prompt sent alongside [`dialogue_system_prompt`].
pub fn dialogue_prompt(description: &str) -> String {
    format!(
        "Create the most HILARIOUS and ENGAGING meme dialogue for: \"{description}\". Make it so funny people will want to share it immediately!"
    )
}

/// Asks `model` for a dialogue, using the rule-based one when there is no
/// model or the call fails.
pub async fn generate_dialogue(
    model: Option<&dyn TextModel>,
    description: &str,
    settings: &DialogueSettings,
    random: &dyn RandomSource,
) -> DialogueResult {
    let Some(model) = model else {
        debug!("No language model configured, using rule-based dialogue");
        return generate_fallback_dialogue(description, settings, random);
    };

    match model
        .generate(
            &dialogue_system_prompt(settings),
            &dialogue_prompt(description),
        )
        .await
    {
        Ok(text) => DialogueResult::new(text.trim().to_string(), settings, true),
        Err(err) => {
            warn!("Error generating dialogue with AI: {}", err);
            generate_fallback_dialogue(description, settings, random)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;
    use crate::random::{FixedRandom, ThreadRandom};
    use serde_json::json;

    fn settings() -> DialogueSettings {
        DialogueSettings::default()
    }

    fn every_character_starts_a_line(result: &DialogueResult) {
        for character in &result.characters {
            let prefix = format!("{character}:");
            assert!(
                result.dialogue.lines().any(|line| line.starts_with(&prefix)),
                "{character} never speaks"
            );
        }
    }

    #[test]
    fn exam_postponed_is_canned() {
        let result = generate_fallback_dialogue(
            "I have an exam tomorrow but it got postponed",
            &settings(),
            &ThreadRandom,
        );
        assert_eq!(result.dialogue, DIALOGUE_RULES[0].outcome);
        assert!(result.dialogue.contains("IT GOT POSTPONED?!"));
        assert_eq!(result.characters, vec!["Person A", "Person B"]);
        assert!(!result.ai_generated);
        assert_eq!(result.style, "funny");
    }

    #[test]
    fn rule_order_resolves_overlap() {
        // "morning" is in the coffee rule and the later monday rule
        let result =
            generate_fallback_dialogue("monday morning blues", &settings(), &ThreadRandom);
        assert!(result.dialogue.contains("without coffee"));
        let result = generate_fallback_dialogue("Binge watching", &settings(), &ThreadRandom);
        assert!(result.dialogue.contains("entire series"));
    }

    #[test]
    fn matched_rule_is_deterministic() {
        let first = generate_fallback_dialogue("deploy on friday", &settings(), &FixedRandom(0));
        let second = generate_fallback_dialogue("deploy on friday", &settings(), &FixedRandom(2));
        assert_eq!(first, second);
    }

    #[test]
    fn unmatched_interpolates_description() {
        let description = "completely unrelated text xyz";
        for index in 0..GENERIC_DIALOGUE_COUNT {
            let result =
                generate_fallback_dialogue(description, &settings(), &FixedRandom(index));
            assert_eq!(result.dialogue, generic_dialogue(index, description));
            assert!(result.dialogue.contains(description));
            assert_eq!(result.characters, vec!["Person A", "Person B"]);
            assert!(!result.ai_generated);
            every_character_starts_a_line(&result);
        }
    }

    #[test]
    fn unmatched_keeps_original_case() {
        let result = generate_fallback_dialogue("Zebras In Space", &settings(), &FixedRandom(1));
        assert!(result.dialogue.starts_with("Person A: So... Zebras In Space happened"));
    }

    #[test]
    fn extracts_speakers_in_order() {
        let dialogue = "Person B: hi\nA: yo\nPerson B: again\nnarrator: ignored\n  Person C: indented\nC: three";
        assert_eq!(
            extract_characters(dialogue),
            vec!["Person B", "A", "C"]
        );
        assert!(extract_characters("no speakers here").is_empty());
    }

    #[test]
    fn speakers_past_c_are_ignored() {
        assert_eq!(
            extract_characters("Person A: hi\nPerson D: yo\nD: hey"),
            vec!["Person A"]
        );
    }

    #[test]
    fn canned_dialogues_round_trip() {
        for rule in &DIALOGUE_RULES {
            let result = generate_fallback_dialogue(rule.keywords[0], &settings(), &ThreadRandom);
            assert!(!result.characters.is_empty());
            every_character_starts_a_line(&result);
        }
    }

    #[test]
    fn settings_normalize() {
        let parsed = DialogueSettings::new("SARCASTIC", "subtle", 3, false);
        assert_eq!(parsed.style, DialogueStyle::Sarcastic);
        assert_eq!(parsed.tone, Tone::Subtle);
        assert_eq!(parsed.character_count, 3);
        assert!(!parsed.use_emojis);

        let junk = DialogueSettings::new("spicy", "loud", 9, true);
        assert_eq!(junk.style, DialogueStyle::Funny);
        assert_eq!(junk.tone, Tone::Exaggerated);
        assert_eq!(junk.character_count, 2);
        assert_eq!(DialogueSettings::new("chaotic", "", -1, true).character_count, 2);
        assert_eq!(
            DialogueSettings::new("chaotic", "", 4, true).style,
            DialogueStyle::Chaotic
        );
    }

    #[test]
    fn raw_settings_accept_browser_shape() {
        let raw: RawDialogueSettings = serde_json::from_value(json!({
            "style": "dramatic",
            "tone": "moderate",
            "characters": 4,
            "useEmojis": false
        }))
        .unwrap();
        let settings = DialogueSettings::from(raw);
        assert_eq!(settings.style, DialogueStyle::Dramatic);
        assert_eq!(settings.tone, Tone::Moderate);
        assert_eq!(settings.character_count, 4);
        assert!(!settings.use_emojis);
    }

    #[test]
    fn raw_settings_tolerate_junk() {
        let raw: RawDialogueSettings = serde_json::from_value(json!({
            "style": 7,
            "characterCount": "three",
            "useEmojis": "yes"
        }))
        .unwrap();
        assert_eq!(DialogueSettings::from(raw), DialogueSettings::default());

        let raw: RawDialogueSettings =
            serde_json::from_value(json!({ "characterCount": 3.0 })).unwrap();
        assert_eq!(DialogueSettings::from(raw).character_count, 3);
    }

    #[test]
    fn prompt_reflects_settings() {
        let settings = DialogueSettings::new("wholesome", "subtle", 3, false);
        let prompt = dialogue_system_prompt(&settings);
        assert!(prompt.contains("exactly 3 characters: Person A, Person B, Person C"));
        assert!(prompt.contains("golden retriever"));
        assert!(prompt.contains("British comedy"));
        assert!(prompt.contains("No emojis"));
    }

    #[test]
    fn four_characters_still_use_three_labels() {
        let settings = DialogueSettings::new("funny", "moderate", 4, true);
        assert_eq!(settings.character_count, 4);
        assert_eq!(settings.speaker_labels().len(), 3);
        let prompt = dialogue_system_prompt(&settings);
        assert!(prompt.contains("exactly 3 characters: Person A, Person B, Person C\n"));
        assert!(!prompt.contains("Person D"));
    }

    #[test]
    fn prompt_never_sees_invalid_count() {
        let settings = DialogueSettings::new("funny", "subtle", 12, true);
        let prompt = dialogue_system_prompt(&settings);
        assert!(prompt.contains("exactly 2 characters: Person A, Person B\n"));
    }

    #[tokio::test]
    async fn model_reply_is_trimmed_and_flagged() {
        let model = ScriptedModel::replying("\n  Person A: ok\nPerson C: sure\nPerson A: bye  \n");
        let result = generate_dialogue(
            Some(&model),
            "anything",
            &DialogueSettings::new("dramatic", "moderate", 3, true),
            &ThreadRandom,
        )
        .await;
        assert_eq!(result.dialogue, "Person A: ok\nPerson C: sure\nPerson A: bye");
        assert_eq!(result.characters, vec!["Person A", "Person C"]);
        assert!(result.ai_generated);
        assert_eq!(result.style, "dramatic");

        let calls = model.calls.lock().unwrap();
        assert!(calls[0].0.contains("Shakespeare"));
        assert!(calls[0].1.contains("\"anything\""));
    }

    #[tokio::test]
    async fn model_failure_falls_back() {
        let model = ScriptedModel::failing();
        let result = generate_dialogue(
            Some(&model),
            "I have an exam tomorrow but it got postponed",
            &settings(),
            &ThreadRandom,
        )
        .await;
        assert!(!result.ai_generated);
        assert_eq!(result.dialogue, DIALOGUE_RULES[0].outcome);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn no_model_means_fallback() {
        let result = generate_dialogue(None, "zzz", &settings(), &FixedRandom(2)).await;
        assert_eq!(result, generate_fallback_dialogue("zzz", &settings(), &FixedRandom(2)));
    }
}
