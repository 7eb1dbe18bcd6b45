//! Picks a meme template for a free-text description.

use crate::random::RandomSource;
use crate::rules::{KeywordRule, first_match};
use crate::templates::{
    CHANGE_MY_MIND, DISTRACTED_BOYFRIEND, DRAKE, EXPANDING_BRAIN, SURPRISED_PIKACHU, TEMPLATES,
    THIS_IS_FINE, TWO_BUTTONS, Template, WOMAN_YELLING_CAT,
};

/// Checked in order. "choice" appears for both Drake and Two Buttons, so
/// Drake wins it.
static TEMPLATE_RULES: [KeywordRule<&Template>; 8] = [
    KeywordRule {
        keywords: &["drake", "choice", "reject", "approve"],
        outcome: &DRAKE,
    },
    KeywordRule {
        keywords: &["distracted", "boyfriend", "temptation"],
        outcome: &DISTRACTED_BOYFRIEND,
    },
    KeywordRule {
        keywords: &["yelling", "cat", "argument", "confused"],
        outcome: &WOMAN_YELLING_CAT,
    },
    KeywordRule {
        keywords: &["fine", "disaster", "calm"],
        outcome: &THIS_IS_FINE,
    },
    KeywordRule {
        keywords: &["brain", "evolution", "progress"],
        outcome: &EXPANDING_BRAIN,
    },
    KeywordRule {
        keywords: &["buttons", "choice", "difficult"],
        outcome: &TWO_BUTTONS,
    },
    KeywordRule {
        keywords: &["mind", "opinion", "statement"],
        outcome: &CHANGE_MY_MIND,
    },
    KeywordRule {
        keywords: &["surprised", "pikachu", "unexpected"],
        outcome: &SURPRISED_PIKACHU,
    },
];

/// Returns the first template whose keywords appear in `description`, or a
/// uniformly random one when none do.
pub fn select(description: &str, random: &dyn RandomSource) -> &'static Template {
    if let Some(template) = first_match(&TEMPLATE_RULES, description) {
        return *template;
    }
    &TEMPLATES[random.pick_index(TEMPLATES.len()) % TEMPLATES.len()]
}
