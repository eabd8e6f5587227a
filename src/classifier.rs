use serde::{Deserialize, Serialize};

use crate::lexicon::{
    ANXIETY_TRIGGERS, CRISIS_TRIGGERS, DEPRESSION_TRIGGERS, GREETING_TRIGGERS,
    HELP_SEEKING_TRIGGERS, POSITIVE_TRIGGERS, STRESS_TRIGGERS,
};

/// Greetings only count when the whole message is shorter than this many characters,
/// so "hello, I've been feeling off all week" is not treated as small talk.
pub const GREETING_MAX_LEN: usize = 30;

/// Mutually exclusive bucket assigned to one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Crisis,
    Anxiety,
    Depression,
    Stress,
    Positive,
    Greeting,
    HelpSeeking,
    General,
}

impl Category {
    /// Categories that extend the consecutive-negative streak
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Category::Crisis | Category::Anxiety | Category::Depression | Category::Stress
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Crisis => "crisis",
            Category::Anxiety => "anxiety",
            Category::Depression => "depression",
            Category::Stress => "stress",
            Category::Positive => "positive",
            Category::Greeting => "greeting",
            Category::HelpSeeking => "help_seeking",
            Category::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Crisis,
    Anxious,
    Depressed,
    Stressed,
    Positive,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Classification result for a single message. Computed fresh, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub category: Category,
    pub mood: Mood,
    pub risk_level: RiskLevel,
}

impl Analysis {
    pub const fn new(category: Category, mood: Mood, risk_level: RiskLevel) -> Self {
        Analysis { category, mood, risk_level }
    }

    /// Result when no rule matches
    pub const GENERAL: Analysis = Analysis::new(Category::General, Mood::Neutral, RiskLevel::Low);
}

/// How a rule decides whether it applies to a lowercased message
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any phrase is a substring of the message
    AnyOf(&'static [&'static str]),
    /// Any phrase is a substring and the original message is shorter than `max_len` chars
    ShortAnyOf {
        phrases: &'static [&'static str],
        max_len: usize,
    },
}

impl Trigger {
    fn matches(&self, lowered: &str, char_len: usize) -> bool {
        match *self {
            Trigger::AnyOf(phrases) => contains_any(lowered, phrases),
            Trigger::ShortAnyOf { phrases, max_len } => {
                char_len < max_len && contains_any(lowered, phrases)
            }
        }
    }
}

fn contains_any(lowered: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|&phrase| lowered.contains(phrase))
}

#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub trigger: Trigger,
    pub analysis: Analysis,
}

/// Evaluated top-down, first match wins. Crisis must stay first.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        trigger: Trigger::AnyOf(CRISIS_TRIGGERS),
        analysis: Analysis::new(Category::Crisis, Mood::Crisis, RiskLevel::High),
    },
    ClassificationRule {
        trigger: Trigger::AnyOf(ANXIETY_TRIGGERS),
        analysis: Analysis::new(Category::Anxiety, Mood::Anxious, RiskLevel::Medium),
    },
    ClassificationRule {
        trigger: Trigger::AnyOf(DEPRESSION_TRIGGERS),
        analysis: Analysis::new(Category::Depression, Mood::Depressed, RiskLevel::Medium),
    },
    ClassificationRule {
        trigger: Trigger::AnyOf(STRESS_TRIGGERS),
        analysis: Analysis::new(Category::Stress, Mood::Stressed, RiskLevel::Medium),
    },
    ClassificationRule {
        trigger: Trigger::AnyOf(POSITIVE_TRIGGERS),
        analysis: Analysis::new(Category::Positive, Mood::Positive, RiskLevel::Low),
    },
    ClassificationRule {
        trigger: Trigger::ShortAnyOf {
            phrases: GREETING_TRIGGERS,
            max_len: GREETING_MAX_LEN,
        },
        analysis: Analysis::new(Category::Greeting, Mood::Neutral, RiskLevel::Low),
    },
    ClassificationRule {
        trigger: Trigger::AnyOf(HELP_SEEKING_TRIGGERS),
        analysis: Analysis::new(Category::HelpSeeking, Mood::Neutral, RiskLevel::Low),
    },
];

/// Keyword classifier mapping free text to a category, mood and risk level
#[derive(Debug, Clone, Copy)]
pub struct MessageClassifier {
    rules: &'static [ClassificationRule],
}

impl MessageClassifier {
    pub fn new() -> Self {
        MessageClassifier {
            rules: CLASSIFICATION_RULES,
        }
    }

    pub fn with_rules(rules: &'static [ClassificationRule]) -> Self {
        MessageClassifier { rules }
    }

    /// Classify a message. Total over any input, including the empty string.
    ///
    /// Matching is plain substring containment on the lowercased text, so short
    /// triggers such as "hi" also fire inside longer words.
    pub fn classify(&self, text: &str) -> Analysis {
        let lowered = text.to_lowercase();
        let char_len = text.chars().count();

        self.rules
            .iter()
            .find(|rule| rule.trigger.matches(&lowered, char_len))
            .map(|rule| rule.analysis)
            .unwrap_or(Analysis::GENERAL)
    }
}

impl Default for MessageClassifier {
    fn default() -> Self {
        Self::new()
    }
}
