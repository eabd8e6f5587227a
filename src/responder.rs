//! # Feature: Supportive Responses
//!
//! Turns a classified message plus the session it belongs to into a reply,
//! optionally carrying a resource bundle and a 1-10 mood-check prompt.
//! Categories escalate differently: anxiety looks back at the last two bot
//! replies, depression watches the negative streak, crisis always escalates.
//!
//! - **Version**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Category responses, escalation overrides and seedable selection

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use crate::classifier::{Analysis, Category, RiskLevel};
use crate::lexicon::{
    ResourceBundle, ResponsePools, ANXIETY_COPING_LEAD, ANXIETY_ESCALATION_PREFACE,
    CRISIS_MESSAGE, CRISIS_RESOURCES, DEPRESSION_COPING_LEAD,
    DEPRESSION_ESCALATED_COPING_LEAD, DEPRESSION_ESCALATION_PREFACE, FALLBACK_RESPONSES,
    GENERAL_FOLLOW_UP, HELP_SEEKING_MESSAGE, PROFESSIONAL_RESOURCES, SAFETY_CHECK_QUESTION,
    STRESS_COPING_LEAD, WELLBEING_CHECK_QUESTION, WELLNESS_RESOURCES,
};
use crate::session::Session;

/// Anxiety escalates when this many of the latest bot replies were also anxiety
pub const ANXIETY_REPEAT_WINDOW: usize = 2;
/// Depression escalates once the negative streak reaches this
pub const DEPRESSION_ESCALATION_STREAK: u32 = 3;
/// Any non-positive reply gets wellness resources once the streak reaches this
pub const WELLNESS_RESOURCE_STREAK: u32 = 2;
/// General replies add a follow-up once history is longer than this
pub const GENERAL_FOLLOW_UP_AFTER_TURNS: usize = 2;

const RATING_SCALE: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// A structured 1-10 rating question attached to a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodCheckPrompt {
    pub question: &'static str,
    pub scale: [u8; 10],
}

impl MoodCheckPrompt {
    /// Asked after a crisis message
    pub const fn safety() -> Self {
        MoodCheckPrompt {
            question: SAFETY_CHECK_QUESTION,
            scale: RATING_SCALE,
        }
    }

    pub const fn wellbeing() -> Self {
        MoodCheckPrompt {
            question: WELLBEING_CHECK_QUESTION,
            scale: RATING_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotResponse {
    pub message: String,
    pub resources: Option<ResourceBundle>,
    pub mood_check: Option<MoodCheckPrompt>,
}

/// Picks reply text from the lexicon pools using an injected random source.
///
/// The source is shared by every user and locked only for the duration of one
/// `generate` call, which does no I/O and never awaits.
pub struct ResponseGenerator {
    pools: ResponsePools,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ResponseGenerator {
    pub fn new() -> Self {
        Self::with_rng(ResponsePools::standard(), StdRng::from_os_rng())
    }

    /// Deterministic selection, for tests and reproducible transcripts
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ResponsePools::standard(), StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R>(pools: ResponsePools, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        ResponseGenerator {
            pools,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Build the reply for `analysis`. `session` must already reflect it.
    ///
    /// Never fails and never returns an empty message.
    pub fn generate(&self, analysis: &Analysis, session: &Session) -> BotResponse {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let rng: &mut dyn RngCore = &mut **rng;
        let pools = &self.pools;

        let mut resources = None;
        let mut mood_check = None;

        let message = match analysis.category {
            Category::Greeting => pick(rng, pools.greetings).to_string(),
            Category::Crisis => {
                resources = Some(CRISIS_RESOURCES);
                mood_check = Some(MoodCheckPrompt::safety());
                CRISIS_MESSAGE.to_string()
            }
            Category::Anxiety => {
                if anxiety_is_repeating(session) {
                    resources = Some(PROFESSIONAL_RESOURCES);
                    format!(
                        "{} {} {}",
                        ANXIETY_ESCALATION_PREFACE,
                        pick(rng, pools.anxiety_coping),
                        pick(rng, pools.anxiety_follow_ups)
                    )
                } else {
                    format!(
                        "{} {} {}",
                        pick(rng, pools.anxiety),
                        ANXIETY_COPING_LEAD,
                        pick(rng, pools.anxiety_coping)
                    )
                }
            }
            Category::Depression => {
                if session.consecutive_negative >= DEPRESSION_ESCALATION_STREAK {
                    resources = Some(PROFESSIONAL_RESOURCES);
                    format!(
                        "{} {} {} {}",
                        DEPRESSION_ESCALATION_PREFACE,
                        pick(rng, pools.depression),
                        DEPRESSION_ESCALATED_COPING_LEAD,
                        pick(rng, pools.depression_coping)
                    )
                } else {
                    format!(
                        "{} {} {}",
                        pick(rng, pools.depression),
                        DEPRESSION_COPING_LEAD,
                        pick(rng, pools.depression_coping)
                    )
                }
            }
            Category::Stress => format!(
                "{} {} {} {}",
                pick(rng, pools.stress),
                STRESS_COPING_LEAD,
                pick(rng, pools.stress_coping),
                pick(rng, pools.stress_follow_ups)
            ),
            Category::Positive => pick(rng, pools.positive).to_string(),
            Category::HelpSeeking => HELP_SEEKING_MESSAGE.to_string(),
            Category::General => {
                let mut message = pick(rng, pools.supportive).to_string();
                if session.history().len() > GENERAL_FOLLOW_UP_AFTER_TURNS {
                    message.push(' ');
                    message.push_str(GENERAL_FOLLOW_UP);
                }
                message
            }
        };

        if analysis.risk_level != RiskLevel::Low && mood_check.is_none() {
            mood_check = Some(MoodCheckPrompt::wellbeing());
        }

        if session.consecutive_negative >= WELLNESS_RESOURCE_STREAK
            && analysis.category != Category::Positive
            && resources.is_none()
        {
            resources = Some(WELLNESS_RESOURCES);
        }

        BotResponse {
            message,
            resources,
            mood_check,
        }
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The latest bot replies in the window were all about anxiety
fn anxiety_is_repeating(session: &Session) -> bool {
    session
        .recent_bot_categories(ANXIETY_REPEAT_WINDOW)
        .filter(|category| *category == Some(Category::Anxiety))
        .count()
        == ANXIETY_REPEAT_WINDOW
}

fn pick(rng: &mut dyn RngCore, pool: &'static [&'static str]) -> &'static str {
    let pool = if pool.is_empty() { FALLBACK_RESPONSES } else { pool };
    pool[rng.random_range(0..pool.len())]
}
