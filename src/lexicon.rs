//! # Lexicon
//!
//! Static trigger phrases, canned response pools, coping strategies and
//! resource bundles. Everything here is immutable for the process lifetime and
//! safe to share across any number of sessions without synchronization.
//!
//! - **Version**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial trigger sets and response pools

use serde::Serialize;

/// Bumped whenever a trigger list changes, since that changes classification.
pub const LEXICON_VERSION: &str = "1.0.0";

/// Crisis phrases, matched case-insensitively using substring matching.
/// These always win over every other category.
pub const CRISIS_TRIGGERS: &[&str] = &[
    "suicide",
    "kill myself",
    "end it all",
    "not worth living",
    "better off dead",
    "want to die",
    "ending my life",
];

pub const ANXIETY_TRIGGERS: &[&str] = &[
    "anxious", "worried", "panic", "nervous", "scared",
    "afraid", "fear", "terror", "dread", "catastrophic",
];

pub const DEPRESSION_TRIGGERS: &[&str] = &[
    "depressed", "sad", "hopeless", "empty", "worthless",
    "lonely", "numb", "lifeless", "meaningless",
];

pub const STRESS_TRIGGERS: &[&str] = &[
    "stressed", "overwhelmed", "pressure", "exhausted",
    "burned out", "swamped", "frazzled",
];

pub const POSITIVE_TRIGGERS: &[&str] = &[
    "happy", "good", "great", "excited", "grateful",
    "better", "wonderful", "amazing", "fantastic", "joy",
];

/// Only counted as a greeting when the whole message is short.
pub const GREETING_TRIGGERS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

pub const HELP_SEEKING_TRIGGERS: &[&str] = &[
    "help",
    "support",
    "advice",
    "guidance",
    "don't know what to do",
];

const GREETINGS: &[&str] = &[
    "Hello! I'm here to support your mental wellness. How are you feeling today?",
    "Hi there! I'm your mental health support companion. What's on your mind?",
    "Welcome! I'm here to listen and help with your mental wellbeing. How can I assist you today?",
    "Good to see you! I'm here to provide a safe space for you to share your thoughts and feelings. What would you like to talk about?",
];

const POSITIVE_RESPONSES: &[&str] = &[
    "That's wonderful to hear! It's great that you're feeling positive. What's been contributing to these good feelings?",
    "I'm so glad you're doing well! Keep up the positive energy. Can you tell me more about what's been going right for you?",
    "That sounds fantastic! Positive feelings are so important for our wellbeing. What's been the highlight of your day or week?",
    "It's beautiful to hear such positivity from you! Sometimes it helps to acknowledge and celebrate these good moments. What made today special?",
];

const SUPPORTIVE_RESPONSES: &[&str] = &[
    "I hear you, and I want you to know that your feelings are completely valid. Can you tell me a bit more about what you're experiencing?",
    "Thank you for sharing that with me. It takes courage to open up. I'm here to listen - would you like to explore these feelings together?",
    "I'm here to listen and support you through this. Sometimes just talking about what we're going through can help. What's been weighing on your mind?",
    "Your feelings matter, and I'm glad you felt comfortable sharing with me. What's the most challenging part of what you're dealing with right now?",
];

const STRESS_RESPONSES: &[&str] = &[
    "Stress can feel overwhelming, and it's completely understandable that you're feeling this way. What's been the main source of stress for you lately?",
    "It sounds like you're dealing with a lot right now. Remember, it's okay to take breaks and prioritize your wellbeing. What's been putting the most pressure on you?",
    "Stress is a normal response to challenging situations, but we can find ways to manage it better. Can you help me understand what's been stressing you out?",
    "I can hear that you're feeling stressed, and that must be really difficult. Sometimes breaking down what's causing stress can help us address it. What's been on your mind?",
];

const ANXIETY_RESPONSES: &[&str] = &[
    "Anxiety can feel very intense and overwhelming. You're brave for reaching out. What does anxiety feel like for you, and when do you notice it most?",
    "I understand anxiety can be frightening and exhausting. You're not alone in this. Can you describe what situations or thoughts tend to trigger your anxiety?",
    "Anxiety affects many people, and it's treatable and manageable. What's been making you feel most anxious lately? Sometimes naming our fears can help reduce their power.",
    "Thank you for trusting me with your anxiety. It takes strength to acknowledge these feelings. What physical sensations or thoughts do you notice when you're anxious?",
];

const DEPRESSION_RESPONSES: &[&str] = &[
    "Depression can make everything feel heavy and exhausting. I want you to know that small steps count, and I'm here with you. How long have you been feeling this way?",
    "Thank you for trusting me with how you're feeling. Every day you're here matters, and I'm glad you reached out. What does depression feel like for you day-to-day?",
    "Depression affects many people, and you've taken a positive step by reaching out. It can feel isolating, but you're not alone. What's been the hardest part for you?",
    "I hear the pain in what you're sharing, and I want you to know that these feelings, while very real and difficult, can improve with support. What's been going through your mind lately?",
];

const STRESS_FOLLOW_UPS: &[&str] = &[
    "What time of day do you usually feel most stressed?",
    "Have you noticed any patterns in what triggers your stress?",
    "What normally helps you feel calmer during stressful times?",
    "Are there any upcoming situations that are particularly worrying you?",
];

const ANXIETY_FOLLOW_UPS: &[&str] = &[
    "What physical sensations do you notice when you're anxious?",
    "Are there specific situations that make your anxiety worse?",
    "Have you found anything that helps calm your anxiety, even a little?",
    "What thoughts tend to go through your mind when you're feeling anxious?",
];

const STRESS_COPING: &[&str] = &[
    "Try the 4-7-8 breathing technique: Inhale for 4, hold for 7, exhale for 8. This activates your body's relaxation response.",
    "Take a 5-10 minute walk or do some light stretching. Movement can help release physical tension from stress.",
    "Practice the 'body scan' technique: Start from your toes and mentally check each part of your body, releasing tension as you go.",
    "Write down three things you're grateful for today, no matter how small. This can help shift your focus to positive aspects of your day.",
];

const ANXIETY_COPING: &[&str] = &[
    "Use the 5-4-3-2-1 grounding technique: Name 5 things you see, 4 you can touch, 3 you hear, 2 you smell, 1 you taste. This brings you back to the present moment.",
    "Try box breathing: Inhale for 4 counts, hold for 4, exhale for 4, hold for 4. Repeat this cycle to calm your nervous system.",
    "Challenge anxious thoughts by asking: 'Is this thought helpful? Is it realistic? What would I tell a friend having this thought?'",
    "Practice the 'STOP' technique: Stop what you're doing, Take a breath, Observe your thoughts and feelings, Proceed with intention.",
];

const DEPRESSION_COPING: &[&str] = &[
    "Set one very small, achievable goal for today - even something as simple as making your bed or drinking a glass of water.",
    "Try to spend 10-15 minutes outside if possible. Natural light and fresh air can have a positive impact on mood.",
    "Reach out to one person - even a simple text to a friend or family member can help combat isolation.",
    "Do one small act of self-care, like taking a warm shower, listening to a favorite song, or drinking a cup of tea mindfully.",
];

/// Substituted for any pool that turns out to be empty so a reply is never blank.
pub const FALLBACK_RESPONSES: &[&str] = &[
    "I'm here with you. Would you like to tell me a little more about how you're feeling?",
];

// Fixed texts. Crisis wording is deliberately not randomized.
pub const CRISIS_MESSAGE: &str = "I'm very concerned about what you've shared, and I want you to know that your life has value and meaning. You deserve support and care. Please reach out to a crisis helpline immediately - they have trained professionals who can help you through this difficult time.";
pub const HELP_SEEKING_MESSAGE: &str = "I'm here to help and support you. Thank you for reaching out - that takes courage. Can you tell me more about what you're going through? Sometimes it helps to start with how you're feeling right now, and we can work through it together.";
pub const ANXIETY_ESCALATION_PREFACE: &str = "I notice we've been talking about anxiety for a while. Sometimes when anxiety persists, it can help to talk to a professional who specializes in anxiety disorders.";
pub const DEPRESSION_ESCALATION_PREFACE: &str = "I'm noticing this has been a particularly difficult time for you. Depression can feel overwhelming, but professional support can make a real difference.";
pub const ANXIETY_COPING_LEAD: &str = "Here's a technique that might help right now:";
pub const DEPRESSION_COPING_LEAD: &str = "Let's take this one step at a time:";
pub const DEPRESSION_ESCALATED_COPING_LEAD: &str = "Let's try this gentle approach:";
pub const STRESS_COPING_LEAD: &str = "Here's something you can try right now:";
pub const GENERAL_FOLLOW_UP: &str = "I notice this is something that's been on your mind. What feels most important to talk about right now?";

pub const SAFETY_CHECK_QUESTION: &str =
    "Before we continue, on a scale of 1-10, how safe do you feel right now?";
pub const WELLBEING_CHECK_QUESTION: &str =
    "On a scale of 1-10, how would you rate your current emotional wellbeing?";

/// A single contact or reference entry inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceItem {
    pub name: &'static str,
    pub contact: &'static str,
}

/// A titled list of resources that can be attached to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceBundle {
    pub title: &'static str,
    pub items: &'static [ResourceItem],
}

pub const CRISIS_RESOURCES: ResourceBundle = ResourceBundle {
    title: "Immediate Crisis Support",
    items: &[
        ResourceItem { name: "National Suicide Prevention Lifeline", contact: "988 (US)" },
        ResourceItem { name: "Crisis Text Line", contact: "Text HOME to 741741" },
        ResourceItem { name: "Emergency Services", contact: "911" },
        ResourceItem { name: "National Alliance on Mental Illness", contact: "1-800-950-NAMI (6264)" },
    ],
};

pub const PROFESSIONAL_RESOURCES: ResourceBundle = ResourceBundle {
    title: "Professional Mental Health Support",
    items: &[
        ResourceItem { name: "Employee Assistance Program (EAP)", contact: "Contact HR for confidential support" },
        ResourceItem { name: "Psychology Today Therapist Finder", contact: "psychologytoday.com" },
        ResourceItem { name: "BetterHelp Online Therapy", contact: "betterhelp.com" },
        ResourceItem { name: "Talkspace Online Therapy", contact: "talkspace.com" },
    ],
};

pub const WELLNESS_RESOURCES: ResourceBundle = ResourceBundle {
    title: "Mental Wellness Resources",
    items: &[
        ResourceItem { name: "Headspace - Meditation & Mindfulness", contact: "headspace.com" },
        ResourceItem { name: "Calm - Sleep & Meditation", contact: "calm.com" },
        ResourceItem { name: "NAMI - Mental Health Education", contact: "nami.org" },
        ResourceItem { name: "Anxiety and Depression Association", contact: "adaa.org" },
    ],
};

/// The randomized text pools the response generator draws from.
///
/// Pools are plain slices so tests can swap in their own (including empty
/// ones) without touching the generator.
#[derive(Debug, Clone, Copy)]
pub struct ResponsePools {
    pub greetings: &'static [&'static str],
    pub positive: &'static [&'static str],
    pub supportive: &'static [&'static str],
    pub stress: &'static [&'static str],
    pub anxiety: &'static [&'static str],
    pub depression: &'static [&'static str],
    pub stress_coping: &'static [&'static str],
    pub anxiety_coping: &'static [&'static str],
    pub depression_coping: &'static [&'static str],
    pub stress_follow_ups: &'static [&'static str],
    pub anxiety_follow_ups: &'static [&'static str],
}

impl ResponsePools {
    pub const fn standard() -> Self {
        ResponsePools {
            greetings: GREETINGS,
            positive: POSITIVE_RESPONSES,
            supportive: SUPPORTIVE_RESPONSES,
            stress: STRESS_RESPONSES,
            anxiety: ANXIETY_RESPONSES,
            depression: DEPRESSION_RESPONSES,
            stress_coping: STRESS_COPING,
            anxiety_coping: ANXIETY_COPING,
            depression_coping: DEPRESSION_COPING,
            stress_follow_ups: STRESS_FOLLOW_UPS,
            anxiety_follow_ups: ANXIETY_FOLLOW_UPS,
        }
    }

    #[cfg(test)]
    fn all(&self) -> [&'static [&'static str]; 11] {
        [
            self.greetings,
            self.positive,
            self.supportive,
            self.stress,
            self.anxiety,
            self.depression,
            self.stress_coping,
            self.anxiety_coping,
            self.depression_coping,
            self.stress_follow_ups,
            self.anxiety_follow_ups,
        ]
    }
}

impl Default for ResponsePools {
    fn default() -> Self {
        Self::standard()
    }
}
