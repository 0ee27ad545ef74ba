//! Built-in break suggestions, keyed by emotion

use respite_api::{Activity, ActivityType, ColorScheme, Emotion, Suggestions};

struct Entry {
    kind: &'static str,
    title: &'static str,
    duration: &'static str,
    description: &'static str,
    instructions: &'static [&'static str],
}

struct EmotionSet {
    activities: &'static [Entry],
    affirmations: &'static [&'static str],
}

const STRESSED: EmotionSet = EmotionSet {
    activities: &[
        Entry {
            kind: "breathing",
            title: "Box Breathing Exercise",
            duration: "5 min",
            description: "Inhale for 4, hold for 4, exhale for 4, hold for 4",
            instructions: &[
                "Sit comfortably with your back straight",
                "Inhale slowly through your nose for 4 counts",
                "Hold your breath for 4 counts",
                "Exhale slowly through your mouth for 4 counts",
                "Hold empty for 4 counts",
                "Repeat for 5 minutes",
            ],
        },
        Entry {
            kind: "meditation",
            title: "Stress Relief Meditation",
            duration: "10 min",
            description: "Guided meditation to release tension and anxiety",
            instructions: &[
                "Find a quiet, comfortable space",
                "Close your eyes and focus on your breath",
                "Notice areas of tension in your body",
                "Breathe into those areas and let them relax",
                "Repeat the mantra: \"I am calm and in control\"",
            ],
        },
        Entry {
            kind: "movement",
            title: "Gentle Stretching",
            duration: "8 min",
            description: "Simple stretches to release physical tension",
            instructions: &[
                "Neck rolls: 5 in each direction",
                "Shoulder shrugs: 10 repetitions",
                "Arm circles: 10 forward, 10 backward",
                "Gentle spinal twist: Hold 30 seconds each side",
                "Deep forward fold: Hold for 1 minute",
            ],
        },
    ],
    affirmations: &[
        "I am capable of handling whatever comes my way",
        "This feeling is temporary and will pass",
        "I choose peace over worry",
        "I am stronger than my stress",
    ],
};

const TIRED: EmotionSet = EmotionSet {
    activities: &[
        Entry {
            kind: "breathing",
            title: "Energizing Breath",
            duration: "3 min",
            description: "Quick breathing technique to boost energy",
            instructions: &[
                "Sit up straight with good posture",
                "Take 3 deep, slow breaths to center yourself",
                "Breathe in quickly through nose (2 counts)",
                "Breathe out quickly through mouth (2 counts)",
                "Repeat rapidly for 30 seconds, then rest",
                "Do 3 rounds total",
            ],
        },
        Entry {
            kind: "movement",
            title: "Energy Boost Exercises",
            duration: "7 min",
            description: "Light exercises to wake up your body",
            instructions: &[
                "Jumping jacks: 30 seconds",
                "Arm swings: 20 repetitions",
                "Marching in place: 1 minute",
                "Gentle backbends: 5 repetitions",
                "Calf raises: 15 repetitions",
            ],
        },
        Entry {
            kind: "meditation",
            title: "Power Nap Meditation",
            duration: "15 min",
            description: "Restorative meditation for mental energy",
            instructions: &[
                "Lie down comfortably or sit with support",
                "Set a gentle timer for 15 minutes",
                "Focus on your breath becoming slower",
                "Let your mind rest without forcing sleep",
                "Wake up gently and stretch",
            ],
        },
    ],
    affirmations: &[
        "I am recharging my energy naturally",
        "Rest is productive and necessary",
        "I honor my body's need for restoration",
        "I will feel refreshed and renewed",
    ],
};

const SAD: EmotionSet = EmotionSet {
    activities: &[
        Entry {
            kind: "meditation",
            title: "Self-Compassion Practice",
            duration: "12 min",
            description: "Loving-kindness meditation for emotional healing",
            instructions: &[
                "Place your hand on your heart",
                "Acknowledge that you're experiencing difficulty",
                "Remember that sadness is part of human experience",
                "Send yourself kind thoughts and wishes",
                "Extend compassion to others who feel sad",
            ],
        },
        Entry {
            kind: "creative",
            title: "Gratitude Journaling",
            duration: "10 min",
            description: "Write down things you're grateful for",
            instructions: &[
                "Get a piece of paper or open a notes app",
                "Write down 3 things you're grateful for today",
                "Include why each thing matters to you",
                "Think of 2 people who care about you",
                "Write a kind message to yourself",
            ],
        },
        Entry {
            kind: "breathing",
            title: "Heart-Centered Breathing",
            duration: "8 min",
            description: "Breathing practice to open the heart",
            instructions: &[
                "Place both hands on your heart",
                "Breathe slowly and deeply into your heart space",
                "Imagine breathing in warmth and love",
                "Breathe out any sadness or pain",
                "Continue with gentle, loving breaths",
            ],
        },
    ],
    affirmations: &[
        "It's okay to feel sad sometimes",
        "I am worthy of love and compassion",
        "This feeling will pass, and I will feel joy again",
        "I am not alone in my struggles",
    ],
};

const HAPPY: EmotionSet = EmotionSet {
    activities: &[
        Entry {
            kind: "celebration",
            title: "Gratitude Dance",
            duration: "5 min",
            description: "Express your joy through movement",
            instructions: &[
                "Put on your favorite upbeat song",
                "Dance freely and expressively",
                "Think about what made you happy today",
                "Let your body move with gratitude",
                "Smile and enjoy the moment",
            ],
        },
        Entry {
            kind: "sharing",
            title: "Spread the Joy",
            duration: "10 min",
            description: "Share your positive energy with others",
            instructions: &[
                "Send a kind message to a friend",
                "Write a positive review for a business you love",
                "Compliment someone genuinely",
                "Share something that made you smile",
                "Plan something fun for later",
            ],
        },
        Entry {
            kind: "meditation",
            title: "Joy Amplification",
            duration: "8 min",
            description: "Meditation to expand and savor happiness",
            instructions: &[
                "Sit comfortably and close your eyes",
                "Recall the moment that brought you joy",
                "Feel the happiness in your body",
                "Breathe the joy into every cell",
                "Send this happiness out to the world",
            ],
        },
    ],
    affirmations: &[
        "I deserve to feel happy and joyful",
        "My happiness contributes to the world's joy",
        "I am grateful for this moment of happiness",
        "Joy is my natural state of being",
    ],
};

const CALM: EmotionSet = EmotionSet {
    activities: &[
        Entry {
            kind: "meditation",
            title: "Mindful Awareness",
            duration: "10 min",
            description: "Deepen your sense of peace and presence",
            instructions: &[
                "Sit quietly and notice your surroundings",
                "Observe sounds, sensations, and thoughts",
                "Don't judge, just notice with curiosity",
                "Return to your breath when mind wanders",
                "Rest in this peaceful awareness",
            ],
        },
        Entry {
            kind: "creative",
            title: "Mindful Sketching",
            duration: "15 min",
            description: "Draw something beautiful around you",
            instructions: &[
                "Find a simple object to draw",
                "Look at it carefully, noticing details",
                "Draw slowly and mindfully",
                "Focus on the process, not the result",
                "Enjoy the meditative quality of creating",
            ],
        },
        Entry {
            kind: "nature",
            title: "Window Gazing",
            duration: "5 min",
            description: "Connect with nature from indoors",
            instructions: &[
                "Look out a window at the sky or trees",
                "Notice the colors, shapes, and movement",
                "Breathe deeply and feel connected to nature",
                "Let your mind rest in this peaceful view",
                "Appreciate the beauty around you",
            ],
        },
    ],
    affirmations: &[
        "I am at peace with myself and the world",
        "Calmness is my superpower",
        "I choose serenity in every moment",
        "Peace flows through me naturally",
    ],
};

const FOCUSED: EmotionSet = EmotionSet {
    activities: &[
        Entry {
            kind: "meditation",
            title: "Concentration Enhancement",
            duration: "8 min",
            description: "Sharpen your mental focus",
            instructions: &[
                "Choose a single point of focus (breath, sound, or object)",
                "When mind wanders, gently return to your focus",
                "Notice how concentration feels in your body",
                "Appreciate your mind's ability to focus",
                "End with intention for continued focus",
            ],
        },
        Entry {
            kind: "brain",
            title: "Mental Clarity Break",
            duration: "6 min",
            description: "Quick exercises to boost mental sharpness",
            instructions: &[
                "Do 20 jumping jacks to increase blood flow",
                "Practice deep breathing for 2 minutes",
                "Do simple math problems in your head",
                "Visualize your next task clearly",
                "Set a clear intention for your work",
            ],
        },
        Entry {
            kind: "planning",
            title: "Priority Setting",
            duration: "10 min",
            description: "Organize your thoughts and tasks",
            instructions: &[
                "Write down your top 3 priorities",
                "Break each priority into smaller steps",
                "Estimate time needed for each step",
                "Choose which to tackle first",
                "Visualize completing each task successfully",
            ],
        },
    ],
    affirmations: &[
        "My mind is clear and focused",
        "I accomplish tasks with ease and efficiency",
        "I am fully present in everything I do",
        "Focus comes naturally to me",
    ],
};

fn set_for(emotion: Emotion) -> &'static EmotionSet {
    match emotion {
        Emotion::Stressed => &STRESSED,
        Emotion::Tired => &TIRED,
        Emotion::Sad => &SAD,
        Emotion::Happy => &HAPPY,
        Emotion::Focused => &FOCUSED,
        // No dedicated set; angry and confused get the calm suggestions
        Emotion::Calm | Emotion::Angry | Emotion::Confused => &CALM,
    }
}

/// Activities suggested for an emotion, in display order
pub fn activities_for(emotion: Emotion) -> Vec<Activity> {
    set_for(emotion)
        .activities
        .iter()
        .map(|e| Activity {
            kind: ActivityType::from(e.kind),
            title: e.title.to_string(),
            description: e.description.to_string(),
            duration: e.duration.to_string(),
            instructions: e.instructions.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

/// Affirmations available for an emotion
pub fn affirmations_for(emotion: Emotion) -> &'static [&'static str] {
    set_for(emotion).affirmations
}

/// Full suggestion bundle; `seed` picks the affirmation
pub fn suggestions_for(emotion: Emotion, seed: usize) -> Suggestions {
    let affirmations = affirmations_for(emotion);
    Suggestions {
        activities: activities_for(emotion),
        affirmation: affirmations[seed % affirmations.len()].to_string(),
        color_scheme: ColorScheme::for_emotion(emotion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_emotion_has_valid_suggestions() {
        for emotion in Emotion::ALL {
            let suggestions = suggestions_for(emotion, 0);
            assert!(!suggestions.activities.is_empty(), "{}", emotion);
            for activity in &suggestions.activities {
                assert!(activity.timer_duration().is_ok(), "{}", activity.title);
                assert!(!activity.instructions.is_empty());
            }
            assert!(!suggestions.affirmation.is_empty());
        }
    }

    #[test]
    fn angry_uses_calm_activities_with_its_own_colors() {
        let angry = suggestions_for(Emotion::Angry, 0);
        let calm = suggestions_for(Emotion::Calm, 0);
        assert_eq!(angry.activities, calm.activities);
        assert_eq!(angry.color_scheme.primary, "#ef4444");
    }

    #[test]
    fn seed_selects_affirmation() {
        let a = suggestions_for(Emotion::Stressed, 1);
        assert_eq!(a.affirmation, "This feeling is temporary and will pass");
        let wrapped = suggestions_for(Emotion::Stressed, 5);
        assert_eq!(wrapped.affirmation, a.affirmation);
    }
}
