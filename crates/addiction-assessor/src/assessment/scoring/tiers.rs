use serde::{Deserialize, Serialize};

/// Named severity bracket selected by score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierLevel {
    Low,
    LowModerate,
    Moderate,
    High,
    VeryHigh,
}

impl TierLevel {
    pub const fn label(self) -> &'static str {
        match self {
            TierLevel::Low => "Low",
            TierLevel::LowModerate => "Low-Moderate",
            TierLevel::Moderate => "Moderate",
            TierLevel::High => "High",
            TierLevel::VeryHigh => "Very High",
        }
    }

    pub fn tier(self) -> &'static Tier {
        // TIERS is declared in the same order as the enum.
        &TIERS[self as usize]
    }
}

/// Static tier record with its advice text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub level: TierLevel,
    pub label: &'static str,
    pub description: &'static str,
    pub recommendations: [&'static str; 4],
}

pub static TIERS: [Tier; 5] = [
    Tier {
        level: TierLevel::Low,
        label: TierLevel::Low.label(),
        description: "Excellent! Your social media usage appears very healthy and well-controlled. You're maintaining good habits.",
        recommendations: [
            "Keep up the great work!",
            "Share your strategies with friends",
            "Stay mindful of your usage",
            "Continue prioritizing real-life activities",
        ],
    },
    Tier {
        level: TierLevel::LowModerate,
        label: TierLevel::LowModerate.label(),
        description: "Your social media usage is relatively controlled. Keep monitoring your habits to maintain this healthy balance.",
        recommendations: [
            "Continue current healthy habits",
            "Be aware of gradual increases in usage",
            "Use social media intentionally",
            "Maintain work-life balance",
        ],
    },
    Tier {
        level: TierLevel::Moderate,
        label: TierLevel::Moderate.label(),
        description: "Your usage is moderate but showing some warning signs. Be mindful of your habits and ensure social media doesn't interfere with important activities.",
        recommendations: [
            "Track your usage with built-in screen time tools",
            "Set boundaries for usage times",
            "Practice mindful scrolling",
            "Regular digital detox days",
        ],
    },
    Tier {
        level: TierLevel::High,
        label: TierLevel::High.label(),
        description: "Your usage shows concerning addiction patterns. It's affecting your sleep, mental health, and academic performance. Take action now to reduce usage.",
        recommendations: [
            "Set daily time limits (3-4 hours max)",
            "Turn off notifications",
            "Establish phone-free zones (bedroom, dining)",
            "Find offline hobbies and activities",
        ],
    },
    Tier {
        level: TierLevel::VeryHigh,
        label: TierLevel::VeryHigh.label(),
        description: "Your social media usage shows signs of severe addiction. This may significantly impact your daily life, academics, and mental health. Consider seeking professional support and implementing strict usage limits immediately.",
        recommendations: [
            "Seek counseling or therapy",
            "Use app blockers during study/work hours",
            "Set a daily limit of 2 hours maximum",
            "Delete apps from your phone temporarily",
        ],
    },
];

pub fn classify(score: u8) -> &'static Tier {
    let level = match score {
        9.. => TierLevel::VeryHigh,
        7..=8 => TierLevel::High,
        5..=6 => TierLevel::Moderate,
        4 => TierLevel::LowModerate,
        _ => TierLevel::Low,
    };
    level.tier()
}
