//! Closed vocabularies used inside an analysis record
//!
//! Each vocabulary serializes to the exact label the model is prompted with
//! and parses case-insensitively, so `"HIGH"` and `"high"` are the same level.

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value, in prompt order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The label the model uses for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            /// Parse a label, ignoring ASCII case and surrounding whitespace
            pub fn parse(s: &str) -> Option<Self> {
                let needle = s.trim();
                $(
                    if needle.eq_ignore_ascii_case($label) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| format!("Invalid {}: {}", stringify!($name), s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).ok_or_else(|| de::Error::custom(format!(
                    "unknown {} `{}`",
                    stringify!($name),
                    raw
                )))
            }
        }
    };
}

vocabulary! {
    /// Tone of a key phrase
    Sentiment {
        /// Favourable to the deal
        Positive => "positive",
        /// Unfavourable to the deal
        Negative => "negative",
        /// Informational
        Neutral => "neutral",
    }
}

vocabulary! {
    /// Three-step scale used for severity, strength, priority and urgency
    Level {
        /// Strongest
        High => "high",
        /// Middle
        Medium => "medium",
        /// Weakest
        Low => "low",
    }
}

impl Level {
    /// Numeric weight used when ranking: high = 3, medium = 2, low = 1
    pub fn weight(&self) -> u32 {
        match self {
            Level::High => 3,
            Level::Medium => 2,
            Level::Low => 1,
        }
    }

    /// Weight of an optional level; missing levels rank as low
    pub fn weight_of(level: Option<Level>) -> u32 {
        level.map_or(1, |l| l.weight())
    }
}

vocabulary! {
    /// How strongly the prospect engaged with a product module
    InterestLevel {
        /// Asked follow-up questions, wants a demo
        High => "high",
        /// Some engagement
        Medium => "medium",
        /// Little engagement
        Low => "low",
        /// Came up in passing
        Mentioned => "mentioned",
    }
}

vocabulary! {
    /// Kind of objection raised on the call
    ObjectionCategory {
        /// Price is too high
        Pricing => "Pricing",
        /// The prospect already automated this step
        AlreadyAutomated => "Already Automated",
        /// A competitor has features we lack
        CompetitorFeatures => "Competitor Features",
        /// A competitor is cheaper
        CompetitorPricing => "Competitor Pricing",
        /// Distrust of automated decisions
        FearOfAutomation => "Fear of Automation",
        /// Worries about fitting the existing stack
        IntegrationConcerns => "Integration Concerns",
        /// Worries about data handling
        DataSecurity => "Data Security",
        /// Not the right time
        Timeline => "Timeline",
        /// Anything else
        Other => "Other",
    }
}

impl Default for ObjectionCategory {
    fn default() -> Self {
        ObjectionCategory::Other
    }
}

vocabulary! {
    /// Kind of opportunity spotted on the call
    OpportunityCategory {
        /// A pain the product solves
        PainPoint => "Pain Point",
        /// Interest in a specific module
        ModuleInterest => "Module Interest",
        /// Room to grow the account
        ExpansionPotential => "Expansion Potential",
        /// The prospect needs this soon
        UrgencySignal => "Urgency Signal",
        /// Budget exists or is being allocated
        BudgetSignal => "Budget Signal",
        /// An internal advocate was found
        ChampionIdentified => "Champion Identified",
        /// Anything else
        Other => "Other",
    }
}

impl Default for OpportunityCategory {
    fn default() -> Self {
        OpportunityCategory::Other
    }
}

vocabulary! {
    /// Format of a suggested marketing asset
    ContentType {
        /// Customer success story
        CaseStudy => "Case Study",
        /// Long-form article
        BlogPost => "Blog Post",
        /// Nurture email series
        EmailSequence => "Email Sequence",
        /// Single-page summary
        OnePager => "One-Pager",
        /// Recorded video
        Video => "Video",
        /// Live session
        Webinar => "Webinar",
        /// Interactive savings calculator
        RoiCalculator => "ROI Calculator",
        /// Side-by-side competitor comparison
        ComparisonSheet => "Comparison Sheet",
        /// Short social media post
        SocialPost => "Social Post",
        /// Campaign landing page
        LandingPage => "Landing Page",
    }
}

vocabulary! {
    /// Deal progress, from first contact to signature
    BuyingStage {
        /// Learning about the problem space
        Awareness => "Awareness",
        /// Evaluating options
        Consideration => "Consideration",
        /// Choosing a vendor
        Decision => "Decision",
        /// Agreeing terms
        Negotiation => "Negotiation",
        /// Signed
        Closed => "Closed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Level::parse("HIGH"), Some(Level::High));
        assert_eq!(Level::parse(" medium "), Some(Level::Medium));
        assert_eq!(
            ObjectionCategory::parse("already automated"),
            Some(ObjectionCategory::AlreadyAutomated)
        );
        assert_eq!(Level::parse("urgent"), None);
    }

    #[test]
    fn test_serializes_to_prompt_label() {
        let json = serde_json::to_string(&ContentType::RoiCalculator).unwrap();
        assert_eq!(json, r#""ROI Calculator""#);
        let stage: BuyingStage = serde_json::from_str(r#""negotiation""#).unwrap();
        assert_eq!(stage, BuyingStage::Negotiation);
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        assert!(serde_json::from_str::<Sentiment>(r#""ecstatic""#).is_err());
        assert!("ecstatic".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_level_weights() {
        assert_eq!(Level::High.weight(), 3);
        assert_eq!(Level::Medium.weight(), 2);
        assert_eq!(Level::Low.weight(), 1);
        assert_eq!(Level::weight_of(None), 1);
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(ObjectionCategory::ALL.len(), 9);
        assert_eq!(OpportunityCategory::ALL.len(), 7);
        assert_eq!(ContentType::ALL.len(), 10);
        assert_eq!(BuyingStage::ALL.len(), 5);
    }

    #[test]
    fn test_categories_default_to_other() {
        assert_eq!(ObjectionCategory::default(), ObjectionCategory::Other);
        assert_eq!(OpportunityCategory::default(), OpportunityCategory::Other);
    }
}
