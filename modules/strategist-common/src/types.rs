use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StrategistError;

// --- Trend data ---

/// One related search query and its relative interest score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendQuery {
    pub query: String,
    pub interest: u32,
}

impl TrendQuery {
    pub fn new(query: impl Into<String>, interest: u32) -> Self {
        Self {
            query: query.into(),
            interest,
        }
    }
}

/// Render trend rows as a fixed-width two-column table (`query`, `value`).
///
/// Output is deterministic for a given slice and embeds every query verbatim.
pub fn format_trend_table(trends: &[TrendQuery]) -> String {
    let query_width = trends
        .iter()
        .map(|t| t.query.chars().count())
        .max()
        .unwrap_or(0)
        .max("query".len());

    let mut out = format!("{:<query_width$}  value\n", "query");
    for t in trends {
        out.push_str(&format!("{:<query_width$}  {:>5}\n", t.query, t.interest));
    }
    out
}

// --- Form enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    GeneralAudience,
    Beginners,
    TechProfessionals,
    BusinessOwners,
    Students,
}

impl Audience {
    pub const ALL: [Audience; 5] = [
        Audience::GeneralAudience,
        Audience::Beginners,
        Audience::TechProfessionals,
        Audience::BusinessOwners,
        Audience::Students,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Audience::GeneralAudience => "General Audience",
            Audience::Beginners => "Beginners",
            Audience::TechProfessionals => "Tech Professionals",
            Audience::BusinessOwners => "Business Owners",
            Audience::Students => "Students",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Audience::GeneralAudience => "general-audience",
            Audience::Beginners => "beginners",
            Audience::TechProfessionals => "tech-professionals",
            Audience::BusinessOwners => "business-owners",
            Audience::Students => "students",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    IncreaseSeoTraffic,
    BuildBrandAwareness,
    GenerateLeads,
    EducateAudience,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::IncreaseSeoTraffic,
        Goal::BuildBrandAwareness,
        Goal::GenerateLeads,
        Goal::EducateAudience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::IncreaseSeoTraffic => "Increase SEO Traffic",
            Goal::BuildBrandAwareness => "Build Brand Awareness",
            Goal::GenerateLeads => "Generate Leads",
            Goal::EducateAudience => "Educate Audience",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Goal::IncreaseSeoTraffic => "increase-seo-traffic",
            Goal::BuildBrandAwareness => "build-brand-awareness",
            Goal::GenerateLeads => "generate-leads",
            Goal::EducateAudience => "educate-audience",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    ProfessionalAuthoritative,
    CasualFriendly,
    WittyHumorous,
    Inspirational,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::ProfessionalAuthoritative,
        Tone::CasualFriendly,
        Tone::WittyHumorous,
        Tone::Inspirational,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::ProfessionalAuthoritative => "Professional & Authoritative",
            Tone::CasualFriendly => "Casual & Friendly",
            Tone::WittyHumorous => "Witty & Humorous",
            Tone::Inspirational => "Inspirational",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Tone::ProfessionalAuthoritative => "professional-authoritative",
            Tone::CasualFriendly => "casual-friendly",
            Tone::WittyHumorous => "witty-humorous",
            Tone::Inspirational => "inspirational",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the display label (case-insensitive) or the slug.
fn parse_choice<T: Copy>(
    field: &str,
    input: &str,
    all: &[T],
    label: fn(&T) -> &'static str,
    slug: fn(&T) -> &'static str,
) -> Result<T, StrategistError> {
    let needle = input.trim();
    all.iter()
        .find(|c| label(*c).eq_ignore_ascii_case(needle) || slug(*c) == needle)
        .copied()
        .ok_or_else(|| StrategistError::Validation(format!("unknown {field}: {input:?}")))
}

impl FromStr for Audience {
    type Err = StrategistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("audience", s, &Audience::ALL, Audience::label, Audience::slug)
    }
}

impl FromStr for Goal {
    type Err = StrategistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("goal", s, &Goal::ALL, Goal::label, Goal::slug)
    }
}

impl FromStr for Tone {
    type Err = StrategistError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("tone", s, &Tone::ALL, Tone::label, Tone::slug)
    }
}

// --- Generator input ---

/// Everything the plan prompt needs. Built once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInput {
    pub topic: String,
    pub trends: Vec<TrendQuery>,
    pub audience: Option<Audience>,
    pub goal: Option<Goal>,
    pub tone: Option<Tone>,
}

impl StrategyInput {
    pub fn new(topic: impl Into<String>, trends: Vec<TrendQuery>) -> Self {
        Self {
            topic: topic.into(),
            trends,
            audience: None,
            goal: None,
            tone: None,
        }
    }

    pub fn audience(mut self, audience: Option<Audience>) -> Self {
        self.audience = audience;
        self
    }

    pub fn goal(mut self, goal: Option<Goal>) -> Self {
        self.goal = goal;
        self
    }

    pub fn tone(mut self, tone: Option<Tone>) -> Self {
        self.tone = tone;
        self
    }
}

/// A plan request as it arrives from a user surface, before trends are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub topic: String,
    #[serde(default)]
    pub audience: Option<Audience>,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub tone: Option<Tone>,
}

impl PlanRequest {
    pub fn into_input(self, trends: Vec<TrendQuery>) -> StrategyInput {
        StrategyInput::new(self.topic, trends)
            .audience(self.audience)
            .goal(self.goal)
            .tone(self.tone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_counts_match_form() {
        assert_eq!(Audience::ALL.len(), 5);
        assert_eq!(Goal::ALL.len(), 4);
        assert_eq!(Tone::ALL.len(), 4);
    }

    #[test]
    fn parses_label_and_slug() {
        assert_eq!(
            "Tech Professionals".parse::<Audience>().unwrap(),
            Audience::TechProfessionals
        );
        assert_eq!(
            "tech-professionals".parse::<Audience>().unwrap(),
            Audience::TechProfessionals
        );
        assert_eq!(
            "increase seo traffic".parse::<Goal>().unwrap(),
            Goal::IncreaseSeoTraffic
        );
        assert_eq!(
            "Professional & Authoritative".parse::<Tone>().unwrap(),
            Tone::ProfessionalAuthoritative
        );
    }

    #[test]
    fn every_variant_round_trips_through_display() {
        for a in Audience::ALL {
            assert_eq!(a.to_string().parse::<Audience>().unwrap(), a);
            assert_eq!(a.slug().parse::<Audience>().unwrap(), a);
        }
        for g in Goal::ALL {
            assert_eq!(g.to_string().parse::<Goal>().unwrap(), g);
        }
        for t in Tone::ALL {
            assert_eq!(t.to_string().parse::<Tone>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_choice_is_validation_error() {
        let err = "Aliens".parse::<Audience>().unwrap_err();
        assert!(matches!(err, StrategistError::Validation(_)));
        assert!(err.to_string().contains("audience"));
    }

    #[test]
    fn serde_uses_slugs() {
        let json = serde_json::to_string(&Tone::WittyHumorous).unwrap();
        assert_eq!(json, "\"witty-humorous\"");
        let req: PlanRequest = serde_json::from_str(
            r#"{"topic":"electric cars","audience":"tech-professionals"}"#,
        )
        .unwrap();
        assert_eq!(req.audience, Some(Audience::TechProfessionals));
        assert!(req.goal.is_none());
    }

    #[test]
    fn trend_table_is_aligned_and_verbatim() {
        let table = format_trend_table(&[
            TrendQuery::new("electric car price", 100),
            TrendQuery::new("best electric car 2024", 80),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("query"));
        assert!(lines[0].ends_with("value"));
        assert!(lines[1].starts_with("electric car price"));
        assert!(lines[1].ends_with("100"));
        assert!(lines[2].starts_with("best electric car 2024"));
        assert!(lines[2].ends_with("80"));
        assert_eq!(lines[1].len(), lines[2].len());
    }

    #[test]
    fn empty_trend_table_has_header_only() {
        assert_eq!(format_trend_table(&[]), "query  value\n");
    }
}
