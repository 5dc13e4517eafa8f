use serde::{Deserialize, Deserializer, Serialize};

/// Seniority bucket reported by résumé analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SeniorityLevel {
    Entry,
    Mid,
    Senior,
    #[default]
    Unspecified,
}

impl SeniorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeniorityLevel::Entry => "entry",
            SeniorityLevel::Mid => "mid",
            SeniorityLevel::Senior => "senior",
            SeniorityLevel::Unspecified => "",
        }
    }
}

impl From<String> for SeniorityLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "entry" => SeniorityLevel::Entry,
            "mid" => SeniorityLevel::Mid,
            "senior" => SeniorityLevel::Senior,
            _ => SeniorityLevel::Unspecified,
        }
    }
}

/// Structured attributes extracted from a résumé.
///
/// Built once per upload and replaced wholesale on re-upload; nothing mutates it in between.
/// Skill lists behave as sets: `normalized()` drops blanks and duplicates, keeping first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_years")]
    pub years_experience: f64,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub seniority_level: SeniorityLevel,
}

impl CandidateProfile {
    pub fn normalized(mut self) -> Self {
        self.technical_skills = dedup_skills(self.technical_skills);
        self.soft_skills = dedup_skills(self.soft_skills);
        self.years_experience = self.years_experience.max(0.0);
        self
    }
}

fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

/// Accepts `5`, `5.5`, `"5"`, or `null` for years of experience.
fn lenient_years<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s
            .trim()
            .trim_end_matches('+')
            .parse::<f64>()
            .unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_model_reply() {
        let json = r#"{
            "technical_skills": ["Python", "SQL", "Python"],
            "soft_skills": ["Communication"],
            "years_experience": 6,
            "education": ["BSc Computer Science"],
            "achievements": ["Cut query latency by 40%"],
            "seniority_level": "Senior"
        }"#;
        let profile: CandidateProfile = serde_json::from_str(json).unwrap();
        let profile = profile.normalized();
        assert_eq!(profile.technical_skills, vec!["Python", "SQL"]);
        assert_eq!(profile.years_experience, 6.0);
        assert_eq!(profile.seniority_level, SeniorityLevel::Senior);
    }

    #[test]
    fn test_unknown_seniority_is_unspecified() {
        let level: SeniorityLevel = serde_json::from_str(r#""entry/mid/senior""#).unwrap();
        assert_eq!(level, SeniorityLevel::Unspecified);
        assert_eq!(level.as_str(), "");
    }

    #[test]
    fn test_years_accepts_string_and_null() {
        let p: CandidateProfile =
            serde_json::from_str(r#"{"years_experience": "7+"}"#).unwrap();
        assert_eq!(p.years_experience, 7.0);
        let p: CandidateProfile = serde_json::from_str(r#"{"years_experience": null}"#).unwrap();
        assert_eq!(p.years_experience, 0.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let p: CandidateProfile = serde_json::from_str("{}").unwrap();
        assert!(p.technical_skills.is_empty());
        assert_eq!(p.seniority_level, SeniorityLevel::Unspecified);
    }
}
