// Résumé analysis prompt templates.

/// System prompt for résumé analysis.
pub const RESUME_ANALYSIS_SYSTEM: &str = "\
You are an expert resume analyzer. Extract the following information from the resume: \
technical skills, soft skills, years of experience, education, and key achievements. \
Classify the candidate's seniority as exactly one of \"entry\", \"mid\" or \"senior\".";

/// Analysis prompt. Replace `{resume_text}` before sending.
pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyze the following resume.

RESUME:
{resume_text}

Return the analysis in this JSON format:
{
  "technical_skills": ["string"],
  "soft_skills": ["string"],
  "years_experience": number,
  "education": ["string"],
  "achievements": ["string"],
  "seniority_level": "entry" | "mid" | "senior"
}

RULES:
1. List each skill once, using its common name (e.g. "Python", "PostgreSQL").
2. years_experience is a number; use 0 when it cannot be determined.
3. Return ONLY the JSON object."#;
