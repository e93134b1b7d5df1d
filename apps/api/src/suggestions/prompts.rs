/// Builds the suggestion prompt. Both texts are embedded verbatim.
pub fn suggestion_prompt(resume_text: &str, job_text: &str) -> String {
    format!(
        r#"You are an expert career advisor. Analyze this resume against the job description and provide actionable suggestions.

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{job_text}

Return ONLY a valid JSON array with specific suggestions. No additional text or formatting:

[
  {{
    "type": "keyword",
    "originalText": "specific text from resume",
    "suggestedText": "improved version with job keywords",
    "explanation": "why this improvement helps",
    "priority": "high"
  }},
  {{
    "type": "phrasing",
    "originalText": "another text from resume",
    "suggestedText": "better professional phrasing",
    "explanation": "explanation for the change",
    "priority": "medium"
  }}
]

Each object MUST contain exactly these fields: type, originalText, suggestedText, explanation, priority.
priority MUST be one of "high", "medium", "low".

Focus on:
- Missing keywords from the job description
- Better action verbs and quantified achievements
- Professional phrasing improvements
- Technical skills alignment"#
    )
}
