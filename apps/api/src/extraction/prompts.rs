/// Extraction prompt template. Replace `{job_description}` before sending.
/// The description is embedded verbatim; nothing is escaped or trimmed.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Parse this job description and extract the following information in JSON format:
{
  "company": "Company name",
  "position": "Job title",
  "url": "Application URL if present",
  "application_id": "Any reference/job ID if present"
}

Job Description:
{job_description}
"#;

pub fn build_extraction_prompt(job_description: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{job_description}", job_description)
}
