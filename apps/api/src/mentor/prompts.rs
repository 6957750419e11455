// Prompt and fixed reply texts for the AI mentor.

/// Mentor prompt template. Replace `{domain}`, `{career}`, `{skills}` and `{missing}` before sending.
pub const MENTOR_PROMPT_TEMPLATE: &str = "
You are an AI mentor for girls in STEM.

Domain: {domain}
Career goal: {career}
Current skills: {skills}
Missing skills: {missing}

Generate:
1. A step-by-step learning roadmap
2. Three game-like missions to level up
3. A short motivational message

Be encouraging and supportive. Keep it concise but helpful.
";

pub const ALL_SKILLS_COVERED: &str = "Congratulations! You have all the required skills for this career. Keep learning and expanding your knowledge!";
pub const CONFIG_MISSING: &str =
    "AI mentor unavailable - please check your API key configuration";
pub const TIMEOUT: &str = "AI mentor is taking too long. Please try again.";
pub const EMPTY_RESPONSE: &str = "AI returned empty response";

/// Fills the mentor template. Skill lists are joined with `", "`.
pub fn build_mentor_prompt(
    career: &str,
    domain: &str,
    skills: &[String],
    missing: &[String],
) -> String {
    MENTOR_PROMPT_TEMPLATE
        .replace("{domain}", domain)
        .replace("{career}", career)
        .replace("{skills}", &skills.join(", "))
        .replace("{missing}", &missing.join(", "))
}
