// All LLM prompt constants for the profile generation module.

/// System prompt shared by every profile call. Plain text out, no markup.
pub const PROFILE_SYSTEM: &str = "You write concise, first-person professional profiles. \
    Respond with the profile text only. \
    Do NOT use markdown headings, code fences or preambles.";

/// Profile creation prompt template. Replace `{prompt}` before sending.
pub const GENERATE_PROMPT_TEMPLATE: &str = r#"You are a profile creation expert.  Create a profile based on the following prompt:

{prompt}"#;

/// Summarization prompt template. Replace `{length}` and `{profile}` before sending.
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"You are an expert at summarizing profiles for use on professional networking websites.

Please provide a summary of the following profile, tailored to be {length}:

Profile: {profile}"#;
