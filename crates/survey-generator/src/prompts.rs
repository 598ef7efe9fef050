//! Instruction templates sent to the language model.
//!
//! Each template embeds a literal example of the JSON shape expected back,
//! which is what makes small local models answer in a parseable form.

pub const USERS_SYSTEM_PROMPT: &str = "You are a data generator for a SaaS company. \
Generate realistic employee profiles.
Focus on diversity in names, departments, and roles. Make them feel like real people.";

pub const SURVEYS_SYSTEM_PROMPT: &str = "You are a product manager creating customer \
feedback surveys.
Generate realistic, professional surveys that a SaaS company would actually use.
Mix different question types appropriately.";

/// Prompt asking for exactly `count` employee profiles.
pub fn users_prompt(count: usize) -> String {
    format!(
        r#"Generate exactly {count} realistic employee profiles in JSON format.

Requirements:
- Mix of managers (2-3) and regular members
- Realistic full names (diverse backgrounds)
- Professional email addresses based on names
- Each person should feel unique and believable

Output ONLY valid JSON matching this exact structure:
{{
  "users": [
    {{
      "name": "Full Name",
      "email": "firstname.lastname@company.com",
      "role": "manager" or "member"
    }}
  ]
}}

Generate {count} users now:"#
    )
}

/// Prompt asking for exactly `count` surveys of 3-6 questions each.
pub fn surveys_prompt(count: usize) -> String {
    format!(
        r#"Generate exactly {count} realistic customer feedback surveys in JSON format.

Requirements:
- Each survey should have 3-6 questions
- Mix question types: rating, NPS, multiple choice, open text
- Questions should flow logically
- Professional, clear language
- Realistic choices for multiple choice questions
- Survey ids must be unique, question ids unique within their survey

Question type specifications:
- "rating": Use scale "number", range 5, include lowerLabel and upperLabel
- "nps": Use range 10, lowerLabel "Not likely", upperLabel "Very likely"
- "multipleChoiceSingle": Include 3-5 choices with id and label
- "multipleChoiceMulti": Include 3-5 choices with id and label
- "openText": No extra fields needed

Output ONLY valid JSON matching this exact structure:
{{
  "surveys": [
    {{
      "id": "survey-1",
      "name": "Survey Name",
      "questions": [
        {{
          "id": "q1",
          "type": "rating",
          "headline": "Question text?",
          "required": true,
          "scale": "number",
          "range": 5,
          "lowerLabel": "Not satisfied",
          "upperLabel": "Very satisfied"
        }},
        {{
          "id": "q2",
          "type": "multipleChoiceSingle",
          "headline": "Question text?",
          "required": true,
          "choices": [
            {{"id": "choice-1", "label": "Option 1"}},
            {{"id": "choice-2", "label": "Option 2"}}
          ]
        }},
        {{
          "id": "q3",
          "type": "openText",
          "headline": "Question text?",
          "required": false
        }}
      ],
      "status": "inProgress",
      "type": "link"
    }}
  ]
}}

Generate {count} diverse surveys now:"#
    )
}
