// Atelier Prompt Lab
//
// Prompt quality analysis, optimization, and variation generation via the
// LLM, plus a purely local structured-prompt builder. Scores come back in
// free text and are scraped out with regexes.

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::info;

use crate::studio::llm::{CompletionOptions, LlmClient};

static SCORE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("clarity", r"(?i)clarity\D{0,40}(\d+)"),
        ("specificity", r"(?i)specificity\D{0,40}(\d+)"),
        ("structure", r"(?i)structure\D{0,40}(\d+)"),
        ("completeness", r"(?i)completeness\D{0,40}(\d+)"),
        ("actionability", r"(?i)actionability\D{0,40}(\d+)"),
        ("overall", r"(?i)overall\D{0,40}(\d+)"),
    ]
    .into_iter()
    .map(|(name, pat)| (name, Regex::new(pat).expect("score pattern")))
    .collect()
});

#[derive(Debug, Clone)]
pub struct PromptAnalysis {
    pub original_prompt: String,
    pub analysis: String,
    pub scores: HashMap<&'static str, u32>,
}

#[derive(Debug, Clone)]
pub struct PromptOptimization {
    pub original_prompt: String,
    pub goal: String,
    pub domain: String,
    pub result: String,
}

pub fn goal_hint(goal: &str) -> &str {
    match goal {
        "full" => "improve the prompt across every dimension",
        "clarity" => "focus on clearer, more precise expression",
        "specificity" => "add concrete detail and requirements",
        "structure" => "improve the logical structure and organization",
        "actionability" => "make it easier for an AI to understand and execute",
        other => other,
    }
}

pub fn domain_hint(domain: &str) -> &str {
    match domain {
        "general" => "general-purpose optimization for any scenario",
        "writing" => "text creation and writing tasks",
        "analysis" => "data analysis and research tasks",
        "creative" => "creative design and ideation",
        "technical" => "technical documentation and programming tasks",
        "education" => "teaching and training content",
        "marketing" => "marketing and promotional content",
        other => other,
    }
}

/// Pull the rubric scores out of a free-text analysis reply.
pub fn extract_scores(analysis: &str) -> HashMap<&'static str, u32> {
    let mut scores = HashMap::new();
    for (name, pattern) in SCORE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(analysis) {
            if let Ok(value) = caps[1].parse::<u32>() {
                scores.insert(*name, value);
            }
        }
    }
    scores
}

/// Assemble a structured prompt locally; no backend involved.
pub fn structured_prompt(
    task_description: &str,
    output_format: &str,
    role_context: &str,
    constraints: &[String],
    examples: &[String],
) -> String {
    let mut out = format!("# Task Description\n{task_description}\n\n");

    if !role_context.is_empty() {
        out.push_str(&format!("# Role\n{role_context}\n\n"));
    }
    if !constraints.is_empty() {
        out.push_str("# Constraints\n");
        for (i, constraint) in constraints.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, constraint));
        }
        out.push('\n');
    }
    out.push_str(&format!("# Output Format\n{output_format}\n\n"));
    if !examples.is_empty() {
        out.push_str("# Examples\n");
        for (i, example) in examples.iter().enumerate() {
            out.push_str(&format!("## Example {}\n{}\n\n", i + 1, example));
        }
    }
    out.push_str(
        "# Execution\nFollow the requirements above strictly and ensure output quality and format correctness.",
    );
    out
}

pub struct PromptLab<'a> {
    llm: &'a LlmClient,
}

impl<'a> PromptLab<'a> {
    pub fn new(llm: &'a LlmClient) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, original_prompt: &str) -> Result<PromptAnalysis> {
        info!("[LAB] Analyzing prompt quality");
        let prompt = format!(
            "Please analyze the quality and structure of the following prompt:\n\n\
             Original prompt:\n{original_prompt}\n\n\
             Evaluate these aspects:\n\
             1. Clarity - is the intent expressed clearly\n\
             2. Specificity - is there enough concrete information\n\
             3. Structure - is the logical structure sound\n\
             4. Completeness - are the necessary elements present\n\
             5. Actionability - can an AI understand and execute it\n\n\
             Score each aspect 1-10 with a short justification, then give an\n\
             overall score and list the main issues and improvement areas."
        );

        let options = CompletionOptions::default().with_max_tokens(1500);
        let analysis = self.llm.complete(&prompt, None, &options).await?;
        let scores = extract_scores(&analysis);

        Ok(PromptAnalysis {
            original_prompt: original_prompt.to_string(),
            analysis,
            scores,
        })
    }

    pub async fn optimize(
        &self,
        original_prompt: &str,
        goal: &str,
        domain: &str,
    ) -> Result<PromptOptimization> {
        info!("[LAB] Optimizing prompt (goal: {}, domain: {})", goal, domain);
        let prompt = format!(
            "Please optimize the following prompt to make it more effective and professional:\n\n\
             Original prompt:\n{original_prompt}\n\n\
             Optimization goal: {goal}\n\
             Application domain: {domain}\n\n\
             Provide:\n\
             1. The optimized prompt (complete version)\n\
             2. The main improvements\n\
             3. Why each improvement helps\n\
             4. Expected benefit\n\
             5. Usage tips\n\n\
             Principles: keep the original intent, add necessary context, give\n\
             clear format requirements, add concrete evaluation criteria, include\n\
             a role setup where useful, and guide the output format.",
            goal = goal_hint(goal),
            domain = domain_hint(domain),
        );

        let options = CompletionOptions::default().with_max_tokens(3000);
        let result = self.llm.complete(&prompt, None, &options).await?;

        Ok(PromptOptimization {
            original_prompt: original_prompt.to_string(),
            goal: goal.to_string(),
            domain: domain.to_string(),
            result,
        })
    }

    pub async fn variations(&self, base_prompt: &str, count: u32) -> Result<String> {
        info!("[LAB] Generating {} prompt variations", count);
        let prompt = format!(
            "Based on the following base prompt, generate {count} distinct variants:\n\n\
             Base prompt:\n{base_prompt}\n\n\
             For each variant provide the prompt text, what distinguishes it from\n\
             the base version, suggested use cases, and the expected output style.\n\
             Keep the core goal identical across variants; vary the phrasing,\n\
             emphasis, and target scenario."
        );

        let options = CompletionOptions::default().with_max_tokens(3000);
        self.llm.complete(&prompt, None, &options).await
    }
}
