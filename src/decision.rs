/*!
 * Operator decision interface.
 *
 * Every interactive choice the pipeline needs goes through `DecisionSource`:
 * - `confirm` - one keep/remove answer for a whole cleaning category
 * - `choose_one` - one stream picked from a rendered catalog
 * - `choose_many` - a keep-set of style indices, empty meaning "all"
 *
 * `TerminalDecisions` prompts the operator on stdout/stdin;
 * `ScriptedDecisions` replays queued answers and records what it was shown,
 * which is what makes the pipeline stages testable without a terminal.
 */

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};

use crate::errors::ConfigError;

/// Source of batch-wide operator decisions
pub trait DecisionSource {
    /// One boolean "remove this category" decision for the whole batch.
    /// `samples` are pre-rendered match lines shown for context.
    fn confirm(&mut self, samples: &[String], category_label: &str) -> Result<bool>;

    /// Pick exactly one option from a rendered catalog. Range checking is
    /// the caller's job; this returns whatever index the source produced.
    fn choose_one(&mut self, options: &[String]) -> Result<usize>;

    /// Pick a subset of a ranked listing by index. An empty answer means
    /// "keep all"; interpretation is the caller's job.
    fn choose_many(&mut self, ranked_options: &[String]) -> Result<Vec<usize>>;
}

/// Production decision source reading the operator's terminal
pub struct TerminalDecisions;

impl TerminalDecisions {
    pub fn new() -> Self {
        TerminalDecisions
    }

    fn read_answer(prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read operator answer")?;
        Ok(answer)
    }
}

impl Default for TerminalDecisions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSource for TerminalDecisions {
    fn confirm(&mut self, samples: &[String], category_label: &str) -> Result<bool> {
        let prompt = format!(
            "{}\n\nFound the above lines and text to be removed in category '{}'. Press enter for delete. 'n' to keep. ",
            samples.join("\n"),
            category_label
        );
        let answer = Self::read_answer(&prompt)?;
        Ok(answer.trim().to_lowercase() != "n")
    }

    fn choose_one(&mut self, options: &[String]) -> Result<usize> {
        for option in options {
            println!("{}", option);
        }

        let answer = Self::read_answer("Please choose subtitle to extract> ")?;
        let trimmed = answer.trim();
        let index = trimmed
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidSelection(trimmed.to_string()))?;
        Ok(index)
    }

    fn choose_many(&mut self, ranked_options: &[String]) -> Result<Vec<usize>> {
        for option in ranked_options {
            println!("{}", option);
        }

        let answer = Self::read_answer(
            "Choose tags to keep by index separated by space (e.g. 1 2 4). No input to keep all listed.\n> ",
        )?;

        let mut indices = Vec::new();
        for token in answer.split_whitespace() {
            let index = token
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidSelection(token.to_string()))?;
            indices.push(index);
        }
        Ok(indices)
    }
}

/// Deterministic decision source for tests: queued answers in, served
/// prompts recorded out.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    confirms: VecDeque<bool>,
    single_choices: VecDeque<usize>,
    multi_choices: VecDeque<Vec<usize>>,

    /// Category labels `confirm` was asked about, in order
    pub confirm_labels: Vec<String>,
    /// Sample blocks `confirm` was shown, in order
    pub confirm_samples: Vec<Vec<String>>,
    /// Catalogs `choose_one` presented, in order
    pub presented_catalogs: Vec<Vec<String>>,
    /// Ranked listings `choose_many` presented, in order
    pub presented_rankings: Vec<Vec<String>>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `confirm` call
    pub fn with_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next `choose_one` call
    pub fn with_choice(mut self, index: usize) -> Self {
        self.single_choices.push_back(index);
        self
    }

    /// Queue an answer for the next `choose_many` call
    pub fn with_choices(mut self, indices: Vec<usize>) -> Self {
        self.multi_choices.push_back(indices);
        self
    }

    /// How many decisions were requested in total
    pub fn calls(&self) -> usize {
        self.confirm_labels.len() + self.presented_catalogs.len() + self.presented_rankings.len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn confirm(&mut self, samples: &[String], category_label: &str) -> Result<bool> {
        self.confirm_labels.push(category_label.to_string());
        self.confirm_samples.push(samples.to_vec());
        self.confirms
            .pop_front()
            .ok_or_else(|| anyhow!("No scripted answer left for confirm '{}'", category_label))
    }

    fn choose_one(&mut self, options: &[String]) -> Result<usize> {
        self.presented_catalogs.push(options.to_vec());
        self.single_choices
            .pop_front()
            .ok_or_else(|| anyhow!("No scripted answer left for choose_one"))
    }

    fn choose_many(&mut self, ranked_options: &[String]) -> Result<Vec<usize>> {
        self.presented_rankings.push(ranked_options.to_vec());
        self.multi_choices
            .pop_front()
            .ok_or_else(|| anyhow!("No scripted answer left for choose_many"))
    }
}
