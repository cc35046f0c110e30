//! Command-line interface, interactive prompts and run orchestration

use crate::generation::character::{Character, NonEmptyTraits};
use crate::generation::generator::CharacterGenerator;
use crate::generation::sampler::WeightedSampler;
use crate::generation::traits::TraitTable;
use crate::io::assets;
use crate::io::configuration::{
    DEFAULT_ASSETS_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_TRAITS_FILE, REPORT_FILE_NAME,
};
use crate::io::error::{Result, TokenatorError, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::render::compositor::{RenderSummary, render_collection};
use crate::report::rarity::compute_rarity;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tokenator")]
#[command(
    author,
    version,
    about = "Generate unique layered character tokens from weighted traits"
)]
/// Command-line arguments for the token generator
pub struct Cli {
    /// Trait table describing categories, options and weights
    #[arg(short, long, default_value = DEFAULT_TRAITS_FILE)]
    pub traits: PathBuf,

    /// Directory with one sub-folder of layer images per category
    #[arg(short, long, default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Directory receiving the project folder
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Project name, prompted for when absent
    #[arg(short, long)]
    pub name: Option<String>,

    /// Number of tokens to generate, prompted for when absent
    #[arg(short = 'c', long)]
    pub size: Option<usize>,

    /// Random seed for reproducible collections
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Suppress progress bars and warnings
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Reject project names that can't be a single directory name
///
/// # Errors
///
/// Returns `InvalidParameter` for empty names, path separators, `.` and `..`
pub fn validate_project_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if name == "." || name == ".." {
        Some("must be a plain directory name")
    } else {
        None
    };

    reason.map_or(Ok(()), |reason| {
        Err(invalid_parameter("project name", &name, &reason))
    })
}

fn read_answer<R: BufRead>(input: &mut R, prompt: &'static str) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(TokenatorError::InputClosed { prompt });
    }
    Ok(line.trim().to_string())
}

/// Ask for a project name until a usable one is given
///
/// # Errors
///
/// Returns `InputClosed` if input ends, or an error if output can't be written
pub fn prompt_project_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    loop {
        write!(output, "What is the name of this project? ")?;
        output.flush()?;
        let answer = read_answer(input, "a project name")?;
        match validate_project_name(&answer) {
            Ok(()) => return Ok(answer),
            Err(error) => writeln!(output, "\n{error}. Please try again.")?,
        }
    }
}

/// Ask how many tokens to generate
///
/// A blank answer selects `max`; larger answers are clamped to `max`.
/// Non-numeric answers are re-prompted.
///
/// # Errors
///
/// Returns `InputClosed` if input ends, or an error if output can't be written
pub fn prompt_collection_size<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    max: usize,
) -> Result<usize> {
    loop {
        writeln!(
            output,
            "The maximum size of this collection, based on provided assets, is {max} tokens."
        )?;
        write!(
            output,
            "How many tokens would you like to generate? (Leave blank for maximum) "
        )?;
        output.flush()?;

        let answer = read_answer(input, "a collection size")?;
        if answer.is_empty() {
            writeln!(output, "\n{max} tokens will be generated.")?;
            return Ok(max);
        }

        match answer.parse::<usize>() {
            Ok(size) if size > max => {
                writeln!(
                    output,
                    "\nThis is greater than the maximum collection size. {max} tokens will be generated."
                )?;
                return Ok(max);
            }
            Ok(size) => {
                writeln!(output, "\n{size} tokens will be generated.")?;
                return Ok(size);
            }
            Err(_) => writeln!(output, "\nPlease enter a valid number.")?,
        }
    }
}

/// Largest collection the table and asset folders both allow
///
/// Without an assets directory only the table's combination count applies.
///
/// # Errors
///
/// Returns an error if the assets directory exists but can't be read
pub fn max_collection_size(table: &TraitTable, assets_dir: &Path) -> Result<usize> {
    let table_max = table.combination_count();
    if assets_dir.is_dir() {
        Ok(assets::max_collection_size(assets_dir)?.min(table_max))
    } else {
        Ok(table_max)
    }
}

/// Orchestrates one generation run with progress tracking
pub struct TokenProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl TokenProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run against the process's standard input and output
    ///
    /// # Errors
    ///
    /// Returns an error if the run aborts or any token fails to render
    pub fn process(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.process_with(&mut stdin.lock(), &mut stdout.lock())
    }

    /// Run with explicit prompt input and output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trait table can't be loaded or is invalid
    /// - A prompt can't be answered
    /// - Characters can't be generated uniquely
    /// - The project directory can't be created
    /// - Any token fails to render (after all others were attempted)
    pub fn process_with<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        let table = TraitTable::from_file(&self.cli.traits)?;
        self.warn_unbalanced(&table);

        let max = max_collection_size(&table, &self.cli.assets)?;

        let project = match self.cli.name.clone() {
            Some(name) => {
                validate_project_name(&name)?;
                name
            }
            None => prompt_project_name(input, output)?,
        };

        let size = match self.cli.size {
            Some(size) if size > max => {
                writeln!(
                    output,
                    "{size} is greater than the maximum collection size. {max} tokens will be generated."
                )?;
                max
            }
            Some(size) => size,
            None => prompt_collection_size(input, output, max)?,
        };

        let mut sampler = WeightedSampler::from_optional_seed(self.cli.seed);
        let mut generator = CharacterGenerator::new(&table, NonEmptyTraits);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_phase("characters", size);
        }
        let progress = self.progress_manager.as_ref();
        let collection = generator.generate_collection(size, &mut sampler, |character| {
            if let Some(pm) = progress {
                pm.advance(&describe(character));
            }
        })?;
        writeln!(
            output,
            "\n{} generated characters were found to be unique and valid. Generating tokens...",
            collection.len()
        )?;

        let layer_order = table.layer_order();
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_phase("tokens", collection.len());
        }
        let progress = &mut self.progress_manager;
        let summary = render_collection(
            &collection,
            &layer_order,
            &self.cli.assets,
            &self.cli.output,
            &project,
            |id, result| {
                if let Some(pm) = progress.as_mut() {
                    let label = format!("#{id}");
                    if result.is_ok() {
                        pm.advance(&label);
                    } else {
                        pm.advance_failed(&label);
                    }
                }
            },
        )?;
        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        let report_path = self.cli.output.join(&project).join(REPORT_FILE_NAME);
        if let Err(error) = compute_rarity(&collection, &table).write(&report_path) {
            self.warn(&format!("Warning: {error}"));
        }

        self.report_summary(summary, output, &project)
    }

    fn report_summary<W: Write>(
        &self,
        summary: RenderSummary,
        output: &mut W,
        project: &str,
    ) -> Result<()> {
        if summary.is_success() {
            writeln!(
                output,
                "\nAll {} tokens were successfully generated and saved to '{}'. Enjoy!",
                summary.total(),
                self.cli.output.join(project).display()
            )?;
        } else {
            for (_, error) in &summary.failures {
                writeln!(output, "{error}")?;
            }
            writeln!(
                output,
                "\n{} of {} tokens were saved; {} failed.",
                summary.rendered.len(),
                summary.total(),
                summary.failures.len()
            )?;
        }
        summary.into_result().map(|_| ())
    }

    fn warn_unbalanced(&self, table: &TraitTable) {
        for (category, total) in table.unbalanced_categories() {
            self.warn(&format!(
                "Warning: weights for '{category}' add up to {total}, not 100; they are used as relative weights"
            ));
        }
    }

    // Allow print for user-facing warnings outside the progress display
    #[allow(clippy::print_stderr)]
    fn warn(&self, message: &str) {
        if !self.cli.quiet {
            eprintln!("{message}");
        }
    }
}

fn describe(character: &Character) -> String {
    character
        .choices()
        .iter()
        .map(|c| c.option.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
