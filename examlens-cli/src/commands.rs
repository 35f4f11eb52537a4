//! CLI subcommand handlers.

use anyhow::Context;
use std::path::{Path, PathBuf};

use examlens_core::config::workspace_config_path;
use examlens_core::{
    ConfigOverrides, CsvSource, DifficultyPredictor, ExamAnalyzer, ExamConfig, GapPolicy,
    UnavailablePredictor, load_config,
};

use crate::generate::{GenerateOptions, generate_csv};
use crate::{Commands, ConfigAction, GapPolicyArg};

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            input,
            json,
            model_dir,
            pass_marks,
            gap_policy,
        } => {
            let request = AnalyzeRequest {
                input,
                model_dir,
                pass_marks,
                gap_policy,
            };
            let output = handle_analyze(request, json, workspace).await?;
            print!("{output}");
            Ok(())
        }
        Commands::Generate {
            students,
            questions,
            max_marks,
            seed,
            output,
        } => {
            let options = GenerateOptions {
                students,
                questions,
                max_marks,
                seed,
            };
            handle_generate(options, &output).await
        }
        Commands::Config { action } => handle_config(action, workspace).await,
    }
}

struct AnalyzeRequest {
    input: PathBuf,
    model_dir: Option<PathBuf>,
    pass_marks: Option<f64>,
    gap_policy: Option<GapPolicyArg>,
}

fn config_overrides(request: &AnalyzeRequest) -> ConfigOverrides {
    let mut overrides = ConfigOverrides::default();
    overrides.analytics.pass_marks = request.pass_marks;
    overrides.analytics.gap_policy = request.gap_policy.map(|arg| match arg {
        GapPolicyArg::Relative => GapPolicy::default(),
        GapPolicyArg::PassRate => GapPolicy::pass_rate_or_discrimination(),
    });
    overrides.ml.model_dir = request.model_dir.clone();
    overrides
}

async fn resolve_predictor(config: &ExamConfig) -> anyhow::Result<Box<dyn DifficultyPredictor>> {
    if !config.ml.enabled {
        tracing::debug!("Difficulty prediction disabled by configuration");
        return Ok(Box::new(UnavailablePredictor));
    }
    let Some(dir) = config.ml.model_dir.clone() else {
        return Ok(Box::new(UnavailablePredictor));
    };
    let predictor = tokio::task::spawn_blocking(move || examlens_ml::load_predictor(&dir))
        .await
        .context("Model loading task failed")?;
    Ok(predictor)
}

/// Run the analysis and return what should be printed.
async fn handle_analyze(
    request: AnalyzeRequest,
    json: bool,
    workspace: &Path,
) -> anyhow::Result<String> {
    let config = load_config(Some(workspace), Some(&config_overrides(&request)))
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let analytics = config.analytics.clone();

    let text = tokio::fs::read_to_string(&request.input)
        .await
        .with_context(|| format!("Failed to read {}", request.input.display()))?;
    let predictor = resolve_predictor(&config).await?;

    let label = request.input.display().to_string();
    let analysis = tokio::task::spawn_blocking(move || {
        ExamAnalyzer::new(analytics)
            .with_predictor(predictor)
            .analyze(&CsvSource::from_text(text).with_label(label))
    })
    .await
    .context("Analysis task failed")?
    .with_context(|| format!("Could not analyse {}", request.input.display()))?;

    if json {
        let mut out = serde_json::to_string_pretty(&analysis)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(crate::output::render_analysis(&analysis))
    }
}

async fn handle_generate(options: GenerateOptions, output: &Path) -> anyhow::Result<()> {
    let csv = generate_csv(&options);
    tokio::fs::write(output, csv)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        rows = options.row_count(),
        path = %output.display(),
        "Generated synthetic dataset"
    );
    println!("Dataset written to: {}", output.display());
    Ok(())
}

async fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(workspace);
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let toml_str = toml::to_string_pretty(&ExamConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}
