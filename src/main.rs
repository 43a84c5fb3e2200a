//! SpeechRecorder CLI entry point

use std::process::ExitCode;

use clap::Parser;

use speech_recorder::cli::{
    app::{load_merged_config, run_codecs, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordArgs, RecordOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use speech_recorder::domain::codec::AudioCodec;
use speech_recorder::domain::config::AppConfig;
use speech_recorder::domain::recording::Duration;
use speech_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Codecs => run_codecs(),
        Commands::Record(args) => {
            let config = load_merged_config(cli_config(args)).await;

            // Parse duration
            let duration = match config.duration.as_ref() {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => Some(d),
                    Err(e) => {
                        presenter.error(&format!("Invalid duration: {}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => None,
            };

            let options = RecordOptions {
                output: config.output_or_default().to_string_lossy().into_owned(),
                codec: config.codec_or_default().to_string(),
                quality: config.quality_or_default(),
                volume: config.volume_or_default(),
                duration,
                volume_policy: config.volume_policy_or_default(),
            };

            run_record(options).await
        }
    }
}

/// Build the CLI layer of the config from record arguments
fn cli_config(args: RecordArgs) -> AppConfig {
    AppConfig {
        output: args.output,
        codec: args
            .codec
            .map(|c| AudioCodec::from(c).name().to_string()),
        quality: args.quality,
        volume: args.volume,
        duration: args.duration,
        volume_policy: None,
    }
}
