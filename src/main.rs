use clap::{Arg, ArgMatches, Command};
use log::info;
use std::path::PathBuf;

use bleep::{dependencies, video};
use bleep::{Config, ConfigBuilder, ConfigFile, FasterWhisper, FfmpegMedia, Pipeline, Result, WhisperModel};
use bleep::{ProgressOperation, WordInterval};

fn common_args() -> Vec<Arg> {
    vec![
        Arg::new("input")
            .short('i')
            .long("input")
            .value_name("FILE")
            .help("Input video file to process")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf)),
        Arg::new("words")
            .short('w')
            .long("words")
            .value_name("WORD,WORD,...")
            .help("Comma-separated list of target words to detect")
            .value_delimiter(','),
        Arg::new("model")
            .short('m')
            .long("model")
            .value_name("MODEL")
            .help("Whisper model to use for transcription")
            .value_parser(["tiny", "base", "small", "medium", "large"]),
        Arg::new("threshold")
            .short('t')
            .long("threshold")
            .value_name("FLOAT")
            .help("Fuzzy match threshold (0-100, default 85)")
            .value_parser(clap::value_parser!(f64)),
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Configuration file (YAML/JSON)")
            .value_parser(clap::value_parser!(PathBuf)),
        Arg::new("profile")
            .short('p')
            .long("profile")
            .value_name("NAME")
            .help("Configuration profile to use (from config file)"),
    ]
}

fn build_cli() -> Command {
    Command::new("bleep")
        .about("Finds and bleeps spoken profanity in video files")
        .version("0.1.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Disable progress indicators")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("find")
                .about("Report target word timestamps without producing a video")
                .args(common_args()),
        )
        .subcommand(
            Command::new("censor")
                .about("Produce a copy of the video with target words bleeped out")
                .args(common_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output video file (defaults to <input>_censored.<ext>)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("frequency")
                        .short('f')
                        .long("frequency")
                        .value_name("HZ")
                        .help("Tone frequency in Hz (default 1000)")
                        .value_parser(clap::value_parser!(f32)),
                ),
        )
        .subcommand(
            Command::new("list-profiles")
                .about("List available configuration profiles")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Configuration file (YAML/JSON)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

async fn load_config_file(matches: &ArgMatches) -> Result<Option<ConfigFile>> {
    if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        Ok(Some(ConfigFile::load(config_path).await?))
    } else {
        Ok(ConfigFile::load_from_default_locations().await)
    }
}

async fn parse_config(matches: &ArgMatches) -> Result<Config> {
    let input_file = matches
        .get_one::<PathBuf>("input")
        .ok_or_else(|| bleep::error::config_error("input", "Input file is required"))?
        .clone();

    let mut builder = ConfigBuilder::new().input_file(input_file);

    // Layering: config file, then profile, then CLI flags
    if let Some(ref config_file) = load_config_file(matches).await? {
        if let Some(profile_name) = matches.get_one::<String>("profile") {
            builder = config_file.apply_profile_to_builder(profile_name, builder)?;
        } else {
            builder = config_file.apply_to_builder(builder)?;
        }
    }

    if let Some(output) = matches.try_get_one::<PathBuf>("output").ok().flatten() {
        builder = builder.output_file(output.clone());
    }

    if let Some(model_str) = matches.get_one::<String>("model") {
        let model: WhisperModel = model_str.parse()?;
        builder = builder.whisper_model(model);
    }

    if let Some(&threshold) = matches.get_one::<f64>("threshold") {
        builder = builder.match_threshold(threshold)?;
    }

    if let Some(&frequency) = matches.try_get_one::<f32>("frequency").ok().flatten() {
        builder = builder.tone_frequency(frequency)?;
    }

    if let Some(words) = matches.get_many::<String>("words") {
        let word_list: Vec<String> = words.cloned().collect();
        builder = builder.target_words(word_list)?;
    }

    builder.build()
}

fn print_intervals(matched: &[WordInterval]) {
    if matched.is_empty() {
        println!("No target words found.");
        return;
    }

    println!("Target words identified at the following timestamps:");
    for interval in matched {
        println!(
            "  '{}' from {:.2}s to {:.2}s",
            interval.text, interval.start, interval.end
        );
    }
}

async fn build_pipeline(matches: &ArgMatches) -> Result<Pipeline> {
    let config = parse_config(matches).await?;
    let progress = ProgressOperation::new(!matches.get_flag("no-progress"));

    info!("Starting bleep with config: {:?}", config);

    let pb = progress.spinner("Validating system dependencies");
    dependencies::validate_dependencies().await?;
    progress.finish_spinner(pb, "Validating system dependencies");

    video::validate_video_file(&config.input_file)?;

    let transcriber = FasterWhisper::new(config.whisper_model.clone());
    Ok(Pipeline::new(
        config,
        Box::new(transcriber),
        Box::new(FfmpegMedia::new()),
        progress,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match matches.subcommand() {
        Some(("find", sub_matches)) => {
            let pipeline = build_pipeline(sub_matches).await?;
            let outcome = pipeline.find().await?;

            println!("Transcript: {}", outcome.transcript_text);
            print_intervals(&outcome.matched);
        }
        Some(("censor", sub_matches)) => {
            let pipeline = build_pipeline(sub_matches).await?;
            let outcome = pipeline.censor().await?;

            print_intervals(&outcome.matched);
            info!("✓ Successfully created censored video: {:?}", outcome.output_file);
            println!("Censored video saved to: {}", outcome.output_file.display());
        }
        Some(("list-profiles", sub_matches)) => {
            let config_file = load_config_file(sub_matches).await?.unwrap_or_default();
            println!("Available configuration profiles:");
            let mut names = config_file.list_profiles();
            names.sort();
            for name in names {
                let description = config_file
                    .profiles
                    .as_ref()
                    .and_then(|p| p.get(&name))
                    .and_then(|p| p.description.as_deref())
                    .unwrap_or("No description");
                println!("  {}: {}", name, description);
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
