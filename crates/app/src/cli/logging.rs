use clap::{Args, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Args)]
pub(crate) struct LoggingArgs {
    /// Log level filter, e.g. `info` or `flashdeal_app=debug`
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t, global = true)]
    log_format: LogFormat,
}

/// Installs the global subscriber. Logs go to stderr so command output stays clean.
pub(crate) fn init(args: &LoggingArgs) -> Result<(), String> {
    let filter = EnvFilter::try_new(&args.log_level)
        .map_err(|error| format!("invalid log level {:?}: {error}", args.log_level))?;

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = match args.log_format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|error| format!("failed to initialize logging: {error}"))
}
