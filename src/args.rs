use clap::Parser;

/// This is the intake processor for the skills questionnaire. It decodes a
/// captured form submission, aggregates it into a flat record and stores it
/// as a per-respondent spreadsheet artifact.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) JSON configuration for the intake: output
    /// directory, artifact format and forwarding endpoint. Defaults apply
    /// when not provided.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or '-' for stdin) The captured form body of one
    /// submission.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default urlencoded) The encoding of the input body. Supported
    /// types: urlencoded, json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (xlsx or csv, optional) Overrides the artifact format from the
    /// configuration.
    #[clap(long, value_parser)]
    pub format: Option<String>,

    /// If passed as an argument, the stored artifact is also forwarded to
    /// the configured external file store.
    #[clap(long, takes_value = false)]
    pub forward: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the
    /// standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
