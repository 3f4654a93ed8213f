// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// tiger-rates - TIGER rate calculator for aligned character matrices
pub struct Args {
    /// input file or dataset directory to analyze
    #[argh(positional)]
    pub input: Option<String>,

    /// input format: fasta, harvest, cldf
    #[argh(option, short = 'f')]
    pub format: Option<String>,

    /// comma-separated list of state labels treated as missing everywhere
    #[argh(option, short = 'i', default = "String::new()")]
    pub ignored_chars: String,

    /// comma-separated list of taxa removed before analysis
    #[argh(option, short = 'x', default = "String::new()")]
    pub excluded_taxa: String,

    /// exclude taxa whose name matches this regex pattern
    #[argh(option)]
    pub exclude_pattern: Option<String>,

    /// number of worker threads (default: auto-detect; 1 or less runs sequentially)
    #[argh(option, short = 'n')]
    pub processes: Option<usize>,

    /// print each character's name before its rate
    #[argh(switch)]
    pub names: bool,

    /// synonym resolution strategy: random, minimum, maximum (default: minimum)
    #[argh(option)]
    pub synonyms: Option<String>,

    /// seed for the random synonym strategy
    #[argh(option)]
    pub seed: Option<u64>,

    /// write rates to this file instead of standard output
    #[argh(option, short = 'o')]
    pub output: Option<String>,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// list available input formats and exit
    #[argh(switch)]
    pub list_formats: bool,

    /// only log warnings and hide the progress bar
    #[argh(switch, short = 'q')]
    pub quiet: bool,
}
