use clap::{Parser, Subcommand};
use reelsplice_common::Label;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelsplice")]
#[command(author, version, about = "Split movies into song and story clips, rejoin them, and convert subtitles")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the project folder tree next to a movie
    Init {
        /// Movie file
        #[arg(required = true)]
        movie: PathBuf,

        /// Interval manifest (defaults to <movie stem>.json beside the movie)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Target languages, comma separated (defaults to the config list)
        #[arg(short, long, value_delimiter = ',')]
        languages: Vec<String>,

        /// Leave the movie and manifest where they are
        #[arg(long)]
        no_move: bool,
    },

    /// Cut a project's movie into labeled clips and the gaps between them
    Split {
        /// Project root created by `init`
        #[arg(required = true)]
        project: PathBuf,

        /// Label the manifest lists (overrides extraction.label)
        #[arg(long)]
        label: Option<Label>,

        /// Suffix appended to every clip name, e.g. a language code
        #[arg(long)]
        suffix: Option<String>,
    },

    /// Rejoin a project's clips into one file
    Merge {
        /// Project root created by `init`
        #[arg(required = true)]
        project: PathBuf,

        /// Output file (defaults to Output/<merge.output_name>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Re-encode instead of stream copy
        #[arg(long)]
        reencode: bool,

        /// Require the clips to tile the project movie's duration exactly
        #[arg(long)]
        check_coverage: bool,

        /// Only join clips whose names end in this suffix
        #[arg(long)]
        suffix: Option<String>,
    },

    /// Convert an SRT file to a gap-free ASS timeline
    Subtitles {
        /// SRT input
        #[arg(required = true)]
        srt: PathBuf,

        /// Language name or code selecting the style
        #[arg(short, long)]
        language: String,

        /// ASS output (defaults to the input path with an .ass extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cover the time before the first cue with a filler event
        #[arg(long)]
        leading_filler: bool,
    },

    /// Burn an ASS file into a video
    Burn {
        /// Video input
        #[arg(required = true)]
        video: PathBuf,

        /// ASS subtitles
        #[arg(required = true)]
        subtitles: PathBuf,

        /// Output file
        #[arg(required = true)]
        output: PathBuf,
    },

    /// Probe a media file's video profile and duration
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
