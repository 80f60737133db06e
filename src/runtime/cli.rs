use std::path::PathBuf;

use clap::Parser;

/// Terminal music player that plays through ffplay
#[derive(Parser, Debug)]
#[command(name = "stelle")]
#[command(version, about)]
pub struct Args {
    /// Music directory to scan (defaults to the current directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Music directory, same as the positional argument
    #[arg(long = "sd", value_name = "DIR", conflicts_with = "dir")]
    pub song_dir: Option<PathBuf>,

    /// Directory containing the decoder executable
    #[arg(long, value_name = "DIR")]
    pub decoder_dir: Option<PathBuf>,
}

impl Args {
    /// The music directory asked for, if any.
    pub fn music_dir(&self) -> Option<PathBuf> {
        self.song_dir.clone().or_else(|| self.dir.clone())
    }
}
