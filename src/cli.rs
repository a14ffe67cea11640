// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::scanner::DEFAULT_HOURS_THRESHOLD;
use crate::domain::{ScanOptions, TimeBasis};
use crate::preview::DEFAULT_FFMPEG;
use crate::session::SessionOptions;
use clap::{ArgAction, Parser};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Pixel size of one terminal cell used to turn `--window` into a cell grid
pub const CELL_WIDTH_PX: u32 = 8;
pub const CELL_HEIGHT_PX: u32 = 16;

/// dlreview - review what you downloaded recently
///
/// Walks through the files that landed in your Downloads folder during the
/// last day, one at a time: keep them, move them somewhere sensible, or send
/// them to the trash.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dlreview")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to review
    ///
    /// Defaults to your Downloads folder.
    pub directory: Option<PathBuf>,

    /// Only review files created within this many hours
    #[arg(long = "hours", value_name = "N")]
    pub hours: Option<u32>,

    /// Dry run mode - show what would happen without moving or trashing files
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Delete without asking for confirmation
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Skip hidden files (names starting with .)
    #[arg(long = "skip-hidden", action = ArgAction::SetTrue)]
    pub skip_hidden: bool,

    /// Use the modification time instead of the creation time
    #[arg(long = "modified", action = ArgAction::SetTrue)]
    pub modified: bool,

    /// Default folder offered when moving a file
    #[arg(long = "dest", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Window size in pixels, e.g. 800x750
    #[arg(long = "window", value_name = "WxH")]
    pub window: Option<WindowSize>,

    /// Path to the ffmpeg executable used for video thumbnails
    #[arg(long = "ffmpeg", value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write log output to this file [default: <cache dir>/dlreview/dlreview.log]
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Show the welcome screen even if it was already seen
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

/// Requested window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 750,
        }
    }
}

impl WindowSize {
    /// Terminal cells (columns, rows) the window covers
    pub fn cells(&self) -> (u16, u16) {
        let cols = (self.width / CELL_WIDTH_PX).clamp(1, u32::from(u16::MAX));
        let rows = (self.height / CELL_HEIGHT_PX).clamp(1, u32::from(u16::MAX));
        (cols as u16, rows as u16)
    }
}

impl FromStr for WindowSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid window size: '{}'. Use format like '800x750'", s);

        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width < CELL_WIDTH_PX || height < CELL_HEIGHT_PX {
            return Err(format!(
                "Window size {}x{} is smaller than a single terminal cell",
                width, height
            ));
        }

        Ok(Self { width, height })
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Effective settings: defaults, overridden by the user config file,
/// overridden by command line flags
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub hours: u32,
    pub dry_run: bool,
    pub skip_confirm: bool,
    pub skip_hidden: bool,
    pub time_basis: TimeBasis,
    pub destination: Option<PathBuf>,
    pub window: WindowSize,
    pub ffmpeg: PathBuf,
    pub verbose: u8,
    pub quiet: bool,
    /// Always a file: stderr would draw over the review screen
    pub log_file: PathBuf,
    pub show_welcome: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: default_directory(),
            hours: DEFAULT_HOURS_THRESHOLD,
            dry_run: false,
            skip_confirm: false,
            skip_hidden: false,
            time_basis: TimeBasis::Created,
            destination: None,
            window: WindowSize::default(),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            verbose: 0,
            quiet: false,
            log_file: default_log_file(),
            show_welcome: true,
        }
    }
}

/// The platform Downloads folder, or the current directory when there is none
pub fn default_directory() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `<cache dir>/dlreview/dlreview.log`, under the temp dir when the platform has no cache dir
pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dlreview")
        .join("dlreview.log")
}

impl AppConfig {
    /// Layers `args` over `user` over the defaults
    pub fn resolve(args: Args, user: &UserConfig) -> Self {
        let defaults = AppConfig::default();

        AppConfig {
            directory: args
                .directory
                .or_else(|| user.directory.clone())
                .unwrap_or(defaults.directory),
            hours: args.hours.or(user.hours).unwrap_or(defaults.hours),
            dry_run: args.dry_run,
            skip_confirm: args.yes,
            skip_hidden: args.skip_hidden || user.skip_hidden.unwrap_or(defaults.skip_hidden),
            time_basis: if args.modified {
                TimeBasis::Modified
            } else {
                defaults.time_basis
            },
            destination: args
                .destination
                .or_else(|| user.last_destination.clone()),
            window: args.window.unwrap_or(defaults.window),
            ffmpeg: args
                .ffmpeg
                .or_else(|| user.ffmpeg.clone())
                .unwrap_or(defaults.ffmpeg),
            verbose: args.verbose,
            quiet: args.quiet,
            log_file: args.log_file.unwrap_or(defaults.log_file),
            show_welcome: args.welcome || !user.welcome_shown,
        }
    }

    /// Validate the settings and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if self.hours == 0 {
            return Err("--hours must be at least 1".to_string());
        }

        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            time_basis: self.time_basis,
            skip_hidden: self.skip_hidden,
            ..ScanOptions::with_hours(self.hours)
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            dry_run: self.dry_run,
            skip_confirm: self.skip_confirm,
            show_welcome: self.show_welcome,
            default_destination: self.destination.clone(),
        }
    }
}
