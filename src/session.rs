//! Review session state machine
//!
//! Owns the queue, the executor and the decision statistics, and turns each
//! [`KeyAction`] into exactly one state transition. Nothing here touches the
//! terminal; the UI loop renders from the accessors and reacts to the returned
//! [`SessionEvent`].

use crate::domain::{
    Action, ActionExecutor, ActionOutcome, DecisionStatistics, FileRecord, ReviewQueue,
    ReviewStatus,
};
use crate::tui::KeyAction;
use std::path::{Path, PathBuf};

/// Which screen the UI shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Shown on first launch
    Welcome,
    Browsing,
    Help,
    ConfirmDelete,
    /// Typing the destination folder for a move
    MoveInput,
    /// Nothing left to review, or the user is quitting after making decisions
    Summary,
}

/// What the UI loop must do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    /// The cursor points at a different record; reload its preview
    CurrentChanged,
    /// A record left the queue after being trashed
    Removed(PathBuf),
    /// A record left the queue after being moved into `destination`
    Moved { from: PathBuf, destination: PathBuf },
    Open(PathBuf),
    WelcomeDismissed,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub dry_run: bool,
    /// Delete without the confirmation dialog
    pub skip_confirm: bool,
    pub show_welcome: bool,
    /// Pre-filled into the move prompt
    pub default_destination: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ReviewSession {
    queue: ReviewQueue,
    executor: ActionExecutor,
    stats: DecisionStatistics,
    view: ViewState,
    status: Option<StatusMessage>,
    destination_input: String,
    last_destination: Option<PathBuf>,
    skip_confirm: bool,
}

impl ReviewSession {
    pub fn new(records: Vec<FileRecord>, options: SessionOptions) -> Self {
        let stats = DecisionStatistics::new(records.len());
        let mut session = Self {
            queue: ReviewQueue::new(records),
            executor: ActionExecutor::new(options.dry_run),
            stats,
            view: ViewState::Browsing,
            status: None,
            destination_input: String::new(),
            last_destination: options.default_destination,
            skip_confirm: options.skip_confirm,
        };

        if options.show_welcome {
            session.view = ViewState::Welcome;
        } else {
            session.check_done();
        }
        session
    }

    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    pub fn current(&self) -> Option<&FileRecord> {
        self.queue.current()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn statistics(&self) -> &DecisionStatistics {
        &self.stats
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn destination_input(&self) -> &str {
        &self.destination_input
    }

    pub fn last_destination(&self) -> Option<&Path> {
        self.last_destination.as_deref()
    }

    pub fn is_dry_run(&self) -> bool {
        self.executor.is_dry_run()
    }

    /// Shows a failure that happened outside the session, e.g. opening a file
    pub fn report_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::error(text));
    }

    /// Performs one transition
    pub fn handle(&mut self, action: KeyAction) -> SessionEvent {
        if action == KeyAction::ForceQuit {
            return SessionEvent::Quit;
        }

        match self.view {
            ViewState::Welcome => {
                self.view = ViewState::Browsing;
                self.check_done();
                SessionEvent::WelcomeDismissed
            }
            ViewState::Help => {
                self.view = ViewState::Browsing;
                SessionEvent::None
            }
            ViewState::Summary => SessionEvent::Quit,
            ViewState::ConfirmDelete => match action {
                KeyAction::ConfirmDelete => {
                    self.view = ViewState::Browsing;
                    self.delete_current()
                }
                KeyAction::CancelDelete => {
                    self.view = ViewState::Browsing;
                    SessionEvent::None
                }
                _ => SessionEvent::None,
            },
            ViewState::MoveInput => self.handle_move_input(action),
            ViewState::Browsing => self.handle_browsing(action),
        }
    }

    fn handle_browsing(&mut self, action: KeyAction) -> SessionEvent {
        if action != KeyAction::None {
            self.status = None;
        }

        match action {
            KeyAction::Quit => {
                if self.stats.decided() > 0 {
                    self.view = ViewState::Summary;
                    SessionEvent::None
                } else {
                    SessionEvent::Quit
                }
            }
            KeyAction::Keep => self.keep_current(),
            KeyAction::Delete => {
                if self.queue.current().is_none() {
                    SessionEvent::None
                } else if self.skip_confirm || self.executor.is_dry_run() {
                    self.delete_current()
                } else {
                    self.view = ViewState::ConfirmDelete;
                    SessionEvent::None
                }
            }
            KeyAction::Move => {
                if self.queue.current().is_some() {
                    self.destination_input = self
                        .last_destination
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    self.view = ViewState::MoveInput;
                }
                SessionEvent::None
            }
            KeyAction::Next => self.navigate(ReviewQueue::advance),
            KeyAction::Previous => self.navigate(ReviewQueue::retreat),
            KeyAction::Open => match self.queue.current() {
                Some(record) => SessionEvent::Open(record.path.clone()),
                None => SessionEvent::None,
            },
            KeyAction::Refresh => self.refresh(),
            KeyAction::Help => {
                self.view = ViewState::Help;
                SessionEvent::None
            }
            _ => SessionEvent::None,
        }
    }

    fn handle_move_input(&mut self, action: KeyAction) -> SessionEvent {
        match action {
            KeyAction::InputChar(c) => self.destination_input.push(c),
            KeyAction::InputBackspace => {
                self.destination_input.pop();
            }
            KeyAction::InputCancel => {
                self.view = ViewState::Browsing;
            }
            KeyAction::InputSubmit => return self.submit_move(),
            _ => {}
        }
        SessionEvent::None
    }

    fn navigate(&mut self, step: fn(&mut ReviewQueue)) -> SessionEvent {
        let before = self.queue.cursor();
        step(&mut self.queue);
        if self.queue.cursor() == before {
            SessionEvent::None
        } else {
            SessionEvent::CurrentChanged
        }
    }

    fn keep_current(&mut self) -> SessionEvent {
        match self.queue.status_of_current() {
            None => SessionEvent::None,
            // Already decided: just move along without counting it twice
            Some(ReviewStatus::Kept) => self.navigate(ReviewQueue::advance),
            Some(_) => {
                if let Some(outcome) = self.executor.keep(&mut self.queue) {
                    self.stats.record(outcome.status());
                }
                self.check_done();
                SessionEvent::CurrentChanged
            }
        }
    }

    fn delete_current(&mut self) -> SessionEvent {
        match self.executor.apply(&mut self.queue, &Action::Delete) {
            Ok(Some(ActionOutcome::Deleted { path, .. })) => {
                self.stats.record(ReviewStatus::Deleted);
                let prefix = if self.executor.is_dry_run() {
                    "[dry run] Would move to trash"
                } else {
                    "Moved to trash"
                };
                self.status = Some(StatusMessage::info(format!(
                    "{}: {}",
                    prefix,
                    display_name(&path)
                )));
                self.check_done();
                SessionEvent::Removed(path)
            }
            Ok(_) => SessionEvent::None,
            Err(e) => {
                log::debug!("Delete failed: {}", e);
                self.status = Some(StatusMessage::error(e.to_string()));
                SessionEvent::None
            }
        }
    }

    fn submit_move(&mut self) -> SessionEvent {
        let base = self
            .queue
            .current()
            .and_then(|r| r.path.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let Some(destination) = resolve_destination(&self.destination_input, &base) else {
            self.status = Some(StatusMessage::error("Enter a destination folder"));
            return SessionEvent::None;
        };

        self.view = ViewState::Browsing;

        match self
            .executor
            .apply(&mut self.queue, &Action::Move(destination.clone()))
        {
            Ok(Some(ActionOutcome::Moved { from, to })) => {
                self.stats.record(ReviewStatus::Moved);
                let prefix = if self.executor.is_dry_run() {
                    "[dry run] Would move"
                } else {
                    "Moved"
                };
                self.status = Some(StatusMessage::info(format!(
                    "{} {} to {}",
                    prefix,
                    display_name(&from),
                    to.parent().unwrap_or(&destination).display()
                )));
                self.last_destination = Some(destination.clone());
                self.check_done();
                SessionEvent::Moved { from, destination }
            }
            Ok(_) => SessionEvent::None,
            Err(e) => {
                log::debug!("Move failed: {}", e);
                self.status = Some(StatusMessage::error(e.to_string()));
                SessionEvent::None
            }
        }
    }

    fn refresh(&mut self) -> SessionEvent {
        let dropped = self.queue.prune_missing();
        self.status = Some(StatusMessage::info(match dropped {
            0 => "All files are still present".to_string(),
            1 => "Removed 1 file that no longer exists".to_string(),
            n => format!("Removed {} files that no longer exist", n),
        }));
        self.check_done();
        if dropped > 0 {
            SessionEvent::CurrentChanged
        } else {
            SessionEvent::None
        }
    }

    fn check_done(&mut self) {
        if self.queue.is_empty() || self.queue.is_complete() {
            self.view = ViewState::Summary;
        }
    }
}

/// Turns the typed destination into a folder path.
///
/// `~` expands to the home directory; relative paths are taken relative to
/// `base`, the folder the file currently lives in.
pub fn resolve_destination(input: &str, base: &Path) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let expanded = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => {
            let home = dirs::home_dir()?;
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(input),
    };

    if expanded.is_absolute() {
        Some(expanded)
    } else {
        Some(base.join(expanded))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeBasis;
    use std::fs;
    use tempfile::TempDir;

    fn setup(names: &[&str]) -> (TempDir, Vec<FileRecord>) {
        let temp_dir = TempDir::new().unwrap();
        let records = names
            .iter()
            .map(|name| {
                let path = temp_dir.path().join(name);
                fs::write(&path, name.as_bytes()).unwrap();
                FileRecord::from_path(&path, TimeBasis::Created).unwrap()
            })
            .collect();
        (temp_dir, records)
    }

    fn browsing(records: Vec<FileRecord>) -> ReviewSession {
        ReviewSession::new(records, SessionOptions::default())
    }

    fn type_text(session: &mut ReviewSession, text: &str) {
        for c in text.chars() {
            session.handle(KeyAction::InputChar(c));
        }
    }

    #[test]
    fn test_empty_session_starts_in_summary() {
        let session = browsing(vec![]);
        assert_eq!(session.view(), &ViewState::Summary);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_welcome_then_browsing() {
        let (_dir, records) = setup(&["a.txt"]);
        let mut session = ReviewSession::new(
            records,
            SessionOptions {
                show_welcome: true,
                ..Default::default()
            },
        );

        assert_eq!(session.view(), &ViewState::Welcome);
        assert_eq!(session.handle(KeyAction::Keep), SessionEvent::WelcomeDismissed);
        assert_eq!(session.view(), &ViewState::Browsing);
        assert_eq!(session.statistics().kept, 0);
    }

    #[test]
    fn test_keep_all_reaches_summary() {
        let (dir, records) = setup(&["a.txt", "b.txt"]);
        let mut session = browsing(records);

        assert_eq!(session.handle(KeyAction::Keep), SessionEvent::CurrentChanged);
        assert_eq!(session.view(), &ViewState::Browsing);
        session.handle(KeyAction::Keep);

        assert_eq!(session.view(), &ViewState::Summary);
        assert_eq!(session.statistics().kept, 2);
        assert!(dir.path().join("a.txt").exists());
        assert!(dir.path().join("b.txt").exists());
        assert_eq!(session.handle(KeyAction::None), SessionEvent::Quit);
    }

    #[test]
    fn test_keep_twice_counts_once() {
        let (_dir, records) = setup(&["a.txt", "b.txt", "c.txt"]);
        let mut session = browsing(records);

        session.handle(KeyAction::Keep);
        session.handle(KeyAction::Previous);
        session.handle(KeyAction::Keep);

        assert_eq!(session.statistics().kept, 1);
        assert_eq!(session.queue().cursor(), 1);
    }

    #[test]
    fn test_navigation_events() {
        let (_dir, records) = setup(&["a.txt", "b.txt"]);
        let mut session = browsing(records);

        assert_eq!(session.handle(KeyAction::Previous), SessionEvent::None);
        assert_eq!(session.handle(KeyAction::Next), SessionEvent::CurrentChanged);
        assert_eq!(session.handle(KeyAction::Next), SessionEvent::None);
        assert_eq!(session.current().unwrap().name, "b.txt");
    }

    #[test]
    fn test_delete_asks_for_confirmation_and_cancel_keeps_file() {
        let (dir, records) = setup(&["a.txt"]);
        let mut session = browsing(records);

        assert_eq!(session.handle(KeyAction::Delete), SessionEvent::None);
        assert_eq!(session.view(), &ViewState::ConfirmDelete);

        session.handle(KeyAction::CancelDelete);
        assert_eq!(session.view(), &ViewState::Browsing);
        assert!(dir.path().join("a.txt").exists());
        assert_eq!(session.queue().len(), 1);
    }

    #[test]
    fn test_confirmed_delete_of_vanished_file_reports_error() {
        let (dir, records) = setup(&["a.txt", "b.txt"]);
        let mut session = browsing(records);
        fs::remove_file(dir.path().join("a.txt")).unwrap();

        session.handle(KeyAction::Delete);
        let event = session.handle(KeyAction::ConfirmDelete);

        assert_eq!(event, SessionEvent::None);
        assert_eq!(session.view(), &ViewState::Browsing);
        assert_eq!(session.queue().len(), 2);
        assert_eq!(session.current().unwrap().name, "a.txt");
        let status = session.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("a.txt"));
        assert_eq!(session.statistics().deleted, 0);
    }

    #[test]
    fn test_dry_run_delete_skips_confirmation() {
        let (dir, records) = setup(&["a.txt", "b.txt"]);
        let path = records[0].path.clone();
        let mut session = ReviewSession::new(
            records,
            SessionOptions {
                dry_run: true,
                ..Default::default()
            },
        );

        let event = session.handle(KeyAction::Delete);

        assert_eq!(event, SessionEvent::Removed(path));
        assert!(dir.path().join("a.txt").exists());
        assert_eq!(session.statistics().deleted, 1);
        assert_eq!(session.current().unwrap().name, "b.txt");
        assert!(session.status().unwrap().text.contains("[dry run]"));
    }

    #[test]
    fn test_move_prompt_and_submit() {
        let (dir, records) = setup(&["report.pdf", "b.txt"]);
        let mut session = browsing(records);

        session.handle(KeyAction::Move);
        assert_eq!(session.view(), &ViewState::MoveInput);
        assert_eq!(session.destination_input(), "");

        type_text(&mut session, "Sorted");
        let event = session.handle(KeyAction::InputSubmit);

        let destination = dir.path().join("Sorted");
        assert_eq!(
            event,
            SessionEvent::Moved {
                from: dir.path().join("report.pdf"),
                destination: destination.clone()
            }
        );
        assert!(destination.join("report.pdf").exists());
        assert!(!dir.path().join("report.pdf").exists());
        assert_eq!(session.statistics().moved, 1);
        assert_eq!(session.last_destination(), Some(destination.as_path()));

        session.handle(KeyAction::Move);
        assert_eq!(session.destination_input(), destination.display().to_string());
    }

    #[test]
    fn test_move_input_editing_and_cancel() {
        let (_dir, records) = setup(&["a.txt"]);
        let mut session = browsing(records);

        session.handle(KeyAction::Move);
        type_text(&mut session, "abc");
        session.handle(KeyAction::InputBackspace);
        assert_eq!(session.destination_input(), "ab");

        session.handle(KeyAction::InputCancel);
        assert_eq!(session.view(), &ViewState::Browsing);
        assert_eq!(session.queue().len(), 1);
    }

    #[test]
    fn test_move_empty_destination_stays_in_prompt() {
        let (_dir, records) = setup(&["a.txt"]);
        let mut session = browsing(records);

        session.handle(KeyAction::Move);
        type_text(&mut session, "   ");
        session.handle(KeyAction::InputSubmit);

        assert_eq!(session.view(), &ViewState::MoveInput);
        assert_eq!(session.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_move_conflict_keeps_record() {
        let (dir, records) = setup(&["photo.jpg"]);
        let target_dir = dir.path().join("Photos");
        fs::create_dir(&target_dir).unwrap();
        fs::write(target_dir.join("photo.jpg"), b"older").unwrap();

        let mut session = browsing(records);
        session.handle(KeyAction::Move);
        type_text(&mut session, &target_dir.display().to_string());
        let event = session.handle(KeyAction::InputSubmit);

        assert_eq!(event, SessionEvent::None);
        assert_eq!(session.view(), &ViewState::Browsing);
        assert_eq!(session.queue().len(), 1);
        assert!(session.status().unwrap().text.contains("already exists"));
        assert_eq!(fs::read(target_dir.join("photo.jpg")).unwrap(), b"older");
    }

    #[test]
    fn test_refresh_drops_vanished_files() {
        let (dir, records) = setup(&["a.txt", "b.txt"]);
        let mut session = browsing(records);
        fs::remove_file(dir.path().join("a.txt")).unwrap();

        assert_eq!(session.handle(KeyAction::Refresh), SessionEvent::CurrentChanged);
        assert_eq!(session.queue().len(), 1);
        assert_eq!(session.current().unwrap().name, "b.txt");

        assert_eq!(session.handle(KeyAction::Refresh), SessionEvent::None);

        fs::remove_file(dir.path().join("b.txt")).unwrap();
        session.handle(KeyAction::Refresh);
        assert_eq!(session.view(), &ViewState::Summary);
    }

    #[test]
    fn test_quit_without_decisions_exits() {
        let (_dir, records) = setup(&["a.txt"]);
        let mut session = browsing(records);
        assert_eq!(session.handle(KeyAction::Quit), SessionEvent::Quit);
    }

    #[test]
    fn test_quit_after_decisions_shows_summary() {
        let (_dir, records) = setup(&["a.txt", "b.txt"]);
        let mut session = browsing(records);
        session.handle(KeyAction::Keep);

        assert_eq!(session.handle(KeyAction::Quit), SessionEvent::None);
        assert_eq!(session.view(), &ViewState::Summary);
        assert_eq!(session.handle(KeyAction::Keep), SessionEvent::Quit);
    }

    #[test]
    fn test_force_quit_from_any_view() {
        let (_dir, records) = setup(&["a.txt"]);
        let mut session = browsing(records);
        session.handle(KeyAction::Move);
        assert_eq!(session.handle(KeyAction::ForceQuit), SessionEvent::Quit);
    }

    #[test]
    fn test_help_and_open() {
        let (dir, records) = setup(&["a.txt"]);
        let mut session = browsing(records);

        session.handle(KeyAction::Help);
        assert_eq!(session.view(), &ViewState::Help);
        session.handle(KeyAction::Quit);
        assert_eq!(session.view(), &ViewState::Browsing);

        assert_eq!(
            session.handle(KeyAction::Open),
            SessionEvent::Open(dir.path().join("a.txt"))
        );

        session.report_error("no application for a.txt");
        let status = session.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "no application for a.txt");
    }

    #[test]
    fn test_resolve_destination() {
        let base = Path::new("/downloads");
        assert_eq!(resolve_destination("  ", base), None);
        assert_eq!(
            resolve_destination("Invoices", base),
            Some(PathBuf::from("/downloads/Invoices"))
        );
        assert_eq!(
            resolve_destination("/srv/archive", base),
            Some(PathBuf::from("/srv/archive"))
        );

        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolve_destination("~/Pictures", base), Some(home.join("Pictures")));
            assert_eq!(resolve_destination("~", base), Some(home.join("")));
        }
        assert_eq!(
            resolve_destination("~backup", base),
            Some(PathBuf::from("/downloads/~backup"))
        );
    }
}
