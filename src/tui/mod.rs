// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

pub use colors::*;
pub use helpers::{calculate_progress, format_file_size, format_timestamp};
pub use input::{handle_confirm_input, handle_key_event, handle_text_input, map_key, KeyAction};

use crate::async_preview::PreviewState;
use crate::domain::{DecisionStatistics, FileRecord};
use crate::preview::{self, category_color, Preview};
use crate::session::{ReviewSession, StatusKind, ViewState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// Renders the session's current view into `area`.
///
/// `preview` is the state of the current record's preview, `None` when the
/// queue is empty.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    session: &ReviewSession,
    preview: Option<&PreviewState>,
) {
    if *session.view() == ViewState::Summary {
        render_summary(frame, area, session);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header with progress
            Constraint::Min(0),    // Preview
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], session);
    render_content(frame, chunks[1], session.current(), preview);
    render_status_line(frame, chunks[2], session);
    render_footer(frame, chunks[3]);

    match session.view() {
        ViewState::Help => render_help_overlay(frame, area),
        ViewState::Welcome => render_welcome_overlay(frame, area),
        ViewState::ConfirmDelete => {
            if let Some(record) = session.current() {
                render_confirm_delete_overlay(frame, area, record);
            }
        }
        ViewState::MoveInput => render_move_overlay(frame, area, session),
        ViewState::Browsing | ViewState::Summary => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, session: &ReviewSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let queue = session.queue();
    let (title_text, file_info) = match session.current() {
        Some(record) => (
            format!(" File {}/{} ", queue.position(), queue.len()),
            vec![
                Span::styled(
                    record.name.clone(),
                    Style::default()
                        .fg(TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(
                        "({} • {} • ",
                        format_file_size(record.size),
                        format_timestamp(&record.created_at)
                    ),
                    Style::default().fg(TEXT_SECONDARY),
                ),
                Span::styled(record.category.label(), category_style(record)),
                Span::styled(")", Style::default().fg(TEXT_SECONDARY)),
            ],
        ),
        None => (
            " Download Reviewer ".to_string(),
            vec![Span::styled(
                "No files to review",
                Style::default().fg(TEXT_SECONDARY),
            )],
        ),
    };

    let mut title_spans = vec![Span::styled(
        title_text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    )];
    if session.is_dry_run() {
        title_spans.push(Span::styled(
            " [DRY RUN] ",
            Style::default().fg(ACCENT_MOVE).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(vec![Line::from(title_spans), Line::from(file_info)])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let stats = session.statistics();
    let decided = stats.decided();
    let progress = calculate_progress(decided, stats.total_files);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_KEEP).bg(BG_DARK))
        .ratio(progress)
        .label(format!(
            "{}% ({}/{} decided)",
            (progress * 100.0) as u16,
            decided,
            stats.total_files
        ));

    frame.render_widget(gauge, chunks[1]);
}

fn category_style(record: &FileRecord) -> Style {
    let [r, g, b] = category_color(record.category).0;
    Style::default().fg(Color::Rgb(r, g, b))
}

fn render_content(
    frame: &mut Frame,
    area: Rect,
    record: Option<&FileRecord>,
    preview: Option<&PreviewState>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(" Preview ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(record) = record else {
        return;
    };

    match preview {
        Some(PreviewState::Ready(preview)) => render_preview(frame, inner, preview),
        Some(PreviewState::Loading) | None => {
            let lines = vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        format!("{} ", spinner_frame()),
                        Style::default().fg(ACCENT_HIGHLIGHT),
                    ),
                    Span::styled("Loading preview", Style::default().fg(TEXT_PRIMARY)),
                ]),
                Line::from(Span::styled(
                    record.name.clone(),
                    Style::default().fg(TEXT_SECONDARY),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                inner,
            );
        }
    }
}

fn render_preview(frame: &mut Frame, area: Rect, preview: &Preview) {
    let note_lines: Vec<Line> = preview
        .note
        .as_deref()
        .map(|note| {
            note.lines()
                .map(|l| {
                    Line::from(Span::styled(
                        l.to_string(),
                        Style::default()
                            .fg(TEXT_SECONDARY)
                            .add_modifier(Modifier::ITALIC),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let note_height = (note_lines.len() as u16).min(area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(note_height)])
        .split(area);

    let image_area = chunks[0];
    let image_lines = preview::preview_to_lines(preview, image_area.width, image_area.height);

    // Center vertically; Paragraph handles the horizontal centering
    let top_pad = image_area.height.saturating_sub(image_lines.len() as u16) / 2;
    let mut lines: Vec<Line> = vec![Line::from(""); top_pad as usize];
    lines.extend(image_lines);

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), image_area);
    frame.render_widget(
        Paragraph::new(note_lines).alignment(Alignment::Center),
        chunks[1],
    );
}

fn spinner_frame() -> &'static str {
    const SPINNERS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    SPINNERS[(now / 100) as usize % SPINNERS.len()]
}

fn render_status_line(frame: &mut Frame, area: Rect, session: &ReviewSession) {
    let Some(status) = session.status() else {
        return;
    };

    let (marker, color) = match status.kind {
        StatusKind::Info => ("✓ ", ACCENT_KEEP),
        StatusKind::Error => ("✗ ", ACCENT_DELETE),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {}", marker), Style::default().fg(color)),
        Span::styled(status.text.clone(), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let separator = || Span::raw("  │  ");
    let key = |text: &'static str, color: Color| {
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let label = |text: &'static str| Span::styled(text, Style::default().fg(TEXT_SECONDARY));

    let controls = Line::from(vec![
        key(" ← ", ACCENT_DELETE),
        label("Delete"),
        separator(),
        key("→ ", ACCENT_KEEP),
        label("Keep"),
        separator(),
        key("m ", ACCENT_MOVE),
        label("Move"),
        separator(),
        key("↑↓ ", TEXT_SECONDARY),
        label("Navigate"),
        separator(),
        key("? ", TEXT_SECONDARY),
        label("Help"),
        separator(),
        key("q ", TEXT_SECONDARY),
        label("Quit"),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

/// Shortcut table shared by the help and welcome screens
fn shortcut_lines() -> Vec<Line<'static>> {
    let row = |keys: &'static str, color: Color, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", keys), Style::default().fg(color)),
            Span::raw(text),
        ])
    };

    vec![
        row("→ / k", ACCENT_KEEP, "Keep file"),
        row("← / d / Del", ACCENT_DELETE, "Delete file (to trash)"),
        row("m", ACCENT_MOVE, "Move file to a folder"),
        row("↓ / j", TEXT_SECONDARY, "Next file"),
        row("↑ / i", TEXT_SECONDARY, "Previous file"),
        row("o", TEXT_SECONDARY, "Open in default application"),
        row("r", TEXT_SECONDARY, "Refresh (drop vanished files)"),
        row("?", TEXT_SECONDARY, "Toggle help"),
        row("q / Esc", TEXT_SECONDARY, "Quit"),
    ]
}

fn overlay_block(title: &'static str, border: Color) -> Block<'static> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(BG_DARK))
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn render_help_overlay(frame: &mut Frame, screen: Rect) {
    let area = centered_rect(60, 70, screen);
    frame.render_widget(Clear, area);

    let block = overlay_block(" Help ", ACCENT_HIGHLIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(""), heading("Keyboard Shortcuts"), Line::from("")];
    lines.extend(shortcut_lines());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(TEXT_SECONDARY),
    )));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

pub fn render_welcome_overlay(frame: &mut Frame, screen: Rect) {
    let area = centered_rect(85, 85, screen);
    frame.render_widget(Clear, area);

    let block = overlay_block(" Welcome to Download Reviewer ", ACCENT_HIGHLIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from("Review the files you downloaded recently, one at a time."),
        Line::from("For each one, decide whether to keep it, move it somewhere"),
        Line::from("more sensible, or send it to the trash."),
        Line::from(""),
        heading("Shortcuts:"),
        Line::from(""),
    ];
    lines.extend(shortcut_lines());
    lines.extend([
        Line::from(""),
        heading("Safety:"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_KEEP)),
            Span::raw("Deleted files go to the system "),
            Span::styled("trash", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" and can be restored from there"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_KEEP)),
            Span::raw("Moves never overwrite a file with the same name"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_KEEP)),
            Span::raw("Run with "),
            Span::styled("--dry-run", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to try it without touching any file"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start reviewing...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
    ]);

    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(TEXT_PRIMARY))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

pub fn render_confirm_delete_overlay(frame: &mut Frame, screen: Rect, record: &FileRecord) {
    let area = centered_rect(50, 50, screen);
    frame.render_widget(Clear, area);

    let block = overlay_block(" ⚠ Confirm Delete ", ACCENT_DELETE);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(TEXT_SECONDARY));
    let value = |text: String| Span::styled(text, Style::default().fg(TEXT_PRIMARY));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Move this file to the trash?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("File: "), value(record.name.clone())]),
        Line::from(vec![label("Size: "), value(format_file_size(record.size))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_DELETE)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_DELETE)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_KEEP)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_KEEP)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

pub fn render_move_overlay(frame: &mut Frame, screen: Rect, session: &ReviewSession) {
    let area = centered_rect(70, 40, screen);
    frame.render_widget(Clear, area);

    let block = overlay_block(" Move File ", ACCENT_MOVE);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let name = session
        .current()
        .map(|r| r.name.clone())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Move ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" to folder:", Style::default().fg(TEXT_SECONDARY)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT_MOVE)),
            Span::styled(
                session.destination_input().to_string(),
                Style::default().fg(TEXT_PRIMARY),
            ),
            Span::styled("█", Style::default().fg(ACCENT_MOVE)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Relative paths are resolved against the file's folder. Missing folders are created.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "[Enter] Move    [Esc] Cancel",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    if let Some(status) = session.status().filter(|s| s.kind == StatusKind::Error) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(ACCENT_DELETE),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(TEXT_PRIMARY))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

/// End screen: "All Clean!" once the queue is empty, otherwise a decision summary
pub fn render_summary(frame: &mut Frame, area: Rect, session: &ReviewSession) {
    let summary_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, summary_area);

    let block = overlay_block(" Session Complete ", ACCENT_HIGHLIGHT);
    let inner = block.inner(summary_area);
    frame.render_widget(block, summary_area);

    let stats = session.statistics();
    let (banner, banner_color) = if session.queue().is_empty() {
        ("All Clean! ✨", ACCENT_CLEAN)
    } else if session.queue().is_complete() {
        ("All files reviewed", ACCENT_CLEAN)
    } else {
        ("Summary", TEXT_PRIMARY)
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            banner,
            Style::default()
                .fg(banner_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if stats.total_files == 0 {
        lines.push(Line::from(Span::styled(
            "No recent files to review.",
            Style::default().fg(TEXT_SECONDARY),
        )));
    } else {
        lines.extend(statistics_lines(stats));
    }

    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to exit",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ]);

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

fn statistics_lines(stats: &DecisionStatistics) -> Vec<Line<'static>> {
    let row = |marker: &'static str, text: &'static str, count: usize, color: Color| {
        Line::from(vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::raw(text),
            Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let skipped = stats.total_files.saturating_sub(stats.decided());
    vec![
        row("  ", "Total files:  ", stats.total_files, ACCENT_HIGHLIGHT),
        Line::from(""),
        row("✓ ", "Kept:     ", stats.kept, ACCENT_KEEP),
        row("➜ ", "Moved:    ", stats.moved, ACCENT_MOVE),
        row("✗ ", "Deleted:  ", stats.deleted, ACCENT_DELETE),
        row("○ ", "Skipped:  ", skipped, TEXT_SECONDARY),
    ]
}

/// Limits the drawing area to at most `cols` x `rows` cells, anchored top-left
pub fn clamp_viewport(screen: Rect, (cols, rows): (u16, u16)) -> Rect {
    Rect {
        x: screen.x,
        y: screen.y,
        width: screen.width.min(cols),
        height: screen.height.min(rows),
    }
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileCategory;
    use crate::preview::PreviewSource;
    use crate::session::SessionOptions;
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn record(name: &str, category: FileCategory) -> FileRecord {
        FileRecord {
            path: PathBuf::from(format!("/downloads/{}", name)),
            name: name.to_string(),
            created_at: Utc::now(),
            size: 1536,
            category,
        }
    }

    fn draw(session: &ReviewSession, preview: Option<&PreviewState>) -> String {
        let backend = TestBackend::new(100, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, session, preview)
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn two_files() -> ReviewSession {
        ReviewSession::new(
            vec![
                record("photo.png", FileCategory::Image),
                record("setup.exe", FileCategory::Executable),
            ],
            SessionOptions::default(),
        )
    }

    #[test]
    fn test_render_header_and_footer() {
        let session = two_files();
        // Ready preview so the file name can only come from the header
        let preview = Arc::new(Preview::unavailable(FileCategory::Image));
        let text = draw(&session, Some(&PreviewState::Ready(preview)));
        let created = format_timestamp(&session.current().unwrap().created_at);

        assert!(text.contains("File 1/2"));
        assert!(text.contains("photo.png"));
        assert!(text.contains("1.50 KB"));
        assert!(text.contains(&created));
        assert!(text.contains("• Image)"));
        assert!(text.contains("Delete"));
        assert!(text.contains("Keep"));
        assert!(text.contains("Move"));
        assert!(text.contains("Quit"));
    }

    #[test]
    fn test_render_loading_state() {
        let session = two_files();
        let text = draw(&session, Some(&PreviewState::Loading));
        assert!(text.contains("Loading preview"));
    }

    #[test]
    fn test_render_ready_preview_with_note() {
        let session = two_files();
        let preview = Arc::new(Preview {
            image: preview::category_icon(FileCategory::Other),
            source: PreviewSource::Icon,
            note: Some("Preview not available\n(Only images, PDFs, videos, and apps are previewed)".into()),
        });
        let text = draw(&session, Some(&PreviewState::Ready(preview)));

        assert!(text.contains("▀"));
        assert!(text.contains("Preview not available"));
        assert!(text.contains("(Only images, PDFs"));
    }

    #[test]
    fn test_render_dry_run_badge() {
        let session = ReviewSession::new(
            vec![record("a.zip", FileCategory::Other)],
            SessionOptions {
                dry_run: true,
                ..Default::default()
            },
        );
        assert!(draw(&session, None).contains("DRY RUN"));
    }

    #[test]
    fn test_render_all_clean() {
        let session = ReviewSession::new(vec![], SessionOptions::default());
        let text = draw(&session, None);
        assert!(text.contains("All Clean!"));
        assert!(text.contains("No recent files"));
    }

    #[test]
    fn test_render_summary_counts() {
        let mut session = two_files();
        session.handle(KeyAction::Keep);
        session.handle(KeyAction::Keep);

        let text = draw(&session, None);
        assert!(text.contains("All files reviewed"));
        assert!(text.contains("Kept:"));
        assert!(text.contains("Deleted:"));
    }

    #[test]
    fn test_render_overlays() {
        let mut session = two_files();

        session.handle(KeyAction::Help);
        let text = draw(&session, None);
        assert!(text.contains("Keyboard Shortcuts"));
        session.handle(KeyAction::None);

        session.handle(KeyAction::Delete);
        let text = draw(&session, None);
        assert!(text.contains("Confirm Delete"));
        assert!(text.contains("photo.png"));
        session.handle(KeyAction::CancelDelete);

        session.handle(KeyAction::Move);
        session.handle(KeyAction::InputChar('X'));
        let text = draw(&session, None);
        assert!(text.contains("Move File"));
        assert!(text.contains("> X"));
    }

    #[test]
    fn test_clamp_viewport() {
        let screen = Rect::new(0, 0, 200, 60);
        assert_eq!(clamp_viewport(screen, (100, 46)), Rect::new(0, 0, 100, 46));

        let small = Rect::new(0, 0, 80, 24);
        assert_eq!(clamp_viewport(small, (100, 46)), small);
    }

    #[test]
    fn test_render_inside_clamped_area_leaves_rest_blank() {
        let session = two_files();
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = clamp_viewport(frame.area(), (100, 30));
                render(frame, area, &session, None)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(110, 5)].symbol(), " ");
        assert_eq!(buffer[(50, 35)].symbol(), " ");
    }

    #[test]
    fn test_render_welcome() {
        let session = ReviewSession::new(
            vec![record("a.pdf", FileCategory::Pdf)],
            SessionOptions {
                show_welcome: true,
                ..Default::default()
            },
        );
        let text = draw(&session, None);
        assert!(text.contains("Welcome"));
    }

    #[test]
    fn test_render_status_error() {
        let mut session = two_files();
        // /downloads/photo.png does not exist, so confirming reports an error
        session.handle(KeyAction::Delete);
        session.handle(KeyAction::ConfirmDelete);

        let text = draw(&session, None);
        assert!(text.contains("cannot delete 'photo.png'"));
    }
}
