//! UI rendering for the TUI.
//!
//! One screen per wizard step. Every screen except the intro shares the
//! header (brand, step tracker) and the footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use super::Theme;
use crate::core::{ActionPlan, Step, StressAnalysis};
use crate::App;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FOOTER: &str = "Universiti Sains Malaysia • Minden Wellness Initiative";
const BAR_WIDTH: usize = 24;

/// Gauge ratios at or above this are drawn in the warning color.
const HIGH_SCORE: f64 = 0.7;
/// Gauge ratios below this are drawn in the success color.
const LOW_SCORE: f64 = 0.4;

/// Length of one breathing phase in milliseconds.
const BREATH_PHASE_MS: u64 = 4000;

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(app.theme.background)), area);

    if app.step() == Step::Intro {
        draw_intro(frame, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with tracker
            Constraint::Min(6),    // Step content
            Constraint::Length(1), // Key hints
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    match app.step() {
        Step::Intro => {}
        Step::Face => draw_face(frame, app, chunks[1]),
        Step::Deconstruct => {
            if let Some(analysis) = app.state.analysis() {
                draw_deconstruct(frame, app, analysis, chunks[1]);
            }
        }
        Step::Release => draw_release(frame, app, chunks[1]),
        Step::Cope => {
            if let Some(plan) = app.state.plan() {
                draw_cope(frame, app, plan, chunks[1]);
            }
        }
    }

    draw_hints(frame, app, chunks[2]);
    draw_footer(frame, app, chunks[3]);
}

/// Draw the welcome screen.
fn draw_intro(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("MindEase ", Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled("USM", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "A quiet space to untangle what is weighing on you.",
            Style::default().fg(theme.text_dim),
        )),
        Line::from(""),
        intro_step_line("1", "Confront", "put it into words", theme),
        intro_step_line("2", "Analyze", "see it broken down", theme),
        intro_step_line("3", "Release", "take a breath", theme),
        intro_step_line("4", "Resolve", "leave with a plan", theme),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
            Span::styled(" begin   ", Style::default().fg(theme.text_muted)),
            Span::styled("q", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
            Span::styled(" quit", Style::default().fg(theme.text_muted)),
        ]),
        Line::from(""),
        Line::from(Span::styled(FOOTER, Style::default().fg(theme.text_muted))),
    ];

    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect { x: area.x, y: top, width: area.width, height };

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
}

fn intro_step_line<'a>(
    number: &'a str,
    label: &'a str,
    hint: &'a str,
    theme: &Theme,
) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{number}. "), Style::default().fg(theme.primary)),
        Span::styled(format!("{label:<9}"), Style::default().fg(theme.text)),
        Span::styled(hint, Style::default().fg(theme.text_dim)),
    ])
}

/// Draw the header with brand and step tracker.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let current = app.step();

    let mut tracker: Vec<Span> = Vec::new();
    for (idx, step) in Step::TRACKED.iter().enumerate() {
        let active = *step == current;
        let style = if active {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else if *step < current {
            Style::default().fg(theme.text_dim)
        } else {
            Style::default().fg(theme.text_muted)
        };

        tracker.push(Span::styled(format!("{} {}", idx + 1, step.label().to_uppercase()), style));
        if idx + 1 < Step::TRACKED.len() {
            tracker.push(Span::styled("  ›  ", Style::default().fg(theme.text_muted)));
        }
    }

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border))
        .title(Line::from(vec![
            Span::styled(" MindEase ", Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled("USM ", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        ]))
        .title(
            Line::from(Span::styled(
                format!(" {} ", app.advisor_name()),
                Style::default().fg(theme.text_muted),
            ))
            .right_aligned(),
        );

    let paragraph = Paragraph::new(Line::from(tracker)).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

/// Draw the free-text entry.
fn draw_face(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "What's weighing on you right now?",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Write it the way you'd say it to a friend. Nothing is saved.",
            Style::default().fg(theme.text_dim),
        )),
    ])
    .block(Block::default().padding(Padding::horizontal(2)));
    frame.render_widget(heading, chunks[0]);

    let border = if app.is_busy() { theme.border } else { theme.primary };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .padding(Padding::horizontal(1));

    let input_area = input_block.inner(chunks[1]);
    let text = if app.input.is_empty() {
        Paragraph::new(Span::styled(
            "e.g. I have three exams this week and I can't sleep...",
            Style::default().fg(theme.text_muted),
        ))
    } else {
        Paragraph::new(app.input.as_str()).style(Style::default().fg(theme.text))
    };
    frame.render_widget(text.block(input_block), chunks[1]);

    if app.is_busy() {
        frame.render_widget(busy_line(app, "Reading between the lines..."), chunks[2]);
    } else {
        let (row, col) = cursor_offset(&app.input, app.cursor_position);
        if row < input_area.height && col < input_area.width {
            frame.set_cursor_position((input_area.x + col, input_area.y + row));
        }
    }
}

/// Row and column of the cursor inside unwrapped multi-line text.
fn cursor_offset(input: &str, cursor: usize) -> (u16, u16) {
    let before: String = input.chars().take(cursor).collect();
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().map_or(0, |line| line.chars().count());
    (row as u16, col as u16)
}

/// Draw the categorized analysis.
fn draw_deconstruct(frame: &mut Frame, app: &App, analysis: &StressAnalysis, area: Rect) {
    let theme = &app.theme;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("You seem ", Style::default().fg(theme.text_dim)),
            Span::styled(
                analysis.sentiment.as_str(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(analysis.summary.as_str(), Style::default().fg(theme.text))),
        Line::from(""),
    ];

    for category in &analysis.categories {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<20}", category.name),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                score_bar(category.ratio(), BAR_WIDTH),
                Style::default().fg(score_color(theme, category.ratio())),
            ),
            Span::styled(format!(" {:>3.0}", category.score), Style::default().fg(theme.text_dim)),
        ]));
        lines.push(Line::from(Span::styled(
            category.description.as_str(),
            Style::default().fg(theme.text_dim),
        )));
        lines.push(Line::from(""));
    }

    let block = section_block(" Analyze ", app);
    let paragraph =
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }).scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Text gauge for a 0.0..=1.0 ratio.
fn score_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Gauge color: heavy stressors stand out, light ones read as calm.
fn score_color(theme: &Theme, ratio: f64) -> Color {
    if ratio >= HIGH_SCORE {
        theme.warning
    } else if ratio < LOW_SCORE {
        theme.success
    } else {
        theme.secondary
    }
}

/// Draw the breathing pause.
fn draw_release(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let elapsed_ms = app.tick_count.saturating_mul(app.config.ui.tick_rate_ms);
    let (label, progress) = breath_phase(elapsed_ms);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Before planning, give yourself one slow minute.",
            Style::default().fg(theme.text_dim),
        )),
        Line::from(""),
        Line::from(Span::styled(
            label,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(score_bar(progress, BAR_WIDTH), Style::default().fg(theme.secondary))),
        Line::from(""),
    ];

    if app.is_busy() {
        lines.push(busy_line(app, "Building your plan...").alignment(Alignment::Center));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(theme.text_muted)),
            Span::styled("Enter", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
            Span::styled(" when you're ready for your plan", Style::default().fg(theme.text_muted)),
        ]));
    }

    let paragraph =
        Paragraph::new(lines).alignment(Alignment::Center).block(section_block(" Release ", app));
    frame.render_widget(paragraph, area);
}

/// Breathing cue for the elapsed time: in, hold, out, hold.
///
/// Returns the label and how far through the current phase we are.
fn breath_phase(elapsed_ms: u64) -> (&'static str, f64) {
    const LABELS: [&str; 4] = ["Breathe in", "Hold", "Breathe out", "Hold"];

    let phase = (elapsed_ms / BREATH_PHASE_MS) % 4;
    let within = (elapsed_ms % BREATH_PHASE_MS) as f64 / BREATH_PHASE_MS as f64;
    let progress = match phase {
        0 => within,
        1 => 1.0,
        2 => 1.0 - within,
        _ => 0.0,
    };
    (LABELS[phase as usize], progress)
}

/// Draw the action plan.
fn draw_cope(frame: &mut Frame, app: &App, plan: &ActionPlan, area: Rect) {
    let theme = &app.theme;
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)))
    };
    let bullet = |text: &str| {
        Line::from(vec![
            Span::styled("  • ", Style::default().fg(theme.secondary)),
            Span::styled(text.to_string(), Style::default().fg(theme.text)),
        ])
    };

    let mut lines = vec![heading("Right now")];
    lines.extend(plan.immediate_steps.iter().map(|s| bullet(s.as_str())));
    if plan.immediate_steps.is_empty() {
        lines.push(bullet("Nothing urgent. Be kind to yourself today."));
    }

    lines.push(Line::from(""));
    lines.push(heading("Over the coming weeks"));
    lines.extend(plan.long_term_strategies.iter().map(|s| bullet(s.as_str())));

    lines.push(Line::from(""));
    lines.push(heading("Support at USM"));
    for resource in &plan.usm_resources {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(theme.secondary)),
            Span::styled(
                resource.name.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", resource.contact),
            Style::default().fg(theme.text_dim),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", resource.link),
            Style::default().fg(theme.secondary).add_modifier(Modifier::UNDERLINED),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(section_block(" Resolve ", app))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn section_block<'a>(title: &'a str, app: &App) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(title, Style::default().fg(app.theme.primary)))
        .padding(Padding::new(2, 2, 1, 0))
}

fn busy_line<'a>(app: &App, message: &'a str) -> Line<'a> {
    let frame_idx = (app.tick_count % SPINNER.len() as u64) as usize;
    Line::from(vec![
        Span::styled(format!("{} ", SPINNER[frame_idx]), Style::default().fg(app.theme.primary)),
        Span::styled(message, Style::default().fg(app.theme.text_dim)),
    ])
}

/// Draw the key hints for the current step.
fn draw_hints(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: &[(&str, &str)] = match app.step() {
        Step::Intro => &[],
        Step::Face => &[("Enter", "submit"), ("Ctrl+J", "new line"), ("Ctrl+U", "clear")],
        Step::Deconstruct => &[("Enter", "continue"), ("↑↓", "scroll")],
        Step::Release => &[("Enter", "generate plan")],
        Step::Cope => &[("↑↓", "scroll"), ("Enter", "start over")],
    };

    let mut spans = Vec::new();
    for (key, action) in hints.iter().chain([("Ctrl+R", "reset"), ("Ctrl+C", "quit")].iter()) {
        spans.push(Span::styled(format!(" {key}"), Style::default().fg(theme.primary)));
        spans.push(Span::styled(format!(" {action}  "), Style::default().fg(theme.text_muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = Paragraph::new(Span::styled(FOOTER, Style::default().fg(app.theme.text_muted)))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::app::tests::{app_with, MockAdvisor};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0.0, 4), "░░░░");
        assert_eq!(score_bar(0.5, 4), "██░░");
        assert_eq!(score_bar(2.0, 4), "████");
    }

    #[test]
    fn test_score_color_bands() {
        let theme = Theme::default();
        assert_eq!(score_color(&theme, 0.9), theme.warning);
        assert_eq!(score_color(&theme, HIGH_SCORE), theme.warning);
        assert_eq!(score_color(&theme, 0.5), theme.secondary);
        assert_eq!(score_color(&theme, 0.1), theme.success);
    }

    #[test]
    fn test_breath_phase_cycle() {
        assert_eq!(breath_phase(0).0, "Breathe in");
        assert_eq!(breath_phase(BREATH_PHASE_MS).0, "Hold");
        assert_eq!(breath_phase(2 * BREATH_PHASE_MS).0, "Breathe out");
        assert_eq!(breath_phase(4 * BREATH_PHASE_MS).0, "Breathe in");

        let (_, half_in) = breath_phase(BREATH_PHASE_MS / 2);
        assert!((half_in - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cursor_offset() {
        assert_eq!(cursor_offset("", 0), (0, 0));
        assert_eq!(cursor_offset("abc", 2), (0, 2));
        assert_eq!(cursor_offset("ab\ncdé", 6), (1, 3));
    }

    #[tokio::test]
    async fn test_intro_screen() {
        let app = app_with(Arc::new(MockAdvisor::default()));
        let screen = render(&app);
        assert!(screen.contains("MindEase USM"));
        assert!(screen.contains("Confront"));
        assert!(screen.contains("Universiti Sains Malaysia"));
    }

    #[tokio::test]
    async fn test_tracker_and_analysis_screen() {
        let mut app = app_with(Arc::new(MockAdvisor::default()));
        app.start();
        let screen = render(&app);
        assert!(screen.contains("1 CONFRONT"));
        assert!(screen.contains("4 RESOLVE"));
        assert!(screen.contains("What's weighing on you"));

        app.submit("three exams".to_string());
        app.settle().await;
        let screen = render(&app);
        assert!(screen.contains("Anxious"));
        assert!(screen.contains("Academic"));
        assert!(screen.contains("three exams"));
    }

    #[tokio::test]
    async fn test_plan_screen() {
        let mut app = app_with(Arc::new(MockAdvisor::default()));
        app.start();
        app.submit("exams".to_string());
        app.settle().await;
        app.next();
        assert!(render(&app).contains("Breathe in"));

        app.request_plan();
        app.settle().await;
        let screen = render(&app);
        assert!(screen.contains("Take a walk"));
        assert!(screen.contains("Counselling Unit"));
        assert!(screen.contains("https://example.org/counselling"));
    }
}
