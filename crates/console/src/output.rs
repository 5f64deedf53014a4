//! Terminal rendering: notifications, the busy spinner and record tables.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use services::services::notification::{
    Notification, NotificationService, NotificationStatus, Notifier,
};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
};

const MAX_CELL_WIDTH: usize = 40;

/// Prints every notification and forwards it to the logging/desktop service.
pub struct TerminalNotifier {
    inner: NotificationService,
}

impl TerminalNotifier {
    pub fn new(inner: NotificationService) -> Self {
        Self { inner }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = format_notification(&notification);
        match notification.status {
            NotificationStatus::Success | NotificationStatus::Info => println!("{line}"),
            NotificationStatus::Warning | NotificationStatus::Error => eprintln!("{line}"),
        }
        self.inner.notify(notification);
    }
}

fn format_notification(notification: &Notification) -> String {
    let marker = match notification.status {
        NotificationStatus::Success => "✔",
        NotificationStatus::Info => "ℹ",
        NotificationStatus::Warning => "!",
        NotificationStatus::Error => "✖",
    };
    match &notification.description {
        Some(description) => format!("{marker} {}: {description}", notification.title),
        None => format!("{marker} {}", notification.title),
    }
}

/// Spinner shown while the busy flag is raised.
pub struct Spinner {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Spinner {
    pub fn spawn(mut busy: watch::Receiver<bool>) -> Self {
        let (stop, mut stopped) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut bar: Option<ProgressBar> = None;
            loop {
                let is_busy = *busy.borrow_and_update();
                match (is_busy, bar.take()) {
                    (true, None) => bar = Some(start_spinner()),
                    (false, Some(done)) => done.finish_and_clear(),
                    (_, current) => bar = current,
                }
                tokio::select! {
                    changed = busy.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = &mut stopped => break,
                }
            }
            if let Some(done) = bar {
                done.finish_and_clear();
            }
        });
        Self { stop, handle }
    }

    /// Clear the spinner line and wait for the task to end.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        let _ = self.handle.await;
    }
}

fn start_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message("Working...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Left-aligned plain text table with a header rule.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(cells.iter().map(|row| line(row)));
    out.join("\n")
}

fn truncate(cell: &str) -> String {
    let single_line = cell.replace('\n', " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let mut short: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_render_table_pads_columns() {
        let table = render_table(
            &strings(&["ID", "Name"]),
            &[strings(&["1", "Carrier"]), strings(&["22", "Trane"])],
        );
        assert_eq!(
            table,
            "ID  Name\n--  -------\n1   Carrier\n22  Trane"
        );
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let long = "x".repeat(60);
        let table = render_table(&strings(&["Notes"]), &[vec![long]]);
        let last = table.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn test_notification_line() {
        let line = format_notification(
            &Notification::error("Failed to delete Vendor").with_description("in use"),
        );
        assert_eq!(line, "✖ Failed to delete Vendor: in use");
    }
}
