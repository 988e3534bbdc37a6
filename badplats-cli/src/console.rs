use anyhow::Context;
use badplats_core::ui::{LinkOpener, LoadingHandle, LoadingIndicator, Notifier, Toast, ToastKind};
use std::io::Write;

/// Prints toasts to stderr; the duration only matters on screens that fade.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

fn toast_line(toast: &Toast) -> String {
    let prefix = match toast.kind {
        ToastKind::Success => "✔",
        ToastKind::Error => "✖",
    };
    format!("{prefix} {}", toast.message)
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        eprintln!("{}", toast_line(&toast));
    }
}

#[derive(Debug, Default)]
pub struct ConsoleLoader;

struct ConsoleLoaderHandle;

impl LoadingIndicator for ConsoleLoader {
    fn show(&self, text: &str) -> Box<dyn LoadingHandle> {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{text}\r");
        let _ = stderr.flush();
        Box::new(ConsoleLoaderHandle)
    }
}

impl LoadingHandle for ConsoleLoaderHandle {
    fn dismiss(self: Box<Self>) {
        // clear the loading line
        eprint!("\x1b[2K\r");
    }
}

/// Opens links in the system browser.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        webbrowser::open(url).with_context(|| format!("Failed to open browser for {url}"))
    }
}
