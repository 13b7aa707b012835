use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static PROMPT_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Serialises tests that drive the prompt, since the flag is process-wide.
#[cfg(test)]
pub(crate) static PROMPT_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn lock_prompt() -> std::sync::MutexGuard<'static, ()> {
    PROMPT_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Whether the overwrite prompt is currently waiting for an answer.
/// The interrupt handler uses this to turn Ctrl-C into a clean abort.
pub fn prompt_active() -> bool {
    PROMPT_ACTIVE.load(Ordering::SeqCst)
}

struct PromptGuard;

impl PromptGuard {
    fn enter() -> Self {
        PROMPT_ACTIVE.store(true, Ordering::SeqCst);
        PromptGuard
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        PROMPT_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Asks whether an existing, non-empty result directory may be overwritten.
///
/// Only a `y` answer (case-insensitive) returns `true`. End of input counts
/// as a refusal.
pub fn confirm_overwrite<R: BufRead, W: Write>(
    dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let _guard = PromptGuard::enter();

    write!(
        output,
        "[!] The folder '{}' already exists and is not empty. Are you sure you want to scan again? [y/N]: ",
        dir.display()
    )?;
    output.flush()?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .context("Failed to read confirmation answer")?;
    if read == 0 {
        writeln!(output)?;
        return Ok(false);
    }

    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
