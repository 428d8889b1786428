//! Application service: destructive reset of the data directory.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::application::ports::LocalFs;
use crate::domain::ResetError;

/// How a reset ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The data directory did not exist.
    NothingToReset,
    /// The operator declined the prompt.
    Cancelled,
    /// The directory was deleted and recreated empty.
    Reset,
}

/// Delete and recreate `data_dir`.
///
/// Prompts on `input`/`out` unless `skip_confirm` is set. A partial deletion
/// is not rolled back.
///
/// # Errors
///
/// Returns an error if the directory cannot be removed or recreated, or if
/// the terminal cannot be read or written.
pub fn reset_data(
    fs: &impl LocalFs,
    data_dir: &Path,
    skip_confirm: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<ResetOutcome, ResetError> {
    if !fs.exists(data_dir) {
        writeln!(
            out,
            "Data directory {} does not exist. Nothing to reset.",
            data_dir.display()
        )?;
        return Ok(ResetOutcome::NothingToReset);
    }

    if !skip_confirm {
        writeln!(
            out,
            "This will permanently delete all MCP Anywhere data in: {}",
            data_dir.display()
        )?;
        writeln!(out, "This includes:")?;
        writeln!(out, "  • Database (all servers, users, OAuth configurations)")?;
        writeln!(out, "  • OAuth 2.0 keys and tokens")?;
        writeln!(out, "  • Container build cache and logs")?;
        writeln!(out)?;

        if !confirm("Are you sure you want to continue?", input, out)? {
            writeln!(out, "Reset cancelled.")?;
            return Ok(ResetOutcome::Cancelled);
        }
    }

    fs.remove_dir_all(data_dir)
        .map_err(|source| ResetError::Remove {
            path: data_dir.to_path_buf(),
            source,
        })?;
    writeln!(out, "Data directory removed: {}", data_dir.display())?;

    fs.create_dir_all(data_dir)
        .map_err(|source| ResetError::Recreate {
            path: data_dir.to_path_buf(),
            source,
        })?;
    writeln!(out, "Data directory created: {}", data_dir.display())?;

    writeln!(out)?;
    writeln!(out, "Data reset completed.")?;
    writeln!(
        out,
        "The application will initialize with a fresh database on next startup."
    )?;
    Ok(ResetOutcome::Reset)
}

/// Read one line; only `yes`/`y` (any case) confirms. End of input declines.
fn confirm(
    prompt: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool, ResetError> {
    write!(out, "{prompt} (yes/no): ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }
    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y"))
}
