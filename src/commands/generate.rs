//! `generate` subcommand.
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Generates the man page for `jm` plus one page per (nested) subcommand
/// into `output_dir`, defaulting to the current directory.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or a page
/// cannot be written.
pub fn generate_man_pages(
    cmd: &clap::Command,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create man page output directory")?;

    // Worklist of commands still to render, paired with their man-page
    // name (subcommand pages are prefixed, e.g. "jm-generate-man").
    let mut pending = vec![(cmd.get_name().to_owned(), cmd.clone())];
    while let Some((page_name, command)) = pending.pop() {
        for subcmd in command.get_subcommands() {
            pending.push((
                format!("{page_name}-{}", subcmd.get_name()),
                subcmd.clone(),
            ));
        }
        render_page(&output_dir, &page_name, command)?;
    }

    Ok(())
}

/// Renders a single man page to `<output_dir>/<page_name>.1`.
fn render_page(
    output_dir: &Path,
    page_name: &str,
    command: clap::Command,
) -> Result<()> {
    // clap_mangen takes the page name from the Command, so rename it to
    // the prefixed form. The leaked &'static str is fine here since man
    // page generation is a one-shot operation.
    let leaked_name: &'static str =
        Box::leak(page_name.to_owned().into_boxed_str());
    let man = clap_mangen::Man::new(
        command.name(leaked_name).disable_help_subcommand(true),
    );

    let page_path = output_dir.join(format!("{page_name}.1"));
    let mut file = File::create(&page_path)
        .with_context(|| format!("failed to create {}", page_path.display()))?;
    man.render(&mut file)?;
    println!("Generated: {}", page_path.display());
    Ok(())
}
