use anyhow::Result;
use xshell::{Shell, cmd};

/// Run rustfmt check (does not modify files)
pub fn run_fmt_check(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo fmt check...");
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    Ok(())
}

/// Apply rustfmt to all files
pub fn run_fmt(sh: &Shell) -> Result<()> {
    eprintln!("Applying cargo fmt...");
    cmd!(sh, "cargo fmt --all").run()?;
    Ok(())
}

/// Run clippy with all warnings treated as errors
pub fn run_clippy(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo clippy...");
    cmd!(
        sh,
        "cargo clippy --all-features --all-targets --workspace -- -D warnings"
    )
    .run()?;
    Ok(())
}

/// Build docs with broken intra-doc links treated as errors
pub fn run_doc(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo doc...");
    let _env = sh.push_env("RUSTDOCFLAGS", "-D warnings");
    cmd!(sh, "cargo doc --workspace --no-deps --all-features").run()?;
    Ok(())
}
