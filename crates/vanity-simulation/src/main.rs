//! Purpose: Provides the entry point for the vanity-sim CLI.

fn main() -> anyhow::Result<()> {
    vanity_simulation::cli::run()
}
