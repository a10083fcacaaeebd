use anyhow::Result;

fn main() -> Result<()> {
    archlift_cli::main_entry()
}
