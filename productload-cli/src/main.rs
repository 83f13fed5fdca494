use anyhow::Result;

fn main() -> Result<()> {
    productload_cli::cli::execute()
}
