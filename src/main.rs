fn main() -> anyhow::Result<()> {
    readqc::cli::run::entry()
}
